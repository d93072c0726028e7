//! Named filter criteria for account listings.
//!
//! # Responsibility
//! - Parse `(criterion, value)` pairs from callers into a closed `Criterion` set.
//! - Resolve a criterion into the store-level `AccountFilter`.
//!
//! # Invariants
//! - Unknown names are rejected, never ignored.
//! - A missing criterion degrades to the unfiltered listing.
//! - Minimum age is inclusive: a user whose birthday is today counts as the
//!   new age.

use crate::model::birthdate::Birthdate;
use crate::query::{QueryError, QueryResult};
use crate::repo::account_repo::AccountFilter;
use chrono::{Months, NaiveDate};

pub const BY_EMAIL_DOMAIN: &str = "byEmailDomain";
pub const BY_LAST_NAME: &str = "byLastname";
pub const BY_MINIMUM_AGE: &str = "byMinimumAge";

/// Closed set of supported account criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    /// Suffix match on `@<domain>`.
    EmailDomain(String),
    /// Exact last-name match.
    LastName(String),
    /// Age in whole years, derived from birthdate and the current date.
    MinimumAge(u32),
}

impl Criterion {
    pub fn name(&self) -> &'static str {
        match self {
            Self::EmailDomain(_) => BY_EMAIL_DOMAIN,
            Self::LastName(_) => BY_LAST_NAME,
            Self::MinimumAge(_) => BY_MINIMUM_AGE,
        }
    }

    /// Parses a raw criterion name and value.
    ///
    /// Returns `Ok(None)` when no criterion name is supplied.
    ///
    /// # Errors
    /// - `UnsupportedCriterion` for unknown names.
    /// - `MissingCriterionValue` when a known name has no (or a blank) value.
    /// - `InvalidCriterionValue` when a minimum age is not a non-negative integer.
    pub fn parse(name: Option<&str>, value: Option<&str>) -> QueryResult<Option<Self>> {
        let Some(name) = name.map(str::trim).filter(|name| !name.is_empty()) else {
            return Ok(None);
        };
        let name = canonical_name(name)?;
        let value = value
            .filter(|value| !value.trim().is_empty())
            .ok_or(QueryError::MissingCriterionValue(name))?;

        // Last names match byte-for-byte; only the other kinds are trimmed.
        let criterion = match name {
            BY_EMAIL_DOMAIN => Self::EmailDomain(value.trim().trim_start_matches('@').to_string()),
            BY_LAST_NAME => Self::LastName(value.to_string()),
            _ => Self::MinimumAge(value.trim().parse().map_err(|_| {
                QueryError::InvalidCriterionValue {
                    criterion: BY_MINIMUM_AGE,
                    value: value.to_string(),
                }
            })?),
        };
        Ok(Some(criterion))
    }
}

fn canonical_name(name: &str) -> QueryResult<&'static str> {
    [BY_EMAIL_DOMAIN, BY_LAST_NAME, BY_MINIMUM_AGE]
        .into_iter()
        .find(|known| *known == name)
        .ok_or_else(|| QueryError::UnsupportedCriterion(name.to_string()))
}

/// Maps an optional criterion onto the store query it selects.
///
/// `today` anchors age computation. An age whose cutoff falls before the
/// earliest representable date selects nobody.
pub fn dispatch(criterion: Option<&Criterion>, today: NaiveDate) -> AccountFilter {
    match criterion {
        None => AccountFilter::All,
        Some(Criterion::EmailDomain(domain)) => AccountFilter::EmailDomain(domain.clone()),
        Some(Criterion::LastName(last_name)) => AccountFilter::LastName(last_name.clone()),
        Some(Criterion::MinimumAge(years)) => match birthdate_cutoff(today, *years) {
            Some(cutoff) => AccountFilter::BornOnOrBefore(Birthdate::new(cutoff)),
            None => AccountFilter::Nobody,
        },
    }
}

/// Latest birthdate that is at least `years` old on `today`.
///
/// Month arithmetic clamps Feb 29 to Feb 28 in non-leap target years, which
/// keeps leap-day birthdays out until March 1.
fn birthdate_cutoff(today: NaiveDate, years: u32) -> Option<NaiveDate> {
    let months = years.checked_mul(12)?;
    today.checked_sub_months(Months::new(months))
}

#[cfg(test)]
mod tests {
    use super::{birthdate_cutoff, dispatch, Criterion};
    use crate::query::QueryError;
    use crate::repo::account_repo::AccountFilter;
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn absent_name_means_unfiltered() {
        assert_eq!(Criterion::parse(None, Some("x")).unwrap(), None);
        assert_eq!(Criterion::parse(Some("  "), None).unwrap(), None);
        let filter = dispatch(None, date(2024, 1, 1));
        assert_eq!(filter, AccountFilter::All);
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = Criterion::parse(Some("byShoeSize"), Some("42")).unwrap_err();
        assert_eq!(err, QueryError::UnsupportedCriterion("byShoeSize".to_string()));
    }

    #[test]
    fn known_name_without_value_is_rejected() {
        for name in ["byEmailDomain", "byLastname", "byMinimumAge"] {
            let err = Criterion::parse(Some(name), None).unwrap_err();
            assert_eq!(err, QueryError::MissingCriterionValue(name));
            let err = Criterion::parse(Some(name), Some("   ")).unwrap_err();
            assert_eq!(err, QueryError::MissingCriterionValue(name));
        }
    }

    #[test]
    fn minimum_age_must_be_a_non_negative_integer() {
        for value in ["abc", "-3", "12.5"] {
            let err = Criterion::parse(Some("byMinimumAge"), Some(value)).unwrap_err();
            assert!(matches!(err, QueryError::InvalidCriterionValue { .. }), "{value}");
        }
        assert_eq!(
            Criterion::parse(Some("byMinimumAge"), Some("18")).unwrap(),
            Some(Criterion::MinimumAge(18))
        );
    }

    #[test]
    fn email_domain_tolerates_leading_at() {
        assert_eq!(
            Criterion::parse(Some("byEmailDomain"), Some("@example.com")).unwrap(),
            Some(Criterion::EmailDomain("example.com".to_string()))
        );
    }

    #[test]
    fn last_name_keeps_surrounding_whitespace() {
        assert_eq!(
            Criterion::parse(Some("byLastname"), Some("Smith ")).unwrap(),
            Some(Criterion::LastName("Smith ".to_string()))
        );
        assert_eq!(
            Criterion::parse(Some("byMinimumAge"), Some(" 18 ")).unwrap(),
            Some(Criterion::MinimumAge(18))
        );
    }

    #[test]
    fn unreachable_age_selects_nobody() {
        let today = date(2024, 6, 15);
        assert_eq!(
            dispatch(Some(&Criterion::MinimumAge(1_000_000)), today),
            AccountFilter::Nobody
        );
        assert_eq!(
            dispatch(Some(&Criterion::MinimumAge(u32::MAX)), today),
            AccountFilter::Nobody
        );
        assert!(matches!(
            dispatch(Some(&Criterion::MinimumAge(18)), today),
            AccountFilter::BornOnOrBefore(_)
        ));
    }

    #[test]
    fn age_cutoff_is_inclusive_and_leap_aware() {
        assert_eq!(birthdate_cutoff(date(2024, 6, 15), 18), Some(date(2006, 6, 15)));
        assert_eq!(birthdate_cutoff(date(2025, 2, 28), 1), Some(date(2024, 2, 28)));
        assert_eq!(birthdate_cutoff(date(2024, 2, 29), 1), Some(date(2023, 2, 28)));
        assert_eq!(birthdate_cutoff(date(2024, 2, 29), 0), Some(date(2024, 2, 29)));
    }
}
