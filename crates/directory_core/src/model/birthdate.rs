//! Birthdate value type and display formatting.
//!
//! # Responsibility
//! - Parse birthdates from caller input (`DD-MM-YYYY`) and storage (`YYYY-MM-DD`).
//! - Render the fixed display form on every read path.
//!
//! # Invariants
//! - Storage form is ISO `YYYY-MM-DD`, so lexical order equals date order.
//! - Display form is `DD-MM-YYYY` with zero-padded day and month.
//! - Day/month validity comes from calendar arithmetic (`chrono`), so leap
//!   years are respected.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

static DISPLAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2})-(\d{2})-(\d{4})$").expect("valid display date regex"));
static STORAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid storage date regex"));

/// Calendar date of birth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Birthdate(NaiveDate);

impl Birthdate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parses the caller-facing `DD-MM-YYYY` form.
    ///
    /// Returns `None` for malformed input or impossible dates; never panics.
    pub fn parse_display(value: &str) -> Option<Self> {
        let caps = DISPLAY_RE.captures(value)?;
        let day = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let year = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Parses the canonical `YYYY-MM-DD` storage form.
    pub fn parse_storage(value: &str) -> Option<Self> {
        let caps = STORAGE_RE.captures(value)?;
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    pub fn to_display(self) -> String {
        format!(
            "{:02}-{:02}-{:04}",
            self.0.day(),
            self.0.month(),
            self.0.year()
        )
    }

    pub fn to_storage(self) -> String {
        format!(
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl Display for Birthdate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_display())
    }
}

/// Renders a stored or already-displayed birthdate in display form.
///
/// Accepts either representation so formatting is idempotent; returns `None`
/// when the value is neither.
pub fn format_birthdate(value: &str) -> Option<String> {
    Birthdate::parse_storage(value)
        .or_else(|| Birthdate::parse_display(value))
        .map(Birthdate::to_display)
}
