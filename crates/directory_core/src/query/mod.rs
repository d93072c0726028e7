//! Read-side query composition: pagination windows and named filter criteria.
//!
//! # Responsibility
//! - Turn raw paging/criterion inputs into typed store queries.
//! - Reject bad inputs before any store call.
//!
//! # Invariants
//! - Filtering and pagination always reach the store as one statement.
//! - Paged reads are ordered by the entity's natural key ascending.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod criteria;
pub mod pagination;

pub type QueryResult<T> = Result<T, QueryError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Page index/size missing, non-integer or out of range.
    InvalidPagination(String),
    /// Criterion name is outside the supported set.
    UnsupportedCriterion(String),
    /// Recognized criterion supplied without a value.
    MissingCriterionValue(&'static str),
    /// Recognized criterion with a value of the wrong shape.
    InvalidCriterionValue {
        criterion: &'static str,
        value: String,
    },
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPagination(reason) => write!(f, "invalid pagination parameters: {reason}"),
            Self::UnsupportedCriterion(name) => write!(f, "unsupported criterion `{name}`"),
            Self::MissingCriterionValue(name) => write!(f, "value is required for {name}"),
            Self::InvalidCriterionValue { criterion, value } => {
                write!(f, "invalid value `{value}` for {criterion}")
            }
        }
    }
}

impl Error for QueryError {}
