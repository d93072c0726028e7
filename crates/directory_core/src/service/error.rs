//! Service-level error taxonomy.
//!
//! # Invariants
//! - Every kind except `StoreFailure` names the offending field or key.
//! - `StoreFailure` displays a generic message; the cause stays reachable
//!   through `Error::source` and is logged once at conversion time.
//! - Constraint violations raised by the store map onto the same kinds the
//!   integrity pre-checks produce.

use crate::model::EntityKind;
use crate::query::QueryError;
use crate::repo::RepoError;
use crate::validation::ValidationError;
use log::error;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type DirectoryResult<T> = Result<T, DirectoryError>;

#[derive(Debug)]
pub enum DirectoryError {
    /// Field syntax check failed.
    ValidationFailed { field: &'static str, reason: String },
    /// Foreign-key target is missing.
    ReferenceNotFound { entity: EntityKind, key: String },
    /// Uniqueness constraint would be violated.
    DuplicateEntity { entity: EntityKind, key: String },
    /// Lookup by primary/composite key missed.
    NotFound { entity: EntityKind, key: String },
    InvalidPagination(String),
    UnsupportedCriterion(String),
    MissingCriterionValue(String),
    /// Opaque persistence failure.
    StoreFailure(RepoError),
}

impl DirectoryError {
    /// Stable machine-readable kind, for callers mapping errors to transport codes.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ValidationFailed { .. } => "validation_failed",
            Self::ReferenceNotFound { .. } => "reference_not_found",
            Self::DuplicateEntity { .. } => "duplicate_entity",
            Self::NotFound { .. } => "not_found",
            Self::InvalidPagination(_) => "invalid_pagination",
            Self::UnsupportedCriterion(_) => "unsupported_criterion",
            Self::MissingCriterionValue(_) => "missing_criterion_value",
            Self::StoreFailure(_) => "store_failure",
        }
    }
}

impl Display for DirectoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ValidationFailed { field, reason } => write!(f, "invalid `{field}`: {reason}"),
            Self::ReferenceNotFound { entity, key } => {
                write!(f, "{entity} with key `{key}` does not exist")
            }
            Self::DuplicateEntity { entity, key } => {
                write!(f, "{entity} with key `{key}` already exists")
            }
            Self::NotFound { entity, key } => write!(f, "{entity} not found: `{key}`"),
            Self::InvalidPagination(reason) => write!(f, "invalid pagination parameters: {reason}"),
            Self::UnsupportedCriterion(name) => write!(f, "unsupported criterion `{name}`"),
            Self::MissingCriterionValue(name) => write!(f, "value is required for {name}"),
            Self::StoreFailure(_) => write!(f, "internal store failure"),
        }
    }
}

impl Error for DirectoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StoreFailure(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for DirectoryError {
    fn from(value: ValidationError) -> Self {
        Self::ValidationFailed {
            field: value.field,
            reason: value.reason,
        }
    }
}

impl From<QueryError> for DirectoryError {
    fn from(value: QueryError) -> Self {
        match value {
            QueryError::InvalidPagination(reason) => Self::InvalidPagination(reason),
            QueryError::UnsupportedCriterion(name) => Self::UnsupportedCriterion(name),
            QueryError::MissingCriterionValue(name) => Self::MissingCriterionValue(name.to_string()),
            QueryError::InvalidCriterionValue { criterion, value } => Self::ValidationFailed {
                field: "value",
                reason: format!("`{value}` is not a valid value for {criterion}"),
            },
        }
    }
}

impl From<RepoError> for DirectoryError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, key } => Self::NotFound { entity, key },
            RepoError::Duplicate { entity, key } => Self::DuplicateEntity { entity, key },
            RepoError::MissingReference { entity, key } => Self::ReferenceNotFound { entity, key },
            other => {
                error!(
                    "event=store_failure module=service status=error error_code=store_failure error={}",
                    other
                );
                Self::StoreFailure(other)
            }
        }
    }
}
