//! Field-syntax validation.
//!
//! # Responsibility
//! - Pure predicates for email, password and birthdate syntax.
//! - Field-named `ValidationError`s for service write paths.
//!
//! # Invariants
//! - Predicates never panic and fail closed on malformed input.
//! - Validation runs before any store call.

use crate::model::birthdate::Birthdate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const MIN_PASSWORD_CHARS: usize = 5;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Field-level syntax failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid `{}`: {}", self.field, self.reason)
    }
}

impl Error for ValidationError {}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// `local@domain.tld` shape: no whitespace or extra `@`, domain has a dot.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// At least five characters, at least one decimal digit.
pub fn is_valid_password(value: &str) -> bool {
    value.chars().count() >= MIN_PASSWORD_CHARS && value.chars().any(|c| c.is_ascii_digit())
}

/// `DD-MM-YYYY` naming a real calendar day.
pub fn is_valid_birthdate(value: &str) -> bool {
    Birthdate::parse_display(value).is_some()
}

pub fn check_email(field: &'static str, value: &str) -> ValidationResult<()> {
    if is_valid_email(value) {
        Ok(())
    } else {
        Err(ValidationError::new(field, "invalid email format"))
    }
}

pub fn check_password(field: &'static str, value: &str) -> ValidationResult<()> {
    if is_valid_password(value) {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            "password must be at least 5 characters long and contain at least one digit",
        ))
    }
}

pub fn check_birthdate(field: &'static str, value: &str) -> ValidationResult<Birthdate> {
    Birthdate::parse_display(value)
        .ok_or_else(|| ValidationError::new(field, "expected a calendar date as DD-MM-YYYY"))
}

pub fn check_non_blank(field: &'static str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        Err(ValidationError::new(field, "must not be blank"))
    } else {
        Ok(())
    }
}

pub fn check_interests(field: &'static str, values: &[String]) -> ValidationResult<()> {
    if values.is_empty() {
        return Err(ValidationError::new(field, "at least one interest is required"));
    }
    Ok(())
}
