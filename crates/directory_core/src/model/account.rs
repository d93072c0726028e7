//! Account user model.
//!
//! # Responsibility
//! - Describe self-registered account holders (credentials + profile).
//! - Project storage records into password-free read models.
//!
//! # Invariants
//! - `email` is the identity and never changes after registration.
//! - `interests` is non-empty and keeps caller order.
//! - `AccountUserView` has no password field and a display-form birthdate.

use crate::model::birthdate::Birthdate;
use crate::model::credential::PasswordHash;
use serde::{Deserialize, Serialize};

/// Registration input as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccountUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    /// `DD-MM-YYYY`.
    pub birthdate: String,
    pub interests: Vec<String>,
}

/// Partial update over non-identity fields. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
    /// `DD-MM-YYYY`.
    pub birthdate: Option<String>,
    pub interests: Option<Vec<String>>,
}

impl AccountPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.password.is_none()
            && self.birthdate.is_none()
            && self.interests.is_none()
    }
}

/// Persisted account row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: PasswordHash,
    pub birthdate: Birthdate,
    pub interests: Vec<String>,
}

impl AccountRecord {
    /// Strips credentials and renders the birthdate for callers.
    pub fn to_view(&self) -> AccountUserView {
        AccountUserView {
            email: self.email.clone(),
            name: PersonName {
                first: self.first_name.clone(),
                last: self.last_name.clone(),
            },
            birthdate: self.birthdate.to_display(),
            interests: self.interests.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonName {
    pub first: String,
    pub last: String,
}

/// Caller-facing account projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountUserView {
    pub email: String,
    pub name: PersonName,
    /// Always `DD-MM-YYYY`.
    pub birthdate: String,
    pub interests: Vec<String>,
}
