//! Developer model.
//!
//! Developers own applications. `email` is the identity; `api_key` is
//! generated when the caller does not supply one.

use crate::model::credential::PasswordHash;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const API_KEY_PREFIX: &str = "ak_";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeveloper {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub password: String,
}

/// Persisted developer row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeveloperRecord {
    pub email: String,
    pub name: String,
    pub api_key: String,
    pub password_hash: PasswordHash,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl DeveloperRecord {
    pub fn to_view(&self) -> DeveloperView {
        DeveloperView {
            email: self.email.clone(),
            name: self.name.clone(),
            api_key: self.api_key.clone(),
            created_at: self.created_at,
        }
    }
}

/// Caller-facing developer projection (no password digest).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperView {
    pub email: String,
    pub name: String,
    pub api_key: String,
    pub created_at: i64,
}

/// Generates a fresh opaque API key.
pub fn generate_api_key() -> String {
    format!("{API_KEY_PREFIX}{}", Uuid::new_v4().simple())
}
