//! Application model.
//!
//! # Invariants
//! - `app_id` is globally unique and caller-assigned.
//! - `developer_email` names an existing developer at creation time.
//! - `created_at` is assigned by the service clock, never by the caller.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub app_id: String,
    pub developer_email: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Persisted application row; carries no secrets, so it doubles as the read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub app_id: String,
    pub developer_email: String,
    pub name: String,
    pub description: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}
