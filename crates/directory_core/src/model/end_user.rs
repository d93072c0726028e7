//! Tracked end-user model.
//!
//! # Responsibility
//! - Describe SDK subjects observed by one application.
//!
//! # Invariants
//! - Identity is the composite `(user_id, app_id)`; `user_id` alone is not
//!   globally unique.
//! - `last_seen >= first_seen`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Composite identity of a tracked end-user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedUserKey {
    pub user_id: String,
    pub app_id: String,
}

impl TrackedUserKey {
    pub fn new(user_id: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            app_id: app_id.into(),
        }
    }
}

impl Display for TrackedUserKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.app_id, self.user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrackedUser {
    pub user_id: String,
    pub app_id: String,
    /// Defaults to the service clock when absent.
    #[serde(default)]
    pub first_seen: Option<i64>,
}

/// Partial update over the timestamps; identity fields are not patchable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackedUserPatch {
    pub first_seen: Option<i64>,
    pub last_seen: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedUser {
    pub user_id: String,
    pub app_id: String,
    /// Unix epoch milliseconds.
    pub first_seen: i64,
    /// Unix epoch milliseconds.
    pub last_seen: i64,
}

impl TrackedUser {
    pub fn key(&self) -> TrackedUserKey {
        TrackedUserKey::new(self.user_id.clone(), self.app_id.clone())
    }

    /// Applies a patch, leaving identity untouched.
    pub fn apply(&mut self, patch: TrackedUserPatch) {
        if let Some(first_seen) = patch.first_seen {
            self.first_seen = first_seen;
        }
        if let Some(last_seen) = patch.last_seen {
            self.last_seen = last_seen;
        }
    }

    pub fn has_valid_timeline(&self) -> bool {
        self.last_seen >= self.first_seen
    }
}
