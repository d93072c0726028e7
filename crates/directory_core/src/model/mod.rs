//! Directory domain model.
//!
//! # Responsibility
//! - Define storage records and caller-facing read models per entity kind.
//! - Keep credential material out of every read model by construction.
//!
//! # Invariants
//! - Account users and tracked end-users are distinct kinds with separate
//!   tables; they never share a storage shape.
//! - Read models (`*View`, `Application`, `TrackedUser`) carry no password
//!   field and render birthdates in display form only.

use std::fmt::{Display, Formatter};

pub mod account;
pub mod application;
pub mod birthdate;
pub mod credential;
pub mod developer;
pub mod end_user;

/// Closed set of entity kinds known to the directory.
///
/// Used to name the offending entity in integrity and lookup errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Developer,
    Application,
    AccountUser,
    TrackedUser,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Developer => "developer",
            Self::Application => "application",
            Self::AccountUser => "account_user",
            Self::TrackedUser => "tracked_user",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
