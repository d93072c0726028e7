//! Core domain logic for the developer/application/user directory.
//! This crate is the single source of truth for integrity, query and
//! validation rules; transport layers call into it without adding logic.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::account::{AccountPatch, AccountRecord, AccountUserView, NewAccountUser, PersonName};
pub use model::application::{Application, NewApplication};
pub use model::birthdate::{format_birthdate, Birthdate};
pub use model::developer::{DeveloperView, NewDeveloper};
pub use model::end_user::{NewTrackedUser, TrackedUser, TrackedUserKey, TrackedUserPatch};
pub use model::EntityKind;
pub use query::criteria::Criterion;
pub use query::pagination::PageWindow;
pub use query::QueryError;
pub use repo::account_repo::{
    AccountFilter, AccountListQuery, AccountRepository, SqliteAccountRepository,
};
pub use repo::application_repo::{ApplicationRepository, SqliteApplicationRepository};
pub use repo::developer_repo::{DeveloperRepository, SqliteDeveloperRepository};
pub use repo::end_user_repo::{EndUserRepository, SqliteEndUserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::account_service::AccountService;
pub use service::application_service::ApplicationService;
pub use service::developer_service::DeveloperService;
pub use service::end_user_service::EndUserService;
pub use service::error::{DirectoryError, DirectoryResult};
pub use validation::{is_valid_birthdate, is_valid_email, is_valid_password};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
