//! Developer use-case service.
//!
//! # Responsibility
//! - Register developers and read them back without credentials.
//! - List the applications a developer owns.

use crate::clock::Clock;
use crate::model::application::Application;
use crate::model::credential::PasswordHash;
use crate::model::developer::{generate_api_key, DeveloperRecord, DeveloperView, NewDeveloper};
use crate::model::EntityKind;
use crate::repo::application_repo::ApplicationRepository;
use crate::repo::developer_repo::DeveloperRepository;
use crate::service::error::{DirectoryError, DirectoryResult};
use crate::service::integrity::CreationGuard;
use crate::validation::{check_email, check_non_blank};
use log::info;

pub struct DeveloperService<D: DeveloperRepository, A: ApplicationRepository, C: Clock> {
    developers: D,
    applications: A,
    clock: C,
}

impl<D, A, C> DeveloperService<D, A, C>
where
    D: DeveloperRepository,
    A: ApplicationRepository,
    C: Clock,
{
    pub fn new(developers: D, applications: A, clock: C) -> Self {
        Self {
            developers,
            applications,
            clock,
        }
    }

    /// Registers a developer, generating an API key when none is supplied.
    ///
    /// # Errors
    /// - `ValidationFailed` for a malformed email or blank name/password.
    /// - `DuplicateEntity` when the email (or supplied API key) is taken.
    pub fn register_developer(&self, input: NewDeveloper) -> DirectoryResult<DeveloperView> {
        check_email("email", &input.email)?;
        check_non_blank("name", &input.name)?;
        check_non_blank("password", &input.password)?;

        CreationGuard::new()
            .require_unique(EntityKind::Developer, input.email.as_str(), || {
                self.developers.developer_exists(&input.email)
            })
            .verify()?;

        let api_key = input
            .api_key
            .filter(|key| !key.trim().is_empty())
            .unwrap_or_else(generate_api_key);
        let record = DeveloperRecord {
            password_hash: PasswordHash::derive(&input.password),
            email: input.email,
            name: input.name,
            api_key,
            created_at: self.clock.now_ms(),
        };
        self.developers.create_developer(&record)?;
        info!("event=developer_register module=service status=ok");
        Ok(record.to_view())
    }

    pub fn get_developer(&self, email: &str) -> DirectoryResult<DeveloperView> {
        self.developers
            .get_developer(email)?
            .map(|record| record.to_view())
            .ok_or_else(|| DirectoryError::NotFound {
                entity: EntityKind::Developer,
                key: email.to_string(),
            })
    }

    /// Lists the applications owned by a developer, ordered by `app_id`.
    ///
    /// An existing developer with no applications yields an empty list.
    pub fn list_applications(&self, email: &str) -> DirectoryResult<Vec<Application>> {
        check_email("email", email)?;
        if !self.developers.developer_exists(email)? {
            return Err(DirectoryError::NotFound {
                entity: EntityKind::Developer,
                key: email.to_string(),
            });
        }
        Ok(self.applications.list_applications_by_developer(email)?)
    }
}
