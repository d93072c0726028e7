//! Application use-case service.
//!
//! # Invariants
//! - The owning developer is checked before the `app_id` uniqueness check.
//! - `created_at` comes from the service clock.

use crate::clock::Clock;
use crate::model::application::{Application, NewApplication};
use crate::model::EntityKind;
use crate::repo::application_repo::ApplicationRepository;
use crate::repo::developer_repo::DeveloperRepository;
use crate::service::error::{DirectoryError, DirectoryResult};
use crate::service::integrity::CreationGuard;
use crate::validation::check_non_blank;
use log::info;

pub struct ApplicationService<A: ApplicationRepository, D: DeveloperRepository, C: Clock> {
    applications: A,
    developers: D,
    clock: C,
}

impl<A, D, C> ApplicationService<A, D, C>
where
    A: ApplicationRepository,
    D: DeveloperRepository,
    C: Clock,
{
    pub fn new(applications: A, developers: D, clock: C) -> Self {
        Self {
            applications,
            developers,
            clock,
        }
    }

    /// Registers an application under an existing developer.
    ///
    /// # Errors
    /// - `ValidationFailed` for blank `appId`, `developerEmail` or `name`.
    /// - `ReferenceNotFound` when the developer does not exist (reported even
    ///   if the `appId` is also taken).
    /// - `DuplicateEntity` when the `appId` is taken.
    pub fn register_application(&self, input: NewApplication) -> DirectoryResult<Application> {
        check_non_blank("appId", &input.app_id)?;
        check_non_blank("developerEmail", &input.developer_email)?;
        check_non_blank("name", &input.name)?;

        CreationGuard::new()
            .require_reference(EntityKind::Developer, input.developer_email.as_str(), || {
                self.developers.developer_exists(&input.developer_email)
            })
            .require_unique(EntityKind::Application, input.app_id.as_str(), || {
                self.applications.application_exists(&input.app_id)
            })
            .verify()?;

        let application = Application {
            app_id: input.app_id,
            developer_email: input.developer_email,
            name: input.name,
            description: input.description,
            created_at: self.clock.now_ms(),
        };
        self.applications.create_application(&application)?;
        info!("event=application_register module=service status=ok");
        Ok(application)
    }

    pub fn get_application(&self, app_id: &str) -> DirectoryResult<Application> {
        self.applications
            .get_application(app_id)?
            .ok_or_else(|| DirectoryError::NotFound {
                entity: EntityKind::Application,
                key: app_id.to_string(),
            })
    }
}
