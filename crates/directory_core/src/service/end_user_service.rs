//! Tracked end-user use-case service.
//!
//! # Responsibility
//! - Start tracking SDK subjects per application, read, patch, touch,
//!   delete and list them.
//!
//! # Invariants
//! - The owning application is checked before `(userId, appId)` uniqueness.
//! - Identity fields are never patched.
//! - `last_seen >= first_seen` after every write.

use crate::clock::Clock;
use crate::model::end_user::{NewTrackedUser, TrackedUser, TrackedUserKey, TrackedUserPatch};
use crate::model::EntityKind;
use crate::query::pagination::PageWindow;
use crate::repo::application_repo::ApplicationRepository;
use crate::repo::end_user_repo::EndUserRepository;
use crate::service::error::{DirectoryError, DirectoryResult};
use crate::service::integrity::CreationGuard;
use crate::validation::check_non_blank;
use log::info;

pub struct EndUserService<U: EndUserRepository, A: ApplicationRepository, C: Clock> {
    users: U,
    applications: A,
    clock: C,
}

impl<U, A, C> EndUserService<U, A, C>
where
    U: EndUserRepository,
    A: ApplicationRepository,
    C: Clock,
{
    pub fn new(users: U, applications: A, clock: C) -> Self {
        Self {
            users,
            applications,
            clock,
        }
    }

    /// Starts tracking a user within an application.
    ///
    /// `first_seen` defaults to now; `last_seen` starts equal to `first_seen`.
    pub fn track(&self, input: NewTrackedUser) -> DirectoryResult<TrackedUser> {
        check_non_blank("userId", &input.user_id)?;
        check_non_blank("appId", &input.app_id)?;

        let key = TrackedUserKey::new(input.user_id.as_str(), input.app_id.as_str());
        CreationGuard::new()
            .require_reference(EntityKind::Application, key.app_id.as_str(), || {
                self.applications.application_exists(&key.app_id)
            })
            .require_unique(EntityKind::TrackedUser, key.to_string(), || {
                self.users.tracked_user_exists(&key)
            })
            .verify()?;

        let first_seen = input.first_seen.unwrap_or_else(|| self.clock.now_ms());
        let user = TrackedUser {
            user_id: input.user_id,
            app_id: input.app_id,
            first_seen,
            last_seen: first_seen,
        };
        self.users.create_tracked_user(&user)?;
        info!("event=end_user_track module=service status=ok");
        Ok(user)
    }

    pub fn get(&self, key: &TrackedUserKey) -> DirectoryResult<TrackedUser> {
        self.users
            .get_tracked_user(key)?
            .ok_or_else(|| not_found(key))
    }

    /// Applies a timestamp patch.
    ///
    /// # Errors
    /// - `ValidationFailed` when the result would have `lastSeen < firstSeen`.
    /// - `NotFound` when the user is not tracked.
    pub fn update(&self, key: &TrackedUserKey, patch: TrackedUserPatch) -> DirectoryResult<TrackedUser> {
        let mut user = self.get(key)?;
        user.apply(patch);
        if !user.has_valid_timeline() {
            return Err(DirectoryError::ValidationFailed {
                field: "lastSeen",
                reason: "must not precede firstSeen".to_string(),
            });
        }
        self.users.update_tracked_user(&user)?;
        Ok(user)
    }

    /// Records activity now: `last_seen` moves forward, never backward.
    pub fn touch(&self, key: &TrackedUserKey) -> DirectoryResult<TrackedUser> {
        let mut user = self.get(key)?;
        user.last_seen = user.last_seen.max(self.clock.now_ms());
        self.users.update_tracked_user(&user)?;
        Ok(user)
    }

    pub fn delete(&self, key: &TrackedUserKey) -> DirectoryResult<TrackedUser> {
        Ok(self.users.delete_tracked_user(key)?)
    }

    /// Lists one page of users tracked by an application, ordered by `user_id`.
    pub fn list_for_application(
        &self,
        app_id: &str,
        window: PageWindow,
    ) -> DirectoryResult<Vec<TrackedUser>> {
        if !self.applications.application_exists(app_id)? {
            return Err(DirectoryError::NotFound {
                entity: EntityKind::Application,
                key: app_id.to_string(),
            });
        }
        Ok(self.users.list_tracked_users(app_id, &window)?)
    }

    pub fn delete_all(&self) -> DirectoryResult<usize> {
        let removed = self.users.delete_all_tracked_users()?;
        info!("event=end_user_wipe module=service status=ok removed={removed}");
        Ok(removed)
    }
}

fn not_found(key: &TrackedUserKey) -> DirectoryError {
    DirectoryError::NotFound {
        entity: EntityKind::TrackedUser,
        key: key.to_string(),
    }
}
