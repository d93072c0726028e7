//! Referential-integrity pre-checks for entity creation.
//!
//! # Responsibility
//! - Confirm foreign-key parents exist and unique keys are free before a write.
//!
//! # Invariants
//! - All reference checks run before any uniqueness check, whatever order the
//!   checks were registered in; a request failing both reports the missing
//!   reference.
//! - Checks short-circuit on the first failure; later probes never run.
//! - Passing these checks does not guarantee the write succeeds: the store's
//!   own constraints still reject racing duplicates.

use crate::model::EntityKind;
use crate::repo::RepoResult;
use crate::service::error::{DirectoryError, DirectoryResult};
use log::debug;

type Probe<'a> = Box<dyn FnOnce() -> RepoResult<bool> + 'a>;

struct Check<'a> {
    entity: EntityKind,
    key: String,
    exists: Probe<'a>,
}

/// Ordered set of creation preconditions.
///
/// ```ignore
/// CreationGuard::new()
///     .require_reference(EntityKind::Developer, email, || developers.developer_exists(email))
///     .require_unique(EntityKind::Application, app_id, || applications.application_exists(app_id))
///     .verify()?;
/// ```
#[derive(Default)]
pub struct CreationGuard<'a> {
    references: Vec<Check<'a>>,
    uniques: Vec<Check<'a>>,
}

impl<'a> CreationGuard<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a parent that must exist; `exists` reports its presence.
    pub fn require_reference<F>(mut self, entity: EntityKind, key: impl Into<String>, exists: F) -> Self
    where
        F: FnOnce() -> RepoResult<bool> + 'a,
    {
        self.references.push(Check {
            entity,
            key: key.into(),
            exists: Box::new(exists),
        });
        self
    }

    /// Registers a key that must be free; `exists` reports whether it is taken.
    pub fn require_unique<F>(mut self, entity: EntityKind, key: impl Into<String>, exists: F) -> Self
    where
        F: FnOnce() -> RepoResult<bool> + 'a,
    {
        self.uniques.push(Check {
            entity,
            key: key.into(),
            exists: Box::new(exists),
        });
        self
    }

    /// Runs reference checks, then uniqueness checks.
    ///
    /// # Errors
    /// - `ReferenceNotFound` naming the first missing parent.
    /// - `DuplicateEntity` naming the first taken key.
    /// - `StoreFailure` when a probe itself fails.
    pub fn verify(self) -> DirectoryResult<()> {
        for check in self.references {
            if !(check.exists)()? {
                debug!(
                    "event=integrity_check module=service status=rejected rule=reference entity={}",
                    check.entity
                );
                return Err(DirectoryError::ReferenceNotFound {
                    entity: check.entity,
                    key: check.key,
                });
            }
        }

        for check in self.uniques {
            if (check.exists)()? {
                debug!(
                    "event=integrity_check module=service status=rejected rule=unique entity={}",
                    check.entity
                );
                return Err(DirectoryError::DuplicateEntity {
                    entity: check.entity,
                    key: check.key,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::CreationGuard;
    use crate::model::EntityKind;
    use crate::repo::RepoError;
    use crate::service::error::DirectoryError;
    use std::cell::Cell;

    #[test]
    fn reference_failure_wins_over_duplicate_regardless_of_registration_order() {
        let err = CreationGuard::new()
            .require_unique(EntityKind::Application, "app-1", || Ok(true))
            .require_reference(EntityKind::Developer, "ghost@x.com", || Ok(false))
            .verify()
            .unwrap_err();
        assert!(matches!(
            err,
            DirectoryError::ReferenceNotFound { entity: EntityKind::Developer, ref key } if key == "ghost@x.com"
        ));
    }

    #[test]
    fn uniqueness_probe_is_skipped_after_reference_failure() {
        let probed = Cell::new(false);
        let _ = CreationGuard::new()
            .require_reference(EntityKind::Application, "app-1", || Ok(false))
            .require_unique(EntityKind::TrackedUser, "app-1/u1", || {
                probed.set(true);
                Ok(false)
            })
            .verify();
        assert!(!probed.get());
    }

    #[test]
    fn duplicate_reported_when_references_hold() {
        let err = CreationGuard::new()
            .require_reference(EntityKind::Developer, "dev@x.com", || Ok(true))
            .require_unique(EntityKind::Application, "app-1", || Ok(true))
            .verify()
            .unwrap_err();
        assert!(matches!(err, DirectoryError::DuplicateEntity { entity: EntityKind::Application, .. }));
    }

    #[test]
    fn probe_failure_is_a_store_failure() {
        let err = CreationGuard::new()
            .require_unique(EntityKind::AccountUser, "a@x.com", || {
                Err(RepoError::InvalidData("boom".to_string()))
            })
            .verify()
            .unwrap_err();
        assert!(matches!(err, DirectoryError::StoreFailure(_)));
    }

    #[test]
    fn empty_guard_passes() {
        CreationGuard::new().verify().unwrap();
    }
}
