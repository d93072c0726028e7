//! Account user use-case service.
//!
//! # Responsibility
//! - Registration, lookup, credential lookup, filtered listing, update,
//!   delete and bulk wipe for account users.
//!
//! # Invariants
//! - Field syntax is validated before any store call.
//! - Every returned account is an `AccountUserView`: no password, display-form
//!   birthdate.
//! - Listing resolves criterion and window first, then issues one store query.

use crate::clock::Clock;
use crate::model::account::{AccountPatch, AccountRecord, AccountUserView, NewAccountUser};
use crate::model::credential::PasswordHash;
use crate::model::EntityKind;
use crate::query::criteria::{dispatch, Criterion};
use crate::query::pagination::PageWindow;
use crate::repo::account_repo::{AccountListQuery, AccountRepository};
use crate::service::error::{DirectoryError, DirectoryResult};
use crate::service::integrity::CreationGuard;
use crate::validation::{
    check_birthdate, check_email, check_interests, check_non_blank, check_password,
};
use log::info;

/// Account service facade over repository implementations.
pub struct AccountService<R: AccountRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: AccountRepository, C: Clock> AccountService<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Registers a new account holder.
    ///
    /// # Errors
    /// - `ValidationFailed` for malformed email, weak password, impossible
    ///   birthdate, blank names or empty interests.
    /// - `DuplicateEntity` when the email is already registered.
    pub fn register(&self, input: NewAccountUser) -> DirectoryResult<AccountUserView> {
        check_email("email", &input.email)?;
        check_non_blank("name.first", &input.first_name)?;
        check_non_blank("name.last", &input.last_name)?;
        check_password("password", &input.password)?;
        let birthdate = check_birthdate("birthdate", &input.birthdate)?;
        check_interests("interests", &input.interests)?;

        CreationGuard::new()
            .require_unique(EntityKind::AccountUser, input.email.as_str(), || {
                self.repo.account_exists(&input.email)
            })
            .verify()?;

        let record = AccountRecord {
            password_hash: PasswordHash::derive(&input.password),
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            birthdate,
            interests: input.interests,
        };
        self.repo.create_account(&record)?;
        info!("event=account_register module=service status=ok");
        Ok(record.to_view())
    }

    pub fn get_by_email(&self, email: &str) -> DirectoryResult<AccountUserView> {
        self.load(email).map(|record| record.to_view())
    }

    /// Looks an account up by email and password.
    ///
    /// A wrong password is indistinguishable from an unknown email: both
    /// yield `NotFound`.
    pub fn get_by_credentials(&self, email: &str, password: &str) -> DirectoryResult<AccountUserView> {
        check_non_blank("email", email)?;
        check_non_blank("password", password)?;

        match self.repo.get_account(email)? {
            Some(record) if record.password_hash.verify(password) => Ok(record.to_view()),
            _ => Err(DirectoryError::NotFound {
                entity: EntityKind::AccountUser,
                key: email.to_string(),
            }),
        }
    }

    /// Lists accounts for one page, optionally narrowed by a criterion.
    pub fn list(
        &self,
        window: PageWindow,
        criterion: Option<&Criterion>,
    ) -> DirectoryResult<Vec<AccountUserView>> {
        let filter = dispatch(criterion, self.clock.today());
        let query = AccountListQuery { filter, window };
        let records = self.repo.list_accounts(&query)?;
        Ok(records.iter().map(AccountRecord::to_view).collect())
    }

    /// Lists accounts from raw transport parameters.
    ///
    /// Pagination and criterion are both validated before the store is hit.
    pub fn list_from_params(
        &self,
        page: &str,
        size: &str,
        criterion: Option<&str>,
        value: Option<&str>,
    ) -> DirectoryResult<Vec<AccountUserView>> {
        let window = PageWindow::parse(page, size)?;
        let criterion = Criterion::parse(criterion, value)?;
        self.list(window, criterion.as_ref())
    }

    /// Applies a partial update to non-identity fields.
    pub fn update(&self, email: &str, patch: AccountPatch) -> DirectoryResult<AccountUserView> {
        if patch.is_empty() {
            return Err(DirectoryError::ValidationFailed {
                field: "patch",
                reason: "at least one field must be provided".to_string(),
            });
        }
        if let Some(first_name) = patch.first_name.as_deref() {
            check_non_blank("name.first", first_name)?;
        }
        if let Some(last_name) = patch.last_name.as_deref() {
            check_non_blank("name.last", last_name)?;
        }
        if let Some(password) = patch.password.as_deref() {
            check_password("password", password)?;
        }
        let birthdate = patch
            .birthdate
            .as_deref()
            .map(|value| check_birthdate("birthdate", value))
            .transpose()?;
        if let Some(interests) = patch.interests.as_deref() {
            check_interests("interests", interests)?;
        }

        let mut record = self.load(email)?;
        if let Some(first_name) = patch.first_name {
            record.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            record.last_name = last_name;
        }
        if let Some(password) = patch.password.as_deref() {
            record.password_hash = PasswordHash::derive(password);
        }
        if let Some(birthdate) = birthdate {
            record.birthdate = birthdate;
        }
        if let Some(interests) = patch.interests {
            record.interests = interests;
        }

        self.repo.update_account(&record)?;
        Ok(record.to_view())
    }

    /// Deletes one account and returns its last state.
    pub fn delete(&self, email: &str) -> DirectoryResult<AccountUserView> {
        let record = self.repo.delete_account(email)?;
        info!("event=account_delete module=service status=ok");
        Ok(record.to_view())
    }

    /// Unconditionally removes every account.
    pub fn delete_all(&self) -> DirectoryResult<usize> {
        let removed = self.repo.delete_all_accounts()?;
        info!("event=account_wipe module=service status=ok removed={removed}");
        Ok(removed)
    }

    pub fn count(&self) -> DirectoryResult<u64> {
        Ok(self.repo.count_accounts()?)
    }

    fn load(&self, email: &str) -> DirectoryResult<AccountRecord> {
        self.repo
            .get_account(email)?
            .ok_or_else(|| DirectoryError::NotFound {
                entity: EntityKind::AccountUser,
                key: email.to_string(),
            })
    }
}
