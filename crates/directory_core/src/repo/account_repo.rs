//! Account user repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over `account_users`, plus filtered/paged listing and bulk wipe.
//!
//! # Invariants
//! - Listing is one statement: filter, `ORDER BY email ASC`, `LIMIT/OFFSET`.
//! - Text filters compare case-sensitively, like the `email` key itself.
//! - Birthdates are bound in storage form (`YYYY-MM-DD`); interests as JSON.
//! - Rows that fail to decode are reported as `InvalidData`.

use crate::model::account::AccountRecord;
use crate::model::birthdate::Birthdate;
use crate::model::credential::PasswordHash;
use crate::model::EntityKind;
use crate::query::pagination::PageWindow;
use crate::repo::{classify_insert_error, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const ACCOUNT_COLUMNS: &str = "email, first_name, last_name, password_hash, birthdate, interests";

/// Store-level account filters. Closed set; each maps to one `WHERE` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountFilter {
    All,
    /// `email` ends with `@<domain>` (case-sensitive).
    EmailDomain(String),
    /// Exact `last_name` match.
    LastName(String),
    /// `birthdate <= cutoff`.
    BornOnOrBefore(Birthdate),
    /// Matches no rows.
    Nobody,
}

/// Filtered, paged account listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountListQuery {
    pub filter: AccountFilter,
    pub window: PageWindow,
}

/// Repository interface for account users.
pub trait AccountRepository {
    /// Inserts one account; `Duplicate` when the email is taken.
    fn create_account(&self, record: &AccountRecord) -> RepoResult<()>;
    fn get_account(&self, email: &str) -> RepoResult<Option<AccountRecord>>;
    fn account_exists(&self, email: &str) -> RepoResult<bool>;
    /// Replaces all non-identity columns; `NotFound` when no row matches.
    fn update_account(&self, record: &AccountRecord) -> RepoResult<()>;
    /// Removes one account and returns the removed row.
    fn delete_account(&self, email: &str) -> RepoResult<AccountRecord>;
    fn list_accounts(&self, query: &AccountListQuery) -> RepoResult<Vec<AccountRecord>>;
    fn count_accounts(&self) -> RepoResult<u64>;
    /// Clears the table; dependents go with it through `ON DELETE CASCADE`.
    fn delete_all_accounts(&self) -> RepoResult<usize>;
}

/// SQLite-backed account repository.
pub struct SqliteAccountRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAccountRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AccountRepository for SqliteAccountRepository<'_> {
    fn create_account(&self, record: &AccountRecord) -> RepoResult<()> {
        let interests = encode_interests(&record.interests)?;
        self.conn
            .execute(
                "INSERT INTO account_users (
                    email,
                    first_name,
                    last_name,
                    password_hash,
                    birthdate,
                    interests
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    record.email.as_str(),
                    record.first_name.as_str(),
                    record.last_name.as_str(),
                    record.password_hash.as_str(),
                    record.birthdate.to_storage(),
                    interests,
                ],
            )
            .map_err(|err| {
                classify_insert_error(err, (EntityKind::AccountUser, record.email.as_str()), None)
            })?;
        Ok(())
    }

    fn get_account(&self, email: &str) -> RepoResult<Option<AccountRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM account_users WHERE email = ?1;"
        ))?;
        let mut rows = stmt.query([email])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_account_row(row)?));
        }
        Ok(None)
    }

    fn account_exists(&self, email: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM account_users WHERE email = ?1);",
            [email],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn update_account(&self, record: &AccountRecord) -> RepoResult<()> {
        let interests = encode_interests(&record.interests)?;
        let changed = self.conn.execute(
            "UPDATE account_users
             SET
                first_name = ?1,
                last_name = ?2,
                password_hash = ?3,
                birthdate = ?4,
                interests = ?5
             WHERE email = ?6;",
            params![
                record.first_name.as_str(),
                record.last_name.as_str(),
                record.password_hash.as_str(),
                record.birthdate.to_storage(),
                interests,
                record.email.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::AccountUser,
                key: record.email.clone(),
            });
        }
        Ok(())
    }

    fn delete_account(&self, email: &str) -> RepoResult<AccountRecord> {
        let mut stmt = self.conn.prepare(&format!(
            "DELETE FROM account_users WHERE email = ?1 RETURNING {ACCOUNT_COLUMNS};"
        ))?;
        let mut rows = stmt.query([email])?;
        let deleted = match rows.next()? {
            Some(row) => Some(parse_account_row(row)?),
            None => None,
        };
        deleted.ok_or_else(|| RepoError::NotFound {
            entity: EntityKind::AccountUser,
            key: email.to_string(),
        })
    }

    fn list_accounts(&self, query: &AccountListQuery) -> RepoResult<Vec<AccountRecord>> {
        let mut sql = format!("SELECT {ACCOUNT_COLUMNS} FROM account_users");
        let mut bind_values: Vec<Value> = Vec::new();

        match &query.filter {
            AccountFilter::All => {}
            AccountFilter::EmailDomain(domain) => {
                // Case-sensitive literal suffix.
                let suffix = domain_suffix(domain);
                sql.push_str(" WHERE substr(email, -length(?)) = ?");
                bind_values.push(Value::Text(suffix.clone()));
                bind_values.push(Value::Text(suffix));
            }
            AccountFilter::LastName(last_name) => {
                sql.push_str(" WHERE last_name = ?");
                bind_values.push(Value::Text(last_name.clone()));
            }
            AccountFilter::BornOnOrBefore(cutoff) => {
                sql.push_str(" WHERE birthdate <= ?");
                bind_values.push(Value::Text(cutoff.to_storage()));
            }
            AccountFilter::Nobody => sql.push_str(" WHERE 0"),
        }

        sql.push_str(" ORDER BY email ASC LIMIT ? OFFSET ?");
        bind_values.push(Value::Integer(query.window.limit()));
        bind_values.push(Value::Integer(query.window.offset()));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut accounts = Vec::new();
        while let Some(row) = rows.next()? {
            accounts.push(parse_account_row(row)?);
        }
        Ok(accounts)
    }

    fn count_accounts(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM account_users;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative account count {count}")))
    }

    fn delete_all_accounts(&self) -> RepoResult<usize> {
        Ok(self.conn.execute("DELETE FROM account_users;", [])?)
    }
}

fn parse_account_row(row: &Row<'_>) -> RepoResult<AccountRecord> {
    let email: String = row.get("email")?;

    let birthdate_text: String = row.get("birthdate")?;
    let birthdate = Birthdate::parse_storage(&birthdate_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid birthdate `{birthdate_text}` in account_users.birthdate"
        ))
    })?;

    let interests_text: String = row.get("interests")?;
    let interests = serde_json::from_str::<Vec<String>>(&interests_text).map_err(|err| {
        RepoError::InvalidData(format!("invalid interests json in account_users.interests: {err}"))
    })?;

    Ok(AccountRecord {
        email,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        password_hash: PasswordHash::from_stored(row.get("password_hash")?),
        birthdate,
        interests,
    })
}

fn encode_interests(interests: &[String]) -> RepoResult<String> {
    serde_json::to_string(interests)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode interests: {err}")))
}

/// `@<domain>`, the literal tail every matching email ends with.
fn domain_suffix(domain: &str) -> String {
    format!("@{domain}")
}
