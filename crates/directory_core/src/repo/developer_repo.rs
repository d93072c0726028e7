//! Developer repository contract and SQLite implementation.
//!
//! Developers are create/read only.

use crate::model::credential::PasswordHash;
use crate::model::developer::DeveloperRecord;
use crate::model::EntityKind;
use crate::repo::{violated_constraint, Constraint, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

/// Repository interface for developers.
pub trait DeveloperRepository {
    /// Inserts one developer; `Duplicate` when the email or API key is taken.
    fn create_developer(&self, record: &DeveloperRecord) -> RepoResult<()>;
    fn get_developer(&self, email: &str) -> RepoResult<Option<DeveloperRecord>>;
    fn developer_exists(&self, email: &str) -> RepoResult<bool>;
}

/// SQLite-backed developer repository.
pub struct SqliteDeveloperRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDeveloperRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl DeveloperRepository for SqliteDeveloperRepository<'_> {
    fn create_developer(&self, record: &DeveloperRecord) -> RepoResult<()> {
        let result = self.conn.execute(
            "INSERT INTO developers (
                email,
                name,
                api_key,
                password_hash,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                record.email.as_str(),
                record.name.as_str(),
                record.api_key.as_str(),
                record.password_hash.as_str(),
                record.created_at,
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(err) if violated_constraint(&err) == Some(Constraint::Unique) => {
                // The key itself is a credential; name the column, not the value.
                let key = if is_api_key_conflict(&err) {
                    "api_key".to_string()
                } else {
                    record.email.clone()
                };
                Err(RepoError::Duplicate {
                    entity: EntityKind::Developer,
                    key,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn get_developer(&self, email: &str) -> RepoResult<Option<DeveloperRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT email, name, api_key, password_hash, created_at
             FROM developers
             WHERE email = ?1;",
        )?;
        let mut rows = stmt.query([email])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_developer_row(row)?));
        }
        Ok(None)
    }

    fn developer_exists(&self, email: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM developers WHERE email = ?1);",
            [email],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn parse_developer_row(row: &Row<'_>) -> RepoResult<DeveloperRecord> {
    Ok(DeveloperRecord {
        email: row.get("email")?,
        name: row.get("name")?,
        api_key: row.get("api_key")?,
        password_hash: PasswordHash::from_stored(row.get("password_hash")?),
        created_at: row.get("created_at")?,
    })
}

fn is_api_key_conflict(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(_, Some(message)) if message.contains("developers.api_key")
    )
}
