//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define per-entity persistence contracts (create, get, exists, update,
//!   delete, list, wipe).
//! - Isolate SQL details from service orchestration.
//! - Classify SQLite constraint violations into semantic errors.
//!
//! # Invariants
//! - Every statement binds values as parameters; identifiers and values are
//!   never interpolated into SQL text.
//! - A unique/primary-key violation surfaces as `RepoError::Duplicate`, a
//!   foreign-key violation as `RepoError::MissingReference`.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::EntityKind;
use rusqlite::{ffi, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod account_repo;
pub mod application_repo;
pub mod developer_repo;
pub mod end_user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by every entity store.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound { entity: EntityKind, key: String },
    Duplicate { entity: EntityKind, key: String },
    MissingReference { entity: EntityKind, key: String },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::Duplicate { entity, key } => write!(f, "{entity} already exists: {key}"),
            Self::MissingReference { entity, key } => {
                write!(f, "referenced {entity} does not exist: {key}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Constraint family reported by SQLite for a failed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Constraint {
    Unique,
    ForeignKey,
}

/// Extracts the violated constraint family, if the error is one.
pub(crate) fn violated_constraint(err: &rusqlite::Error) -> Option<Constraint> {
    match err {
        rusqlite::Error::SqliteFailure(code, _) if code.code == ErrorCode::ConstraintViolation => {
            match code.extended_code {
                ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE => {
                    Some(Constraint::Unique)
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(Constraint::ForeignKey),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Converts a failed insert into a semantic error.
///
/// `own` names the row being written, `parent` the row its foreign key points
/// at (if any).
pub(crate) fn classify_insert_error(
    err: rusqlite::Error,
    own: (EntityKind, &str),
    parent: Option<(EntityKind, &str)>,
) -> RepoError {
    match (violated_constraint(&err), parent) {
        (Some(Constraint::Unique), _) => RepoError::Duplicate {
            entity: own.0,
            key: own.1.to_string(),
        },
        (Some(Constraint::ForeignKey), Some((entity, key))) => RepoError::MissingReference {
            entity,
            key: key.to_string(),
        },
        _ => err.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::{violated_constraint, Constraint};
    use rusqlite::Connection;

    #[test]
    fn constraint_families_are_recognized() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             CREATE TABLE parent (id TEXT PRIMARY KEY);
             CREATE TABLE child (id TEXT PRIMARY KEY, parent_id TEXT REFERENCES parent(id));
             INSERT INTO parent (id) VALUES ('p');",
        )
        .unwrap();

        let duplicate = conn
            .execute("INSERT INTO parent (id) VALUES (?1);", ["p"])
            .unwrap_err();
        assert_eq!(violated_constraint(&duplicate), Some(Constraint::Unique));

        let dangling = conn
            .execute(
                "INSERT INTO child (id, parent_id) VALUES (?1, ?2);",
                ["c", "missing"],
            )
            .unwrap_err();
        assert_eq!(violated_constraint(&dangling), Some(Constraint::ForeignKey));

        let syntax = conn.execute("INSERT INTO nowhere VALUES (1);", []).unwrap_err();
        assert_eq!(violated_constraint(&syntax), None);
    }
}
