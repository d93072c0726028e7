//! Tracked end-user repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over `tracked_users`, keyed by `(user_id, app_id)`.
//! - Paged per-application listing.
//!
//! # Invariants
//! - The composite primary key is the last line of defense against
//!   duplicate tracking; violations surface as `Duplicate`.
//! - Per-application listing is ordered by `user_id ASC`.

use crate::model::end_user::{TrackedUser, TrackedUserKey};
use crate::model::EntityKind;
use crate::query::pagination::PageWindow;
use crate::repo::{classify_insert_error, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const TRACKED_USER_COLUMNS: &str = "user_id, app_id, first_seen, last_seen";

/// Repository interface for tracked end-users.
pub trait EndUserRepository {
    fn create_tracked_user(&self, user: &TrackedUser) -> RepoResult<()>;
    fn get_tracked_user(&self, key: &TrackedUserKey) -> RepoResult<Option<TrackedUser>>;
    fn tracked_user_exists(&self, key: &TrackedUserKey) -> RepoResult<bool>;
    /// Replaces the timestamps; `NotFound` when no row matches.
    fn update_tracked_user(&self, user: &TrackedUser) -> RepoResult<()>;
    fn delete_tracked_user(&self, key: &TrackedUserKey) -> RepoResult<TrackedUser>;
    fn list_tracked_users(&self, app_id: &str, window: &PageWindow)
        -> RepoResult<Vec<TrackedUser>>;
    fn delete_all_tracked_users(&self) -> RepoResult<usize>;
}

/// SQLite-backed tracked end-user repository.
pub struct SqliteEndUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEndUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EndUserRepository for SqliteEndUserRepository<'_> {
    fn create_tracked_user(&self, user: &TrackedUser) -> RepoResult<()> {
        let key = user.key().to_string();
        self.conn
            .execute(
                "INSERT INTO tracked_users (
                    user_id,
                    app_id,
                    first_seen,
                    last_seen
                ) VALUES (?1, ?2, ?3, ?4);",
                params![
                    user.user_id.as_str(),
                    user.app_id.as_str(),
                    user.first_seen,
                    user.last_seen,
                ],
            )
            .map_err(|err| {
                classify_insert_error(
                    err,
                    (EntityKind::TrackedUser, key.as_str()),
                    Some((EntityKind::Application, user.app_id.as_str())),
                )
            })?;
        Ok(())
    }

    fn get_tracked_user(&self, key: &TrackedUserKey) -> RepoResult<Option<TrackedUser>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TRACKED_USER_COLUMNS}
             FROM tracked_users
             WHERE user_id = ?1 AND app_id = ?2;"
        ))?;
        let mut rows = stmt.query(params![key.user_id.as_str(), key.app_id.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_tracked_user_row(row)?));
        }
        Ok(None)
    }

    fn tracked_user_exists(&self, key: &TrackedUserKey) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM tracked_users WHERE user_id = ?1 AND app_id = ?2
            );",
            params![key.user_id.as_str(), key.app_id.as_str()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn update_tracked_user(&self, user: &TrackedUser) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tracked_users
             SET first_seen = ?1, last_seen = ?2
             WHERE user_id = ?3 AND app_id = ?4;",
            params![
                user.first_seen,
                user.last_seen,
                user.user_id.as_str(),
                user.app_id.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::TrackedUser,
                key: user.key().to_string(),
            });
        }
        Ok(())
    }

    fn delete_tracked_user(&self, key: &TrackedUserKey) -> RepoResult<TrackedUser> {
        let mut stmt = self.conn.prepare(&format!(
            "DELETE FROM tracked_users
             WHERE user_id = ?1 AND app_id = ?2
             RETURNING {TRACKED_USER_COLUMNS};"
        ))?;
        let mut rows = stmt.query(params![key.user_id.as_str(), key.app_id.as_str()])?;
        let deleted = match rows.next()? {
            Some(row) => Some(parse_tracked_user_row(row)?),
            None => None,
        };
        deleted.ok_or_else(|| RepoError::NotFound {
            entity: EntityKind::TrackedUser,
            key: key.to_string(),
        })
    }

    fn list_tracked_users(
        &self,
        app_id: &str,
        window: &PageWindow,
    ) -> RepoResult<Vec<TrackedUser>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TRACKED_USER_COLUMNS}
             FROM tracked_users
             WHERE app_id = ?1
             ORDER BY user_id ASC
             LIMIT ?2 OFFSET ?3;"
        ))?;
        let mut rows = stmt.query(params![app_id, window.limit(), window.offset()])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_tracked_user_row(row)?);
        }
        Ok(users)
    }

    fn delete_all_tracked_users(&self) -> RepoResult<usize> {
        Ok(self.conn.execute("DELETE FROM tracked_users;", [])?)
    }
}

fn parse_tracked_user_row(row: &Row<'_>) -> RepoResult<TrackedUser> {
    let user = TrackedUser {
        user_id: row.get("user_id")?,
        app_id: row.get("app_id")?,
        first_seen: row.get("first_seen")?,
        last_seen: row.get("last_seen")?,
    };
    if !user.has_valid_timeline() {
        return Err(RepoError::InvalidData(format!(
            "last_seen precedes first_seen for tracked user {}",
            user.key()
        )));
    }
    Ok(user)
}
