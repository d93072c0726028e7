//! Application repository contract and SQLite implementation.
//!
//! # Invariants
//! - `developer_email` is enforced by a foreign key; a dangling reference
//!   surfaces as `MissingReference` even when the pre-check raced.
//! - Per-developer listing is ordered by `app_id ASC`.

use crate::model::application::Application;
use crate::model::EntityKind;
use crate::repo::{classify_insert_error, RepoResult};
use rusqlite::{params, Connection, Row};

const APPLICATION_SELECT_SQL: &str = "SELECT
    app_id,
    developer_email,
    name,
    description,
    created_at
FROM applications";

/// Repository interface for applications.
pub trait ApplicationRepository {
    fn create_application(&self, application: &Application) -> RepoResult<()>;
    fn get_application(&self, app_id: &str) -> RepoResult<Option<Application>>;
    fn application_exists(&self, app_id: &str) -> RepoResult<bool>;
    /// Lists applications owned by one developer.
    fn list_applications_by_developer(&self, developer_email: &str)
        -> RepoResult<Vec<Application>>;
}

/// SQLite-backed application repository.
pub struct SqliteApplicationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteApplicationRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ApplicationRepository for SqliteApplicationRepository<'_> {
    fn create_application(&self, application: &Application) -> RepoResult<()> {
        self.conn
            .execute(
                "INSERT INTO applications (
                    app_id,
                    developer_email,
                    name,
                    description,
                    created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    application.app_id.as_str(),
                    application.developer_email.as_str(),
                    application.name.as_str(),
                    application.description.as_deref(),
                    application.created_at,
                ],
            )
            .map_err(|err| {
                classify_insert_error(
                    err,
                    (EntityKind::Application, application.app_id.as_str()),
                    Some((EntityKind::Developer, application.developer_email.as_str())),
                )
            })?;
        Ok(())
    }

    fn get_application(&self, app_id: &str) -> RepoResult<Option<Application>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{APPLICATION_SELECT_SQL} WHERE app_id = ?1;"))?;
        let mut rows = stmt.query([app_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_application_row(row)?));
        }
        Ok(None)
    }

    fn application_exists(&self, app_id: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM applications WHERE app_id = ?1);",
            [app_id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn list_applications_by_developer(
        &self,
        developer_email: &str,
    ) -> RepoResult<Vec<Application>> {
        let mut stmt = self.conn.prepare(&format!(
            "{APPLICATION_SELECT_SQL} WHERE developer_email = ?1 ORDER BY app_id ASC;"
        ))?;
        let mut rows = stmt.query([developer_email])?;
        let mut applications = Vec::new();
        while let Some(row) = rows.next()? {
            applications.push(parse_application_row(row)?);
        }
        Ok(applications)
    }
}

fn parse_application_row(row: &Row<'_>) -> RepoResult<Application> {
    Ok(Application {
        app_id: row.get("app_id")?,
        developer_email: row.get("developer_email")?,
        name: row.get("name")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
    })
}
