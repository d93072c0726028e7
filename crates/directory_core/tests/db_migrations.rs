use directory_core::db::migrations::{apply_migrations, current_version, latest_version};
use directory_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_version(&conn).unwrap(), latest_version());
    for table in ["account_users", "developers", "applications", "tracked_users"] {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn foreign_keys_are_enforced_on_opened_connections() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("directory.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO developers (email, name, api_key, password_hash, created_at)
             VALUES ('dev@x.com', 'Dev', 'ak_1', 'salt$digest', 0);",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(current_version(&conn_second).unwrap(), latest_version());
    let developers: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM developers;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(developers, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn failed_migration_rolls_back_the_whole_run() {
    let mut conn = Connection::open_in_memory().unwrap();
    // A view squatting on the table name makes the index in migration 3 fail.
    conn.execute_batch("CREATE VIEW tracked_users AS SELECT 1 AS user_id;")
        .unwrap();

    let err = apply_migrations(&mut conn).unwrap_err();
    match err {
        DbError::Migration { version, .. } => assert_eq!(version, 3),
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(current_version(&conn).unwrap(), 0);
    let account_tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'account_users';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(account_tables, 0);
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
