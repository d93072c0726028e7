use directory_core::db::open_db_in_memory;
use directory_core::{
    ApplicationService, DeveloperService, DirectoryError, EndUserService, EntityKind, FixedClock,
    NewApplication, NewDeveloper, NewTrackedUser, PageWindow, SqliteApplicationRepository,
    SqliteDeveloperRepository, SqliteEndUserRepository, TrackedUserKey, TrackedUserPatch,
};
use rusqlite::Connection;

const NOW_MS: i64 = 1_718_409_600_000;

fn clock() -> FixedClock {
    FixedClock::at_millis(NOW_MS).unwrap()
}

fn seed_application(conn: &Connection, app_id: &str) {
    let developers = DeveloperService::new(
        SqliteDeveloperRepository::new(conn),
        SqliteApplicationRepository::new(conn),
        clock(),
    );
    if developers.get_developer("dev@x.com").is_err() {
        developers
            .register_developer(NewDeveloper {
                email: "dev@x.com".to_string(),
                name: "Dev".to_string(),
                api_key: None,
                password: "pw123".to_string(),
            })
            .unwrap();
    }
    ApplicationService::new(
        SqliteApplicationRepository::new(conn),
        SqliteDeveloperRepository::new(conn),
        clock(),
    )
    .register_application(NewApplication {
        app_id: app_id.to_string(),
        developer_email: "dev@x.com".to_string(),
        name: app_id.to_string(),
        description: None,
    })
    .unwrap();
}

fn service(
    conn: &Connection,
) -> EndUserService<SqliteEndUserRepository<'_>, SqliteApplicationRepository<'_>, FixedClock> {
    EndUserService::new(
        SqliteEndUserRepository::new(conn),
        SqliteApplicationRepository::new(conn),
        clock(),
    )
}

fn track(user_id: &str, app_id: &str) -> NewTrackedUser {
    NewTrackedUser {
        user_id: user_id.to_string(),
        app_id: app_id.to_string(),
        first_seen: None,
    }
}

#[test]
fn tracking_defaults_timestamps_to_now() {
    let conn = open_db_in_memory().unwrap();
    seed_application(&conn, "app-1");

    let user = service(&conn).track(track("u-1", "app-1")).unwrap();
    assert_eq!(user.first_seen, NOW_MS);
    assert_eq!(user.last_seen, NOW_MS);

    let fetched = service(&conn)
        .get(&TrackedUserKey::new("u-1", "app-1"))
        .unwrap();
    assert_eq!(fetched, user);
}

#[test]
fn same_user_id_may_appear_under_different_applications() {
    let conn = open_db_in_memory().unwrap();
    seed_application(&conn, "app-1");
    seed_application(&conn, "app-2");
    let service = service(&conn);

    service.track(track("u-1", "app-1")).unwrap();
    service.track(track("u-1", "app-2")).unwrap();

    let duplicate = service.track(track("u-1", "app-1")).unwrap_err();
    assert!(matches!(
        duplicate,
        DirectoryError::DuplicateEntity { entity: EntityKind::TrackedUser, ref key } if key == "app-1/u-1"
    ));
}

#[test]
fn tracking_requires_existing_application() {
    let conn = open_db_in_memory().unwrap();
    let err = service(&conn).track(track("u-1", "missing")).unwrap_err();
    assert!(matches!(
        err,
        DirectoryError::ReferenceNotFound { entity: EntityKind::Application, ref key } if key == "missing"
    ));

    let blank = service(&conn).track(track(" ", "missing")).unwrap_err();
    assert!(matches!(blank, DirectoryError::ValidationFailed { field: "userId", .. }));
}

#[test]
fn update_keeps_last_seen_on_or_after_first_seen() {
    let conn = open_db_in_memory().unwrap();
    seed_application(&conn, "app-1");
    let service = service(&conn);
    service
        .track(NewTrackedUser {
            first_seen: Some(1_000),
            ..track("u-1", "app-1")
        })
        .unwrap();
    let key = TrackedUserKey::new("u-1", "app-1");

    let updated = service
        .update(
            &key,
            TrackedUserPatch {
                last_seen: Some(5_000),
                ..TrackedUserPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.first_seen, 1_000);
    assert_eq!(updated.last_seen, 5_000);

    let backwards = service
        .update(
            &key,
            TrackedUserPatch {
                last_seen: Some(500),
                ..TrackedUserPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(backwards, DirectoryError::ValidationFailed { field: "lastSeen", .. }));
    assert_eq!(service.get(&key).unwrap().last_seen, 5_000);
}

#[test]
fn touch_moves_last_seen_to_now() {
    let conn = open_db_in_memory().unwrap();
    seed_application(&conn, "app-1");
    let service = service(&conn);
    service
        .track(NewTrackedUser {
            first_seen: Some(1_000),
            ..track("u-1", "app-1")
        })
        .unwrap();

    let touched = service.touch(&TrackedUserKey::new("u-1", "app-1")).unwrap();
    assert_eq!(touched.first_seen, 1_000);
    assert_eq!(touched.last_seen, NOW_MS);
}

#[test]
fn delete_and_missing_keys() {
    let conn = open_db_in_memory().unwrap();
    seed_application(&conn, "app-1");
    let service = service(&conn);
    service.track(track("u-1", "app-1")).unwrap();
    let key = TrackedUserKey::new("u-1", "app-1");

    let removed = service.delete(&key).unwrap();
    assert_eq!(removed.user_id, "u-1");

    let again = service.delete(&key).unwrap_err();
    assert!(matches!(
        again,
        DirectoryError::NotFound { entity: EntityKind::TrackedUser, .. }
    ));
    assert!(service.get(&key).is_err());
    assert!(service.touch(&key).is_err());
}

#[test]
fn listing_is_scoped_to_one_application_and_paged() {
    let conn = open_db_in_memory().unwrap();
    seed_application(&conn, "app-1");
    seed_application(&conn, "app-2");
    let service = service(&conn);
    for user_id in ["u-3", "u-1", "u-2"] {
        service.track(track(user_id, "app-1")).unwrap();
    }
    service.track(track("u-9", "app-2")).unwrap();

    let first = service
        .list_for_application("app-1", PageWindow::new(0, 2).unwrap())
        .unwrap();
    let second = service
        .list_for_application("app-1", PageWindow::new(1, 2).unwrap())
        .unwrap();
    let ids: Vec<&str> = first
        .iter()
        .chain(second.iter())
        .map(|user| user.user_id.as_str())
        .collect();
    assert_eq!(ids, vec!["u-1", "u-2", "u-3"]);

    let unknown = service
        .list_for_application("nope", PageWindow::new(0, 2).unwrap())
        .unwrap_err();
    assert!(matches!(
        unknown,
        DirectoryError::NotFound { entity: EntityKind::Application, .. }
    ));
}

#[test]
fn wipe_removes_every_tracked_user() {
    let conn = open_db_in_memory().unwrap();
    seed_application(&conn, "app-1");
    let service = service(&conn);
    service.track(track("u-1", "app-1")).unwrap();
    service.track(track("u-2", "app-1")).unwrap();

    assert_eq!(service.delete_all().unwrap(), 2);
    assert!(service
        .list_for_application("app-1", PageWindow::new(0, 10).unwrap())
        .unwrap()
        .is_empty());
}
