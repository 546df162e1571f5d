use rusqlite::Connection;
use taskquest_core::db::migrations::latest_version;
use taskquest_core::db::open_db_in_memory;
use taskquest_core::{
    Profile, ProfileRepository, ProfileService, ProfileServiceError, RepoError,
    SqliteProfileRepository, DEFAULT_DAILY_GOAL,
};
use uuid::Uuid;

fn learner() -> Uuid {
    Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap()
}

#[test]
fn register_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let service = ProfileService::new(SqliteProfileRepository::try_new(&conn).unwrap());

    let created = service
        .register_profile(learner(), "learner@example.com", Some("Ada"))
        .unwrap();
    assert_eq!(created.level, 1);
    assert_eq!(created.daily_goal, DEFAULT_DAILY_GOAL);

    let loaded = service.profile(learner()).unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.display_name.as_deref(), Some("Ada"));
}

#[test]
fn duplicate_registration_is_rejected_by_the_store() {
    let conn = open_db_in_memory().unwrap();
    let service = ProfileService::new(SqliteProfileRepository::try_new(&conn).unwrap());

    service
        .register_profile(learner(), "learner@example.com", None)
        .unwrap();
    let err = service
        .register_profile(learner(), "learner@example.com", None)
        .unwrap_err();
    assert!(matches!(err, ProfileServiceError::Repo(RepoError::Db(_))));
}

#[test]
fn settings_updates_change_only_their_field() {
    let conn = open_db_in_memory().unwrap();
    let service = ProfileService::new(SqliteProfileRepository::try_new(&conn).unwrap());
    service
        .register_profile(learner(), "learner@example.com", None)
        .unwrap();

    service.set_display_name(learner(), Some("Ada")).unwrap();
    service.set_daily_goal(learner(), 7).unwrap();

    let loaded = service.profile(learner()).unwrap();
    assert_eq!(loaded.display_name.as_deref(), Some("Ada"));
    assert_eq!(loaded.daily_goal, 7);
    assert_eq!(loaded.total_xp, 0);
    assert_eq!(loaded.tasks_completed_today, 0);

    service.set_display_name(learner(), None).unwrap();
    assert_eq!(service.profile(learner()).unwrap().display_name, None);
}

#[test]
fn non_positive_daily_goal_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = ProfileService::new(SqliteProfileRepository::try_new(&conn).unwrap());
    service
        .register_profile(learner(), "learner@example.com", None)
        .unwrap();

    let err = service.set_daily_goal(learner(), 0).unwrap_err();
    assert!(matches!(err, ProfileServiceError::InvalidDailyGoal(0)));

    assert_eq!(
        service.profile(learner()).unwrap().daily_goal,
        DEFAULT_DAILY_GOAL
    );
}

#[test]
fn operations_on_missing_profiles_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = ProfileService::new(SqliteProfileRepository::try_new(&conn).unwrap());

    let err = service.profile(learner()).unwrap_err();
    assert!(matches!(err, ProfileServiceError::ProfileNotFound(id) if id == learner()));

    let err = service.set_daily_goal(learner(), 4).unwrap_err();
    assert!(matches!(err, ProfileServiceError::ProfileNotFound(id) if id == learner()));

    let err = service.set_display_name(learner(), Some("Ada")).unwrap_err();
    assert!(matches!(err, ProfileServiceError::ProfileNotFound(id) if id == learner()));
}

#[test]
fn overview_packages_derived_metrics() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProfileRepository::try_new(&conn).unwrap();

    let mut profile = Profile::new(learner(), "learner@example.com");
    profile.display_name = Some("Ada".to_string());
    profile.total_xp = 245;
    profile.level = 3;
    profile.daily_goal = 5;
    profile.tasks_completed_today = 7;
    repo.create_profile(&profile).unwrap();

    let service = ProfileService::new(repo);
    let overview = service.overview(learner()).unwrap();

    assert_eq!(overview.display_name.as_deref(), Some("Ada"));
    assert_eq!(overview.level, 3);
    assert_eq!(overview.total_xp, 245);
    assert_eq!(overview.xp_progress, 45);
    assert_eq!(overview.xp_to_next_level, 55);
    assert_eq!(overview.tasks_completed_today, 7);
    assert_eq!(overview.daily_goal, 5);
    assert_eq!(overview.daily_goal_percent, 100.0);
    assert!(overview.daily_goal_met);
}

#[test]
fn invalid_profile_is_blocked_before_persistence() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProfileRepository::try_new(&conn).unwrap();

    let mut invalid = Profile::new(learner(), "learner@example.com");
    invalid.total_xp = -10;

    let err = repo.create_profile(&invalid).unwrap_err();
    assert!(matches!(err, RepoError::ProfileValidation(_)));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteProfileRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_profiles_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteProfileRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("profiles"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_profiles_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE profiles (
            id TEXT PRIMARY KEY NOT NULL,
            email TEXT NOT NULL,
            display_name TEXT,
            total_xp INTEGER NOT NULL DEFAULT 0,
            level INTEGER NOT NULL DEFAULT 1,
            daily_goal INTEGER NOT NULL DEFAULT 3,
            tasks_completed_today INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL DEFAULT 0
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteProfileRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "profiles",
            column: "current_streak"
        })
    ));
}
