use taskdeck_core::db::open_db_in_memory;
use taskdeck_core::repo::user_repo::{SqliteUserRepository, UserRepository};
use taskdeck_core::{AuthService, CoreConfig, ServiceError};

fn test_config() -> CoreConfig {
    CoreConfig::new("auth-flow-test-secret").unwrap()
}

#[test]
fn register_returns_profile_and_token_pair() {
    let conn = open_db_in_memory().unwrap();
    let config = test_config();
    let auth = AuthService::new(&conn, &config);

    let registered = auth
        .register("Ada", "ada@example.com", "hunter2")
        .unwrap();

    assert_eq!(registered.username, "Ada");
    assert_eq!(registered.email, "ada@example.com");
    assert_eq!(registered.token_type, "bearer");
    assert!(!registered.access_token.is_empty());
    assert!(!registered.refresh_token.is_empty());

    let header = format!("Bearer {}", registered.access_token);
    let user = auth.current_user(Some(&header)).unwrap();
    assert_eq!(user.id, registered.id);
}

#[test]
fn register_rejects_malformed_input() {
    let conn = open_db_in_memory().unwrap();
    let config = test_config();
    let auth = AuthService::new(&conn, &config);

    let blank_name = auth.register("   ", "a@b.c", "pw").unwrap_err();
    assert!(matches!(blank_name, ServiceError::Invalid(_)));

    let bad_email = auth.register("Ada", "not-an-email", "pw").unwrap_err();
    assert!(matches!(bad_email, ServiceError::Invalid(_)));

    let blank_password = auth.register("Ada", "a@b.c", "").unwrap_err();
    assert!(matches!(blank_password, ServiceError::Invalid(_)));
}

#[test]
fn duplicate_email_is_a_conflict() {
    let conn = open_db_in_memory().unwrap();
    let config = test_config();
    let auth = AuthService::new(&conn, &config);

    auth.register("Ada", "ada@example.com", "pw1").unwrap();
    let err = auth.register("Grace", "ada@example.com", "pw2").unwrap_err();

    assert!(matches!(err, ServiceError::Conflict(_)));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn login_succeeds_with_correct_credentials() {
    let conn = open_db_in_memory().unwrap();
    let config = test_config();
    let auth = AuthService::new(&conn, &config);

    let registered = auth.register("Ada", "ada@example.com", "hunter2").unwrap();
    let pair = auth.login("ada@example.com", "hunter2").unwrap();

    let header = format!("Bearer {}", pair.access_token);
    let user = auth.current_user(Some(&header)).unwrap();
    assert_eq!(user.id, registered.id);
}

#[test]
fn login_failures_collapse_to_unauthenticated() {
    let conn = open_db_in_memory().unwrap();
    let config = test_config();
    let auth = AuthService::new(&conn, &config);

    auth.register("Ada", "ada@example.com", "hunter2").unwrap();

    let wrong_password = auth.login("ada@example.com", "nope").unwrap_err();
    assert!(matches!(wrong_password, ServiceError::Unauthenticated));

    let unknown_email = auth.login("nobody@example.com", "hunter2").unwrap_err();
    assert!(matches!(unknown_email, ServiceError::Unauthenticated));
}

#[test]
fn stored_password_is_hashed() {
    let conn = open_db_in_memory().unwrap();
    let config = test_config();
    let auth = AuthService::new(&conn, &config);

    let registered = auth.register("Ada", "ada@example.com", "hunter2").unwrap();

    let stored = SqliteUserRepository::new(&conn)
        .get_user(registered.id)
        .unwrap()
        .unwrap();
    assert_ne!(stored.password_hash, "hunter2");
    assert!(stored.password_hash.starts_with("$argon2"));
}

#[test]
fn refresh_exchanges_token_for_new_access_token() {
    let conn = open_db_in_memory().unwrap();
    let config = test_config();
    let auth = AuthService::new(&conn, &config);

    let registered = auth.register("Ada", "ada@example.com", "hunter2").unwrap();
    let access = auth.refresh(&registered.refresh_token).unwrap();

    let header = format!("Bearer {access}");
    let user = auth.current_user(Some(&header)).unwrap();
    assert_eq!(user.id, registered.id);
}

#[test]
fn refresh_with_garbage_is_unauthenticated() {
    let conn = open_db_in_memory().unwrap();
    let config = test_config();
    let auth = AuthService::new(&conn, &config);

    let err = auth.refresh("not-a-token").unwrap_err();
    assert!(matches!(err, ServiceError::Unauthenticated));
}

#[test]
fn refresh_after_user_deletion_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let config = test_config();
    let auth = AuthService::new(&conn, &config);

    let registered = auth.register("Ada", "ada@example.com", "hunter2").unwrap();
    SqliteUserRepository::new(&conn)
        .delete_user(registered.id)
        .unwrap();

    let err = auth.refresh(&registered.refresh_token).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound("user")));
    assert_eq!(err.status_code(), 404);
}

#[test]
fn current_user_rejects_bad_headers() {
    let conn = open_db_in_memory().unwrap();
    let config = test_config();
    let auth = AuthService::new(&conn, &config);

    let registered = auth.register("Ada", "ada@example.com", "hunter2").unwrap();

    assert!(matches!(
        auth.current_user(None).unwrap_err(),
        ServiceError::Unauthenticated
    ));
    assert!(matches!(
        auth.current_user(Some("Basic abc")).unwrap_err(),
        ServiceError::Unauthenticated
    ));
    assert!(matches!(
        auth.current_user(Some(&registered.access_token)).unwrap_err(),
        ServiceError::Unauthenticated
    ));

    // Scheme matching is case-insensitive.
    let header = format!("bearer {}", registered.access_token);
    let user = auth.current_user(Some(&header)).unwrap();
    assert_eq!(user.id, registered.id);
}

#[test]
fn current_user_after_deletion_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let config = test_config();
    let auth = AuthService::new(&conn, &config);

    let registered = auth.register("Ada", "ada@example.com", "hunter2").unwrap();
    SqliteUserRepository::new(&conn)
        .delete_user(registered.id)
        .unwrap();

    let header = format!("Bearer {}", registered.access_token);
    let err = auth.current_user(Some(&header)).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound("user")));
}
