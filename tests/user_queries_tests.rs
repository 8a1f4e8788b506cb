mod common;

use common::{TestApp, unique_suffix};
use foodbank::{
    Error, database,
    models::users::{NewUser, UserRole},
    queries::users,
    services::users::{hash_password, verify_password},
};

fn new_user(suffix: &str, password_hash: String) -> NewUser {
    NewUser {
        username: format!("query_{}", suffix),
        email: format!("query_{}@example.com", suffix),
        password_hash,
        full_name: "Query User".to_string(),
        phone: None,
        role: UserRole::Recipient,
    }
}

#[tokio::test]
async fn test_create_and_fetch_user() {
    let app = TestApp::new().await;
    let mut conn = database::acquire(&app.pool).await.unwrap();
    let suffix = unique_suffix();

    let hash = hash_password("secret123", &app.config.password).unwrap();
    let created = users::create_user(&mut conn, new_user(&suffix, hash)).await.unwrap();

    assert_eq!(created.role, UserRole::Recipient);
    assert!(created.is_active);
    assert!(!created.is_verified);
    assert!(created.last_login.is_none());
    assert!(verify_password("secret123", &created.password_hash));

    let by_name = users::get_user_by_username(&mut conn, &created.username)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_name.id, created.id);

    let by_email = users::get_user_by_email(&mut conn, &created.email.to_uppercase())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, created.id);

    assert!(users::get_user_by_id(&mut conn, i64::MAX).await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_username_is_conflict() {
    let app = TestApp::new().await;
    let mut conn = database::acquire(&app.pool).await.unwrap();
    let suffix = unique_suffix();

    let hash = hash_password("secret123", &app.config.password).unwrap();
    users::create_user(&mut conn, new_user(&suffix, hash.clone())).await.unwrap();

    let mut duplicate = new_user(&suffix, hash);
    duplicate.email = format!("different_{}@example.com", suffix);
    let err = users::create_user(&mut conn, duplicate).await.unwrap_err();

    match err {
        Error::Conflict(msg) => assert_eq!(msg, "Username already exists"),
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let app = TestApp::new().await;
    let mut conn = database::acquire(&app.pool).await.unwrap();
    let suffix = unique_suffix();

    let hash = hash_password("secret123", &app.config.password).unwrap();
    users::create_user(&mut conn, new_user(&suffix, hash.clone())).await.unwrap();

    let mut duplicate = new_user(&suffix, hash);
    duplicate.username = format!("different_{}", suffix);
    let err = users::create_user(&mut conn, duplicate).await.unwrap_err();

    match err {
        Error::Conflict(msg) => assert_eq!(msg, "Email already exists"),
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[tokio::test]
async fn test_touch_last_login() {
    let app = TestApp::new().await;
    let mut conn = database::acquire(&app.pool).await.unwrap();

    let hash = hash_password("secret123", &app.config.password).unwrap();
    let user = users::create_user(&mut conn, new_user(&unique_suffix(), hash)).await.unwrap();

    users::touch_last_login(&mut conn, user.id).await.unwrap();

    let reloaded = users::get_user_by_id(&mut conn, user.id).await.unwrap().unwrap();
    assert!(reloaded.last_login.is_some());
}
