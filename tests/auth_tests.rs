mod common;

use common::{TestApp, auth_header, register_user, unique_suffix};
use foodbank::services::jwt::{Claims, TokenType};
use jsonwebtoken::{EncodingKey, Header, encode};
use secrecy::ExposeSecret;
use serde_json::json;

#[tokio::test]
async fn test_alice_register_login_profile_flow() {
    let app = TestApp::new().await;
    let suffix = unique_suffix();
    let username = format!("alice_{}", suffix);
    let email = format!("alice_{}@example.com", suffix);

    // Register
    let response = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&json!({
            "username": username,
            "email": email,
            "password": "secret123",
            "full_name": "Alice A",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(!body["access_token"].as_str().unwrap().is_empty());
    assert!(!body["refresh_token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["username"], username);
    assert_eq!(body["user"]["role"], "donor");
    assert!(body["user"].get("password_hash").is_none());

    // Login with the right password
    let response = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "username": username, "password": "secret123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let login: serde_json::Value = response.json().await.unwrap();
    assert!(login["user"]["last_login"].is_string());
    let access_token = login["access_token"].as_str().unwrap().to_string();
    assert_ne!(access_token, body["access_token"].as_str().unwrap());

    // Login with the wrong password
    let response = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "username": username, "password": "wrongpass" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
    let error: serde_json::Value = response.json().await.unwrap();
    assert_eq!(error["error"], "Invalid credentials");

    // Profile with the token
    let response = app
        .client
        .get(app.url("/api/profile"))
        .header("authorization", auth_header(&access_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let profile: serde_json::Value = response.json().await.unwrap();
    assert_eq!(profile["user"]["email"], email);
    assert_eq!(profile["user"]["full_name"], "Alice A");

    // Profile without a token
    let response = app.client.get(app.url("/api/profile")).send().await.unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_unknown_user_and_wrong_password_look_the_same() {
    let app = TestApp::new().await;
    let user = register_user(&app, "donor").await;

    let wrong_password = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "username": user.username, "password": "not-the-password" }))
        .send()
        .await
        .unwrap();
    let unknown_user = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "username": format!("ghost_{}", unique_suffix()), "password": "secret123" }))
        .send()
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), 401);
    assert_eq!(unknown_user.status(), 401);
    let a: serde_json::Value = wrong_password.json().await.unwrap();
    let b: serde_json::Value = unknown_user.json().await.unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_login_with_email_identifier() {
    let app = TestApp::new().await;
    let user = register_user(&app, "recipient").await;

    let response = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "username": user.email.to_uppercase(), "password": user.password }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["user"]["role"], "recipient");
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let app = TestApp::new().await;
    let user = register_user(&app, "donor").await;

    let response = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&json!({
            "username": user.username,
            "email": format!("other_{}@example.com", unique_suffix()),
            "password": "another-pass1",
            "full_name": "Someone Else",
            "role": "recipient",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Username already exists");
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let app = TestApp::new().await;
    let user = register_user(&app, "donor").await;

    let response = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&json!({
            "username": format!("other_{}", unique_suffix()),
            "email": user.email,
            "password": "another-pass1",
            "full_name": "Someone Else",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Email already exists");
}

#[tokio::test]
async fn test_refresh_token_is_single_use() {
    let app = TestApp::new().await;
    let user = register_user(&app, "donor").await;

    let first = app
        .client
        .post(app.url("/api/auth/refresh"))
        .header("authorization", auth_header(&user.refresh_token))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), 200);
    let tokens: serde_json::Value = first.json().await.unwrap();
    let new_refresh = tokens["refresh_token"].as_str().unwrap().to_string();
    assert_ne!(new_refresh, user.refresh_token);

    let replay = app
        .client
        .post(app.url("/api/auth/refresh"))
        .header("authorization", auth_header(&user.refresh_token))
        .send()
        .await
        .unwrap();
    assert_eq!(replay.status(), 401);

    // The rotated token still works once
    let next = app
        .client
        .post(app.url("/api/auth/refresh"))
        .header("authorization", auth_header(&new_refresh))
        .send()
        .await
        .unwrap();
    assert_eq!(next.status(), 200);
}

#[tokio::test]
async fn test_token_types_are_not_interchangeable() {
    let app = TestApp::new().await;
    let user = register_user(&app, "donor").await;

    let refresh_with_access = app
        .client
        .post(app.url("/api/auth/refresh"))
        .header("authorization", auth_header(&user.access_token))
        .send()
        .await
        .unwrap();
    assert_eq!(refresh_with_access.status(), 401);

    let profile_with_refresh = app
        .client
        .get(app.url("/api/profile"))
        .header("authorization", auth_header(&user.refresh_token))
        .send()
        .await
        .unwrap();
    assert_eq!(profile_with_refresh.status(), 401);
}

#[tokio::test]
async fn test_forgot_password_same_answer_for_unknown_email() {
    let app = TestApp::new().await;
    let user = register_user(&app, "donor").await;

    let known = app
        .client
        .post(app.url("/api/auth/forgot-password"))
        .json(&json!({ "email": user.email }))
        .send()
        .await
        .unwrap();
    let unknown = app
        .client
        .post(app.url("/api/auth/forgot-password"))
        .json(&json!({ "email": format!("nobody_{}@example.com", unique_suffix()) }))
        .send()
        .await
        .unwrap();

    assert_eq!(known.status(), 200);
    assert_eq!(unknown.status(), 200);
    let a: serde_json::Value = known.json().await.unwrap();
    let b: serde_json::Value = unknown.json().await.unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_deactivated_user_cannot_use_access_token() {
    let app = TestApp::new().await;
    let user = register_user(&app, "donor").await;

    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(user.id)
        .execute(&app.pool)
        .await
        .unwrap();

    let response = app
        .client
        .get(app.url("/api/profile"))
        .header("authorization", auth_header(&user.access_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let login = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "username": user.username, "password": user.password }))
        .send()
        .await
        .unwrap();
    assert_eq!(login.status(), 401);
}

#[tokio::test]
async fn test_refresh_token_rejected_one_second_after_expiry() {
    let app = TestApp::new().await;
    let user = register_user(&app, "donor").await;

    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user.id.to_string(),
        exp: now - 1,
        iat: now - 3600,
        jti: uuid::Uuid::now_v7().to_string(),
        typ: TokenType::Refresh,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(app.config.jwt.refresh_secret.expose_secret().as_bytes()),
    )
    .unwrap();

    let response = app
        .client
        .post(app.url("/api/auth/refresh"))
        .header("authorization", auth_header(&token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Token has expired");
}
