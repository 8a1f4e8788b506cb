//! Boundary checks that must answer before any database access.

mod common;

use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_register_reports_first_missing_field() {
    let app = TestApp::without_database().await;

    let response = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&json!({
            "username": "alice",
            "password": "secret123",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Missing required field: email");
}

#[tokio::test]
async fn test_register_blank_field_counts_as_missing() {
    let app = TestApp::without_database().await;

    let response = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "secret123",
            "full_name": "   ",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Missing required field: full_name");
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let app = TestApp::without_database().await;

    let response = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&json!({
            "username": "alice",
            "email": "not-an-email",
            "password": "secret123",
            "full_name": "Alice A",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_register_rejects_admin_role() {
    let app = TestApp::without_database().await;

    let response = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&json!({
            "username": "mallory",
            "email": "mallory@example.com",
            "password": "secret123",
            "full_name": "Mallory M",
            "role": "admin",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::without_database().await;

    let response = app
        .client
        .post(app.url("/api/auth/login"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_missing_password() {
    let app = TestApp::without_database().await;

    let response = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "username": "alice" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Missing required field: password");
}

#[tokio::test]
async fn test_reset_password_stub_validates_strength() {
    let app = TestApp::without_database().await;

    let weak = app
        .client
        .post(app.url("/api/auth/reset-password"))
        .json(&json!({ "token": "abc", "new_password": "short" }))
        .send()
        .await
        .unwrap();
    assert_eq!(weak.status(), 400);

    let ok = app
        .client
        .post(app.url("/api/auth/reset-password"))
        .json(&json!({ "token": "abc", "new_password": "secret123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(ok.status(), 200);
}

#[tokio::test]
async fn test_protected_route_without_token_is_401() {
    let app = TestApp::without_database().await;

    let response = app.client.get(app.url("/api/profile")).send().await.unwrap();

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_protected_route_with_garbage_token_is_401() {
    let app = TestApp::without_database().await;

    let response = app
        .client
        .get(app.url("/api/donations"))
        .header("authorization", "Bearer not.a.token")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_refresh_without_token_is_401() {
    let app = TestApp::without_database().await;

    let response = app.client.post(app.url("/api/auth/refresh")).send().await.unwrap();

    assert_eq!(response.status(), 401);
}
