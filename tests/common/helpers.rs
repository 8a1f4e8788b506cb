//! Shared test helper functions

use serde_json::{Value, json};

use crate::common::TestApp;

const SUFFIX_ALPHABET: [char; 36] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];

/// Lowercase alphanumeric suffix that keeps usernames and emails unique across runs.
pub fn unique_suffix() -> String {
    nanoid::nanoid!(12, &SUFFIX_ALPHABET)
}

#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// `Authorization` header value for a token.
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Registers a fresh user with the given role and returns it with its tokens.
pub async fn register_user(app: &TestApp, role: &str) -> TestUser {
    let suffix = unique_suffix();
    let username = format!("user_{}", suffix);
    let email = format!("user_{}@example.com", suffix);
    let password = "secret123".to_string();

    let response = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&json!({
            "username": username,
            "email": email,
            "password": password,
            "full_name": "Test User",
            "role": role,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201, "registration should succeed");

    let body: Value = response.json().await.unwrap();

    TestUser {
        id: body["user"]["id"].as_i64().unwrap(),
        username,
        email,
        password,
        access_token: body["access_token"].as_str().unwrap().to_string(),
        refresh_token: body["refresh_token"].as_str().unwrap().to_string(),
    }
}

/// Admins cannot self-register; flip the role directly in the database.
pub async fn promote_to_admin(app: &TestApp, user_id: i64) {
    sqlx::query("UPDATE users SET role = 'admin' WHERE id = $1")
        .bind(user_id)
        .execute(&app.pool)
        .await
        .unwrap();
}
