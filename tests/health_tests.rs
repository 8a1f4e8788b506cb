mod common;

use common::TestApp;

#[tokio::test]
async fn test_health_reports_database_unavailable_with_200() {
    let app = TestApp::without_database().await;

    let response = app.client.get(app.url("/api/health")).send().await.unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "unavailable");
    assert!(body["timestamp"].is_string());
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_health_reports_database_ok() {
    let app = TestApp::new().await;

    let response = app.client.get(app.url("/api/health")).send().await.unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn test_api_index_lists_endpoint_groups() {
    let app = TestApp::without_database().await;

    let response = app.client.get(app.url("/api")).send().await.unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["endpoints"]["auth"]["login"], "POST /api/auth/login");
    assert!(body["endpoints"]["inventory"].is_object());
}

#[tokio::test]
async fn test_auth_status() {
    let app = TestApp::without_database().await;

    let response = app.client.get(app.url("/api/auth/status")).send().await.unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "Authentication system is active");
}

#[tokio::test]
async fn test_unknown_api_path_returns_json_404() {
    let app = TestApp::without_database().await;

    let response = app.client.get(app.url("/api/does-not-exist")).send().await.unwrap();

    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "API endpoint not found");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = TestApp::without_database().await;

    let response = app
        .client
        .get(app.url("/api/auth/status"))
        .header("x-request-id", "test-request-123")
        .send()
        .await
        .unwrap();

    assert_eq!(response.headers().get("x-request-id").unwrap(), "test-request-123");
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let app = TestApp::without_database().await;

    let response = app.client.get(app.url("/api/auth/status")).send().await.unwrap();

    assert!(response.headers().get("x-request-id").is_some());
}
