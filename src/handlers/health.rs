//! Health and discovery handlers
//!
//! None of these require authentication.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use crate::{database, state::AppState};

/// Public health check response
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    /// Always "healthy" while the process serves requests
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    /// "ok" or "unavailable"
    pub database: String,
}

/// GET /api/health
///
/// Answers 200 even when the database is down; the `database` field says so.
///
/// # Example
/// ```bash
/// curl http://localhost:5090/api/health
/// # Returns: {"status":"healthy","timestamp":"...","version":"0.1.0","database":"ok"}
/// ```
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    let database = if database::ping(&state.pool).await {
        "ok"
    } else {
        tracing::warn!("Health check: database unavailable");
        "unavailable"
    };

    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    })
}

/// GET /api
pub async fn api_index() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Food Bank API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": {
                "register": "POST /api/auth/register",
                "login": "POST /api/auth/login",
                "refresh": "POST /api/auth/refresh",
                "forgot_password": "POST /api/auth/forgot-password",
                "reset_password": "POST /api/auth/reset-password",
                "status": "GET /api/auth/status"
            },
            "profile": {
                "get_profile": "GET /api/profile",
                "update_profile": "PUT /api/profile"
            },
            "donations": {
                "create_donation": "POST /api/donations",
                "get_donations": "GET /api/donations",
                "update_status": "PUT /api/donations/{id}/status"
            },
            "requests": {
                "create_request": "POST /api/requests",
                "get_requests": "GET /api/requests",
                "update_status": "PUT /api/requests/{id}/status"
            },
            "inventory": {
                "get_inventory": "GET /api/inventory"
            },
            "otp": {
                "send_otp": "POST /api/otp/send",
                "verify_otp": "POST /api/otp/verify"
            },
            "notifications": {
                "get_notifications": "GET /api/notifications",
                "mark_read": "PUT /api/notifications/{id}/read"
            },
            "health": "GET /api/health"
        }
    }))
}

/// GET /api/auth/status
pub async fn auth_status() -> Json<serde_json::Value> {
    Json(json!({
        "status": "Authentication system is active",
        "timestamp": Utc::now(),
        "system": "operational"
    }))
}
