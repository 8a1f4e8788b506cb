use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};
use serde_json::json;

use crate::{
    database,
    error::Result,
    middleware::auth::bearer_token,
    models::{
        requests::{ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest},
        users::UserProfile,
    },
    queries,
    services::{auth, users},
    state::AppState,
};

/// POST /api/auth/register
///
/// Creates a donor or recipient account and signs it in.
///
/// # Request Body
/// - `username`, `email`, `password`, `full_name` (required)
/// - `phone`, `role` (optional; role is `donor` or `recipient`, default `donor`)
///
/// # HTTP Status Codes
/// - `201 CREATED`: User registered, tokens issued
/// - `400 BAD_REQUEST`: Missing/invalid field, or username/email already exists
pub async fn register(
    State(state): State<AppState>,
    body: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let Json(request) = body?;
    let request = request.validate()?;

    let mut conn = database::acquire(&state.pool).await?;
    let user = users::register_user(&mut conn, request, &state.config.password).await?;
    let tokens = auth::issue_tokens(&user, &state.config.jwt)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "access_token": tokens.access_token,
            "refresh_token": tokens.refresh_token,
            "user": UserProfile::from(user),
        })),
    ))
}

/// POST /api/auth/login
///
/// `username` may be a username or an email address. Any failure answers
/// `401 Invalid credentials`.
pub async fn login(
    State(state): State<AppState>,
    body: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>> {
    let Json(request) = body?;
    let (identifier, password) = request.validate()?;

    let login_result = auth::login_user(&state.pool, &identifier, &password, &state.config.jwt).await?;

    Ok(Json(json!({
        "message": "Login successful",
        "access_token": login_result.tokens.access_token,
        "refresh_token": login_result.tokens.refresh_token,
        "user": UserProfile::from(login_result.user),
    })))
}

/// POST /api/auth/refresh
///
/// Takes the refresh token as `Authorization: Bearer <refresh token>` and
/// returns a new pair. Each refresh token is accepted once.
pub async fn refresh(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<serde_json::Value>> {
    let refresh_token = bearer_token(&headers)?;
    let tokens = auth::refresh(&state.pool, refresh_token, &state.config.jwt).await?;

    Ok(Json(json!({
        "access_token": tokens.access_token,
        "refresh_token": tokens.refresh_token,
    })))
}

/// POST /api/auth/forgot-password
///
/// The answer is the same whether or not the address is registered.
pub async fn forgot_password(
    State(state): State<AppState>,
    body: std::result::Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>> {
    let Json(request) = body?;
    let email = request.validate()?;

    let mut conn = database::acquire(&state.pool).await?;
    if let Some(user) = queries::users::get_user_by_email(&mut conn, &email).await? {
        tracing::info!(user_id = user.id, "Password reset requested");
    }

    Ok(Json(json!({
        "message": "If the email exists, reset instructions have been sent"
    })))
}

/// POST /api/auth/reset-password
///
/// Acknowledges a well-formed request. Credentials are not changed here.
pub async fn reset_password(
    body: std::result::Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>> {
    let Json(request) = body?;
    request.validate()?;

    Ok(Json(json!({
        "message": "Password reset request received"
    })))
}
