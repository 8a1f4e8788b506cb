use axum::{
    Json,
    extract::{Extension, State, rejection::JsonRejection},
};
use serde_json::json;

use crate::{
    database,
    error::{Error, Result},
    middleware::auth::AuthenticatedUser,
    models::requests::{SendOtpRequest, VerifyOtpRequest},
    services::otp,
    state::AppState,
};

/// POST /api/otp/send
///
/// Nothing is delivered; outside production the code is echoed back as
/// `otp_code` so it can be used in development.
pub async fn send_otp(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    body: std::result::Result<Json<SendOtpRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>> {
    let Json(request) = body?;
    let purpose = request.validate()?;

    let mut conn = database::acquire(&state.pool).await?;
    let code = otp::generate(&mut conn, auth_user.id, purpose, &state.config.otp).await?;

    let mut response = json!({
        "message": "OTP sent successfully",
        "purpose": purpose,
        "expires_in_minutes": state.config.otp.expiration_minutes,
    });
    if !state.config.is_production() {
        response["otp_code"] = json!(code);
    }

    Ok(Json(response))
}

/// POST /api/otp/verify
pub async fn verify_otp(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    body: std::result::Result<Json<VerifyOtpRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>> {
    let Json(request) = body?;
    let (purpose, code) = request.validate()?;

    let mut tx = state.pool.begin().await?;
    let verified = otp::verify(&mut tx, auth_user.id, &code, purpose).await?;
    tx.commit().await?;

    if !verified {
        return Err(Error::Validation("Invalid or expired OTP".to_string()));
    }

    Ok(Json(json!({ "message": "OTP verified successfully" })))
}
