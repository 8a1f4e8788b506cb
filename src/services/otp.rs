//! One-time passcodes. Codes are generated and checked here; delivery is
//! out of scope.

use chrono::{Duration, Utc};
use rand::Rng;

use crate::{
    DbConn,
    config::OtpConfig,
    error::Result,
    models::otp::OtpPurpose,
    queries::{otp, users},
};

/// Six-digit code, uniform over `100000..=999999`.
pub fn generate_code() -> String {
    rand::rng().random_range(100_000..=999_999).to_string()
}

/// True for exactly six ASCII digits.
pub fn is_valid_format(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
}

/// Stores a new code for `user_id` and returns it.
pub async fn generate(conn: &mut DbConn, user_id: i64, purpose: OtpPurpose, config: &OtpConfig) -> Result<String> {
    let code = generate_code();
    let expires_at = Utc::now() + Duration::minutes(config.expiration_minutes);

    otp::create_otp(conn, user_id, &code, purpose, expires_at).await?;

    tracing::info!(user_id, purpose = %purpose, "OTP generated");

    Ok(code)
}

/// Consumes a matching code. Returns `false` if the code is malformed, unknown,
/// expired, already used or issued for another purpose.
///
/// A verified `email_verification` code also marks the user verified; run
/// this inside a transaction so both writes land together.
pub async fn verify(conn: &mut DbConn, user_id: i64, code: &str, purpose: OtpPurpose) -> Result<bool> {
    if !is_valid_format(code) {
        return Ok(false);
    }

    if otp::consume_otp(conn, user_id, code, purpose).await?.is_none() {
        tracing::info!(user_id, purpose = %purpose, "OTP verification failed");
        return Ok(false);
    }

    if purpose == OtpPurpose::EmailVerification {
        users::mark_verified(conn, user_id).await?;
    }

    tracing::info!(user_id, purpose = %purpose, "OTP verified");

    Ok(true)
}
