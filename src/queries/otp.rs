use chrono::{DateTime, Utc};
use sqlx::Postgres;

use crate::{
    error::Result,
    models::otp::{OtpPurpose, OtpVerification},
};

use crate::DbConn;

/// Stores a freshly generated code.
pub async fn create_otp(
    conn: &mut DbConn,
    user_id: i64,
    otp_code: &str,
    purpose: OtpPurpose,
    expires_at: DateTime<Utc>,
) -> Result<OtpVerification> {
    let otp = sqlx::query_as::<Postgres, OtpVerification>(
        r#"
        INSERT INTO otp_verifications (user_id, otp_code, purpose, expires_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, otp_code, purpose, is_used, expires_at, created_at
        "#,
    )
    .bind(user_id)
    .bind(otp_code)
    .bind(purpose.as_ref())
    .bind(expires_at)
    .fetch_one(conn)
    .await?;

    Ok(otp)
}

/// Atomically marks a matching, unused, unexpired code as used.
///
/// The lookup and the flip happen in one statement; the row lock taken by the
/// subquery makes a concurrent verifier either skip the row or see it used.
/// Returns `None` when nothing matched.
pub async fn consume_otp(
    conn: &mut DbConn,
    user_id: i64,
    otp_code: &str,
    purpose: OtpPurpose,
) -> Result<Option<OtpVerification>> {
    let otp = sqlx::query_as::<Postgres, OtpVerification>(
        r#"
        UPDATE otp_verifications
        SET is_used = TRUE
        WHERE id = (
            SELECT id FROM otp_verifications
            WHERE user_id = $1 AND otp_code = $2 AND purpose = $3
              AND is_used = FALSE AND expires_at > NOW()
            ORDER BY created_at DESC
            LIMIT 1
            FOR UPDATE SKIP LOCKED
        )
        AND is_used = FALSE
        AND expires_at > NOW()
        RETURNING id, user_id, otp_code, purpose, is_used, expires_at, created_at
        "#,
    )
    .bind(user_id)
    .bind(otp_code)
    .bind(purpose.as_ref())
    .fetch_optional(conn)
    .await?;

    Ok(otp)
}
