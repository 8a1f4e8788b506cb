use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::error::Result;

use crate::DbConn;

/// Hash a refresh token using SHA-256 for storage
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Records a consumed refresh token.
///
/// Returns `false` when the hash was already recorded, i.e. the token has
/// been exchanged before.
pub async fn revoke_refresh_token(
    conn: &mut DbConn,
    user_id: i64,
    token_hash: &str,
    expires_at: DateTime<Utc>,
) -> Result<bool> {
    let rows_affected = sqlx::query(
        r#"
        INSERT INTO revoked_refresh_tokens (user_id, token_hash, expires_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (token_hash) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(token_hash)
    .bind(expires_at)
    .execute(conn)
    .await?
    .rows_affected();

    Ok(rows_affected == 1)
}

/// Deletes records whose token has expired anyway.
///
/// `exp` has whole-second precision, so rows are kept for a margin past
/// `expires_at`; the token must already fail verification when its row goes.
pub async fn delete_expired_revoked_tokens(conn: &mut DbConn) -> Result<u64> {
    let rows_affected = sqlx::query("DELETE FROM revoked_refresh_tokens WHERE expires_at < NOW() - INTERVAL '1 minute'")
        .execute(conn)
        .await?
        .rows_affected();

    Ok(rows_affected)
}
