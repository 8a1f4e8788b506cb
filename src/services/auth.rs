//! Credential checks and token issuance.

use crate::{
    DbConn, DbPool,
    config::JwtConfig,
    database,
    error::{Error, Result},
    models::users::{LoginResult, TokenPair, User},
    queries::{revoked_tokens, users},
    services::{
        jwt::{TokenType, generate_token, verify_token},
        users::verify_password,
    },
};

/// Looks a user up by username, then by email, and checks the password.
///
/// Every failure yields `None` and the same log line, whatever the cause.
pub async fn authenticate(conn: &mut DbConn, identifier: &str, password: &str) -> Option<User> {
    let user = match find_by_identifier(conn, identifier).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!(error = %e, "User lookup failed during authentication");
            None
        }
    };

    match user {
        Some(user) if user.is_active && verify_password(password, &user.password_hash) => Some(user),
        _ => {
            tracing::warn!("Authentication failed");
            None
        }
    }
}

async fn find_by_identifier(conn: &mut DbConn, identifier: &str) -> Result<Option<User>> {
    if let Some(user) = users::get_user_by_username(conn, identifier).await? {
        return Ok(Some(user));
    }
    users::get_user_by_email(conn, identifier).await
}

/// Mints an access/refresh pair for `user`.
pub fn issue_tokens(user: &User, config: &JwtConfig) -> Result<TokenPair> {
    let (access_token, access_token_expires_at) = generate_token(user.id, TokenType::Access, config)?;
    let (refresh_token, refresh_token_expires_at) = generate_token(user.id, TokenType::Refresh, config)?;

    Ok(TokenPair {
        access_token,
        refresh_token,
        access_token_expires_at,
        refresh_token_expires_at,
    })
}

/// Resolves an access token to an active user.
///
/// `None` if the token is invalid, expired, a refresh token, or its user is
/// gone or deactivated. Only database failures are errors.
///
/// The token is checked before a connection is taken from the pool.
pub async fn resolve_identity(pool: &DbPool, token: &str, config: &JwtConfig) -> Result<Option<User>> {
    let Ok(claims) = verify_token(token, TokenType::Access, config) else {
        return Ok(None);
    };
    let Ok(user_id) = claims.user_id() else {
        return Ok(None);
    };

    let mut conn = database::acquire(pool).await?;
    let user = users::get_user_by_id(&mut conn, user_id).await?;
    Ok(user.filter(|u| u.is_active))
}

/// Checks credentials and issues a token pair, recording the login time.
pub async fn login_user(pool: &DbPool, identifier: &str, password: &str, config: &JwtConfig) -> Result<LoginResult> {
    let mut conn = database::acquire(pool).await?;

    let mut user = authenticate(&mut conn, identifier, password)
        .await
        .ok_or_else(|| Error::Authentication("Invalid credentials".to_string()))?;

    users::touch_last_login(&mut conn, user.id).await?;
    user.last_login = Some(chrono::Utc::now());

    let tokens = issue_tokens(&user, config)?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(LoginResult { user, tokens })
}

/// Exchanges a refresh token for a new pair.
///
/// The presented token is recorded as consumed in the same transaction that
/// issues its replacement; a token that was already recorded is rejected.
pub async fn refresh(pool: &DbPool, refresh_token: &str, config: &JwtConfig) -> Result<TokenPair> {
    let claims = verify_token(refresh_token, TokenType::Refresh, config)?;
    let user_id = claims.user_id()?;

    let mut tx = pool.begin().await?;

    let user = users::get_user_by_id(&mut tx, user_id)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    if !user.is_active {
        return Err(Error::Authentication("Account is disabled".to_string()));
    }

    let token_hash = revoked_tokens::hash_refresh_token(refresh_token);
    let first_use = revoked_tokens::revoke_refresh_token(&mut tx, user.id, &token_hash, claims.expires_at()).await?;
    if !first_use {
        tracing::warn!(user_id = user.id, "Refresh token reuse rejected");
        return Err(Error::InvalidToken("Refresh token has already been used".to_string()));
    }

    let tokens = issue_tokens(&user, config)?;
    tx.commit().await?;

    tracing::debug!(user_id = user.id, "Refresh token rotated");

    Ok(tokens)
}
