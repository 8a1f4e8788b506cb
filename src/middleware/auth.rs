//! JWT authentication middleware
//!
//! Resolves the `Authorization: Bearer <access token>` header to an active
//! user and makes it available to handlers as an extension.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use serde::Serialize;

use crate::{
    error::{Error, Result},
    models::users::{User, UserRole},
    services::{auth::resolve_identity, jwt::extract_token_from_header},
    state::AppState,
};

/// Authenticated user extracted from the access token
///
/// Added to request extensions by [`jwt_auth_middleware`].
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
        }
    }
}

/// Reads the bearer token, if any, from request headers.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    let auth_header = headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok());
    extract_token_from_header(auth_header)
}

/// JWT authentication middleware
///
/// Returns 401 before the handler runs if the header is missing, the token is
/// invalid, expired or a refresh token, or the user is gone or deactivated.
///
/// # Usage
/// Apply this middleware to protected routes using `route_layer()`:
///
/// ```ignore
/// Router::new()
///     .route("/protected", get(protected_handler))
///     .route_layer(middleware::from_fn_with_state(
///         state.clone(),
///         jwt_auth_middleware,
///     ))
/// ```
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let token = bearer_token(&headers)?;

    let user = resolve_identity(&state.pool, token, &state.config.jwt)
        .await?
        .ok_or_else(|| Error::InvalidToken("Invalid or expired token".to_string()))?;

    tracing::debug!(user_id = user.id, "Request authenticated");

    request.extensions_mut().insert(AuthenticatedUser::from(user));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header_is_authentication_error() {
        let headers = HeaderMap::new();
        assert!(matches!(bearer_token(&headers), Err(Error::Authentication(_))));
    }
}
