use crate::{
    config::JwtConfig,
    error::{Error, Result},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which secret signed a token and what it may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id as string
    pub sub: String,
    /// Expiration time as Unix timestamp
    pub exp: i64,
    /// Issued at time as Unix timestamp
    pub iat: i64,
    /// Unique token id; two tokens minted in the same second still differ
    pub jti: String,
    pub typ: TokenType,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64> {
        self.sub
            .parse()
            .map_err(|_| Error::InvalidToken("Invalid user id in token".to_string()))
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

fn secret_for(token_type: TokenType, config: &JwtConfig) -> &str {
    match token_type {
        TokenType::Access => config.access_secret.expose_secret(),
        TokenType::Refresh => config.refresh_secret.expose_secret(),
    }
}

fn lifetime_for(token_type: TokenType, config: &JwtConfig) -> Duration {
    match token_type {
        TokenType::Access => Duration::minutes(config.access_token_expiration_minutes),
        TokenType::Refresh => Duration::days(config.refresh_token_expiration_days),
    }
}

/// Signs a token of the given type for `user_id`.
///
/// Returns the encoded token and its expiry.
pub fn generate_token(user_id: i64, token_type: TokenType, config: &JwtConfig) -> Result<(String, DateTime<Utc>)> {
    let now = Utc::now();
    let expires_at = now + lifetime_for(token_type, config);

    let claims = Claims {
        sub: user_id.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
        jti: Uuid::now_v7().to_string(),
        typ: token_type,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret_for(token_type, config).as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Failed to generate JWT: {}", e)))?;

    Ok((token, expires_at))
}

/// Verifies signature, expiry and token type, returning the claims.
///
/// # Errors
/// `InvalidToken` if the token is malformed, expired, signed with the wrong
/// secret, or of the other type.
pub fn verify_token(token: &str, expected: TokenType, config: &JwtConfig) -> Result<Claims> {
    // No grace period: a consumed refresh token is only remembered until `exp`
    let mut validation = Validation::default();
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret_for(expected, config).as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => Error::InvalidToken("Token has expired".to_string()),
        ErrorKind::InvalidSignature => Error::InvalidToken("Invalid token signature".to_string()),
        _ => Error::InvalidToken("Invalid token".to_string()),
    })?;

    if token_data.claims.typ != expected {
        return Err(Error::InvalidToken("Invalid token type".to_string()));
    }

    Ok(token_data.claims)
}

/// Extracts the Bearer token from the Authorization header
///
/// Format: "Authorization: Bearer <token>"
pub fn extract_token_from_header(auth_header: Option<&str>) -> Result<&str> {
    match auth_header {
        Some(header) => match header.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim()),
            Some(_) => Err(Error::Authentication("Empty token".to_string())),
            None => Err(Error::Authentication(
                "Invalid Authorization header format. Expected: 'Bearer <token>'".to_string(),
            )),
        },
        None => Err(Error::Authentication("Missing Authorization header".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn test_config() -> JwtConfig {
        JwtConfig {
            access_secret: SecretString::from("test-access-secret-for-testing".to_string()),
            refresh_secret: SecretString::from("test-refresh-secret-for-testing".to_string()),
            access_token_expiration_minutes: 15,
            refresh_token_expiration_days: 30,
        }
    }

    #[test]
    fn test_generate_and_verify_access_token() {
        let config = test_config();
        let (token, expires_at) = generate_token(42, TokenType::Access, &config).unwrap();
        assert!(token.contains('.'));
        assert!(expires_at > Utc::now());

        let claims = verify_token(&token, TokenType::Access, &config).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.typ, TokenType::Access);
    }

    #[test]
    fn test_refresh_token_lifetime() {
        let config = test_config();
        let (_, expires_at) = generate_token(1, TokenType::Refresh, &config).unwrap();
        let days = (expires_at - Utc::now()).num_days();
        assert!((29..=30).contains(&days));
    }

    #[test]
    fn test_tokens_minted_together_differ() {
        let config = test_config();
        let (a, _) = generate_token(7, TokenType::Refresh, &config).unwrap();
        let (b, _) = generate_token(7, TokenType::Refresh, &config).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_access_token_rejected_as_refresh() {
        let config = test_config();
        let (token, _) = generate_token(42, TokenType::Access, &config).unwrap();
        assert!(matches!(
            verify_token(&token, TokenType::Refresh, &config),
            Err(Error::InvalidToken(_))
        ));
    }

    #[test]
    fn test_type_checked_even_with_shared_secret() {
        let mut config = test_config();
        config.refresh_secret = SecretString::from("test-access-secret-for-testing".to_string());
        let (token, _) = generate_token(42, TokenType::Refresh, &config).unwrap();
        let err = verify_token(&token, TokenType::Access, &config).unwrap_err();
        assert_eq!(err.to_string(), "Invalid token: Invalid token type");
    }

    #[test]
    fn test_verify_invalid_signature() {
        let config = test_config();
        let (token, _) = generate_token(42, TokenType::Access, &config).unwrap();
        let mut other = test_config();
        other.access_secret = SecretString::from("another-secret".to_string());
        assert!(verify_token(&token, TokenType::Access, &other).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut config = test_config();
        config.access_token_expiration_minutes = -5;
        let (token, _) = generate_token(42, TokenType::Access, &config).unwrap();
        let err = verify_token(&token, TokenType::Access, &config).unwrap_err();
        assert_eq!(err.to_string(), "Invalid token: Token has expired");
    }

    #[test]
    fn test_token_rejected_just_after_expiry() {
        let config = test_config();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "42".to_string(),
            exp: now - 1,
            iat: now - 60,
            jti: Uuid::now_v7().to_string(),
            typ: TokenType::Refresh,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.refresh_secret.expose_secret().as_bytes()),
        )
        .unwrap();

        let err = verify_token(&token, TokenType::Refresh, &config).unwrap_err();
        assert_eq!(err.to_string(), "Invalid token: Token has expired");
    }

    #[test]
    fn test_verify_invalid_format() {
        assert!(verify_token("invalid.token.here", TokenType::Access, &test_config()).is_err());
    }

    #[test]
    fn test_extract_token_from_header_valid() {
        let header = "Bearer my-jwt-token".to_string();
        assert_eq!(extract_token_from_header(Some(&header)).unwrap(), "my-jwt-token");
    }

    #[test]
    fn test_extract_token_from_header_missing() {
        assert!(extract_token_from_header(None).is_err());
    }

    #[test]
    fn test_extract_token_from_header_invalid_format() {
        assert!(extract_token_from_header(Some("InvalidFormat")).is_err());
        assert!(extract_token_from_header(Some("Basic abc")).is_err());
    }

    #[test]
    fn test_extract_token_from_header_empty() {
        assert!(extract_token_from_header(Some("Bearer ")).is_err());
    }
}
