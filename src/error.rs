use thiserror::Error;

// Import Axum types for HTTP response conversion
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// SQLSTATE raised by Postgres when `statement_timeout` cancels a query.
const QUERY_CANCELED: &str = "57014";

/// SQLSTATE for a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// The custom error type for the application.
#[derive(Debug, Error)]
pub enum Error {
    /// An error originating from the sqlx library.
    #[error("SQLx error: {0}")]
    Sqlx(sqlx::Error),

    /// A validation error (missing or malformed input).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A not found error (resource does not exist).
    #[error("Not found: {0}")]
    NotFound(String),

    /// A forbidden error (user lacks permission).
    #[error("Access forbidden: {0}")]
    Forbidden(String),

    /// A conflict error (username or email already taken).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An authentication error (invalid credentials, missing token).
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// An invalid or expired token.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The database did not answer in time (pool checkout or statement timeout).
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The database is unreachable.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// An internal server error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// A type alias for `Result<T, Error>` to simplify function signatures.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Builds the validation error reported for an absent or blank request field.
    pub fn missing_field(field: &str) -> Self {
        Error::Validation(format!("Missing required field: {}", field))
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            // Duplicate username/email is reported as a client fault
            Error::Conflict(_) => StatusCode::BAD_REQUEST,
            Error::Authentication(_) => StatusCode::UNAUTHORIZED,
            Error::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Sqlx(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code placed next to the message.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::Conflict(_) => "CONFLICT",
            Error::Authentication(_) => "AUTHENTICATION_FAILED",
            Error::InvalidToken(_) => "INVALID_TOKEN",
            Error::Forbidden(_) => "FORBIDDEN",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Timeout(_) => "TIMEOUT",
            Error::Unavailable(_) => "SERVICE_UNAVAILABLE",
            Error::Sqlx(_) | Error::Internal(_) | Error::Config(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to hand to a client. Server-side variants collapse to a
    /// generic text; their detail only goes to the log.
    fn public_message(&self) -> String {
        match self {
            Error::Validation(msg)
            | Error::Conflict(msg)
            | Error::Authentication(msg)
            | Error::InvalidToken(msg)
            | Error::Forbidden(msg)
            | Error::NotFound(msg) => msg.clone(),
            Error::Timeout(_) => "Request timed out".to_string(),
            Error::Unavailable(_) => "Service temporarily unavailable".to_string(),
            Error::Sqlx(_) | Error::Internal(_) | Error::Config(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::PoolTimedOut => Error::Timeout("timed out waiting for a database connection".to_string()),
            sqlx::Error::PoolClosed => Error::Unavailable("database pool is closed".to_string()),
            sqlx::Error::Io(io) => Error::Unavailable(format!("database I/O error: {}", io)),
            sqlx::Error::Database(db) if db.code().as_deref() == Some(QUERY_CANCELED) => {
                Error::Timeout(format!("statement timeout: {}", db.message()))
            }
            _ => Error::Sqlx(e),
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::Validation(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::Validation(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}

/// Returns true when the error is a Postgres unique constraint violation.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

/// Convert custom Error to HTTP response
///
/// Maps each variant to its status code and returns `{"error", "code"}`.
/// Server-side failures are logged here with full detail and answered with a
/// generic message.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "Request failed");
        }

        let body = serde_json::json!({
            "error": self.public_message(),
            "code": self.code(),
        });

        (status, Json(body)).into_response()
    }
}
