//! Input validation utilities applied at the request boundary.
//!
//! Handlers validate every request schema before touching the database, so
//! a bad payload never costs a connection checkout.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email regex")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?1?\d{9,15}$").expect("phone regex"));

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]{3,80}$").expect("username regex"));

/// Returns the trimmed value, or a "Missing required field" error when the
/// field is absent or blank.
pub fn required(value: Option<String>, field: &str) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::missing_field(field)),
    }
}

/// Same as [`required`] for non-string fields.
pub fn required_value<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| Error::missing_field(field))
}

/// Trims an optional string, treating blank as absent.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validates email format
///
/// # Examples
/// ```
/// use foodbank::validation::validate_email;
///
/// validate_email("user@example.com").unwrap();
/// assert!(validate_email("invalid-email").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<()> {
    if email.len() > 120 {
        return Err(Error::Validation("Email address is too long (max 120 characters)".to_string()));
    }

    if email.contains("..") || !EMAIL_RE.is_match(email) {
        return Err(Error::Validation("Invalid email format".to_string()));
    }

    Ok(())
}

/// Validates an international phone number (optional leading `+`, 9-15 digits).
pub fn validate_phone(phone: &str) -> Result<()> {
    if !PHONE_RE.is_match(phone) {
        return Err(Error::Validation("Invalid phone number format".to_string()));
    }
    Ok(())
}

/// Usernames are 3-80 characters of letters, digits, `_`, `.` and `-`.
pub fn validate_username(username: &str) -> Result<()> {
    if !USERNAME_RE.is_match(username) {
        return Err(Error::Validation(
            "Username must be 3-80 characters of letters, numbers, '_', '.' or '-'".to_string(),
        ));
    }
    Ok(())
}

const COMMON_PASSWORDS: [&str; 4] = ["password", "12345678", "qwerty123", "admin123"];

/// Minimum password policy: 8-128 characters, no whitespace, not one of a
/// handful of well-known passwords.
pub fn validate_password(password: &str) -> Result<()> {
    let length = password.chars().count();
    if length < 8 {
        return Err(Error::Validation("Password must be at least 8 characters".to_string()));
    }
    if length > 128 {
        return Err(Error::Validation("Password must be at most 128 characters".to_string()));
    }
    if password.contains(char::is_whitespace) {
        return Err(Error::Validation("Password must not contain whitespace".to_string()));
    }
    if COMMON_PASSWORDS.contains(&password.to_lowercase().as_str()) {
        return Err(Error::Validation("Password is too common".to_string()));
    }

    Ok(())
}

/// Names are letters plus space, `-`, `'` and `.`, up to 200 characters.
pub fn validate_full_name(name: &str) -> Result<()> {
    if name.chars().count() > 200 {
        return Err(Error::Validation("Full name must be at most 200 characters".to_string()));
    }

    if !name.chars().all(|c| c.is_alphabetic() || c == ' ' || c == '-' || c == '\'' || c == '.') {
        return Err(Error::Validation(
            "Full name can only contain letters, spaces, hyphens, apostrophes, and periods".to_string(),
        ));
    }

    Ok(())
}

/// Rejects free-text fields longer than `max` characters.
pub fn validate_max_len(value: &str, field: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(Error::Validation(format!("{} must be at most {} characters", field, max)));
    }
    Ok(())
}

/// Clamps a caller-supplied list size into `1..=100`, defaulting to 10.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(10).clamp(1, 100)
}
