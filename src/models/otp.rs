use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OtpPurpose {
    EmailVerification,
    PasswordReset,
    ProfileUpdate,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OtpVerification {
    pub id: i64,
    pub user_id: i64,
    pub otp_code: String,
    #[sqlx(try_from = "String")]
    pub purpose: OtpPurpose,
    pub is_used: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
