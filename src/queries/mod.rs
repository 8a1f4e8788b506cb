pub mod donations;
pub mod food_requests;
pub mod notifications;
pub mod otp;
pub mod revoked_tokens;
pub mod users;
