pub mod auth;
pub mod donations;
pub mod food_requests;
pub mod health;
pub mod inventory;
pub mod notifications;
pub mod otp;
pub mod profile;
