pub mod auth;
pub mod donations;
pub mod food_requests;
pub mod jwt;
pub mod otp;
pub mod users;
