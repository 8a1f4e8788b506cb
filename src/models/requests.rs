//! Request schemas accepted by the HTTP API.
//!
//! Every field is deserialized as optional so that a missing field can be
//! reported by name; `validate()` turns a raw body into the checked command
//! the service layer works with.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    models::{
        donations::{DonationStatus, FoodType},
        food_requests::{RequestStatus, UrgencyLevel},
        otp::OtpPurpose,
        users::UserRole,
    },
    validation::{
        optional, required, required_value, validate_email, validate_full_name, validate_max_len,
        validate_password, validate_phone, validate_username,
    },
};

fn parse_enum<T: std::str::FromStr>(value: &str, message: &str) -> Result<T> {
    value.parse().map_err(|_| Error::Validation(message.to_string()))
}

// ============================================================================
// AUTH
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
}

/// Checked registration command.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<RegisterUser> {
        let username = required(self.username, "username")?;
        let email = required(self.email, "email")?;
        // Passwords are taken verbatim; whitespace is rejected by the strength check
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| Error::missing_field("password"))?;
        let full_name = required(self.full_name, "full_name")?;

        validate_username(&username)?;
        validate_email(&email)?;
        validate_password(&password)?;
        validate_full_name(&full_name)?;

        let phone = optional(self.phone);
        if let Some(phone) = &phone {
            validate_phone(phone)?;
        }

        let role = match optional(self.role) {
            None => UserRole::default(),
            Some(role) => match parse_enum(&role, "Role must be 'donor' or 'recipient'")? {
                UserRole::Admin => {
                    return Err(Error::Validation("Role must be 'donor' or 'recipient'".to_string()));
                }
                role => role,
            },
        };

        Ok(RegisterUser {
            username,
            email: email.to_lowercase(),
            password,
            full_name,
            phone,
            role,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    /// Username or email address.
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// Returns `(identifier, password)`.
    pub fn validate(self) -> Result<(String, String)> {
        let identifier = required(self.username, "username")?;
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| Error::missing_field("password"))?;
        Ok((identifier, password))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

impl ForgotPasswordRequest {
    pub fn validate(self) -> Result<String> {
        let email = required(self.email, "email")?;
        validate_email(&email)?;
        Ok(email.to_lowercase())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: Option<String>,
    pub new_password: Option<String>,
}

impl ResetPasswordRequest {
    pub fn validate(self) -> Result<()> {
        required(self.token, "token")?;
        let new_password = required_value(self.new_password.filter(|p| !p.is_empty()), "new_password")?;
        validate_password(&new_password)
    }
}

// ============================================================================
// PROFILE
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub location: Option<String>,
}

/// Checked profile patch. `None` leaves a column untouched; for the nullable
/// columns `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub location: Option<Option<String>>,
}

impl UpdateProfileRequest {
    pub fn validate(self) -> Result<ProfilePatch> {
        let full_name = match self.full_name {
            Some(name) => {
                let name = required(Some(name), "full_name")?;
                validate_full_name(&name)?;
                Some(name)
            }
            None => None,
        };

        let email = match self.email {
            Some(email) => {
                let email = required(Some(email), "email")?;
                validate_email(&email)?;
                Some(email.to_lowercase())
            }
            None => None,
        };

        let phone = self.phone.map(|p| optional(Some(p)));
        if let Some(Some(phone)) = &phone {
            validate_phone(phone)?;
        }

        let address = self.address.map(|a| optional(Some(a)));
        if let Some(Some(address)) = &address {
            validate_max_len(address, "address", 500)?;
        }

        let location = self.location.map(|l| optional(Some(l)));
        if let Some(Some(location)) = &location {
            validate_max_len(location, "location", 200)?;
        }

        Ok(ProfilePatch {
            full_name,
            email,
            phone,
            address,
            location,
        })
    }
}

// ============================================================================
// DONATIONS & REQUESTS
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateDonationRequest {
    pub food_category: Option<String>,
    pub food_type: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub preferred_pickup_time: Option<NaiveTime>,
    pub pickup_address: Option<String>,
    pub special_instructions: Option<String>,
}

/// Checked donation payload; the owner is attached by the handler.
#[derive(Debug, Clone)]
pub struct DonationInput {
    pub food_category: String,
    pub food_type: FoodType,
    pub description: String,
    pub quantity: f64,
    pub unit: String,
    pub expiry_date: NaiveDate,
    pub preferred_pickup_time: NaiveTime,
    pub pickup_address: String,
    pub special_instructions: Option<String>,
}

impl CreateDonationRequest {
    pub fn validate(self) -> Result<DonationInput> {
        let food_category = required(self.food_category, "food_category")?;
        let food_type = required(self.food_type, "food_type")?;
        let description = required(self.description, "description")?;
        let quantity = required_value(self.quantity, "quantity")?;
        let unit = required(self.unit, "unit")?;
        let expiry_date = required_value(self.expiry_date, "expiry_date")?;
        let preferred_pickup_time = required_value(self.preferred_pickup_time, "preferred_pickup_time")?;
        let pickup_address = required(self.pickup_address, "pickup_address")?;

        let food_type = parse_enum(&food_type, "food_type must be 'veg' or 'non-veg'")?;
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(Error::Validation("quantity must be greater than zero".to_string()));
        }
        validate_max_len(&food_category, "food_category", 100)?;
        validate_max_len(&unit, "unit", 20)?;

        Ok(DonationInput {
            food_category,
            food_type,
            description,
            quantity,
            unit,
            expiry_date,
            preferred_pickup_time,
            pickup_address,
            special_instructions: optional(self.special_instructions),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateFoodRequestRequest {
    pub food_category: Option<String>,
    pub quantity_needed: Option<i32>,
    pub urgency_level: Option<String>,
    pub preferred_delivery_time: Option<NaiveTime>,
    pub delivery_address: Option<String>,
    pub special_requirements: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FoodRequestInput {
    pub food_category: String,
    pub quantity_needed: i32,
    pub urgency_level: UrgencyLevel,
    pub preferred_delivery_time: Option<NaiveTime>,
    pub delivery_address: String,
    pub special_requirements: Option<String>,
}

impl CreateFoodRequestRequest {
    pub fn validate(self) -> Result<FoodRequestInput> {
        let food_category = required(self.food_category, "food_category")?;
        let quantity_needed = required_value(self.quantity_needed, "quantity_needed")?;
        let delivery_address = required(self.delivery_address, "delivery_address")?;

        if quantity_needed <= 0 {
            return Err(Error::Validation("quantity_needed must be greater than zero".to_string()));
        }
        validate_max_len(&food_category, "food_category", 100)?;

        let urgency_level = match optional(self.urgency_level) {
            Some(level) => parse_enum(&level, "urgency_level must be 'low', 'medium' or 'high'")?,
            None => UrgencyLevel::default(),
        };

        Ok(FoodRequestInput {
            food_category,
            quantity_needed,
            urgency_level,
            preferred_delivery_time: self.preferred_delivery_time,
            delivery_address,
            special_requirements: optional(self.special_requirements),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

impl UpdateStatusRequest {
    pub fn donation_status(self) -> Result<DonationStatus> {
        let status = required(self.status, "status")?;
        parse_enum(&status, "status must be one of: pending, approved, collected, cancelled")
    }

    pub fn request_status(self) -> Result<RequestStatus> {
        let status = required(self.status, "status")?;
        parse_enum(&status, "status must be one of: pending, approved, delivered, cancelled")
    }
}

/// Query string for list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub donor_id: Option<i64>,
    pub limit: Option<i64>,
}

// ============================================================================
// OTP
// ============================================================================

const PURPOSE_MESSAGE: &str = "purpose must be one of: email_verification, password_reset, profile_update";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendOtpRequest {
    pub purpose: Option<String>,
}

impl SendOtpRequest {
    pub fn validate(self) -> Result<OtpPurpose> {
        let purpose = required(self.purpose, "purpose")?;
        parse_enum(&purpose, PURPOSE_MESSAGE)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyOtpRequest {
    pub purpose: Option<String>,
    pub otp_code: Option<String>,
}

impl VerifyOtpRequest {
    /// Returns `(purpose, code)`.
    pub fn validate(self) -> Result<(OtpPurpose, String)> {
        let purpose = required(self.purpose, "purpose")?;
        let code = required(self.otp_code, "otp_code")?;
        Ok((parse_enum(&purpose, PURPOSE_MESSAGE)?, code))
    }
}
