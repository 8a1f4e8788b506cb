use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr)]
pub enum FoodType {
    #[serde(rename = "veg")]
    #[strum(serialize = "veg")]
    Veg,
    #[serde(rename = "non-veg")]
    #[strum(serialize = "non-veg")]
    NonVeg,
}

/// Donation lifecycle: `pending → approved → collected`, or `→ cancelled`
/// from any non-terminal state.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DonationStatus {
    #[default]
    Pending,
    Approved,
    Collected,
    Cancelled,
}

impl DonationStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, DonationStatus::Collected | DonationStatus::Cancelled)
    }

    pub fn can_transition_to(self, next: DonationStatus) -> bool {
        use DonationStatus::*;
        if self.is_terminal() {
            return false;
        }
        matches!((self, next), (Pending, Approved) | (Approved, Collected) | (_, Cancelled))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FoodDonation {
    pub id: i64,
    pub user_id: i64,
    pub food_category: String,
    #[sqlx(try_from = "String")]
    pub food_type: FoodType,
    pub description: String,
    pub quantity: f64,
    pub unit: String,
    pub expiry_date: NaiveDate,
    pub preferred_pickup_time: NaiveTime,
    pub pickup_address: String,
    pub special_instructions: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: DonationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFoodDonation {
    pub user_id: i64,
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
