use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UrgencyLevel {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Delivered,
    Cancelled,
}

impl RequestStatus {
    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        use RequestStatus::*;
        matches!(
            (self, next),
            (Pending, Approved) | (Approved, Delivered) | (Pending, Cancelled) | (Approved, Cancelled)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FoodRequest {
    pub id: i64,
    pub user_id: i64,
    pub food_category: String,
    pub quantity_needed: i32,
    #[sqlx(try_from = "String")]
    pub urgency_level: UrgencyLevel,
    pub preferred_delivery_time: Option<NaiveTime>,
    pub delivery_address: String,
    pub special_requirements: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFoodRequest {
    pub user_id: i64,
    pub food_category: String,
    pub quantity_needed: i32,
    pub urgency_level: UrgencyLevel,
    pub preferred_delivery_time: Option<NaiveTime>,
    pub delivery_address: String,
    pub special_requirements: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_defaults_to_medium() {
        assert_eq!(UrgencyLevel::default(), UrgencyLevel::Medium);
        assert_eq!("high".parse::<UrgencyLevel>().unwrap(), UrgencyLevel::High);
    }

    #[test]
    fn test_request_transitions() {
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Approved));
        assert!(RequestStatus::Approved.can_transition_to(RequestStatus::Delivered));
        assert!(RequestStatus::Approved.can_transition_to(RequestStatus::Cancelled));
        assert!(!RequestStatus::Pending.can_transition_to(RequestStatus::Delivered));
        assert!(!RequestStatus::Delivered.can_transition_to(RequestStatus::Cancelled));
    }
}
