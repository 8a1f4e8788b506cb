pub mod donations;
pub mod food_requests;
pub mod notifications;
pub mod otp;
pub mod requests;
pub mod users;

/// Lets a closed string enum be read straight out of a `TEXT` column with
/// `#[sqlx(try_from = "String")]`.
macro_rules! text_column_enum {
    ($($name:ty),+ $(,)?) => {
        $(
            impl TryFrom<String> for $name {
                type Error = strum::ParseError;

                fn try_from(value: String) -> Result<Self, strum::ParseError> {
                    value.parse()
                }
            }
        )+
    };
}

text_column_enum!(
    users::UserRole,
    donations::FoodType,
    donations::DonationStatus,
    food_requests::UrgencyLevel,
    food_requests::RequestStatus,
    notifications::NotificationType,
    notifications::RelatedEntityType,
    otp::OtpPurpose,
);
