//! Database queries for food donations

use sqlx::Postgres;

use crate::{
    error::Result,
    models::donations::{DonationStatus, FoodDonation, NewFoodDonation},
};

use crate::DbConn;

/// Create a new donation; status starts at `pending`.
pub async fn create_donation(conn: &mut DbConn, new_donation: NewFoodDonation) -> Result<FoodDonation> {
    let donation = sqlx::query_as::<Postgres, FoodDonation>(
        r#"
        INSERT INTO food_donations (
            user_id, food_category, food_type, description, quantity, unit,
            expiry_date, preferred_pickup_time, pickup_address, special_instructions
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id, user_id, food_category, food_type, description, quantity, unit,
                  expiry_date, preferred_pickup_time, pickup_address, special_instructions,
                  status, created_at, updated_at
        "#,
    )
    .bind(new_donation.user_id)
    .bind(&new_donation.food_category)
    .bind(new_donation.food_type.as_ref())
    .bind(&new_donation.description)
    .bind(new_donation.quantity)
    .bind(&new_donation.unit)
    .bind(new_donation.expiry_date)
    .bind(new_donation.preferred_pickup_time)
    .bind(&new_donation.pickup_address)
    .bind(&new_donation.special_instructions)
    .fetch_one(conn)
    .await?;

    Ok(donation)
}

/// Get a donation by ID
pub async fn get_donation_by_id(conn: &mut DbConn, id: i64) -> Result<Option<FoodDonation>> {
    let donation = sqlx::query_as::<Postgres, FoodDonation>(
        r#"
        SELECT id, user_id, food_category, food_type, description, quantity, unit,
               expiry_date, preferred_pickup_time, pickup_address, special_instructions,
               status, created_at, updated_at
        FROM food_donations
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(donation)
}

/// Get a donor's donations, newest first
pub async fn get_donations_by_user(conn: &mut DbConn, user_id: i64, limit: i64) -> Result<Vec<FoodDonation>> {
    let donations = sqlx::query_as::<Postgres, FoodDonation>(
        r#"
        SELECT id, user_id, food_category, food_type, description, quantity, unit,
               expiry_date, preferred_pickup_time, pickup_address, special_instructions,
               status, created_at, updated_at
        FROM food_donations
        WHERE user_id = $1
        ORDER BY created_at DESC, id DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(conn)
    .await?;

    Ok(donations)
}

/// Get donations in a given status, newest first
pub async fn get_donations_by_status(
    conn: &mut DbConn,
    status: DonationStatus,
    limit: i64,
) -> Result<Vec<FoodDonation>> {
    let donations = sqlx::query_as::<Postgres, FoodDonation>(
        r#"
        SELECT id, user_id, food_category, food_type, description, quantity, unit,
               expiry_date, preferred_pickup_time, pickup_address, special_instructions,
               status, created_at, updated_at
        FROM food_donations
        WHERE status = $1
        ORDER BY created_at DESC, id DESC
        LIMIT $2
        "#,
    )
    .bind(status.as_ref())
    .bind(limit)
    .fetch_all(conn)
    .await?;

    Ok(donations)
}

/// List all donations, newest first
pub async fn list_donations(conn: &mut DbConn, limit: i64) -> Result<Vec<FoodDonation>> {
    let donations = sqlx::query_as::<Postgres, FoodDonation>(
        r#"
        SELECT id, user_id, food_category, food_type, description, quantity, unit,
               expiry_date, preferred_pickup_time, pickup_address, special_instructions,
               status, created_at, updated_at
        FROM food_donations
        ORDER BY created_at DESC, id DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(conn)
    .await?;

    Ok(donations)
}

/// Donations still awaiting pickup and not yet past their expiry date (the
/// inventory), soonest expiry first.
pub async fn get_available_donations(conn: &mut DbConn, limit: i64) -> Result<Vec<FoodDonation>> {
    let donations = sqlx::query_as::<Postgres, FoodDonation>(
        r#"
        SELECT id, user_id, food_category, food_type, description, quantity, unit,
               expiry_date, preferred_pickup_time, pickup_address, special_instructions,
               status, created_at, updated_at
        FROM food_donations
        WHERE status = 'pending' AND expiry_date >= CURRENT_DATE
        ORDER BY expiry_date ASC, id ASC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(conn)
    .await?;

    Ok(donations)
}

/// Moves a donation from `from` to `to`.
///
/// Returns `None` when the row is gone or no longer in `from`, so two racing
/// transitions cannot both apply.
pub async fn update_donation_status(
    conn: &mut DbConn,
    id: i64,
    from: DonationStatus,
    to: DonationStatus,
) -> Result<Option<FoodDonation>> {
    let donation = sqlx::query_as::<Postgres, FoodDonation>(
        r#"
        UPDATE food_donations
        SET status = $3, updated_at = NOW()
        WHERE id = $1 AND status = $2
        RETURNING id, user_id, food_category, food_type, description, quantity, unit,
                  expiry_date, preferred_pickup_time, pickup_address, special_instructions,
                  status, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(from.as_ref())
    .bind(to.as_ref())
    .fetch_optional(conn)
    .await?;

    Ok(donation)
}
