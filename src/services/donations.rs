use crate::{
    DbConn,
    error::{Error, Result},
    models::{
        donations::{DonationStatus, FoodDonation, NewFoodDonation},
        notifications::{NewNotification, NotificationType, RelatedEntityType},
        requests::{DonationInput, ListQuery},
        users::UserRole,
    },
    queries::{donations, notifications},
    validation::clamp_limit,
};

pub async fn create_donation(conn: &mut DbConn, user_id: i64, input: DonationInput) -> Result<FoodDonation> {
    let new_donation = NewFoodDonation {
        user_id,
        food_category: input.food_category,
        food_type: input.food_type,
        description: input.description,
        quantity: input.quantity,
        unit: input.unit,
        expiry_date: input.expiry_date,
        preferred_pickup_time: input.preferred_pickup_time,
        pickup_address: input.pickup_address,
        special_instructions: input.special_instructions,
    };

    let donation = donations::create_donation(conn, new_donation).await?;

    tracing::info!(donation_id = donation.id, user_id, "Donation created");

    Ok(donation)
}

/// Lists donations filtered by `donor_id`, else by `status`, else unfiltered.
pub async fn list_donations(conn: &mut DbConn, query: ListQuery) -> Result<Vec<FoodDonation>> {
    let limit = clamp_limit(query.limit);

    if let Some(donor_id) = query.donor_id {
        return donations::get_donations_by_user(conn, donor_id, limit).await;
    }

    match query.status.filter(|s| !s.trim().is_empty()) {
        Some(status) => {
            let status = status
                .trim()
                .parse::<DonationStatus>()
                .map_err(|_| Error::Validation(format!("Unknown donation status: {}", status.trim())))?;
            donations::get_donations_by_status(conn, status, limit).await
        }
        None => donations::list_donations(conn, limit).await,
    }
}

/// Pending, unexpired donations, i.e. food still waiting to be collected.
pub async fn get_inventory(conn: &mut DbConn, limit: Option<i64>) -> Result<Vec<FoodDonation>> {
    donations::get_available_donations(conn, clamp_limit(limit)).await
}

/// Applies a status change requested by `actor_id`.
///
/// Admins may approve, collect or cancel; the donor may only cancel their own
/// donation. The donor is notified of every change.
pub async fn update_status(
    conn: &mut DbConn,
    actor_id: i64,
    actor_role: UserRole,
    donation_id: i64,
    next: DonationStatus,
) -> Result<FoodDonation> {
    let donation = donations::get_donation_by_id(conn, donation_id)
        .await?
        .ok_or_else(|| Error::NotFound("Donation not found".to_string()))?;

    let is_owner = donation.user_id == actor_id;
    let allowed = actor_role == UserRole::Admin || (is_owner && next == DonationStatus::Cancelled);
    if !allowed {
        return Err(Error::Forbidden(
            "You do not have permission to change this donation's status".to_string(),
        ));
    }

    if !donation.status.can_transition_to(next) {
        return Err(Error::Validation(format!(
            "Cannot change donation status from {} to {}",
            donation.status, next
        )));
    }

    let updated = donations::update_donation_status(conn, donation_id, donation.status, next)
        .await?
        .ok_or_else(|| Error::Conflict("Donation status was changed by another request".to_string()))?;

    let (title, notification_type) = match next {
        DonationStatus::Approved => ("Donation approved", NotificationType::Success),
        DonationStatus::Collected => ("Donation collected", NotificationType::Success),
        DonationStatus::Cancelled => ("Donation cancelled", NotificationType::Warning),
        DonationStatus::Pending => ("Donation updated", NotificationType::Info),
    };

    notifications::create_notification(
        conn,
        NewNotification {
            user_id: updated.user_id,
            title: title.to_string(),
            message: format!(
                "Your donation of {} {} {} is now {}.",
                updated.quantity, updated.unit, updated.food_category, updated.status
            ),
            notification_type,
            related_entity_type: RelatedEntityType::Donation,
            related_entity_id: Some(updated.id),
        },
    )
    .await?;

    tracing::info!(
        donation_id,
        actor_id,
        from = %donation.status,
        to = %updated.status,
        "Donation status changed"
    );

    Ok(updated)
}
