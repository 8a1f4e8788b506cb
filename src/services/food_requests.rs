use crate::{
    DbConn,
    error::{Error, Result},
    models::{
        food_requests::{FoodRequest, NewFoodRequest, RequestStatus},
        notifications::{NewNotification, NotificationType, RelatedEntityType},
        requests::{FoodRequestInput, ListQuery},
        users::UserRole,
    },
    queries::{food_requests, notifications},
    validation::clamp_limit,
};

pub async fn create_food_request(conn: &mut DbConn, user_id: i64, input: FoodRequestInput) -> Result<FoodRequest> {
    let new_request = NewFoodRequest {
        user_id,
        food_category: input.food_category,
        quantity_needed: input.quantity_needed,
        urgency_level: input.urgency_level,
        preferred_delivery_time: input.preferred_delivery_time,
        delivery_address: input.delivery_address,
        special_requirements: input.special_requirements,
    };

    let request = food_requests::create_food_request(conn, new_request).await?;

    tracing::info!(request_id = request.id, user_id, urgency = %request.urgency_level, "Food request created");

    Ok(request)
}

/// Recipients see their own requests. Admins see every request, optionally
/// narrowed by `status`.
pub async fn list_food_requests(
    conn: &mut DbConn,
    actor_id: i64,
    actor_role: UserRole,
    query: ListQuery,
) -> Result<Vec<FoodRequest>> {
    let limit = clamp_limit(query.limit);

    if actor_role != UserRole::Admin {
        return food_requests::get_food_requests_by_user(conn, actor_id, limit).await;
    }

    match query.status.filter(|s| !s.trim().is_empty()) {
        Some(status) => {
            let status = status
                .trim()
                .parse::<RequestStatus>()
                .map_err(|_| Error::Validation(format!("Unknown request status: {}", status.trim())))?;
            food_requests::get_food_requests_by_status(conn, status, limit).await
        }
        None => food_requests::list_food_requests(conn, limit).await,
    }
}

/// Same ownership rules as donations: admins drive the lifecycle, the
/// requester may cancel.
pub async fn update_status(
    conn: &mut DbConn,
    actor_id: i64,
    actor_role: UserRole,
    request_id: i64,
    next: RequestStatus,
) -> Result<FoodRequest> {
    let request = food_requests::get_food_request_by_id(conn, request_id)
        .await?
        .ok_or_else(|| Error::NotFound("Food request not found".to_string()))?;

    let is_owner = request.user_id == actor_id;
    if actor_role != UserRole::Admin && !(is_owner && next == RequestStatus::Cancelled) {
        return Err(Error::Forbidden(
            "You do not have permission to change this request's status".to_string(),
        ));
    }

    if !request.status.can_transition_to(next) {
        return Err(Error::Validation(format!(
            "Cannot change request status from {} to {}",
            request.status, next
        )));
    }

    let updated = food_requests::update_food_request_status(conn, request_id, request.status, next)
        .await?
        .ok_or_else(|| Error::Conflict("Request status was changed by another request".to_string()))?;

    let (title, notification_type) = match next {
        RequestStatus::Approved => ("Food request approved", NotificationType::Success),
        RequestStatus::Delivered => ("Food request delivered", NotificationType::Success),
        RequestStatus::Cancelled => ("Food request cancelled", NotificationType::Warning),
        RequestStatus::Pending => ("Food request updated", NotificationType::Info),
    };

    notifications::create_notification(
        conn,
        NewNotification {
            user_id: updated.user_id,
            title: title.to_string(),
            message: format!(
                "Your request for {} x {} is now {}.",
                updated.quantity_needed, updated.food_category, updated.status
            ),
            notification_type,
            related_entity_type: RelatedEntityType::Request,
            related_entity_id: Some(updated.id),
        },
    )
    .await?;

    tracing::info!(
        request_id,
        actor_id,
        from = %request.status,
        to = %updated.status,
        "Food request status changed"
    );

    Ok(updated)
}
