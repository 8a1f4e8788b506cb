//! Database queries for recipients' food requests

use sqlx::Postgres;

use crate::{
    error::Result,
    models::food_requests::{FoodRequest, NewFoodRequest, RequestStatus},
};

use crate::DbConn;

/// Create a new food request; status starts at `pending`.
pub async fn create_food_request(conn: &mut DbConn, new_request: NewFoodRequest) -> Result<FoodRequest> {
    let request = sqlx::query_as::<Postgres, FoodRequest>(
        r#"
        INSERT INTO food_requests (
            user_id, food_category, quantity_needed, urgency_level,
            preferred_delivery_time, delivery_address, special_requirements
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, user_id, food_category, quantity_needed, urgency_level,
                  preferred_delivery_time, delivery_address, special_requirements,
                  status, created_at, updated_at
        "#,
    )
    .bind(new_request.user_id)
    .bind(&new_request.food_category)
    .bind(new_request.quantity_needed)
    .bind(new_request.urgency_level.as_ref())
    .bind(new_request.preferred_delivery_time)
    .bind(&new_request.delivery_address)
    .bind(&new_request.special_requirements)
    .fetch_one(conn)
    .await?;

    Ok(request)
}

pub async fn get_food_request_by_id(conn: &mut DbConn, id: i64) -> Result<Option<FoodRequest>> {
    let request = sqlx::query_as::<Postgres, FoodRequest>(
        r#"
        SELECT id, user_id, food_category, quantity_needed, urgency_level,
               preferred_delivery_time, delivery_address, special_requirements,
               status, created_at, updated_at
        FROM food_requests
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(request)
}

pub async fn get_food_requests_by_user(conn: &mut DbConn, user_id: i64, limit: i64) -> Result<Vec<FoodRequest>> {
    let requests = sqlx::query_as::<Postgres, FoodRequest>(
        r#"
        SELECT id, user_id, food_category, quantity_needed, urgency_level,
               preferred_delivery_time, delivery_address, special_requirements,
               status, created_at, updated_at
        FROM food_requests
        WHERE user_id = $1
        ORDER BY created_at DESC, id DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(conn)
    .await?;

    Ok(requests)
}

pub async fn get_food_requests_by_status(
    conn: &mut DbConn,
    status: RequestStatus,
    limit: i64,
) -> Result<Vec<FoodRequest>> {
    let requests = sqlx::query_as::<Postgres, FoodRequest>(
        r#"
        SELECT id, user_id, food_category, quantity_needed, urgency_level,
               preferred_delivery_time, delivery_address, special_requirements,
               status, created_at, updated_at
        FROM food_requests
        WHERE status = $1
        ORDER BY created_at DESC, id DESC
        LIMIT $2
        "#,
    )
    .bind(status.as_ref())
    .bind(limit)
    .fetch_all(conn)
    .await?;

    Ok(requests)
}

pub async fn list_food_requests(conn: &mut DbConn, limit: i64) -> Result<Vec<FoodRequest>> {
    let requests = sqlx::query_as::<Postgres, FoodRequest>(
        r#"
        SELECT id, user_id, food_category, quantity_needed, urgency_level,
               preferred_delivery_time, delivery_address, special_requirements,
               status, created_at, updated_at
        FROM food_requests
        ORDER BY created_at DESC, id DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(conn)
    .await?;

    Ok(requests)
}

/// Compare-and-set status update; `None` if the request is gone or no longer in `from`.
pub async fn update_food_request_status(
    conn: &mut DbConn,
    id: i64,
    from: RequestStatus,
    to: RequestStatus,
) -> Result<Option<FoodRequest>> {
    let request = sqlx::query_as::<Postgres, FoodRequest>(
        r#"
        UPDATE food_requests
        SET status = $3, updated_at = NOW()
        WHERE id = $1 AND status = $2
        RETURNING id, user_id, food_category, quantity_needed, urgency_level,
                  preferred_delivery_time, delivery_address, special_requirements,
                  status, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(from.as_ref())
    .bind(to.as_ref())
    .fetch_optional(conn)
    .await?;

    Ok(request)
}
