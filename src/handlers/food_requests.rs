use axum::{
    Json,
    extract::{
        Extension, Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde_json::json;

use crate::{
    database,
    error::Result,
    middleware::auth::AuthenticatedUser,
    models::requests::{CreateFoodRequestRequest, ListQuery, UpdateStatusRequest},
    services::food_requests,
    state::AppState,
};

/// GET /api/requests
pub async fn list_food_requests(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>> {
    let Query(query) = query?;

    let mut conn = database::acquire(&state.pool).await?;
    let requests = food_requests::list_food_requests(&mut conn, auth_user.id, auth_user.role, query).await?;

    Ok(Json(json!({
        "count": requests.len(),
        "requests": requests,
    })))
}

/// POST /api/requests
pub async fn create_food_request(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    body: std::result::Result<Json<CreateFoodRequestRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let Json(request) = body?;
    let input = request.validate()?;

    let mut conn = database::acquire(&state.pool).await?;
    let food_request = food_requests::create_food_request(&mut conn, auth_user.id, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Food request created successfully",
            "request": food_request,
        })),
    ))
}

/// PUT /api/requests/{id}/status
pub async fn update_food_request_status(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    path: std::result::Result<Path<i64>, PathRejection>,
    body: std::result::Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>> {
    let Path(request_id) = path?;
    let Json(request) = body?;
    let next = request.request_status()?;

    let mut tx = state.pool.begin().await?;
    let food_request = food_requests::update_status(&mut tx, auth_user.id, auth_user.role, request_id, next).await?;
    tx.commit().await?;

    Ok(Json(json!({
        "message": "Request status updated",
        "request": food_request,
    })))
}
