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
    models::requests::{CreateDonationRequest, ListQuery, UpdateStatusRequest},
    services::donations,
    state::AppState,
};

/// GET /api/donations
///
/// # Query Parameters
/// - `donor_id`: only this donor's donations (takes precedence)
/// - `status`: only donations in this status
/// - `limit`: 1-100, default 10
pub async fn list_donations(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthenticatedUser>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>> {
    let Query(query) = query?;

    let mut conn = database::acquire(&state.pool).await?;
    let donations = donations::list_donations(&mut conn, query).await?;

    Ok(Json(json!({
        "count": donations.len(),
        "donations": donations,
    })))
}

/// POST /api/donations
///
/// The caller becomes the donor; the donation starts out `pending`.
pub async fn create_donation(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    body: std::result::Result<Json<CreateDonationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let Json(request) = body?;
    let input = request.validate()?;

    let mut conn = database::acquire(&state.pool).await?;
    let donation = donations::create_donation(&mut conn, auth_user.id, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Donation created successfully",
            "donation": donation,
        })),
    ))
}

/// PUT /api/donations/{id}/status
pub async fn update_donation_status(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    path: std::result::Result<Path<i64>, PathRejection>,
    body: std::result::Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>> {
    let Path(donation_id) = path?;
    let Json(request) = body?;
    let next = request.donation_status()?;

    let mut tx = state.pool.begin().await?;
    let donation = donations::update_status(&mut tx, auth_user.id, auth_user.role, donation_id, next).await?;
    tx.commit().await?;

    Ok(Json(json!({
        "message": "Donation status updated",
        "donation": donation,
    })))
}
