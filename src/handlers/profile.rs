use axum::{
    Json,
    extract::{Extension, State, rejection::JsonRejection},
};
use serde_json::json;

use crate::{
    database,
    error::{Error, Result},
    middleware::auth::AuthenticatedUser,
    models::{requests::UpdateProfileRequest, users::UserProfile},
    queries,
    services::users,
    state::AppState,
};

/// GET /api/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = database::acquire(&state.pool).await?;
    let user = queries::users::get_user_by_id(&mut conn, auth_user.id)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    Ok(Json(json!({ "user": UserProfile::from(user) })))
}

/// PUT /api/profile
///
/// Only the fields present in the body change. A new email must not belong
/// to another user (`400 Email already taken`, nothing is written).
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    body: std::result::Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>> {
    let Json(request) = body?;
    let patch = request.validate()?;

    let mut tx = state.pool.begin().await?;
    let user = users::update_profile(&mut tx, auth_user.id, patch).await?;
    tx.commit().await?;

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": UserProfile::from(user),
    })))
}
