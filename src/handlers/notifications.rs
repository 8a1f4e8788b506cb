use axum::{
    Json,
    extract::{
        Extension, Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use serde_json::json;

use crate::{
    database,
    error::{Error, Result},
    middleware::auth::AuthenticatedUser,
    models::requests::ListQuery,
    queries::notifications,
    state::AppState,
    validation::clamp_limit,
};

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>> {
    let Query(query) = query?;

    let mut conn = database::acquire(&state.pool).await?;
    let notifications =
        notifications::get_notifications_by_user(&mut conn, auth_user.id, clamp_limit(query.limit)).await?;

    Ok(Json(json!({
        "count": notifications.len(),
        "notifications": notifications,
    })))
}

/// PUT /api/notifications/{id}/read
///
/// Another user's notification is reported as not found.
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    path: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<serde_json::Value>> {
    let Path(notification_id) = path?;

    let mut conn = database::acquire(&state.pool).await?;
    let notification = notifications::mark_notification_read(&mut conn, notification_id, auth_user.id)
        .await?
        .ok_or_else(|| Error::NotFound("Notification not found".to_string()))?;

    Ok(Json(json!({ "notification": notification })))
}
