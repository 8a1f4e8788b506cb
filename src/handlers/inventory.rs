use axum::{
    Json,
    extract::{Extension, Query, State, rejection::QueryRejection},
};
use serde_json::json;

use crate::{
    database, error::Result, middleware::auth::AuthenticatedUser, models::requests::ListQuery,
    services::donations, state::AppState,
};

/// GET /api/inventory
///
/// Pending donations that have not passed their expiry date, soonest first.
/// Accepts `limit` (1-100, default 10).
pub async fn get_inventory(
    State(state): State<AppState>,
    Extension(_auth_user): Extension<AuthenticatedUser>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>> {
    let Query(query) = query?;

    let mut conn = database::acquire(&state.pool).await?;
    let inventory = donations::get_inventory(&mut conn, query.limit).await?;

    Ok(Json(json!({
        "count": inventory.len(),
        "inventory": inventory,
    })))
}
