//! Router assembly: API routes, static frontend, cross-cutting layers.

use std::path::Path;

use axum::{
    Router,
    body::Body,
    extract::Request,
    http::header::HeaderName,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use tower::{ServiceBuilder, ServiceExt};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{
    error::Error,
    handlers::{auth, donations, food_requests, health, inventory, notifications, otp, profile},
    middleware::jwt_auth_middleware,
    state::AppState,
};

const REQUEST_ID_HEADER: &str = "x-request-id";

fn api_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(health::api_index))
        .route("/health", get(health::health_check))
        .route("/auth/status", get(health::auth_status))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/reset-password", post(auth::reset_password));

    let protected = Router::new()
        .route("/profile", get(profile::get_profile).put(profile::update_profile))
        .route(
            "/donations",
            get(donations::list_donations).post(donations::create_donation),
        )
        .route("/donations/{id}/status", put(donations::update_donation_status))
        .route(
            "/requests",
            get(food_requests::list_food_requests).post(food_requests::create_food_request),
        )
        .route("/requests/{id}/status", put(food_requests::update_food_request_status))
        .route("/inventory", get(inventory::get_inventory))
        .route("/otp/send", post(otp::send_otp))
        .route("/otp/verify", post(otp::verify_otp))
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/{id}/read", put(notifications::mark_notification_read))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    public.merge(protected)
}

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// Builds the full application router.
///
/// Unknown `/api/*` paths answer a JSON 404. Everything else is served from
/// `server.static_dir`, falling back to `index.html` for client-side routes.
pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.server.static_dir.clone();
    let static_files =
        ServeDir::new(&static_dir).fallback(ServeFile::new(Path::new(&static_dir).join("index.html")));

    let fallback = move |request: Request| {
        let static_files = static_files.clone();
        async move {
            if is_api_path(request.uri().path()) {
                return Error::NotFound("API endpoint not found".to_string()).into_response();
            }
            match static_files.oneshot(request).await {
                Ok(response) => response.into_response(),
                Err(never) => match never {},
            }
        }
    };

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let layers = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
        .layer(PropagateRequestIdLayer::new(request_id))
        .layer(CorsLayer::permissive());

    Router::new()
        .nest("/api", api_routes(&state))
        .fallback(fallback)
        .layer(layers)
        .with_state(state)
}
