//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON API, the upload endpoint, and the realtime
//! feed under a single Axum router. Every request gets a `tower-http` trace
//! span; CORS is open because the browser shell may be served elsewhere.

pub mod ads;
pub mod auth;
pub mod uploads;
pub mod ws;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Body allowance past the image limit, so oversize images still reach
/// `validate_image` and get its error.
const UPLOAD_BODY_SLACK: usize = 1024;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_limit = state.config.max_image_bytes + UPLOAD_BODY_SLACK;

    Router::new()
        .route("/api/ads", get(ads::list_ads).post(ads::create_ad))
        .route("/api/ads/{id}", delete(ads::delete_ad))
        .route(
            "/api/uploads",
            post(uploads::upload_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/ws", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
