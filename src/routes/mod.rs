//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON session API and the per-session websocket
//! under a single Axum router. There is no authentication; a session id is
//! the only capability a client holds.

pub mod sessions;
pub mod ws;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Phone photos as base64 data URLs routinely exceed axum's 2 MB default.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Full HTTP + websocket router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/options", get(sessions::list_options))
        .route("/api/sessions", post(sessions::create_session))
        .route("/api/sessions/{id}", get(sessions::get_session).delete(sessions::delete_session))
        .route("/api/sessions/{id}/photo", post(sessions::submit_photo))
        .route("/api/sessions/{id}/budget", post(sessions::choose_budget))
        .route("/api/sessions/{id}/mood", post(sessions::choose_mood))
        .route("/api/sessions/{id}/visualize", post(sessions::request_visualize))
        .route("/api/sessions/{id}/reset", post(sessions::reset_session))
        .route("/api/sessions/{id}/ws", get(ws::handle_ws))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
