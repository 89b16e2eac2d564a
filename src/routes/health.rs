// src/routes/health.rs
//! Liveness endpoint for the asset service.
//!
//! `/health` answers without touching the generators or the configuration
//! store's contents, so orchestrators and CI can probe it cheaply. It also
//! reports how many assets are served and how many WebSocket subscribers are
//! currently attached.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    assets: usize,
    subscribers: usize,
}

/// Handle `GET /health`.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        assets: state.catalog.len(),
        subscribers: state.subscribers.len(),
    })
}

/// Create a subrouter containing the `/health` route.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
