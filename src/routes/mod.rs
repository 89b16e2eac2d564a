//! Route gateway.
//!
//! Each sibling module exports a subrouter over [`AppState`]; this module
//! merges them, attaches the shared layers and binds the state so `lib.rs`
//! never needs to know individual endpoints.

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

mod assets;
mod configuration;
mod health;
mod index;
mod power;
mod telemetry;
mod ws;

// ---

pub fn router(state: AppState) -> Router {
    // ---
    Router::new()
        .merge(index::router())
        .merge(health::router())
        .merge(assets::router())
        .merge(telemetry::router())
        .merge(power::router())
        .merge(configuration::router())
        .merge(ws::router())
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
