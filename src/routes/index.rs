//! Service metadata served at `/`.

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::AppState;

// ---

pub const SERVICE_NAME: &str = "Asset Management API";

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

async fn index() -> Json<Value> {
    // ---
    Json(json!({
        "message": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "assets": "/api/assets",
            "asset": "/api/assets/{asset_id}",
            "telemetry": "/api/telemetry/{asset_id}",
            "power_data": "/api/power/{asset_id}",
            "configuration": "/api/configuration",
            "configurations": "/api/configurations",
            "health": "/health",
            "websocket": "/ws/telemetry"
        }
    }))
}
