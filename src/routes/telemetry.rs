use axum::{extract::Path, extract::State, routing::get, Json, Router};
use chrono::Utc;
use tracing::debug;

use crate::{telemetry, ApiError, AppState, TelemetryReading};

// ---

pub fn router() -> Router<AppState> {
    Router::new().route("/api/telemetry/{asset_id}", get(handler))
}

async fn handler(
    Path(asset_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<TelemetryReading>, ApiError> {
    // ---
    debug!("GET /api/telemetry/{}", asset_id);
    let mut rng = state.rng.lock();
    let reading = telemetry::generate(&state.catalog, &asset_id, Utc::now(), &mut *rng)?;
    Ok(Json(reading))
}
