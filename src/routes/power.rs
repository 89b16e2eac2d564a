use axum::{extract::Path, extract::State, routing::get, Json, Router};
use chrono::Utc;
use tracing::{debug, info};

use crate::{power, ApiError, AppState, PowerSeries};

// ---

pub fn router() -> Router<AppState> {
    Router::new().route("/api/power/{asset_id}", get(handler))
}

/// Power history (8 hours at 15-minute steps) and forecast (16 hours at
/// 30-minute steps) for one asset, in kW. Negative values are generation.
async fn handler(
    Path(asset_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<PowerSeries>, ApiError> {
    // ---
    debug!("GET /api/power/{}", asset_id);
    let series = {
        let mut rng = state.rng.lock();
        power::generate(&state.catalog, &asset_id, Utc::now(), &mut *rng)?
    };
    info!(
        asset_id = %series.asset_id,
        history = series.history.len(),
        forecast = series.forecast.len(),
        "power series generated"
    );
    Ok(Json(series))
}
