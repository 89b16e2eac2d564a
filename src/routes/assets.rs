use axum::{extract::Path, extract::State, routing::get, Json, Router};
use tracing::debug;

use crate::{ApiError, AppState, Asset};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/api/assets", get(list_assets))
        .route("/api/assets/{asset_id}", get(get_asset))
}

async fn list_assets(State(state): State<AppState>) -> Json<Vec<Asset>> {
    // ---
    debug!("GET /api/assets - {} assets", state.catalog.len());
    Json(state.catalog.assets().to_vec())
}

async fn get_asset(
    Path(asset_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Asset>, ApiError> {
    // ---
    debug!("GET /api/assets/{}", asset_id);
    state
        .catalog
        .find(&asset_id)
        .cloned()
        .map(Json)
        .ok_or_else(ApiError::asset_not_found)
}
