use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::{ApiError, AppState, AssetConfiguration};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/api/configuration", post(upsert))
        .route(
            "/api/configuration/{asset_id}",
            get(get_one).delete(delete_one),
        )
        .route("/api/configurations", get(list_all))
}

#[derive(Debug, Serialize)]
struct ConfigurationList {
    configurations: Vec<AssetConfiguration>,
    count: usize,
}

#[derive(Debug, Serialize)]
struct DeleteResponse {
    message: &'static str,
    deleted: AssetConfiguration,
}

/// Create or replace the configuration for an asset.
///
/// The body is decoded by hand rather than through `Json<T>` so that shape
/// errors (missing fields, unknown enum values) come back as `400` with the
/// offending field named, same as range violations.
async fn upsert(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AssetConfiguration>, ApiError> {
    // ---
    debug!("POST /api/configuration - {} bytes", body.len());
    let config = AssetConfiguration::from_json(&body)?;
    let stored = state.store.upsert(config, &state.catalog)?;
    Ok(Json(stored))
}

async fn get_one(
    Path(asset_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<AssetConfiguration>, ApiError> {
    // ---
    debug!("GET /api/configuration/{}", asset_id);
    state.store.get(&asset_id).map(Json)
}

async fn list_all(State(state): State<AppState>) -> Json<ConfigurationList> {
    // ---
    let configurations = state.store.list();
    debug!("GET /api/configurations - {} stored", configurations.len());
    Json(ConfigurationList {
        count: configurations.len(),
        configurations,
    })
}

async fn delete_one(
    Path(asset_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, ApiError> {
    // ---
    info!("DELETE /api/configuration/{}", asset_id);
    let deleted = state.store.delete(&asset_id)?;
    Ok(Json(DeleteResponse {
        message: "Configuration deleted successfully",
        deleted,
    }))
}
