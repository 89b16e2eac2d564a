//! `assetflow-mock`: a mock backend serving a static asset catalog, synthetic
//! telemetry and power series, and an in-memory per-asset configuration
//! store, over HTTP plus a periodic WebSocket broadcast.
//!
//! Modules follow the Explicit Module Boundary Pattern (EMBP): siblings import
//! each other only through the re-exports below, never by reaching into one
//! another's internals.

use axum::Router;

pub mod broadcast;
pub mod catalog;
pub mod config;
pub mod configuration;
pub mod error;
pub mod models;
pub mod power;
mod routes;
pub mod state;
pub mod telemetry;

pub use broadcast::{Delivery, Frame, SubscriberSet, Subscription};
pub use catalog::Catalog;
pub use config::Config;
pub use configuration::{
    AssetConfiguration, ConfigurationStore, MaintenanceMode, OperatingMode, Priority,
};
pub use error::{ApiError, FieldError};
pub use models::{
    round_to, Asset, PowerDataPoint, PowerMetadata, PowerSeries, TelemetryReading,
    TelemetryUpdate,
};
pub use state::{shared_rng, AppState, SharedRng};

// ---

/// Build the full application router over `state`.
pub fn app(state: AppState) -> Router {
    routes::router(state)
}
