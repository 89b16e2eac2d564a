//! Simple data models for the asset service.
//!
//! Everything here is a plain serde type. Telemetry and power series values
//! are constructed fresh by the generators on every request and never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---

/// Status string for an asset running normally.
pub const STATUS_OPERATIONAL: &str = "operational";
/// Status string for an asset idling in reserve.
pub const STATUS_STANDBY: &str = "standby";
/// Status string for an asset taken out of service.
pub const STATUS_MAINTENANCE: &str = "maintenance";

/// A piece of tracked equipment from the static catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    // ---
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub location: String,
    pub status: String,
    pub last_updated: DateTime<Utc>,
}

impl Asset {
    pub fn is_operational(&self) -> bool {
        self.status == STATUS_OPERATIONAL
    }
}

/// One synthesized sensor snapshot for an asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryReading {
    // ---
    pub asset_id: String,
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub pressure: f64,
    pub vibration: f64,
    pub power_consumption: f64,
    pub status: String,
}

/// A single sample of a power series. Negative `power_kw` means generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerDataPoint {
    // ---
    pub timestamp: DateTime<Utc>,
    pub power_kw: f64,
    pub efficiency: f64,
}

/// Summary statistics attached to a power series response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerMetadata {
    // ---
    pub status: String,
    pub history_period_hours: u32,
    pub forecast_period_hours: u32,
    pub avg_historical_power_kw: f64,
    pub avg_forecast_power_kw: f64,
    pub avg_efficiency_percent: f64,
    pub peak_power_kw: f64,
    pub min_power_kw: f64,
    pub is_generator: bool,
    pub unit: String,
}

/// Historical and forecast power data for one asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerSeries {
    // ---
    pub asset_id: String,
    pub asset_name: String,
    pub asset_type: String,
    pub history: Vec<PowerDataPoint>,
    pub forecast: Vec<PowerDataPoint>,
    pub metadata: PowerMetadata,
}

/// Message pushed to every WebSocket subscriber on each broadcast tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryUpdate {
    // ---
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: DateTime<Utc>,
    pub data: Vec<TelemetryReading>,
}

impl TelemetryUpdate {
    pub const KIND: &'static str = "telemetry_update";

    pub fn new(timestamp: DateTime<Utc>, data: Vec<TelemetryReading>) -> Self {
        // ---
        Self {
            kind: Self::KIND.to_string(),
            timestamp,
            data,
        }
    }
}

/// Round half away from zero to `places` decimal places.
///
/// Used for every numeric value the generators emit so rounding is uniform.
pub fn round_to(value: f64, places: i32) -> f64 {
    // ---
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
