//! Power history and forecast synthesis.
//!
//! Both series share a base load derived from the asset type and status,
//! shaped by a time-of-day factor that peaks at noon UTC and bottoms out at
//! midnight. History carries wider noise; the forecast carries narrower
//! noise plus a small linear drift.

use std::f64::consts::PI;

use chrono::{DateTime, Duration, Timelike, Utc};
use rand::Rng;

use crate::models::{STATUS_MAINTENANCE, STATUS_OPERATIONAL, STATUS_STANDBY};
use crate::{round_to, ApiError, Asset, Catalog, PowerDataPoint, PowerMetadata, PowerSeries};

// ---

pub const HISTORY_POINTS: usize = 32;
pub const HISTORY_STEP_MINUTES: i64 = 15;
pub const HISTORY_PERIOD_HOURS: u32 = 8;

pub const FORECAST_POINTS: usize = 32;
pub const FORECAST_STEP_MINUTES: i64 = 30;
pub const FORECAST_PERIOD_HOURS: u32 = 16;

const HISTORY_NOISE: f64 = 0.15;
const FORECAST_NOISE: f64 = 0.08;
const FORECAST_DRIFT: f64 = 0.02;

pub const POWER_UNIT: &str = "kW";

/// Nominal draw in kW for an asset type. Generators are negative.
pub fn nominal_power_kw(asset_type: &str) -> f64 {
    // ---
    match asset_type {
        "pump" => 15.0,
        "compressor" => 45.0,
        "generator" => -100.0,
        "motor" => 25.0,
        "turbine" => -200.0,
        _ => 50.0,
    }
}

/// Nominal power adjusted for the asset's status.
pub fn base_power_kw(asset_type: &str, status: &str) -> f64 {
    // ---
    let power = nominal_power_kw(asset_type);
    match status {
        STATUS_STANDBY => power * 0.1,
        STATUS_MAINTENANCE => 0.0,
        _ => power,
    }
}

/// `1 + 0.3·sin((h − 6)·π/12)` for hour-of-day `h`.
pub fn time_of_day_factor(hour: u32) -> f64 {
    1.0 + 0.3 * ((f64::from(hour) - 6.0) * PI / 12.0).sin()
}

/// Generate the power series for `asset_id` anchored at `now`.
pub fn generate<R: Rng + ?Sized>(
    catalog: &Catalog,
    asset_id: &str,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<PowerSeries, ApiError> {
    // ---
    let asset = catalog.find(asset_id).ok_or_else(ApiError::asset_not_found)?;
    Ok(series_for(asset, now, rng))
}

/// Generate the power series for an already resolved asset.
pub fn series_for<R: Rng + ?Sized>(asset: &Asset, now: DateTime<Utc>, rng: &mut R) -> PowerSeries {
    // ---
    let status = asset.status.as_str();
    let base = base_power_kw(&asset.asset_type, status);

    let history = history(base, status, now, rng);
    let forecast = forecast(base, status, now, rng);
    let metadata = summarize(&history, &forecast, base, status);

    PowerSeries {
        asset_id: asset.id.clone(),
        asset_name: asset.name.clone(),
        asset_type: asset.asset_type.clone(),
        history,
        forecast,
        metadata,
    }
}

fn history<R: Rng + ?Sized>(
    base: f64,
    status: &str,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<PowerDataPoint> {
    // ---
    let start = now - Duration::hours(i64::from(HISTORY_PERIOD_HOURS));

    (0..HISTORY_POINTS)
        .map(|i| {
            let timestamp = start + Duration::minutes(HISTORY_STEP_MINUTES * i as i64);
            let noise = rng.gen_range(-HISTORY_NOISE..=HISTORY_NOISE);
            let power = base * time_of_day_factor(timestamp.hour()) * (1.0 + noise);

            let efficiency = match status {
                STATUS_OPERATIONAL => 85.0 + rng.gen_range(-10.0..=10.0),
                STATUS_STANDBY => rng.gen_range(20.0..=40.0),
                _ => 0.0,
            };

            point(timestamp, power, efficiency)
        })
        .collect()
}

fn forecast<R: Rng + ?Sized>(
    base: f64,
    status: &str,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<PowerDataPoint> {
    // ---
    let drift_sign = if base > 0.0 { 1.0 } else { -1.0 };

    (0..FORECAST_POINTS)
        .map(|i| {
            let timestamp = now + Duration::minutes(FORECAST_STEP_MINUTES * i as i64);
            let noise = rng.gen_range(-FORECAST_NOISE..=FORECAST_NOISE);
            let trend = drift_sign * FORECAST_DRIFT * i as f64 / FORECAST_POINTS as f64;
            let power = base * time_of_day_factor(timestamp.hour()) * (1.0 + noise + trend);

            let efficiency = match status {
                STATUS_OPERATIONAL => 85.0 + rng.gen_range(-5.0..=5.0),
                STATUS_STANDBY => 30.0 + rng.gen_range(-5.0..=5.0),
                _ => 0.0,
            };

            point(timestamp, power, efficiency)
        })
        .collect()
}

fn point(timestamp: DateTime<Utc>, power: f64, efficiency: f64) -> PowerDataPoint {
    // ---
    PowerDataPoint {
        timestamp,
        power_kw: round_to(power, 2),
        efficiency: round_to(efficiency.clamp(0.0, 100.0), 1),
    }
}

fn summarize(
    history: &[PowerDataPoint],
    forecast: &[PowerDataPoint],
    base: f64,
    status: &str,
) -> PowerMetadata {
    // ---
    let mean = |points: &[PowerDataPoint], f: fn(&PowerDataPoint) -> f64| {
        if points.is_empty() {
            0.0
        } else {
            points.iter().map(f).sum::<f64>() / points.len() as f64
        }
    };

    let peak = history
        .iter()
        .map(|p| p.power_kw)
        .fold(f64::NEG_INFINITY, f64::max);
    let min = history
        .iter()
        .map(|p| p.power_kw)
        .fold(f64::INFINITY, f64::min);

    PowerMetadata {
        status: status.to_string(),
        history_period_hours: HISTORY_PERIOD_HOURS,
        forecast_period_hours: FORECAST_PERIOD_HOURS,
        avg_historical_power_kw: round_to(mean(history, |p| p.power_kw), 2),
        avg_forecast_power_kw: round_to(mean(forecast, |p| p.power_kw), 2),
        avg_efficiency_percent: round_to(mean(history, |p| p.efficiency), 1),
        peak_power_kw: if history.is_empty() { 0.0 } else { round_to(peak, 2) },
        min_power_kw: if history.is_empty() { 0.0 } else { round_to(min, 2) },
        is_generator: base < 0.0,
        unit: POWER_UNIT.to_string(),
    }
}
