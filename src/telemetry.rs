//! Synthetic telemetry generation.
//!
//! A reading is a per-type baseline plus independent uniform noise on each
//! field. Noise is wider while an asset is operational.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::{round_to, ApiError, Asset, Catalog, TelemetryReading};

// ---

/// Baseline sensor values for one asset type.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Baseline {
    temperature: f64,
    pressure: f64,
    vibration: f64,
    power: f64,
}

const DEFAULT_BASELINE: Baseline = Baseline {
    temperature: 50.0,
    pressure: 100.0,
    vibration: 3.0,
    power: 50.0,
};

fn baseline(asset_type: &str) -> Baseline {
    // ---
    let (temperature, pressure, vibration, power) = match asset_type {
        "pump" => (45.0, 120.0, 2.5, 15.0),
        "compressor" => (65.0, 150.0, 4.0, 45.0),
        "generator" => (75.0, 80.0, 3.5, 100.0),
        "motor" => (55.0, 90.0, 2.0, 25.0),
        "turbine" => (35.0, 60.0, 5.5, 200.0),
        _ => return DEFAULT_BASELINE,
    };
    Baseline {
        temperature,
        pressure,
        vibration,
        power,
    }
}

/// Generate one reading for `asset_id`, failing with `NotFound` if the
/// catalog has no such asset.
pub fn generate<R: Rng + ?Sized>(
    catalog: &Catalog,
    asset_id: &str,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<TelemetryReading, ApiError> {
    // ---
    let asset = catalog.find(asset_id).ok_or_else(ApiError::asset_not_found)?;
    Ok(reading_for(asset, now, rng))
}

/// Generate one reading for an already resolved asset.
pub fn reading_for<R: Rng + ?Sized>(
    asset: &Asset,
    now: DateTime<Utc>,
    rng: &mut R,
) -> TelemetryReading {
    // ---
    let base = baseline(&asset.asset_type);
    let (temp_spread, pressure_spread) = if asset.is_operational() {
        (10.0, 20.0)
    } else {
        (5.0, 10.0)
    };

    TelemetryReading {
        asset_id: asset.id.clone(),
        timestamp: now,
        temperature: round_to(base.temperature + jitter(rng, temp_spread), 2),
        pressure: round_to(base.pressure + jitter(rng, pressure_spread), 2),
        vibration: round_to(base.vibration + jitter(rng, 1.0), 2),
        power_consumption: round_to(base.power + jitter(rng, 10.0), 2),
        status: asset.status.clone(),
    }
}

/// Uniform sample in `[-half_width, half_width]`.
fn jitter<R: Rng + ?Sized>(rng: &mut R, half_width: f64) -> f64 {
    rng.gen_range(-half_width..=half_width)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::{STATUS_MAINTENANCE, STATUS_OPERATIONAL};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn within(value: f64, center: f64, spread: f64) -> bool {
        // Allow for the final 2dp rounding.
        value >= center - spread - 0.005 && value <= center + spread + 0.005
    }

    fn custom_asset(asset_type: &str, status: &str) -> Asset {
        // ---
        Asset {
            id: "AST-900".to_string(),
            name: "Custom".to_string(),
            asset_type: asset_type.to_string(),
            location: "Lab".to_string(),
            status: status.to_string(),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_every_catalog_asset_has_telemetry() {
        // ---
        let catalog = Catalog::builtin();
        let mut rng = StdRng::seed_from_u64(7);
        let now = Utc::now();

        for asset in catalog.assets() {
            let reading = generate(&catalog, &asset.id, now, &mut rng).unwrap();
            assert_eq!(reading.asset_id, asset.id);
            assert_eq!(reading.status, asset.status);
            assert_eq!(reading.timestamp, now);
        }
    }

    #[test]
    fn test_unknown_asset_is_not_found() {
        // ---
        let catalog = Catalog::builtin();
        let mut rng = StdRng::seed_from_u64(7);
        let err = generate(&catalog, "AST-404", Utc::now(), &mut rng).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_operational_noise_bounds() {
        // ---
        let pump = custom_asset("pump", STATUS_OPERATIONAL);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..500 {
            let r = reading_for(&pump, Utc::now(), &mut rng);
            assert!(within(r.temperature, 45.0, 10.0), "temperature {}", r.temperature);
            assert!(within(r.pressure, 120.0, 20.0), "pressure {}", r.pressure);
            assert!(within(r.vibration, 2.5, 1.0), "vibration {}", r.vibration);
            assert!(within(r.power_consumption, 15.0, 10.0), "power {}", r.power_consumption);
        }
    }

    #[test]
    fn test_non_operational_noise_is_narrower() {
        // ---
        let motor = custom_asset("motor", STATUS_MAINTENANCE);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..500 {
            let r = reading_for(&motor, Utc::now(), &mut rng);
            assert!(within(r.temperature, 55.0, 5.0), "temperature {}", r.temperature);
            assert!(within(r.pressure, 90.0, 10.0), "pressure {}", r.pressure);
            assert!(within(r.vibration, 2.0, 1.0), "vibration {}", r.vibration);
            assert!(within(r.power_consumption, 25.0, 10.0), "power {}", r.power_consumption);
        }
    }

    #[test]
    fn test_unrecognized_type_uses_defaults() {
        // ---
        assert_eq!(baseline("chiller"), DEFAULT_BASELINE);

        let chiller = custom_asset("chiller", STATUS_OPERATIONAL);
        let mut rng = StdRng::seed_from_u64(3);
        let r = reading_for(&chiller, Utc::now(), &mut rng);
        assert!(within(r.temperature, 50.0, 10.0));
        assert!(within(r.pressure, 100.0, 20.0));
        assert!(within(r.vibration, 3.0, 1.0));
        assert!(within(r.power_consumption, 50.0, 10.0));
    }

    #[test]
    fn test_values_are_rounded_to_two_places() {
        // ---
        let catalog = Catalog::builtin();
        let mut rng = StdRng::seed_from_u64(11);
        let r = generate(&catalog, "AST-002", Utc::now(), &mut rng).unwrap();
        for v in [r.temperature, r.pressure, r.vibration, r.power_consumption] {
            assert_eq!(round_to(v, 2), v);
        }
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        // ---
        let catalog = Catalog::builtin();
        let now = Utc::now();
        let a = generate(&catalog, "AST-005", now, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = generate(&catalog, "AST-005", now, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a.temperature, b.temperature);
        assert_eq!(a.pressure, b.pressure);
        assert_eq!(a.power_consumption, b.power_consumption);
    }
}
