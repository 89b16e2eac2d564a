//! The static asset catalog.
//!
//! Seeded once at startup and never mutated. Handlers, the generators and the
//! configuration validator all resolve asset IDs through [`Catalog::find`].

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{Asset, STATUS_MAINTENANCE, STATUS_OPERATIONAL, STATUS_STANDBY};

// ---

/// Immutable, ordered list of assets.
#[derive(Debug, Clone)]
pub struct Catalog {
    assets: Vec<Asset>,
}

impl Catalog {
    /// Build a catalog from an explicit asset list, preserving order.
    pub fn new(assets: Vec<Asset>) -> Self {
        Self { assets }
    }

    /// The five demo assets the service ships with.
    pub fn builtin() -> Self {
        // ---
        Self::new(vec![
            asset(
                "AST-001",
                "Primary Cooling Pump",
                "pump",
                "Building A - Floor 1",
                STATUS_OPERATIONAL,
                stamp(2024, 1, 15, 10, 30),
            ),
            asset(
                "AST-002",
                "Air Compressor Unit 1",
                "compressor",
                "Building B - Floor 2",
                STATUS_OPERATIONAL,
                stamp(2024, 1, 15, 10, 28),
            ),
            asset(
                "AST-003",
                "Backup Generator",
                "generator",
                "Building C - Basement",
                STATUS_STANDBY,
                stamp(2024, 1, 15, 9, 15),
            ),
            asset(
                "AST-004",
                "Hydraulic Motor 5",
                "motor",
                "Building A - Floor 3",
                STATUS_MAINTENANCE,
                stamp(2024, 1, 14, 16, 45),
            ),
            asset(
                "AST-005",
                "Wind Turbine Alpha",
                "turbine",
                "Rooftop - Building D",
                STATUS_OPERATIONAL,
                stamp(2024, 1, 15, 10, 32),
            ),
        ])
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn find(&self, asset_id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == asset_id)
    }

    pub fn contains(&self, asset_id: &str) -> bool {
        self.find(asset_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn asset(
    id: &str,
    name: &str,
    asset_type: &str,
    location: &str,
    status: &str,
    last_updated: DateTime<Utc>,
) -> Asset {
    // ---
    Asset {
        id: id.to_string(),
        name: name.to_string(),
        asset_type: asset_type.to_string(),
        location: location.to_string(),
        status: status.to_string(),
        last_updated,
    }
}

fn stamp(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}
