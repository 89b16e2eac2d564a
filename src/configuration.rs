//! Per-asset configuration objects: model, validation and the in-memory store.
//!
//! A configuration is accepted only if every field is within bounds and its
//! `asset_id` names an asset in the catalog. Accepted configurations are
//! normalized (alert email lowercased) and stored, replacing any previous
//! configuration for the same asset.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::{ApiError, Catalog, FieldError};

// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceMode {
    Scheduled,
    Predictive,
    Reactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatingMode {
    Continuous,
    Intermittent,
    OnDemand,
}

/// User-defined operating parameters and thresholds for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetConfiguration {
    // ---
    pub asset_id: String,
    pub name: String,

    pub priority: Priority,
    pub maintenance_mode: MaintenanceMode,
    pub operating_mode: OperatingMode,

    pub maintenance_interval_days: i64,
    pub max_runtime_hours: i64,
    pub warning_threshold_percent: i64,

    pub max_temperature_celsius: f64,
    pub max_pressure_psi: f64,
    pub efficiency_target_percent: f64,
    pub power_factor: f64,
    pub load_capacity_percent: f64,

    pub alert_email: String,
    pub location: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl AssetConfiguration {
    /// Decode a JSON body, reporting the path of the first field that does
    /// not fit the expected shape.
    pub fn from_json(body: &[u8]) -> Result<Self, ApiError> {
        // ---
        let mut de = serde_json::Deserializer::from_slice(body);
        serde_path_to_error::deserialize(&mut de).map_err(|err| {
            let message = err.inner().to_string();
            let path = err.path().to_string();
            let field = if path != "." {
                path
            } else {
                missing_field(&message).unwrap_or("body").to_string()
            };
            ApiError::validation(vec![FieldError::new(field, message)])
        })
    }

    /// Check every field rule and the catalog reference, collecting all
    /// violations.
    pub fn validate(&self, catalog: &Catalog) -> Result<(), ApiError> {
        // ---
        let mut errors = Vec::new();

        check_len(&mut errors, "asset_id", &self.asset_id, 1, 50);
        if !catalog.contains(&self.asset_id) {
            errors.push(FieldError::new(
                "asset_id",
                format!(
                    "Asset {} does not exist. Please use a valid asset ID from /api/assets",
                    self.asset_id
                ),
            ));
        }
        check_len(&mut errors, "name", &self.name, 3, 100);

        check_int(&mut errors, "maintenance_interval_days", self.maintenance_interval_days, 1, 365);
        check_int(&mut errors, "max_runtime_hours", self.max_runtime_hours, 1, 100_000);
        check_int(&mut errors, "warning_threshold_percent", self.warning_threshold_percent, 0, 100);

        check_float(
            &mut errors,
            "max_temperature_celsius",
            self.max_temperature_celsius,
            -50.0,
            200.0,
        );
        check_float(&mut errors, "max_pressure_psi", self.max_pressure_psi, 0.0, 10_000.0);
        check_float(
            &mut errors,
            "efficiency_target_percent",
            self.efficiency_target_percent,
            0.0,
            100.0,
        );
        let power_factor_in_range =
            check_float(&mut errors, "power_factor", self.power_factor, -1.0, 1.0);
        if power_factor_in_range && self.power_factor == 0.0 {
            errors.push(FieldError::new(
                "power_factor",
                "power factor cannot be exactly zero",
            ));
        }
        check_float(&mut errors, "load_capacity_percent", self.load_capacity_percent, 0.0, 150.0);

        if !is_valid_email(&self.alert_email) {
            errors.push(FieldError::new("alert_email", "invalid email address format"));
        }
        check_len(&mut errors, "location", &self.location, 1, 200);
        if let Some(notes) = &self.notes {
            check_len(&mut errors, "notes", notes, 0, 500);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(errors))
        }
    }

    /// Canonical stored form.
    pub fn normalized(mut self) -> Self {
        self.alert_email = self.alert_email.to_lowercase();
        self
    }
}

/// serde reports a missing top-level field against the root path; recover the
/// field name from its message instead.
fn missing_field(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next()
}

fn check_len(errors: &mut Vec<FieldError>, field: &str, value: &str, min: usize, max: usize) {
    // ---
    let len = value.chars().count();
    if len < min || len > max {
        let message = if min == 0 {
            format!("must be at most {max} characters (got {len})")
        } else {
            format!("must be between {min} and {max} characters (got {len})")
        };
        errors.push(FieldError::new(field, message));
    }
}

fn check_int(errors: &mut Vec<FieldError>, field: &str, value: i64, min: i64, max: i64) {
    if !(min..=max).contains(&value) {
        let message = format!("must be between {min} and {max} (got {value})");
        errors.push(FieldError::new(field, message));
    }
}

/// Returns true when the value is in range. NaN is never in range.
fn check_float(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: f64,
    min: f64,
    max: f64,
) -> bool {
    // ---
    let ok = (min..=max).contains(&value);
    if !ok {
        let message = format!("must be between {min} and {max} (got {value})");
        errors.push(FieldError::new(field, message));
    }
    ok
}

/// An address needs an `@` with a `.` somewhere in the domain part.
fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((_, domain)) => domain.split('@').next().is_some_and(|d| d.contains('.')),
        None => false,
    }
}

// ---

/// Lock-guarded map of configurations keyed by asset ID.
#[derive(Debug, Default)]
pub struct ConfigurationStore {
    entries: RwLock<HashMap<String, AssetConfiguration>>,
}

impl ConfigurationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate, normalize and store `config`, replacing any previous entry.
    pub fn upsert(
        &self,
        config: AssetConfiguration,
        catalog: &Catalog,
    ) -> Result<AssetConfiguration, ApiError> {
        // ---
        config.validate(catalog)?;
        let config = config.normalized();

        let replaced = self
            .entries
            .write()
            .insert(config.asset_id.clone(), config.clone())
            .is_some();
        tracing::info!(asset_id = %config.asset_id, replaced, "configuration stored");
        Ok(config)
    }

    pub fn get(&self, asset_id: &str) -> Result<AssetConfiguration, ApiError> {
        self.entries
            .read()
            .get(asset_id)
            .cloned()
            .ok_or_else(ApiError::configuration_not_found)
    }

    /// All stored configurations ordered by asset ID.
    pub fn list(&self) -> Vec<AssetConfiguration> {
        // ---
        let mut configs: Vec<AssetConfiguration> =
            self.entries.read().values().cloned().collect();
        configs.sort_by(|a, b| a.asset_id.cmp(&b.asset_id));
        configs
    }

    pub fn delete(&self, asset_id: &str) -> Result<AssetConfiguration, ApiError> {
        // ---
        let removed = self
            .entries
            .write()
            .remove(asset_id)
            .ok_or_else(ApiError::configuration_not_found)?;
        tracing::info!(asset_id, "configuration deleted");
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn sample() -> AssetConfiguration {
        // ---
        AssetConfiguration {
            asset_id: "AST-001".to_string(),
            name: "Cooling Pump Config".to_string(),
            priority: Priority::High,
            maintenance_mode: MaintenanceMode::Predictive,
            operating_mode: OperatingMode::Continuous,
            maintenance_interval_days: 30,
            max_runtime_hours: 8760,
            warning_threshold_percent: 80,
            max_temperature_celsius: 90.0,
            max_pressure_psi: 150.0,
            efficiency_target_percent: 92.0,
            power_factor: 0.95,
            load_capacity_percent: 100.0,
            alert_email: "OPS@Example.COM".to_string(),
            location: "Building A".to_string(),
            notes: None,
        }
    }

    fn rejected_fields(config: AssetConfiguration) -> Vec<String> {
        // ---
        let err = config.validate(&Catalog::builtin()).unwrap_err();
        err.fields().into_iter().map(String::from).collect()
    }

    #[test]
    fn test_example_config_is_accepted_and_normalized() {
        // ---
        let store = ConfigurationStore::new();
        let stored = store.upsert(sample(), &Catalog::builtin()).unwrap();
        assert_eq!(stored.alert_email, "ops@example.com");
        assert_eq!(store.get("AST-001").unwrap(), stored);
    }

    #[test]
    fn test_power_factor_zero_rejected() {
        // ---
        let mut config = sample();
        config.power_factor = 0.0;
        assert_eq!(rejected_fields(config), vec!["power_factor"]);

        let mut config = sample();
        config.power_factor = 0.5;
        assert!(config.validate(&Catalog::builtin()).is_ok());

        let mut config = sample();
        config.power_factor = -1.0;
        assert!(config.validate(&Catalog::builtin()).is_ok());
    }

    #[test]
    fn test_power_factor_out_of_range_reported_once() {
        // ---
        let mut config = sample();
        config.power_factor = 1.5;
        assert_eq!(rejected_fields(config), vec!["power_factor"]);
    }

    #[test]
    fn test_unknown_asset_rejected() {
        // ---
        let mut config = sample();
        config.asset_id = "AST-999".to_string();
        let err = config.validate(&Catalog::builtin()).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(err.fields(), vec!["asset_id"]);
        assert!(err.to_string().contains("AST-999 does not exist"));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        // ---
        let mut config = sample();
        config.maintenance_interval_days = 365;
        config.max_runtime_hours = 100_000;
        config.warning_threshold_percent = 0;
        config.max_temperature_celsius = -50.0;
        config.max_pressure_psi = 10_000.0;
        config.efficiency_target_percent = 100.0;
        config.load_capacity_percent = 150.0;
        config.name = "abc".to_string();
        config.notes = Some("x".repeat(500));
        assert!(config.validate(&Catalog::builtin()).is_ok());
    }

    #[test]
    fn test_all_violations_collected() {
        // ---
        let mut config = sample();
        config.name = "ab".to_string();
        config.maintenance_interval_days = 0;
        config.max_runtime_hours = 100_001;
        config.warning_threshold_percent = 101;
        config.max_temperature_celsius = 200.5;
        config.max_pressure_psi = -1.0;
        config.efficiency_target_percent = 100.1;
        config.load_capacity_percent = 151.0;
        config.location = String::new();
        config.notes = Some("n".repeat(501));

        assert_eq!(
            rejected_fields(config),
            vec![
                "name",
                "maintenance_interval_days",
                "max_runtime_hours",
                "warning_threshold_percent",
                "max_temperature_celsius",
                "max_pressure_psi",
                "efficiency_target_percent",
                "load_capacity_percent",
                "location",
                "notes",
            ]
        );
    }

    #[test]
    fn test_email_rules() {
        // ---
        assert!(is_valid_email("ops@example.com"));
        assert!(is_valid_email("a.b@c.d"));
        assert!(!is_valid_email("ops.example.com"));
        assert!(!is_valid_email("ops@localhost"));
        assert!(!is_valid_email("first.last@host"));

        let mut config = sample();
        config.alert_email = "nobody".to_string();
        assert_eq!(rejected_fields(config), vec!["alert_email"]);
    }

    #[test]
    fn test_lengths_count_characters() {
        // ---
        let mut config = sample();
        config.name = "ÄÖÜ".to_string();
        assert!(config.validate(&Catalog::builtin()).is_ok());
    }

    #[test]
    fn test_upsert_overwrites_without_merge() {
        // ---
        let store = ConfigurationStore::new();
        let catalog = Catalog::builtin();

        let mut first = sample();
        first.notes = Some("initial".to_string());
        store.upsert(first, &catalog).unwrap();

        let second = sample();
        store.upsert(second, &catalog).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("AST-001").unwrap().notes, None);
    }

    #[test]
    fn test_rejected_upsert_leaves_store_untouched() {
        // ---
        let store = ConfigurationStore::new();
        let mut config = sample();
        config.power_factor = 0.0;
        assert!(store.upsert(config, &Catalog::builtin()).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_and_list() {
        // ---
        let store = ConfigurationStore::new();
        let catalog = Catalog::builtin();

        assert!(matches!(store.delete("AST-001"), Err(ApiError::NotFound(_))));

        let mut second = sample();
        second.asset_id = "AST-003".to_string();
        store.upsert(second, &catalog).unwrap();
        store.upsert(sample(), &catalog).unwrap();

        let ids: Vec<String> = store.list().into_iter().map(|c| c.asset_id).collect();
        assert_eq!(ids, vec!["AST-001", "AST-003"]);

        let deleted = store.delete("AST-001").unwrap();
        assert_eq!(deleted.asset_id, "AST-001");
        assert!(matches!(store.get("AST-001"), Err(ApiError::NotFound(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_from_json_reports_field_path() {
        // ---
        let mut body = serde_json::to_value(sample()).unwrap();
        body["priority"] = serde_json::json!("urgent");
        let err = AssetConfiguration::from_json(body.to_string().as_bytes()).unwrap_err();
        assert_eq!(err.fields(), vec!["priority"]);

        let mut body = serde_json::to_value(sample()).unwrap();
        body["maintenance_interval_days"] = serde_json::json!("thirty");
        let err = AssetConfiguration::from_json(body.to_string().as_bytes()).unwrap_err();
        assert_eq!(err.fields(), vec!["maintenance_interval_days"]);

        let err = AssetConfiguration::from_json(b"not json").unwrap_err();
        assert_eq!(err.fields(), vec!["body"]);

        let mut body = serde_json::to_value(sample()).unwrap();
        body.as_object_mut().unwrap().remove("alert_email");
        let err = AssetConfiguration::from_json(body.to_string().as_bytes()).unwrap_err();
        assert_eq!(err.fields(), vec!["alert_email"]);
    }

    #[test]
    fn test_from_json_accepts_snake_case_enums() {
        // ---
        let mut body = serde_json::to_value(sample()).unwrap();
        body["operating_mode"] = serde_json::json!("on_demand");
        body.as_object_mut().unwrap().remove("notes");
        let config = AssetConfiguration::from_json(body.to_string().as_bytes()).unwrap();
        assert_eq!(config.operating_mode, OperatingMode::OnDemand);
        assert_eq!(config.notes, None);
    }
}
