//! Configuration loader for the `assetflow-mock` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). Parsing goes through a lookup function so the
//! rules can be exercised without touching the process environment.
//!
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::{anyhow, Result};

/// Parse an optional environment value with a default.
macro_rules! parse_env_or {
    ($lookup:expr, $var_name:expr, $ty:ty, $default:expr) => {
        $lookup($var_name)
            .map(|v| v.trim().parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse an optional environment value with no default.
macro_rules! parse_env_opt {
    ($lookup:expr, $var_name:expr, $ty:ty) => {
        $lookup($var_name)
            .map(|v| v.trim().parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // ---
    /// Interface to bind the HTTP server on.
    pub host: IpAddr,

    /// TCP port to listen on.
    pub port: u16,

    /// Period of the WebSocket telemetry broadcast, in milliseconds.
    pub broadcast_interval_ms: u64,

    /// Frames buffered per WebSocket subscriber before frames are skipped.
    pub subscriber_buffer: usize,

    /// Seed for the shared random source; `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        // ---
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8000,
            broadcast_interval_ms: 2000,
            subscriber_buffer: 16,
            rng_seed: None,
        }
    }
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `HOST` – bind address (default: 0.0.0.0)
/// - `PORT` – listen port (default: 8000)
/// - `BROADCAST_INTERVAL_MS` – telemetry push period (default: 2000)
/// - `SUBSCRIBER_BUFFER` – per-subscriber frame queue (default: 16)
/// - `RNG_SEED` – fixed seed for reproducible data (default: unset)
///
/// Returns an error if any variable is present but invalid.
pub fn load_from_env() -> Result<Config> {
    load_from(|name| env::var(name).ok())
}

/// Load configuration through an arbitrary variable lookup.
pub fn load_from<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    // ---
    let defaults = Config::default();

    let host = parse_env_or!(lookup, "HOST", IpAddr, defaults.host);
    let port = parse_env_or!(lookup, "PORT", u16, defaults.port);
    let broadcast_interval_ms = parse_env_or!(
        lookup,
        "BROADCAST_INTERVAL_MS",
        u64,
        defaults.broadcast_interval_ms
    );
    let subscriber_buffer =
        parse_env_or!(lookup, "SUBSCRIBER_BUFFER", usize, defaults.subscriber_buffer);
    let rng_seed = parse_env_opt!(lookup, "RNG_SEED", u64);

    if broadcast_interval_ms == 0 {
        return Err(anyhow!("BROADCAST_INTERVAL_MS must be greater than zero"));
    }
    if subscriber_buffer == 0 {
        return Err(anyhow!("SUBSCRIBER_BUFFER must be greater than zero"));
    }

    Ok(Config {
        host,
        port,
        broadcast_interval_ms,
        subscriber_buffer,
        rng_seed,
    })
}

impl Config {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn broadcast_interval(&self) -> Duration {
        Duration::from_millis(self.broadcast_interval_ms)
    }

    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        let seed = match self.rng_seed {
            Some(seed) => seed.to_string(),
            None => "entropy".to_string(),
        };

        tracing::info!("Configuration loaded:");
        tracing::info!("  HOST                  : {}", self.host);
        tracing::info!("  PORT                  : {}", self.port);
        tracing::info!("  BROADCAST_INTERVAL_MS : {}", self.broadcast_interval_ms);
        tracing::info!("  SUBSCRIBER_BUFFER     : {}", self.subscriber_buffer);
        tracing::info!("  RNG_SEED              : {}", seed);
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        // ---
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        load_from(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        // ---
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.bind_addr().to_string(), "0.0.0.0:8000");
        assert_eq!(cfg.broadcast_interval(), Duration::from_secs(2));
    }

    #[test]
    fn test_overrides() {
        // ---
        let cfg = load(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9090"),
            ("BROADCAST_INTERVAL_MS", "500"),
            ("SUBSCRIBER_BUFFER", "4"),
            ("RNG_SEED", " 42 "),
        ])
        .unwrap();
        assert_eq!(cfg.bind_addr().to_string(), "127.0.0.1:9090");
        assert_eq!(cfg.broadcast_interval_ms, 500);
        assert_eq!(cfg.subscriber_buffer, 4);
        assert_eq!(cfg.rng_seed, Some(42));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        // ---
        let err = load(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("Invalid PORT"));

        assert!(load(&[("HOST", "not-an-ip")]).is_err());
        assert!(load(&[("BROADCAST_INTERVAL_MS", "0")]).is_err());
        assert!(load(&[("SUBSCRIBER_BUFFER", "0")]).is_err());
    }
}
