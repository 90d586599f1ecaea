//! Runtime configuration.
//!
//! Loaded from the JSON file named by `GHOSTBRIDGE_CONFIG`, with
//! environment overrides for the knobs an operator flips most often.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use gb_01_gravity::GravityConfig;

/// Full runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Gravity control-function constants.
    pub gravity: GravityConfig,
    /// Expiry sweep period in milliseconds.
    pub sweep_interval_ms: u64,
    /// Bound on retained vanish-history records.
    pub history_capacity: usize,
    /// Where to persist the sanitized vanish history. `None` disables
    /// persistence.
    pub history_path: Option<PathBuf>,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            gravity: GravityConfig::default(),
            sweep_interval_ms: 1_000,
            history_capacity: 1_000,
            history_path: None,
            log_level: "info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Cannot read config file {path}: {reason}")]
    Unreadable { path: String, reason: String },

    /// Config file is not valid JSON.
    #[error("Cannot parse config file {path}: {reason}")]
    Unparsable { path: String, reason: String },

    /// The sweep period must be positive.
    #[error("sweep_interval_ms must be positive")]
    ZeroSweepInterval,

    /// TTLs must have a positive floor.
    #[error("gravity.min_ttl_ms must be positive")]
    ZeroMinTtl,

    /// The decay reference must be positive.
    #[error("gravity.e_reference must be positive")]
    NonPositiveReference,

    /// The gravity floor must sit inside (0, 1).
    #[error("gravity.gravity_floor must be in (0, 1)")]
    FloorOutOfRange,
}

impl RuntimeConfig {
    /// Loads configuration: file named by `GHOSTBRIDGE_CONFIG` if set,
    /// defaults otherwise, then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("GHOSTBRIDGE_CONFIG") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Ok(level) = std::env::var("GHOSTBRIDGE_LOG_LEVEL") {
            config.log_level = level;
        }
        if let Ok(sweep) = std::env::var("GHOSTBRIDGE_SWEEP_MS") {
            if let Ok(ms) = sweep.parse() {
                config.sweep_interval_ms = ms;
            }
        }

        Ok(config)
    }

    /// Loads configuration from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path).map_err(|e| ConfigError::Unreadable {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_slice(&bytes).map_err(|e| ConfigError::Unparsable {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    /// Rejects configurations that would break lifecycle invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sweep_interval_ms == 0 {
            return Err(ConfigError::ZeroSweepInterval);
        }
        if self.gravity.min_ttl_ms == 0 {
            return Err(ConfigError::ZeroMinTtl);
        }
        if self.gravity.e_reference <= 0.0 {
            return Err(ConfigError::NonPositiveReference);
        }
        if self.gravity.gravity_floor <= 0.0 || self.gravity.gravity_floor >= 1.0 {
            return Err(ConfigError::FloorOutOfRange);
        }
        Ok(())
    }
}
