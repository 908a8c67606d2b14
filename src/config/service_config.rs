//! Service Configuration - operator-tunable TOML values
//!
//! Every section implements `Default` with the built-in behaviour, so a
//! missing or empty config file yields the standard service.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;
use crate::projection::{CostSchedule, OutlookWeights};
use crate::types::{GrowthTier, StatusLabel};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a plantcast deployment.
///
/// Load with `ServiceConfig::load()` which searches:
/// 1. `$PLANTCAST_CONFIG` env var
/// 2. `./plantcast.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// History store backend
    #[serde(default)]
    pub storage: StorageConfig,

    /// Status classifier model
    #[serde(default)]
    pub model: ModelConfig,

    /// Trend window, horizon limits, costs and outlook weights
    #[serde(default)]
    pub projection: ProjectionConfig,

    /// Status label -> growth tier table
    #[serde(default = "default_tiers")]
    pub tiers: BTreeMap<String, GrowthTier>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            model: ModelConfig::default(),
            projection: ProjectionConfig::default(),
            tiers: default_tiers(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration using the standard search order:
    /// 1. `$PLANTCAST_CONFIG` environment variable
    /// 2. `./plantcast.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(
                            path = %p.display(),
                            "Loaded config from {}",
                            defaults::CONFIG_ENV_VAR
                        );
                        return config;
                    }
                    Err(e) => {
                        warn!(
                            path = %p.display(),
                            error = %e,
                            "Failed to load config from {}, falling back",
                            defaults::CONFIG_ENV_VAR
                        );
                    }
                }
            } else {
                warn!(
                    path = %path,
                    "{} points to non-existent file, falling back",
                    defaults::CONFIG_ENV_VAR
                );
            }
        }

        let local = PathBuf::from(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded config from ./{}", defaults::LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        "Failed to load ./{}, using defaults",
                        defaults::LOCAL_CONFIG_FILE
                    );
                }
            }
        }

        info!("No {} found, using built-in defaults", defaults::LOCAL_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;

        for w in &super::validation::validate_unknown_keys(&contents) {
            warn!("{}", w);
        }

        let config = Self::from_toml_str(&contents)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse without validation or key warnings.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Serialize the effective config (used by `--print-config`).
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate all sections for internal consistency.
    ///
    /// Collects every problem rather than stopping at the first one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        if self.server.addr.trim().is_empty() {
            errors.push("server.addr must not be empty".to_string());
        }
        if self.server.request_timeout_secs == 0 {
            errors.push("server.request_timeout_secs must be > 0".to_string());
        }
        if self.server.max_body_bytes == 0 {
            errors.push("server.max_body_bytes must be > 0".to_string());
        }

        if self.storage.backend == StorageBackend::Sled && self.storage.path.trim().is_empty() {
            errors.push("storage.path must be set when storage.backend = \"sled\"".to_string());
        }

        let p = &self.projection;
        if p.trend_window == 0 {
            errors.push("projection.trend_window must be >= 1".to_string());
        }
        if !(1..=defaults::HORIZON_MONTHS_CEILING).contains(&p.max_horizon_months) {
            errors.push(format!(
                "projection.max_horizon_months must be in 1..={} (got {})",
                defaults::HORIZON_MONTHS_CEILING,
                p.max_horizon_months
            ));
        }
        for (name, row) in [
            ("high", &p.outlook.high),
            ("medium", &p.outlook.medium),
            ("low", &p.outlook.low),
        ] {
            if let Err(msg) = row.check() {
                errors.push(format!("projection.outlook.{name}: {msg}"));
            }
        }

        if self.tiers.keys().any(|label| label.trim().is_empty()) {
            errors.push("tiers: status labels must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config I/O error ({}): {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("config parse error ({}): {source}", .path.display())]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("config serialization error: {0}")]
    Serialize(toml::ser::Error),
    #[error("config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ============================================================================
// Server
// ============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server bind address.
    ///
    /// Can be overridden by `PLANTCAST_SERVER_ADDR` env var or `--addr` CLI flag.
    #[serde(default = "default_server_addr")]
    pub addr: String,

    /// Per-request deadline, store reads included.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_server_addr() -> String {
    defaults::SERVER_ADDR.to_string()
}

fn default_request_timeout_secs() -> u64 {
    defaults::REQUEST_TIMEOUT_SECS
}

fn default_max_body_bytes() -> usize {
    defaults::MAX_BODY_BYTES
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
            request_timeout_secs: default_request_timeout_secs(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

// ============================================================================
// Storage
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Durable sled database on disk
    #[default]
    Sled,
    /// Process-local, lost on restart
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// sled database directory (ignored for the memory backend)
    #[serde(default = "default_history_path")]
    pub path: String,
}

fn default_history_path() -> String {
    defaults::HISTORY_DB_PATH.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_history_path(),
        }
    }
}

// ============================================================================
// Model
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// JSON file holding the scaler and linear model weights
    #[serde(default = "default_model_path")]
    pub path: String,
}

fn default_model_path() -> String {
    defaults::MODEL_PATH.to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

// ============================================================================
// Projection
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Most-recent classifications considered when computing the trend
    #[serde(default = "default_trend_window")]
    pub trend_window: usize,

    /// Longest horizon accepted from clients (months)
    #[serde(default = "default_max_horizon_months")]
    pub max_horizon_months: i64,

    /// Fixed RNG seed; when set every projection request draws the same
    /// sequence (demos and reproducible test runs)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    #[serde(default)]
    pub costs: CostSchedule,

    #[serde(default)]
    pub outlook: OutlookWeights,
}

fn default_trend_window() -> usize {
    defaults::TREND_WINDOW
}

fn default_max_horizon_months() -> i64 {
    defaults::MAX_HORIZON_MONTHS
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            trend_window: default_trend_window(),
            max_horizon_months: default_max_horizon_months(),
            seed: None,
            costs: CostSchedule::default(),
            outlook: OutlookWeights::default(),
        }
    }
}

// ============================================================================
// Tier Table
// ============================================================================

fn default_tiers() -> BTreeMap<String, GrowthTier> {
    BTreeMap::from([
        (StatusLabel::HEALTHY.to_string(), GrowthTier::High),
        (StatusLabel::MODERATE_STRESS.to_string(), GrowthTier::Medium),
        (StatusLabel::HIGH_STRESS.to_string(), GrowthTier::Low),
    ])
}

// ============================================================================
// Tests
// ============================================================================
