//! System-wide default constants.
//!
//! Centralises magic numbers used by the config defaults and the HTTP layer.
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Configuration Discovery
// ============================================================================

/// Environment variable pointing at a TOML config file.
pub const CONFIG_ENV_VAR: &str = "PLANTCAST_CONFIG";

/// Config file looked up in the working directory when the env var is unset.
pub const LOCAL_CONFIG_FILE: &str = "plantcast.toml";

/// Environment variable overriding `server.addr`.
pub const SERVER_ADDR_ENV_VAR: &str = "PLANTCAST_SERVER_ADDR";

/// Comma-separated list of allowed CORS origins.
pub const CORS_ORIGINS_ENV_VAR: &str = "PLANTCAST_CORS_ORIGINS";

// ============================================================================
// Server
// ============================================================================

pub const SERVER_ADDR: &str = "0.0.0.0:8080";

/// Upper bound on a single request, store reads included (seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Maximum accepted request body (bytes). Readings are a handful of floats.
pub const MAX_BODY_BYTES: usize = 16 * 1024;

/// Longest accepted farm identifier (characters).
pub const MAX_FARM_ID_LEN: usize = 128;

// ============================================================================
// Storage
// ============================================================================

/// Default sled database path for the classification history.
pub const HISTORY_DB_PATH: &str = "./data/history.db";

/// Default classifier model location.
pub const MODEL_PATH: &str = "./models/status_model.json";

// ============================================================================
// Projection
// ============================================================================

/// Number of most-recent classifications used to establish the trend.
///
/// 7 daily readings = one week of history.
pub const TREND_WINDOW: usize = 7;

/// Longest forecast a client may request (months). 120 = ten years.
pub const MAX_HORIZON_MONTHS: i64 = 120;

/// Upper bound accepted for `projection.max_horizon_months`. 1200 = a century.
pub const HORIZON_MONTHS_CEILING: i64 = 1200;

/// Monthly cost when the forecast tier is High.
pub const COST_HIGH: u64 = 5;

/// Monthly cost when the forecast tier is Medium.
pub const COST_MEDIUM: u64 = 10;

/// Monthly cost for Low and Undefined months.
pub const COST_OTHER: u64 = 15;
