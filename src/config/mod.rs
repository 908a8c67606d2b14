//! Service Configuration Module
//!
//! Loaded once in `main` and passed explicitly to whatever needs it; there is
//! no process-global config.
//!
//! ## Loading Order
//!
//! 1. `--config <path>` CLI flag
//! 2. `PLANTCAST_CONFIG` environment variable (path to TOML file)
//! 3. `plantcast.toml` in the current working directory
//! 4. Built-in defaults

mod service_config;
pub mod defaults;
pub mod validation;

pub use service_config::*;
