//! Status classifier: maps one sensor reading to a health label.
//!
//! The projection engine only sees the [`StatusClassifier`] trait. The
//! shipped implementation is [`LinearStatusModel`], a standardised
//! multinomial-logistic model loaded from JSON.

mod linear;

pub use linear::{LinearStatusModel, StandardScaler};

use std::path::PathBuf;

use crate::types::{SensorReading, StatusLabel};

/// Trait for pluggable classification models
///
/// Implementations must be thread-safe (Send + Sync); one instance serves
/// every request.
pub trait StatusClassifier: Send + Sync {
    /// Classify one reading.
    fn predict(&self, reading: &SensorReading) -> Result<StatusLabel, ClassificationError>;

    /// Model name for logging and the health endpoint
    fn model_name(&self) -> &str;
}

#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    #[error("feature {name} is not a finite number (got {value})")]
    InvalidFeature { name: &'static str, value: f64 },

    #[error("invalid model: {0}")]
    Model(String),

    #[error("failed to read model file ({}): {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("failed to parse model: {0}")]
    Parse(#[from] serde_json::Error),
}
