//! Projection engine error taxonomy.

use crate::classifier::ClassificationError;
use crate::storage::PersistenceError;

#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    /// Empty trend window. Callers substitute an undefined forecast.
    #[error("no classification history available to establish a trend")]
    InsufficientData,

    #[error("invalid month {0}: must be between 1 and 12")]
    InvalidMonth(i64),

    #[error("invalid year {0}")]
    InvalidYear(i32),

    #[error("horizon of {requested} months exceeds the maximum of {max}")]
    HorizonOutOfRange { requested: i64, max: i64 },

    #[error("invalid outlook weights: {0}")]
    InvalidOutlook(String),

    #[error("no status classifier is loaded")]
    ClassifierUnavailable,

    #[error(transparent)]
    Classification(#[from] ClassificationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl ProjectionError {
    /// Whether the error was caused by caller input rather than a failing
    /// dependency.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidMonth(_)
                | Self::InvalidYear(_)
                | Self::HorizonOutOfRange { .. }
                | Self::Classification(ClassificationError::InvalidFeature { .. })
        )
    }
}
