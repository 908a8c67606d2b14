//! plantcast: plant-health trend projection
//!
//! Classifies daily sensor readings into health labels, keeps an append-only
//! history per farm and projects a multi-month growth forecast with a
//! cumulative cost estimate.
//!
//! ## Architecture
//!
//! - **Classifier**: sensor reading -> status label (`LinearStatusModel`)
//! - **Storage**: append-only classification history (sled or in-memory)
//! - **Projection**: trend, forecast, cost and monthly calendar view,
//!   wired together by `ProjectionEngine`
//! - **API**: axum HTTP surface over the engine

pub mod api;
pub mod classifier;
pub mod config;
pub mod projection;
pub mod storage;
pub mod types;

// Re-export configuration
pub use config::{ConfigError, ServiceConfig};

// Re-export commonly used types
pub use types::{
    DailyStatus, ForecastTier, GrowthTier, HistoryRecord, SensorReading, StatusLabel,
};

// Re-export the classifier seam
pub use classifier::{ClassificationError, LinearStatusModel, StatusClassifier};

// Re-export storage
pub use storage::{HistoryStore, InMemoryHistoryStore, PersistenceError, SledHistoryStore};

// Re-export projection components
pub use projection::{
    accumulate_cost, calculate_trend, monthly_status, CostSchedule, GrowthProjector,
    ProjectionEngine, ProjectionError, ProjectionReport, TierMap,
};
