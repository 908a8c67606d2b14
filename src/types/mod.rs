//! Shared data structures for plant-health classification and projection
//!
//! This module defines the core types flowing through the service:
//! - SensorReading (six-feature telemetry sample fed to the classifier)
//! - StatusLabel (raw classifier output) and GrowthTier (derived category)
//! - HistoryRecord (append-only classification log entry)
//! - ForecastTier / DailyStatus (projection and monthly-view outputs)

mod status;
mod record;

pub use status::*;
pub use record::*;
