//! Trend projection: turn a farm's classification history into a trend, a
//! multi-month forecast, a cumulative spend estimate and a calendar view.
//!
//! Everything below [`ProjectionEngine`] is a pure function or an immutable
//! value; the engine adds the store and classifier.

mod engine;
mod error;
pub mod cost;
pub mod monthly;
pub mod projector;
pub mod tier_map;
pub mod trend;

pub use cost::{accumulate_cost, CostSchedule};
pub use engine::{month_names, ProjectionEngine, ProjectionReport};
pub use error::ProjectionError;
pub use monthly::monthly_status;
pub use projector::{GrowthProjector, OutlookWeights, TierWeights};
pub use tier_map::TierMap;
pub use trend::calculate_trend;
