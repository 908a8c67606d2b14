//! Telemetry input, persisted history records and monthly-view entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GrowthTier, StatusLabel};

/// Number of features consumed by the status classifier.
pub const NUM_FEATURES: usize = 6;

/// Feature names in the order the classifier expects them.
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = [
    "soil_moisture",
    "ambient_temperature",
    "soil_temperature",
    "humidity",
    "light_intensity",
    "soil_ph",
];

/// One daily sensor sample for a farm.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SensorReading {
    /// Volumetric soil moisture (%)
    pub soil_moisture: f64,
    /// Air temperature (°C)
    pub ambient_temperature: f64,
    /// Soil temperature (°C)
    pub soil_temperature: f64,
    /// Relative humidity (%)
    pub humidity: f64,
    /// Light intensity / UV index as reported by the sensor
    pub light_intensity: f64,
    /// Soil pH
    pub soil_ph: f64,
}

impl SensorReading {
    /// Feature vector in [`FEATURE_NAMES`] order.
    pub fn features(&self) -> [f64; NUM_FEATURES] {
        [
            self.soil_moisture,
            self.ambient_temperature,
            self.soil_temperature,
            self.humidity,
            self.light_intensity,
            self.soil_ph,
        ]
    }
}

/// Append-only log entry written once per classification event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecord {
    pub status: StatusLabel,
    pub timestamp: DateTime<Utc>,
    pub farm_id: String,
}

impl HistoryRecord {
    pub fn new(farm_id: impl Into<String>, status: StatusLabel, timestamp: DateTime<Utc>) -> Self {
        Self {
            status,
            timestamp,
            farm_id: farm_id.into(),
        }
    }
}

/// One entry of the calendar view produced by the monthly aggregator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyStatus {
    /// Day of month (1-31)
    pub day: u32,
    pub tier: GrowthTier,
}
