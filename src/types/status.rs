//! Health categories: raw classifier labels, derived growth tiers and
//! forecast entries.

use serde::{Deserialize, Serialize};

// ============================================================================
// Status Label
// ============================================================================

/// Raw classifier output category.
///
/// Kept as a string so that labels outside the canonical set survive
/// persistence and resolve to [`GrowthTier::Unknown`] through the tier map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusLabel(String);

impl StatusLabel {
    pub const HEALTHY: &'static str = "Healthy";
    pub const MODERATE_STRESS: &'static str = "Moderate Stress";
    pub const HIGH_STRESS: &'static str = "High Stress";

    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn healthy() -> Self {
        Self::new(Self::HEALTHY)
    }

    pub fn moderate_stress() -> Self {
        Self::new(Self::MODERATE_STRESS)
    }

    pub fn high_stress() -> Self {
        Self::new(Self::HIGH_STRESS)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StatusLabel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

// ============================================================================
// Growth Tier
// ============================================================================

/// Coarse growth category derived from a [`StatusLabel`].
///
/// Deserializes case-insensitively so config files may write `high` or `High`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
pub enum GrowthTier {
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl std::str::FromStr for GrowthTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("unknown growth tier '{s}' (expected High, Medium, Low or Unknown)")),
        }
    }
}

impl<'de> Deserialize<'de> for GrowthTier {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for GrowthTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrowthTier::High => write!(f, "High"),
            GrowthTier::Medium => write!(f, "Medium"),
            GrowthTier::Low => write!(f, "Low"),
            GrowthTier::Unknown => write!(f, "Unknown"),
        }
    }
}

// ============================================================================
// Forecast Tier
// ============================================================================

/// One month of a growth forecast.
///
/// `Undefined` is the placeholder emitted when no trend could be
/// established, never the result of a random draw.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ForecastTier {
    High,
    Medium,
    Low,
    Undefined,
}

impl std::fmt::Display for ForecastTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForecastTier::High => write!(f, "High"),
            ForecastTier::Medium => write!(f, "Medium"),
            ForecastTier::Low => write!(f, "Low"),
            ForecastTier::Undefined => write!(f, "Undefined"),
        }
    }
}
