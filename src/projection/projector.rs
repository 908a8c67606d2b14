//! Growth projector: expand an anchor trend into an N-month forecast.
//!
//! Each month is an independent draw from a distribution conditioned on the
//! anchor trend. The forecast never feeds back into the trend, so month 12 is
//! distributed exactly like month 1; multi-month uncertainty is modelled as
//! repeated sampling around a single anchor, not as a Markov chain.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ProjectionError;
use crate::types::{ForecastTier, GrowthTier};

// ============================================================================
// Outlook Weights
// ============================================================================

/// Relative likelihood of each outcome tier for one anchor trend.
///
/// Weights need not sum to 1; they are normalised when the projector is
/// built. Zero-weight outcomes are never drawn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TierWeights {
    #[serde(default)]
    pub high: f64,
    #[serde(default)]
    pub medium: f64,
    #[serde(default)]
    pub low: f64,
}

impl TierWeights {
    pub const fn new(high: f64, medium: f64, low: f64) -> Self {
        Self { high, medium, low }
    }

    fn as_array(&self) -> [f64; 3] {
        [self.high, self.medium, self.low]
    }

    /// Check that the row describes a usable distribution.
    pub fn check(&self) -> Result<(), String> {
        let weights = self.as_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(format!(
                "weights must be finite and non-negative (got high={}, medium={}, low={})",
                self.high, self.medium, self.low
            ));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err("at least one weight must be positive".to_string());
        }
        Ok(())
    }
}

/// Outcome weights per anchor trend. `Unknown` has no row: it always
/// forecasts `Undefined`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OutlookWeights {
    #[serde(default = "default_high_outlook")]
    pub high: TierWeights,
    #[serde(default = "default_medium_outlook")]
    pub medium: TierWeights,
    #[serde(default = "default_low_outlook")]
    pub low: TierWeights,
}

// A strong trend mostly holds, with a small chance of slipping one tier;
// a middling one can go either way.
const fn default_high_outlook() -> TierWeights {
    TierWeights::new(0.8, 0.2, 0.0)
}

const fn default_medium_outlook() -> TierWeights {
    TierWeights::new(0.3, 0.5, 0.2)
}

const fn default_low_outlook() -> TierWeights {
    TierWeights::new(0.0, 0.2, 0.8)
}

impl Default for OutlookWeights {
    fn default() -> Self {
        Self {
            high: default_high_outlook(),
            medium: default_medium_outlook(),
            low: default_low_outlook(),
        }
    }
}

// ============================================================================
// Projector
// ============================================================================

const OUTCOMES: [ForecastTier; 3] = [ForecastTier::High, ForecastTier::Medium, ForecastTier::Low];

#[derive(Debug, Clone)]
struct Outlook {
    index: WeightedIndex<f64>,
}

impl Outlook {
    fn new(weights: &TierWeights) -> Result<Self, ProjectionError> {
        weights.check().map_err(ProjectionError::InvalidOutlook)?;
        let index = WeightedIndex::new(weights.as_array())
            .map_err(|e| ProjectionError::InvalidOutlook(e.to_string()))?;
        Ok(Self { index })
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> ForecastTier {
        OUTCOMES[self.index.sample(rng)]
    }
}

/// Trend-conditioned monthly sampler. Immutable once built, so one instance
/// is shared by every request; randomness comes from the caller's RNG.
#[derive(Debug, Clone)]
pub struct GrowthProjector {
    high: Outlook,
    medium: Outlook,
    low: Outlook,
}

impl GrowthProjector {
    pub fn new(weights: &OutlookWeights) -> Result<Self, ProjectionError> {
        Ok(Self {
            high: Outlook::new(&weights.high)?,
            medium: Outlook::new(&weights.medium)?,
            low: Outlook::new(&weights.low)?,
        })
    }

    /// Forecast `horizon_months` months from an anchor trend.
    ///
    /// Non-positive horizons yield an empty forecast. An `Unknown` trend
    /// yields `Undefined` for every month without consuming randomness.
    pub fn project_monthly<R: Rng + ?Sized>(
        &self,
        trend: GrowthTier,
        horizon_months: i64,
        rng: &mut R,
    ) -> Vec<ForecastTier> {
        let months = usize::try_from(horizon_months).unwrap_or(0);
        let outlook = match trend {
            GrowthTier::High => &self.high,
            GrowthTier::Medium => &self.medium,
            GrowthTier::Low => &self.low,
            GrowthTier::Unknown => return vec![ForecastTier::Undefined; months],
        };
        (0..months).map(|_| outlook.draw(rng)).collect()
    }
}
