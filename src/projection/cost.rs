//! Cost accumulator: turn a forecast into a cumulative spend projection.

use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::types::ForecastTier;

/// Per-month cost by forecast tier. Low and Undefined months share `other`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CostSchedule {
    #[serde(default = "default_cost_high")]
    pub high: u64,
    #[serde(default = "default_cost_medium")]
    pub medium: u64,
    #[serde(default = "default_cost_other")]
    pub other: u64,
}

fn default_cost_high() -> u64 {
    defaults::COST_HIGH
}

fn default_cost_medium() -> u64 {
    defaults::COST_MEDIUM
}

fn default_cost_other() -> u64 {
    defaults::COST_OTHER
}

impl Default for CostSchedule {
    fn default() -> Self {
        Self {
            high: default_cost_high(),
            medium: default_cost_medium(),
            other: default_cost_other(),
        }
    }
}

impl CostSchedule {
    pub fn monthly_cost(&self, tier: ForecastTier) -> u64 {
        match tier {
            ForecastTier::High => self.high,
            ForecastTier::Medium => self.medium,
            ForecastTier::Low | ForecastTier::Undefined => self.other,
        }
    }
}

/// Running total of monthly costs, parallel-indexed to `forecast`.
///
/// `out[i]` is the cost of months `0..=i`.
pub fn accumulate_cost(forecast: &[ForecastTier], schedule: &CostSchedule) -> Vec<u64> {
    forecast
        .iter()
        .scan(0_u64, |total, tier| {
            *total = total.saturating_add(schedule.monthly_cost(*tier));
            Some(*total)
        })
        .collect()
}

/// Index of the first month whose cumulative spend exceeds `ceiling`.
pub fn first_month_over(spend: &[u64], ceiling: u64) -> Option<usize> {
    spend.iter().position(|total| *total > ceiling)
}
