//! The single StatusLabel -> GrowthTier lookup table.
//!
//! Built once from config and shared (behind an `Arc`) by the trend
//! calculator and the monthly aggregator.

use std::collections::{BTreeMap, HashMap};

use crate::types::{GrowthTier, StatusLabel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierMap {
    table: HashMap<String, GrowthTier>,
}

impl TierMap {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, GrowthTier)>,
        S: Into<String>,
    {
        Self {
            table: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn from_config(tiers: &BTreeMap<String, GrowthTier>) -> Self {
        Self::new(tiers.iter().map(|(label, tier)| (label.clone(), *tier)))
    }

    /// Tier for a label; unmapped labels resolve to `Unknown`.
    pub fn tier_for(&self, label: &StatusLabel) -> GrowthTier {
        self.table
            .get(label.as_str())
            .copied()
            .unwrap_or(GrowthTier::Unknown)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for TierMap {
    fn default() -> Self {
        Self::new([
            (StatusLabel::HEALTHY, GrowthTier::High),
            (StatusLabel::MODERATE_STRESS, GrowthTier::Medium),
            (StatusLabel::HIGH_STRESS, GrowthTier::Low),
        ])
    }
}
