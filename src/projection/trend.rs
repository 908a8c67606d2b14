//! Trend calculator: reduce a window of recent labels to one growth tier.

use super::{ProjectionError, TierMap};
use crate::types::{GrowthTier, StatusLabel};

/// Dominant growth tier of a recent-status window.
///
/// The most frequent label wins. Among equally frequent labels the one
/// encountered first in `recent` wins; store windows are most-recent-first,
/// so ties go to the most recently observed label.
///
/// Returns [`ProjectionError::InsufficientData`] for an empty window.
pub fn calculate_trend(
    recent: &[StatusLabel],
    tiers: &TierMap,
) -> Result<GrowthTier, ProjectionError> {
    dominant_label(recent)
        .map(|label| tiers.tier_for(label))
        .ok_or(ProjectionError::InsufficientData)
}

/// Most frequent label, first-encountered on ties.
pub fn dominant_label(recent: &[StatusLabel]) -> Option<&StatusLabel> {
    // Windows are tiny (7 by default); a vec keeps encounter order for free.
    let mut tally: Vec<(&StatusLabel, usize)> = Vec::new();
    for label in recent {
        match tally.iter_mut().find(|(seen, _)| *seen == label) {
            Some((_, count)) => *count += 1,
            None => tally.push((label, 1)),
        }
    }

    tally
        .into_iter()
        .fold(None, |best: Option<(&StatusLabel, usize)>, (label, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((label, count)),
        })
        .map(|(label, _)| label)
}
