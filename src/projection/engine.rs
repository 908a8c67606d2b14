//! Projection engine: the explicit service value wiring classifier, store,
//! tier table, projector and cost schedule together.
//!
//! Built once in `main` and shared by every request handler behind an
//! `Arc`. Holds no mutable state of its own; the history store is the only
//! shared mutable resource.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Month, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::cost::{accumulate_cost, first_month_over, CostSchedule};
use super::{monthly, trend, GrowthProjector, ProjectionError, TierMap};
use crate::classifier::StatusClassifier;
use crate::config::ProjectionConfig;
use crate::storage::HistoryStore;
use crate::types::{
    DailyStatus, ForecastTier, GrowthTier, HistoryRecord, SensorReading, StatusLabel,
};

/// Everything a client needs to render one projection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectionReport {
    pub farm_id: String,
    pub generated_at: DateTime<Utc>,
    /// Tier of the most recent classification, `None` without history
    pub current_status: Option<GrowthTier>,
    /// Dominant tier of the trend window, `None` without history
    pub trend: Option<GrowthTier>,
    /// English month names, starting with the month of `generated_at`
    pub months: Vec<String>,
    pub forecast: Vec<ForecastTier>,
    /// Cumulative spend, parallel to `forecast`
    pub projected_spend: Vec<u64>,
    pub spend_ceiling: Option<u64>,
    /// First month index whose cumulative spend exceeds `spend_ceiling`
    pub ceiling_breached_at: Option<usize>,
}

pub struct ProjectionEngine {
    classifier: Option<Arc<dyn StatusClassifier>>,
    store: Arc<dyn HistoryStore>,
    tiers: Arc<TierMap>,
    projector: GrowthProjector,
    costs: CostSchedule,
    trend_window: usize,
    max_horizon_months: i64,
}

impl std::fmt::Debug for ProjectionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectionEngine")
            .field("classifier", &self.model_name())
            .field("store", &self.store.backend_name())
            .field("tiers", &self.tiers.len())
            .field("trend_window", &self.trend_window)
            .field("max_horizon_months", &self.max_horizon_months)
            .finish()
    }
}

impl ProjectionEngine {
    /// Build the engine. Fails only if the outlook weights are unusable.
    ///
    /// A missing classifier is allowed: projections and monthly views keep
    /// working over existing history, readings are rejected.
    pub fn new(
        store: Arc<dyn HistoryStore>,
        classifier: Option<Arc<dyn StatusClassifier>>,
        tiers: Arc<TierMap>,
        config: &ProjectionConfig,
    ) -> Result<Self, ProjectionError> {
        let projector = GrowthProjector::new(&config.outlook)?;
        Ok(Self {
            classifier,
            store,
            tiers,
            projector,
            costs: config.costs,
            trend_window: config.trend_window,
            max_horizon_months: config.max_horizon_months,
        })
    }

    // ------------------------------------------------------------------------
    // Ingestion
    // ------------------------------------------------------------------------

    /// Classify a reading and append the result to the farm's history.
    pub fn record_reading(
        &self,
        farm_id: &str,
        reading: &SensorReading,
    ) -> Result<HistoryRecord, ProjectionError> {
        self.record_reading_at(farm_id, reading, Utc::now())
    }

    pub fn record_reading_at(
        &self,
        farm_id: &str,
        reading: &SensorReading,
        at: DateTime<Utc>,
    ) -> Result<HistoryRecord, ProjectionError> {
        let classifier = self
            .classifier
            .as_ref()
            .ok_or(ProjectionError::ClassifierUnavailable)?;
        let status = classifier.predict(reading)?;
        let record = HistoryRecord::new(farm_id, status, at);
        self.store.append(&record)?;

        debug!(farm_id = %farm_id, status = %record.status, "Recorded classification");
        Ok(record)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Dominant tier over the last `trend_window` classifications.
    pub fn trend(&self, farm_id: &str) -> Result<GrowthTier, ProjectionError> {
        let window = self.store.recent(farm_id, self.trend_window)?;
        trend::calculate_trend(&window, &self.tiers)
    }

    /// Tier of the latest classification, `None` without history.
    pub fn current_status(&self, farm_id: &str) -> Result<Option<GrowthTier>, ProjectionError> {
        let latest = self.store.recent(farm_id, 1)?;
        Ok(latest.first().map(|label| self.tiers.tier_for(label)))
    }

    /// Forecast and spend for the next `horizon_months` months.
    pub fn project<R: Rng + ?Sized>(
        &self,
        farm_id: &str,
        horizon_months: i64,
        spend_ceiling: Option<u64>,
        rng: &mut R,
    ) -> Result<ProjectionReport, ProjectionError> {
        self.project_at(farm_id, horizon_months, spend_ceiling, rng, Utc::now())
    }

    pub fn project_at<R: Rng + ?Sized>(
        &self,
        farm_id: &str,
        horizon_months: i64,
        spend_ceiling: Option<u64>,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<ProjectionReport, ProjectionError> {
        if horizon_months > self.max_horizon_months {
            return Err(ProjectionError::HorizonOutOfRange {
                requested: horizon_months,
                max: self.max_horizon_months,
            });
        }

        // One read serves both the trend and the current status.
        let window = self.store.recent(farm_id, self.trend_window)?;
        let current_status = window.first().map(|label| self.tiers.tier_for(label));

        let trend = match trend::calculate_trend(&window, &self.tiers) {
            Ok(tier) => Some(tier),
            Err(ProjectionError::InsufficientData) => None,
            Err(e) => return Err(e),
        };

        // No history projects like an Unknown trend: all Undefined.
        let forecast = self
            .projector
            .project_monthly(trend.unwrap_or(GrowthTier::Unknown), horizon_months, rng);
        let projected_spend = accumulate_cost(&forecast, &self.costs);
        let ceiling_breached_at =
            spend_ceiling.and_then(|ceiling| first_month_over(&projected_spend, ceiling));

        info!(
            farm_id = %farm_id,
            trend = ?trend,
            horizon = forecast.len(),
            total_spend = projected_spend.last().copied().unwrap_or(0),
            "Projection computed"
        );

        Ok(ProjectionReport {
            farm_id: farm_id.to_string(),
            generated_at: now,
            current_status,
            trend,
            months: month_names(now, forecast.len()),
            forecast,
            projected_spend,
            spend_ceiling,
            ceiling_breached_at,
        })
    }

    /// Monthly view for `month` of the current UTC year.
    pub fn monthly_status(
        &self,
        farm_id: &str,
        month: i64,
    ) -> Result<Vec<DailyStatus>, ProjectionError> {
        self.monthly_status_in(farm_id, Utc::now().year(), month)
    }

    pub fn monthly_status_in(
        &self,
        farm_id: &str,
        year: i32,
        month: i64,
    ) -> Result<Vec<DailyStatus>, ProjectionError> {
        monthly::monthly_status(self.store.as_ref(), &self.tiers, farm_id, year, month)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn store(&self) -> &Arc<dyn HistoryStore> {
        &self.store
    }

    /// Tier for a label under the engine's tier table.
    pub fn tier_for(&self, label: &StatusLabel) -> GrowthTier {
        self.tiers.tier_for(label)
    }

    pub fn classifier_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.classifier.as_deref().map(|c| c.model_name())
    }

    pub fn trend_window(&self) -> usize {
        self.trend_window
    }

    pub fn max_horizon_months(&self) -> i64 {
        self.max_horizon_months
    }
}

/// `count` consecutive English month names starting at the month of `from`.
pub fn month_names(from: DateTime<Utc>, count: usize) -> Vec<String> {
    let Ok(first) = Month::try_from(from.month() as u8) else {
        return Vec::new();
    };
    std::iter::successors(Some(first), |m| Some(m.succ()))
        .take(count)
        .map(|m| m.name().to_string())
        .collect()
}
