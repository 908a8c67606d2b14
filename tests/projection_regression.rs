//! Projection Regression Tests
//!
//! End-to-end engine scenarios over a real sled history store: seed a week
//! of classifications, then check trend, forecast support, spend and the
//! monthly calendar view.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use plantcast::classifier::ClassificationError;
use plantcast::config::ServiceConfig;
use plantcast::{
    DailyStatus, ForecastTier, GrowthTier, HistoryRecord, HistoryStore, ProjectionEngine,
    ProjectionError, SensorReading, SledHistoryStore, StatusClassifier, StatusLabel, TierMap,
};

/// Classifier that always returns the same label.
struct FixedLabel(&'static str);

impl StatusClassifier for FixedLabel {
    fn predict(&self, _reading: &SensorReading) -> Result<StatusLabel, ClassificationError> {
        Ok(StatusLabel::new(self.0))
    }

    fn model_name(&self) -> &str {
        "fixed"
    }
}

fn engine_over(store: Arc<dyn HistoryStore>, config: &ServiceConfig) -> ProjectionEngine {
    ProjectionEngine::new(
        store,
        Some(Arc::new(FixedLabel("Healthy"))),
        Arc::new(TierMap::from_config(&config.tiers)),
        &config.projection,
    )
    .unwrap()
}

fn week_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 7, 30, 0).unwrap()
}

/// The reference week: oldest first.
const WEEK: [&str; 7] = [
    "Healthy",
    "Healthy",
    "Healthy",
    "Moderate Stress",
    "Moderate Stress",
    "High Stress",
    "Healthy",
];

fn seed_week(store: &dyn HistoryStore, farm: &str) {
    for (i, label) in WEEK.iter().enumerate() {
        let at = week_start() + Duration::days(i as i64);
        store.append(&HistoryRecord::new(farm, StatusLabel::new(*label), at)).unwrap();
    }
}

#[test]
fn test_reference_week_projects_high() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SledHistoryStore::open(dir.path().join("history.db")).unwrap());
    seed_week(store.as_ref(), "farm-ref");

    let engine = engine_over(store, &ServiceConfig::default());
    assert_eq!(engine.trend("farm-ref").unwrap(), GrowthTier::High);

    let mut rng = StdRng::seed_from_u64(42);
    let report = engine.project("farm-ref", 3, None, &mut rng).unwrap();
    assert_eq!(report.trend, Some(GrowthTier::High));
    assert_eq!(report.current_status, Some(GrowthTier::High));
    assert_eq!(report.forecast.len(), 3);
    assert!(report
        .forecast
        .iter()
        .all(|t| matches!(t, ForecastTier::High | ForecastTier::Medium)));

    // spend follows the drawn forecast: 5 per High month, 10 per Medium month
    let expected: Vec<u64> = report
        .forecast
        .iter()
        .scan(0, |acc, t| {
            *acc += if *t == ForecastTier::High { 5 } else { 10 };
            Some(*acc)
        })
        .collect();
    assert_eq!(report.projected_spend, expected);
}

#[test]
fn test_same_seed_same_report() {
    let store: Arc<dyn HistoryStore> = Arc::new(SledHistoryStore::open_temp().unwrap());
    seed_week(store.as_ref(), "farm-ref");
    let engine = engine_over(store, &ServiceConfig::default());

    let now = Utc.with_ymd_and_hms(2026, 6, 9, 0, 0, 0).unwrap();
    let a = engine
        .project_at("farm-ref", 12, Some(50), &mut StdRng::seed_from_u64(5), now)
        .unwrap();
    let b = engine
        .project_at("farm-ref", 12, Some(50), &mut StdRng::seed_from_u64(5), now)
        .unwrap();
    assert_eq!(a, b);
    assert_eq!(a.months.first().map(String::as_str), Some("June"));
    assert_eq!(a.months.last().map(String::as_str), Some("May"));
}

#[test]
fn test_trend_window_only_sees_latest_records() {
    let store: Arc<dyn HistoryStore> = Arc::new(SledHistoryStore::open_temp().unwrap());
    // A long stressed past followed by a healthy week
    for i in 0..20 {
        let at = week_start() - Duration::days(30 - i);
        store.append(&HistoryRecord::new("farm-w", StatusLabel::high_stress(), at)).unwrap();
    }
    for i in 0..7 {
        let at = week_start() + Duration::days(i);
        store.append(&HistoryRecord::new("farm-w", StatusLabel::healthy(), at)).unwrap();
    }

    let engine = engine_over(store, &ServiceConfig::default());
    assert_eq!(engine.trend("farm-w").unwrap(), GrowthTier::High);
}

#[test]
fn test_unmapped_labels_forecast_undefined() {
    let store: Arc<dyn HistoryStore> = Arc::new(SledHistoryStore::open_temp().unwrap());
    for i in 0..3 {
        let at = week_start() + Duration::days(i);
        store.append(&HistoryRecord::new("farm-u", StatusLabel::new("Frost Damage"), at)).unwrap();
    }

    let engine = engine_over(store, &ServiceConfig::default());
    let report = engine.project("farm-u", 4, None, &mut StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(report.trend, Some(GrowthTier::Unknown));
    assert_eq!(report.forecast, vec![ForecastTier::Undefined; 4]);
    assert_eq!(report.projected_spend, vec![15, 30, 45, 60]);
}

#[test]
fn test_custom_tier_table_and_costs_from_toml() {
    let config = ServiceConfig::from_toml_str(
        r#"
[projection.costs]
high = 1
medium = 2
other = 3

[projection.outlook.low]
high = 0.0
medium = 0.0
low = 1.0

[tiers]
"Healthy" = "High"
"Frost Damage" = "Low"
"#,
    )
    .unwrap();
    config.validate().unwrap();

    let store: Arc<dyn HistoryStore> = Arc::new(SledHistoryStore::open_temp().unwrap());
    store
        .append(&HistoryRecord::new("farm-c", StatusLabel::new("Frost Damage"), week_start()))
        .unwrap();

    let engine = engine_over(store, &config);
    let report = engine.project("farm-c", 3, Some(5), &mut StdRng::seed_from_u64(9)).unwrap();
    assert_eq!(report.trend, Some(GrowthTier::Low));
    assert_eq!(report.forecast, vec![ForecastTier::Low; 3]);
    assert_eq!(report.projected_spend, vec![3, 6, 9]);
    assert_eq!(report.ceiling_breached_at, Some(1));
}

#[test]
fn test_monthly_view_over_sled() {
    let store: Arc<dyn HistoryStore> = Arc::new(SledHistoryStore::open_temp().unwrap());
    seed_week(store.as_ref(), "farm-m");
    // neighbouring months and farms must not leak in
    let last_of_may = week_start() - Duration::days(1);
    store
        .append(&HistoryRecord::new("farm-m", StatusLabel::healthy(), last_of_may))
        .unwrap();
    store
        .append(&HistoryRecord::new("farm-x", StatusLabel::high_stress(), week_start()))
        .unwrap();

    let engine = engine_over(store, &ServiceConfig::default());
    let days = engine.monthly_status_in("farm-m", 2026, 6).unwrap();

    let expected: Vec<DailyStatus> = [
        (1, GrowthTier::High),
        (2, GrowthTier::High),
        (3, GrowthTier::High),
        (4, GrowthTier::Medium),
        (5, GrowthTier::Medium),
        (6, GrowthTier::Low),
        (7, GrowthTier::High),
    ]
    .into_iter()
    .map(|(day, tier)| DailyStatus { day, tier })
    .collect();
    assert_eq!(days, expected);

    assert!(matches!(
        engine.monthly_status_in("farm-m", 2026, 0),
        Err(ProjectionError::InvalidMonth(0))
    ));
}

#[test]
fn test_far_future_history_over_sled() {
    let store: Arc<dyn HistoryStore> = Arc::new(SledHistoryStore::open_temp().unwrap());
    let day = |d| Utc.with_ymd_and_hms(2300, 3, d, 12, 0, 0).unwrap();
    store
        .append(&HistoryRecord::new("farm-f", StatusLabel::healthy(), day(10)))
        .unwrap();
    store
        .append(&HistoryRecord::new("farm-f", StatusLabel::high_stress(), day(5)))
        .unwrap();

    let engine = engine_over(store, &ServiceConfig::default());
    assert_eq!(engine.current_status("farm-f").unwrap(), Some(GrowthTier::High));
    assert_eq!(
        engine.monthly_status_in("farm-f", 2300, 3).unwrap(),
        vec![
            DailyStatus { day: 5, tier: GrowthTier::Low },
            DailyStatus { day: 10, tier: GrowthTier::High },
        ]
    );
}

#[test]
fn test_recorded_readings_feed_the_trend() {
    let store: Arc<dyn HistoryStore> = Arc::new(SledHistoryStore::open_temp().unwrap());
    let engine = engine_over(store, &ServiceConfig::default());
    let reading = SensorReading {
        soil_moisture: 40.0,
        ambient_temperature: 22.0,
        soil_temperature: 20.0,
        humidity: 65.0,
        light_intensity: 500.0,
        soil_ph: 6.6,
    };

    for i in 0..3 {
        engine
            .record_reading_at("farm-r", &reading, week_start() + Duration::days(i))
            .unwrap();
    }
    assert_eq!(engine.current_status("farm-r").unwrap(), Some(GrowthTier::High));
    assert_eq!(engine.trend("farm-r").unwrap(), GrowthTier::High);
    assert_eq!(engine.store().count().unwrap(), 3);
}
