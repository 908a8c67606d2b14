//! Monthly aggregator: calendar view of one farm's history for one month.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use super::{ProjectionError, TierMap};
use crate::storage::HistoryStore;
use crate::types::DailyStatus;

/// Validate a 1-based month number.
pub fn validate_month(month: i64) -> Result<u32, ProjectionError> {
    match u32::try_from(month) {
        Ok(m @ 1..=12) => Ok(m),
        _ => Err(ProjectionError::InvalidMonth(month)),
    }
}

/// `[start-of-month, start-of-next-month)` in UTC.
pub fn month_bounds(
    year: i32,
    month: u32,
) -> Result<(DateTime<Utc>, DateTime<Utc>), ProjectionError> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1), 1)
    } else {
        (Some(year), month + 1)
    };

    let start =
        NaiveDate::from_ymd_opt(year, month, 1).ok_or(ProjectionError::InvalidYear(year))?;
    let end = next_year
        .and_then(|y| NaiveDate::from_ymd_opt(y, next_month, 1))
        .ok_or(ProjectionError::InvalidYear(year))?;

    Ok((
        start.and_time(chrono::NaiveTime::MIN).and_utc(),
        end.and_time(chrono::NaiveTime::MIN).and_utc(),
    ))
}

/// Day-by-day growth tiers recorded for `farm_id` during `month` of `year`.
///
/// Sorted ascending by day. Several records on one day are all kept, in the
/// order the store returned them. No records yields an empty vector.
pub fn monthly_status(
    store: &dyn HistoryStore,
    tiers: &TierMap,
    farm_id: &str,
    year: i32,
    month: i64,
) -> Result<Vec<DailyStatus>, ProjectionError> {
    let month = validate_month(month)?;
    let (start, end) = month_bounds(year, month)?;

    let records = store.in_range(farm_id, start, end)?;

    let mut days: Vec<DailyStatus> = records
        .iter()
        .map(|record| DailyStatus {
            day: record.timestamp.day(),
            tier: tiers.tier_for(&record.status),
        })
        .collect();
    // stable: same-day entries keep store order
    days.sort_by_key(|d| d.day);

    Ok(days)
}
