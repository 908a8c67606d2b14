use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use super::{run_blocking, validate_farm_id, ApiState};
use crate::api::envelope::{ApiErrorResponse, ApiResponse};
use crate::types::{GrowthTier, HistoryRecord, SensorReading};

#[derive(Debug, Serialize)]
pub struct RecordedReading {
    pub record: HistoryRecord,
    pub tier: GrowthTier,
}

/// POST /api/v1/farms/:farm_id/readings
pub async fn record_reading(
    State(state): State<ApiState>,
    Path(farm_id): Path<String>,
    body: Result<Json<SensorReading>, JsonRejection>,
) -> Response {
    if let Err(resp) = validate_farm_id(&farm_id) {
        return resp;
    }
    let Json(reading) = match body {
        Ok(body) => body,
        Err(rejection) => return ApiErrorResponse::bad_request(rejection.body_text()),
    };

    let engine = state.engine.clone();
    let result = run_blocking(move || {
        let record = engine.record_reading(&farm_id, &reading)?;
        let tier = engine.tier_for(&record.status);
        Ok(RecordedReading { record, tier })
    })
    .await;

    match result {
        Ok(recorded) => ApiResponse::created(recorded),
        Err(resp) => resp,
    }
}
