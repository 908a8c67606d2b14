use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;

use super::{run_blocking, validate_farm_id, ApiState};
use crate::api::envelope::{ApiErrorResponse, ApiResponse};

#[derive(Debug, Deserialize)]
pub struct ProjectionRequest {
    pub horizon_months: i64,
    /// Spend ceiling to check the cumulative projection against
    #[serde(default)]
    pub spend_ceiling: Option<u64>,
}

/// POST /api/v1/farms/:farm_id/projection
pub async fn project(
    State(state): State<ApiState>,
    Path(farm_id): Path<String>,
    body: Result<Json<ProjectionRequest>, JsonRejection>,
) -> Response {
    if let Err(resp) = validate_farm_id(&farm_id) {
        return resp;
    }
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return ApiErrorResponse::bad_request(rejection.body_text()),
    };

    let engine = state.engine.clone();
    let mut rng = state.rng();
    let result = run_blocking(move || {
        engine.project(&farm_id, request.horizon_months, request.spend_ceiling, &mut rng)
    })
    .await;

    match result {
        Ok(report) => ApiResponse::ok(report),
        Err(resp) => resp,
    }
}
