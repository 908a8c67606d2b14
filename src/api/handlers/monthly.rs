use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::{run_blocking, validate_farm_id, ApiState};
use crate::api::envelope::{ApiErrorResponse, ApiResponse};
use crate::types::DailyStatus;

#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    pub month: i64,
    /// Defaults to the current UTC year
    pub year: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct MonthlyView {
    pub farm_id: String,
    pub year: i32,
    pub month: i64,
    pub days: Vec<DailyStatus>,
}

/// GET /api/v1/farms/:farm_id/monthly?month=M[&year=Y]
pub async fn monthly_status(
    State(state): State<ApiState>,
    Path(farm_id): Path<String>,
    query: Result<Query<MonthlyQuery>, QueryRejection>,
) -> Response {
    if let Err(resp) = validate_farm_id(&farm_id) {
        return resp;
    }
    let Query(MonthlyQuery { month, year }) = match query {
        Ok(query) => query,
        Err(rejection) => return ApiErrorResponse::bad_request(rejection.body_text()),
    };
    let year = year.unwrap_or_else(|| Utc::now().year());

    let engine = state.engine.clone();
    let result = run_blocking(move || {
        let days = engine.monthly_status_in(&farm_id, year, month)?;
        Ok(MonthlyView { farm_id, year, month, days })
    })
    .await;

    match result {
        Ok(view) => ApiResponse::ok(view),
        Err(resp) => resp,
    }
}
