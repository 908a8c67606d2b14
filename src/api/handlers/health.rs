use axum::extract::State;
use axum::response::Response;
use serde::Serialize;

use super::{run_blocking, ApiState};
use crate::api::envelope::ApiResponse;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub storage_backend: &'static str,
    pub record_count: usize,
    pub classifier_loaded: bool,
    pub model: Option<String>,
}

/// GET /health
pub async fn health(State(state): State<ApiState>) -> Response {
    let engine = state.engine.clone();
    let record_count = match run_blocking(move || Ok(engine.store().count()?)).await {
        Ok(count) => count,
        Err(resp) => return resp,
    };

    let engine = &state.engine;
    ApiResponse::ok(HealthResponse {
        status: if engine.classifier_loaded() { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        storage_backend: engine.store().backend_name(),
        record_count,
        classifier_loaded: engine.classifier_loaded(),
        model: engine.model_name().map(str::to_string),
    })
}
