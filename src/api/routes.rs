//! API route definitions
//!
//! - POST /api/v1/farms/:farm_id/readings   - classify and record a reading
//! - POST /api/v1/farms/:farm_id/projection - trend, forecast and spend
//! - GET  /api/v1/farms/:farm_id/monthly    - calendar view for one month
//! - GET  /health                           - liveness and backend summary

use axum::{routing::{get, post}, Router};

use super::handlers::{self, ApiState};

pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .route("/farms/:farm_id/readings", post(handlers::record_reading))
        .route("/farms/:farm_id/projection", post(handlers::project))
        .route("/farms/:farm_id/monthly", get(handlers::monthly_status))
        .with_state(state)
}

pub fn root_routes(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .with_state(state)
}
