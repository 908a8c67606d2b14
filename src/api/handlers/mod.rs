//! API route handlers
//!
//! Each handler validates the farm id, runs the engine call on the blocking
//! pool (store I/O is synchronous) and wraps the result in the envelope.

mod health;
mod monthly;
mod projection;
mod readings;

pub use health::*;
pub use monthly::*;
pub use projection::*;
pub use readings::*;

use std::sync::Arc;
use std::time::Instant;

use axum::response::Response;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::error;

use super::envelope::ApiErrorResponse;
use crate::config::defaults;
use crate::projection::{ProjectionEngine, ProjectionError};

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub engine: Arc<ProjectionEngine>,
    /// Fixed projection seed; `None` seeds each request from entropy
    pub rng_seed: Option<u64>,
    pub started_at: Instant,
}

impl ApiState {
    pub fn new(engine: Arc<ProjectionEngine>, rng_seed: Option<u64>) -> Self {
        Self {
            engine,
            rng_seed,
            started_at: Instant::now(),
        }
    }

    /// Fresh RNG for one request.
    pub fn rng(&self) -> StdRng {
        match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Farm ids are opaque, but bounded and free of control characters.
pub fn validate_farm_id(farm_id: &str) -> Result<(), Response> {
    let len = farm_id.chars().count();
    if len == 0 || len > defaults::MAX_FARM_ID_LEN {
        return Err(ApiErrorResponse::bad_request(format!(
            "farm id must be 1-{} characters",
            defaults::MAX_FARM_ID_LEN
        )));
    }
    if farm_id.chars().any(char::is_control) {
        return Err(ApiErrorResponse::bad_request(
            "farm id must not contain control characters",
        ));
    }
    Ok(())
}

/// Map an engine error onto the envelope.
pub fn error_response(err: ProjectionError) -> Response {
    if err.is_client_error() {
        return ApiErrorResponse::bad_request(err.to_string());
    }
    match err {
        ProjectionError::ClassifierUnavailable => {
            ApiErrorResponse::service_unavailable(err.to_string())
        }
        other => {
            error!(error = %other, "Request failed");
            ApiErrorResponse::internal(other.to_string())
        }
    }
}

/// Run a store-touching engine call on the blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T, Response>
where
    F: FnOnce() -> Result<T, ProjectionError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(error_response),
        Err(e) => {
            error!(error = %e, "Blocking task failed");
            Err(ApiErrorResponse::internal("internal task failure"))
        }
    }
}

/// Fallback for unmatched paths.
pub async fn not_found() -> Response {
    ApiErrorResponse::not_found("no such endpoint")
}
