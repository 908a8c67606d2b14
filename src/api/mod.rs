//! REST API module using Axum
//!
//! Thin HTTP adapter over the [`ProjectionEngine`](crate::projection::ProjectionEngine):
//! - `/api/v1/farms/:farm_id/...` readings, projections and monthly views
//! - `/health` liveness and backend summary

pub mod envelope;
pub mod handlers;
mod routes;

pub use handlers::ApiState;

use std::time::Duration;

use axum::http::{header, Method};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{defaults, ServerConfig};

/// Build a CORS layer that is restrictive by default (same-origin only).
///
/// Set `PLANTCAST_CORS_ORIGINS` to a comma-separated list of allowed origins
/// to let a browser front-end on another origin call the API.
fn build_cors_layer() -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    match std::env::var(defaults::CORS_ORIGINS_ENV_VAR) {
        Ok(origins) => {
            let allowed: Vec<_> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            tracing::info!(origins = %origins, "CORS: allowing configured origins");
            base.allow_origin(allowed)
        }
        Err(_) => base,
    }
}

/// Create the complete application router.
pub fn create_app(state: ApiState, server: &ServerConfig) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes(state.clone()))
        .merge(routes::root_routes(state))
        .fallback(handlers::not_found)
        // Middleware
        .layer(RequestBodyLimitLayer::new(server.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout_secs)))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(build_cors_layer())
}
