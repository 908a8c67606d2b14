//! API Regression Tests
//!
//! In-process tests that build the Axum app via `create_app()` and exercise
//! every endpoint using `tower::ServiceExt::oneshot()`.
//! No binary spawn, no network port.

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Datelike, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use plantcast::api::{create_app, ApiState};
use plantcast::config::{ProjectionConfig, ServerConfig};
use plantcast::{
    InMemoryHistoryStore, LinearStatusModel, ProjectionEngine, StatusClassifier, TierMap,
};

fn shipped_model() -> Arc<dyn StatusClassifier> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("models/status_model.json");
    Arc::new(LinearStatusModel::load(&path).unwrap())
}

fn create_test_app(classifier: Option<Arc<dyn StatusClassifier>>) -> Router {
    let engine = ProjectionEngine::new(
        Arc::new(InMemoryHistoryStore::new()),
        classifier,
        Arc::new(TierMap::default()),
        &ProjectionConfig::default(),
    )
    .unwrap();
    create_app(ApiState::new(Arc::new(engine), Some(7)), &ServerConfig::default())
}

fn healthy_reading() -> Value {
    json!({
        "soil_moisture": 45.0,
        "ambient_temperature": 23.0,
        "soil_temperature": 21.0,
        "humidity": 70.0,
        "light_intensity": 650.0,
        "soil_ph": 6.4
    })
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

const READINGS_URI: &str = "/api/v1/farms/farm-1/readings";

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// /health reports backend and classifier state in the envelope.
#[tokio::test]
async fn test_health_returns_envelope() {
    let app = create_test_app(Some(shipped_model()));
    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["storage_backend"], "InMemory");
    assert_eq!(body["data"]["record_count"], 0);
    assert_eq!(body["data"]["classifier_loaded"], true);
    assert!(body["meta"]["timestamp"].is_string());
}

/// Posting a reading classifies it, stores it and returns 201.
#[tokio::test]
async fn test_record_reading_created() {
    let app = create_test_app(Some(shipped_model()));
    let (status, body) = send(&app, post_json(READINGS_URI, &healthy_reading())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["record"]["status"], "Healthy");
    assert_eq!(body["data"]["record"]["farm_id"], "farm-1");
    assert_eq!(body["data"]["tier"], "High");

    let (_, health) = send(&app, get("/health")).await;
    assert_eq!(health["data"]["record_count"], 1);
}

/// Without a classifier, readings are refused with 503 but projections work.
#[tokio::test]
async fn test_missing_classifier_is_503() {
    let app = create_test_app(None);
    let (status, body) = send(&app, post_json(READINGS_URI, &healthy_reading())).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");

    let request = json!({"horizon_months": 2});
    let (status, _) = send(&app, post_json("/api/v1/farms/farm-1/projection", &request)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, health) = send(&app, get("/health")).await;
    assert_eq!(health["data"]["status"], "degraded");
}

/// Malformed reading bodies are rejected with the error envelope.
#[tokio::test]
async fn test_malformed_reading_is_400() {
    let app = create_test_app(Some(shipped_model()));
    let partial = json!({"soil_moisture": 3});
    let (status, body) = send(&app, post_json(READINGS_URI, &partial)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

/// A farm with no history projects an all-Undefined forecast.
#[tokio::test]
async fn test_projection_without_history() {
    let app = create_test_app(Some(shipped_model()));
    let request = json!({"horizon_months": 3, "spend_ceiling": 20});
    let uri = "/api/v1/farms/empty-farm/projection";
    let (status, body) = send(&app, post_json(uri, &request)).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["trend"], Value::Null);
    assert_eq!(data["current_status"], Value::Null);
    assert_eq!(data["forecast"], json!(["Undefined", "Undefined", "Undefined"]));
    assert_eq!(data["projected_spend"], json!([15, 30, 45]));
    assert_eq!(data["spend_ceiling"], 20);
    assert_eq!(data["ceiling_breached_at"], 1);
    assert_eq!(data["months"].as_array().unwrap().len(), 3);
}

/// Healthy history projects only High/Medium months.
#[tokio::test]
async fn test_projection_after_healthy_readings() {
    let app = create_test_app(Some(shipped_model()));
    for _ in 0..5 {
        let req = post_json("/api/v1/farms/farm-2/readings", &healthy_reading());
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let req = post_json("/api/v1/farms/farm-2/projection", &json!({"horizon_months": 6}));
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["trend"], "High");
    assert_eq!(body["data"]["current_status"], "High");

    let forecast = body["data"]["forecast"].as_array().unwrap();
    assert_eq!(forecast.len(), 6);
    assert!(forecast.iter().all(|t| t == "High" || t == "Medium"));
    assert_eq!(body["data"]["ceiling_breached_at"], Value::Null);
}

/// Horizons beyond the configured maximum are client errors.
#[tokio::test]
async fn test_projection_horizon_limit() {
    let app = create_test_app(Some(shipped_model()));
    let too_far = ProjectionConfig::default().max_horizon_months + 1;
    let (status, body) = send(
        &app,
        post_json("/api/v1/farms/farm-1/projection", &json!({"horizon_months": too_far})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("exceeds"));
}

/// Month outside 1..=12 is rejected; a valid month returns the calendar view.
#[tokio::test]
async fn test_monthly_view() {
    let app = create_test_app(Some(shipped_model()));
    for month in [0, 13] {
        let uri = format!("/api/v1/farms/farm-3/monthly?month={month}");
        let (status, _) = send(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "month={month}");
    }

    let req = post_json("/api/v1/farms/farm-3/readings", &healthy_reading());
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);

    let now = Utc::now();
    let uri = format!("/api/v1/farms/farm-3/monthly?month={}&year={}", now.month(), now.year());
    let (status, body) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["year"], now.year());
    assert_eq!(body["data"]["days"], json!([{"day": now.day(), "tier": "High"}]));

    // Other years are empty, not errors
    let uri = format!("/api/v1/farms/farm-3/monthly?month={}&year=1999", now.month());
    let (status, body) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["days"], json!([]));
}

/// Missing or non-numeric month parameter is a 400, not a plain-text rejection.
#[tokio::test]
async fn test_monthly_bad_query_is_400() {
    let app = create_test_app(Some(shipped_model()));
    for uri in ["/api/v1/farms/farm-3/monthly", "/api/v1/farms/farm-3/monthly?month=june"] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }
}

/// Overlong farm ids are rejected before touching the store.
#[tokio::test]
async fn test_farm_id_validation() {
    let app = create_test_app(Some(shipped_model()));
    let long_id = "f".repeat(129);
    let (status, _) = send(&app, get(&format!("/api/v1/farms/{long_id}/monthly?month=1"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, get("/api/v1/farms/farm%0A1/monthly?month=1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// Unknown paths get the JSON error envelope.
#[tokio::test]
async fn test_unknown_route_is_404_envelope() {
    let app = create_test_app(None);
    let (status, body) = send(&app, get("/api/v1/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}
