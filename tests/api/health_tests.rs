//! Health Check API Tests

use std::sync::Arc;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{place_payload, RecordingMailer, ScriptedPlaces, TestApp};

#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = TestApp::builder().build();

    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert!(response.body["version"].is_string());
}

#[tokio::test]
async fn test_liveness_probe() {
    let app = TestApp::builder().build();

    let response = app.get("/health/live").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "alive");
}

#[tokio::test]
async fn test_readiness_degraded_without_relay() {
    let app = TestApp::builder().build();

    let response = app.get("/health/ready").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "degraded");
    assert_eq!(response.body["checks"]["mail"]["status"], "degraded");
    assert_eq!(response.body["checks"]["reviews"]["status"], "degraded");
    assert_eq!(response.body["checks"]["review_cache"]["populated"], false);
}

#[tokio::test]
async fn test_readiness_healthy_and_reports_cache() {
    let places = Arc::new(ScriptedPlaces::new(vec![Ok(place_payload(3))]));
    let app = TestApp::builder()
        .with_mailer(Arc::new(RecordingMailer::default()))
        .with_places(places)
        .build();

    app.get("/api/google-review").await;
    let response = app.get("/health/ready").await;

    assert_eq!(response.body["status"], "healthy");
    assert_eq!(response.body["checks"]["review_cache"]["populated"], true);
    assert_eq!(response.body["checks"]["review_cache"]["fresh"], true);
    assert_eq!(response.body["checks"]["review_cache"]["ttl_seconds"], 300);
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = TestApp::builder().build();

    let response = app.get("/health").await;

    assert_eq!(response.header("x-content-type-options"), Some("nosniff"));
    assert_eq!(response.header("x-frame-options"), Some("DENY"));
    assert!(response.header("strict-transport-security").is_none());
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = TestApp::builder().build();

    app.get("/health").await;
    let response = app.get("/metrics").await;

    assert_eq!(response.status, StatusCode::OK);
    let text = response.body.as_str().unwrap();
    assert!(text.contains("steelworks_http_requests_total"));
}
