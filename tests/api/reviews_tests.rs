//! Google Reviews API Tests

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use steelworks_api::domain::{FetchError, PlaceDetailsResponse};

use crate::common::{place_payload, ScriptedPlaces, TestApp};

#[tokio::test]
async fn test_disabled_without_credentials() {
    let app = TestApp::builder().build();

    let response = app.get("/api/google-review").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["ok"], false);
    assert_eq!(response.body["source"], "disabled");
    assert_eq!(response.body["reviews"], serde_json::json!([]));
    assert!(response.body["meta"].is_null());
    assert!(response.body["message"].is_string());
    assert_eq!(response.header("cache-control"), Some("no-store"));
}

#[tokio::test]
async fn test_first_call_fetches_then_cache_serves() {
    let places = Arc::new(ScriptedPlaces::new(vec![Ok(place_payload(8))]));
    let app = TestApp::builder().with_places(places.clone()).build();

    let first = app.get("/api/google-review").await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["ok"], true);
    assert_eq!(first.body["source"], "google");
    assert_eq!(first.body["reviews"].as_array().unwrap().len(), 6);
    assert_eq!(first.body["meta"]["name"], "RN All Steel Fabrication");
    assert_eq!(first.body["meta"]["total_ratings"], 57);
    assert_eq!(
        first.header("cache-control"),
        Some("public, s-maxage=300, stale-while-revalidate=600")
    );

    let second = app.get("/api/google-review").await;
    assert_eq!(second.body["source"], "cache");
    assert_eq!(second.body["reviews"], first.body["reviews"]);
    assert_eq!(places.calls(), 1);
}

#[tokio::test]
async fn test_limit_applies_to_cached_set() {
    let places = Arc::new(ScriptedPlaces::new(vec![Ok(place_payload(20))]));
    let app = TestApp::builder().with_places(places.clone()).build();

    let two = app.get("/api/google-review?limit=2").await;
    assert_eq!(two.body["reviews"].as_array().unwrap().len(), 2);

    let capped = app.get("/api/google-review?limit=99").await;
    assert_eq!(capped.body["source"], "cache");
    assert_eq!(capped.body["reviews"].as_array().unwrap().len(), 12);

    let fallback = app.get("/api/google-review?limit=abc").await;
    assert_eq!(fallback.body["reviews"].as_array().unwrap().len(), 6);

    assert_eq!(places.calls(), 1);
    assert_eq!(app.cache.get().unwrap().reviews.len(), 12);
}

#[tokio::test]
async fn test_force_refetches() {
    let places = Arc::new(ScriptedPlaces::new(vec![
        Ok(place_payload(2)),
        Ok(place_payload(5)),
    ]));
    let app = TestApp::builder().with_places(places.clone()).build();

    app.get("/api/google-review").await;
    let forced = app.get("/api/google-review?force=1").await;

    assert_eq!(forced.body["source"], "google");
    assert_eq!(forced.body["reviews"].as_array().unwrap().len(), 5);
    assert_eq!(places.calls(), 2);

    let after = app.get("/api/google-review").await;
    assert_eq!(after.body["source"], "cache");
    assert_eq!(after.body["reviews"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_expired_cache_refetches() {
    let places = Arc::new(ScriptedPlaces::new(vec![Ok(place_payload(1))]));
    let app = TestApp::builder()
        .with_places(places.clone())
        .with_ttl(Duration::from_millis(20))
        .build();

    app.get("/api/google-review").await;
    tokio::time::sleep(Duration::from_millis(40)).await;
    let again = app.get("/api/google-review").await;

    assert_eq!(again.body["source"], "google");
    assert_eq!(places.calls(), 2);
}

#[tokio::test]
async fn test_upstream_http_error_is_bad_gateway() {
    let places = Arc::new(ScriptedPlaces::new(vec![Err(FetchError::Status {
        status: 503,
        body: "Service Unavailable".into(),
    })]));
    let app = TestApp::builder().with_places(places).build();

    let response = app.get("/api/google-review").await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["ok"], false);
    assert_eq!(response.body["source"], "google_fetch_error");
    assert_eq!(response.body["status"], 503);
    assert_eq!(response.body["details"], "Service Unavailable");
    assert_eq!(response.header("cache-control"), Some("no-store"));
}

#[tokio::test]
async fn test_network_failure_has_no_status() {
    let places = Arc::new(ScriptedPlaces::new(vec![Err(FetchError::Transport(
        "operation timed out".into(),
    ))]));
    let app = TestApp::builder().with_places(places).build();

    let response = app.get("/api/google-review").await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["source"], "google_fetch_error");
    assert!(response.body.get("status").is_none());
}

#[tokio::test]
async fn test_api_error_does_not_replace_cache() {
    let places = Arc::new(ScriptedPlaces::new(vec![
        Ok(place_payload(4)),
        Ok(PlaceDetailsResponse {
            status: "OVER_QUERY_LIMIT".into(),
            error_message: None,
            result: None,
        }),
    ]));
    let app = TestApp::builder().with_places(places).build();

    app.get("/api/google-review").await;
    let failed = app.get("/api/google-review?force=true").await;

    assert_eq!(failed.status, StatusCode::BAD_GATEWAY);
    assert_eq!(failed.body["source"], "google_api_error");
    assert_eq!(failed.body["google_status"], "OVER_QUERY_LIMIT");
    assert!(failed.body["message"].is_string());

    let cached = app.get("/api/google-review").await;
    assert_eq!(cached.body["source"], "cache");
    assert_eq!(cached.body["reviews"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_ok_without_result_does_not_replace_cache() {
    let places = Arc::new(ScriptedPlaces::new(vec![
        Ok(place_payload(4)),
        Ok(PlaceDetailsResponse {
            status: "OK".into(),
            error_message: None,
            result: None,
        }),
    ]));
    let app = TestApp::builder().with_places(places).build();

    app.get("/api/google-review").await;
    let failed = app.get("/api/google-review?force=1").await;

    assert_eq!(failed.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(failed.body["ok"], false);
    assert_eq!(failed.body["source"], "server_error");

    let cached = app.get("/api/google-review").await;
    assert_eq!(cached.body["source"], "cache");
    assert_eq!(cached.body["reviews"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_undecodable_payload_is_server_error() {
    let places = Arc::new(ScriptedPlaces::new(vec![Err(FetchError::Decode(
        "expected value".into(),
    ))]));
    let app = TestApp::builder().with_places(places).build();

    let response = app.get("/api/google-review").await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["source"], "server_error");
    assert!(app.cache.get().is_none());
}
