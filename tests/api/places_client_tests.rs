//! Places Client Tests
//!
//! Runs `GooglePlacesClient` against a throwaway axum server standing in
//! for the place details endpoint.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{extract::Query, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::net::TcpListener;

use steelworks_api::config::PlaceCredentials;
use steelworks_api::domain::{FetchError, PlacesClient};
use steelworks_api::infrastructure::places::GooglePlacesClient;

async fn place_details(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    match params.get("place_id").map(String::as_str) {
        Some("ok-place") if params.get("key").map(String::as_str) == Some("test-key") => {
            assert_eq!(
                params.get("fields").map(String::as_str),
                Some("name,rating,user_ratings_total,reviews,url")
            );
            (
                StatusCode::OK,
                Json(json!({
                    "status": "OK",
                    "result": {
                        "name": "RN All Steel",
                        "rating": 4.7,
                        "user_ratings_total": 31,
                        "reviews": [{ "author_name": "Vikram", "rating": 5, "text": "Solid work" }]
                    }
                })),
            )
                .into_response()
        }
        Some("denied-place") => (
            StatusCode::OK,
            Json(json!({ "status": "REQUEST_DENIED", "error_message": "Key rejected" })),
        )
            .into_response(),
        Some("garbage-place") => (StatusCode::OK, "<html>not json</html>").into_response(),
        _ => (StatusCode::SERVICE_UNAVAILABLE, "upstream down").into_response(),
    }
}

async fn spawn_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/details/json", get(place_details));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client(addr: SocketAddr, place_id: &str) -> GooglePlacesClient {
    GooglePlacesClient::new(
        format!("http://{addr}/details/json"),
        PlaceCredentials {
            api_key: "test-key".into(),
            place_id: place_id.into(),
        },
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_ok_payload_is_decoded() {
    let addr = spawn_upstream().await;

    let payload = client(addr, "ok-place").place_details().await.unwrap();

    assert!(payload.is_ok());
    let result = payload.result.unwrap();
    assert_eq!(result.name.as_deref(), Some("RN All Steel"));
    assert_eq!(result.reviews.unwrap().len(), 1);
}

#[tokio::test]
async fn test_application_status_is_passed_through() {
    let addr = spawn_upstream().await;

    let payload = client(addr, "denied-place").place_details().await.unwrap();

    assert!(!payload.is_ok());
    assert_eq!(payload.status, "REQUEST_DENIED");
    assert_eq!(payload.error_message.as_deref(), Some("Key rejected"));
}

#[tokio::test]
async fn test_http_error_carries_status_and_body() {
    let addr = spawn_upstream().await;

    let error = client(addr, "missing-place").place_details().await.unwrap_err();

    match error {
        FetchError::Status { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "upstream down");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let addr = spawn_upstream().await;

    let error = client(addr, "garbage-place").place_details().await.unwrap_err();

    assert!(matches!(error, FetchError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_upstream_is_transport_error_without_key() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let error = client(addr, "ok-place").place_details().await.unwrap_err();

    match error {
        FetchError::Transport(reason) => assert!(!reason.contains("test-key")),
        other => panic!("unexpected error: {other:?}"),
    }
}
