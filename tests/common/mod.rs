//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use parking_lot::Mutex;
use serde_json::Value;
use tower::ServiceExt;

use steelworks_api::application::services::{MailDispatcher, MailRelay, ReviewsProxy};
use steelworks_api::config::{
    CorsSettings, MailSettings, RateLimitSettings, ReviewsSettings, SecuritySettings,
    ServerSettings, Settings, GOOGLE_PLACE_DETAILS_URL,
};
use steelworks_api::domain::{
    FetchError, MailError, MailTransport, OutgoingMail, PlaceDetailsResponse, PlaceResult,
    PlacesClient, RawReview,
};
use steelworks_api::infrastructure::cache::ReviewCache;
use steelworks_api::presentation::middleware::RateLimiter;
use steelworks_api::startup::{build_router, AppState};

pub const OWNER: &str = "owner@example.com";
pub const SENDER: &str = "\"RN All Steel\" <mailer@example.com>";

/// Settings with nothing configured and a generous rate limit.
pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
        },
        cors: CorsSettings {
            allowed_origins: vec!["https://rnallsteel.example".into()],
        },
        rate_limit: RateLimitSettings {
            requests_per_window: 100,
            window_seconds: 60,
            burst_allowance: 0,
        },
        security: SecuritySettings { enable_hsts: false },
        mail: MailSettings {
            host: None,
            port: None,
            username: None,
            password: None,
            to: None,
            from: None,
            sender_name: "RN All Steel".into(),
            timeout_secs: 10,
            utc_offset_minutes: 330,
        },
        reviews: ReviewsSettings {
            api_key: None,
            place_id: None,
            ttl_ms: 300_000,
            base_url: GOOGLE_PLACE_DETAILS_URL.into(),
            timeout_secs: 10,
        },
        environment: "test".into(),
    }
}

/// Mail transport that records what it was asked to send.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutgoingMail>>,
    pub fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        self.sent.lock().push(mail);
        if self.fail {
            Err(MailError::Transport("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

/// Places client answering from a script and counting calls. Once the
/// script runs out the last answer repeats.
pub struct ScriptedPlaces {
    script: Mutex<VecDeque<Result<PlaceDetailsResponse, FetchError>>>,
    last: Mutex<Option<Result<PlaceDetailsResponse, FetchError>>>,
    calls: AtomicUsize,
}

impl ScriptedPlaces {
    pub fn new(script: Vec<Result<PlaceDetailsResponse, FetchError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn clone_answer(
    answer: &Result<PlaceDetailsResponse, FetchError>,
) -> Result<PlaceDetailsResponse, FetchError> {
    match answer {
        Ok(payload) => Ok(payload.clone()),
        Err(FetchError::Status { status, body }) => Err(FetchError::Status {
            status: *status,
            body: body.clone(),
        }),
        Err(FetchError::Transport(reason)) => Err(FetchError::Transport(reason.clone())),
        Err(FetchError::Decode(reason)) => Err(FetchError::Decode(reason.clone())),
    }
}

#[async_trait]
impl PlacesClient for ScriptedPlaces {
    async fn place_details(&self) -> Result<PlaceDetailsResponse, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().pop_front();
        let mut last = self.last.lock();
        if let Some(answer) = next {
            *last = Some(clone_answer(&answer));
            return answer;
        }
        match last.as_ref() {
            Some(answer) => clone_answer(answer),
            None => Err(FetchError::Transport("script is empty".into())),
        }
    }
}

/// An OK place details payload with `count` five-star reviews.
pub fn place_payload(count: usize) -> PlaceDetailsResponse {
    PlaceDetailsResponse {
        status: "OK".into(),
        error_message: None,
        result: Some(PlaceResult {
            name: Some("RN All Steel Fabrication".into()),
            rating: Some(4.8),
            user_ratings_total: Some(57),
            url: Some("https://maps.google.com/?cid=1234".into()),
            reviews: Some(
                (0..count)
                    .map(|i| RawReview {
                        author_name: Some(format!("Customer {i}")),
                        rating: Some(5.0),
                        time: Some(1_700_000_000 + i as i64),
                        text: Some("Sturdy gate, on time.".into()),
                        relative_time_description: Some("2 weeks ago".into()),
                        ..Default::default()
                    })
                    .collect(),
            ),
        }),
    }
}

/// Builder for a router wired with test doubles.
pub struct TestAppBuilder {
    settings: Settings,
    mailer: Option<Arc<RecordingMailer>>,
    places: Option<Arc<dyn PlacesClient>>,
    ttl: Duration,
}

impl TestAppBuilder {
    pub fn with_mailer(mut self, mailer: Arc<RecordingMailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    pub fn with_places(mut self, places: Arc<dyn PlacesClient>) -> Self {
        self.places = Some(places);
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_rate_limit(mut self, requests_per_window: u32, burst_allowance: u32) -> Self {
        self.settings.rate_limit.requests_per_window = requests_per_window;
        self.settings.rate_limit.burst_allowance = burst_allowance;
        self
    }

    pub fn build(self) -> TestApp {
        let relay = self.mailer.map(|mailer| {
            let transport: Arc<dyn MailTransport> = mailer;
            MailRelay::new(transport, SENDER, OWNER)
        });
        let mail = MailDispatcher::new(relay, self.settings.mail.utc_offset_minutes);
        let cache = Arc::new(ReviewCache::new(self.ttl));
        let reviews = ReviewsProxy::new(self.places, Arc::clone(&cache));
        let state = AppState::new(mail, reviews, RateLimiter::new(&self.settings.rate_limit));

        TestApp {
            router: build_router(state, &self.settings),
            cache,
        }
    }
}

/// Test application
pub struct TestApp {
    pub router: Router,
    pub cache: Arc<ReviewCache>,
}

/// Collected response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl TestApp {
    pub fn builder() -> TestAppBuilder {
        TestAppBuilder {
            settings: test_settings(),
            mailer: None,
            places: None,
            ttl: Duration::from_secs(300),
        }
    }

    /// Make a GET request to the application
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, uri: &str, body: &str) -> TestResponse {
        self.post_json_from(uri, body, "203.0.113.10").await
    }

    /// Make a POST request with JSON body on behalf of `client_ip`
    pub async fn post_json_from(&self, uri: &str, body: &str, client_ip: &str) -> TestResponse {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .header("X-Forwarded-For", client_ip)
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }
}
