//! Health Check Handlers
//!
//! Provides health check endpoints for liveness and readiness probes.
//!
//! # Endpoints
//! - `GET /health` - Basic health check
//! - `GET /health/live` - Liveness probe (is the server running?)
//! - `GET /health/ready` - Readiness probe with component checks
//!
//! Both components degrade gracefully, so readiness is always 200; a
//! missing relay or disabled reviews proxy shows up as `degraded`.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::time::Instant;

use crate::startup::AppState;

/// Server start time for uptime calculation
static SERVER_START: Lazy<Instant> = Lazy::new(Instant::now);
static SERVER_START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Initialize the server start time (call during startup)
pub fn init_server_start() {
    Lazy::force(&SERVER_START);
    Lazy::force(&SERVER_START_TIME);
}

/// Basic health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Detailed health check response
#[derive(Debug, Serialize)]
pub struct DetailedHealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub started_at: String,
    pub checks: HealthChecks,
}

/// Individual component checks
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub mail: ComponentHealth,
    pub reviews: ComponentHealth,
    pub review_cache: CacheHealth,
}

/// Health of a single component
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// Review cache state
#[derive(Debug, Serialize)]
pub struct CacheHealth {
    pub populated: bool,
    pub fresh: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_seconds: Option<u64>,
    pub ttl_seconds: u64,
}

/// Overall health status
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// Simple liveness response
#[derive(Debug, Serialize)]
pub struct LivenessResponse {
    pub status: &'static str,
}

/// Basic health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Liveness probe - checks if the server is running
pub async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse { status: "alive" })
}

/// Readiness probe - reports which components are usable
pub async fn readiness(State(state): State<AppState>) -> Json<DetailedHealthResponse> {
    let mail = if state.mail.is_configured() {
        ComponentHealth {
            status: HealthStatus::Healthy,
            message: None,
        }
    } else {
        ComponentHealth {
            status: HealthStatus::Degraded,
            message: Some("SMTP relay is not configured"),
        }
    };

    let reviews = if state.reviews.is_enabled() {
        ComponentHealth {
            status: HealthStatus::Healthy,
            message: None,
        }
    } else {
        ComponentHealth {
            status: HealthStatus::Degraded,
            message: Some("Reviews proxy is disabled"),
        }
    };

    let cache = state.reviews.cache();
    let entry = cache.get();
    let review_cache = CacheHealth {
        populated: entry.is_some(),
        fresh: entry.as_ref().is_some_and(|e| !cache.is_expired(e)),
        age_seconds: entry.as_ref().map(|e| e.age().as_secs()),
        ttl_seconds: cache.ttl().as_secs(),
    };

    Json(DetailedHealthResponse {
        status: overall_status(&[&mail, &reviews]),
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: SERVER_START.elapsed().as_secs(),
        started_at: SERVER_START_TIME.to_rfc3339(),
        checks: HealthChecks {
            mail,
            reviews,
            review_cache,
        },
    })
}

/// Degraded if any component is degraded
fn overall_status(components: &[&ComponentHealth]) -> HealthStatus {
    if components
        .iter()
        .any(|c| c.status == HealthStatus::Degraded)
    {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    }
}
