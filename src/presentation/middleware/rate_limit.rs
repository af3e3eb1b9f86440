//! Rate Limiting Middleware
//!
//! In-process sliding-window rate limiting for the form endpoints. Each
//! client keeps a queue of recent request instants; a request is admitted
//! while the queue holds fewer than `requests_per_window + burst_allowance`
//! entries younger than the window.
//!
//! State lives in this process only. Behind several instances every
//! instance enforces its own budget.

use std::collections::VecDeque;
use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;

use crate::config::RateLimitSettings;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Clients tracked before idle entries are swept.
const SWEEP_THRESHOLD: usize = 10_000;

/// Rate limit status reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Maximum requests allowed in the current window
    pub limit: u32,
    /// Remaining requests in the current window
    pub remaining: u32,
    /// Unix timestamp when the oldest counted request leaves the window
    pub reset_at: i64,
    /// Seconds until another request would be admitted
    pub retry_after: u64,
}

/// Sliding-window limiter keyed by client identifier.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    hits: DashMap<String, VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(settings: &RateLimitSettings) -> Self {
        Self {
            max_requests: settings
                .requests_per_window
                .saturating_add(settings.burst_allowance)
                .max(1),
            window: Duration::from_secs(settings.window_seconds),
            hits: DashMap::new(),
        }
    }

    /// Count a request from `identifier`.
    ///
    /// Returns `Ok(RateLimitInfo)` if allowed, `Err(RateLimitInfo)` if rate limited.
    pub fn check(&self, identifier: &str) -> Result<RateLimitInfo, RateLimitInfo> {
        self.check_at(identifier, Instant::now())
    }

    fn check_at(&self, identifier: &str, now: Instant) -> Result<RateLimitInfo, RateLimitInfo> {
        if self.hits.len() > SWEEP_THRESHOLD {
            self.sweep(now);
        }

        let mut queue = self.hits.entry(identifier.to_owned()).or_default();
        while queue
            .front()
            .is_some_and(|t| now.saturating_duration_since(*t) >= self.window)
        {
            queue.pop_front();
        }

        let allowed = (queue.len() as u32) < self.max_requests;
        if allowed {
            queue.push_back(now);
        }

        let oldest = queue.front().copied().unwrap_or(now);
        let until_reset = (oldest + self.window).saturating_duration_since(now);
        let info = RateLimitInfo {
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(queue.len() as u32),
            reset_at: chrono::Utc::now().timestamp() + until_reset.as_secs_f64().ceil() as i64,
            retry_after: if allowed {
                0
            } else {
                until_reset.as_secs_f64().ceil().max(1.0) as u64
            },
        };

        if allowed {
            Ok(info)
        } else {
            Err(info)
        }
    }

    /// Drop clients with no requests left inside the window.
    fn sweep(&self, now: Instant) {
        self.hits.retain(|_, queue| {
            queue
                .back()
                .is_some_and(|t| now.saturating_duration_since(*t) < self.window)
        });
    }
}

/// Identify the client for rate limiting.
///
/// Prefers the first `X-Forwarded-For` hop, then `X-Real-IP`, then the
/// socket peer. Forwarding headers are only trustworthy behind a proxy
/// that overwrites them.
fn extract_identifier(headers: &HeaderMap, peer: Option<IpAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim);
    let real_ip = headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .map(str::trim);

    if let Some(ip) = forwarded
        .into_iter()
        .chain(real_ip)
        .find_map(|v| v.parse::<IpAddr>().ok())
    {
        return format!("ip:{}", ip);
    }

    match peer {
        Some(ip) => format!("ip:{}", ip),
        None => {
            tracing::warn!("Could not determine client identifier for rate limiting");
            "ip:unknown".to_string()
        }
    }
}

/// Rate limiting middleware for the contact and quote endpoints.
pub async fn rate_limit_forms(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip());
    let identifier = extract_identifier(request.headers(), peer);

    match state.rate_limiter.check(&identifier) {
        Ok(info) => {
            let mut response = next.run(request).await;
            add_rate_limit_headers(response.headers_mut(), &info);
            response
        }
        Err(info) => {
            tracing::warn!(identifier = %identifier, "Rate limit exceeded");
            let mut response = AppError::RateLimited.into_response();
            if let Ok(v) = HeaderValue::from_str(&info.retry_after.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, v);
            }
            add_rate_limit_headers(response.headers_mut(), &info);
            response
        }
    }
}

fn add_rate_limit_headers(headers: &mut HeaderMap, info: &RateLimitInfo) {
    if let Ok(v) = HeaderValue::from_str(&info.limit.to_string()) {
        headers.insert(HeaderName::from_static("x-ratelimit-limit"), v);
    }
    if let Ok(v) = HeaderValue::from_str(&info.remaining.to_string()) {
        headers.insert(HeaderName::from_static("x-ratelimit-remaining"), v);
    }
    if let Ok(v) = HeaderValue::from_str(&info.reset_at.to_string()) {
        headers.insert(HeaderName::from_static("x-ratelimit-reset"), v);
    }
}
