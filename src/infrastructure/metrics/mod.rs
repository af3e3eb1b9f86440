//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - HTTP request counts by method, path, and status
//! - HTTP request latency histograms
//! - Form submission outcomes by kind
//! - Review responses by provenance
//! - Upstream place details latency

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

const NAMESPACE: &str = "steelworks";

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP request counter - tracks total requests by method, path, and status code
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests").namespace(NAMESPACE),
        &["method", "path", "status"],
    )
    .expect("Failed to create HTTP_REQUESTS_TOTAL metric")
});

/// HTTP request latency histogram - tracks request duration in seconds
pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        )
        .namespace(NAMESPACE)
        .buckets(buckets),
        &["method", "path"],
    )
    .expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric")
});

/// Form submissions by kind ("contact", "quote") and outcome code
pub static FORM_SUBMISSIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("form_submissions_total", "Form submissions by kind and outcome")
            .namespace(NAMESPACE),
        &["kind", "outcome"],
    )
    .expect("Failed to create FORM_SUBMISSIONS_TOTAL metric")
});

/// Review responses by provenance tag
pub static REVIEW_RESPONSES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("review_responses_total", "Review proxy responses by source")
            .namespace(NAMESPACE),
        &["source"],
    )
    .expect("Failed to create REVIEW_RESPONSES_TOTAL metric")
});

/// Place details request latency
pub static UPSTREAM_FETCH_DURATION_SECONDS: Lazy<Histogram> = Lazy::new(|| {
    let buckets = vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    Histogram::with_opts(
        HistogramOpts::new(
            "upstream_fetch_duration_seconds",
            "Place details request latency in seconds",
        )
        .namespace(NAMESPACE)
        .buckets(buckets),
    )
    .expect("Failed to create UPSTREAM_FETCH_DURATION_SECONDS metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("Failed to register HTTP_REQUESTS_TOTAL");
    registry
        .register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))
        .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");
    registry
        .register(Box::new(FORM_SUBMISSIONS_TOTAL.clone()))
        .expect("Failed to register FORM_SUBMISSIONS_TOTAL");
    registry
        .register(Box::new(REVIEW_RESPONSES_TOTAL.clone()))
        .expect("Failed to register REVIEW_RESPONSES_TOTAL");
    registry
        .register(Box::new(UPSTREAM_FETCH_DURATION_SECONDS.clone()))
        .expect("Failed to register UPSTREAM_FETCH_DURATION_SECONDS");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Helper to record HTTP request metrics
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let status = status.to_string();
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, status.as_str()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration_secs);
}

/// Helper to record a form submission outcome
pub fn record_submission(kind: &str, outcome: &str) {
    FORM_SUBMISSIONS_TOTAL
        .with_label_values(&[kind, outcome])
        .inc();
}

/// Helper to record which path served a reviews request
pub fn record_review_response(source: &str) {
    REVIEW_RESPONSES_TOTAL.with_label_values(&[source]).inc();
}

/// Helper to record place details latency
pub fn record_upstream_fetch(duration_secs: f64) {
    UPSTREAM_FETCH_DURATION_SECONDS.observe(duration_secs);
}
