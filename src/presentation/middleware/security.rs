//! Security Headers Middleware
//!
//! Adds security headers to every response. The API only ever serves JSON
//! and plain text, so the content policy forbids loading anything at all.

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Request, Response},
};
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tower::{Layer, Service};

use crate::config::SecuritySettings;

/// Security headers configuration
#[derive(Clone, Debug)]
pub struct SecurityHeadersConfig {
    /// Enable HSTS header (should only be true when using HTTPS)
    pub enable_hsts: bool,
    /// HSTS max-age in seconds
    pub hsts_max_age: u64,
    pub content_security_policy: String,
    pub referrer_policy: String,
    pub permissions_policy: String,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            enable_hsts: false,
            hsts_max_age: 31_536_000,
            content_security_policy: "default-src 'none'; frame-ancestors 'none'".to_string(),
            referrer_policy: "strict-origin-when-cross-origin".to_string(),
            permissions_policy: "geolocation=(), microphone=(), camera=()".to_string(),
        }
    }
}

impl SecurityHeadersConfig {
    pub fn from_settings(settings: &SecuritySettings) -> Self {
        Self {
            enable_hsts: settings.enable_hsts,
            ..Default::default()
        }
    }

    /// Resolve the configuration into concrete header pairs. Values that
    /// are not valid header text are skipped.
    fn headers(&self) -> Vec<(HeaderName, HeaderValue)> {
        let mut headers = vec![
            (
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ),
            (header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY")),
        ];

        let hsts = self
            .enable_hsts
            .then(|| format!("max-age={}; includeSubDomains", self.hsts_max_age));

        let configured = [
            (header::STRICT_TRANSPORT_SECURITY, hsts),
            (
                header::CONTENT_SECURITY_POLICY,
                Some(self.content_security_policy.clone()),
            ),
            (header::REFERRER_POLICY, Some(self.referrer_policy.clone())),
            (
                HeaderName::from_static("permissions-policy"),
                Some(self.permissions_policy.clone()),
            ),
        ];

        for (name, value) in configured {
            if let Some(value) = value.and_then(|v| HeaderValue::from_str(&v).ok()) {
                headers.push((name, value));
            }
        }

        headers
    }
}

/// Layer that adds security headers to responses
#[derive(Clone)]
pub struct SecurityHeadersLayer {
    headers: Arc<Vec<(HeaderName, HeaderValue)>>,
}

impl SecurityHeadersLayer {
    pub fn new(config: &SecurityHeadersConfig) -> Self {
        Self {
            headers: Arc::new(config.headers()),
        }
    }
}

impl<S> Layer<S> for SecurityHeadersLayer {
    type Service = SecurityHeadersMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SecurityHeadersMiddleware {
            inner,
            headers: Arc::clone(&self.headers),
        }
    }
}

/// Middleware service that adds security headers
#[derive(Clone)]
pub struct SecurityHeadersMiddleware<S> {
    inner: S,
    headers: Arc<Vec<(HeaderName, HeaderValue)>>,
}

impl<S> Service<Request<Body>> for SecurityHeadersMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let headers = Arc::clone(&self.headers);

        Box::pin(async move {
            let mut response = inner.call(request).await?;
            let target = response.headers_mut();
            for (name, value) in headers.iter() {
                target.insert(name.clone(), value.clone());
            }
            Ok(response)
        })
    }
}

/// Create the security headers layer from settings.
pub fn create_security_headers_layer(settings: &SecuritySettings) -> SecurityHeadersLayer {
    SecurityHeadersLayer::new(&SecurityHeadersConfig::from_settings(settings))
}
