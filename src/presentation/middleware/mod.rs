//! Middleware
//!
//! Tower middleware for request processing.

pub mod cors;
pub mod metrics;
pub mod rate_limit;
pub mod security;

pub use metrics::track_metrics;
pub use rate_limit::{rate_limit_forms, RateLimitInfo, RateLimiter};
pub use security::{create_security_headers_layer, SecurityHeadersConfig, SecurityHeadersLayer};
