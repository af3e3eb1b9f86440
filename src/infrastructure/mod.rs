//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - SMTP delivery (lettre)
//! - The Google Places client (reqwest)
//! - The in-process review cache
//! - Prometheus metrics

pub mod cache;
pub mod mail;
pub mod metrics;
pub mod places;
