//! Response DTOs
//!
//! Data structures for API response bodies.

use serde::Serialize;

use crate::application::services::{ReviewSource, ReviewsOutcome};
use crate::domain::{PlaceSummary, Review};

/// Acknowledgement for an accepted form submission.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Reviews endpoint body, for success and failure alike.
#[derive(Debug, Serialize)]
pub struct ReviewsResponse {
    pub ok: bool,
    pub source: ReviewSource,
    pub reviews: Vec<Review>,
    pub meta: Option<PlaceSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Upstream HTTP status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_status: Option<String>,
}

impl From<ReviewsOutcome> for ReviewsResponse {
    fn from(outcome: ReviewsOutcome) -> Self {
        Self {
            ok: outcome.ok(),
            source: outcome.source,
            reviews: outcome.reviews,
            meta: outcome.meta,
            message: outcome.message,
            details: outcome.details,
            status: outcome.upstream_status,
            google_status: outcome.google_status,
        }
    }
}
