//! Reviews Proxy
//!
//! Read-through cache in front of the places provider. Every path, including
//! failures, resolves to a [`ReviewsOutcome`] tagged with where its data came
//! from, so the testimonial UI can fall back without treating anything as
//! fatal.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, error, instrument, warn};

use crate::domain::{FetchError, PlaceSummary, PlacesClient, Review, ReviewSet, MAX_STORED_REVIEWS};
use crate::infrastructure::cache::ReviewCache;
use crate::infrastructure::metrics;

/// Reviews returned when the caller does not ask for a count.
pub const DEFAULT_LIMIT: usize = 6;

/// Longest upstream diagnostic passed back to callers.
pub const MAX_DETAILS_CHARS: usize = 1000;

/// Parsed request options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewsQuery {
    /// Bypass the cache read; the refreshed entry still obeys the TTL.
    pub force: bool,
    /// Number of reviews to return, 1 to 12
    pub limit: usize,
}

impl Default for ReviewsQuery {
    fn default() -> Self {
        Self {
            force: false,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ReviewsQuery {
    /// Interpret raw query parameters.
    ///
    /// `force` is set by `1` or `true`. `limit` accepts any positive finite
    /// number, floored and capped at 12; anything else means the default.
    pub fn from_params(force: Option<&str>, limit: Option<&str>) -> Self {
        let force = matches!(force.map(str::trim), Some("1") | Some("true"));

        let limit = limit
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|n| n.is_finite() && *n > 0.0)
            .map(|n| (n.floor() as usize).clamp(1, MAX_STORED_REVIEWS))
            .unwrap_or(DEFAULT_LIMIT);

        Self { force, limit }
    }
}

/// Where the reviews in a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSource {
    /// Served from a fresh cache entry
    Cache,
    /// Fetched from upstream during this request
    Google,
    /// API key or place id not configured
    Disabled,
    /// Upstream unreachable or answered with a non-success HTTP status
    GoogleFetchError,
    /// Upstream answered but reported a non-OK application status
    GoogleApiError,
    /// Anything else
    ServerError,
}

impl ReviewSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Google => "google",
            Self::Disabled => "disabled",
            Self::GoogleFetchError => "google_fetch_error",
            Self::GoogleApiError => "google_api_error",
            Self::ServerError => "server_error",
        }
    }

    /// True when the response carries real review data.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Cache | Self::Google)
    }
}

/// Result of one reviews request.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewsOutcome {
    pub source: ReviewSource,
    pub reviews: Vec<Review>,
    pub meta: Option<PlaceSummary>,
    pub message: Option<String>,
    pub details: Option<String>,
    /// Upstream HTTP status, for transport failures
    pub upstream_status: Option<u16>,
    /// Upstream application status, for API failures
    pub google_status: Option<String>,
}

impl ReviewsOutcome {
    fn served(source: ReviewSource, reviews: &[Review], meta: &PlaceSummary, limit: usize) -> Self {
        Self {
            source,
            reviews: reviews.iter().take(limit).cloned().collect(),
            meta: Some(meta.clone()),
            message: None,
            details: None,
            upstream_status: None,
            google_status: None,
        }
    }

    fn failed(source: ReviewSource, message: impl Into<String>) -> Self {
        Self {
            source,
            reviews: Vec::new(),
            meta: None,
            message: Some(message.into()),
            details: None,
            upstream_status: None,
            google_status: None,
        }
    }

    pub fn ok(&self) -> bool {
        self.source.is_ok()
    }
}

/// Cap a diagnostic string, marking the cut with `...`.
pub fn truncate_details(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    match text.char_indices().nth(MAX_DETAILS_CHARS) {
        Some((cut, _)) => Some(format!("{}...", &text[..cut])),
        None => Some(text.to_owned()),
    }
}

/// Serves place reviews from cache or upstream.
pub struct ReviewsProxy {
    client: Option<Arc<dyn PlacesClient>>,
    cache: Arc<ReviewCache>,
}

impl ReviewsProxy {
    /// `client` is `None` when the API key or place id is missing, which
    /// puts the proxy in the `disabled` state.
    pub fn new(client: Option<Arc<dyn PlacesClient>>, cache: Arc<ReviewCache>) -> Self {
        Self { client, cache }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    pub fn cache(&self) -> &ReviewCache {
        &self.cache
    }

    #[instrument(skip(self), fields(force = query.force, limit = query.limit))]
    pub async fn fetch(&self, query: ReviewsQuery) -> ReviewsOutcome {
        let Some(client) = &self.client else {
            debug!("Reviews proxy disabled");
            return ReviewsOutcome::failed(
                ReviewSource::Disabled,
                "GOOGLE_MAPS_API_KEY or GOOGLE_PLACE_ID is not configured on the server.",
            );
        };

        if !query.force {
            if let Some(entry) = self.cache.fresh() {
                debug!(age_ms = entry.age().as_millis() as u64, "Serving reviews from cache");
                return ReviewsOutcome::served(
                    ReviewSource::Cache,
                    &entry.reviews,
                    &entry.meta,
                    query.limit,
                );
            }
        }

        let started = Instant::now();
        let fetched = client.place_details().await;
        metrics::record_upstream_fetch(started.elapsed().as_secs_f64());

        let payload = match fetched {
            Ok(payload) => payload,
            Err(FetchError::Status { status, body }) => {
                warn!(status, "Place details request failed");
                return ReviewsOutcome {
                    upstream_status: Some(status),
                    details: truncate_details(&body),
                    ..ReviewsOutcome::failed(
                        ReviewSource::GoogleFetchError,
                        "Failed to fetch Google Places",
                    )
                };
            }
            Err(FetchError::Transport(reason)) => {
                warn!(error = %reason, "Place details request failed");
                return ReviewsOutcome {
                    details: truncate_details(&reason),
                    ..ReviewsOutcome::failed(
                        ReviewSource::GoogleFetchError,
                        "Failed to fetch Google Places",
                    )
                };
            }
            Err(e @ FetchError::Decode(_)) => {
                error!(error = %e, "Error fetching Google reviews");
                return ReviewsOutcome {
                    details: truncate_details(&e.to_string()),
                    ..ReviewsOutcome::failed(
                        ReviewSource::ServerError,
                        "Internal server error while fetching Google reviews",
                    )
                };
            }
        };

        if !payload.is_ok() {
            warn!(
                google_status = %payload.status,
                error_message = payload.error_message.as_deref().unwrap_or(""),
                "Places API returned a non-OK status"
            );
            return ReviewsOutcome {
                google_status: Some(payload.status),
                ..ReviewsOutcome::failed(
                    ReviewSource::GoogleApiError,
                    payload
                        .error_message
                        .unwrap_or_else(|| "Google Places API returned a non-OK status".into()),
                )
            };
        }

        let Some(result) = payload.result else {
            error!("Places API answered OK without a result");
            return ReviewsOutcome::failed(
                ReviewSource::ServerError,
                "Internal server error while fetching Google reviews",
            );
        };

        let entry = self.cache.set(ReviewSet::from(result));

        ReviewsOutcome::served(ReviewSource::Google, &entry.reviews, &entry.meta, query.limit)
    }
}
