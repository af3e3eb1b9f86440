//! Place review entity and the upstream places contract.
//!
//! Raw types mirror the Google Places "place details" payload; `Review`
//! and `PlaceSummary` are the normalized shapes served to the site.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Most reviews kept from a single upstream response.
pub const MAX_STORED_REVIEWS: usize = 12;

/// Fields requested from the place details endpoint.
pub const PLACE_DETAIL_FIELDS: &[&str] = &["name", "rating", "user_ratings_total", "reviews", "url"];

/// A review as served to the testimonial components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub author_name: String,
    pub author_url: Option<String>,
    /// Star rating, 0 to 5
    pub rating: Option<u8>,
    /// Unix seconds
    pub time: Option<i64>,
    pub text: String,
    pub relative_time_description: String,
    pub profile_photo_url: Option<String>,
}

impl From<RawReview> for Review {
    fn from(raw: RawReview) -> Self {
        Self {
            author_name: non_blank(raw.author_name).unwrap_or_else(|| "Anonymous".into()),
            author_url: non_blank(raw.author_url),
            rating: raw
                .rating
                .filter(|r| r.is_finite())
                .map(|r| r.round().clamp(0.0, 5.0) as u8),
            time: raw.time.filter(|t| *t != 0),
            text: raw.text.unwrap_or_default(),
            relative_time_description: raw.relative_time_description.unwrap_or_default(),
            profile_photo_url: non_blank(raw.profile_photo_url),
        }
    }
}

/// Summary metadata for the reviewed place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceSummary {
    pub name: Option<String>,
    pub rating: Option<f64>,
    pub total_ratings: Option<u64>,
    pub url: Option<String>,
}

/// The normalized result of one successful upstream fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewSet {
    pub reviews: Vec<Review>,
    pub meta: PlaceSummary,
}

impl From<PlaceResult> for ReviewSet {
    fn from(result: PlaceResult) -> Self {
        let reviews = result
            .reviews
            .unwrap_or_default()
            .into_iter()
            .take(MAX_STORED_REVIEWS)
            .map(Review::from)
            .collect();

        Self {
            reviews,
            meta: PlaceSummary {
                name: non_blank(result.name),
                rating: result.rating.filter(|r| *r != 0.0),
                total_ratings: result.user_ratings_total.filter(|n| *n != 0),
                url: non_blank(result.url),
            },
        }
    }
}

/// Top-level place details payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceDetailsResponse {
    #[serde(default)]
    pub status: String,
    pub error_message: Option<String>,
    pub result: Option<PlaceResult>,
}

impl PlaceDetailsResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceResult {
    pub name: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u64>,
    pub url: Option<String>,
    pub reviews: Option<Vec<RawReview>>,
}

/// One upstream review. A field of the wrong type reads as absent instead
/// of failing the whole payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReview {
    #[serde(default, deserialize_with = "lenient_text")]
    pub author_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub author_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub time: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub relative_time_description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub profile_photo_url: Option<String>,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_f64())
}

/// Unix seconds; fractional values are truncated.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|t| t.is_finite() && t.abs() < i64::MAX as f64)
            .map(|t| t.trunc() as i64)
    }))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Failures talking to the places provider.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The provider answered with a non-success HTTP status.
    #[error("Upstream responded with HTTP {status}")]
    Status { status: u16, body: String },

    /// The request never produced a response (connect, TLS, timeout).
    #[error("Upstream request failed: {0}")]
    Transport(String),

    /// A response arrived but could not be understood.
    #[error("Invalid upstream payload: {0}")]
    Decode(String),
}

/// Source of place details.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlacesClient: Send + Sync {
    /// Fetch name, rating, rating count, reviews and URL for the place.
    async fn place_details(&self) -> Result<PlaceDetailsResponse, FetchError>;
}
