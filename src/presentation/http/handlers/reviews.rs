//! Reviews Handler
//!
//! `GET /api/google-review?force=1&limit=6`

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::application::dto::{ReviewsParams, ReviewsResponse};
use crate::application::services::{ReviewSource, ReviewsQuery};
use crate::infrastructure::metrics;
use crate::startup::AppState;

/// Serve place reviews with their provenance.
///
/// An unparseable query string is treated like an empty one.
pub async fn google_reviews(
    State(state): State<AppState>,
    params: Result<Query<ReviewsParams>, QueryRejection>,
) -> Response {
    let query = params
        .map(|Query(params)| ReviewsQuery::from(params))
        .unwrap_or_default();

    let outcome = state.reviews.fetch(query).await;
    metrics::record_review_response(outcome.source.as_str());

    let status = status_for(outcome.source);
    let cache_control = if outcome.ok() {
        format!(
            "public, s-maxage={}, stale-while-revalidate=600",
            state.reviews.cache().ttl().as_secs()
        )
    } else {
        "no-store".to_owned()
    };

    let mut response = (status, Json(ReviewsResponse::from(outcome))).into_response();
    if let Ok(value) = HeaderValue::from_str(&cache_control) {
        response.headers_mut().insert(header::CACHE_CONTROL, value);
    }
    response
}

fn status_for(source: ReviewSource) -> StatusCode {
    match source {
        ReviewSource::Cache | ReviewSource::Google | ReviewSource::Disabled => StatusCode::OK,
        ReviewSource::GoogleFetchError | ReviewSource::GoogleApiError => StatusCode::BAD_GATEWAY,
        ReviewSource::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
