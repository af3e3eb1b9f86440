//! Google Places Client
//!
//! `PlacesClient` backed by the place details endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::PlaceCredentials;
use crate::domain::{FetchError, PlaceDetailsResponse, PlacesClient, PLACE_DETAIL_FIELDS};

/// Fetches place details for a single configured place.
#[derive(Clone)]
pub struct GooglePlacesClient {
    http: Client,
    base_url: String,
    credentials: PlaceCredentials,
}

impl GooglePlacesClient {
    pub fn new(
        base_url: impl Into<String>,
        credentials: PlaceCredentials,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            credentials,
        })
    }
}

#[async_trait]
impl PlacesClient for GooglePlacesClient {
    #[instrument(skip(self), fields(place_id = %self.credentials.place_id))]
    async fn place_details(&self) -> Result<PlaceDetailsResponse, FetchError> {
        let fields = PLACE_DETAIL_FIELDS.join(",");
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("place_id", self.credentials.place_id.as_str()),
                ("fields", fields.as_str()),
                ("key", self.credentials.api_key.as_str()),
            ])
            .send()
            .await
            // Strip the URL: it carries the API key.
            .map_err(|e| FetchError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload = response
            .json::<PlaceDetailsResponse>()
            .await
            .map_err(|e| FetchError::Decode(e.without_url().to_string()))?;

        debug!(status = %payload.status, "Place details received");
        Ok(payload)
    }
}
