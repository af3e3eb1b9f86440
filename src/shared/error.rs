//! Application Error Types
//!
//! Centralized error handling with Axum integration.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::SubmissionError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Rate limited")]
    RateLimited,

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl ErrorResponse {
    pub fn new(code: &'static str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

impl AppError {
    /// Status code and stable error code for this error.
    pub fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "rate_limited"),
            AppError::Submission(e) => match e {
                SubmissionError::SpamDetected => (StatusCode::BAD_REQUEST, "spam_detected"),
                SubmissionError::ValidationFailed(_) => {
                    (StatusCode::BAD_REQUEST, "validation_failed")
                }
                SubmissionError::ServerMisconfigured => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "server_misconfigured")
                }
                SubmissionError::DispatchFailed(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "dispatch_failed")
                }
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();

        let message = match &self {
            AppError::BadRequest(msg) => msg.clone(),
            AppError::RateLimited => "Too many requests. Please try again later.".into(),
            AppError::Submission(SubmissionError::ServerMisconfigured) => {
                "Server not configured to send email".into()
            }
            AppError::Submission(SubmissionError::DispatchFailed(_)) => {
                "Failed to send message".into()
            }
            AppError::Submission(e) => e.to_string(),
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}
