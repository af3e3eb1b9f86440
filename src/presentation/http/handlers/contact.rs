//! Form Submission Handlers
//!
//! `POST /api/contact` and `POST /api/quote`. Both take the same body and
//! differ only in the notification they produce.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::debug;

use crate::application::dto::{MessageResponse, SubmissionRequest};
use crate::domain::SubmissionKind;
use crate::infrastructure::metrics;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Contact form submission
pub async fn contact(
    State(state): State<AppState>,
    payload: Result<Json<SubmissionRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    submit(&state, SubmissionKind::Contact, payload).await
}

/// Quote request submission
pub async fn quote(
    State(state): State<AppState>,
    payload: Result<Json<SubmissionRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    submit(&state, SubmissionKind::Quote, payload).await
}

async fn submit(
    state: &AppState,
    kind: SubmissionKind,
    payload: Result<Json<SubmissionRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(body) = payload.map_err(|rejection| {
        debug!(kind = %kind, error = %rejection.body_text(), "Unreadable submission body");
        metrics::record_submission(kind.as_str(), "invalid_body");
        AppError::BadRequest("Invalid request body".into())
    })?;

    match state.mail.dispatch(kind, body.into()).await {
        Ok(acknowledgement) => {
            metrics::record_submission(kind.as_str(), "sent");
            Ok(Json(MessageResponse::new(acknowledgement)))
        }
        Err(e) => {
            let error = AppError::from(e);
            metrics::record_submission(kind.as_str(), error.classify().1);
            Err(error)
        }
    }
}
