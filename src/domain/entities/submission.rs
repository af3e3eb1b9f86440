//! Form submission entity and the outbound mail contract.
//!
//! A submission lives for exactly one request: it is validated, turned
//! into a notification mail and handed to a [`MailTransport`]. Nothing is
//! stored.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::shared::validation::field_violation;

/// Upper bound on the message body, in characters.
pub const MAX_MESSAGE_CHARS: usize = 5000;

/// `local@domain.tld` shape; deliverability is the relay's problem.
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// Digits, spaces, `+`, `-` and parentheses, 6 to 20 characters.
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9+\- ()]{6,20}$").expect("valid phone pattern"));

/// Which site form produced the submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionKind {
    Contact,
    Quote,
}

impl SubmissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Quote => "quote",
        }
    }

    /// Acknowledgement shown to the visitor after a successful send.
    pub fn acknowledgement(&self) -> &'static str {
        match self {
            Self::Contact => "Message sent successfully",
            Self::Quote => "Your request has been sent. We will contact you soon.",
        }
    }
}

impl std::fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Form fields exactly as received, before trimming or validation.
#[derive(Debug, Clone, Default)]
pub struct RawSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub message: String,
    /// Honeypot; hidden from humans
    pub website: String,
}

/// A submission that passed validation. All fields are trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct Submission {
    pub name: String,

    #[validate(regex(path = *EMAIL_PATTERN, message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(regex(path = *PHONE_PATTERN, message = "Invalid phone number"))]
    pub phone: String,

    pub service: String,

    #[validate(length(max = 5000, message = "Message too long"))]
    pub message: String,
}

/// A single field-level rule that a submission broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FieldViolation {
    #[error("Missing required fields")]
    MissingRequired,

    #[error("Message too long")]
    MessageTooLong,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Invalid phone number")]
    InvalidPhone,
}

/// Why a submission did not result in a sent mail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("Spam detected")]
    SpamDetected,

    #[error("{0}")]
    ValidationFailed(#[from] FieldViolation),

    #[error("Mail relay is not configured")]
    ServerMisconfigured,

    #[error("Mail dispatch failed: {0}")]
    DispatchFailed(String),
}

/// Check a raw submission.
///
/// Rules apply in order: honeypot, required fields, message length,
/// email shape, phone shape. The first broken rule wins.
pub fn validate_submission(raw: RawSubmission) -> Result<Submission, SubmissionError> {
    if !raw.website.trim().is_empty() {
        return Err(SubmissionError::SpamDetected);
    }

    let email = raw.email.trim();
    let submission = Submission {
        name: raw.name.trim().to_owned(),
        email: (!email.is_empty()).then(|| email.to_owned()),
        phone: raw.phone.trim().to_owned(),
        service: raw.service.trim().to_owned(),
        message: raw.message.trim().to_owned(),
    };

    let required = [
        &submission.name,
        &submission.phone,
        &submission.service,
        &submission.message,
    ];
    if required.iter().any(|field| field.is_empty()) {
        return Err(FieldViolation::MissingRequired.into());
    }

    submission
        .validate()
        .map_err(|errors| SubmissionError::ValidationFailed(field_violation(&errors)))?;

    Ok(submission)
}

/// A fully rendered notification ready for a relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Failures reported by a [`MailTransport`].
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Invalid mailbox {0}")]
    InvalidAddress(String),

    #[error("Could not build message: {0}")]
    Build(String),

    #[error("Relay rejected message: {0}")]
    Transport(String),
}

/// Outbound mail relay.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Make a single delivery attempt.
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}
