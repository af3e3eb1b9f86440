//! # Domain Entities
//!
//! Core objects handled by the site backend.
//!
//! - **Submission**: a contact or quote form submission, plus the
//!   `MailTransport` contract used to relay it
//! - **Review**: a normalized place review, plus the `PlacesClient`
//!   contract used to fetch reviews upstream
//!
//! Contracts are implemented in the infrastructure layer, following the
//! dependency inversion principle.

mod review;
mod submission;

pub use review::{
    FetchError, PlaceDetailsResponse, PlaceResult, PlaceSummary, PlacesClient, RawReview, Review,
    ReviewSet, MAX_STORED_REVIEWS, PLACE_DETAIL_FIELDS,
};
pub use submission::{
    validate_submission, FieldViolation, MailError, MailTransport, OutgoingMail, RawSubmission,
    Submission, SubmissionError, SubmissionKind, MAX_MESSAGE_CHARS,
};

#[cfg(test)]
pub use review::MockPlacesClient;
#[cfg(test)]
pub use submission::MockMailTransport;
