//! Validation Utilities

use validator::ValidationErrors;

use crate::domain::FieldViolation;

/// Reduce `validator` errors on a submission to the single violation
/// reported to the visitor.
///
/// Message length is checked before email, email before phone.
pub fn field_violation(errors: &ValidationErrors) -> FieldViolation {
    let fields = errors.field_errors();

    if fields.contains_key("message") {
        FieldViolation::MessageTooLong
    } else if fields.contains_key("email") {
        FieldViolation::InvalidEmail
    } else if fields.contains_key("phone") {
        FieldViolation::InvalidPhone
    } else {
        tracing::warn!(?errors, "Unmapped validation failure");
        FieldViolation::MissingRequired
    }
}
