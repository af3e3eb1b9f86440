//! Request DTOs
//!
//! Data structures for API request bodies and query strings.

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

use crate::application::services::ReviewsQuery;
use crate::domain::RawSubmission;

/// Contact or quote form body.
///
/// Every field is optional on the wire. Numbers and booleans are accepted
/// as their string form and `null` counts as empty, so a sloppy client
/// gets a field-level error instead of a parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct SubmissionRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub service: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub message: String,

    /// Honeypot
    #[serde(default, deserialize_with = "lenient_string")]
    pub website: String,
}

impl From<SubmissionRequest> for RawSubmission {
    fn from(req: SubmissionRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            phone: req.phone,
            service: req.service,
            message: req.message,
            website: req.website,
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(de::Error::invalid_type(
            de::Unexpected::Other(if other.is_array() { "array" } else { "object" }),
            &"a string",
        )),
    }
}

/// Query string of the reviews endpoint, kept raw so bad values fall back
/// to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewsParams {
    pub force: Option<String>,
    pub limit: Option<String>,
}

impl From<ReviewsParams> for ReviewsQuery {
    fn from(params: ReviewsParams) -> Self {
        ReviewsQuery::from_params(params.force.as_deref(), params.limit.as_deref())
    }
}
