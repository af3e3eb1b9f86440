//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **MailDispatcher**: Validates contact and quote submissions and relays them as mail
//! - **ReviewsProxy**: Serves place reviews through a TTL cache

pub mod mail_service;
pub mod mail_template;
pub mod reviews_service;

// Re-export mail service types
pub use mail_service::{MailDispatcher, MailRelay};
pub use mail_template::{escape_html, render, RenderedMail};

// Re-export reviews service types
pub use reviews_service::{
    truncate_details, ReviewSource, ReviewsOutcome, ReviewsProxy, ReviewsQuery, DEFAULT_LIMIT,
    MAX_DETAILS_CHARS,
};
