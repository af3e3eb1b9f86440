//! Cache Module
//!
//! In-process caching for data fetched from third parties.
//!
//! # Architecture
//!
//! ```text
//! +-------------------+
//! |  ReviewsProxy     |
//! +-------------------+
//!          |
//!          v
//! +-------------------+
//! |   ReviewCache     |  <-- single entry, TTL-bounded
//! +-------------------+
//!          |
//!          v
//! +-------------------+
//! | RwLock<Option<..>>|  <-- never held across an await
//! +-------------------+
//! ```

mod review_cache;

pub use review_cache::{CachedReviewSet, ReviewCache};
