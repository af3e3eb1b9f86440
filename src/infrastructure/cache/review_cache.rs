//! Review Cache
//!
//! Process-local, single-entry cache for the normalized place reviews.
//!
//! The entry is replaced wholesale on every successful refresh and never
//! partially updated. Concurrent refreshes race and the last writer wins;
//! the data is re-derivable from upstream so no coordination is needed.
//! Not shared between processes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::debug;

use crate::domain::{PlaceSummary, Review, ReviewSet};

/// The cached result of one upstream refresh.
#[derive(Debug, Clone)]
pub struct CachedReviewSet {
    pub fetched_at: Instant,
    pub ttl: Duration,
    pub reviews: Vec<Review>,
    pub meta: PlaceSummary,
}

impl CachedReviewSet {
    pub fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }

    /// An entry is fresh while its age is strictly below its TTL.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.fetched_at) >= self.ttl
    }
}

/// Single-cell review cache, constructed once at startup and injected into
/// the reviews proxy.
#[derive(Debug)]
pub struct ReviewCache {
    ttl: Duration,
    entry: RwLock<Option<Arc<CachedReviewSet>>>,
}

impl ReviewCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The current entry, fresh or not.
    pub fn get(&self) -> Option<Arc<CachedReviewSet>> {
        self.entry.read().clone()
    }

    /// Replace the entry with a newly fetched set, stamped now.
    pub fn set(&self, set: ReviewSet) -> Arc<CachedReviewSet> {
        let entry = Arc::new(CachedReviewSet {
            fetched_at: Instant::now(),
            ttl: self.ttl,
            reviews: set.reviews,
            meta: set.meta,
        });
        *self.entry.write() = Some(Arc::clone(&entry));
        debug!(reviews = entry.reviews.len(), "Review cache refreshed");
        entry
    }

    pub fn is_expired(&self, entry: &CachedReviewSet) -> bool {
        entry.is_expired_at(Instant::now())
    }

    /// The current entry if it has not expired.
    pub fn fresh(&self) -> Option<Arc<CachedReviewSet>> {
        self.get().filter(|entry| !self.is_expired(entry))
    }
}
