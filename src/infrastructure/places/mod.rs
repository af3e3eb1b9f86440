//! Places Provider
//!
//! HTTP client for the third-party reviews source.

mod google_places;

pub use google_places::GooglePlacesClient;
