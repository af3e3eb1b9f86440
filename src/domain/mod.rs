//! # Domain Layer
//!
//! The domain layer holds the rules of the site backend: what makes a form
//! submission acceptable and how upstream reviews are normalized.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Pure validation and normalization
//! - Traits define the contracts for outbound mail and the places provider

pub mod entities;

// Re-export commonly used types
pub use entities::*;
