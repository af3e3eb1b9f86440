//! # Steelworks API Library
//!
//! Backend for the RN All Steel fabrication website:
//! - Contact and quote forms relayed to the business inbox over SMTP
//! - A cached proxy in front of the Google Places reviews API
//!
//! Nothing is persisted. The only state is the in-memory review cache and
//! the per-client rate limit windows.
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Submission and review entities, transport traits
//! - **Application Layer**: Mail dispatcher, reviews proxy and DTOs
//! - **Infrastructure Layer**: SMTP, Google Places, cache and metrics
//! - **Presentation Layer**: HTTP handlers and middleware
//!
//! ## Module Structure
//!
//! ```text
//! steelworks_api/
//! +-- config/         Configuration management
//! +-- domain/         Entities and outbound contracts
//! +-- application/    Application services and DTOs
//! +-- infrastructure/ SMTP, places client, cache, metrics
//! +-- presentation/   HTTP routes and middleware
//! +-- shared/         Common utilities (errors, validation)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
