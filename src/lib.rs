//! `Tripsmith` - travel content platform with an AI-assisted itinerary pipeline
//!
//! This library provides the itinerary generation pipeline: knowledge
//! extraction from reference documents, concurrent per-city generation with
//! a deterministic fallback, progress streaming, and durable persistence.

pub mod api;
pub mod config;
pub mod error;
pub mod generation;
pub mod knowledge;
pub mod models;
pub mod pipeline;
pub mod store;
pub mod venues;
pub mod web;

// Re-export core types for public API
pub use config::TripsmithConfig;
pub use error::TripsmithError;
pub use generation::{GenerativeBackend, HttpGenerativeBackend};
pub use knowledge::ReferenceLibrary;
pub use models::{Itinerary, ProgressEvent, TripRequest};
pub use pipeline::ItineraryPipeline;
pub use store::ItineraryStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TripsmithError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
