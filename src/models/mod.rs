//! Data models for the Tripsmith application
//!
//! This module contains the core domain models organized by concern:
//! - Trip: caller-supplied planning parameters and their validation
//! - Itinerary: generated plan payloads, the aggregate record, progress events

pub mod itinerary;
pub mod trip;

// Re-export all public types for convenient access
pub use itinerary::{
    CityMove, CityPlan, CityResult, GenerationSource, Itinerary, LodgingOption, ProgressEvent,
    RouteLeg, RouteOption, RoutePlan, RoutingResult, TripSummary,
};
pub use trip::{BudgetTier, TicketHold, TransportMode, TripRequest};
