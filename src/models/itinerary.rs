//! Itinerary aggregate, generated plan payloads, and the progress protocol
//!
//! The plan payload types (`RoutePlan`, `CityPlan`) define the one schema
//! both the generative backend and the fallback synthesizer must produce.
//! A consumer cannot distinguish the source from the shape alone; provenance
//! is carried separately in [`GenerationSource`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::trip::TripRequest;

/// Where a generation unit's payload came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationSource {
    /// Parsed from generative backend output
    Backend,
    /// Synthesized deterministically from the trip request
    Fallback,
}

/// One transport leg between two places
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub from: String,
    pub to: String,
    /// Transport mode for this leg (e.g. "train", "flight", "car")
    pub mode: String,
    /// Rough duration, human readable (e.g. "about 4 hours")
    pub duration_hint: String,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// One labeled routing alternative covering the whole trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteOption {
    /// Label such as "smartest", "budget", "fastest"
    pub label: String,
    pub legs: Vec<RouteLeg>,
    #[serde(default)]
    pub connection_tips: Vec<String>,
    #[serde(default)]
    pub traveler_tips: Vec<String>,
}

/// Inter-city routing payload: the fixed schema for the routing generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePlan {
    pub options: Vec<RouteOption>,
}

/// One lodging recommendation within a city
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LodgingOption {
    /// Neighborhood / zone name
    pub zone: String,
    /// Geographic area label
    #[serde(default)]
    pub area: String,
    /// Why this zone fits the request
    pub reason: String,
    #[serde(default)]
    pub price_range: Option<String>,
}

/// Per-destination payload: the fixed schema for the city generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityPlan {
    pub city: String,
    pub overview: String,
    pub lodging: Vec<LodgingOption>,
    #[serde(default)]
    pub getting_around: Vec<String>,
    #[serde(default)]
    pub daily_tips: Vec<String>,
    #[serde(default)]
    pub watchouts: Vec<String>,
}

/// Routing output tagged with its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingResult {
    pub source: GenerationSource,
    pub plan: RoutePlan,
}

/// Per-city output tagged with the city it answers and its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityResult {
    pub city: String,
    pub source: GenerationSource,
    pub plan: CityPlan,
}

/// One move between consecutive stops
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityMove {
    pub from: String,
    pub to: String,
}

/// Derived trip summary fields computed at aggregation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripSummary {
    pub origin: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub nights: u32,
    pub adults: u32,
    pub children: u32,
    pub seniors: u32,
    /// Even division of nights across cities; the remainder is absorbed by
    /// the integer floor
    pub nights_per_city: u32,
    pub moves: Vec<CityMove>,
}

impl TripSummary {
    /// Compute the summary for a validated request
    #[must_use]
    pub fn for_request(request: &TripRequest) -> Self {
        let nights = request.nights();
        let nights_per_city = if request.cities.is_empty() {
            0
        } else {
            nights / request.cities.len() as u32
        };

        let mut moves = Vec::new();
        let mut previous = request.origin.as_str();
        for city in &request.cities {
            moves.push(CityMove {
                from: previous.to_string(),
                to: city.clone(),
            });
            previous = city;
        }

        Self {
            origin: request.origin.clone(),
            start_date: request.start_date,
            end_date: request.end_date,
            nights,
            adults: request.adults,
            children: request.children,
            seniors: request.seniors,
            nights_per_city,
            moves,
        }
    }
}

/// The assembled itinerary: one routing result plus exactly one per-city
/// result per requested city, in request order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub id: String,
    pub owner: String,
    pub title: String,
    pub summary: TripSummary,
    pub routing: RoutingResult,
    pub cities: Vec<CityResult>,
    pub created_at: DateTime<Utc>,
}

/// One unit of the caller-facing streaming protocol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProgressEvent {
    /// Pipeline milestone; percent is monotonically non-decreasing within a
    /// request
    Progress { message: String, percent: u8 },
    /// Terminal success; the itinerary is already persisted when this is
    /// emitted
    Complete { itinerary: Itinerary },
    /// Terminal failure
    Error { message: String },
}
