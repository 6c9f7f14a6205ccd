//! Trip request model and validation
//!
//! A `TripRequest` is the immutable input to one planning request. It is
//! normalized and validated before any generation work starts; a request that
//! fails validation never reaches the generative backend.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::TripsmithError;

/// Preferred mode of transport between cities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Trains, buses, regional flights
    Public,
    /// Rental car / road trip
    Car,
    /// Whatever fits each leg best
    Mixed,
}

/// Budget tier for lodging and logistics recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Budget,
    Moderate,
    Premium,
}

/// A pre-held event ticket binding the traveler to a city on a date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketHold {
    pub city: String,
    pub date: NaiveDate,
}

/// Caller's itinerary parameters for one planning request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    /// Where the trip starts (home airport / city)
    pub origin: String,
    /// Number of adult travelers
    pub adults: u32,
    /// Number of children
    #[serde(default)]
    pub children: u32,
    /// Number of senior travelers
    #[serde(default)]
    pub seniors: u32,
    /// Whether anyone in the group has reduced mobility
    #[serde(default)]
    pub reduced_mobility: bool,
    /// Destination cities in visiting order
    pub cities: Vec<String>,
    /// Preferred transport between cities
    pub transport: TransportMode,
    /// Budget tier
    pub budget: BudgetTier,
    /// First day of the trip
    pub start_date: NaiveDate,
    /// Last day of the trip
    pub end_date: NaiveDate,
    /// Event tickets already held, if any
    #[serde(default)]
    pub ticket_holds: Vec<TicketHold>,
    /// Free-text context from the caller
    #[serde(default)]
    pub notes: Option<String>,
    /// Language tag for generated content
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_locale() -> String {
    "en".to_string()
}

impl TripRequest {
    /// Total number of travelers
    #[must_use]
    pub fn group_size(&self) -> u32 {
        self.adults + self.children + self.seniors
    }

    /// Number of nights covered by the date range
    #[must_use]
    pub fn nights(&self) -> u32 {
        (self.end_date - self.start_date).num_days().max(0) as u32
    }

    /// Normalize the request in place: trim fields and de-duplicate the city
    /// list case-insensitively, preserving first-occurrence order.
    pub fn normalize(&mut self) {
        self.origin = self.origin.trim().to_string();
        self.locale = self.locale.trim().to_string();

        let mut seen = Vec::new();
        let mut deduped = Vec::new();
        for city in &self.cities {
            let trimmed = city.trim();
            if trimmed.is_empty() {
                continue;
            }
            let key = trimmed.to_lowercase();
            if !seen.contains(&key) {
                seen.push(key);
                deduped.push(trimmed.to_string());
            }
        }
        self.cities = deduped;
    }

    /// Validate the normalized request. Must be called before generation
    /// starts; a failed validation terminates the request with no side
    /// effects.
    pub fn validate(&self) -> crate::Result<()> {
        if self.origin.is_empty() {
            return Err(TripsmithError::validation("Origin cannot be empty"));
        }

        if self.cities.is_empty() {
            return Err(TripsmithError::validation(
                "At least one destination city is required",
            ));
        }

        if self.start_date > self.end_date {
            return Err(TripsmithError::validation(format!(
                "Trip start {} is after trip end {}",
                self.start_date, self.end_date
            )));
        }

        if self.group_size() == 0 {
            return Err(TripsmithError::validation(
                "At least one traveler is required",
            ));
        }

        if self.locale.is_empty() {
            return Err(TripsmithError::validation("Locale cannot be empty"));
        }

        Ok(())
    }
}
