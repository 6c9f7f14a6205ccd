//! Prompt context rendering
//!
//! Purely a formatting layer: serializes trip parameters, venue facts, and
//! extracted knowledge into text blocks for inclusion in generation prompts.
//! Empty input produces empty output; there are no other failure modes.

use std::fmt::Write;

use crate::knowledge::CityKnowledge;
use crate::models::{TransportMode, TripRequest};
use crate::venues::CityFacts;

/// Render the shared trip parameters as a prompt block
#[must_use]
pub fn trip_context(request: &TripRequest) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Origin: {}", request.origin);
    let _ = writeln!(out, "Cities in visiting order: {}", request.cities.join(", "));
    let _ = writeln!(
        out,
        "Dates: {} to {} ({} nights)",
        request.start_date,
        request.end_date,
        request.nights()
    );
    let _ = writeln!(
        out,
        "Travelers: {} adults, {} children, {} seniors{}",
        request.adults,
        request.children,
        request.seniors,
        if request.reduced_mobility {
            ", reduced mobility"
        } else {
            ""
        }
    );
    let _ = writeln!(out, "Transport preference: {}", transport_label(request.transport));
    let _ = writeln!(out, "Budget tier: {:?}", request.budget);

    if !request.ticket_holds.is_empty() {
        let holds: Vec<String> = request
            .ticket_holds
            .iter()
            .map(|hold| format!("{} on {}", hold.city, hold.date))
            .collect();
        let _ = writeln!(out, "Already-held tickets: {}", holds.join("; "));
    }
    if let Some(notes) = request.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        let _ = writeln!(out, "Traveler notes: {}", notes.trim());
    }
    let _ = writeln!(out, "Answer language: {}", request.locale);

    out
}

/// Render one city's venue facts and extracted knowledge as a prompt block
#[must_use]
pub fn city_context(city: &str, facts: Option<&CityFacts>, knowledge: &CityKnowledge) -> String {
    let mut out = String::new();

    if let Some(facts) = facts {
        let _ = writeln!(out, "Venue facts for {city}:");
        let _ = writeln!(out, "- Stadium: {} ({})", facts.venue, facts.metro_area);
        let _ = writeln!(out, "- Airports: {}", facts.airports);
        let _ = writeln!(out, "- Transit: {}", facts.transit_hint);
    }

    if !knowledge.highlights.is_empty() {
        let _ = writeln!(out, "\nCity overview:");
        for paragraph in &knowledge.highlights {
            let _ = writeln!(out, "{paragraph}");
        }
    }

    if !knowledge.zones.is_empty() {
        let _ = writeln!(out, "\nLodging zones from our research:");
        for zone in &knowledge.zones {
            let _ = write!(out, "- {}", zone.name);
            if let Some(descriptor) = &zone.descriptor {
                let _ = write!(out, " ({descriptor})");
            }
            if !zone.area.is_empty() {
                let _ = write!(out, ", area: {}", zone.area);
            }
            if let Some(price) = &zone.price_range {
                let _ = write!(out, ", price: {price}");
            }
            let _ = writeln!(out);
            if !zone.summary.is_empty() {
                let _ = writeln!(out, "  {}", zone.summary);
            }
            if !zone.advantages.is_empty() {
                let _ = writeln!(out, "  Pros: {}", zone.advantages.join("; "));
            }
            if !zone.disadvantages.is_empty() {
                let _ = writeln!(out, "  Cons: {}", zone.disadvantages.join("; "));
            }
            if !zone.ratings.is_empty() {
                let pairs: Vec<String> = zone
                    .ratings
                    .iter()
                    .map(|(key, value)| format!("{key} {value}"))
                    .collect();
                let _ = writeln!(out, "  Ratings: {}", pairs.join(", "));
            }
        }
    }

    if !knowledge.pain_points.is_empty() {
        let _ = writeln!(out, "\nKnown pain points:");
        for point in &knowledge.pain_points {
            let _ = writeln!(out, "- {point}");
        }
    }

    if !knowledge.tables.is_empty() {
        let _ = writeln!(out, "\nReference tables:");
        for table in &knowledge.tables {
            let _ = writeln!(out, "{table}\n");
        }
    }

    out
}

fn transport_label(mode: TransportMode) -> &'static str {
    match mode {
        TransportMode::Public => "public transport (trains, buses, regional flights)",
        TransportMode::Car => "rental car",
        TransportMode::Mixed => "whatever fits each leg best",
    }
}
