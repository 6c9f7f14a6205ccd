//! Deterministic fallback synthesis
//!
//! Produces schema-valid plan payloads from the trip request alone, with no
//! call to the generative backend and no randomness: the same input always
//! yields byte-identical output. Used whenever a backend call fails, times
//! out, or returns output that does not validate.

use crate::models::{
    BudgetTier, CityPlan, LodgingOption, RouteLeg, RouteOption, RoutePlan, TransportMode,
    TripRequest,
};
use crate::venues::{self, CityFacts};

/// Synthesize the three labeled routing alternatives from the ordered city
/// list and the origin
#[must_use]
pub fn routing_fallback(request: &TripRequest) -> RoutePlan {
    RoutePlan {
        options: vec![
            smartest_option(request),
            budget_option(request),
            fastest_option(request),
        ],
    }
}

fn stops(request: &TripRequest) -> Vec<String> {
    let mut stops = vec![request.origin.clone()];
    stops.extend(request.cities.iter().cloned());
    stops
}

fn smartest_option(request: &TripRequest) -> RouteOption {
    let stops = stops(request);
    let legs = stops
        .windows(2)
        .map(|pair| RouteLeg {
            from: pair[0].clone(),
            to: pair[1].clone(),
            mode: preferred_mode(request.transport),
            duration_hint: "half a day door to door".to_string(),
            notes: vec![format!(
                "Book {} to {} as early as you can; event weeks sell out",
                pair[0], pair[1]
            )],
        })
        .collect();

    RouteOption {
        label: "smartest".to_string(),
        legs,
        connection_tips: connection_tips(request),
        traveler_tips: traveler_tips(request),
    }
}

fn budget_option(request: &TripRequest) -> RouteOption {
    let stops = stops(request);
    let legs = stops
        .windows(2)
        .map(|pair| RouteLeg {
            from: pair[0].clone(),
            to: pair[1].clone(),
            mode: "intercity bus or economy rail".to_string(),
            duration_hint: "the slow option, often overnight".to_string(),
            notes: vec![
                "Compare bus and rail fares two weeks out; midweek departures run cheaper"
                    .to_string(),
            ],
        })
        .collect();

    RouteOption {
        label: "budget".to_string(),
        legs,
        connection_tips: vec![
            "Overnight legs save a hotel night on long hops".to_string(),
            format!(
                "A {}-person group can split a rideshare for the last miles",
                request.group_size()
            ),
        ],
        traveler_tips: traveler_tips(request),
    }
}

fn fastest_option(request: &TripRequest) -> RouteOption {
    let stops = stops(request);
    let legs = stops
        .windows(2)
        .map(|pair| RouteLeg {
            from: pair[0].clone(),
            to: pair[1].clone(),
            mode: "direct flight".to_string(),
            duration_hint: "a morning including airport time".to_string(),
            notes: vec![format!("Fly {} to {} nonstop where available", pair[0], pair[1])],
        })
        .collect();

    RouteOption {
        label: "fastest".to_string(),
        legs,
        connection_tips: vec![
            "Carry-on only keeps same-day connections realistic".to_string(),
        ],
        traveler_tips: traveler_tips(request),
    }
}

fn connection_tips(request: &TripRequest) -> Vec<String> {
    let mut tips = Vec::new();
    if let Some(first) = request.cities.first() {
        tips.push(format!(
            "Plan the {} to {} leg first; the rest of the chain follows from it",
            request.origin, first
        ));
    }
    if let Some(second) = request.cities.get(1) {
        tips.push(format!(
            "Treat {second} as the pivot stop when comparing open-jaw fares"
        ));
    }
    tips
}

fn traveler_tips(request: &TripRequest) -> Vec<String> {
    let mut tips = vec![format!(
        "Reserve seats together for your group of {}",
        request.group_size()
    )];
    if request.children > 0 {
        tips.push("Pack day bags so kids can board without opening luggage".to_string());
    }
    if request.reduced_mobility {
        tips.push(
            "Request mobility assistance at booking time, not at the gate".to_string(),
        );
    }
    tips
}

/// Synthesize a schema-valid per-city plan from the request and the city's
/// static facts
#[must_use]
pub fn city_fallback(request: &TripRequest, city: &str, facts: Option<&CityFacts>) -> CityPlan {
    let venue_line = match facts {
        Some(facts) => format!(
            "Matches are played at {} in {}.",
            facts.venue, facts.metro_area
        ),
        None => "Check the local event schedule for venue logistics.".to_string(),
    };

    let lodging = vec![
        LodgingOption {
            zone: format!("Central {city}"),
            area: "city center".to_string(),
            reason: format!(
                "Walkable base with the widest {} options for {} nights",
                budget_label(request.budget),
                request.nights().max(1)
            ),
            price_range: None,
        },
        LodgingOption {
            zone: match facts {
                Some(facts) => format!("Near {}", facts.venue),
                None => format!("{city} venue district"),
            },
            area: "venue district".to_string(),
            reason: "Shortest match-day commute at the cost of evening options".to_string(),
            price_range: None,
        },
    ];

    let mut getting_around = Vec::new();
    if let Some(facts) = facts {
        getting_around.push(facts.transit_hint.to_string());
        getting_around.push(format!("Arrive via {}", facts.airports));
    }
    getting_around.push(match request.transport {
        TransportMode::Car => format!("Reserve parking in {city} ahead of match days"),
        _ => format!("Buy a multi-day transit pass on arrival in {city}"),
    });

    let mut daily_tips = vec![format!(
        "Block out match day fully; plan sightseeing in {city} for the other days"
    )];
    if request.children > 0 {
        daily_tips.push("Keep one low-key morning per day for the kids".to_string());
    }

    let mut watchouts = vec![
        "Event-week prices rise as dates approach; book refundable early".to_string(),
    ];
    if request.reduced_mobility {
        watchouts.push(
            "Confirm step-free access for lodging and the stadium route".to_string(),
        );
    }

    CityPlan {
        city: city.to_string(),
        overview: format!(
            "{} day-by-day plan for {} travelers. {}",
            city,
            request.group_size(),
            venue_line
        ),
        lodging,
        getting_around,
        daily_tips,
        watchouts,
    }
}

fn preferred_mode(mode: TransportMode) -> String {
    match mode {
        TransportMode::Public => "train or intercity coach".to_string(),
        TransportMode::Car => "rental car".to_string(),
        TransportMode::Mixed => "rail where direct, flight on long hops".to_string(),
    }
}

fn budget_label(tier: BudgetTier) -> &'static str {
    match tier {
        BudgetTier::Budget => "budget",
        BudgetTier::Moderate => "mid-range",
        BudgetTier::Premium => "premium",
    }
}

/// Convenience wrapper used by the city generator
#[must_use]
pub fn city_fallback_for(request: &TripRequest, city: &str) -> CityPlan {
    city_fallback(request, city, venues::lookup(city))
}
