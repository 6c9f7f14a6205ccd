//! Host-city venue facts
//!
//! Read-only static metadata for the tournament host cities: stadium, metro
//! area, and arrival hints. The pipeline resolves these once per request and
//! hands each per-city generator only its own city's facts. Unknown cities
//! are not an error; generators simply work without venue context.

use serde::Serialize;

/// Static facts for one host city
#[derive(Debug, Clone, Serialize)]
pub struct CityFacts {
    pub city: &'static str,
    pub country: &'static str,
    /// Match venue name
    pub venue: &'static str,
    /// Metro area the venue actually sits in
    pub metro_area: &'static str,
    /// Main arrival airports
    pub airports: &'static str,
    /// One-line transit orientation
    pub transit_hint: &'static str,
}

const CITY_FACTS: &[CityFacts] = &[
    CityFacts {
        city: "Atlanta",
        country: "United States",
        venue: "Mercedes-Benz Stadium",
        metro_area: "Downtown Atlanta",
        airports: "ATL",
        transit_hint: "MARTA rail stops next to the stadium",
    },
    CityFacts {
        city: "Boston",
        country: "United States",
        venue: "Gillette Stadium",
        metro_area: "Foxborough, about 45 km southwest of Boston",
        airports: "BOS",
        transit_hint: "Commuter rail event trains from South Station on match days",
    },
    CityFacts {
        city: "Dallas",
        country: "United States",
        venue: "AT&T Stadium",
        metro_area: "Arlington, between Dallas and Fort Worth",
        airports: "DFW, DAL",
        transit_hint: "No rail to Arlington; plan for rideshare or shuttle",
    },
    CityFacts {
        city: "Houston",
        country: "United States",
        venue: "NRG Stadium",
        metro_area: "NRG Park, south of downtown Houston",
        airports: "IAH, HOU",
        transit_hint: "METRORail Red Line runs from downtown to the stadium",
    },
    CityFacts {
        city: "Kansas City",
        country: "United States",
        venue: "Arrowhead Stadium",
        metro_area: "Truman Sports Complex, east of downtown",
        airports: "MCI",
        transit_hint: "No rail to the complex; event buses from downtown",
    },
    CityFacts {
        city: "Los Angeles",
        country: "United States",
        venue: "SoFi Stadium",
        metro_area: "Inglewood",
        airports: "LAX",
        transit_hint: "Metro K Line plus a shuttle hop to the stadium district",
    },
    CityFacts {
        city: "Miami",
        country: "United States",
        venue: "Hard Rock Stadium",
        metro_area: "Miami Gardens, north of Miami",
        airports: "MIA, FLL",
        transit_hint: "No rail to Miami Gardens; budget for rideshare time",
    },
    CityFacts {
        city: "New York",
        country: "United States",
        venue: "MetLife Stadium",
        metro_area: "East Rutherford, New Jersey",
        airports: "EWR, JFK, LGA",
        transit_hint: "NJ Transit rail from Secaucus Junction on event days",
    },
    CityFacts {
        city: "Philadelphia",
        country: "United States",
        venue: "Lincoln Financial Field",
        metro_area: "South Philadelphia sports complex",
        airports: "PHL",
        transit_hint: "SEPTA Broad Street Line ends at the complex",
    },
    CityFacts {
        city: "San Francisco",
        country: "United States",
        venue: "Levi's Stadium",
        metro_area: "Santa Clara, about 70 km south of San Francisco",
        airports: "SFO, SJC",
        transit_hint: "Caltrain to Mountain View, then VTA light rail",
    },
    CityFacts {
        city: "Seattle",
        country: "United States",
        venue: "Lumen Field",
        metro_area: "SoDo, walkable from downtown Seattle",
        airports: "SEA",
        transit_hint: "Link light rail from the airport stops at Stadium station",
    },
    CityFacts {
        city: "Guadalajara",
        country: "Mexico",
        venue: "Estadio Akron",
        metro_area: "Zapopan, western Guadalajara",
        airports: "GDL",
        transit_hint: "Tren Ligero Line 3 plus a short taxi to the stadium",
    },
    CityFacts {
        city: "Mexico City",
        country: "Mexico",
        venue: "Estadio Azteca",
        metro_area: "Coyoacán, southern Mexico City",
        airports: "MEX, NLU",
        transit_hint: "Tren Ligero from Tasqueña stops at the stadium gate",
    },
    CityFacts {
        city: "Monterrey",
        country: "Mexico",
        venue: "Estadio BBVA",
        metro_area: "Guadalupe, eastern Monterrey",
        airports: "MTY",
        transit_hint: "Metro Line 1 to Exposición, then a short taxi",
    },
    CityFacts {
        city: "Toronto",
        country: "Canada",
        venue: "BMO Field",
        metro_area: "Exhibition Place on the lakeshore",
        airports: "YYZ, YTZ",
        transit_hint: "GO train and streetcars stop at Exhibition",
    },
    CityFacts {
        city: "Vancouver",
        country: "Canada",
        venue: "BC Place",
        metro_area: "Downtown Vancouver",
        airports: "YVR",
        transit_hint: "SkyTrain Expo Line to Stadium-Chinatown",
    },
];

/// All known host cities
#[must_use]
pub fn all() -> &'static [CityFacts] {
    CITY_FACTS
}

/// Case-insensitive lookup by city name
#[must_use]
pub fn lookup(city: &str) -> Option<&'static CityFacts> {
    let needle = city.trim().to_lowercase();
    CITY_FACTS
        .iter()
        .find(|facts| facts.city.to_lowercase() == needle)
}
