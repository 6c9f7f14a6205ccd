//! Reference knowledge extraction
//!
//! This module turns loosely-formatted per-city reference documents into
//! typed lodging-zone records plus incidental prose extracts used for prompt
//! context. Extraction is resilient by design: malformed or absent documents
//! yield empty results, never an error, since the output only enriches
//! prompts.

pub mod extractor;
pub mod library;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use extractor::extract_city_knowledge;
pub use library::ReferenceLibrary;

/// A named, versioned block of semi-structured text scoped to one city and
/// one language. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceDocument {
    pub name: String,
    pub version: u32,
    pub city: String,
    pub language: String,
    pub body: String,
}

/// A parsed neighborhood/area recommendation extracted from reference
/// documentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LodgingZone {
    /// Stable identifier derived from the name, so the same zone named in
    /// two documents merges into one record
    pub id: String,
    pub name: String,
    /// Parenthesized suffix stripped from the heading, e.g. "Best Value"
    pub descriptor: Option<String>,
    /// Trailing tag after the dash separator in the heading
    pub recommendation: Option<String>,
    pub summary: String,
    /// Geographic-area label
    pub area: String,
    /// Traveler profiles this zone suits
    pub traveler_profiles: Vec<String>,
    pub advantages: Vec<String>,
    pub disadvantages: Vec<String>,
    /// Named ratings; insertion order is irrelevant
    pub ratings: BTreeMap<String, String>,
    pub price_range: Option<String>,
    /// Raw section text retained for traceability
    pub source_text: String,
}

/// Everything extracted for one city, ready for prompt building
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CityKnowledge {
    pub zones: Vec<LodgingZone>,
    /// Executive-summary paragraphs
    pub highlights: Vec<String>,
    /// Caller-facing callouts collected from gap/warning style headings
    pub pain_points: Vec<String>,
    /// Verbatim table blocks
    pub tables: Vec<String>,
}

impl CityKnowledge {
    /// True when nothing useful was extracted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
            && self.highlights.is_empty()
            && self.pain_points.is_empty()
            && self.tables.is_empty()
    }
}

/// Derive the stable zone identifier from its display name
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_is_deterministic_and_stable() {
        assert_eq!(slugify("Downtown"), "downtown");
        assert_eq!(slugify("South Beach / Ocean Drive"), "south-beach-ocean-drive");
        assert_eq!(slugify("  Coyoacán  "), "coyoacán");
        assert_eq!(slugify("Downtown"), slugify("downtown"));
    }

    #[test]
    fn test_slugify_collapses_separator_runs() {
        assert_eq!(slugify("a -- b"), "a-b");
        assert_eq!(slugify("(weird)"), "weird");
    }
}
