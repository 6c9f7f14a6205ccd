//! Reference document library
//!
//! Loads per-city lodging write-ups from a directory once per process
//! lifetime and serves them read-only to the pipeline. Files are named
//! `<city>.<language>.md` or `<city>.<language>.<version>.md`, with
//! underscores in the city part standing in for spaces. A missing directory
//! or an unreadable file is logged and skipped; absence is not an error.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use super::ReferenceDocument;

/// In-memory, read-only collection of reference documents
#[derive(Debug, Default)]
pub struct ReferenceLibrary {
    docs: Vec<ReferenceDocument>,
}

impl ReferenceLibrary {
    /// Build an empty library (used when no docs directory is configured)
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load all documents from a directory. Never fails: unreadable entries
    /// are skipped with a warning.
    #[must_use]
    pub fn load(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    "Reference docs directory {} not readable ({}), continuing without documents",
                    dir.display(),
                    e
                );
                return Self::default();
            }
        };

        let mut docs = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Some((city, language, version)) = parse_stem(stem) else {
                warn!("Skipping reference doc with unrecognized name: {}", stem);
                continue;
            };
            match fs::read_to_string(&path) {
                Ok(body) => docs.push(ReferenceDocument {
                    name: format!("{stem}.md"),
                    version,
                    city,
                    language,
                    body,
                }),
                Err(e) => warn!("Failed to read {}: {}", path.display(), e),
            }
        }

        // Stable order: by city, then version, so cross-document merge
        // precedence is deterministic
        docs.sort_by(|a, b| {
            (a.city.to_lowercase(), a.version, &a.name).cmp(&(
                b.city.to_lowercase(),
                b.version,
                &b.name,
            ))
        });

        debug!(count = docs.len(), "loaded reference documents");
        Self { docs }
    }

    /// Build a library from already-constructed documents (tests, seeds)
    #[must_use]
    pub fn from_documents(docs: Vec<ReferenceDocument>) -> Self {
        Self { docs }
    }

    /// Documents for a (city, language) pair, falling back to the default
    /// locale when the requested language has no documents. Zero results is
    /// a normal outcome.
    #[must_use]
    pub fn documents_for(
        &self,
        city: &str,
        language: &str,
        default_locale: &str,
    ) -> Vec<&ReferenceDocument> {
        let matches = |lang: &str| {
            self.docs
                .iter()
                .filter(|doc| {
                    doc.city.to_lowercase() == city.trim().to_lowercase()
                        && doc.language.eq_ignore_ascii_case(lang)
                })
                .collect::<Vec<_>>()
        };

        let found = matches(language);
        if found.is_empty() && !language.eq_ignore_ascii_case(default_locale) {
            return matches(default_locale);
        }
        found
    }

    /// Total number of loaded documents
    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// True when the library holds no documents
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

/// Parse `<city>.<language>` or `<city>.<language>.<version>` file stems;
/// underscores in the city part become spaces
fn parse_stem(stem: &str) -> Option<(String, String, u32)> {
    let parts: Vec<&str> = stem.split('.').collect();
    let (city, language, version) = match parts.as_slice() {
        [city, language] => (city, language, 1),
        [city, language, version] => (city, language, version.parse().ok()?),
        _ => return None,
    };
    if city.is_empty() || language.is_empty() {
        return None;
    }
    Some((city.replace('_', " "), language.to_string(), version))
}
