//! Itinerary generation units
//!
//! Each sub-generator builds a prompt, calls the generative backend, and
//! validates the response against a fixed payload schema. Backend errors,
//! timeouts, and malformed output all take the same path: the deterministic
//! fallback synthesizer, which produces a schema-identical payload from the
//! trip request alone.

pub mod backend;
pub mod city;
pub mod fallback;
pub mod prompt;
pub mod routing;

use std::fmt;

use serde::de::DeserializeOwned;

pub use backend::{GenerativeBackend, HttpGenerativeBackend};
pub use city::CityGenerator;
pub use routing::RoutingGenerator;

/// Typed failure reason for one generation unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationFailure {
    /// The backend call failed or timed out
    Backend(String),
    /// The backend returned text that does not parse as the expected schema
    Malformed(String),
}

impl fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationFailure::Backend(message) => write!(f, "backend call failed: {message}"),
            GenerationFailure::Malformed(message) => {
                write!(f, "backend output failed validation: {message}")
            }
        }
    }
}

/// The output of one sub-generator invocation: either a payload matching the
/// fixed schema, or a typed failure. Never both.
pub type GenerationUnitResult<T> = Result<T, GenerationFailure>;

/// Validation gate applied to every backend response before it is accepted:
/// strip surrounding code-fence markers, then parse strictly into the
/// expected payload type. A parse failure is treated identically to a
/// backend error by the callers.
pub fn parse_backend_payload<T: DeserializeOwned>(raw: &str) -> GenerationUnitResult<T> {
    let cleaned = strip_code_fences(raw);
    serde_json::from_str(cleaned).map_err(|e| GenerationFailure::Malformed(e.to_string()))
}

/// Strip a surrounding ``` fence (with optional info string) if present
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json", "JSON", ...) up to the first newline
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoutePlan;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  ```json\n{}\n```  "), "{}");
    }

    #[test]
    fn test_parse_backend_payload_accepts_fenced_json() {
        let raw = "```json\n{\"options\": []}\n```";
        let plan: RoutePlan = parse_backend_payload(raw).unwrap();
        assert!(plan.options.is_empty());
    }

    #[test]
    fn test_parse_backend_payload_rejects_non_json() {
        let result: GenerationUnitResult<RoutePlan> = parse_backend_payload("not json");
        assert!(matches!(result, Err(GenerationFailure::Malformed(_))));
    }

    #[test]
    fn test_parse_backend_payload_rejects_wrong_shape() {
        let result: GenerationUnitResult<RoutePlan> = parse_backend_payload("{\"routes\": []}");
        assert!(matches!(result, Err(GenerationFailure::Malformed(_))));
    }
}
