//! Per-destination generator
//!
//! Produces the lodging and logistics detail for one city. Each invocation
//! is independent: it receives only its own city's facts and extracted
//! knowledge plus the shared trip parameters, and never touches shared
//! mutable state. Failures are absorbed by the fallback synthesizer.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use super::backend::GenerativeBackend;
use super::{GenerationFailure, GenerationUnitResult, fallback, parse_backend_payload, prompt};
use crate::knowledge::CityKnowledge;
use crate::models::{CityPlan, CityResult, GenerationSource, TripRequest};
use crate::venues::CityFacts;

/// Per-destination sub-generator
pub struct CityGenerator {
    backend: Arc<dyn GenerativeBackend>,
    timeout: Duration,
}

impl CityGenerator {
    pub fn new(backend: Arc<dyn GenerativeBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Generate the plan for one city, falling back deterministically on any
    /// backend or validation failure. The result is always tagged with the
    /// requested city.
    #[instrument(skip_all, fields(city = %city))]
    pub async fn generate(
        &self,
        request: &TripRequest,
        city: &str,
        facts: Option<&CityFacts>,
        knowledge: &CityKnowledge,
    ) -> CityResult {
        match self.try_generate(request, city, facts, knowledge).await {
            Ok(mut plan) => {
                // The tag is ours, not the backend's
                plan.city = city.to_string();
                CityResult {
                    city: city.to_string(),
                    source: GenerationSource::Backend,
                    plan,
                }
            }
            Err(failure) => {
                warn!("City generation for {} fell back: {}", city, failure);
                CityResult {
                    city: city.to_string(),
                    source: GenerationSource::Fallback,
                    plan: fallback::city_fallback(request, city, facts),
                }
            }
        }
    }

    async fn try_generate(
        &self,
        request: &TripRequest,
        city: &str,
        facts: Option<&CityFacts>,
        knowledge: &CityKnowledge,
    ) -> GenerationUnitResult<CityPlan> {
        let prompt = build_prompt(request, city, facts, knowledge);
        debug!(prompt_len = prompt.len(), "calling backend for city plan");

        let raw = tokio::time::timeout(self.timeout, self.backend.complete(&prompt))
            .await
            .map_err(|_| {
                GenerationFailure::Backend(format!("city call for {city} timed out"))
            })?
            .map_err(|e| GenerationFailure::Backend(e.to_string()))?;

        let plan: CityPlan = parse_backend_payload(&raw)?;
        if plan.overview.trim().is_empty() || plan.lodging.is_empty() {
            return Err(GenerationFailure::Malformed(
                "city plan is missing overview or lodging".to_string(),
            ));
        }
        Ok(plan)
    }
}

fn build_prompt(
    request: &TripRequest,
    city: &str,
    facts: Option<&CityFacts>,
    knowledge: &CityKnowledge,
) -> String {
    let context = prompt::city_context(city, facts, knowledge);
    format!(
        "You are a destination planner working on one stop of a longer trip: \
         {city}.\n\n{}\n{}\n\
         Respond with JSON only, no prose, matching exactly this shape:\n\
         {{\"city\": \"{city}\", \"overview\": \"...\", \"lodging\": [{{\"zone\": \"...\", \
         \"area\": \"...\", \"reason\": \"...\", \"price_range\": null}}], \
         \"getting_around\": [\"...\"], \"daily_tips\": [\"...\"], \
         \"watchouts\": [\"...\"]}}\n\
         Recommend two or three lodging zones, preferring the researched zones \
         above when they fit the travelers.",
        prompt::trip_context(request),
        context
    )
}
