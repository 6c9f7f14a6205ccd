//! Inter-city routing generator
//!
//! Produces the transport-leg alternatives for the whole trip in one backend
//! call. Any failure mode (transport error, timeout, invalid output) is
//! absorbed locally by the fallback synthesizer; this generator always
//! returns a usable result.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use super::backend::GenerativeBackend;
use super::{GenerationFailure, GenerationUnitResult, fallback, parse_backend_payload, prompt};
use crate::models::{GenerationSource, RoutePlan, RoutingResult, TripRequest};

/// Routing sub-generator
pub struct RoutingGenerator {
    backend: Arc<dyn GenerativeBackend>,
    timeout: Duration,
}

impl RoutingGenerator {
    pub fn new(backend: Arc<dyn GenerativeBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Generate the routing plan, falling back deterministically on any
    /// backend or validation failure
    #[instrument(skip_all, fields(cities = request.cities.len()))]
    pub async fn generate(&self, request: &TripRequest) -> RoutingResult {
        match self.try_generate(request).await {
            Ok(plan) => RoutingResult {
                source: GenerationSource::Backend,
                plan,
            },
            Err(failure) => {
                warn!("Routing generation fell back: {}", failure);
                RoutingResult {
                    source: GenerationSource::Fallback,
                    plan: fallback::routing_fallback(request),
                }
            }
        }
    }

    async fn try_generate(&self, request: &TripRequest) -> GenerationUnitResult<RoutePlan> {
        let prompt = build_prompt(request);
        debug!(prompt_len = prompt.len(), "calling backend for routing plan");

        let raw = tokio::time::timeout(self.timeout, self.backend.complete(&prompt))
            .await
            .map_err(|_| GenerationFailure::Backend("routing call timed out".to_string()))?
            .map_err(|e| GenerationFailure::Backend(e.to_string()))?;

        let plan: RoutePlan = parse_backend_payload(&raw)?;
        if plan.options.is_empty() {
            return Err(GenerationFailure::Malformed(
                "routing plan contains no options".to_string(),
            ));
        }
        Ok(plan)
    }
}

fn build_prompt(request: &TripRequest) -> String {
    format!(
        "You are a travel routing planner. Given the trip below, propose \
         inter-city transport alternatives.\n\n{}\n\
         Respond with JSON only, no prose, matching exactly this shape:\n\
         {{\"options\": [{{\"label\": \"smartest\", \"legs\": [{{\"from\": \"...\", \
         \"to\": \"...\", \"mode\": \"...\", \"duration_hint\": \"...\", \
         \"notes\": [\"...\"]}}], \"connection_tips\": [\"...\"], \
         \"traveler_tips\": [\"...\"]}}]}}\n\
         Provide three options labeled \"smartest\", \"budget\" and \"fastest\", \
         each covering every move from the origin through the cities in order.",
        prompt::trip_context(request)
    )
}
