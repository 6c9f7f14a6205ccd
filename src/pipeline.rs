//! Itinerary generation pipeline
//!
//! The per-request orchestrator: validates the request, resolves static city
//! facts and extracted knowledge, runs the routing generator, fans out one
//! per-destination generator per city, aggregates in request order, persists
//! the result, and emits a typed progress stream.
//!
//! The coordinating task is the only writer to the outbound event channel;
//! sub-tasks return their results and share no mutable state. A closed
//! channel (caller went away) stops event delivery but not the pipeline:
//! generation still finishes and the itinerary is still persisted.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::config::TripsmithConfig;
use crate::generation::{CityGenerator, GenerativeBackend, RoutingGenerator};
use crate::knowledge::{CityKnowledge, ReferenceDocument, ReferenceLibrary, extract_city_knowledge};
use crate::models::{CityResult, Itinerary, ProgressEvent, TripRequest, TripSummary};
use crate::store::ItineraryStore;
use crate::venues;

/// Request-scoped orchestrator for itinerary generation
pub struct ItineraryPipeline {
    backend: Arc<dyn GenerativeBackend>,
    store: ItineraryStore,
    library: Arc<ReferenceLibrary>,
    default_locale: String,
    call_timeout: Duration,
}

impl ItineraryPipeline {
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        store: ItineraryStore,
        library: Arc<ReferenceLibrary>,
        config: &TripsmithConfig,
    ) -> Self {
        Self {
            backend,
            store,
            library,
            default_locale: config.reference.default_locale.clone(),
            call_timeout: Duration::from_secs(config.generation.timeout_seconds.into()),
        }
    }

    /// Run one planning request end to end. Every outcome terminates the
    /// event sequence with exactly one `complete` or `error`; `complete` is
    /// only emitted after the itinerary is persisted.
    #[instrument(skip_all, fields(owner = %owner, cities = request.cities.len()))]
    pub async fn run(
        &self,
        owner: &str,
        mut request: TripRequest,
        events: mpsc::Sender<ProgressEvent>,
    ) {
        request.normalize();
        if let Err(e) = request.validate() {
            warn!("Rejecting trip request: {}", e);
            Self::emit(
                &events,
                ProgressEvent::Error {
                    message: e.user_message(),
                },
            )
            .await;
            return;
        }

        Self::progress(&events, "Checking your trip details", 5).await;

        // Static facts and extracted knowledge, resolved once up front;
        // each sub-task receives only its own city's slice
        let prepared: Vec<(String, Option<&'static venues::CityFacts>, CityKnowledge)> = request
            .cities
            .iter()
            .map(|city| {
                let facts = venues::lookup(city);
                let docs: Vec<ReferenceDocument> = self
                    .library
                    .documents_for(city, &request.locale, &self.default_locale)
                    .into_iter()
                    .cloned()
                    .collect();
                let knowledge = extract_city_knowledge(&docs);
                debug!(
                    city = %city,
                    docs = docs.len(),
                    zones = knowledge.zones.len(),
                    "resolved city knowledge"
                );
                (city.clone(), facts, knowledge)
            })
            .collect();

        Self::progress(&events, "Gathering destination knowledge", 10).await;

        Self::progress(&events, "Planning routes between cities", 20).await;
        let routing = RoutingGenerator::new(self.backend.clone(), self.call_timeout)
            .generate(&request)
            .await;
        Self::progress(&events, "Routes planned", 35).await;

        Self::progress(&events, "Writing your city guides", 40).await;
        let mut tasks = JoinSet::new();
        for (index, (city, facts, knowledge)) in prepared.into_iter().enumerate() {
            let backend = self.backend.clone();
            let shared_request = request.clone();
            let timeout = self.call_timeout;
            tasks.spawn(async move {
                let generator = CityGenerator::new(backend, timeout);
                let result = generator
                    .generate(&shared_request, &city, facts, &knowledge)
                    .await;
                (index, result)
            });
        }

        // Fan-in barrier: settle every sub-task, then reassemble in request
        // order since completion order carries no meaning
        let mut slots: Vec<Option<CityResult>> =
            request.cities.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => {
                    error!("City generation task failed to join: {}", e);
                    Self::emit(
                        &events,
                        ProgressEvent::Error {
                            message: "Itinerary generation failed unexpectedly. Please try again."
                                .to_string(),
                        },
                    )
                    .await;
                    return;
                }
            }
        }
        let cities: Vec<CityResult> = match slots.into_iter().collect() {
            Some(cities) => cities,
            None => {
                error!("Fan-in finished with an unfilled city slot");
                Self::emit(
                    &events,
                    ProgressEvent::Error {
                        message: "Itinerary generation failed unexpectedly. Please try again."
                            .to_string(),
                    },
                )
                .await;
                return;
            }
        };

        Self::progress(&events, "Assembling your itinerary", 80).await;

        let itinerary = Itinerary {
            id: Uuid::new_v4().to_string(),
            owner: owner.to_string(),
            title: default_title(&request),
            summary: TripSummary::for_request(&request),
            routing,
            cities,
            created_at: Utc::now(),
        };

        Self::progress(&events, "Saving your itinerary", 90).await;
        if let Err(e) = self.store.save(&itinerary).await {
            error!("Failed to persist itinerary {}: {}", itinerary.id, e);
            Self::emit(
                &events,
                ProgressEvent::Error {
                    message: "Saving your itinerary failed. Please try again.".to_string(),
                },
            )
            .await;
            return;
        }

        info!(id = %itinerary.id, "itinerary generated and persisted");
        Self::emit(&events, ProgressEvent::Complete { itinerary }).await;
    }

    async fn progress(events: &mpsc::Sender<ProgressEvent>, message: &str, percent: u8) {
        Self::emit(
            events,
            ProgressEvent::Progress {
                message: message.to_string(),
                percent,
            },
        )
        .await;
    }

    async fn emit(events: &mpsc::Sender<ProgressEvent>, event: ProgressEvent) {
        if events.send(event).await.is_err() {
            debug!("progress channel closed, caller went away");
        }
    }
}

fn default_title(request: &TripRequest) -> String {
    format!(
        "{} {}",
        request.cities.join(" & "),
        request.start_date.format("%Y")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetTier, TransportMode};
    use chrono::NaiveDate;

    #[test]
    fn test_default_title() {
        let request = TripRequest {
            origin: "Boston".to_string(),
            adults: 2,
            children: 0,
            seniors: 0,
            reduced_mobility: false,
            cities: vec!["Houston".to_string(), "Miami".to_string()],
            transport: TransportMode::Mixed,
            budget: BudgetTier::Moderate,
            start_date: NaiveDate::from_ymd_opt(2026, 6, 20).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 6, 24).unwrap(),
            ticket_holds: Vec::new(),
            notes: None,
            locale: "en".to_string(),
        };
        assert_eq!(default_title(&request), "Houston & Miami 2026");
    }
}
