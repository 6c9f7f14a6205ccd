//! End-to-end pipeline tests with a scripted generative backend

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::mpsc;

use tripsmith::generation::GenerativeBackend;
use tripsmith::knowledge::{ReferenceDocument, ReferenceLibrary};
use tripsmith::models::{
    BudgetTier, CityPlan, GenerationSource, ProgressEvent, TransportMode, TripRequest,
};
use tripsmith::{ItineraryPipeline, ItineraryStore, TripsmithConfig, TripsmithError};

const ROUTING_JSON: &str = r#"{"options":[{"label":"smartest","legs":[{"from":"Boston","to":"Houston","mode":"flight","duration_hint":"4h","notes":[]},{"from":"Houston","to":"Miami","mode":"flight","duration_hint":"2h","notes":[]}],"connection_tips":[],"traveler_tips":[]}]}"#;

const CITY_JSON: &str = r#"{"city":"backend","overview":"Backend-written overview.","lodging":[{"zone":"Scripted Zone","area":"central","reason":"scripted"}],"getting_around":["rail"],"daily_tips":[],"watchouts":[]}"#;

/// Scripted backend: per-prompt failures, malformed output, and delays keyed
/// by substring match on the prompt text
#[derive(Default)]
struct ScriptedBackend {
    fail_for: Vec<&'static str>,
    malformed_for: Vec<&'static str>,
    delay_for: Vec<(&'static str, Duration)>,
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        for (needle, delay) in &self.delay_for {
            if prompt.contains(needle) {
                tokio::time::sleep(*delay).await;
            }
        }
        if self.fail_for.iter().any(|needle| prompt.contains(needle)) {
            return Err(TripsmithError::backend("scripted transport failure").into());
        }
        if self.malformed_for.iter().any(|needle| prompt.contains(needle)) {
            return Ok("not json".to_string());
        }
        if prompt.contains("travel routing planner") {
            Ok(ROUTING_JSON.to_string())
        } else {
            Ok(CITY_JSON.to_string())
        }
    }
}

fn request() -> TripRequest {
    TripRequest {
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
    }
}

fn houston_doc() -> ReferenceDocument {
    ReferenceDocument {
        name: "houston.en.md".to_string(),
        version: 1,
        city: "Houston".to_string(),
        language: "en".to_string(),
        body: "\
## Zone 1: Downtown (Best Value)

Compact core with the rail line.

**Pros**:
- Direct METRORail to NRG Park
"
        .to_string(),
    }
}

/// Drive one request through the pipeline and collect every emitted event
async fn run_pipeline(
    backend: ScriptedBackend,
    request: TripRequest,
) -> (Vec<ProgressEvent>, ItineraryStore, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = ItineraryStore::open(dir.path()).unwrap();
    let library = Arc::new(ReferenceLibrary::from_documents(vec![houston_doc()]));
    let config = TripsmithConfig::default();

    let pipeline = ItineraryPipeline::new(Arc::new(backend), store.clone(), library, &config);

    let (tx, mut rx) = mpsc::channel(16);
    let handle = tokio::spawn(async move {
        pipeline.run("tester", request, tx).await;
    });

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    handle.await.unwrap();

    (events, store, dir)
}

fn terminal(events: &[ProgressEvent]) -> &ProgressEvent {
    events.last().expect("pipeline emitted no events")
}

#[tokio::test]
async fn end_to_end_scenario_with_one_failing_city() {
    let backend = ScriptedBackend {
        fail_for: vec!["Miami"],
        ..Default::default()
    };
    let (events, store, _dir) = run_pipeline(backend, request()).await;

    let ProgressEvent::Complete { itinerary } = terminal(&events) else {
        panic!("expected complete, got {:?}", terminal(&events));
    };

    // Both cities present, in request order, each tagged with its city
    let cities: Vec<&str> = itinerary.cities.iter().map(|c| c.city.as_str()).collect();
    assert_eq!(cities, vec!["Houston", "Miami"]);
    assert_eq!(itinerary.cities[0].source, GenerationSource::Backend);
    assert_eq!(itinerary.cities[1].source, GenerationSource::Fallback);
    assert_eq!(itinerary.cities[0].plan.city, "Houston");
    assert_eq!(itinerary.cities[1].plan.city, "Miami");

    // The record was persisted before complete was emitted
    let stored = store
        .fetch("tester", &itinerary.id)
        .await
        .unwrap()
        .expect("itinerary not persisted");
    assert_eq!(&stored, itinerary);

    // Derived summary fields
    assert_eq!(itinerary.summary.nights, 4);
    assert_eq!(itinerary.summary.nights_per_city, 2);
    assert_eq!(itinerary.summary.moves.len(), 2);
}

#[tokio::test]
async fn order_preserved_when_later_city_finishes_first() {
    // Houston is slow, so Miami settles first; aggregation must still
    // reassemble in request order
    let backend = ScriptedBackend {
        delay_for: vec![("Houston", Duration::from_millis(200))],
        ..Default::default()
    };
    let (events, _store, _dir) = run_pipeline(backend, request()).await;

    let ProgressEvent::Complete { itinerary } = terminal(&events) else {
        panic!("expected complete");
    };
    let cities: Vec<&str> = itinerary.cities.iter().map(|c| c.city.as_str()).collect();
    assert_eq!(cities, vec!["Houston", "Miami"]);
    assert!(
        itinerary
            .cities
            .iter()
            .all(|c| c.source == GenerationSource::Backend)
    );
}

#[tokio::test]
async fn progress_percent_is_monotonic_and_terminal_event_is_last() {
    let backend = ScriptedBackend::default();
    let (events, _store, _dir) = run_pipeline(backend, request()).await;

    let mut last_percent = 0u8;
    for (i, event) in events.iter().enumerate() {
        match event {
            ProgressEvent::Progress { percent, .. } => {
                assert!(
                    *percent >= last_percent,
                    "percent decreased: {} -> {}",
                    last_percent,
                    percent
                );
                last_percent = *percent;
                assert!(i < events.len() - 1, "progress after terminal event");
            }
            ProgressEvent::Complete { .. } | ProgressEvent::Error { .. } => {
                assert_eq!(i, events.len() - 1, "terminal event was not last");
            }
        }
    }
    assert!(matches!(terminal(&events), ProgressEvent::Complete { .. }));
}

#[tokio::test]
async fn malformed_output_and_transport_error_take_the_same_path() {
    let malformed = ScriptedBackend {
        malformed_for: vec!["Miami"],
        ..Default::default()
    };
    let errored = ScriptedBackend {
        fail_for: vec!["Miami"],
        ..Default::default()
    };

    let (events_a, _store_a, _dir_a) = run_pipeline(malformed, request()).await;
    let (events_b, _store_b, _dir_b) = run_pipeline(errored, request()).await;

    let ProgressEvent::Complete { itinerary: a } = terminal(&events_a) else {
        panic!("expected complete");
    };
    let ProgressEvent::Complete { itinerary: b } = terminal(&events_b) else {
        panic!("expected complete");
    };

    assert_eq!(a.cities[1].source, GenerationSource::Fallback);
    assert_eq!(b.cities[1].source, GenerationSource::Fallback);
    // Same deterministic fallback payload regardless of the failure mode
    assert_eq!(a.cities[1].plan, b.cities[1].plan);
}

#[tokio::test]
async fn fallback_and_backend_payloads_share_one_schema() {
    let backend = ScriptedBackend {
        fail_for: vec!["Miami"],
        ..Default::default()
    };
    let (events, _store, _dir) = run_pipeline(backend, request()).await;

    let ProgressEvent::Complete { itinerary } = terminal(&events) else {
        panic!("expected complete");
    };

    // Round-trip both plans through the schema type; shape alone cannot
    // distinguish the sources
    for city in &itinerary.cities {
        let raw = serde_json::to_string(&city.plan).unwrap();
        let reparsed: CityPlan = serde_json::from_str(&raw).unwrap();
        assert_eq!(reparsed, city.plan);
    }
}

#[tokio::test]
async fn invalid_request_emits_error_and_persists_nothing() {
    let mut invalid = request();
    invalid.cities.clear();

    let backend = ScriptedBackend::default();
    let (events, store, _dir) = run_pipeline(backend, invalid).await;

    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], ProgressEvent::Error { .. }));
    assert!(store.list_for_owner("tester").await.unwrap().is_empty());
}

#[tokio::test]
async fn inverted_dates_rejected_before_generation() {
    let mut invalid = request();
    invalid.start_date = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();

    let backend = ScriptedBackend::default();
    let (events, store, _dir) = run_pipeline(backend, invalid).await;

    assert!(matches!(terminal(&events), ProgressEvent::Error { .. }));
    assert!(store.list_for_owner("tester").await.unwrap().is_empty());
}

#[tokio::test]
async fn all_cities_failing_still_completes_with_fallbacks() {
    let backend = ScriptedBackend {
        fail_for: vec!["Houston", "Miami", "travel routing planner"],
        ..Default::default()
    };
    let (events, _store, _dir) = run_pipeline(backend, request()).await;

    let ProgressEvent::Complete { itinerary } = terminal(&events) else {
        panic!("expected complete even with every backend call failing");
    };
    assert_eq!(itinerary.routing.source, GenerationSource::Fallback);
    assert_eq!(itinerary.routing.plan.options.len(), 3);
    assert!(
        itinerary
            .cities
            .iter()
            .all(|c| c.source == GenerationSource::Fallback)
    );
}

#[tokio::test]
async fn extracted_knowledge_reaches_the_city_prompt() {
    // The Houston reference document mentions METRORail; a backend that
    // echoes its prompt lets us observe the knowledge flowing through
    struct EchoBackend;

    #[async_trait]
    impl GenerativeBackend for EchoBackend {
        async fn complete(&self, prompt: &str) -> Result<String> {
            if prompt.contains("travel routing planner") {
                return Ok(ROUTING_JSON.to_string());
            }
            assert!(
                !prompt.contains("one stop of a longer trip: Houston")
                    || prompt.contains("METRORail"),
                "Houston prompt lost the extracted zone knowledge"
            );
            Ok(CITY_JSON.to_string())
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let store = ItineraryStore::open(dir.path()).unwrap();
    let library = Arc::new(ReferenceLibrary::from_documents(vec![houston_doc()]));
    let config = TripsmithConfig::default();
    let pipeline = ItineraryPipeline::new(Arc::new(EchoBackend), store, library, &config);

    let (tx, mut rx) = mpsc::channel(16);
    let handle = tokio::spawn(async move {
        pipeline.run("tester", request(), tx).await;
    });
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    handle.await.unwrap();
    assert!(matches!(terminal(&events), ProgressEvent::Complete { .. }));
}
