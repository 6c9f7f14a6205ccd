//! HTTP API handlers
//!
//! The one interesting endpoint is `/itineraries/generate`: a single POST
//! opens a long-lived SSE response carrying JSON-encoded progress events
//! until `complete` or `error`, after which the stream closes. The record
//! endpoints back the surrounding account screens.
//!
//! Caller identity is resolved upstream by the auth layer and arrives as the
//! `x-user-id` header; requests without it are rejected before any stream
//! opens.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{
        Json,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use chrono::{DateTime, NaiveDate, Utc};
use futures::Stream;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::{StreamExt, wrappers::ReceiverStream};
use tracing::{info, warn};

use crate::models::{Itinerary, TripRequest};
use crate::pipeline::ItineraryPipeline;
use crate::store::ItineraryStore;
use crate::venues;

const IDENTITY_HEADER: &str = "x-user-id";

/// Shared handler state, constructed once in main and passed explicitly
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ItineraryPipeline>,
    pub store: ItineraryStore,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/cities", get(list_cities))
        .route("/itineraries/generate", post(generate_itinerary))
        .route("/itineraries", get(list_itineraries))
        .route(
            "/itineraries/{id}",
            get(get_itinerary)
                .patch(rename_itinerary)
                .delete(delete_itinerary),
        )
        .with_state(state)
}

/// Resolve the caller identity or reject before any work happens
fn caller_identity(headers: &HeaderMap) -> Result<String, StatusCode> {
    headers
        .get(IDENTITY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
        .ok_or(StatusCode::UNAUTHORIZED)
}

async fn list_cities() -> Json<&'static [venues::CityFacts]> {
    Json(venues::all())
}

async fn generate_itinerary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<TripRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, StatusCode> {
    let owner = caller_identity(&headers)?;
    info!(owner = %owner, cities = request.cities.len(), "starting itinerary generation");

    let (tx, rx) = mpsc::channel(16);
    let pipeline = state.pipeline.clone();
    tokio::spawn(async move {
        pipeline.run(&owner, request, tx).await;
    });

    let stream = ReceiverStream::new(rx).map(|event| {
        let sse_event = match Event::default().json_data(&event) {
            Ok(sse_event) => sse_event,
            Err(e) => {
                warn!("failed to serialize progress event: {}", e);
                Event::default().data("{\"type\":\"error\",\"message\":\"internal\"}")
            }
        };
        Ok(sse_event)
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Listing view of a stored itinerary
#[derive(Serialize, Deserialize)]
pub struct ApiItineraryEntry {
    pub id: String,
    pub title: String,
    pub origin: String,
    pub cities: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<&Itinerary> for ApiItineraryEntry {
    fn from(itinerary: &Itinerary) -> Self {
        Self {
            id: itinerary.id.clone(),
            title: itinerary.title.clone(),
            origin: itinerary.summary.origin.clone(),
            cities: itinerary
                .cities
                .iter()
                .map(|city| city.city.clone())
                .collect(),
            start_date: itinerary.summary.start_date,
            end_date: itinerary.summary.end_date,
            created_at: itinerary.created_at,
        }
    }
}

async fn list_itineraries(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ApiItineraryEntry>>, StatusCode> {
    let owner = caller_identity(&headers)?;
    let itineraries = state
        .store
        .list_for_owner(&owner)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(itineraries.iter().map(ApiItineraryEntry::from).collect()))
}

async fn get_itinerary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Itinerary>, StatusCode> {
    let owner = caller_identity(&headers)?;
    let itinerary = state
        .store
        .fetch(&owner, &id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(itinerary))
}

#[derive(Deserialize)]
struct RenamePayload {
    title: String,
}

async fn rename_itinerary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<RenamePayload>,
) -> Result<StatusCode, StatusCode> {
    let owner = caller_identity(&headers)?;
    if payload.title.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let renamed = state
        .store
        .rename(&owner, &id, &payload.title)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    if renamed {
        Ok(StatusCode::OK)
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

async fn delete_itinerary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let owner = caller_identity(&headers)?;
    let deleted = state
        .store
        .delete(&owner, &id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_caller_identity_required() {
        let headers = HeaderMap::new();
        assert_eq!(caller_identity(&headers), Err(StatusCode::UNAUTHORIZED));

        let mut headers = HeaderMap::new();
        headers.insert(IDENTITY_HEADER, HeaderValue::from_static("  "));
        assert_eq!(caller_identity(&headers), Err(StatusCode::UNAUTHORIZED));

        let mut headers = HeaderMap::new();
        headers.insert(IDENTITY_HEADER, HeaderValue::from_static("alice"));
        assert_eq!(caller_identity(&headers), Ok("alice".to_string()));
    }
}
