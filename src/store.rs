//! Durable itinerary store
//!
//! Persists assembled itineraries keyed by owner and record id, backed by an
//! embedded fjall keyspace with postcard-encoded values. One store is opened
//! per process lifetime and passed explicitly into the pipeline and the web
//! layer; blocking store I/O runs on the blocking pool.

use anyhow::{Result, anyhow};
use fjall::Keyspace;
use std::path::Path;
use tokio::task;
use tracing::debug;

use crate::models::Itinerary;

/// Handle to the durable itinerary keyspace. Cheap to clone.
#[derive(Clone)]
pub struct ItineraryStore {
    store: Keyspace,
}

fn record_key(owner: &str, id: &str) -> Vec<u8> {
    format!("{owner}/{id}").into_bytes()
}

fn owner_prefix(owner: &str) -> Vec<u8> {
    format!("{owner}/").into_bytes()
}

impl ItineraryStore {
    /// Open (or create) the store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(&path).open()?;
        let store = db.keyspace("itineraries", fjall::KeyspaceCreateOptions::default)?;
        Ok(ItineraryStore { store })
    }

    /// Persist one itinerary. Overwrites an existing record with the same
    /// owner and id.
    #[tracing::instrument(name = "store_save", level = "debug", skip(self, itinerary), fields(id = %itinerary.id))]
    pub async fn save(&self, itinerary: &Itinerary) -> Result<()> {
        let store = self.store.clone();
        let key = record_key(&itinerary.owner, &itinerary.id);
        let bytes = postcard::to_stdvec(itinerary)?;

        task::spawn_blocking(move || store.insert(key, bytes)).await??;
        Ok(())
    }

    /// Fetch one itinerary, `None` when absent
    pub async fn fetch(&self, owner: &str, id: &str) -> Result<Option<Itinerary>> {
        let store = self.store.clone();
        let key = record_key(owner, id);

        let maybe_bytes: Option<Vec<u8>> =
            task::spawn_blocking(move || -> Result<Option<Vec<u8>>> {
                Ok(store.get(key)?.map(|v| v.to_vec()))
            })
            .await??;

        match maybe_bytes {
            Some(bytes) => Ok(Some(postcard::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    /// All itineraries for one owner, newest first
    pub async fn list_for_owner(&self, owner: &str) -> Result<Vec<Itinerary>> {
        let store = self.store.clone();
        let prefix = owner_prefix(owner);

        let raw: Vec<Vec<u8>> = task::spawn_blocking(move || -> Result<Vec<Vec<u8>>> {
            let mut values = Vec::new();
            for entry in store.prefix(prefix) {
                let (_, value) = entry.into_inner()?;
                values.push(value.to_vec());
            }
            Ok(values)
        })
        .await??;

        let mut itineraries = Vec::with_capacity(raw.len());
        for bytes in raw {
            itineraries.push(postcard::from_bytes::<Itinerary>(&bytes)?);
        }
        itineraries.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        debug!(count = itineraries.len(), "listed itineraries");
        Ok(itineraries)
    }

    /// Rename a stored itinerary. Returns false when the record is absent.
    pub async fn rename(&self, owner: &str, id: &str, title: &str) -> Result<bool> {
        let Some(mut itinerary) = self.fetch(owner, id).await? else {
            return Ok(false);
        };
        if title.trim().is_empty() {
            return Err(anyhow!("Title cannot be empty"));
        }
        itinerary.title = title.trim().to_string();
        self.save(&itinerary).await?;
        Ok(true)
    }

    /// Delete a stored itinerary. Returns false when the record is absent.
    pub async fn delete(&self, owner: &str, id: &str) -> Result<bool> {
        let existing = self.fetch(owner, id).await?;
        if existing.is_none() {
            return Ok(false);
        }

        let store = self.store.clone();
        let key = record_key(owner, id);
        task::spawn_blocking(move || store.remove(key)).await??;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CityMove, CityPlan, CityResult, GenerationSource, RoutePlan, RoutingResult, TripSummary,
    };
    use chrono::{NaiveDate, TimeZone, Utc};

    fn itinerary(owner: &str, id: &str, created_offset_secs: i64) -> Itinerary {
        Itinerary {
            id: id.to_string(),
            owner: owner.to_string(),
            title: format!("Trip {id}"),
            summary: TripSummary {
                origin: "Boston".to_string(),
                start_date: NaiveDate::from_ymd_opt(2026, 6, 20).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 6, 24).unwrap(),
                nights: 4,
                adults: 2,
                children: 0,
                seniors: 0,
                nights_per_city: 2,
                moves: vec![CityMove {
                    from: "Boston".to_string(),
                    to: "Houston".to_string(),
                }],
            },
            routing: RoutingResult {
                source: GenerationSource::Fallback,
                plan: RoutePlan { options: vec![] },
            },
            cities: vec![CityResult {
                city: "Houston".to_string(),
                source: GenerationSource::Fallback,
                plan: CityPlan {
                    city: "Houston".to_string(),
                    overview: "ok".to_string(),
                    lodging: vec![],
                    getting_around: vec![],
                    daily_tips: vec![],
                    watchouts: vec![],
                },
            }],
            created_at: Utc.timestamp_opt(1_750_000_000 + created_offset_secs, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_save_and_fetch_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ItineraryStore::open(dir.path()).unwrap();

        let record = itinerary("alice", "t1", 0);
        store.save(&record).await.unwrap();

        let fetched = store.fetch("alice", "t1").await.unwrap().unwrap();
        assert_eq!(fetched, record);
        assert!(store.fetch("alice", "missing").await.unwrap().is_none());
        assert!(store.fetch("bob", "t1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_owner_and_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = ItineraryStore::open(dir.path()).unwrap();

        store.save(&itinerary("alice", "old", 0)).await.unwrap();
        store.save(&itinerary("alice", "new", 100)).await.unwrap();
        store.save(&itinerary("bob", "other", 50)).await.unwrap();

        let listed = store.list_for_owner("alice").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "new");
        assert_eq!(listed[1].id, "old");
    }

    #[tokio::test]
    async fn test_rename() {
        let dir = tempfile::tempdir().unwrap();
        let store = ItineraryStore::open(dir.path()).unwrap();

        store.save(&itinerary("alice", "t1", 0)).await.unwrap();
        assert!(store.rename("alice", "t1", "Summer trip").await.unwrap());
        assert_eq!(
            store.fetch("alice", "t1").await.unwrap().unwrap().title,
            "Summer trip"
        );
        assert!(!store.rename("alice", "missing", "x").await.unwrap());
        assert!(store.rename("alice", "t1", "  ").await.is_err());
    }

    #[tokio::test]
    async fn test_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = ItineraryStore::open(dir.path()).unwrap();

        store.save(&itinerary("alice", "t1", 0)).await.unwrap();
        assert!(store.delete("alice", "t1").await.unwrap());
        assert!(store.fetch("alice", "t1").await.unwrap().is_none());
        assert!(!store.delete("alice", "t1").await.unwrap());
    }
}
