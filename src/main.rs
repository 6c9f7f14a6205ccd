use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use tripsmith::api::AppState;
use tripsmith::{
    HttpGenerativeBackend, ItineraryPipeline, ItineraryStore, ReferenceLibrary, TripsmithConfig,
    web,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = TripsmithConfig::load()?;
    init_tracing(&config);

    tracing::info!(
        backend = %config.generation.base_url,
        model = %config.generation.model,
        "starting tripsmith"
    );

    let store = ItineraryStore::open(expand_home(&config.store.location))
        .with_context(|| "Failed to open itinerary store")?;
    let library = Arc::new(ReferenceLibrary::load(&config.reference.docs_dir));
    let backend = Arc::new(HttpGenerativeBackend::new(config.generation.clone())?);
    let pipeline = Arc::new(ItineraryPipeline::new(
        backend,
        store.clone(),
        library,
        &config,
    ));

    let state = AppState { pipeline, store };
    web::run(config.server.port, state).await
}

fn init_tracing(config: &TripsmithConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    if config.logging.format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Expand a leading `~` to the user's home directory
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
