mod cache;
mod config;
mod db;
mod error;
mod geo;
mod http;
mod models;
mod service;
mod store;
mod webhook;

use std::sync::Arc;

use cache::{ActiveIncidentCache, CacheInvalidation};
use config::AppConfig;
use service::{IncidentService, LocationService};
use store::{IncidentRepository, LocationCheckRepository, PgIncidentStore, PgLocationCheckStore};
use tracing::info;
use webhook::{Dispatcher, Notifier};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load config
    let config = AppConfig::load()?;

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .init();

    info!("Starting geo-alert service...");

    // Init DB
    let pool = db::init_pool(&config.database_url).await?;
    info!("Connected to database");

    let incident_store: Arc<dyn IncidentRepository> = Arc::new(PgIncidentStore::new(pool.clone()));
    let check_store: Arc<dyn LocationCheckRepository> = Arc::new(PgLocationCheckStore::new(pool));

    // Cache is optional infrastructure; a missing Redis only slows reads down.
    let cache = Arc::new(
        ActiveIncidentCache::connect(&config.redis_url, incident_store.clone()).await,
    );
    let invalidator: Arc<dyn CacheInvalidation> = cache.clone();

    let notifier = Notifier::from_config(&config)?;
    let dispatcher = Dispatcher::spawn(notifier);

    let incident_service =
        IncidentService::new(incident_store.clone(), invalidator, config.stats_window_minutes);
    let location_service = LocationService::new(incident_store, check_store, dispatcher);

    http::run_server(&config, incident_service, location_service, cache).await
}
