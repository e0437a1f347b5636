use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing::info;

use crate::cache::ActiveIncidentCache;
use crate::config::AppConfig;
use crate::service::{IncidentService, LocationService};

pub mod auth;
pub mod incidents;
pub mod location;

/// Route table. The static `/incidents/...` paths are registered before the
/// `{id}` matcher so they are not captured as identifiers.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(location::health)
        .service(location::check)
        .service(incidents::active)
        .service(incidents::stats)
        .service(incidents::create)
        .service(incidents::list)
        .service(incidents::get_by_id)
        .service(incidents::update)
        .service(incidents::remove);
}

pub async fn run_server(
    config: &AppConfig,
    incident_service: IncidentService,
    location_service: LocationService,
    cache: Arc<ActiveIncidentCache>,
) -> anyhow::Result<()> {
    let port = config.server_port;
    let token = web::Data::new(auth::ApiToken::new(config.api_key.clone()));
    let incident_service = web::Data::new(incident_service);
    let location_service = web::Data::new(location_service);
    let cache = web::Data::from(cache);

    info!("Server starting on port {}", port);
    HttpServer::new(move || {
        App::new()
            .app_data(token.clone())
            .app_data(incident_service.clone())
            .app_data(location_service.clone())
            .app_data(cache.clone())
            .configure(routes)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await?;

    Ok(())
}
