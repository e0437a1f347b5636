use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::location_check::{LocationCheckRequest, LocationCheckResponse};
use crate::store::{IncidentRepository, LocationCheckRepository};
use crate::webhook::{Dispatcher, WebhookPayload};

/// Orchestrates one location check: proximity lookup, persistence, incident
/// linking, and webhook dispatch.
pub struct LocationService {
    incidents: Arc<dyn IncidentRepository>,
    checks: Arc<dyn LocationCheckRepository>,
    webhooks: Dispatcher,
}

impl LocationService {
    pub fn new(
        incidents: Arc<dyn IncidentRepository>,
        checks: Arc<dyn LocationCheckRepository>,
        webhooks: Dispatcher,
    ) -> Self {
        Self {
            incidents,
            checks,
            webhooks,
        }
    }

    pub async fn check_location(
        &self,
        req: &LocationCheckRequest,
    ) -> Result<LocationCheckResponse, AppError> {
        crate::service::validate_coordinates(req.latitude, req.longitude)?;

        // The store is the authoritative source for proximity matching; the
        // active-incident cache never feeds this path.
        let matches = self
            .incidents
            .find_nearby(req.latitude, req.longitude)
            .await?;

        let check = self
            .checks
            .create(&req.user_id, req.latitude, req.longitude)
            .await?;

        if !matches.is_empty() {
            let incident_ids: Vec<Uuid> = matches.iter().map(|i| i.id).collect();
            if let Err(e) = self.checks.link_to_incidents(check.id, &incident_ids).await {
                // The proximity answer is already computed; a failed link is
                // not worth failing the check over.
                warn!("failed to link location check {}: {}", check.id, e);
            }

            // Delivery runs on the dispatcher's pool with its own deadline;
            // the response does not wait for it.
            self.webhooks.dispatch(WebhookPayload::new(&check, &matches));
        }

        Ok(LocationCheckResponse {
            has_danger: !matches.is_empty(),
            incidents: matches,
        })
    }
}
