use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::incident::{CreateIncidentRequest, Incident};
use crate::models::location_check::{IncidentStats, LocationCheck};

pub mod checks;
pub mod incidents;

pub use checks::PgLocationCheckStore;
pub use incidents::PgIncidentStore;

/// Persistence contract for incident records.
#[async_trait]
pub trait IncidentRepository: Send + Sync {
    /// Persist a new incident, assigning identity and timestamps. New
    /// incidents start active.
    async fn create(&self, req: &CreateIncidentRequest) -> Result<Incident, AppError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Incident, AppError>;

    /// Page of incidents ordered by creation time, newest first.
    async fn get_all(&self, limit: i64, offset: i64) -> Result<Vec<Incident>, AppError>;

    async fn get_active(&self) -> Result<Vec<Incident>, AppError>;

    /// Full-record replace. Fails with NotFound when no row was affected.
    /// Returns the stored record with a fresh `updated_at`.
    async fn update(&self, id: Uuid, incident: &Incident) -> Result<Incident, AppError>;

    /// Soft delete: clears `is_active`, keeps the row and its links.
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;

    /// All active incidents whose zone contains the point, by great-circle
    /// distance.
    async fn find_nearby(&self, latitude: f64, longitude: f64) -> Result<Vec<Incident>, AppError>;

    /// Distinct-user counts per active incident over the trailing window,
    /// descending by count.
    async fn get_stats(&self, window_minutes: i64) -> Result<Vec<IncidentStats>, AppError>;
}

/// Persistence contract for location checks and their incident links.
#[async_trait]
pub trait LocationCheckRepository: Send + Sync {
    /// Persist a check, assigning identity and `checked_at`, with
    /// `webhook_sent` initialized to false.
    async fn create(
        &self,
        user_id: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<LocationCheck, AppError>;

    /// Idempotent bulk insert of (check, incident) pairs. No-op for empty
    /// input; atomic; duplicate pairs are silently ignored.
    async fn link_to_incidents(&self, check_id: Uuid, incident_ids: &[Uuid])
        -> Result<(), AppError>;
}
