use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::db::{queries, DbPool};
use crate::error::AppError;
use crate::models::incident::{CreateIncidentRequest, Incident};
use crate::models::location_check::IncidentStats;

use super::IncidentRepository;

/// Postgres-backed incident store.
#[derive(Clone)]
pub struct PgIncidentStore {
    pool: DbPool,
}

impl PgIncidentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IncidentRepository for PgIncidentStore {
    async fn create(&self, req: &CreateIncidentRequest) -> Result<Incident, AppError> {
        let now = Utc::now();
        let incident = Incident {
            id: Uuid::new_v4(),
            title: req.title.clone(),
            description: req.description.clone(),
            latitude: req.latitude,
            longitude: req.longitude,
            radius: req.radius,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(queries::INSERT_INCIDENT)
            .bind(incident.id)
            .bind(&incident.title)
            .bind(&incident.description)
            .bind(incident.latitude)
            .bind(incident.longitude)
            .bind(incident.radius)
            .bind(incident.is_active)
            .bind(incident.created_at)
            .bind(incident.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(incident)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Incident, AppError> {
        sqlx::query_as::<_, Incident>(queries::SELECT_INCIDENT_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn get_all(&self, limit: i64, offset: i64) -> Result<Vec<Incident>, AppError> {
        let incidents = sqlx::query_as::<_, Incident>(queries::SELECT_INCIDENTS_PAGE)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(incidents)
    }

    async fn get_active(&self) -> Result<Vec<Incident>, AppError> {
        let incidents = sqlx::query_as::<_, Incident>(queries::SELECT_ACTIVE_INCIDENTS)
            .fetch_all(&self.pool)
            .await?;
        Ok(incidents)
    }

    async fn update(&self, id: Uuid, incident: &Incident) -> Result<Incident, AppError> {
        let now = Utc::now();
        let result = sqlx::query(queries::UPDATE_INCIDENT)
            .bind(&incident.title)
            .bind(&incident.description)
            .bind(incident.latitude)
            .bind(incident.longitude)
            .bind(incident.radius)
            .bind(incident.is_active)
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        Ok(Incident {
            id,
            updated_at: now,
            ..incident.clone()
        })
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(queries::SOFT_DELETE_INCIDENT)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn find_nearby(&self, latitude: f64, longitude: f64) -> Result<Vec<Incident>, AppError> {
        // The active set is the query contract; the geodesic containment
        // test runs here so the same model backs storage and tests.
        let active = self.get_active().await?;
        Ok(active
            .into_iter()
            .filter(|incident| incident.contains(latitude, longitude))
            .collect())
    }

    async fn get_stats(&self, window_minutes: i64) -> Result<Vec<IncidentStats>, AppError> {
        let cutoff = Utc::now() - chrono::Duration::minutes(window_minutes);
        let stats = sqlx::query_as::<_, IncidentStats>(queries::SELECT_INCIDENT_STATS)
            .bind(cutoff)
            .fetch_all(&self.pool)
            .await?;
        Ok(stats)
    }
}
