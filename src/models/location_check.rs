use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::incident::Incident;

/// One user-submitted coordinate sample. Immutable after insert; the
/// `webhook_sent` flag is written once at creation and marks that a
/// notification was attempted, not that it was delivered.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LocationCheck {
    pub id: Uuid,
    pub user_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub checked_at: DateTime<Utc>,
    pub webhook_sent: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationCheckRequest {
    pub user_id: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize)]
pub struct LocationCheckResponse {
    pub has_danger: bool,
    pub incidents: Vec<Incident>,
}

/// Distinct users seen inside an incident zone over a trailing window.
/// Derived, never stored.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct IncidentStats {
    pub zone_id: Uuid,
    pub user_count: i64,
}
