use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::geo;

/// A circular geofenced zone. `radius` is in meters.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Incident {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Incident {
    /// Whether the given point falls inside this incident's zone, using
    /// great-circle distance against the center.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        geo::distance_meters(self.latitude, self.longitude, latitude, longitude) <= self.radius
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateIncidentRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
}

/// Field mask for partial updates: only supplied fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateIncidentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius: Option<f64>,
    pub is_active: Option<bool>,
}

impl Incident {
    /// Apply a partial-update mask field by field.
    pub fn apply(&mut self, req: &UpdateIncidentRequest) {
        if let Some(title) = &req.title {
            self.title = title.clone();
        }
        if let Some(description) = &req.description {
            self.description = description.clone();
        }
        if let Some(latitude) = req.latitude {
            self.latitude = latitude;
        }
        if let Some(longitude) = req.longitude {
            self.longitude = longitude;
        }
        if let Some(radius) = req.radius {
            self.radius = radius;
        }
        if let Some(is_active) = req.is_active {
            self.is_active = is_active;
        }
    }
}
