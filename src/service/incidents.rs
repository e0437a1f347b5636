use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::cache::CacheInvalidation;
use crate::error::AppError;
use crate::models::incident::{CreateIncidentRequest, Incident, UpdateIncidentRequest};
use crate::models::location_check::IncidentStats;
use crate::store::IncidentRepository;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// Validates and mutates incidents. Every mutation goes through the
/// invalidation port so cached readers converge on the next read.
pub struct IncidentService {
    store: Arc<dyn IncidentRepository>,
    cache: Arc<dyn CacheInvalidation>,
    default_stats_window: i64,
}

impl IncidentService {
    pub fn new(
        store: Arc<dyn IncidentRepository>,
        cache: Arc<dyn CacheInvalidation>,
        default_stats_window: i64,
    ) -> Self {
        Self {
            store,
            cache,
            default_stats_window,
        }
    }

    pub async fn create_incident(&self, req: &CreateIncidentRequest) -> Result<Incident, AppError> {
        super::validate_coordinates(req.latitude, req.longitude)?;
        super::validate_radius(req.radius)?;

        let incident = self.store.create(req).await?;
        self.cache.invalidate().await;

        info!("Created incident {} ({})", incident.id, incident.title);
        Ok(incident)
    }

    pub async fn get_incident(&self, id: Uuid) -> Result<Incident, AppError> {
        self.store.get_by_id(id).await
    }

    /// Page of incidents plus the normalized pagination values actually used.
    pub async fn list_incidents(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<Incident>, i64, i64), AppError> {
        let (page, page_size) = normalize_pagination(page, page_size);
        let offset = (page - 1) * page_size;
        let incidents = self.store.get_all(page_size, offset).await?;
        Ok((incidents, page, page_size))
    }

    pub async fn update_incident(
        &self,
        id: Uuid,
        req: &UpdateIncidentRequest,
    ) -> Result<Incident, AppError> {
        let mut incident = self.store.get_by_id(id).await?;
        incident.apply(req);

        // Re-validate only what the mask touched.
        if req.latitude.is_some() || req.longitude.is_some() {
            super::validate_coordinates(incident.latitude, incident.longitude)?;
        }
        if req.radius.is_some() {
            super::validate_radius(incident.radius)?;
        }

        let updated = self.store.update(id, &incident).await?;
        self.cache.invalidate().await;
        Ok(updated)
    }

    pub async fn delete_incident(&self, id: Uuid) -> Result<(), AppError> {
        self.store.delete(id).await?;
        self.cache.invalidate().await;
        info!("Soft-deleted incident {}", id);
        Ok(())
    }

    /// Distinct-user stats over the trailing window. A supplied window must
    /// be positive; an absent one falls back to the configured default.
    pub async fn get_stats(&self, minutes: Option<i64>) -> Result<Vec<IncidentStats>, AppError> {
        let window = match minutes {
            Some(m) if m <= 0 => {
                return Err(AppError::InvalidInput("minutes must be positive".to_string()))
            }
            Some(m) => m,
            None => self.default_stats_window,
        };
        self.store.get_stats(window).await
    }
}

fn normalize_pagination(page: i64, page_size: i64) -> (i64, i64) {
    let page = if page < 1 { 1 } else { page };
    let page_size = if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        DEFAULT_PAGE_SIZE
    } else {
        page_size
    };
    (page, page_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryIncidentStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingInvalidator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CacheInvalidation for CountingInvalidator {
        async fn invalidate(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn service() -> (IncidentService, Arc<MemoryIncidentStore>, Arc<CountingInvalidator>) {
        let store = Arc::new(MemoryIncidentStore::default());
        let cache = Arc::new(CountingInvalidator::default());
        let svc = IncidentService::new(store.clone(), cache.clone(), 60);
        (svc, store, cache)
    }

    fn request() -> CreateIncidentRequest {
        CreateIncidentRequest {
            title: "Test".to_string(),
            description: "Test description".to_string(),
            latitude: 55.7558,
            longitude: 37.6173,
            radius: 100.0,
        }
    }

    #[tokio::test]
    async fn create_persists_and_invalidates() {
        let (svc, store, cache) = service();

        let incident = svc.create_incident(&request()).await.unwrap();
        assert!(incident.is_active);
        assert_eq!(incident.title, "Test");
        assert_eq!(store.incidents.lock().unwrap().len(), 1);
        assert_eq!(cache.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn create_rejects_invalid_latitude() {
        let (svc, store, cache) = service();

        let err = svc
            .create_incident(&CreateIncidentRequest {
                latitude: 100.0,
                ..request()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidCoordinates));
        assert!(store.incidents.lock().unwrap().is_empty());
        assert_eq!(cache.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn create_rejects_non_positive_radius() {
        let (svc, _, _) = service();

        let err = svc
            .create_incident(&CreateIncidentRequest {
                radius: -10.0,
                ..request()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidRadius));
    }

    #[tokio::test]
    async fn update_patches_only_supplied_fields() {
        let (svc, _, cache) = service();
        let created = svc.create_incident(&request()).await.unwrap();

        let updated = svc
            .update_incident(
                created.id,
                &UpdateIncidentRequest {
                    title: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.radius, created.radius);
        assert_eq!(updated.latitude, created.latitude);
        assert_eq!(cache.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn update_revalidates_masked_radius() {
        let (svc, _, _) = service();
        let created = svc.create_incident(&request()).await.unwrap();

        let err = svc
            .update_incident(
                created.id,
                &UpdateIncidentRequest {
                    radius: Some(0.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidRadius));
    }

    #[tokio::test]
    async fn update_revalidates_masked_coordinates() {
        let (svc, _, _) = service();
        let created = svc.create_incident(&request()).await.unwrap();

        let err = svc
            .update_incident(
                created.id,
                &UpdateIncidentRequest {
                    longitude: Some(181.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidCoordinates));
    }

    #[tokio::test]
    async fn update_unknown_incident_is_not_found() {
        let (svc, _, cache) = service();

        let err = svc
            .update_incident(Uuid::new_v4(), &UpdateIncidentRequest::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound));
        assert_eq!(cache.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn delete_soft_deletes_and_invalidates() {
        let (svc, store, cache) = service();
        let created = svc.create_incident(&request()).await.unwrap();

        svc.delete_incident(created.id).await.unwrap();

        let stored = store.incidents.lock().unwrap();
        assert_eq!(stored.len(), 1, "soft delete keeps the row");
        assert!(!stored[0].is_active);
        assert_eq!(cache.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn pagination_normalizes_page_and_size() {
        assert_eq!(normalize_pagination(-3, 50), (1, 50));
        assert_eq!(normalize_pagination(0, 20), (1, 20));
        assert_eq!(normalize_pagination(2, 0), (2, 20));
        assert_eq!(normalize_pagination(2, 101), (2, 20));
        assert_eq!(normalize_pagination(1, 100), (1, 100));
        assert_eq!(normalize_pagination(1, 1), (1, 1));
    }

    #[tokio::test]
    async fn stats_rejects_non_positive_window() {
        let (svc, _, _) = service();

        let err = svc.get_stats(Some(0)).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let err = svc.get_stats(Some(-5)).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn stats_defaults_to_configured_window() {
        let (svc, _, _) = service();
        assert!(svc.get_stats(None).await.unwrap().is_empty());
    }
}
