use std::sync::Arc;

use async_trait::async_trait;
use bb8_redis::bb8;
use bb8_redis::redis::AsyncCommands;
use bb8_redis::RedisConnectionManager;
use tracing::warn;

use crate::error::AppError;
use crate::models::incident::Incident;
use crate::store::IncidentRepository;

const ACTIVE_INCIDENTS_KEY: &str = "active_incidents";
const CACHE_TTL_SECS: u64 = 300;

pub type RedisPool = bb8::Pool<RedisConnectionManager>;

/// Invalidation port for the active-incident cache. Every incident mutation
/// calls this so the next read observes fresh data; without it staleness is
/// bounded by the TTL.
#[async_trait]
pub trait CacheInvalidation: Send + Sync {
    async fn invalidate(&self);
}

/// Read-through cache of the active-incident set under a single fixed key.
///
/// Redis is optional infrastructure: when it is absent or unreachable every
/// read falls through to the incident store and the service stays correct,
/// just slower. Cache failures never fail the read path.
pub struct ActiveIncidentCache {
    redis: Option<RedisPool>,
    store: Arc<dyn IncidentRepository>,
}

impl ActiveIncidentCache {
    pub async fn connect(redis_url: &str, store: Arc<dyn IncidentRepository>) -> Self {
        let redis = match Self::open_pool(redis_url).await {
            Ok(pool) => Some(pool),
            Err(e) => {
                warn!(
                    "Redis unavailable, running without active-incident cache: {}",
                    e
                );
                None
            }
        };
        Self { redis, store }
    }

    #[cfg(test)]
    pub fn disabled(store: Arc<dyn IncidentRepository>) -> Self {
        Self { redis: None, store }
    }

    async fn open_pool(redis_url: &str) -> anyhow::Result<RedisPool> {
        let manager = RedisConnectionManager::new(redis_url)?;
        let pool = bb8::Pool::builder().max_size(8).build(manager).await?;
        // Take one connection up front so a dead Redis is caught at startup.
        pool.get().await?;
        Ok(pool)
    }

    pub async fn get_active(&self) -> Result<Vec<Incident>, AppError> {
        if let Some(pool) = &self.redis {
            match Self::read_cached(pool).await {
                Ok(Some(incidents)) => return Ok(incidents),
                Ok(None) => {}
                Err(e) => warn!("active-incident cache read failed: {}", e),
            }
        }

        let incidents = self.store.get_active().await?;

        if let Some(pool) = &self.redis {
            if let Err(e) = Self::write_cached(pool, &incidents).await {
                warn!("active-incident cache repopulation failed: {}", e);
            }
        }

        Ok(incidents)
    }

    async fn read_cached(pool: &RedisPool) -> anyhow::Result<Option<Vec<Incident>>> {
        let mut conn = pool.get().await?;
        let cached: Option<String> = conn.get(ACTIVE_INCIDENTS_KEY).await?;
        let Some(raw) = cached else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(incidents) => Ok(Some(incidents)),
            Err(e) => {
                // Treat an undecodable entry as a miss; the store is the
                // source of truth and the entry gets rewritten below.
                warn!("discarding undecodable active-incident cache entry: {}", e);
                Ok(None)
            }
        }
    }

    async fn write_cached(pool: &RedisPool, incidents: &[Incident]) -> anyhow::Result<()> {
        let payload = serde_json::to_string(incidents)?;
        let mut conn = pool.get().await?;
        let _: () = conn.set_ex(ACTIVE_INCIDENTS_KEY, payload, CACHE_TTL_SECS).await?;
        Ok(())
    }
}

#[async_trait]
impl CacheInvalidation for ActiveIncidentCache {
    async fn invalidate(&self) {
        let Some(pool) = &self.redis else {
            return;
        };
        match pool.get().await {
            Ok(mut conn) => {
                let deleted: Result<(), _> = conn.del(ACTIVE_INCIDENTS_KEY).await;
                if let Err(e) = deleted {
                    warn!("active-incident cache invalidation failed: {}", e);
                }
            }
            Err(e) => warn!("active-incident cache invalidation failed: {}", e),
        }
    }
}
