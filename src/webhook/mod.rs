use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, Semaphore};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::incident::Incident;
use crate::models::location_check::LocationCheck;

const QUEUE_CAPACITY: usize = 256;
const MAX_IN_FLIGHT: usize = 8;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Outbound notification body. Field names are the wire contract.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload {
    pub user_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub incidents: Vec<IncidentInfo>,
    pub checked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IncidentInfo {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
}

impl From<&Incident> for IncidentInfo {
    fn from(incident: &Incident) -> Self {
        Self {
            id: incident.id,
            title: incident.title.clone(),
            description: incident.description.clone(),
            latitude: incident.latitude,
            longitude: incident.longitude,
            radius: incident.radius,
        }
    }
}

impl WebhookPayload {
    pub fn new(check: &LocationCheck, incidents: &[Incident]) -> Self {
        Self {
            user_id: check.user_id.clone(),
            latitude: check.latitude,
            longitude: check.longitude,
            incidents: incidents.iter().map(IncidentInfo::from).collect(),
            checked_at: check.checked_at,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("webhook delivery deadline exceeded")]
    DeadlineExceeded,

    #[error("all {attempts} delivery attempts failed, last error: {last_error}")]
    AttemptsExhausted { attempts: u32, last_error: String },
}

/// Delivers one payload with bounded exponential-backoff retry. The whole
/// attempt sequence runs under a single deadline; expiry mid-wait abandons
/// the delivery instead of finishing the remaining attempts.
#[derive(Clone)]
pub struct Notifier {
    client: reqwest::Client,
    url: String,
    attempts: u32,
    base_delay: Duration,
    deadline: Duration,
}

impl Notifier {
    pub fn new(
        url: impl Into<String>,
        attempts: u32,
        base_delay: Duration,
        deadline: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
            attempts: attempts.max(1),
            base_delay,
            deadline,
        })
    }

    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        Self::new(
            config.webhook_url.clone(),
            config.webhook_retry_attempts,
            Duration::from_secs(config.webhook_retry_delay_secs),
            Duration::from_secs(config.webhook_timeout_secs),
        )
    }

    pub async fn send(&self, payload: &WebhookPayload) -> Result<(), NotifyError> {
        match tokio::time::timeout(self.deadline, self.deliver(payload)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(NotifyError::DeadlineExceeded),
        }
    }

    async fn deliver(&self, payload: &WebhookPayload) -> Result<(), NotifyError> {
        let mut last_error = String::new();
        for attempt in 1..=self.attempts {
            if attempt > 1 {
                // base_delay, 2x base_delay, 4x base_delay, ...
                let delay = self.base_delay * 2u32.pow(attempt - 2);
                tokio::time::sleep(delay).await;
            }
            match self.post(payload).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!("webhook attempt {}/{} failed: {}", attempt, self.attempts, e);
                    last_error = e.to_string();
                }
            }
        }
        Err(NotifyError::AttemptsExhausted {
            attempts: self.attempts,
            last_error,
        })
    }

    async fn post(&self, payload: &WebhookPayload) -> anyhow::Result<()> {
        let response = self.client.post(&self.url).json(payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("webhook target returned status {}", status);
        }
        Ok(())
    }
}

/// Submission handle for the background delivery pool.
///
/// Deliveries run detached from the request that produced them, under the
/// notifier's own deadline. The queue is bounded and there is no durable
/// backing: a full queue drops the notification and a process exit loses
/// whatever is in flight.
#[derive(Clone)]
pub struct Dispatcher {
    tx: mpsc::Sender<WebhookPayload>,
}

impl Dispatcher {
    /// Spawn the delivery pool and return its submission handle.
    pub fn spawn(notifier: Notifier) -> Self {
        let (tx, mut rx) = mpsc::channel::<WebhookPayload>(QUEUE_CAPACITY);
        tokio::spawn(async move {
            let notifier = Arc::new(notifier);
            let permits = Arc::new(Semaphore::new(MAX_IN_FLIGHT));
            while let Some(payload) = rx.recv().await {
                let Ok(permit) = permits.clone().acquire_owned().await else {
                    break;
                };
                let notifier = notifier.clone();
                tokio::spawn(async move {
                    let _permit = permit;
                    match notifier.send(&payload).await {
                        Ok(()) => info!("webhook delivered for user {}", payload.user_id),
                        Err(e) => {
                            error!("webhook delivery failed for user {}: {}", payload.user_id, e)
                        }
                    }
                });
            }
        });
        Self { tx }
    }

    /// Queue a notification off the request path. Never blocks; drops the
    /// payload with a warning when the queue is full.
    pub fn dispatch(&self, payload: WebhookPayload) {
        if let Err(e) = self.tx.try_send(payload) {
            warn!("dropping webhook notification: {}", e);
        }
    }
}
