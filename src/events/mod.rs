//! Event bus for catalog notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::EventsConfig;

/// Catalog-related events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CatalogEvent {
    /// An authenticated caller hit the secure ping endpoint. `subject` is the
    /// token's `sub`, when it has one.
    SecurePing { subject: Option<String> },

    /// A catalog record was created
    CatalogCreated { poi: String },

    /// A catalog record was updated
    CatalogUpdated { poi: String },

    /// A catalog record was deleted
    CatalogDeleted { poi: String },
}

/// What actually travels on the topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: Uuid,
    pub topic: String,
    pub published_at: DateTime<Utc>,
    pub event: CatalogEvent,
}

/// Event bus for broadcasting events to a named topic
pub struct EventBus {
    topic: String,
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new event bus with specified capacity
    pub fn new(topic: impl Into<String>, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { topic: topic.into(), sender }
    }

    pub fn from_config(config: &EventsConfig) -> Self {
        Self::new(config.topic.clone(), config.channel_capacity)
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Publish an event. Fire-and-forget: never blocks and never fails the
    /// caller, even when nobody is subscribed.
    pub fn publish(&self, event: CatalogEvent) -> Uuid {
        let envelope = EventEnvelope {
            id: Uuid::new_v4(),
            topic: self.topic.clone(),
            published_at: Utc::now(),
            event,
        };
        let id = envelope.id;
        if self.sender.send(envelope).is_err() {
            tracing::debug!("No subscribers on topic {}; event {} dropped", self.topic, id);
        }
        id
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new("catalog-events", 1024)
    }
}

/// Drain the bus in the background: log every event and, when a webhook is
/// configured, POST it as JSON. Delivery failures are logged, not retried.
pub fn spawn_forwarder(bus: &EventBus, webhook_url: Option<String>) -> JoinHandle<()> {
    let mut receiver = bus.subscribe();
    let client = reqwest::Client::new();

    tokio::spawn(async move {
        loop {
            let envelope = match receiver.recv().await {
                Ok(envelope) => envelope,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Event forwarder lagged; {} events skipped", skipped);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };

            tracing::info!(topic = %envelope.topic, id = %envelope.id, event = ?envelope.event, "event published");

            if let Some(ref url) = webhook_url {
                match client.post(url).json(&envelope).send().await {
                    Ok(resp) if resp.status().is_success() => {}
                    Ok(resp) => tracing::warn!("Event {} delivery to {} returned {}", envelope.id, url, resp.status()),
                    Err(e) => tracing::warn!("Event {} delivery to {} failed: {}", envelope.id, url, e),
                }
            }
        }
    })
}
