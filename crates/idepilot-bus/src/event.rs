//! Topic-keyed publish/subscribe event bus

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Default per-topic channel capacity
const DEFAULT_CAPACITY: usize = 64;

/// An event published on the bus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusEvent {
    pub topic: String,
    pub payload: serde_json::Value,
}

impl BusEvent {
    pub fn new(topic: &str, payload: serde_json::Value) -> Self {
        Self {
            topic: topic.to_string(),
            payload,
        }
    }
}

/// Fire-and-forget publish/subscribe over named topics.
///
/// Each topic is backed by a broadcast channel created lazily on first
/// subscription. Publishing to a topic with no subscribers is not an error.
pub struct EventBus {
    channels: RwLock<HashMap<String, broadcast::Sender<BusEvent>>>,
    capacity: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Subscribe to a topic, creating its channel if needed.
    pub fn subscribe(&self, topic: &str) -> broadcast::Receiver<BusEvent> {
        let mut channels = self.channels.write().unwrap();
        let sender = channels.entry(topic.to_string()).or_insert_with(|| {
            debug!(topic, "event topic created");
            broadcast::channel(self.capacity).0
        });
        sender.subscribe()
    }

    /// Publish an event; returns the number of subscribers that received it.
    pub fn publish(&self, event: BusEvent) -> usize {
        let channels = self.channels.read().unwrap();
        match channels.get(&event.topic) {
            Some(sender) => {
                let topic = event.topic.clone();
                let delivered = sender.send(event).unwrap_or(0);
                trace!(topic = %topic, delivered, "event published");
                delivered
            }
            None => {
                trace!(topic = %event.topic, "event published with no subscribers");
                0
            }
        }
    }

    /// Number of topics with at least one past subscription.
    pub fn topic_count(&self) -> usize {
        let channels = self.channels.read().unwrap();
        channels.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
