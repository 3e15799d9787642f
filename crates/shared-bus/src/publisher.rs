//! # Event Publisher
//!
//! Publishing side of the client bus.

use crate::events::{ClientEvent, EventFilter};
use crate::subscriber::Subscription;
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Anything that can announce a `ClientEvent`.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Returns how many subscribers the event reached.
    async fn publish(&self, event: ClientEvent) -> usize;

    fn events_published(&self) -> u64;
}

/// Process-local bus over a `tokio::sync::broadcast` channel.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<ClientEvent>,
    published: AtomicU64,
}

impl InMemoryEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// `capacity` events are buffered per subscriber before the oldest are
    /// skipped.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            published: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, "New subscription");
        Subscription::new(self.sender.subscribe(), filter)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: ClientEvent) -> usize {
        let topic = event.topic();
        let source = event.source();
        self.published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(?topic, source, receivers, "Event published");
                receivers
            }
            Err(_) => {
                trace!(?topic, source, "Event dropped (no receivers)");
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}
