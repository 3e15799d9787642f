//! # Route State
//!
//! Default `Navigator`: keeps the current route in a `StateCell` and
//! announces each change on the bus.

use crate::events::ClientEvent;
use crate::publisher::EventPublisher;
use crate::state::StateCell;
use async_trait::async_trait;
use shared_types::ports::Navigator;
use shared_types::routes::normalize_path;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

pub struct RouteState {
    current: StateCell<String>,
    bus: Arc<dyn EventPublisher>,
}

impl RouteState {
    /// Start at `initial` (normalized).
    pub fn new(initial: &str, bus: Arc<dyn EventPublisher>) -> Self {
        Self {
            current: StateCell::new(normalize_path(initial)),
            bus,
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.current.subscribe()
    }
}

#[async_trait]
impl Navigator for RouteState {
    async fn navigate(&self, route: &str) {
        let to = normalize_path(route);
        let from = self.current.get();
        if from == to {
            return;
        }

        self.current.set(to.clone());
        debug!(from = %from, to = %to, "Navigated");
        self.bus.publish(ClientEvent::Navigated { from, to }).await;
    }

    fn current_route(&self) -> String {
        self.current.get()
    }
}
