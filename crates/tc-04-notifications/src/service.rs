//! # Notification Service
//!
//! Application service implementing `NotificationChannelApi`.
//!
//! The live channel is a [`StompClient`] whose events are drained by a pump
//! task. Pushed notifications go to the front of the [`NotificationStore`];
//! the REST listing is fetched after each CONNECTED and merged in. Mutations
//! through REST touch local state only after the backend accepted them.

use crate::adapters::{StompClient, StompConfig, StompEvent};
use crate::domain::{NotificationError, NotificationStore};
use crate::ports::{NotificationBackend, NotificationChannelApi};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use shared_bus::{ClientEvent, EventPublisher, StateCell};
use shared_types::notification::NotificationEvent;
use shared_types::ports::TokenSource;
use std::sync::{Arc, Weak};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

const EVENT_BUFFER: usize = 64;

/// STOMP destination carrying a user's notifications.
#[must_use]
pub fn user_destination(user_id: &str) -> String {
    format!("/user/{user_id}/notifications")
}

struct Channel {
    user_id: String,
    client: StompClient,
    pump: JoinHandle<()>,
}

pub struct NotificationService {
    backend: Arc<dyn NotificationBackend>,
    tokens: Arc<dyn TokenSource>,
    bus: Arc<dyn EventPublisher>,
    config: StompConfig,

    store: Mutex<NotificationStore>,
    notifications: StateCell<Vec<NotificationEvent>>,
    unread: StateCell<usize>,
    connected: StateCell<bool>,
    latest: StateCell<Option<NotificationEvent>>,

    channel: Mutex<Option<Channel>>,
    me: Weak<NotificationService>,
}

impl NotificationService {
    pub fn new(
        backend: Arc<dyn NotificationBackend>,
        tokens: Arc<dyn TokenSource>,
        bus: Arc<dyn EventPublisher>,
        config: StompConfig,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            backend,
            tokens,
            bus,
            config,
            store: Mutex::new(NotificationStore::new()),
            notifications: StateCell::default(),
            unread: StateCell::new(0),
            connected: StateCell::new(false),
            latest: StateCell::default(),
            channel: Mutex::new(None),
            me: me.clone(),
        })
    }

    pub fn watch_notifications(&self) -> watch::Receiver<Vec<NotificationEvent>> {
        self.notifications.subscribe()
    }

    pub fn watch_unread_count(&self) -> watch::Receiver<usize> {
        self.unread.subscribe()
    }

    pub fn watch_connected(&self) -> watch::Receiver<bool> {
        self.connected.subscribe()
    }

    /// Most recent pushed notification.
    pub fn watch_latest(&self) -> watch::Receiver<Option<NotificationEvent>> {
        self.latest.subscribe()
    }

    #[must_use]
    pub fn latest(&self) -> Option<NotificationEvent> {
        self.latest.get()
    }

    /// Unread notifications straight from the backend. Local state is not
    /// touched.
    pub async fn fetch_unread(&self) -> Result<Vec<NotificationEvent>, NotificationError> {
        self.backend.list_unread().await
    }

    /// Unread count straight from the backend.
    pub async fn fetch_unread_count(&self) -> Result<u64, NotificationError> {
        self.backend.unread_count().await
    }

    /// Drop every local notification (used on logout).
    pub fn clear(&self) {
        let mut store = self.store.lock();
        store.clear();
        self.publish_state(&store);
        self.latest.set(None);
    }

    fn publish_state(&self, store: &NotificationStore) {
        self.notifications.set(store.items().to_vec());
        self.unread.set(store.unread_count());
    }

    async fn handle(&self, event: StompEvent, user_id: &str) {
        match event {
            StompEvent::Connected { heartbeat } => {
                debug!(user_id, ?heartbeat, "Notification channel up");
                self.connected.set(true);
                self.bus
                    .publish(ClientEvent::ChannelConnected {
                        user_id: user_id.to_string(),
                    })
                    .await;
                if let Err(e) = self.load_notifications().await {
                    warn!(error = %e, "Initial notification fetch failed");
                }
            }
            StompEvent::Message { destination, body } => {
                match serde_json::from_str::<NotificationEvent>(&body) {
                    Ok(event) => self.receive(event).await,
                    Err(e) => warn!(error = %e, destination, "Dropping malformed notification"),
                }
            }
            StompEvent::Error(message) => {
                warn!(error = %message, "Notification channel error");
                self.connected.set(false);
            }
            StompEvent::Disconnected { reason } => {
                info!(reason = %reason, "Notification channel down");
                self.connected.set(false);
                self.bus
                    .publish(ClientEvent::ChannelDisconnected { reason })
                    .await;
            }
        }
    }

    async fn receive(&self, event: NotificationEvent) {
        info!(id = event.id, kind = ?event.kind, "Notification received");
        {
            let mut store = self.store.lock();
            store.push(event.clone());
            self.publish_state(&store);
        }
        self.latest.set(Some(event.clone()));
        self.bus
            .publish(ClientEvent::NotificationReceived(event))
            .await;
    }
}

#[async_trait]
impl NotificationChannelApi for NotificationService {
    fn connect(&self, user_id: &str) -> Result<(), NotificationError> {
        if user_id.is_empty() {
            return Err(NotificationError::MissingUserId);
        }

        let mut channel = self.channel.lock();
        if let Some(active) = channel.as_ref() {
            if active.client.is_running() {
                debug!(user_id = %active.user_id, "Notification channel already active");
                return Ok(());
            }
            active.pump.abort();
        }

        let (event_tx, mut event_rx) = mpsc::channel(EVENT_BUFFER);
        let mut client = StompClient::new(self.config.clone(), self.tokens.clone());
        client.start(user_destination(user_id), event_tx);

        let me = self.me.clone();
        let owner = user_id.to_string();
        let pump = tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                let Some(service) = me.upgrade() else {
                    break;
                };
                service.handle(event, &owner).await;
            }
        });

        info!(user_id, url = %self.config.url, "Notification channel starting");
        *channel = Some(Channel {
            user_id: user_id.to_string(),
            client,
            pump,
        });
        Ok(())
    }

    async fn disconnect(&self) {
        let Some(mut channel) = self.channel.lock().take() else {
            return;
        };
        channel.client.stop().await;
        if let Err(e) = channel.pump.await {
            warn!(error = %e, "Notification pump ended abnormally");
        }
        self.connected.set(false);
        info!(user_id = %channel.user_id, "Notification channel closed");
    }

    #[instrument(skip(self))]
    async fn load_notifications(&self) -> Result<usize, NotificationError> {
        let fetched = self.backend.list_mine().await?;
        let mut store = self.store.lock();
        store.seed(fetched);
        self.publish_state(&store);
        debug!(count = store.len(), unread = store.unread_count(), "Notifications loaded");
        Ok(store.len())
    }

    async fn mark_as_read(&self, id: i64) -> Result<NotificationEvent, NotificationError> {
        let updated = self.backend.mark_read(id).await?;
        let mut store = self.store.lock();
        if !store.replace(updated.clone()) {
            debug!(id, "Marked a notification that is not held locally");
        }
        self.publish_state(&store);
        Ok(updated)
    }

    async fn mark_all_as_read(&self) -> Result<(), NotificationError> {
        self.backend.mark_all_read().await?;
        let read_at = Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string();
        let mut store = self.store.lock();
        store.mark_all_read(&read_at);
        self.publish_state(&store);
        Ok(())
    }

    fn notifications(&self) -> Vec<NotificationEvent> {
        self.store.lock().items().to_vec()
    }

    fn unread_count(&self) -> usize {
        self.store.lock().unread_count()
    }

    fn is_connected(&self) -> bool {
        self.connected.get()
    }
}
