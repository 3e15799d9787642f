//! # Inbound Ports (Driving Ports / API)

use crate::domain::NotificationError;
use async_trait::async_trait;
use shared_types::notification::NotificationEvent;

/// Primary notification API.
#[async_trait]
pub trait NotificationChannelApi: Send + Sync {
    /// Open the channel for `user_id` and keep it open (reconnecting) until
    /// [`disconnect`](Self::disconnect). A second call while active is a no-op.
    fn connect(&self, user_id: &str) -> Result<(), NotificationError>;

    /// Close the channel. Local state is kept.
    async fn disconnect(&self);

    /// Replace local state with the REST listing. Returns how many
    /// notifications are now held.
    async fn load_notifications(&self) -> Result<usize, NotificationError>;

    /// Mark one notification read. Local state changes only on success.
    async fn mark_as_read(&self, id: i64) -> Result<NotificationEvent, NotificationError>;

    /// Mark everything read. Local state changes only on success.
    async fn mark_all_as_read(&self) -> Result<(), NotificationError>;

    fn notifications(&self) -> Vec<NotificationEvent>;

    fn unread_count(&self) -> usize;

    fn is_connected(&self) -> bool;
}
