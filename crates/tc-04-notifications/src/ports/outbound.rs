//! # Outbound Ports (Driven Ports / SPI)

use crate::domain::NotificationError;
use async_trait::async_trait;
use shared_types::notification::NotificationEvent;

/// REST side of the notification service.
#[async_trait]
pub trait NotificationBackend: Send + Sync {
    async fn list_mine(&self) -> Result<Vec<NotificationEvent>, NotificationError>;

    async fn list_unread(&self) -> Result<Vec<NotificationEvent>, NotificationError>;

    async fn unread_count(&self) -> Result<u64, NotificationError>;

    /// Returns the server's updated copy.
    async fn mark_read(&self, id: i64) -> Result<NotificationEvent, NotificationError>;

    async fn mark_all_read(&self) -> Result<(), NotificationError>;
}
