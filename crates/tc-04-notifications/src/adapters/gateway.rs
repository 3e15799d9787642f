//! `NotificationBackend` over the gateway's REST client.

use crate::domain::NotificationError;
use crate::ports::NotificationBackend;
use async_trait::async_trait;
use shared_types::notification::NotificationEvent;
use tc_03_gateway_client::NotificationApi;

#[async_trait]
impl NotificationBackend for NotificationApi {
    async fn list_mine(&self) -> Result<Vec<NotificationEvent>, NotificationError> {
        Ok(NotificationApi::list_mine(self).await?)
    }

    async fn list_unread(&self) -> Result<Vec<NotificationEvent>, NotificationError> {
        Ok(self.unread().await?)
    }

    async fn unread_count(&self) -> Result<u64, NotificationError> {
        Ok(NotificationApi::unread_count(self).await?)
    }

    async fn mark_read(&self, id: i64) -> Result<NotificationEvent, NotificationError> {
        Ok(NotificationApi::mark_read(self, id).await?)
    }

    async fn mark_all_read(&self) -> Result<(), NotificationError> {
        Ok(NotificationApi::mark_all_read(self).await?)
    }
}
