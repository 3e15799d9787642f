//! Notification service REST endpoints (`/api/notifications`).

use crate::domain::GatewayError;
use crate::http::GatewayHttp;
use reqwest::Method;
use shared_types::notification::NotificationEvent;

const BASE: &str = "/api/notifications";

#[derive(Clone)]
pub struct NotificationApi {
    http: GatewayHttp,
}

impl NotificationApi {
    pub fn new(http: GatewayHttp) -> Self {
        Self { http }
    }

    /// All of the user's notifications, newest first as the service orders them.
    pub async fn list_mine(&self) -> Result<Vec<NotificationEvent>, GatewayError> {
        self.http.get_json(&format!("{BASE}/my")).await
    }

    pub async fn unread(&self) -> Result<Vec<NotificationEvent>, GatewayError> {
        self.http.get_json(&format!("{BASE}/my/unread")).await
    }

    pub async fn unread_count(&self) -> Result<u64, GatewayError> {
        self.http.get_json(&format!("{BASE}/my/unread/count")).await
    }

    /// Returns the updated notification.
    pub async fn mark_read(&self, id: i64) -> Result<NotificationEvent, GatewayError> {
        self.http
            .send_json(Method::PUT, &format!("{BASE}/{id}/read"), &serde_json::json!({}))
            .await
    }

    pub async fn mark_all_read(&self) -> Result<(), GatewayError> {
        self.http
            .send_unit(Method::PUT, &format!("{BASE}/read-all"), &serde_json::json!({}))
            .await
    }
}
