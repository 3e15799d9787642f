//! # Notification Events
//!
//! Notification entity as produced by the notification service, both over the
//! STOMP channel and through the REST endpoints.

use serde::{Deserialize, Serialize};

/// Notification categories emitted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    ClaimApproved,
    ClaimRejected,
    ClaimUnderReview,
    ClaimSettled,
    SystemNotification,
}

impl NotificationType {
    /// Short glyph shown next to the message in toasts and listings.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::ClaimApproved => "✅",
            Self::ClaimRejected => "❌",
            Self::ClaimUnderReview => "🔍",
            Self::ClaimSettled => "💰",
            Self::SystemNotification => "🔔",
        }
    }
}

/// Read state of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationStatus {
    Unread,
    Read,
}

/// A single notification addressed to the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    /// Backend identifier; unique per notification.
    pub id: i64,
    /// Recipient (identity provider subject).
    pub user_id: String,
    /// Claim the notification refers to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_number: Option<String>,
    /// Human-readable text.
    pub message: String,
    /// Category.
    #[serde(rename = "type")]
    pub kind: NotificationType,
    /// Read state.
    pub status: NotificationStatus,
    /// Creation timestamp (ISO-8601 as sent by the backend).
    pub created_at: String,
    /// When the notification was acknowledged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<String>,
}

impl NotificationEvent {
    #[must_use]
    pub fn is_unread(&self) -> bool {
        self.status == NotificationStatus::Unread
    }

    /// Toast line: icon followed by the message.
    #[must_use]
    pub fn toast_text(&self) -> String {
        format!("{} {}", self.kind.icon(), self.message)
    }
}
