//! # Client Events
//!
//! Defines all event types that flow through the client bus. Producers are
//! the session manager (tc-01), the navigator, and the notification channel
//! (tc-04); the runtime and the CLI watch mode consume them.

use serde::{Deserialize, Serialize};
use shared_types::entities::RoleSet;
use shared_types::notification::NotificationEvent;

/// All events that can be published to the client bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClientEvent {
    // =========================================================================
    // TC-01: SESSION
    // =========================================================================
    /// A session became authenticated (silent re-auth or credential login).
    SessionEstablished {
        /// Preferred username from the access token, if present.
        username: Option<String>,
        /// Realm roles carried by the token.
        roles: RoleSet,
    },

    /// The access token was refreshed in the background.
    TokenRefreshed {
        /// New expiry, seconds since the Unix epoch.
        expires_at: i64,
    },

    /// The session was cleared.
    SessionCleared {
        /// Why: "logout", "refresh-failed", ...
        reason: String,
    },

    // =========================================================================
    // NAVIGATION
    // =========================================================================
    /// The current route changed.
    Navigated {
        from: String,
        to: String,
    },

    // =========================================================================
    // TC-04: NOTIFICATIONS
    // =========================================================================
    /// A notification was pushed over the live channel.
    NotificationReceived(NotificationEvent),

    /// The live channel completed its STOMP handshake.
    ChannelConnected {
        user_id: String,
    },

    /// The live channel dropped.
    ChannelDisconnected {
        reason: String,
    },
}

impl ClientEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::SessionEstablished { .. }
            | Self::TokenRefreshed { .. }
            | Self::SessionCleared { .. } => EventTopic::Session,
            Self::Navigated { .. } => EventTopic::Navigation,
            Self::NotificationReceived(_)
            | Self::ChannelConnected { .. }
            | Self::ChannelDisconnected { .. } => EventTopic::Notifications,
        }
    }

    /// Name of the component that emits this event.
    #[must_use]
    pub fn source(&self) -> &'static str {
        match self.topic() {
            EventTopic::Session => "tc-01-session",
            EventTopic::Navigation => "navigator",
            EventTopic::Notifications | EventTopic::All => "tc-04-notifications",
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Session lifecycle.
    Session,
    /// Route changes.
    Navigation,
    /// Live notification channel.
    Notifications,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &ClientEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}
