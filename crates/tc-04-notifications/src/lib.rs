//! # Notification Channel (tc-04)
//!
//! Live per-user notifications over STOMP 1.2 on a WebSocket, backed by the
//! notification service's REST endpoints for listing and acknowledging.
//!
//! ## Lifecycle
//!
//! ```text
//! connect(user_id)
//!     │
//!     ▼
//! CONNECT (Authorization: Bearer, heart-beat 4000,4000) ──→ CONNECTED
//!     │                                                        │
//!     │                              SUBSCRIBE /user/{id}/notifications
//!     │                                                        │
//!     │                              GET /api/notifications/my (seed)
//!     ▼                                                        ▼
//! MESSAGE ──→ NotificationStore[0] ──→ unread / latest ──→ ClientEvent bus
//!
//! socket closed / ERROR / heart-beat silence
//!     └──→ connected = false ──→ wait reconnect_delay ──→ CONNECT again
//! ```
//!
//! ## Heart-beats
//!
//! Outgoing heart-beats are bare `\n` frames at the negotiated interval. A
//! connection that stays silent for [`SILENCE_TOLERANCE`] times the negotiated
//! incoming interval is dropped and reconnected.
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  adapters/ - StompClient (tokio-tungstenite), NotificationApi   │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - NotificationChannelApi                     │
//! │  ports/outbound.rs - NotificationBackend                        │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  domain/frame.rs     - STOMP frame codec                        │
//! │  domain/heartbeat.rs - heart-beat negotiation                   │
//! │  domain/store.rs     - most-recent-first notification list      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use adapters::{StompClient, StompConfig, StompEvent};
pub use domain::heartbeat::SILENCE_TOLERANCE;
pub use domain::{Command, Frame, HeartBeat, NotificationError, NotificationStore, StompError};
pub use ports::{NotificationBackend, NotificationChannelApi};
pub use service::{user_destination, NotificationService};
