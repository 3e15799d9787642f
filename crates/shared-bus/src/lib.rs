//! # Shared Bus - Client Event Bus and Observable State
//!
//! Session, navigation, and notification components never call each other to
//! announce changes; they publish `ClientEvent`s here and expose their state
//! through `StateCell`s.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ SessionMgr   │                    │ Runtime/CLI  │
//! │ Notifications│    publish()       │              │
//! │ RouteState   │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! Events are fire-and-forget: a publish with no subscribers is not an error.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod navigation;
pub mod publisher;
pub mod state;
pub mod subscriber;

pub use events::{ClientEvent, EventFilter, EventTopic};
pub use navigation::RouteState;
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use state::StateCell;
pub use subscriber::{Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before old ones are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;
