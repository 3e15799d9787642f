//! # Trustify Client Test Suite
//!
//! Cross-crate flows that wire the real components together against a fake
//! gateway (axum) and a fake STOMP broker.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs          # fake gateway, client harness
//!     ├── session_flow.rs      # login, bearer attachment, logout, token file
//!     ├── navigation_flow.rs   # guards against live session and profile
//!     └── notification_flow.rs # session-driven live channel
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p tc-tests
//! cargo test -p tc-tests integration::navigation_flow
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod integration;
