//! # Trustify Client Runtime
//!
//! Wires the session manager, route guards, gateway clients and notification
//! channel into one client, and hosts the `trustify-client` binary.
//!
//! ## Control Flow
//!
//! ```text
//! boot ──→ SessionManager::boot (safety timer)
//!              │
//!              ├── authenticated ──→ landing route by role
//!              │                        │
//!              │                        └──→ notification link opens the channel
//!              │
//!              └── otherwise ──→ /auth/login
//!
//! navigate(path) ──→ Router ──→ guards ──→ RouteState
//! REST call      ──→ GatewayHttp ──→ AuthLayer (bearer) ──→ gateway
//! ```
//!
//! ## Modules
//!
//! - `container/` - configuration and explicit component wiring
//! - `runtime` - boot sequence, notification link, shutdown

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod container;
pub mod runtime;

pub use container::{ClientConfig, ClientContainer, ConfigError, ContainerError};
pub use runtime::ClientRuntime;
