//! # Session Manager (tc-01)
//!
//! Owns the signed-in user's session: authenticates against the identity
//! provider, extracts realm roles from the access token, keeps the token
//! fresh, and exposes the result as observable state.
//!
//! ## Lifecycle
//!
//! ```text
//!            boot(safety_timeout)
//!                    │
//!        ┌───────────┴────────────┐
//!        ▼                        ▼
//!   initialize()             safety timer
//!   (check_sso)                   │
//!        │                        ▼
//!   ┌────┴─────┐            /auth/login
//!   ▼          ▼
//! tokens     none ──→ /auth/login (unless already on /auth/*)
//!   │
//!   ▼
//! establish: persist → roles → profile → schedule refresh → redirect by role
//!   │                                          │
//!   │                    exp - min_validity ───┘
//!   ▼                                ▼
//! logout() ◄── refresh failed ── handle_token_expired()
//! ```
//!
//! | Roles contain | Landing route |
//! |---------------|---------------|
//! | `admin` (any case) | `/hello-admin` |
//! | `user` | `/dashboard` |
//! | neither | `/dashboard` |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  adapters/ - KeycloakProvider (reqwest), File/Memory stores     │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - SessionApi                                 │
//! │  ports/outbound.rs - IdentityProvider, TokenStore, TimeSource   │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  domain/session.rs - Session (tokens, claims, profile)          │
//! │  domain/jwt.rs     - payload decoding, realm roles              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `SessionManager` also implements `TokenSource` (for the gateway's auth
//! layer) and `SessionView` (for route guards).

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use adapters::{FileTokenStore, KeycloakConfig, KeycloakProvider, MemoryTokenStore};
pub use domain::{AccessClaims, Session, SessionError};
pub use ports::{BootOutcome, IdentityProvider, SessionApi, SystemTimeSource, TimeSource, TokenStore};
pub use service::{SessionConfig, SessionDependencies, SessionManager};
