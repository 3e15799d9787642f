//! # Cross-Crate Ports
//!
//! Capabilities one crate provides and another consumes. The session manager
//! implements `TokenSource` and `SessionView`; the gateway client implements
//! `ProfileLookup`; `shared-bus` provides the default `Navigator`.
//!
//! ```text
//! ┌──────────────┐  TokenSource   ┌───────────────────┐
//! │ tc-01        │ ─────────────→ │ tc-03 AuthService │
//! │ Session      │  SessionView   ├───────────────────┤
//! │ Manager      │ ─────────────→ │ tc-02 Guards      │ ←─ ProfileLookup ── tc-03
//! └──────────────┘                └───────────────────┘
//!        │ Navigator                       │ Navigator
//!        └──────────────→ shared-bus RouteState ←┘
//! ```

use crate::errors::ProfileLookupError;
use crate::profile::UserProfileResponse;
use async_trait::async_trait;

/// Supplies the current bearer token.
///
/// Implementations never block and never refresh; an empty string means
/// "no token".
pub trait TokenSource: Send + Sync {
    fn current_token(&self) -> String;
}

/// Read-only view of the session used by route guards.
pub trait SessionView: Send + Sync {
    fn is_authenticated(&self) -> bool;

    /// Case-insensitive role membership; false when unauthenticated.
    fn has_role(&self, role: &str) -> bool;
}

/// Fetches the current user's backend profile.
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    /// `Ok(None)` is never returned for a missing profile; that case is
    /// `Err(ProfileLookupError::NotFound)`. `Ok(None)` means the backend
    /// answered with an empty body.
    async fn current_profile(&self) -> Result<Option<UserProfileResponse>, ProfileLookupError>;
}

/// Commits navigation to a route.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Make `route` the current route.
    async fn navigate(&self, route: &str);

    /// Route currently shown.
    fn current_route(&self) -> String;
}

/// Token source that always reports the same token. Handy for tooling and
/// tests that call the gateway without a session.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenSource(pub String);

impl TokenSource for StaticTokenSource {
    fn current_token(&self) -> String {
        self.0.clone()
    }
}
