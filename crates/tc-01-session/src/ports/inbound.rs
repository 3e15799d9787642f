//! # Inbound Ports (Driving Ports / API)
//!
//! The public API of the session manager.

use crate::domain::SessionError;
use async_trait::async_trait;
use shared_types::entities::{IdentityProfile, RoleSet};
use std::time::Duration;

/// Result of the boot sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootOutcome {
    /// Stored tokens were resumed; the user was sent to their landing route.
    Authenticated,
    /// Nothing to resume.
    Unauthenticated,
    /// Initialization failed; the user was sent to login.
    Failed(String),
    /// The safety timer fired first; the user was sent to login.
    TimedOut,
}

/// Primary session API.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Silent re-authentication from persisted tokens.
    ///
    /// Returns whether the user is now authenticated. On success the
    /// profile is loaded, roles extracted, refresh scheduled, tokens
    /// persisted, and a role-based redirect issued.
    async fn initialize(&self) -> Result<bool, SessionError>;

    /// Run `initialize` against a safety timer and route accordingly.
    /// Marks the manager initialized whatever the outcome.
    async fn boot(&self, safety_timeout: Duration) -> BootOutcome;

    /// Sign in with a username and password.
    ///
    /// On failure the session stays unauthenticated and nothing is stored.
    async fn login_with_credentials(&self, username: &str, password: &str)
        -> Result<(), SessionError>;

    /// Sign out locally and at the provider, then go to login.
    async fn logout(&self);

    /// Whether the access token is present and unexpired.
    fn is_authenticated(&self) -> bool;

    /// Case-insensitive role check; false when unauthenticated.
    fn has_role(&self, role: &str) -> bool;

    /// Current access token or `""`. Never blocks, never refreshes.
    fn get_token(&self) -> String;

    fn roles(&self) -> RoleSet;

    fn profile(&self) -> Option<IdentityProfile>;

    /// Provider registration page returning to `redirect_uri`.
    fn registration_url(&self, redirect_uri: &str) -> String;
}
