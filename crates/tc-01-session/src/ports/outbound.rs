//! # Outbound Ports (Driven Ports)
//!
//! What the session manager needs from the outside world: an identity
//! provider, somewhere to persist tokens, and a clock.

use crate::domain::SessionError;
use async_trait::async_trait;
use shared_types::entities::{IdentityProfile, TokenSet};

/// Identity provider capabilities.
///
/// No vendor types cross this boundary.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Silent re-authentication from previously stored tokens.
    ///
    /// Returns `Ok(None)` when there is nothing to resume or the provider
    /// rejected the stored grant. Never prompts.
    async fn check_sso(&self, stored: Option<TokenSet>) -> Result<Option<TokenSet>, SessionError>;

    /// Resource-owner password grant.
    async fn password_grant(&self, username: &str, password: &str)
        -> Result<TokenSet, SessionError>;

    /// Exchange a refresh token for a new token set.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet, SessionError>;

    /// End the provider-side session.
    async fn logout(&self, tokens: &TokenSet) -> Result<(), SessionError>;

    /// Fetch the user's profile with the given access token.
    async fn load_user_profile(&self, access_token: &str)
        -> Result<IdentityProfile, SessionError>;

    /// URL of the provider's self-registration page, returning to `redirect_uri`.
    fn registration_url(&self, redirect_uri: &str) -> String;
}

/// Persistent token storage (keys `token` and `refreshToken`).
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<TokenSet>, SessionError>;
    fn save(&self, tokens: &TokenSet) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

/// Time source for token expiry checks.
///
/// Abstracted to allow testing with deterministic time.
pub trait TimeSource: Send + Sync {
    /// Seconds since the Unix epoch.
    fn now(&self) -> i64;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Mock time source for testing.
#[cfg(test)]
pub struct MockTimeSource {
    time: std::sync::atomic::AtomicI64,
}

#[cfg(test)]
impl MockTimeSource {
    pub fn new(initial: i64) -> Self {
        Self {
            time: std::sync::atomic::AtomicI64::new(initial),
        }
    }

    pub fn advance(&self, secs: i64) {
        self.time
            .fetch_add(secs, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl TimeSource for MockTimeSource {
    fn now(&self) -> i64 {
        self.time.load(std::sync::atomic::Ordering::SeqCst)
    }
}
