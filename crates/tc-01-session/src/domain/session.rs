//! # Session
//!
//! The tokens, decoded claims, and identity profile of the signed-in user.

use super::errors::SessionError;
use super::jwt::{decode_claims, AccessClaims};
use shared_types::entities::{IdentityProfile, RoleSet, TokenSet};
use std::time::Duration;

/// Current session. `Session::default()` is the signed-out state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    tokens: Option<TokenSet>,
    claims: AccessClaims,
    profile: Option<IdentityProfile>,
}

impl Session {
    /// Build a session from freshly issued tokens.
    pub fn from_tokens(tokens: TokenSet) -> Result<Self, SessionError> {
        let claims = decode_claims(&tokens.access_token)?;
        Ok(Self {
            tokens: Some(tokens),
            claims,
            profile: None,
        })
    }

    /// Authenticated iff an access token is present and not yet expired.
    #[must_use]
    pub fn is_authenticated(&self, now_secs: i64) -> bool {
        self.tokens.is_some() && !self.claims.is_expired(now_secs)
    }

    #[must_use]
    pub fn roles(&self) -> RoleSet {
        if self.tokens.is_none() {
            return RoleSet::new();
        }
        self.claims.roles()
    }

    #[must_use]
    pub fn tokens(&self) -> Option<&TokenSet> {
        self.tokens.as_ref()
    }

    /// Access token, or `""` when signed out.
    #[must_use]
    pub fn access_token(&self) -> &str {
        self.tokens
            .as_ref()
            .map(|t| t.access_token.as_str())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn claims(&self) -> &AccessClaims {
        &self.claims
    }

    #[must_use]
    pub fn expires_at(&self) -> Option<i64> {
        self.tokens.as_ref().map(|_| self.claims.exp)
    }

    #[must_use]
    pub fn profile(&self) -> Option<&IdentityProfile> {
        self.profile.as_ref()
    }

    pub fn set_profile(&mut self, profile: Option<IdentityProfile>) {
        self.profile = profile;
    }

    /// Replace the tokens after a refresh, keeping the loaded profile.
    pub fn refreshed(&self, tokens: TokenSet) -> Result<Self, SessionError> {
        let mut next = Self::from_tokens(tokens)?;
        next.profile = self.profile.clone();
        Ok(next)
    }

    /// Time until the background refresh should fire.
    ///
    /// Normally the start of the `min_validity` window before expiry. A token
    /// issued already inside that window is refreshed `EXPIRY_SKEW` before
    /// `exp` instead, and the wait never drops below `MIN_REFRESH_DELAY`.
    /// `None` when signed out.
    #[must_use]
    pub fn refresh_delay(&self, now_secs: i64, min_validity: Duration) -> Option<Duration> {
        let exp = self.expires_at()?;
        let window = i64::try_from(min_validity.as_secs()).unwrap_or(i64::MAX);
        let mut due = exp.saturating_sub(window);
        if due <= now_secs {
            due = exp.saturating_sub(EXPIRY_SKEW_SECS);
        }
        let wait = Duration::from_secs(u64::try_from(due.saturating_sub(now_secs)).unwrap_or(0));
        Some(wait.max(MIN_REFRESH_DELAY))
    }
}

/// Seconds before `exp` at which a short-lived token is refreshed.
pub const EXPIRY_SKEW_SECS: i64 = 5;

/// Floor between two background refresh attempts.
pub const MIN_REFRESH_DELAY: Duration = Duration::from_secs(1);
