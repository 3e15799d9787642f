//! Centralized Testing Utilities
//!
//! Test helpers shared with other crates' suites. Available with the
//! `test-utils` feature flag.

use crate::domain::SessionError;
use crate::ports::outbound::IdentityProvider;
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use parking_lot::Mutex;
use shared_types::entities::{IdentityProfile, TokenSet};
use shared_types::ports::Navigator;
use shared_types::routes::normalize_path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Build an unsigned JWT around an arbitrary payload.
#[must_use]
pub fn unsigned_jwt(payload: &serde_json::Value) -> String {
    format!(
        "{}.{}.unsigned",
        URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(payload.to_string())
    )
}

/// Access token for `username` carrying realm `roles`, expiring at `exp`.
///
/// The subject is `"{username}-id"`.
#[must_use]
pub fn access_token(username: &str, roles: &[&str], exp: i64) -> String {
    unsigned_jwt(&serde_json::json!({
        "exp": exp,
        "sub": format!("{username}-id"),
        "preferred_username": username,
        "realm_access": { "roles": roles },
    }))
}

/// Identity provider with canned answers.
///
/// Anything not scripted is rejected with HTTP 401.
#[derive(Default)]
pub struct ScriptedIdentityProvider {
    sso: Option<TokenSet>,
    password: Option<Result<TokenSet, SessionError>>,
    refresh: Option<TokenSet>,
    unreachable: bool,
    failing_logout: bool,
    delay: Option<Duration>,
    profile_delay: Option<Duration>,
    refresh_calls: AtomicUsize,
    logout_calls: AtomicUsize,
}

impl ScriptedIdentityProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `check_sso` resumes with these tokens.
    #[must_use]
    pub fn with_sso(mut self, tokens: TokenSet) -> Self {
        self.sso = Some(tokens);
        self
    }

    /// The password grant succeeds with these tokens.
    #[must_use]
    pub fn with_password(mut self, tokens: TokenSet) -> Self {
        self.password = Some(Ok(tokens));
        self
    }

    /// The password grant fails with `status`.
    #[must_use]
    pub fn rejecting_password(mut self, status: u16) -> Self {
        self.password = Some(Err(SessionError::Authentication {
            status,
            reason: "Unauthorized".into(),
        }));
        self
    }

    /// The refresh grant succeeds with these tokens.
    #[must_use]
    pub fn with_refresh(mut self, tokens: TokenSet) -> Self {
        self.refresh = Some(tokens);
        self
    }

    /// Every network call fails as if the provider were down.
    #[must_use]
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    #[must_use]
    pub fn failing_logout(mut self) -> Self {
        self.failing_logout = true;
        self
    }

    /// Delay `check_sso` by `delay`.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Delay `load_user_profile` by `delay`.
    #[must_use]
    pub fn with_profile_delay(mut self, delay: Duration) -> Self {
        self.profile_delay = Some(delay);
        self
    }

    #[must_use]
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn logout_calls(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> Result<(), SessionError> {
        if self.unreachable {
            return Err(SessionError::ProviderUnreachable("connection refused".into()));
        }
        Ok(())
    }
}

fn rejected() -> SessionError {
    SessionError::Authentication {
        status: 401,
        reason: "Unauthorized".into(),
    }
}

#[async_trait]
impl IdentityProvider for ScriptedIdentityProvider {
    async fn check_sso(&self, _stored: Option<TokenSet>) -> Result<Option<TokenSet>, SessionError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.check_reachable()?;
        Ok(self.sso.clone())
    }

    async fn password_grant(&self, _username: &str, _password: &str) -> Result<TokenSet, SessionError> {
        self.check_reachable()?;
        self.password.clone().unwrap_or_else(|| Err(rejected()))
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<TokenSet, SessionError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        self.refresh.clone().ok_or_else(rejected)
    }

    async fn logout(&self, _tokens: &TokenSet) -> Result<(), SessionError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_logout {
            return Err(SessionError::ProviderUnreachable("logout endpoint down".into()));
        }
        Ok(())
    }

    async fn load_user_profile(&self, access_token: &str) -> Result<IdentityProfile, SessionError> {
        if let Some(delay) = self.profile_delay {
            tokio::time::sleep(delay).await;
        }
        self.check_reachable()?;
        let claims = crate::domain::decode_claims(access_token)?;
        Ok(IdentityProfile {
            id: claims.sub.unwrap_or_default(),
            username: claims.preferred_username,
            ..Default::default()
        })
    }

    fn registration_url(&self, redirect_uri: &str) -> String {
        format!("http://idp.test/auth?redirect_uri={redirect_uri}&kc_action=register")
    }
}

/// Navigator that records every committed route.
pub struct RecordingNavigator {
    history: Mutex<Vec<String>>,
    current: Mutex<String>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new(initial: &str) -> Self {
        Self {
            history: Mutex::new(Vec::new()),
            current: Mutex::new(normalize_path(initial)),
        }
    }

    /// Routes committed so far, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.history.lock().clone()
    }

    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.history.lock().last().cloned()
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn navigate(&self, route: &str) {
        let route = normalize_path(route);
        *self.current.lock() = route.clone();
        self.history.lock().push(route);
    }

    fn current_route(&self) -> String {
        self.current.lock().clone()
    }
}
