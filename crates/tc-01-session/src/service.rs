//! # Session Manager
//!
//! Application service implementing `SessionApi`.
//!
//! ## State
//!
//! The `Session` lives behind a `parking_lot::RwLock`; guards are never held
//! across an `.await`. Observers read the `authenticated`, `roles`, `profile`,
//! and `initialized` cells, and lifecycle changes are published on the bus.
//!
//! ## Refresh
//!
//! One background task per established session sleeps until the access token
//! enters its min-validity window (or, for tokens shorter-lived than that
//! window, until just before `exp`), then runs one refresh. A failed refresh
//! clears the session and ends the task; there is no retry.

use crate::domain::{Session, SessionError};
use crate::ports::inbound::{BootOutcome, SessionApi};
use crate::ports::outbound::{IdentityProvider, SystemTimeSource, TimeSource, TokenStore};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use shared_bus::{ClientEvent, EventPublisher, StateCell};
use shared_types::entities::{IdentityProfile, RoleSet, TokenSet};
use shared_types::ports::{Navigator, SessionView, TokenSource};
use shared_types::routes::{is_auth_route, landing_route, ROUTE_LOGIN};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// Session manager tuning.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Refresh this long before the access token expires.
    pub min_validity: Duration,
    /// Default safety timer for `boot`.
    pub safety_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_validity: Duration::from_secs(30),
            safety_timeout: Duration::from_secs(5),
        }
    }
}

/// Collaborators injected into the manager.
pub struct SessionDependencies {
    pub provider: Arc<dyn IdentityProvider>,
    pub store: Arc<dyn TokenStore>,
    pub navigator: Arc<dyn Navigator>,
    pub bus: Arc<dyn EventPublisher>,
    pub time: Arc<dyn TimeSource>,
}

impl SessionDependencies {
    /// Dependencies with the system clock.
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
        bus: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            provider,
            store,
            navigator,
            bus,
            time: Arc::new(SystemTimeSource),
        }
    }

    #[must_use]
    pub fn with_time_source(mut self, time: Arc<dyn TimeSource>) -> Self {
        self.time = time;
        self
    }
}

pub struct SessionManager {
    provider: Arc<dyn IdentityProvider>,
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    bus: Arc<dyn EventPublisher>,
    time: Arc<dyn TimeSource>,
    config: SessionConfig,

    session: RwLock<Session>,
    authenticated: StateCell<bool>,
    roles: StateCell<RoleSet>,
    profile: StateCell<Option<IdentityProfile>>,
    initialized: StateCell<bool>,

    refresh_task: Mutex<Option<JoinHandle<()>>>,
    me: Weak<SessionManager>,
}

impl SessionManager {
    pub fn new(deps: SessionDependencies, config: SessionConfig) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            provider: deps.provider,
            store: deps.store,
            navigator: deps.navigator,
            bus: deps.bus,
            time: deps.time,
            config,
            session: RwLock::new(Session::default()),
            authenticated: StateCell::new(false),
            roles: StateCell::default(),
            profile: StateCell::default(),
            initialized: StateCell::new(false),
            refresh_task: Mutex::new(None),
            me: me.clone(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn watch_authenticated(&self) -> watch::Receiver<bool> {
        self.authenticated.subscribe()
    }

    pub fn watch_roles(&self) -> watch::Receiver<RoleSet> {
        self.roles.subscribe()
    }

    pub fn watch_profile(&self) -> watch::Receiver<Option<IdentityProfile>> {
        self.profile.subscribe()
    }

    pub fn watch_initialized(&self) -> watch::Receiver<bool> {
        self.initialized.subscribe()
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    /// Whether the access token is present and unexpired.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_authenticated(self.time.now())
    }

    /// Case-insensitive role check; false when unauthenticated.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        let session = self.session.read();
        session.is_authenticated(self.time.now()) && session.roles().contains(role)
    }

    /// Current access token or `""`.
    #[must_use]
    pub fn get_token(&self) -> String {
        self.session.read().access_token().to_string()
    }

    /// Access-token expiry, seconds since the Unix epoch.
    #[must_use]
    pub fn expires_at(&self) -> Option<i64> {
        self.session.read().expires_at()
    }

    /// Subject (`sub`) of the current access token, falling back to the
    /// loaded profile id.
    #[must_use]
    pub fn user_id(&self) -> Option<String> {
        let session = self.session.read();
        session
            .claims()
            .sub
            .clone()
            .or_else(|| session.profile().map(|p| p.id.clone()))
            .filter(|_| session.tokens().is_some())
    }

    /// Whether a background refresh is scheduled.
    #[must_use]
    pub fn refresh_scheduled(&self) -> bool {
        self.refresh_task
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Install freshly issued tokens and run the post-authentication steps:
    /// load profile, then persist, publish state, schedule refresh, redirect.
    ///
    /// Nothing is committed until the profile lookup has returned, so a
    /// caller dropping this future mid-way leaves the manager signed out.
    async fn establish(&self, tokens: TokenSet) -> Result<(), SessionError> {
        let mut session = Session::from_tokens(tokens.clone())?;
        if !session.is_authenticated(self.time.now()) {
            return Err(SessionError::InvalidToken("access token already expired".into()));
        }

        let profile = match self.provider.load_user_profile(session.access_token()).await {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(error = %e, "Could not load user profile");
                None
            }
        };
        session.set_profile(profile.clone());

        let roles = session.roles();
        let username = session.claims().preferred_username.clone();
        *self.session.write() = session;

        if let Err(e) = self.store.save(&tokens) {
            warn!(error = %e, "Could not persist tokens");
        }

        self.authenticated.set(true);
        self.roles.set(roles.clone());
        self.profile.set(profile);
        self.schedule_refresh();

        info!(username = ?username, roles = ?roles.as_slice(), "Session established");
        self.bus
            .publish(ClientEvent::SessionEstablished {
                username,
                roles: roles.clone(),
            })
            .await;

        self.redirect_by_role(&roles).await;
        Ok(())
    }

    async fn redirect_by_role(&self, roles: &RoleSet) {
        let target = landing_route(roles);
        debug!(target, roles = ?roles.as_slice(), "Redirecting based on roles");
        self.navigator.navigate(target).await;
    }

    fn schedule_refresh(&self) {
        let weak = self.me.clone();
        let task = tokio::spawn(async move {
            loop {
                let Some(delay) = weak.upgrade().and_then(|m| m.refresh_delay()) else {
                    return;
                };
                debug!(delay_secs = delay.as_secs(), "Token refresh scheduled");
                tokio::time::sleep(delay).await;

                let Some(manager) = weak.upgrade() else {
                    return;
                };
                if manager.refresh_once().await.is_err() {
                    return;
                }
            }
        });

        if let Some(previous) = self.refresh_task.lock().replace(task) {
            previous.abort();
        }
    }

    fn refresh_delay(&self) -> Option<Duration> {
        self.session
            .read()
            .refresh_delay(self.time.now(), self.config.min_validity)
    }

    fn cancel_refresh(&self) {
        if let Some(task) = self.refresh_task.lock().take() {
            task.abort();
        }
    }

    /// Token-expired handler: one refresh attempt.
    ///
    /// On success the new tokens are persisted and the background refresh is
    /// rescheduled against the new expiry; on failure the background task is
    /// cancelled, the session is cleared and the user is sent to login.
    #[instrument(skip(self))]
    pub async fn handle_token_expired(&self) -> Result<(), SessionError> {
        let result = self.refresh_or_end(|| self.cancel_refresh()).await;
        if result.is_ok() {
            self.schedule_refresh();
        }
        result
    }

    /// One refresh from inside the background task, which must not abort
    /// itself before `end_session` has run.
    async fn refresh_once(&self) -> Result<(), SessionError> {
        self.refresh_or_end(|| ()).await
    }

    async fn refresh_or_end(&self, before_end: impl FnOnce()) -> Result<(), SessionError> {
        let refresh_token = self
            .session
            .read()
            .tokens()
            .map(|t| t.refresh_token.clone())
            .unwrap_or_default();

        let result = if refresh_token.is_empty() {
            Err(SessionError::RefreshFailed("no refresh token".into()))
        } else {
            self.provider
                .refresh(&refresh_token)
                .await
                .and_then(|tokens| {
                    let next = self.session.read().refreshed(tokens.clone())?;
                    Ok((tokens, next))
                })
        };

        match result {
            Ok((tokens, next)) => {
                let roles = next.roles();
                let expires_at = next.claims().exp;
                *self.session.write() = next;
                self.roles.set(roles);
                if let Err(e) = self.store.save(&tokens) {
                    warn!(error = %e, "Could not persist refreshed tokens");
                }
                info!(expires_at, "Access token refreshed");
                self.bus
                    .publish(ClientEvent::TokenRefreshed { expires_at })
                    .await;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to refresh token");
                before_end();
                self.end_session("refresh-failed").await;
                Err(match e {
                    SessionError::RefreshFailed(reason) => SessionError::RefreshFailed(reason),
                    other => SessionError::RefreshFailed(other.to_string()),
                })
            }
        }
    }

    /// Clear local state, tell the provider, go to login. Does not touch the
    /// refresh task.
    async fn end_session(&self, reason: &str) {
        let previous = std::mem::take(&mut *self.session.write());

        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Could not clear stored tokens");
        }

        self.authenticated.set(false);
        self.roles.set(RoleSet::new());
        self.profile.set(None);

        if let Some(tokens) = previous.tokens() {
            if let Err(e) = self.provider.logout(tokens).await {
                warn!(error = %e, "Provider logout failed");
            }
        }

        info!(reason, "Session cleared");
        self.bus
            .publish(ClientEvent::SessionCleared {
                reason: reason.to_string(),
            })
            .await;
        self.navigator.navigate(ROUTE_LOGIN).await;
    }
}

#[async_trait]
impl SessionApi for SessionManager {
    #[instrument(skip(self))]
    async fn initialize(&self) -> Result<bool, SessionError> {
        let stored = self.store.load()?;
        match self.provider.check_sso(stored).await? {
            Some(tokens) => {
                self.establish(tokens).await?;
                Ok(true)
            }
            None => {
                self.authenticated.set(false);
                Ok(false)
            }
        }
    }

    /// The safety timer wins by dropping the in-flight `initialize`, so a
    /// late provider answer never redirects after the user was sent to login.
    /// A session that was committed just before the timer fired is ended.
    async fn boot(&self, safety_timeout: Duration) -> BootOutcome {
        let outcome = tokio::select! {
            result = self.initialize() => match result {
                Ok(true) => BootOutcome::Authenticated,
                Ok(false) => BootOutcome::Unauthenticated,
                Err(e) => {
                    error!(error = %e, "Session initialization failed");
                    BootOutcome::Failed(e.to_string())
                }
            },
            () = tokio::time::sleep(safety_timeout) => {
                warn!(timeout_ms = safety_timeout.as_millis() as u64, "Session initialization timed out");
                BootOutcome::TimedOut
            }
        };

        self.initialized.set(true);

        let committed = self.session.read().tokens().is_some();
        match &outcome {
            BootOutcome::Authenticated => {}
            BootOutcome::TimedOut if committed => {
                self.cancel_refresh();
                self.end_session("boot-timeout").await;
            }
            BootOutcome::TimedOut | BootOutcome::Failed(_) => {
                self.navigator.navigate(ROUTE_LOGIN).await;
            }
            BootOutcome::Unauthenticated => {
                let current = self.navigator.current_route();
                if !is_auth_route(&current) {
                    self.navigator.navigate(ROUTE_LOGIN).await;
                }
            }
        }

        outcome
    }

    #[instrument(skip(self, password))]
    async fn login_with_credentials(&self, username: &str, password: &str) -> Result<(), SessionError> {
        let tokens = match self.provider.password_grant(username, password).await {
            Ok(tokens) => tokens,
            Err(e) => {
                error!(error = %e, "Authentication failed");
                return Err(e);
            }
        };
        self.establish(tokens).await
    }

    async fn logout(&self) {
        self.cancel_refresh();
        self.end_session("logout").await;
    }

    fn is_authenticated(&self) -> bool {
        SessionManager::is_authenticated(self)
    }

    fn has_role(&self, role: &str) -> bool {
        SessionManager::has_role(self, role)
    }

    fn get_token(&self) -> String {
        SessionManager::get_token(self)
    }

    fn roles(&self) -> RoleSet {
        self.roles.get()
    }

    fn profile(&self) -> Option<IdentityProfile> {
        self.profile.get()
    }

    fn registration_url(&self, redirect_uri: &str) -> String {
        self.provider.registration_url(redirect_uri)
    }
}

impl TokenSource for SessionManager {
    fn current_token(&self) -> String {
        self.get_token()
    }
}

impl SessionView for SessionManager {
    fn is_authenticated(&self) -> bool {
        SessionManager::is_authenticated(self)
    }

    fn has_role(&self, role: &str) -> bool {
        SessionManager::has_role(self, role)
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        if let Some(task) = self.refresh_task.get_mut().take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryTokenStore;
    use crate::ports::outbound::MockTimeSource;
    use crate::testing::{access_token, RecordingNavigator, ScriptedIdentityProvider};
    use shared_bus::{EventFilter, EventTopic, InMemoryEventBus};
    use shared_types::routes::{ROUTE_DASHBOARD, ROUTE_HELLO_ADMIN};

    const NOW: i64 = 1_700_000_000;

    struct Harness {
        manager: Arc<SessionManager>,
        provider: Arc<ScriptedIdentityProvider>,
        store: Arc<MemoryTokenStore>,
        navigator: Arc<RecordingNavigator>,
        bus: Arc<InMemoryEventBus>,
        clock: Arc<MockTimeSource>,
    }

    fn harness(provider: ScriptedIdentityProvider, store: MemoryTokenStore) -> Harness {
        let provider = Arc::new(provider);
        let store = Arc::new(store);
        let navigator = Arc::new(RecordingNavigator::new("/"));
        let bus = Arc::new(InMemoryEventBus::new());
        let clock = Arc::new(MockTimeSource::new(NOW));

        let deps = SessionDependencies::new(
            provider.clone(),
            store.clone(),
            navigator.clone(),
            bus.clone(),
        )
        .with_time_source(clock.clone());

        Harness {
            manager: SessionManager::new(deps, SessionConfig::default()),
            provider,
            store,
            navigator,
            bus,
            clock,
        }
    }

    fn tokens(roles: &[&str]) -> TokenSet {
        TokenSet::new(access_token("jdoe", roles, NOW + 300), "refresh-1")
    }

    #[tokio::test]
    async fn test_initialize_user_redirects_to_dashboard() {
        let h = harness(
            ScriptedIdentityProvider::new().with_sso(tokens(&["user"])),
            MemoryTokenStore::with_tokens(TokenSet::new("old", "refresh-0")),
        );

        assert!(h.manager.initialize().await.unwrap());
        assert_eq!(h.navigator.last().as_deref(), Some(ROUTE_DASHBOARD));
        assert!(h.manager.has_role("USER"));
        assert!(h.manager.profile().is_some());
        assert!(h.manager.refresh_scheduled());
        assert_eq!(
            h.store.snapshot().map(|t| t.refresh_token),
            Some("refresh-1".to_string())
        );
    }

    #[tokio::test]
    async fn test_initialize_admin_redirects_to_hello_admin() {
        let h = harness(
            ScriptedIdentityProvider::new().with_sso(tokens(&["admin"])),
            MemoryTokenStore::new(),
        );

        assert!(h.manager.initialize().await.unwrap());
        assert_eq!(h.navigator.last().as_deref(), Some(ROUTE_HELLO_ADMIN));
    }

    #[tokio::test]
    async fn test_initialize_unrecognized_role_goes_to_dashboard() {
        let h = harness(
            ScriptedIdentityProvider::new().with_sso(tokens(&["auditor"])),
            MemoryTokenStore::new(),
        );

        assert!(h.manager.initialize().await.unwrap());
        assert_eq!(h.navigator.last().as_deref(), Some(ROUTE_DASHBOARD));
    }

    #[tokio::test]
    async fn test_initialize_without_session() {
        let h = harness(ScriptedIdentityProvider::new(), MemoryTokenStore::new());

        assert!(!h.manager.initialize().await.unwrap());
        assert!(!h.manager.is_authenticated());
        assert!(h.navigator.history().is_empty());
    }

    #[tokio::test]
    async fn test_login_rejected_leaves_store_untouched() {
        let h = harness(
            ScriptedIdentityProvider::new().rejecting_password(401),
            MemoryTokenStore::new(),
        );

        let err = h
            .manager
            .login_with_credentials("jdoe", "wrong")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("401"));
        assert!(!h.manager.is_authenticated());
        assert_eq!(h.manager.get_token(), "");
        assert_eq!(h.store.writes(), 0);
        assert!(h.navigator.history().is_empty());
    }

    #[tokio::test]
    async fn test_login_success_publishes_and_redirects() {
        let h = harness(
            ScriptedIdentityProvider::new().with_password(tokens(&["user"])),
            MemoryTokenStore::new(),
        );
        let mut events = h.bus.subscribe(EventFilter::topics(vec![EventTopic::Session]));

        h.manager.login_with_credentials("jdoe", "secret").await.unwrap();

        assert!(h.manager.is_authenticated());
        assert!(!h.manager.get_token().is_empty());
        assert_eq!(h.store.writes(), 1);
        assert_eq!(h.navigator.last().as_deref(), Some(ROUTE_DASHBOARD));
        assert!(matches!(
            events.try_recv().unwrap(),
            Some(ClientEvent::SessionEstablished { username: Some(ref u), .. }) if u == "jdoe"
        ));
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let h = harness(
            ScriptedIdentityProvider::new().with_password(tokens(&["admin"])),
            MemoryTokenStore::new(),
        );
        h.manager.login_with_credentials("jdoe", "secret").await.unwrap();

        h.manager.logout().await;

        assert!(!h.manager.is_authenticated());
        assert!(!h.manager.has_role("admin"));
        assert!(h.manager.roles().is_empty());
        assert!(h.store.snapshot().is_none());
        assert_eq!(h.provider.logout_calls(), 1);
        assert!(!h.manager.refresh_scheduled());
        assert_eq!(h.navigator.last().as_deref(), Some(ROUTE_LOGIN));
    }

    #[tokio::test]
    async fn test_logout_provider_error_is_swallowed() {
        let h = harness(
            ScriptedIdentityProvider::new()
                .with_password(tokens(&["user"]))
                .failing_logout(),
            MemoryTokenStore::new(),
        );
        h.manager.login_with_credentials("jdoe", "secret").await.unwrap();

        h.manager.logout().await;
        assert_eq!(h.navigator.last().as_deref(), Some(ROUTE_LOGIN));
    }

    #[tokio::test]
    async fn test_expired_token_is_not_authenticated() {
        let h = harness(
            ScriptedIdentityProvider::new().with_password(tokens(&["user"])),
            MemoryTokenStore::new(),
        );
        h.manager.login_with_credentials("jdoe", "secret").await.unwrap();

        h.clock.advance(301);
        assert!(!h.manager.is_authenticated());
        assert!(!h.manager.has_role("user"));
        // get_token never refreshes.
        assert!(!h.manager.get_token().is_empty());
    }

    #[tokio::test]
    async fn test_token_expired_refresh_success() {
        let refreshed = TokenSet::new(access_token("jdoe", &["user"], NOW + 900), "refresh-2");
        let h = harness(
            ScriptedIdentityProvider::new()
                .with_password(tokens(&["user"]))
                .with_refresh(refreshed.clone()),
            MemoryTokenStore::new(),
        );
        h.manager.login_with_credentials("jdoe", "secret").await.unwrap();

        h.manager.handle_token_expired().await.unwrap();

        assert_eq!(h.manager.expires_at(), Some(NOW + 900));
        assert_eq!(h.store.snapshot(), Some(refreshed));
        assert!(h.manager.profile().is_some());
    }

    #[tokio::test]
    async fn test_token_expired_refresh_failure_logs_out() {
        let h = harness(
            ScriptedIdentityProvider::new().with_password(tokens(&["user"])),
            MemoryTokenStore::new(),
        );
        h.manager.login_with_credentials("jdoe", "secret").await.unwrap();

        let err = h.manager.handle_token_expired().await.unwrap_err();

        assert!(matches!(err, SessionError::RefreshFailed(_)));
        assert!(!h.manager.is_authenticated());
        assert!(h.store.snapshot().is_none());
        assert_eq!(h.navigator.last().as_deref(), Some(ROUTE_LOGIN));
        assert_eq!(h.provider.refresh_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_refresh_fires_before_expiry() {
        let refreshed = TokenSet::new(access_token("jdoe", &["user"], NOW + 900), "refresh-2");
        let h = harness(
            ScriptedIdentityProvider::new()
                .with_password(tokens(&["user"]))
                .with_refresh(refreshed),
            MemoryTokenStore::new(),
        );
        h.manager.login_with_credentials("jdoe", "secret").await.unwrap();
        assert_eq!(h.provider.refresh_calls(), 0);

        // exp = NOW + 300, window 30 s: due after 270 s.
        tokio::time::sleep(Duration::from_secs(269)).await;
        assert_eq!(h.provider.refresh_calls(), 0);

        h.clock.advance(271);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(h.provider.refresh_calls(), 1);
        assert_eq!(h.manager.expires_at(), Some(NOW + 900));
    }

    #[tokio::test]
    async fn test_boot_marks_initialized_and_routes_to_login() {
        let h = harness(ScriptedIdentityProvider::new(), MemoryTokenStore::new());

        let outcome = h.manager.boot(Duration::from_secs(5)).await;

        assert_eq!(outcome, BootOutcome::Unauthenticated);
        assert!(h.manager.is_initialized());
        assert_eq!(h.navigator.last().as_deref(), Some(ROUTE_LOGIN));
    }

    #[tokio::test]
    async fn test_boot_unauthenticated_on_auth_route_stays() {
        let h = harness(ScriptedIdentityProvider::new(), MemoryTokenStore::new());
        h.navigator.navigate("/auth/signup").await;

        h.manager.boot(Duration::from_secs(5)).await;
        assert_eq!(h.navigator.last().as_deref(), Some("/auth/signup"));
    }

    #[tokio::test]
    async fn test_boot_failure_routes_to_login() {
        let h = harness(
            ScriptedIdentityProvider::new().unreachable(),
            MemoryTokenStore::with_tokens(TokenSet::new("old", "refresh-0")),
        );
        h.navigator.navigate("/auth/login").await;

        let outcome = h.manager.boot(Duration::from_secs(5)).await;
        assert!(matches!(outcome, BootOutcome::Failed(_)));
        assert!(h.manager.is_initialized());
        assert_eq!(h.navigator.last().as_deref(), Some(ROUTE_LOGIN));
    }

    #[tokio::test(start_paused = true)]
    async fn test_boot_safety_timer() {
        let h = harness(
            ScriptedIdentityProvider::new()
                .with_sso(tokens(&["user"]))
                .with_delay(Duration::from_secs(30)),
            MemoryTokenStore::with_tokens(TokenSet::new("old", "refresh-0")),
        );

        let outcome = h.manager.boot(Duration::from_secs(5)).await;

        assert_eq!(outcome, BootOutcome::TimedOut);
        assert!(h.manager.is_initialized());
        assert!(!h.manager.is_authenticated());
        assert_eq!(h.navigator.last().as_deref(), Some(ROUTE_LOGIN));
    }

    #[tokio::test(start_paused = true)]
    async fn test_boot_safety_timer_during_profile_load_commits_nothing() {
        let h = harness(
            ScriptedIdentityProvider::new()
                .with_sso(tokens(&["user"]))
                .with_profile_delay(Duration::from_secs(30)),
            MemoryTokenStore::new(),
        );
        let authenticated = h.manager.watch_authenticated();

        let outcome = h.manager.boot(Duration::from_secs(5)).await;

        assert_eq!(outcome, BootOutcome::TimedOut);
        assert!(!h.manager.is_authenticated());
        assert!(!*authenticated.borrow());
        assert_eq!(h.manager.get_token(), "");
        assert!(h.manager.roles().is_empty());
        assert_eq!(h.store.writes(), 0);
        assert!(h.store.snapshot().is_none());
        assert!(!h.manager.refresh_scheduled());
        assert_eq!(h.navigator.last().as_deref(), Some(ROUTE_LOGIN));
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_lived_tokens_refresh_once_per_expiry() {
        // 20 s lifespan, inside the default 30 s window. The clock is frozen,
        // so every refreshed token has the same remaining lifetime.
        let short = |refresh: &str| TokenSet::new(access_token("jdoe", &["user"], NOW + 20), refresh);
        let h = harness(
            ScriptedIdentityProvider::new()
                .with_password(short("refresh-1"))
                .with_refresh(short("refresh-2")),
            MemoryTokenStore::new(),
        );
        h.manager.login_with_credentials("jdoe", "secret").await.unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(h.provider.refresh_calls(), 0);

        tokio::time::sleep(Duration::from_secs(15)).await;
        assert_eq!(h.provider.refresh_calls(), 1);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(h.provider.refresh_calls(), 1);
        assert!(h.manager.refresh_scheduled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_external_refresh_failure_clears_session_once() {
        let h = harness(
            ScriptedIdentityProvider::new().with_password(tokens(&["user"])),
            MemoryTokenStore::new(),
        );
        h.manager.login_with_credentials("jdoe", "secret").await.unwrap();
        let mut events = h.bus.subscribe(EventFilter::topics(vec![EventTopic::Session]));

        assert!(h.manager.handle_token_expired().await.is_err());
        assert!(!h.manager.refresh_scheduled());

        // Past the point the background task would have fired.
        tokio::time::sleep(Duration::from_secs(400)).await;

        let mut cleared = 0;
        while let Ok(Some(event)) = events.try_recv() {
            if matches!(event, ClientEvent::SessionCleared { .. }) {
                cleared += 1;
            }
        }
        assert_eq!(cleared, 1);
        assert_eq!(h.provider.refresh_calls(), 1);
        assert_eq!(
            h.navigator.history().iter().filter(|r| r.as_str() == ROUTE_LOGIN).count(),
            1
        );
    }

    #[tokio::test]
    async fn test_registration_url_delegates() {
        let h = harness(ScriptedIdentityProvider::new(), MemoryTokenStore::new());
        assert!(h
            .manager
            .registration_url("http://app/auth/login")
            .contains("kc_action=register"));
    }
}
