//! # Client Runtime
//!
//! Boot sequence and background links between components.
//!
//! ## Startup Sequence
//!
//! 1. Silent re-authentication from the token file, racing the safety timer
//!    (`SessionApi::boot`); the session routes to login or the landing page.
//! 2. Start the notification link: while the session is authenticated the
//!    live channel is open for its subject; when it stops being
//!    authenticated the channel is closed and local notifications dropped.
//!
//! ## Shutdown Sequence
//!
//! 1. Signal the link task and wait for it
//! 2. Close the notification channel

use std::sync::Arc;

use parking_lot::Mutex;
use tc_01_session::{BootOutcome, SessionApi, SessionError, SessionManager};
use tc_04_notifications::{NotificationChannelApi, NotificationService};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::container::ClientContainer;

pub struct ClientRuntime {
    container: Arc<ClientContainer>,
    shutdown_tx: watch::Sender<bool>,
    link: Mutex<Option<JoinHandle<()>>>,
}

impl ClientRuntime {
    pub fn new(container: ClientContainer) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            container: Arc::new(container),
            shutdown_tx,
            link: Mutex::new(None),
        }
    }

    pub fn container(&self) -> Arc<ClientContainer> {
        Arc::clone(&self.container)
    }

    /// Resume the stored session and start background links.
    pub async fn boot(&self) -> BootOutcome {
        let timeout = self.container.config.safety_timeout();
        let outcome = self.container.session.boot(timeout).await;
        info!(?outcome, route = %self.current_route(), "Boot finished");
        self.start_links();
        outcome
    }

    /// Credential login; starts background links if not yet running.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), SessionError> {
        self.container
            .session
            .login_with_credentials(username, password)
            .await?;
        self.start_links();
        Ok(())
    }

    pub fn current_route(&self) -> String {
        use shared_types::ports::Navigator;
        self.container.routes.current_route()
    }

    fn start_links(&self) {
        if !self.container.config.notifications.enabled {
            debug!("Notification channel disabled");
            return;
        }
        let mut link = self.link.lock();
        if link.as_ref().is_some_and(|task| !task.is_finished()) {
            return;
        }
        *link = Some(tokio::spawn(notification_link(
            self.container.session.clone(),
            self.container.notifications.clone(),
            self.shutdown_tx.subscribe(),
        )));
    }

    /// Stop background links and close the live channel.
    pub async fn shutdown(&self) {
        info!("Initiating client shutdown");
        let _ = self.shutdown_tx.send(true);

        let link = self.link.lock().take();
        if let Some(task) = link {
            if let Err(e) = task.await {
                warn!(error = %e, "Notification link ended abnormally");
            }
        }
        self.container.notifications.disconnect().await;
        info!("Shutdown complete");
    }
}

/// Keep the notification channel open exactly while the session is
/// authenticated.
async fn notification_link(
    session: Arc<SessionManager>,
    notifications: Arc<NotificationService>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut authenticated = session.watch_authenticated();

    loop {
        let now = *authenticated.borrow_and_update();
        if now {
            match session.user_id() {
                Some(user_id) => {
                    if let Err(e) = notifications.connect(&user_id) {
                        warn!(error = %e, "Could not open notification channel");
                    }
                }
                None => warn!("Authenticated session has no subject; notifications stay off"),
            }
        } else {
            notifications.disconnect().await;
            notifications.clear();
        }

        tokio::select! {
            changed = authenticated.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = shutdown.changed() => {
                debug!("Notification link stopping");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ClientConfig;
    use shared_types::entities::TokenSet;
    use shared_types::routes::{ROUTE_DASHBOARD, ROUTE_LOGIN};
    use tc_01_session::testing::{access_token, ScriptedIdentityProvider};
    use tc_01_session::MemoryTokenStore;

    fn runtime(provider: ScriptedIdentityProvider) -> ClientRuntime {
        let mut config = ClientConfig::default();
        config.notifications.enabled = false;
        config.boot.safety_timeout_ms = 200;
        let container = ClientContainer::with_adapters(
            config,
            Arc::new(provider),
            Arc::new(MemoryTokenStore::new()),
        )
        .unwrap();
        ClientRuntime::new(container)
    }

    #[tokio::test]
    async fn test_boot_without_session_lands_on_login() {
        let runtime = runtime(ScriptedIdentityProvider::new());

        assert_eq!(runtime.boot().await, BootOutcome::Unauthenticated);
        assert_eq!(runtime.current_route(), ROUTE_LOGIN);
        assert!(runtime.container().session.is_initialized());
        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_boot_resumes_user_session() {
        let tokens = TokenSet {
            access_token: access_token("bob", &["user"], 4_102_444_800),
            refresh_token: "r".into(),
            id_token: None,
        };
        let runtime = runtime(ScriptedIdentityProvider::new().with_sso(tokens));

        assert_eq!(runtime.boot().await, BootOutcome::Authenticated);
        assert_eq!(runtime.current_route(), ROUTE_DASHBOARD);
        assert!(runtime.link.lock().is_none());
        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let runtime = runtime(
            ScriptedIdentityProvider::new().with_delay(std::time::Duration::from_secs(2)),
        );

        assert_eq!(runtime.boot().await, BootOutcome::TimedOut);
        assert_eq!(runtime.current_route(), ROUTE_LOGIN);
    }

    #[tokio::test]
    async fn test_failed_login_reports_status() {
        let runtime = runtime(ScriptedIdentityProvider::new().rejecting_password(401));

        let err = runtime.login("bob", "wrong").await.unwrap_err();
        assert!(err.to_string().contains("401"));
        assert!(!runtime.container().session.is_authenticated());
    }
}
