//! # Guarded Router
//!
//! Resolves a path against the route table, runs the declared guards, and
//! follows redirects until a route admits entry. Only the final route is
//! committed to the `Navigator`.

use crate::domain::{GuardKind, GuardOutcome, RouteError, RouteMatch, RouteTable};
use crate::guards::{
    AdminGuard, AuthGuard, GuardChain, ProfileCompletionGuard, RouteContext, RouteGuard,
    RoleGuard,
};
use shared_types::ports::{Navigator, ProfileLookup, SessionView};
use shared_types::routes::normalize_path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Redirect hops followed before navigation is abandoned.
pub const MAX_REDIRECTS: usize = 5;

pub struct Router {
    table: RouteTable,
    auth: Arc<dyn RouteGuard>,
    role: Arc<dyn RouteGuard>,
    profile: Arc<dyn RouteGuard>,
    admin: Arc<dyn RouteGuard>,
    navigator: Arc<dyn Navigator>,
}

impl Router {
    pub fn new(
        table: RouteTable,
        session: Arc<dyn SessionView>,
        profiles: Arc<dyn ProfileLookup>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            table,
            auth: Arc::new(AuthGuard::new(session.clone())),
            role: Arc::new(RoleGuard::new(session.clone())),
            profile: Arc::new(ProfileCompletionGuard::new(profiles)),
            admin: Arc::new(AdminGuard::new(session)),
            navigator,
        }
    }

    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    fn guard(&self, kind: GuardKind) -> Arc<dyn RouteGuard> {
        match kind {
            GuardKind::Auth => self.auth.clone(),
            GuardKind::Role => self.role.clone(),
            GuardKind::ProfileCompletion => self.profile.clone(),
            GuardKind::Admin => self.admin.clone(),
        }
    }

    /// Chain for the guards a route declares, in declared order.
    pub fn chain(&self, kinds: &[GuardKind]) -> GuardChain {
        GuardChain::new(kinds.iter().map(|k| self.guard(*k)).collect())
    }

    /// One resolution step: whether `path` admits entry, or where to go instead.
    pub async fn evaluate(&self, path: &str) -> GuardOutcome {
        let path = normalize_path(path);
        match self.table.resolve(&path) {
            RouteMatch::Fallback(to) => GuardOutcome::redirect(to),
            RouteMatch::Route(route) => {
                if let Some(to) = &route.redirect_to {
                    return GuardOutcome::redirect(to.as_str());
                }
                self.chain(&route.guards)
                    .run(RouteContext {
                        path: &path,
                        data: &route.data,
                    })
                    .await
            }
        }
    }

    /// Navigate to `path`, following guard redirects.
    ///
    /// Returns the route that was committed.
    pub async fn navigate(&self, path: &str) -> Result<String, RouteError> {
        let requested = normalize_path(path);
        let mut target = requested.clone();

        for hop in 0..=MAX_REDIRECTS {
            match self.evaluate(&target).await {
                GuardOutcome::Allow => {
                    if hop > 0 {
                        info!(requested = %requested, landed = %target, "Navigation redirected");
                    }
                    self.navigator.navigate(&target).await;
                    return Ok(target);
                }
                GuardOutcome::Redirect(next) => {
                    debug!(from = %target, to = %next, hop, "Redirect");
                    target = normalize_path(&next);
                }
            }
        }

        warn!(path = %requested, "Navigation abandoned: redirect loop");
        Err(RouteError::TooManyRedirects {
            path: requested,
            limit: MAX_REDIRECTS,
        })
    }
}
