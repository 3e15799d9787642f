use super::{RouteContext, RouteGuard};
use crate::domain::{GuardKind, GuardOutcome};
use async_trait::async_trait;
use shared_types::ports::SessionView;
use shared_types::routes::ROUTE_LOGIN;
use std::sync::Arc;
use tracing::debug;

/// Requires an authenticated session. Route data is ignored.
pub struct AuthGuard {
    session: Arc<dyn SessionView>,
}

impl AuthGuard {
    pub fn new(session: Arc<dyn SessionView>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl RouteGuard for AuthGuard {
    fn kind(&self) -> GuardKind {
        GuardKind::Auth
    }

    async fn check(&self, route: RouteContext<'_>) -> GuardOutcome {
        if self.session.is_authenticated() {
            return GuardOutcome::Allow;
        }
        debug!(path = route.path, "AuthGuard: not authenticated");
        GuardOutcome::redirect(ROUTE_LOGIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RouteData;
    use crate::guards::mocks::StubSession;

    #[tokio::test]
    async fn test_unauthenticated_redirects_to_login_regardless_of_data() {
        let guard = AuthGuard::new(Arc::new(StubSession::signed_out()));

        for data in [RouteData::default(), RouteData::role("admin")] {
            let outcome = guard
                .check(RouteContext {
                    path: "/dashboard",
                    data: &data,
                })
                .await;
            assert_eq!(outcome, GuardOutcome::redirect(ROUTE_LOGIN));
        }
    }

    #[tokio::test]
    async fn test_authenticated_allowed() {
        let guard = AuthGuard::new(Arc::new(StubSession::signed_in(&[])));
        let data = RouteData::default();
        let outcome = guard
            .check(RouteContext {
                path: "/dashboard",
                data: &data,
            })
            .await;
        assert!(outcome.is_allowed());
    }
}
