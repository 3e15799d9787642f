use super::{RouteContext, RouteGuard};
use crate::domain::{GuardKind, GuardOutcome};
use async_trait::async_trait;
use shared_types::entities::ROLE_ADMIN;
use shared_types::ports::SessionView;
use shared_types::routes::ROUTE_DASHBOARD;
use std::sync::Arc;
use tracing::debug;

/// Admin-only areas. Non-admins go back to the dashboard rather than the
/// access-denied page.
pub struct AdminGuard {
    session: Arc<dyn SessionView>,
}

impl AdminGuard {
    pub fn new(session: Arc<dyn SessionView>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl RouteGuard for AdminGuard {
    fn kind(&self) -> GuardKind {
        GuardKind::Admin
    }

    async fn check(&self, route: RouteContext<'_>) -> GuardOutcome {
        if self.session.has_role(ROLE_ADMIN) {
            return GuardOutcome::Allow;
        }
        debug!(path = route.path, "AdminGuard: admin role required");
        GuardOutcome::redirect(ROUTE_DASHBOARD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RouteData;
    use crate::guards::mocks::StubSession;
    use proptest::prelude::*;

    async fn check(session: StubSession) -> GuardOutcome {
        let data = RouteData::default();
        AdminGuard::new(Arc::new(session))
            .check(RouteContext {
                path: "/admin/claims",
                data: &data,
            })
            .await
    }

    #[tokio::test]
    async fn test_admin_allowed() {
        assert!(check(StubSession::signed_in(&["Admin"])).await.is_allowed());
    }

    proptest! {
        #[test]
        fn prop_non_admin_redirects_to_dashboard(
            roles in proptest::collection::vec("[a-zA-Z_]{1,12}", 0..6),
            authenticated in any::<bool>(),
        ) {
            prop_assume!(roles.iter().all(|r| !r.eq_ignore_ascii_case("admin")));
            let session = StubSession {
                authenticated,
                roles: roles.iter().cloned().collect(),
            };

            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let outcome = runtime.block_on(check(session));
            prop_assert_eq!(outcome, GuardOutcome::redirect(ROUTE_DASHBOARD));
        }
    }
}
