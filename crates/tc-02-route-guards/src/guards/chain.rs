use super::{RouteContext, RouteGuard};
use crate::domain::GuardOutcome;
use std::sync::Arc;
use tracing::trace;

/// Guards evaluated in declared order. The first redirect short-circuits;
/// later guards are not consulted.
#[derive(Clone, Default)]
pub struct GuardChain {
    guards: Vec<Arc<dyn RouteGuard>>,
}

impl GuardChain {
    pub fn new(guards: Vec<Arc<dyn RouteGuard>>) -> Self {
        Self { guards }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    pub async fn run(&self, route: RouteContext<'_>) -> GuardOutcome {
        for guard in &self.guards {
            let outcome = guard.check(route).await;
            trace!(guard = %guard.kind(), path = route.path, outcome = ?outcome, "Guard evaluated");
            if !outcome.is_allowed() {
                return outcome;
            }
        }
        GuardOutcome::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RouteData;
    use crate::guards::mocks::{StubProfiles, StubSession};
    use crate::guards::{AuthGuard, ProfileCompletionGuard, RoleGuard};
    use shared_types::routes::{ROUTE_ACCESS_DENIED, ROUTE_LOGIN};

    #[tokio::test]
    async fn test_first_denial_short_circuits() {
        let session = Arc::new(StubSession::signed_out());
        let profiles = Arc::new(StubProfiles::completed(true));
        let chain = GuardChain::new(vec![
            Arc::new(AuthGuard::new(session.clone())),
            Arc::new(RoleGuard::new(session)),
            Arc::new(ProfileCompletionGuard::new(profiles.clone())),
        ]);

        let data = RouteData::role("user");
        let outcome = chain
            .run(RouteContext {
                path: "/claims",
                data: &data,
            })
            .await;

        assert_eq!(outcome, GuardOutcome::redirect(ROUTE_LOGIN));
        assert_eq!(profiles.calls(), 0);
    }

    #[tokio::test]
    async fn test_order_decides_redirect() {
        let session = Arc::new(StubSession::signed_in(&["admin"]));
        let profiles = Arc::new(StubProfiles::completed(false));
        let chain = GuardChain::new(vec![
            Arc::new(AuthGuard::new(session.clone())),
            Arc::new(RoleGuard::new(session)),
            Arc::new(ProfileCompletionGuard::new(profiles.clone())),
        ]);

        let data = RouteData::role("user");
        let outcome = chain
            .run(RouteContext {
                path: "/claims",
                data: &data,
            })
            .await;

        assert_eq!(outcome, GuardOutcome::redirect(ROUTE_ACCESS_DENIED));
        assert_eq!(profiles.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_chain_allows() {
        let data = RouteData::default();
        let outcome = GuardChain::default()
            .run(RouteContext {
                path: "/auth/login",
                data: &data,
            })
            .await;
        assert!(outcome.is_allowed());
    }
}
