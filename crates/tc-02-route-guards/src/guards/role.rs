use super::{RouteContext, RouteGuard};
use crate::domain::{GuardKind, GuardOutcome};
use async_trait::async_trait;
use shared_types::ports::SessionView;
use shared_types::routes::{ROUTE_ACCESS_DENIED, ROUTE_LOGIN};
use std::sync::Arc;
use tracing::{debug, warn};

/// Requires the role named in the route's data.
pub struct RoleGuard {
    session: Arc<dyn SessionView>,
}

impl RoleGuard {
    pub fn new(session: Arc<dyn SessionView>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl RouteGuard for RoleGuard {
    fn kind(&self) -> GuardKind {
        GuardKind::Role
    }

    async fn check(&self, route: RouteContext<'_>) -> GuardOutcome {
        let Some(required) = route.data.role.as_deref().filter(|r| !r.is_empty()) else {
            warn!(path = route.path, "RoleGuard: no role specified for route");
            return GuardOutcome::redirect(ROUTE_LOGIN);
        };

        if self.session.has_role(required) {
            return GuardOutcome::Allow;
        }

        debug!(path = route.path, required, "RoleGuard: missing required role");
        GuardOutcome::redirect(ROUTE_ACCESS_DENIED)
    }
}
