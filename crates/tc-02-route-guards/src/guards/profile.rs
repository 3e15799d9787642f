use super::{RouteContext, RouteGuard};
use crate::domain::{GuardKind, GuardOutcome};
use async_trait::async_trait;
use shared_types::errors::ProfileLookupError;
use shared_types::ports::ProfileLookup;
use shared_types::routes::ROUTE_COMPLETE_PROFILE;
use std::sync::Arc;
use tracing::{debug, info};

/// Requires a completed backend profile.
///
/// The profile is fetched on every check; a missing profile (404) is the
/// normal "needs setup" case and is never reported as an error.
pub struct ProfileCompletionGuard {
    profiles: Arc<dyn ProfileLookup>,
}

impl ProfileCompletionGuard {
    pub fn new(profiles: Arc<dyn ProfileLookup>) -> Self {
        Self { profiles }
    }
}

#[async_trait]
impl RouteGuard for ProfileCompletionGuard {
    fn kind(&self) -> GuardKind {
        GuardKind::ProfileCompletion
    }

    async fn check(&self, route: RouteContext<'_>) -> GuardOutcome {
        match self.profiles.current_profile().await {
            Ok(Some(profile)) if profile.profile_completed => GuardOutcome::Allow,
            Ok(_) => {
                debug!(path = route.path, "Profile not completed");
                GuardOutcome::redirect(ROUTE_COMPLETE_PROFILE)
            }
            Err(ProfileLookupError::NotFound) => {
                debug!(path = route.path, "Profile not found");
                GuardOutcome::redirect(ROUTE_COMPLETE_PROFILE)
            }
            Err(e) => {
                info!(path = route.path, error = %e, "Profile lookup failed");
                GuardOutcome::redirect(ROUTE_COMPLETE_PROFILE)
            }
        }
    }
}
