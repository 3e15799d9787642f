//! # Route Guards
//!
//! Each guard reads session state (and, for profile completion, the backend
//! profile) once per navigation attempt and either allows entry or names a
//! redirect. Guards never fail: every problem becomes a redirect.
//!
//! | Guard | Allows when | Otherwise |
//! |-------|-------------|-----------|
//! | `AuthGuard` | authenticated | `/auth/login` |
//! | `RoleGuard` | `has_role(data.role)` | `/access-denied` (no role datum: `/auth/login`) |
//! | `ProfileCompletionGuard` | profile exists and `profileCompleted` | `/user/complete-profile` |
//! | `AdminGuard` | `has_role("admin")` | `/dashboard` |

mod admin;
mod auth;
mod chain;
mod profile;
mod role;

pub use admin::AdminGuard;
pub use auth::AuthGuard;
pub use chain::GuardChain;
pub use profile::ProfileCompletionGuard;
pub use role::RoleGuard;

use crate::domain::{GuardKind, GuardOutcome, RouteData};
use async_trait::async_trait;

/// The route being entered.
#[derive(Debug, Clone, Copy)]
pub struct RouteContext<'a> {
    pub path: &'a str,
    pub data: &'a RouteData,
}

#[async_trait]
pub trait RouteGuard: Send + Sync {
    fn kind(&self) -> GuardKind;

    async fn check(&self, route: RouteContext<'_>) -> GuardOutcome;
}
