//! # Route Guards (tc-02)
//!
//! Decides whether a navigation may proceed. Every guarded route declares an
//! ordered list of guards; the first one that denies names the redirect.
//!
//! ## Navigation Flow
//!
//! ```text
//! navigate(path)
//!     │
//!     ▼
//! RouteTable::resolve ──unknown──→ fallback (/auth/login)
//!     │
//!     ▼ redirect_to? ──yes──→ follow
//!     │
//!     ▼
//! GuardChain (declared order)
//!     │ Auth → Role → ProfileCompletion / Admin
//!     │
//!     ├── Allow ──→ Navigator::navigate(path)   [committed]
//!     └── Redirect(to) ──→ loop (at most 5 hops)
//! ```
//!
//! ## Route Table
//!
//! | Path | Guards | Data |
//! |------|--------|------|
//! | `/` | redirect → `/auth/login` | |
//! | `/auth/login`, `/auth/signup`, `/access-denied` | none | |
//! | `/dashboard` | Auth | |
//! | `/policies/**` | Auth, Role | `role = user` |
//! | `/hello-user` | Auth, Role | `role = user` |
//! | `/hello-admin` | Auth, Role | `role = admin` |
//! | `/admin/**` | Auth, Admin | |
//! | `/claims/**` | Auth, Role, ProfileCompletion | `role = user` |
//! | `/user/complete-profile` | Auth | |
//! | anything else | redirect → `/auth/login` | |
//!
//! Guards never return errors. Session state is read through
//! [`shared_types::SessionView`] and the backend profile through
//! [`shared_types::ProfileLookup`], so this crate depends on neither the
//! session manager nor the gateway client.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod domain;
pub mod guards;
pub mod router;

pub use domain::{
    GuardKind, GuardOutcome, RouteData, RouteDefinition, RouteError, RouteMatch, RoutePattern,
    RouteTable,
};
pub use guards::{
    AdminGuard, AuthGuard, GuardChain, ProfileCompletionGuard, RoleGuard, RouteContext,
    RouteGuard,
};
pub use router::{Router, MAX_REDIRECTS};
