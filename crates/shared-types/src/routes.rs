//! # Application Routes
//!
//! Route paths the client navigates between. Guards and the session manager
//! redirect only to paths named here.

use crate::entities::RoleSet;

/// Login page; target of every authentication failure.
pub const ROUTE_LOGIN: &str = "/auth/login";
/// Self-service registration page.
pub const ROUTE_SIGNUP: &str = "/auth/signup";
/// Shown when a role guard denies access.
pub const ROUTE_ACCESS_DENIED: &str = "/access-denied";
/// Landing page for regular users.
pub const ROUTE_DASHBOARD: &str = "/dashboard";
/// Landing page for administrators.
pub const ROUTE_HELLO_ADMIN: &str = "/hello-admin";
/// Greeting page for regular users.
pub const ROUTE_HELLO_USER: &str = "/hello-user";
/// Profile completion form.
pub const ROUTE_COMPLETE_PROFILE: &str = "/user/complete-profile";
/// Prefix shared by the public authentication pages.
pub const AUTH_PREFIX: &str = "/auth/";

/// Landing route for a freshly authenticated session.
///
/// Admins land on the admin greeting page; everyone else, including sessions
/// without a recognized role, lands on the dashboard.
#[must_use]
pub fn landing_route(roles: &RoleSet) -> &'static str {
    if roles.is_admin() {
        ROUTE_HELLO_ADMIN
    } else {
        ROUTE_DASHBOARD
    }
}

/// Whether `path` is one of the public authentication pages.
#[must_use]
pub fn is_auth_route(path: &str) -> bool {
    path.starts_with(AUTH_PREFIX)
}

/// Strip query string, fragment, and trailing slash so paths compare cleanly.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
