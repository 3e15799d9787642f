//! # Route Table
//!
//! Paths the client knows, the guards each one declares, and the route data
//! those guards read.

use super::outcome::GuardKind;
use shared_types::entities::{ROLE_ADMIN, ROLE_USER};
use shared_types::routes::{
    normalize_path, ROUTE_ACCESS_DENIED, ROUTE_COMPLETE_PROFILE, ROUTE_DASHBOARD,
    ROUTE_HELLO_ADMIN, ROUTE_HELLO_USER, ROUTE_LOGIN, ROUTE_SIGNUP,
};

/// Static data attached to a route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteData {
    /// Role required by `RoleGuard`.
    pub role: Option<String>,
}

impl RouteData {
    pub fn role(role: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
        }
    }
}

/// How a definition matches a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePattern {
    /// The path itself.
    Exact(String),
    /// The path and everything below it.
    Subtree(String),
}

impl RoutePattern {
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(p) => path == p,
            Self::Subtree(p) => {
                path == p
                    || path
                        .strip_prefix(p.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
        }
    }
}

/// One route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDefinition {
    pub pattern: RoutePattern,
    /// Guards evaluated in order; first denial wins.
    pub guards: Vec<GuardKind>,
    pub data: RouteData,
    /// When set, the route only redirects here.
    pub redirect_to: Option<String>,
}

impl RouteDefinition {
    /// Unguarded page.
    pub fn public(path: &str) -> Self {
        Self {
            pattern: RoutePattern::Exact(path.to_string()),
            guards: Vec::new(),
            data: RouteData::default(),
            redirect_to: None,
        }
    }

    pub fn guarded(pattern: RoutePattern, guards: &[GuardKind]) -> Self {
        Self {
            pattern,
            guards: guards.to_vec(),
            data: RouteData::default(),
            redirect_to: None,
        }
    }

    pub fn redirect(path: &str, to: &str) -> Self {
        Self {
            pattern: RoutePattern::Exact(path.to_string()),
            guards: Vec::new(),
            data: RouteData::default(),
            redirect_to: Some(to.to_string()),
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: RouteData) -> Self {
        self.data = data;
        self
    }
}

/// What a path resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatch<'a> {
    Route(&'a RouteDefinition),
    /// No definition matched.
    Fallback(&'a str),
}

/// Ordered route definitions plus a fallback redirect for unknown paths.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteDefinition>,
    fallback: String,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteDefinition>, fallback: impl Into<String>) -> Self {
        Self {
            routes,
            fallback: fallback.into(),
        }
    }

    /// First definition whose pattern matches the normalized path.
    #[must_use]
    pub fn resolve(&self, path: &str) -> RouteMatch<'_> {
        let path = normalize_path(path);
        self.routes
            .iter()
            .find(|route| route.pattern.matches(&path))
            .map_or(RouteMatch::Fallback(self.fallback.as_str()), RouteMatch::Route)
    }

    #[must_use]
    pub fn routes(&self) -> &[RouteDefinition] {
        &self.routes
    }
}

impl Default for RouteTable {
    /// The application's routes.
    fn default() -> Self {
        use GuardKind::{Admin, Auth, ProfileCompletion, Role};
        use RoutePattern::{Exact, Subtree};

        Self::new(
            vec![
                RouteDefinition::redirect("/", ROUTE_LOGIN),
                RouteDefinition::public(ROUTE_LOGIN),
                RouteDefinition::public(ROUTE_SIGNUP),
                RouteDefinition::public(ROUTE_ACCESS_DENIED),
                RouteDefinition::guarded(Exact(ROUTE_DASHBOARD.into()), &[Auth]),
                RouteDefinition::guarded(Subtree("/policies".into()), &[Auth, Role])
                    .with_data(RouteData::role(ROLE_USER)),
                RouteDefinition::guarded(Exact(ROUTE_HELLO_USER.into()), &[Auth, Role])
                    .with_data(RouteData::role(ROLE_USER)),
                RouteDefinition::guarded(Exact(ROUTE_HELLO_ADMIN.into()), &[Auth, Role])
                    .with_data(RouteData::role(ROLE_ADMIN)),
                RouteDefinition::guarded(Subtree("/admin".into()), &[Auth, Admin]),
                RouteDefinition::guarded(
                    Subtree("/claims".into()),
                    &[Auth, Role, ProfileCompletion],
                )
                .with_data(RouteData::role(ROLE_USER)),
                RouteDefinition::guarded(Exact(ROUTE_COMPLETE_PROFILE.into()), &[Auth]),
            ],
            ROUTE_LOGIN,
        )
    }
}
