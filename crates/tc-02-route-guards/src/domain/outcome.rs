//! Guard results and guard identities.

use std::fmt;

/// Result of evaluating one guard (or a whole chain).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    Redirect(String),
}

impl GuardOutcome {
    pub fn redirect(route: impl Into<String>) -> Self {
        Self::Redirect(route.into())
    }

    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// The guards a route can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardKind {
    Auth,
    Role,
    ProfileCompletion,
    Admin,
}

impl fmt::Display for GuardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auth => "AuthGuard",
            Self::Role => "RoleGuard",
            Self::ProfileCompletion => "ProfileCompletionGuard",
            Self::Admin => "AdminGuard",
        };
        f.write_str(name)
    }
}
