//! # Error Types
//!
//! Errors that cross crate boundaries. Crate-local failures live in each
//! crate's own error module.

use thiserror::Error;

/// Failure to fetch the backend user profile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileLookupError {
    /// No profile exists yet (HTTP 404). Means "needs setup".
    #[error("Profile not found")]
    NotFound,

    /// Backend unreachable or returned an unexpected status.
    #[error("Profile service unavailable: {0}")]
    Unavailable(String),
}

/// A string did not name any variant of an enumerated wire type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
