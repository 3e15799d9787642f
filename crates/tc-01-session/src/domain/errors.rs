//! # Session Errors

use thiserror::Error;

/// Errors that can occur while establishing or maintaining a session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The identity provider rejected the credentials or grant.
    #[error("Authentication failed: {status} {reason}")]
    Authentication { status: u16, reason: String },

    /// The identity provider could not be reached.
    #[error("Identity provider unreachable: {0}")]
    ProviderUnreachable(String),

    /// The provider answered with something we could not interpret.
    #[error("Unexpected identity provider response: {0}")]
    InvalidResponse(String),

    /// The access token is malformed or already expired.
    #[error("Invalid access token: {0}")]
    InvalidToken(String),

    /// Background refresh failed; the session was cleared.
    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    /// Reading or writing the token store failed.
    #[error("Token storage error: {0}")]
    Storage(String),
}

impl SessionError {
    /// Whether the provider explicitly rejected the request (as opposed to a
    /// transport or local failure).
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}
