//! # Access Token Claims
//!
//! The client never verifies signatures; the gateway does. It only reads the
//! payload segment for expiry, subject, and realm roles.

use super::errors::SessionError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Deserialize;
use shared_types::entities::RoleSet;

/// Claims the client reads from an access token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccessClaims {
    /// Expiry, seconds since the Unix epoch.
    #[serde(default)]
    pub exp: i64,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub preferred_username: Option<String>,
    #[serde(default)]
    pub realm_access: Option<RealmAccess>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RealmAccess {
    #[serde(default)]
    pub roles: Vec<String>,
}

impl AccessClaims {
    /// Realm roles (`realm_access.roles`); empty when the claim is missing.
    #[must_use]
    pub fn roles(&self) -> RoleSet {
        self.realm_access
            .as_ref()
            .map(|access| RoleSet::from(access.roles.clone()))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_expired(&self, now_secs: i64) -> bool {
        self.exp <= now_secs
    }
}

/// Decode the payload segment of a compact JWT.
pub fn decode_claims(token: &str) -> Result<AccessClaims, SessionError> {
    let payload = token
        .split('.')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| SessionError::InvalidToken("missing payload segment".into()))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| SessionError::InvalidToken(format!("payload is not base64url: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| SessionError::InvalidToken(format!("payload is not JSON: {e}")))
}
