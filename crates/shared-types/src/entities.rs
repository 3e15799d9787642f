//! # Core Entities
//!
//! Session-level entities shared by every crate: the token set issued by the
//! identity provider, the opaque identity profile, and the realm role set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Realm role granted to administrators.
pub const ROLE_ADMIN: &str = "admin";

/// Realm role granted to regular policy holders.
pub const ROLE_USER: &str = "user";

/// Tokens issued by the identity provider.
///
/// Persisted under the `token` and `refreshToken` keys so a token file written
/// by one run can be read back by the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    /// JWT access token (Bearer credential).
    #[serde(rename = "token")]
    pub access_token: String,
    /// Refresh token used for silent re-authentication.
    #[serde(rename = "refreshToken", default)]
    pub refresh_token: String,
    /// OpenID id token, when the provider returned one.
    #[serde(rename = "idToken", default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
}

impl TokenSet {
    /// Create a token set without an id token.
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            id_token: None,
        }
    }

    /// Whether a refresh token is available.
    #[must_use]
    pub fn can_refresh(&self) -> bool {
        !self.refresh_token.is_empty()
    }
}

/// User profile as reported by the identity provider.
///
/// Only the fields the client reads are typed; everything else the provider
/// sends is kept in `attributes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProfile {
    /// Subject identifier (the `sub` claim). Used as the notification user id.
    #[serde(alias = "sub")]
    pub id: String,
    /// Login name.
    #[serde(default, alias = "preferred_username")]
    pub username: Option<String>,
    /// E-mail address.
    #[serde(default)]
    pub email: Option<String>,
    /// Given name.
    #[serde(default, alias = "given_name")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default, alias = "family_name")]
    pub last_name: Option<String>,
    /// Remaining provider attributes.
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl IdentityProfile {
    /// Name to greet the user with: first name, then username, then `fallback`.
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.first_name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or(fallback)
    }
}

/// Realm roles carried by the current access token.
///
/// Comparison is case-insensitive; the original spelling is preserved for
/// display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(Vec<String>);

impl RoleSet {
    /// Create an empty role set.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Case-insensitive membership test.
    #[must_use]
    pub fn contains(&self, role: &str) -> bool {
        self.0.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    /// Whether the set grants the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.contains(ROLE_ADMIN)
    }

    /// Whether the set grants the user role.
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.contains(ROLE_USER)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Roles as issued.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for RoleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<String>> for RoleSet {
    fn from(roles: Vec<String>) -> Self {
        Self(roles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_token_set_storage_keys() {
        let tokens = TokenSet::new("access", "refresh");
        let json = serde_json::to_value(&tokens).unwrap();

        assert_eq!(json["token"], "access");
        assert_eq!(json["refreshToken"], "refresh");
        assert!(json.get("idToken").is_none());
    }

    #[test]
    fn test_token_set_without_refresh() {
        let tokens: TokenSet = serde_json::from_str(r#"{"token":"abc"}"#).unwrap();
        assert_eq!(tokens.access_token, "abc");
        assert!(!tokens.can_refresh());
    }

    #[test]
    fn test_identity_profile_from_userinfo() {
        let json = r#"{
            "sub": "f2c1-77",
            "preferred_username": "jdoe",
            "email": "jdoe@example.com",
            "given_name": "Jane",
            "family_name": "Doe",
            "email_verified": true
        }"#;

        let profile: IdentityProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.id, "f2c1-77");
        assert_eq!(profile.username.as_deref(), Some("jdoe"));
        assert_eq!(profile.display_name("Admin"), "Jane");
        assert_eq!(profile.attributes["email_verified"], true);
    }

    #[test]
    fn test_display_name_fallback() {
        let profile = IdentityProfile {
            id: "1".into(),
            ..Default::default()
        };
        assert_eq!(profile.display_name("Admin"), "Admin");
    }

    #[test]
    fn test_role_set_membership() {
        let roles: RoleSet = ["offline_access", "Admin"].into_iter().collect();
        assert!(roles.is_admin());
        assert!(!roles.is_user());
        assert_eq!(roles.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_role_lookup_ignores_case(role in "[a-zA-Z]{1,12}", flips in proptest::collection::vec(any::<bool>(), 12)) {
            let roles: RoleSet = [role.to_lowercase()].into_iter().collect();
            let query: String = role
                .chars()
                .zip(flips.iter().cycle())
                .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() })
                .collect();

            prop_assert!(roles.contains(&query));
            prop_assert_eq!(roles.contains(&query.to_uppercase()), roles.contains(&query.to_lowercase()));
        }
    }
}
