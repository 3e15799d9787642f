//! # Keycloak Identity Provider
//!
//! `IdentityProvider` over the realm's OpenID Connect endpoints:
//!
//! | Capability | Endpoint | Method |
//! |------------|----------|--------|
//! | password / refresh grant | `.../openid-connect/token` | POST form |
//! | logout | `.../openid-connect/logout` | POST form |
//! | profile | `.../openid-connect/userinfo` | GET, Bearer |
//! | registration | `.../openid-connect/auth?kc_action=register` | browser redirect |

use crate::domain::SessionError;
use crate::ports::outbound::IdentityProvider;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use shared_types::entities::{IdentityProfile, TokenSet};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::form_urlencoded;

/// Realm coordinates.
#[derive(Debug, Clone)]
pub struct KeycloakConfig {
    /// Server root, e.g. `http://localhost:8080`.
    pub url: String,
    pub realm: String,
    pub client_id: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for KeycloakConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".to_string(),
            realm: "Trustiify".to_string(),
            client_id: "Trustify-frontend".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
}

impl From<TokenResponse> for TokenSet {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token.unwrap_or_default(),
            id_token: response.id_token,
        }
    }
}

pub struct KeycloakProvider {
    client: Client,
    config: KeycloakConfig,
}

impl KeycloakProvider {
    pub fn new(config: KeycloakConfig) -> Result<Self, SessionError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SessionError::ProviderUnreachable(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Use an existing client (shared connection pool).
    pub fn with_client(client: Client, config: KeycloakConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, name: &str) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/{}",
            self.config.url.trim_end_matches('/'),
            self.config.realm,
            name
        )
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenSet, SessionError> {
        let response = self
            .client
            .post(self.endpoint("token"))
            .form(form)
            .send()
            .await
            .map_err(transport_error)?;

        let response = reject_non_success(response).await?;
        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| SessionError::InvalidResponse(e.to_string()))?;
        Ok(body.into())
    }
}

fn transport_error(e: reqwest::Error) -> SessionError {
    SessionError::ProviderUnreachable(e.to_string())
}

/// Map a non-2xx response to `SessionError::Authentication`.
async fn reject_non_success(response: Response) -> Result<Response, SessionError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), body = %body, "Identity provider rejected request");
    Err(SessionError::Authentication {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or_default().to_string(),
    })
}

#[async_trait]
impl IdentityProvider for KeycloakProvider {
    async fn check_sso(&self, stored: Option<TokenSet>) -> Result<Option<TokenSet>, SessionError> {
        let Some(stored) = stored.filter(TokenSet::can_refresh) else {
            debug!("No stored refresh token; skipping silent sign-in");
            return Ok(None);
        };

        match self.refresh(&stored.refresh_token).await {
            Ok(tokens) => Ok(Some(tokens)),
            Err(e) if e.is_rejection() => {
                info!(error = %e, "Stored session no longer valid");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn password_grant(&self, username: &str, password: &str) -> Result<TokenSet, SessionError> {
        self.token_request(&[
            ("client_id", self.config.client_id.as_str()),
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
            ("scope", "openid"),
        ])
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenSet, SessionError> {
        let mut tokens = self
            .token_request(&[
                ("client_id", self.config.client_id.as_str()),
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?;

        // Keycloak may omit a new refresh token; keep using the old one.
        if tokens.refresh_token.is_empty() {
            tokens.refresh_token = refresh_token.to_string();
        }
        Ok(tokens)
    }

    async fn logout(&self, tokens: &TokenSet) -> Result<(), SessionError> {
        if !tokens.can_refresh() {
            return Ok(());
        }

        let response = self
            .client
            .post(self.endpoint("logout"))
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("refresh_token", tokens.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        if let Err(e) = reject_non_success(response).await {
            warn!(error = %e, "Provider-side logout failed");
            return Err(e);
        }
        Ok(())
    }

    async fn load_user_profile(&self, access_token: &str) -> Result<IdentityProfile, SessionError> {
        let response = self
            .client
            .get(self.endpoint("userinfo"))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport_error)?;

        reject_non_success(response)
            .await?
            .json()
            .await
            .map_err(|e| SessionError::InvalidResponse(e.to_string()))
    }

    fn registration_url(&self, redirect_uri: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", "openid")
            .append_pair("kc_action", "register")
            .finish();
        format!("{}?{}", self.endpoint("auth"), query)
    }
}
