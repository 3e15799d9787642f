//! # Client Configuration
//!
//! Unified configuration for every component.
//!
//! Sources, later wins:
//!
//! 1. `Default` (local development stack)
//! 2. JSON file (`ClientConfig::from_json_file`)
//! 3. `TC_*` environment variables (`ClientConfig::apply_env`)
//!
//! Call [`ClientConfig::validate`] before wiring.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tc_01_session::{KeycloakConfig, SessionConfig};
use tc_03_gateway_client::GatewayClientConfig;
use tc_04_notifications::{HeartBeat, StompConfig};
use thiserror::Error;
use url::Url;

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub identity: IdentityConfig,
    pub gateway: GatewayConfig,
    pub notifications: NotificationConfig,
    pub storage: StorageConfig,
    pub boot: BootConfig,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} is not a valid URL ({value}): {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("Environment variable {var} has an invalid value: {value}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Identity provider (Keycloak realm) settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub url: String,
    pub realm: String,
    pub client_id: String,
    /// Refresh the access token this many seconds before it expires.
    pub min_validity_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".to_string(),
            realm: "Trustiify".to_string(),
            client_id: "Trustify-frontend".to_string(),
            min_validity_secs: 30,
            request_timeout_secs: 10,
        }
    }
}

/// API gateway settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub api_url: String,
    /// Other backend bases that also receive the bearer token.
    pub protected_urls: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8083".to_string(),
            protected_urls: Vec::new(),
            request_timeout_secs: 30,
        }
    }
}

/// Live notification channel settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
    pub ws_url: String,
    /// Zero disables reconnection.
    pub reconnect_delay_ms: u64,
    pub heartbeat_outgoing_ms: u64,
    pub heartbeat_incoming_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ws_url: "ws://localhost:8084/ws/websocket".to_string(),
            reconnect_delay_ms: 5000,
            heartbeat_outgoing_ms: 4000,
            heartbeat_incoming_ms: 4000,
        }
    }
}

/// Token persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file holding `token` and `refreshToken`.
    pub token_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            token_file: PathBuf::from(".trustify/session.json"),
        }
    }
}

/// Boot sequence settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootConfig {
    /// Safety timer racing silent re-authentication.
    pub safety_timeout_ms: u64,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            safety_timeout_ms: 5000,
        }
    }
}

fn parse_url(field: &'static str, value: &str, schemes: &[&str]) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        reason,
    };
    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    if !schemes.contains(&url.scheme()) {
        return Err(invalid(format!("scheme must be one of {schemes:?}")));
    }
    Ok(url)
}

const HTTP: &[&str] = &["http", "https"];
const WS: &[&str] = &["ws", "wss"];

impl ClientConfig {
    /// Defaults overridden by `TC_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Load a JSON file. Missing sections and fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Override fields from a variable source.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `TC_KEYCLOAK_URL` | `identity.url` |
    /// | `TC_KEYCLOAK_REALM` | `identity.realm` |
    /// | `TC_KEYCLOAK_CLIENT_ID` | `identity.client_id` |
    /// | `TC_MIN_VALIDITY_SECS` | `identity.min_validity_secs` |
    /// | `TC_API_URL` | `gateway.api_url` |
    /// | `TC_PROTECTED_URLS` | `gateway.protected_urls` (comma separated) |
    /// | `TC_REQUEST_TIMEOUT_SECS` | `gateway.request_timeout_secs` |
    /// | `TC_WS_URL` | `notifications.ws_url` |
    /// | `TC_NOTIFICATIONS` | `notifications.enabled` |
    /// | `TC_RECONNECT_DELAY_MS` | `notifications.reconnect_delay_ms` |
    /// | `TC_HEARTBEAT_MS` | both heart-beat directions |
    /// | `TC_TOKEN_FILE` | `storage.token_file` |
    /// | `TC_BOOT_TIMEOUT_MS` | `boot.safety_timeout_ms` |
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        let number = |var: &'static str| -> Result<Option<u64>, ConfigError> {
            lookup(var)
                .map(|value| {
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidEnv { var, value })
                })
                .transpose()
        };

        if let Some(v) = lookup("TC_KEYCLOAK_URL") {
            self.identity.url = v;
        }
        if let Some(v) = lookup("TC_KEYCLOAK_REALM") {
            self.identity.realm = v;
        }
        if let Some(v) = lookup("TC_KEYCLOAK_CLIENT_ID") {
            self.identity.client_id = v;
        }
        if let Some(v) = number("TC_MIN_VALIDITY_SECS")? {
            self.identity.min_validity_secs = v;
        }
        if let Some(v) = lookup("TC_API_URL") {
            self.gateway.api_url = v;
        }
        if let Some(v) = lookup("TC_PROTECTED_URLS") {
            self.gateway.protected_urls = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(v) = number("TC_REQUEST_TIMEOUT_SECS")? {
            self.gateway.request_timeout_secs = v;
            self.identity.request_timeout_secs = v;
        }
        if let Some(v) = lookup("TC_WS_URL") {
            self.notifications.ws_url = v;
        }
        if let Some(v) = lookup("TC_NOTIFICATIONS") {
            self.notifications.enabled = match v.to_lowercase().as_str() {
                "1" | "true" | "on" => true,
                "0" | "false" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: "TC_NOTIFICATIONS",
                        value: v,
                    })
                }
            };
        }
        if let Some(v) = number("TC_RECONNECT_DELAY_MS")? {
            self.notifications.reconnect_delay_ms = v;
        }
        if let Some(v) = number("TC_HEARTBEAT_MS")? {
            self.notifications.heartbeat_outgoing_ms = v;
            self.notifications.heartbeat_incoming_ms = v;
        }
        if let Some(v) = lookup("TC_TOKEN_FILE") {
            self.storage.token_file = PathBuf::from(v);
        }
        if let Some(v) = number("TC_BOOT_TIMEOUT_MS")? {
            self.boot.safety_timeout_ms = v;
        }
        Ok(())
    }

    /// Reject malformed URLs and zero timeouts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_url("identity.url", &self.identity.url, HTTP)?;
        parse_url("gateway.api_url", &self.gateway.api_url, HTTP)?;
        for url in &self.gateway.protected_urls {
            parse_url("gateway.protected_urls", url, HTTP)?;
        }
        if self.notifications.enabled {
            parse_url("notifications.ws_url", &self.notifications.ws_url, WS)?;
        }

        if self.identity.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout("identity.request_timeout_secs"));
        }
        if self.gateway.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout("gateway.request_timeout_secs"));
        }
        if self.boot.safety_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout("boot.safety_timeout_ms"));
        }
        Ok(())
    }

    // =========================================================================
    // Component configs
    // =========================================================================

    pub fn keycloak(&self) -> KeycloakConfig {
        KeycloakConfig {
            url: self.identity.url.trim_end_matches('/').to_string(),
            realm: self.identity.realm.clone(),
            client_id: self.identity.client_id.clone(),
            timeout: Duration::from_secs(self.identity.request_timeout_secs),
        }
    }

    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            min_validity: Duration::from_secs(self.identity.min_validity_secs),
            safety_timeout: self.safety_timeout(),
        }
    }

    pub fn gateway(&self) -> Result<GatewayClientConfig, ConfigError> {
        let mut config = GatewayClientConfig::new(parse_url(
            "gateway.api_url",
            &self.gateway.api_url,
            HTTP,
        )?);
        config.extra_protected = self
            .gateway
            .protected_urls
            .iter()
            .map(|url| parse_url("gateway.protected_urls", url, HTTP))
            .collect::<Result<_, _>>()?;
        config.request_timeout = Duration::from_secs(self.gateway.request_timeout_secs);
        Ok(config)
    }

    pub fn stomp(&self) -> StompConfig {
        let mut config = StompConfig::new(self.notifications.ws_url.as_str());
        config.reconnect_delay = Duration::from_millis(self.notifications.reconnect_delay_ms);
        config.heartbeat = HeartBeat::new(
            self.notifications.heartbeat_outgoing_ms,
            self.notifications.heartbeat_incoming_ms,
        );
        config
    }

    pub fn safety_timeout(&self) -> Duration {
        Duration::from_millis(self.boot.safety_timeout_ms)
    }
}
