use std::time::Duration;
use url::Url;

/// Default gateway origin for local development.
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8083";

/// Where the gateway lives and which origins receive the bearer token.
#[derive(Debug, Clone)]
pub struct GatewayClientConfig {
    /// Base URL every REST client builds its paths on.
    pub base_url: Url,
    /// Further backend bases that should also carry the token.
    pub extra_protected: Vec<Url>,
    pub request_timeout: Duration,
}

impl GatewayClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            extra_protected: Vec::new(),
            request_timeout: Duration::from_secs(30),
        }
    }

    /// The gateway base followed by any extra bases.
    #[must_use]
    pub fn protected_bases(&self) -> Vec<Url> {
        std::iter::once(self.base_url.clone())
            .chain(self.extra_protected.iter().cloned())
            .collect()
    }
}
