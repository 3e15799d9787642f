//! Bearer attachment for outgoing gateway calls.
//!
//! A request gets `Authorization: Bearer <token>` only when its URL shares an
//! origin (scheme, host, port) with a protected base and its path lies under
//! that base's path. Everything else passes through untouched.

use reqwest::header::{HeaderValue, AUTHORIZATION};
use shared_types::ports::TokenSource;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::{trace, warn};
use url::Url;

/// Backends that receive the bearer token.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub protected_bases: Vec<Url>,
}

impl AuthConfig {
    pub fn new(protected_bases: Vec<Url>) -> Self {
        Self { protected_bases }
    }

    #[must_use]
    pub fn is_protected(&self, url: &Url) -> bool {
        self.protected_bases
            .iter()
            .any(|base| base.origin() == url.origin() && path_under(base.path(), url.path()))
    }
}

fn path_under(base: &str, path: &str) -> bool {
    let base = base.trim_end_matches('/');
    base.is_empty()
        || path == base
        || path
            .strip_prefix(base)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Authentication layer
#[derive(Clone)]
pub struct AuthLayer {
    config: Arc<AuthConfig>,
    tokens: Arc<dyn TokenSource>,
}

impl AuthLayer {
    pub fn new(config: AuthConfig, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            config: Arc::new(config),
            tokens,
        }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            config: Arc::clone(&self.config),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    config: Arc<AuthConfig>,
    tokens: Arc<dyn TokenSource>,
}

impl<S> Service<reqwest::Request> for AuthService<S>
where
    S: Service<reqwest::Request>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: reqwest::Request) -> Self::Future {
        if self.config.is_protected(req.url()) {
            let token = self.tokens.current_token();
            if token.is_empty() {
                trace!(url = %req.url(), "No token available; sending unauthenticated");
            } else {
                match HeaderValue::from_str(&format!("Bearer {token}")) {
                    Ok(mut value) => {
                        value.set_sensitive(true);
                        req.headers_mut().insert(AUTHORIZATION, value);
                    }
                    Err(_) => warn!("Access token is not a valid header value; not attached"),
                }
            }
        }

        self.inner.call(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;
    use shared_types::ports::StaticTokenSource;
    use std::convert::Infallible;
    use tower::{service_fn, ServiceExt};

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    async fn authorization_for(bases: &[&str], token: &str, target: &str) -> Option<String> {
        let layer = AuthLayer::new(
            AuthConfig::new(bases.iter().map(|b| url(b)).collect()),
            Arc::new(StaticTokenSource(token.to_string())),
        );
        let echo = service_fn(|req: reqwest::Request| async move {
            Ok::<_, Infallible>(
                req.headers()
                    .get(AUTHORIZATION)
                    .map(|v| v.to_str().unwrap().to_string()),
            )
        });

        layer
            .layer(echo)
            .oneshot(reqwest::Request::new(Method::GET, url(target)))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_attaches_bearer_for_gateway_calls() {
        let header = authorization_for(
            &["http://localhost:8083"],
            "tok",
            "http://localhost:8083/policies/car/me",
        )
        .await;
        assert_eq!(header.as_deref(), Some("Bearer tok"));
    }

    #[tokio::test]
    async fn test_other_origins_pass_through() {
        let bases = ["http://localhost:8083"];
        assert_eq!(
            authorization_for(&bases, "tok", "http://localhost:8084/ws").await,
            None
        );
        assert_eq!(
            authorization_for(&bases, "tok", "https://localhost:8083/claims").await,
            None
        );
        assert_eq!(
            authorization_for(&bases, "tok", "http://example.com/claims").await,
            None
        );
    }

    #[tokio::test]
    async fn test_lookalike_origin_not_protected() {
        let header = authorization_for(
            &["http://localhost:8083"],
            "tok",
            "http://localhost.evil.test:8083/claims",
        )
        .await;
        assert_eq!(header, None);
        assert_eq!(
            authorization_for(&["http://localhost:8083"], "tok", "http://127.0.0.1:8083/claims").await,
            None
        );
    }

    #[tokio::test]
    async fn test_base_path_respected() {
        let bases = ["http://localhost:8083/api"];
        assert_eq!(
            authorization_for(&bases, "tok", "http://localhost:8083/api/notifications/my")
                .await
                .as_deref(),
            Some("Bearer tok")
        );
        assert_eq!(
            authorization_for(&bases, "tok", "http://localhost:8083/apix").await,
            None
        );
        assert_eq!(
            authorization_for(&bases, "tok", "http://localhost:8083/claims").await,
            None
        );
    }

    #[tokio::test]
    async fn test_empty_token_sends_no_header() {
        let header = authorization_for(
            &["http://localhost:8083"],
            "",
            "http://localhost:8083/claims/my-claims",
        )
        .await;
        assert_eq!(header, None);
    }

    #[test]
    fn test_default_port_matches_explicit() {
        let config = AuthConfig::new(vec![url("https://api.trustify.io")]);
        assert!(config.is_protected(&url("https://api.trustify.io:443/claims")));
    }
}
