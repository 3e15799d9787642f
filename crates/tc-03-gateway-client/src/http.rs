//! # Gateway HTTP
//!
//! `GatewayHttp` owns the request pipeline (tracing → auth → reqwest) and the
//! JSON helpers every REST client is built on. Non-success statuses become
//! [`GatewayError::Status`] with the response body preserved.

use crate::domain::{GatewayClientConfig, GatewayError};
use crate::middleware::{AuthConfig, AuthLayer, TracingLayer};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::ports::TokenSource;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::util::BoxCloneSyncService;
use tower::{Service, ServiceBuilder, ServiceExt};
use tracing::debug;
use url::Url;

/// Innermost service: executes the request on a shared `reqwest::Client`.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Service<reqwest::Request> for HttpTransport {
    type Response = reqwest::Response;
    type Error = reqwest::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: reqwest::Request) -> Self::Future {
        let client = self.client.clone();
        Box::pin(async move { client.execute(req).await })
    }
}

type Pipeline = BoxCloneSyncService<reqwest::Request, reqwest::Response, reqwest::Error>;

/// Shared, cloneable handle to the gateway.
#[derive(Clone)]
pub struct GatewayHttp {
    client: reqwest::Client,
    pipeline: Pipeline,
    base: Url,
}

impl GatewayHttp {
    pub fn new(
        config: &GatewayClientConfig,
        tokens: Arc<dyn TokenSource>,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, config, tokens))
    }

    pub fn with_client(
        client: reqwest::Client,
        config: &GatewayClientConfig,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        let pipeline = ServiceBuilder::new()
            .layer(TracingLayer::new())
            .layer(AuthLayer::new(
                AuthConfig::new(config.protected_bases()),
                tokens,
            ))
            .service(HttpTransport::new(client.clone()));

        Self {
            client,
            pipeline: BoxCloneSyncService::new(pipeline),
            base: config.base_url.clone(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Absolute URL for a gateway path such as `/claims/my-claims`.
    pub fn url(&self, path: &str) -> Result<Url, GatewayError> {
        let base = self.base.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Send through the pipeline; any non-2xx status is an error.
    pub async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response, GatewayError> {
        let method = request.method().clone();
        let url = request.url().clone();

        let response = self.pipeline.clone().oneshot(request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(%method, %url, status = status.as_u16(), "Gateway call failed");
        Err(GatewayError::Status {
            status: status.as_u16(),
            body,
        })
    }

    fn request(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder, GatewayError> {
        Ok(self.client.request(method, self.url(path)?))
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GatewayError> {
        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let request = self.request(Method::GET, path)?.build()?;
        Self::decode(self.send(request).await?).await
    }

    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(method, path)?.json(body).build()?;
        Self::decode(self.send(request).await?).await
    }

    /// Send a JSON body and discard whatever comes back.
    pub async fn send_unit<B>(&self, method: Method, path: &str, body: &B) -> Result<(), GatewayError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.request(method, path)?.json(body).build()?;
        self.send(request).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> Result<(), GatewayError> {
        let request = self.request(Method::DELETE, path)?.build()?;
        self.send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{gateway_for, spawn_gateway};
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::routing::get;
    use axum::{Json, Router};

    async fn whoami(headers: HeaderMap) -> (AxumStatus, Json<serde_json::Value>) {
        match headers.get("authorization").and_then(|v| v.to_str().ok()) {
            Some(auth) => (AxumStatus::OK, Json(serde_json::json!({ "auth": auth }))),
            None => (AxumStatus::UNAUTHORIZED, Json(serde_json::json!({}))),
        }
    }

    #[test]
    fn test_gateway_http_is_shareable_across_tasks() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pipeline>();
        assert_send_sync::<GatewayHttp>();
        assert_send_sync::<crate::clients::UserProfileClient>();
    }

    #[test]
    fn test_url_joining() {
        let config = GatewayClientConfig::new(Url::parse("http://localhost:8083/").unwrap());
        let http = GatewayHttp::with_client(
            reqwest::Client::new(),
            &config,
            Arc::new(shared_types::ports::StaticTokenSource::default()),
        );
        assert_eq!(
            http.url("/policies/car/me").unwrap().as_str(),
            "http://localhost:8083/policies/car/me"
        );
        assert_eq!(
            http.url("claims").unwrap().as_str(),
            "http://localhost:8083/claims"
        );
    }

    #[tokio::test]
    async fn test_bearer_reaches_gateway() {
        let base = spawn_gateway(Router::new().route("/whoami", get(whoami))).await;
        let http = gateway_for(&base, "tok-1");

        let body: serde_json::Value = http.get_json("/whoami").await.unwrap();
        assert_eq!(body["auth"], "Bearer tok-1");
    }

    #[tokio::test]
    async fn test_error_status_keeps_body() {
        let base = spawn_gateway(Router::new().route(
            "/broken",
            get(|| async { (AxumStatus::SERVICE_UNAVAILABLE, "claims-service down") }),
        ))
        .await;
        let http = gateway_for(&base, "tok-1");

        let err = http.get_json::<serde_json::Value>("/broken").await.unwrap_err();
        match err {
            GatewayError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "claims-service down");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_undecodable_body() {
        let base = spawn_gateway(Router::new().route("/text", get(|| async { "not json" }))).await;
        let http = gateway_for(&base, "tok-1");

        let err = http.get_json::<Vec<i64>>("/text").await.unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)));
    }
}
