//! Fake gateway helpers for tests.

use crate::domain::GatewayClientConfig;
use crate::http::GatewayHttp;
use shared_types::ports::StaticTokenSource;
use std::sync::Arc;
use url::Url;

/// Serve `app` on an ephemeral localhost port and return its base URL.
///
/// # Panics
///
/// Panics if no local port can be bound.
#[allow(clippy::unwrap_used)]
pub async fn spawn_gateway(app: axum::Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Url::parse(&format!("http://{addr}")).unwrap()
}

/// Gateway handle that sends `token` to `base`.
pub fn gateway_for(base: &Url, token: &str) -> GatewayHttp {
    GatewayHttp::with_client(
        reqwest::Client::new(),
        &GatewayClientConfig::new(base.clone()),
        Arc::new(StaticTokenSource(token.to_string())),
    )
}
