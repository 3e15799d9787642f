//! Request spans for outgoing gateway calls.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::{debug, info_span, Instrument, Span};

/// Tracing layer that creates a span for each request
#[derive(Clone, Default)]
pub struct TracingLayer;

impl TracingLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for TracingLayer {
    type Service = TracingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TracingService { inner }
    }
}

/// Tracing service
#[derive(Clone)]
pub struct TracingService<S> {
    inner: S,
}

impl<S> Service<reqwest::Request> for TracingService<S>
where
    S: Service<reqwest::Request, Response = reqwest::Response>,
    S::Future: Send + 'static,
{
    type Response = reqwest::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: reqwest::Request) -> Self::Future {
        let span = info_span!(
            "gateway_request",
            http.method = %req.method(),
            http.target = %req.url().path(),
            http.status_code = tracing::field::Empty,
        );
        let fut = self.inner.call(req);

        Box::pin(
            async move {
                let result = fut.await;
                match &result {
                    Ok(response) => {
                        Span::current().record("http.status_code", response.status().as_u16());
                    }
                    Err(_) => debug!("Request failed before a response arrived"),
                }
                result
            }
            .instrument(span),
        )
    }
}
