//! The I/O half of the host-does-IO split.
//!
//! `Transport` executes one `HttpRequest` built by the core. The production
//! implementation wraps `reqwest::Client` and opens an `outgoing_http` span
//! per request; tests substitute scripted transports.

use std::time::Duration;

use async_trait::async_trait;
use contacts_core::{HttpRequest, HttpResponse};
use thiserror::Error;
use tracing::Instrument;

/// A request that produced no HTTP response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute `request`. Any status, including 4xx/5xx, is `Ok`.
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Client with an overall per-request timeout, or the reqwest defaults
    /// when `timeout` is `None`.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::new(builder.build()?))
    }

    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.inner.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let response = builder.send().await?;

        let status = response.status();
        tracing::Span::current().record("http.status_code", status.as_u16());
        if status.is_client_error() || status.is_server_error() {
            tracing::Span::current().record("error", true);
        }

        let body = response.text().await?;
        Ok(HttpResponse::new(status.as_u16(), body))
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let span = tracing::debug_span!(
            "outgoing_http",
            http.method = "GET",
            http.url = %request.url,
            http.status_code = tracing::field::Empty,
            error = tracing::field::Empty,
        );
        self.execute(request).instrument(span).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request).await
    }
}
