//! Transport seam between the gateway client and the network.
//!
//! [`Transport`] performs exactly one HTTP exchange per call and never
//! retries; retry policy lives in the client. [`ReqwestTransport`] is the
//! production implementation.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use thiserror::Error;
use tracing::debug;

use super::GraphQlRequest;
use crate::config::{ClientConfig, ConfigError};

/// Failures of a single HTTP exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status.
    #[error("server responded with status {status}")]
    Status { status: u16, body: Bytes },

    /// No status was received (connection refused, DNS, TLS, reset, ...).
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    /// Returns the HTTP status, if the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(_) => None,
        }
    }
}

/// Sends one GraphQL request and returns the raw 2xx body.
///
/// Implementations must be shareable across tasks; the client holds them in
/// an `Arc<dyn Transport>`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs a single POST of `request`.
    ///
    /// # Errors
    ///
    /// - [`TransportError::Status`] — the reply status was not 2xx.
    /// - [`TransportError::Network`] — no reply status was obtained.
    async fn execute(&self, request: &GraphQlRequest<'_>) -> Result<Bytes, TransportError>;
}

/// `reqwest`-backed transport posting JSON to a fixed endpoint.
///
/// Every request carries `Content-Type: application/json` and
/// `Accept: application/json`; no authentication headers are sent.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    endpoint: Url,
}

impl ReqwestTransport {
    /// Builds a transport for the endpoint named in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] for an unusable endpoint and
    /// [`ConfigError::HttpClient`] if the underlying client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let endpoint = config.endpoint_url()?;

        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { http, endpoint })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &GraphQlRequest<'_>) -> Result<Bytes, TransportError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Network(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            // Classified by status even when the body is cut off.
            let body = response.bytes().await.unwrap_or_default();
            debug!(status = status.as_u16(), bytes = body.len(), "graphql error reply received");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(Box::new(e)))?;
        debug!(status = status.as_u16(), bytes = body.len(), "graphql reply received");
        Ok(body)
    }
}
