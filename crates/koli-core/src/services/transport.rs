//! HTTP transport seam
//!
//! Every remote call is a JSON POST. The [`Transport`] trait is the only place
//! that touches the network, so the client logic above it can be driven by a
//! scripted transport in tests.

use async_trait::async_trait;
use reqwest::{header, Client};

use crate::config::ClientConfig;
use crate::error::ApiError;

/// Status plus raw body of a completed request.
///
/// For non-2xx responses the body is left empty; it is never read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` as JSON to `url`.
    ///
    /// `Err` only when no response arrived at all; HTTP error statuses come
    /// back as `Ok` with the status set.
    async fn post_json(&self, url: &str, body: &serde_json::Value)
        -> Result<RawResponse, ApiError>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<RawResponse, ApiError> {
        let response = self.client.post(url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Ok(RawResponse::new(status.as_u16(), String::new()));
        }

        let body = response.text().await?;
        Ok(RawResponse::new(status.as_u16(), body))
    }
}
