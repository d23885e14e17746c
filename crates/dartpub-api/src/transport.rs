//! HTTP transport seam.
//!
//! [`PubClient`](crate::PubClient) only needs a single GET that returns a
//! status code and a body. [`HttpTransport`] is the `reqwest`-backed
//! implementation; tests substitute their own.

use crate::config::ClientConfig;
use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;
use url::Url;

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one GET request, following redirects.
    ///
    /// Non-success statuses are returned as responses, not errors.
    async fn get(&self, url: &Url, headers: &HeaderMap) -> Result<TransportResponse>;
}

/// Transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Maximum number of redirects followed for one request.
    pub const MAX_REDIRECTS: usize = 10;

    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .gzip(true)
            .redirect(Policy::limited(Self::MAX_REDIRECTS));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Wraps an already configured client.
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url, headers: &HeaderMap) -> Result<TransportResponse> {
        let response = self
            .client
            .get(url.clone())
            .headers(headers.clone())
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(TransportResponse { status, body })
    }
}
