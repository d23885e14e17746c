//! Registry client.

use crate::command::{DocumentationCommand, PackageCommand, SearchCommand};
use crate::config::ClientConfig;
use crate::cursor::RepositoryCursor;
use crate::error::{ApiError, Result};
use crate::transport::{HttpTransport, Transport};
use reqwest::header::{ACCEPT, ACCEPT_ENCODING, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// `User-Agent` sent when none is configured.
///
/// The standard library exposes no OS release, so the OS family is sent
/// next to the OS name, e.g. `dartpub/0.1.0 (Rust 1.89.0; linux; unix family; x86_64)`.
pub fn default_user_agent() -> String {
    format!(
        "dartpub/{} (Rust {}; {}; {} family; {})",
        env!("CARGO_PKG_VERSION"),
        env!("RUSTC_VERSION"),
        std::env::consts::OS,
        std::env::consts::FAMILY,
        std::env::consts::ARCH,
    )
}

/// Client for one package repository.
///
/// Holds the repository endpoints and a transport. Requests are issued
/// through the command accessors ([`search`](Self::search),
/// [`package`](Self::package), [`documentation`](Self::documentation));
/// every command performs exactly one GET.
#[derive(Debug, Clone)]
pub struct PubClient<T = HttpTransport> {
    cursor: Arc<RepositoryCursor>,
    transport: T,
    headers: HeaderMap,
}

impl PubClient<HttpTransport> {
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let cursor = RepositoryCursor::from_config(config)?;
        let transport = HttpTransport::new(config)?;
        let client = Self::new(cursor, transport);
        match &config.user_agent {
            Some(user_agent) => client.with_user_agent(user_agent),
            None => Ok(client),
        }
    }

    /// Client for `PUB_HOSTED_URL`, or `https://pub.dev/` when unset.
    pub fn from_env() -> Result<Self> {
        Self::from_config(&ClientConfig::from_env())
    }
}

impl<T: Transport> PubClient<T> {
    pub fn new(cursor: impl Into<Arc<RepositoryCursor>>, transport: T) -> Self {
        let user_agent = HeaderValue::from_str(&default_user_agent())
            .unwrap_or_else(|_| HeaderValue::from_static("dartpub"));

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, user_agent);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

        Self {
            cursor: cursor.into(),
            transport,
            headers,
        }
    }

    /// Replaces the `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: &str) -> Result<Self> {
        let value = HeaderValue::from_str(user_agent).map_err(|e| {
            ApiError::invalid_argument(format!("invalid User-Agent '{user_agent}': {e}"))
        })?;
        self.headers.insert(USER_AGENT, value);
        Ok(self)
    }

    pub fn cursor(&self) -> &RepositoryCursor {
        &self.cursor
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.headers.get(USER_AGENT).and_then(|v| v.to_str().ok())
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub const fn search(&self) -> SearchCommand<'_, T> {
        SearchCommand::new(self)
    }

    pub const fn package(&self) -> PackageCommand<'_, T> {
        PackageCommand::new(self)
    }

    pub const fn documentation(&self) -> DocumentationCommand<'_, T> {
        DocumentationCommand::new(self)
    }

    /// GETs `url` and decodes the body as JSON.
    ///
    /// Any status other than 200 is reported as [`ApiError::ResponseError`].
    pub async fn get_json(&self, url: &Url) -> Result<Value> {
        tracing::debug!(url = %url, "dispatching registry request");

        let response = self.transport.get(url, &self.headers).await?;
        if response.status != 200 {
            tracing::warn!(url = %url, status = response.status, "registry request failed");
            return Err(ApiError::ResponseError {
                status: response.status,
            });
        }

        serde_json::from_slice(&response.body).map_err(|source| ApiError::InvalidJson {
            url: url.to_string(),
            source,
        })
    }
}
