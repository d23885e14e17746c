//! Client configuration.
//!
//! [`ClientConfig`] deserializes with every field optional, so it can be
//! embedded as a section in an application's own configuration file:
//!
//! ```toml
//! [pub]
//! hosted_url = "https://pub.example.com/"
//! timeout_ms = 10000
//! ```

use serde::Deserialize;
use std::time::Duration;

/// Repository used when nothing else is configured.
pub const DEFAULT_HOSTED_URL: &str = "https://pub.dev/";

/// Environment variable overriding the repository host.
pub const HOSTED_URL_ENV: &str = "PUB_HOSTED_URL";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the package repository.
    pub hosted_url: String,
    /// Whole-request timeout in milliseconds. `None` waits indefinitely.
    pub timeout_ms: Option<u64>,
    /// Replaces the computed `User-Agent` header.
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            hosted_url: DEFAULT_HOSTED_URL.to_string(),
            timeout_ms: None,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Default configuration with the host taken from `PUB_HOSTED_URL`, when
    /// set and non-empty.
    pub fn from_env() -> Self {
        Self::default().with_hosted_url_override(std::env::var(HOSTED_URL_ENV).ok())
    }

    pub fn with_hosted_url(mut self, hosted_url: impl Into<String>) -> Self {
        self.hosted_url = hosted_url.into();
        self
    }

    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    fn with_hosted_url_override(self, hosted_url: Option<String>) -> Self {
        match hosted_url.map(|url| url.trim().to_string()) {
            Some(url) if !url.is_empty() => self.with_hosted_url(url),
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.hosted_url, "https://pub.dev/");
        assert!(config.timeout().is_none());
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ClientConfig =
            serde_json::from_str(r#"{ "timeout_ms": 2500 }"#).unwrap();
        assert_eq!(config.hosted_url, DEFAULT_HOSTED_URL);
        assert_eq!(config.timeout(), Some(Duration::from_millis(2500)));
    }

    #[test]
    fn test_deserialize_full() {
        let config: ClientConfig = serde_json::from_str(
            r#"{ "hosted_url": "https://pub.example.com/", "user_agent": "mirror-sync/1.0" }"#,
        )
        .unwrap();
        assert_eq!(config.hosted_url, "https://pub.example.com/");
        assert_eq!(config.user_agent.as_deref(), Some("mirror-sync/1.0"));
    }

    #[test]
    fn test_hosted_url_override() {
        let config = ClientConfig::default()
            .with_hosted_url_override(Some(" https://mirror.example.com ".into()));
        assert_eq!(config.hosted_url, "https://mirror.example.com");

        let config = ClientConfig::default().with_hosted_url_override(Some(String::new()));
        assert_eq!(config.hosted_url, DEFAULT_HOSTED_URL);

        let config = ClientConfig::default().with_hosted_url_override(None);
        assert_eq!(config.hosted_url, DEFAULT_HOSTED_URL);
    }

    #[test]
    fn test_builder_methods() {
        let config = ClientConfig::default()
            .with_hosted_url("http://localhost:8080/")
            .with_timeout_ms(100)
            .with_user_agent("test");
        assert_eq!(config.hosted_url, "http://localhost:8080/");
        assert_eq!(config.timeout_ms, Some(100));
        assert_eq!(config.user_agent.as_deref(), Some("test"));
    }
}
