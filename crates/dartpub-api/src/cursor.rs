//! Repository endpoint URLs.

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use dartpub_pubspec::Version;
use url::Url;

const API_SEGMENT: &str = "api";
const SEARCH_SEGMENT: &str = "search";
const PACKAGE_SEGMENT: &str = "package";
const DOCUMENTATION_SEGMENT: &str = "documentation";

/// Endpoint URLs of one package repository.
///
/// All endpoints are derived from the base URL once, at construction.
/// Segments are appended with URL path semantics, so a base with or without
/// a trailing slash yields the same endpoints and package names are
/// percent-encoded as a single segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryCursor {
    base: Url,
    api_root: Url,
    search: Url,
    packages: Url,
    documentation: Url,
}

impl RepositoryCursor {
    pub fn new(base: Url) -> Result<Self> {
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: base.to_string(),
                message: "URL cannot carry path segments".into(),
            });
        }

        let api_root = with_segments(&base, &[API_SEGMENT]);
        let search = with_segments(&api_root, &[SEARCH_SEGMENT]);
        let packages = with_segments(&api_root, &[PACKAGE_SEGMENT]);
        let documentation = with_segments(&api_root, &[DOCUMENTATION_SEGMENT]);

        Ok(Self {
            base,
            api_root,
            search,
            packages,
            documentation,
        })
    }

    pub fn parse(base: &str) -> Result<Self> {
        let url = Url::parse(base).map_err(|e| ApiError::InvalidUrl {
            url: base.to_string(),
            message: e.to_string(),
        })?;
        Self::new(url)
    }

    /// Uses `PUB_HOSTED_URL` when set, otherwise `https://pub.dev/`.
    pub fn from_env() -> Result<Self> {
        Self::from_config(&ClientConfig::from_env())
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::parse(&config.hosted_url)
    }

    pub const fn base_host(&self) -> &Url {
        &self.base
    }

    pub const fn api_root(&self) -> &Url {
        &self.api_root
    }

    pub const fn search_url(&self) -> &Url {
        &self.search
    }

    pub const fn packages_url(&self) -> &Url {
        &self.packages
    }

    pub const fn documentation_url(&self) -> &Url {
        &self.documentation
    }

    /// Package-info endpoint for `name`.
    pub fn package_url(&self, name: &str) -> Url {
        with_segments(&self.packages, &[name])
    }

    /// Documentation-status endpoint for `name`.
    pub fn package_documentation_url(&self, name: &str) -> Url {
        with_segments(&self.documentation, &[name])
    }

    /// Rendered documentation page of one package version.
    pub fn documentation_page_url(&self, name: &str, version: &Version) -> Url {
        let version = version.to_string();
        with_segments(&self.base, &[DOCUMENTATION_SEGMENT, name, version.as_str()])
    }
}

fn with_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    // Only fails for cannot-be-a-base URLs, rejected in `RepositoryCursor::new`.
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
