use crate::error::{ApiError, Result};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// One page of search hits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    packages: Vec<String>,
    next: Option<Url>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    packages: Vec<SearchEntry>,
    next: Option<String>,
}

#[derive(Deserialize)]
struct SearchEntry {
    package: String,
}

impl SearchPage {
    pub fn from_json(value: &Value) -> Result<Self> {
        let response = SearchResponse::deserialize(value).map_err(|e| {
            ApiError::invalid_response(format!("malformed search response: {e}"))
        })?;

        let next = response
            .next
            .map(|next| {
                Url::parse(&next).map_err(|e| {
                    ApiError::invalid_response(format!("invalid next page URL '{next}': {e}"))
                })
            })
            .transpose()?;

        Ok(Self {
            packages: response.packages.into_iter().map(|e| e.package).collect(),
            next,
        })
    }

    /// Package names in ranking order.
    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    /// URL of the following page, absent on the last one.
    pub const fn next_page_url(&self) -> Option<&Url> {
        self.next.as_ref()
    }
}
