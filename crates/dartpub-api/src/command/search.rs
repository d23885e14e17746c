use crate::client::PubClient;
use crate::cursor::RepositoryCursor;
use crate::error::{ApiError, Result};
use crate::result::SearchPage;
use crate::transport::Transport;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Result ordering accepted by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchOrder {
    Top,
    Text,
    Created,
    Updated,
    Popularity,
    Like,
    Points,
}

impl SearchOrder {
    pub const ALL: [Self; 7] = [
        Self::Top,
        Self::Text,
        Self::Created,
        Self::Updated,
        Self::Popularity,
        Self::Like,
        Self::Points,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Text => "text",
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Popularity => "popularity",
            Self::Like => "like",
            Self::Points => "points",
        }
    }
}

impl fmt::Display for SearchOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchOrder {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|order| order.as_str() == lower)
            .ok_or_else(|| ApiError::invalid_argument(format!("unknown search order '{s}'")))
    }
}

/// Arguments of a search request.
///
/// Defaults to no query text, the first page and the server's ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    query: Option<String>,
    page: u32,
    sort: Option<SearchOrder>,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: None,
            page: 1,
            sort: None,
        }
    }
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a first-page search for `query`.
    pub fn text(query: impl Into<String>) -> Self {
        Self::new().with_query(query)
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// 1-based page number.
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub const fn with_sort(mut self, sort: SearchOrder) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub const fn page(&self) -> u32 {
        self.page
    }

    pub const fn sort(&self) -> Option<SearchOrder> {
        self.sort
    }
}

/// `GET <api>/search`.
#[derive(Debug)]
pub struct SearchCommand<'a, T> {
    client: &'a PubClient<T>,
}

impl<'a, T: Transport> SearchCommand<'a, T> {
    pub(crate) const fn new(client: &'a PubClient<T>) -> Self {
        Self { client }
    }

    /// Search endpoint URL for `query`.
    ///
    /// Parameters equal to their defaults are left out, so an empty query
    /// yields the bare endpoint.
    pub fn construct_url(cursor: &RepositoryCursor, query: &SearchQuery) -> Result<Url> {
        if query.page() < 1 {
            return Err(ApiError::invalid_argument(format!(
                "page must be at least 1, got {}",
                query.page()
            )));
        }

        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(text) = query.query().filter(|q| !q.is_empty()) {
            params.push(("q", text.to_string()));
        }
        if query.page() != 1 {
            params.push(("page", query.page().to_string()));
        }
        if let Some(sort) = query.sort() {
            params.push(("sort", sort.to_string()));
        }

        let mut url = cursor.search_url().clone();
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    pub async fn execute(&self, query: &SearchQuery) -> Result<Value> {
        let url = Self::construct_url(self.client.cursor(), query)?;
        self.client.get_json(&url).await
    }

    pub async fn fetch(&self, query: &SearchQuery) -> Result<SearchPage> {
        SearchPage::from_json(&self.execute(query).await?)
    }
}
