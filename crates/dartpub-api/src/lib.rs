//! Client for pub.dev-compatible package repositories.
//!
//! ```no_run
//! use dartpub_api::{PubClient, SearchOrder, SearchQuery};
//!
//! # async fn run() -> dartpub_api::Result<()> {
//! let client = PubClient::from_env()?;
//! let hits = client
//!     .search()
//!     .fetch(&SearchQuery::text("http").with_sort(SearchOrder::Popularity))
//!     .await?;
//! for name in hits.packages() {
//!     let info = client.package().fetch(name).await?;
//!     println!("{} {}", info.name(), info.latest().version());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Endpoints are resolved once from `PUB_HOSTED_URL` (default
//! `https://pub.dev/`) or from a [`ClientConfig`].

pub mod client;
pub mod command;
pub mod config;
pub mod cursor;
pub mod error;
pub mod result;
pub mod transport;

pub use client::{PubClient, default_user_agent};
pub use command::{DocumentationCommand, PackageCommand, SearchCommand, SearchOrder, SearchQuery};
pub use config::{ClientConfig, DEFAULT_HOSTED_URL, HOSTED_URL_ENV};
pub use cursor::RepositoryCursor;
pub use error::{ApiError, Result};
pub use result::{
    DocumentationStatus, PackageDocumentation, PackageInfo, PackageVersion, SearchPage,
    VersionDocumentation,
};
pub use transport::{HttpTransport, Transport, TransportResponse};

pub use dartpub_pubspec as pubspec;
