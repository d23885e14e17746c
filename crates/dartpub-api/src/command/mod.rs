//! Registry API commands.
//!
//! Each command borrows a [`PubClient`](crate::PubClient), turns typed
//! arguments into an endpoint URL and issues one GET. `execute` returns the
//! untyped JSON body; `fetch` decodes it into a result model.

mod documentation;
mod package;
mod search;

pub use documentation::DocumentationCommand;
pub use package::PackageCommand;
pub use search::{SearchCommand, SearchOrder, SearchQuery};

use crate::error::{ApiError, Result};

fn require_package_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ApiError::invalid_argument("package name must not be empty"));
    }
    Ok(())
}
