//! Typed views of registry responses.

mod documentation;
mod package;
mod search;

pub use documentation::{DocumentationStatus, PackageDocumentation, VersionDocumentation};
pub use package::{PackageInfo, PackageVersion};
pub use search::SearchPage;
