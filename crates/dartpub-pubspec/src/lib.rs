//! pubspec manifests and dependency declarations.
//!
//! This crate models the Dart `pubspec.yaml` format: versions and version
//! constraints, the five dependency kinds, and the full manifest. Every type
//! decodes from and encodes to the JSON-shaped map used by the pub.dev API.

pub mod dependency;
pub mod error;
pub mod pubspec;
pub mod version;
pub mod yaml;

pub use dependency::{
    Dependency, DependencyKind, DependencyMap, DependencySection, ExternalHostedDependency,
    GitDependency, HostedDependency, PathDependency, SdkDependency, decode_dependency_map,
    encode_dependency_map,
};
pub use error::{PubspecError, Result};
pub use pubspec::{KNOWN_FIELDS, Pubspec, PubspecBuilder, Screenshot};
pub use version::{Bound, Version, VersionConstraint, VersionRange};
pub use yaml::yaml_to_value;
