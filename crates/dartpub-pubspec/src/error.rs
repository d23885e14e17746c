//! Errors raised while decoding pubspec manifests and dependency declarations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PubspecError {
    #[error("Unrecognized key '{key}' in dependency '{package}'")]
    UnrecognizedDependencyShape { package: String, key: String },

    #[error("Invalid dependency '{package}': {message}")]
    InvalidDependencyShape { package: String, message: String },

    #[error("Dependency '{package}' declares more than one source: {}", keys.join(", "))]
    AmbiguousDependencyShape { package: String, keys: Vec<String> },

    #[error("Invalid pubspec field '{field}': {message}")]
    InvalidManifestField { field: String, message: String },

    #[error("Invalid version '{version}': {source}")]
    InvalidVersion {
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("Invalid version constraint '{constraint}': {message}")]
    InvalidVersionConstraint { constraint: String, message: String },

    #[error("Failed to parse pubspec.yaml: {message}")]
    YamlParse { message: String },
}

pub type Result<T> = std::result::Result<T, PubspecError>;

impl PubspecError {
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidManifestField {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invalid_shape(package: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDependencyShape {
            package: package.into(),
            message: message.into(),
        }
    }

    pub fn unrecognized_key(package: impl Into<String>, key: impl Into<String>) -> Self {
        Self::UnrecognizedDependencyShape {
            package: package.into(),
            key: key.into(),
        }
    }

    pub fn invalid_constraint(constraint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidVersionConstraint {
            constraint: constraint.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PubspecError::unrecognized_key("http", "svn");
        assert_eq!(err.to_string(), "Unrecognized key 'svn' in dependency 'http'");

        let err = PubspecError::invalid_field("name", "missing required field");
        assert_eq!(
            err.to_string(),
            "Invalid pubspec field 'name': missing required field"
        );
    }

    #[test]
    fn test_ambiguous_display_lists_keys() {
        let err = PubspecError::AmbiguousDependencyShape {
            package: "foo".into(),
            keys: vec!["git".into(), "path".into()],
        };
        assert_eq!(
            err.to_string(),
            "Dependency 'foo' declares more than one source: git, path"
        );
    }

    #[test]
    fn test_invalid_version_keeps_source() {
        use std::error::Error as _;

        let source = "not.a.version".parse::<semver::Version>().unwrap_err();
        let err = PubspecError::InvalidVersion {
            version: "not.a.version".into(),
            source,
        };
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("Invalid version 'not.a.version'"));
    }

    #[test]
    fn test_invalid_constraint_display() {
        let err = PubspecError::invalid_constraint(">=1.0.0 >=2.0.0", "duplicate lower bound");
        assert_eq!(
            err.to_string(),
            "Invalid version constraint '>=1.0.0 >=2.0.0': duplicate lower bound"
        );
    }
}
