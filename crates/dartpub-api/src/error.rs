//! Errors returned by the registry client.

use dartpub_pubspec::PubspecError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("The response returned with error code: {status}")]
    ResponseError { status: u16 },

    #[error("Request failed: {source}")]
    Transport {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid repository URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Failed to parse JSON response from {url}: {source}")]
    InvalidJson {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected response content: {message}")]
    InvalidResponse { message: String },

    #[error(transparent)]
    Pubspec(#[from] PubspecError),
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Wraps a transport failure without altering it.
    pub fn transport(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Transport {
            source: source.into(),
        }
    }

    /// The request was rejected before anything was sent.
    pub const fn is_validation_error(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. } | Self::InvalidUrl { .. })
    }

    /// The repository answered with an error or could not be reached.
    pub const fn is_remote_error(&self) -> bool {
        matches!(
            self,
            Self::ResponseError { .. }
                | Self::Transport { .. }
                | Self::InvalidJson { .. }
                | Self::InvalidResponse { .. }
        )
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::ResponseError { status: 404 };
        assert_eq!(
            err.to_string(),
            "The response returned with error code: 404"
        );

        let err = ApiError::invalid_argument("page must be at least 1");
        assert_eq!(err.to_string(), "Invalid argument: page must be at least 1");
    }

    #[test]
    fn test_error_classification() {
        assert!(ApiError::invalid_argument("x").is_validation_error());
        assert!(!ApiError::invalid_argument("x").is_remote_error());
        assert!(ApiError::ResponseError { status: 500 }.is_remote_error());
        assert!(ApiError::transport(std::io::Error::other("reset")).is_remote_error());

        let pubspec: ApiError = PubspecError::invalid_field("name", "missing").into();
        assert!(!pubspec.is_validation_error());
        assert!(!pubspec.is_remote_error());
    }

    #[test]
    fn test_transport_source_preserved() {
        let err = ApiError::transport(std::io::Error::other("connection reset"));
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("connection reset"));
    }

    #[test]
    fn test_pubspec_error_is_transparent() {
        let err: ApiError = PubspecError::invalid_field("name", "missing required field").into();
        assert_eq!(
            err.to_string(),
            "Invalid pubspec field 'name': missing required field"
        );
    }
}
