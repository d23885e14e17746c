use crate::cursor::RepositoryCursor;
use crate::error::{ApiError, Result};
use dartpub_pubspec::Version;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Documentation build state of one package version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentationStatus {
    Pending,
    Failed,
    Succeeded,
}

impl DocumentationStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Failed => "failed",
            Self::Succeeded => "completed",
        }
    }
}

impl fmt::Display for DocumentationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentationStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" | "awaiting" => Ok(Self::Pending),
            "failed" => Ok(Self::Failed),
            "completed" | "success" => Ok(Self::Succeeded),
            other => Err(ApiError::invalid_response(format!(
                "unknown documentation status '{other}'"
            ))),
        }
    }
}

/// Documentation state of a single package version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDocumentation {
    package: String,
    version: Version,
    status: DocumentationStatus,
    has_documentation: bool,
}

impl VersionDocumentation {
    /// Fails when `has_documentation` is set for a build that did not
    /// succeed.
    pub fn new(
        package: impl Into<String>,
        version: Version,
        status: DocumentationStatus,
        has_documentation: bool,
    ) -> Result<Self> {
        let package = package.into();
        if has_documentation && status != DocumentationStatus::Succeeded {
            return Err(ApiError::invalid_argument(format!(
                "{package} {version}: documentation cannot be available while the build is {status}"
            )));
        }
        Ok(Self {
            package,
            version,
            status,
            has_documentation,
        })
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub const fn version(&self) -> &Version {
        &self.version
    }

    pub const fn status(&self) -> DocumentationStatus {
        self.status
    }

    pub const fn has_documentation(&self) -> bool {
        self.has_documentation
    }

    /// Rendered documentation page, when one exists.
    pub fn documentation_url(&self, cursor: &RepositoryCursor) -> Option<Url> {
        self.has_documentation
            .then(|| cursor.documentation_page_url(&self.package, &self.version))
    }
}

/// Documentation state of every version of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDocumentation {
    name: String,
    latest_stable_version: Version,
    versions: Vec<VersionDocumentation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentationResponse {
    name: String,
    latest_stable_version: String,
    #[serde(default)]
    versions: Vec<VersionEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionEntry {
    version: String,
    status: String,
    #[serde(default)]
    has_documentation: bool,
}

impl PackageDocumentation {
    pub fn new(
        name: impl Into<String>,
        latest_stable_version: Version,
        versions: Vec<VersionDocumentation>,
    ) -> Self {
        Self {
            name: name.into(),
            latest_stable_version,
            versions,
        }
    }

    /// Decodes the body of a documentation-status response.
    pub fn from_json(value: &Value) -> Result<Self> {
        let response = DocumentationResponse::deserialize(value).map_err(|e| {
            ApiError::invalid_response(format!("malformed documentation response: {e}"))
        })?;

        let versions = response
            .versions
            .into_iter()
            .map(|entry| {
                VersionDocumentation::new(
                    response.name.as_str(),
                    Version::parse(&entry.version)?,
                    entry.status.parse()?,
                    entry.has_documentation,
                )
                .map_err(|e| match e {
                    ApiError::InvalidArgument { message } => ApiError::InvalidResponse { message },
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            latest_stable_version: Version::parse(&response.latest_stable_version)?,
            name: response.name,
            versions,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn latest_stable_version(&self) -> &Version {
        &self.latest_stable_version
    }

    /// Per-version entries in the order the repository listed them.
    pub fn versions(&self) -> &[VersionDocumentation] {
        &self.versions
    }

    pub fn version(&self, version: &Version) -> Option<&VersionDocumentation> {
        self.versions.iter().find(|v| v.version() == version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "name": "http",
            "latestStableVersion": "1.2.1",
            "versions": [
                { "version": "1.2.1", "status": "completed", "hasDocumentation": true },
                { "version": "1.3.0-beta.1", "status": "pending", "hasDocumentation": false },
                { "version": "0.13.6", "status": "failed", "hasDocumentation": false }
            ]
        })
    }

    #[test]
    fn test_has_documentation_requires_success() {
        let err = VersionDocumentation::new(
            "http",
            Version::new(1, 0, 0),
            DocumentationStatus::Pending,
            true,
        )
        .unwrap_err();
        assert!(err.is_validation_error());

        assert!(
            VersionDocumentation::new(
                "http",
                Version::new(1, 0, 0),
                DocumentationStatus::Succeeded,
                false
            )
            .is_ok()
        );
    }

    #[test]
    fn test_documentation_url() {
        let cursor = RepositoryCursor::parse("https://pub.dev/").unwrap();
        let doc = VersionDocumentation::new(
            "http",
            Version::new(1, 2, 1),
            DocumentationStatus::Succeeded,
            true,
        )
        .unwrap();
        assert_eq!(
            doc.documentation_url(&cursor).map(String::from),
            Some("https://pub.dev/documentation/http/1.2.1".to_string())
        );

        let missing = VersionDocumentation::new(
            "http",
            Version::new(1, 2, 1),
            DocumentationStatus::Failed,
            false,
        )
        .unwrap();
        assert!(missing.documentation_url(&cursor).is_none());
    }

    #[test]
    fn test_from_json() {
        let docs = PackageDocumentation::from_json(&sample()).unwrap();
        assert_eq!(docs.name(), "http");
        assert_eq!(docs.latest_stable_version(), &Version::new(1, 2, 1));
        assert_eq!(docs.versions().len(), 3);
        assert_eq!(docs.versions()[1].status(), DocumentationStatus::Pending);
        assert!(docs.versions()[1].version().is_prerelease());

        let stable = docs.version(&Version::new(1, 2, 1)).unwrap();
        assert!(stable.has_documentation());
        assert_eq!(stable.package(), "http");
    }

    #[test]
    fn test_from_json_inconsistent_entry() {
        let raw = json!({
            "name": "http",
            "latestStableVersion": "1.0.0",
            "versions": [{ "version": "1.0.0", "status": "failed", "hasDocumentation": true }]
        });
        assert!(matches!(
            PackageDocumentation::from_json(&raw),
            Err(ApiError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn test_from_json_missing_field() {
        let raw = json!({ "name": "http" });
        assert!(matches!(
            PackageDocumentation::from_json(&raw),
            Err(ApiError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn test_from_json_bad_version() {
        let raw = json!({ "name": "http", "latestStableVersion": "latest" });
        assert!(matches!(
            PackageDocumentation::from_json(&raw),
            Err(ApiError::Pubspec(_))
        ));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "completed".parse::<DocumentationStatus>().unwrap(),
            DocumentationStatus::Succeeded
        );
        assert_eq!(
            "failed".parse::<DocumentationStatus>().unwrap(),
            DocumentationStatus::Failed
        );
        assert!("unknown".parse::<DocumentationStatus>().is_err());
    }
}
