use crate::error::{ApiError, Result};
use dartpub_pubspec::{Pubspec, Version, VersionConstraint};
use serde::Deserialize;
use serde_json::Value;

/// One published version of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageVersion {
    version: Version,
    pubspec: Pubspec,
    archive_url: Option<String>,
    published: Option<String>,
    retracted: bool,
}

impl PackageVersion {
    pub const fn version(&self) -> &Version {
        &self.version
    }

    /// Manifest as published with this version.
    pub const fn pubspec(&self) -> &Pubspec {
        &self.pubspec
    }

    pub fn archive_url(&self) -> Option<&str> {
        self.archive_url.as_deref()
    }

    /// Publication timestamp as reported by the repository (RFC 3339).
    pub fn published(&self) -> Option<&str> {
        self.published.as_deref()
    }

    pub const fn is_retracted(&self) -> bool {
        self.retracted
    }
}

/// Package-info response: the latest version and the full version list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    name: String,
    latest: PackageVersion,
    versions: Vec<PackageVersion>,
    discontinued: bool,
    replaced_by: Option<String>,
}

#[derive(Deserialize)]
struct PackageResponse {
    name: String,
    latest: VersionEntry,
    #[serde(default)]
    versions: Vec<VersionEntry>,
    #[serde(default, rename = "isDiscontinued")]
    is_discontinued: bool,
    #[serde(rename = "replacedBy")]
    replaced_by: Option<String>,
}

#[derive(Deserialize)]
struct VersionEntry {
    version: String,
    #[serde(default)]
    pubspec: Value,
    archive_url: Option<String>,
    published: Option<String>,
    #[serde(default)]
    retracted: bool,
}

impl VersionEntry {
    fn into_version(self) -> Result<PackageVersion> {
        Ok(PackageVersion {
            version: Version::parse(&self.version)?,
            pubspec: Pubspec::decode(&self.pubspec)?,
            archive_url: self.archive_url,
            published: self.published,
            retracted: self.retracted,
        })
    }
}

impl PackageInfo {
    /// Decodes the body of a package-info response.
    pub fn from_json(value: &Value) -> Result<Self> {
        let response = PackageResponse::deserialize(value).map_err(|e| {
            ApiError::invalid_response(format!("malformed package response: {e}"))
        })?;

        let mut versions = response
            .versions
            .into_iter()
            .map(VersionEntry::into_version)
            .collect::<Result<Vec<_>>>()?;
        versions.sort_by(|a, b| b.version.cmp(&a.version));

        Ok(Self {
            name: response.name,
            latest: response.latest.into_version()?,
            versions,
            discontinued: response.is_discontinued,
            replaced_by: response.replaced_by,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version the repository currently advertises as latest.
    pub const fn latest(&self) -> &PackageVersion {
        &self.latest
    }

    /// All versions, newest first.
    pub fn versions(&self) -> &[PackageVersion] {
        &self.versions
    }

    pub const fn is_discontinued(&self) -> bool {
        self.discontinued
    }

    /// Suggested replacement for a discontinued package.
    pub fn replaced_by(&self) -> Option<&str> {
        self.replaced_by.as_deref()
    }

    /// Newest non-retracted version allowed by `constraint`.
    pub fn latest_matching(&self, constraint: &VersionConstraint) -> Option<&PackageVersion> {
        self.versions
            .iter()
            .find(|v| !v.retracted && constraint.allows(&v.version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn version_entry(version: &str, retracted: bool) -> Value {
        json!({
            "version": version,
            "pubspec": { "name": "provider", "version": version },
            "archive_url": format!("https://pub.dev/api/archives/provider-{version}.tar.gz"),
            "published": "2024-01-01T00:00:00.000Z",
            "retracted": retracted
        })
    }

    fn sample() -> Value {
        json!({
            "name": "provider",
            "latest": version_entry("6.1.2", false),
            "versions": [
                version_entry("5.0.0", false),
                version_entry("6.1.2", false),
                version_entry("6.1.1", true),
                version_entry("6.0.0", false),
                version_entry("7.0.0-dev.1", false)
            ]
        })
    }

    #[test]
    fn test_from_json() {
        let info = PackageInfo::from_json(&sample()).unwrap();
        assert_eq!(info.name(), "provider");
        assert_eq!(info.latest().version(), &Version::new(6, 1, 2));
        assert_eq!(info.latest().pubspec().name(), "provider");
        assert_eq!(
            info.latest().archive_url(),
            Some("https://pub.dev/api/archives/provider-6.1.2.tar.gz")
        );
        assert!(!info.is_discontinued());
        assert!(info.replaced_by().is_none());
    }

    #[test]
    fn test_versions_sorted_newest_first() {
        let info = PackageInfo::from_json(&sample()).unwrap();
        let versions: Vec<String> = info
            .versions()
            .iter()
            .map(|v| v.version().to_string())
            .collect();
        assert_eq!(
            versions,
            ["7.0.0-dev.1", "6.1.2", "6.1.1", "6.0.0", "5.0.0"]
        );
    }

    #[test]
    fn test_latest_matching_skips_retracted() {
        let info = PackageInfo::from_json(&sample()).unwrap();

        let caret = VersionConstraint::parse("^6.0.0").unwrap();
        assert_eq!(
            info.latest_matching(&caret).map(|v| v.version().to_string()),
            Some("6.1.2".into())
        );

        let exact = VersionConstraint::parse("6.1.1").unwrap();
        assert!(info.latest_matching(&exact).is_none());

        let old = VersionConstraint::parse("<6.0.0").unwrap();
        assert_eq!(
            info.latest_matching(&old).map(|v| v.version().to_string()),
            Some("5.0.0".into())
        );
    }

    #[test]
    fn test_discontinued() {
        let mut raw = sample();
        raw["isDiscontinued"] = json!(true);
        raw["replacedBy"] = json!("riverpod");
        let info = PackageInfo::from_json(&raw).unwrap();
        assert!(info.is_discontinued());
        assert_eq!(info.replaced_by(), Some("riverpod"));
    }

    #[test]
    fn test_malformed_response() {
        assert!(matches!(
            PackageInfo::from_json(&json!({ "name": "provider" })),
            Err(ApiError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn test_old_version_with_compact_range() {
        let mut raw = sample();
        raw["versions"][0]["pubspec"]["dependencies"] = json!({ "collection": ">=1.0.0<2.0.0" });
        let info = PackageInfo::from_json(&raw).unwrap();

        let oldest = info.versions().last().unwrap();
        assert_eq!(oldest.version(), &Version::new(5, 0, 0));
        let collection = oldest.pubspec().dependencies()["collection"]
            .version_constraint()
            .unwrap();
        assert_eq!(collection.to_string(), ">=1.0.0 <2.0.0");
    }

    #[test]
    fn test_invalid_pubspec_propagates() {
        let raw = json!({
            "name": "provider",
            "latest": { "version": "1.0.0", "pubspec": { "version": "1.0.0" } }
        });
        assert!(matches!(
            PackageInfo::from_json(&raw),
            Err(ApiError::Pubspec(_))
        ));
    }
}
