//! Dependency declarations and their raw pubspec form.
//!
//! A dependency entry in a pubspec is one of:
//!
//! - `null`: hosted on the default repository, any version
//! - a string: hosted on the default repository with a version constraint
//! - a map tagged by exactly one of `hosted`, `git`, `path` or `sdk`,
//!   optionally next to a `version` key
//!
//! [`Dependency::decode`] turns such a value into a typed variant and
//! [`Dependency::encode`] produces a value that decodes back to an equal
//! variant.

use crate::error::{PubspecError, Result};
use crate::version::VersionConstraint;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::fmt;

const TAG_KEYS: [&str; 4] = ["hosted", "git", "path", "sdk"];
const VERSION_KEY: &str = "version";

/// Dependencies keyed by package name.
pub type DependencyMap = BTreeMap<String, Dependency>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DependencySection {
    #[default]
    Dependencies,
    DevDependencies,
    DependencyOverrides,
}

impl DependencySection {
    pub const ALL: [Self; 3] = [
        Self::Dependencies,
        Self::DevDependencies,
        Self::DependencyOverrides,
    ];

    /// The pubspec key holding this section.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Dependencies => "dependencies",
            Self::DevDependencies => "dev_dependencies",
            Self::DependencyOverrides => "dependency_overrides",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    Hosted,
    ExternalHosted,
    Git,
    Path,
    Sdk,
}

/// Package from the default repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct HostedDependency {
    version: Option<VersionConstraint>,
}

impl HostedDependency {
    pub fn new(version: Option<VersionConstraint>) -> Self {
        Self {
            version: normalize_constraint(version),
        }
    }

    pub const fn version(&self) -> Option<&VersionConstraint> {
        self.version.as_ref()
    }
}

/// Package from a repository other than the default one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalHostedDependency {
    version: Option<VersionConstraint>,
    url: String,
    name: Option<String>,
}

impl ExternalHostedDependency {
    pub fn new(
        url: impl Into<String>,
        name: Option<String>,
        version: Option<VersionConstraint>,
    ) -> Self {
        Self {
            version: normalize_constraint(version),
            url: url.into(),
            name: name.filter(|n| !n.is_empty()),
        }
    }

    pub const fn version(&self) -> Option<&VersionConstraint> {
        self.version.as_ref()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Package name on the remote repository, when it differs from the key.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GitDependency {
    url: String,
    path: Option<String>,
    ref_: Option<String>,
}

impl GitDependency {
    pub fn new(url: impl Into<String>, path: Option<String>, ref_: Option<String>) -> Self {
        Self {
            url: url.into(),
            path: path.filter(|p| !p.is_empty()),
            ref_: ref_.filter(|r| !r.is_empty()),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Branch, tag or commit to check out.
    pub fn git_ref(&self) -> Option<&str> {
        self.ref_.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathDependency {
    path: String,
}

impl PathDependency {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SdkDependency {
    sdk: String,
    version: Option<VersionConstraint>,
}

impl SdkDependency {
    pub fn new(sdk: impl Into<String>, version: Option<VersionConstraint>) -> Self {
        Self {
            sdk: sdk.into(),
            version: normalize_constraint(version),
        }
    }

    pub fn sdk(&self) -> &str {
        &self.sdk
    }

    pub const fn version(&self) -> Option<&VersionConstraint> {
        self.version.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dependency {
    Hosted(HostedDependency),
    ExternalHosted(ExternalHostedDependency),
    Git(GitDependency),
    Path(PathDependency),
    Sdk(SdkDependency),
}

impl Dependency {
    /// Decodes the raw value declared for package `name`.
    pub fn decode(name: &str, raw: &Value) -> Result<Self> {
        match raw {
            Value::Null => Ok(Self::Hosted(HostedDependency::default())),
            Value::String(constraint) => Ok(Self::Hosted(HostedDependency::new(Some(
                VersionConstraint::parse(constraint)?,
            )))),
            Value::Object(map) => decode_map(name, map),
            other => Err(PubspecError::invalid_shape(
                name,
                format!("expected a version string or a map, found {other}"),
            )),
        }
    }

    /// Encodes this dependency into its raw pubspec form.
    pub fn encode(&self) -> Value {
        match self {
            Self::Hosted(dep) => Value::String(constraint_text(dep.version())),
            Self::ExternalHosted(dep) => {
                let hosted = match dep.name() {
                    Some(name) => json!({ "name": name, "url": dep.url() }),
                    None => Value::String(dep.url().to_string()),
                };
                json!({
                    "hosted": hosted,
                    "version": constraint_text(dep.version()),
                })
            }
            Self::Git(dep) => {
                if dep.path().is_none() && dep.git_ref().is_none() {
                    return json!({ "git": dep.url() });
                }
                let mut git = Map::new();
                git.insert("url".into(), dep.url().into());
                if let Some(path) = dep.path() {
                    git.insert("path".into(), path.into());
                }
                if let Some(git_ref) = dep.git_ref() {
                    git.insert("ref".into(), git_ref.into());
                }
                json!({ "git": git })
            }
            Self::Path(dep) => json!({ "path": dep.path() }),
            Self::Sdk(dep) => {
                let mut map = Map::new();
                map.insert("sdk".into(), dep.sdk().into());
                if let Some(version) = dep.version() {
                    map.insert(VERSION_KEY.into(), version.to_string().into());
                }
                Value::Object(map)
            }
        }
    }

    pub const fn kind(&self) -> DependencyKind {
        match self {
            Self::Hosted(_) => DependencyKind::Hosted,
            Self::ExternalHosted(_) => DependencyKind::ExternalHosted,
            Self::Git(_) => DependencyKind::Git,
            Self::Path(_) => DependencyKind::Path,
            Self::Sdk(_) => DependencyKind::Sdk,
        }
    }

    pub const fn version_constraint(&self) -> Option<&VersionConstraint> {
        match self {
            Self::Hosted(dep) => dep.version(),
            Self::ExternalHosted(dep) => dep.version(),
            Self::Sdk(dep) => dep.version(),
            Self::Git(_) | Self::Path(_) => None,
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

fn decode_map(name: &str, map: &Map<String, Value>) -> Result<Dependency> {
    if let Some(key) = map
        .keys()
        .find(|k| k.as_str() != VERSION_KEY && !TAG_KEYS.contains(&k.as_str()))
    {
        return Err(PubspecError::unrecognized_key(name, key.as_str()));
    }

    let tags: Vec<&str> = TAG_KEYS
        .into_iter()
        .filter(|tag| map.contains_key(*tag))
        .collect();
    if tags.len() > 1 {
        return Err(PubspecError::AmbiguousDependencyShape {
            package: name.to_string(),
            keys: tags.into_iter().map(String::from).collect(),
        });
    }

    let version = match map.get(VERSION_KEY) {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(VersionConstraint::parse(text)?),
        Some(other) => {
            return Err(PubspecError::invalid_shape(
                name,
                format!("'version' must be a string, found {other}"),
            ));
        }
    };

    let Some(&tag) = tags.first() else {
        return Ok(Dependency::Hosted(HostedDependency::new(version)));
    };
    let value = map.get(tag).unwrap_or(&Value::Null);

    if matches!(tag, "git" | "path") && map.contains_key(VERSION_KEY) {
        return Err(PubspecError::unrecognized_key(name, VERSION_KEY));
    }

    match tag {
        "hosted" => decode_hosted(name, value, version),
        "git" => decode_git(name, value),
        "path" => match value {
            Value::String(path) => Ok(Dependency::Path(PathDependency::new(path.as_str()))),
            other => Err(PubspecError::invalid_shape(
                name,
                format!("'path' must be a string, found {other}"),
            )),
        },
        _ => match value {
            Value::String(sdk) => Ok(Dependency::Sdk(SdkDependency::new(sdk.as_str(), version))),
            other => Err(PubspecError::invalid_shape(
                name,
                format!("'sdk' must be a string, found {other}"),
            )),
        },
    }
}

fn decode_hosted(
    name: &str,
    value: &Value,
    version: Option<VersionConstraint>,
) -> Result<Dependency> {
    match value {
        Value::Null => Ok(Dependency::Hosted(HostedDependency::new(version))),
        Value::String(url) => Ok(Dependency::ExternalHosted(ExternalHostedDependency::new(
            url.as_str(),
            None,
            version,
        ))),
        Value::Object(hosted) => {
            reject_unknown_keys(name, hosted, &["name", "url"])?;
            let url = required_string(name, hosted, "url", "hosted")?;
            let remote_name = optional_string(name, hosted, "name", "hosted")?;
            Ok(Dependency::ExternalHosted(ExternalHostedDependency::new(
                url,
                remote_name,
                version,
            )))
        }
        other => Err(PubspecError::invalid_shape(
            name,
            format!("'hosted' must be a URL or a map, found {other}"),
        )),
    }
}

fn decode_git(name: &str, value: &Value) -> Result<Dependency> {
    match value {
        Value::String(url) => Ok(Dependency::Git(GitDependency::new(url.as_str(), None, None))),
        Value::Object(git) => {
            reject_unknown_keys(name, git, &["url", "path", "ref"])?;
            let url = required_string(name, git, "url", "git")?;
            let path = optional_string(name, git, "path", "git")?;
            let ref_ = optional_string(name, git, "ref", "git")?;
            Ok(Dependency::Git(GitDependency::new(url, path, ref_)))
        }
        other => Err(PubspecError::invalid_shape(
            name,
            format!("'git' must be a URL or a map, found {other}"),
        )),
    }
}

fn reject_unknown_keys(name: &str, map: &Map<String, Value>, allowed: &[&str]) -> Result<()> {
    match map.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(key) => Err(PubspecError::unrecognized_key(name, key.as_str())),
        None => Ok(()),
    }
}

fn required_string(
    name: &str,
    map: &Map<String, Value>,
    key: &str,
    context: &str,
) -> Result<String> {
    optional_string(name, map, key, context)?.ok_or_else(|| {
        PubspecError::invalid_shape(name, format!("'{context}' map requires a '{key}' string"))
    })
}

fn optional_string(
    name: &str,
    map: &Map<String, Value>,
    key: &str,
    context: &str,
) -> Result<Option<String>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(PubspecError::invalid_shape(
            name,
            format!("'{context}.{key}' must be a string, found {other}"),
        )),
    }
}

fn normalize_constraint(version: Option<VersionConstraint>) -> Option<VersionConstraint> {
    version.filter(|v| !v.is_any())
}

fn constraint_text(version: Option<&VersionConstraint>) -> String {
    version.map_or_else(|| "any".to_string(), ToString::to_string)
}

/// Decodes one dependency section (`dependencies`, `dev_dependencies` or
/// `dependency_overrides`). A `null` section is empty.
pub fn decode_dependency_map(field: &str, raw: &Value) -> Result<DependencyMap> {
    match raw {
        Value::Null => Ok(DependencyMap::new()),
        Value::Object(entries) => entries
            .iter()
            .map(|(name, value)| Ok((name.clone(), Dependency::decode(name, value)?)))
            .collect(),
        other => Err(PubspecError::invalid_field(
            field,
            format!("expected a map of dependencies, found {other}"),
        )),
    }
}

pub fn encode_dependency_map(dependencies: &DependencyMap) -> Value {
    Value::Object(
        dependencies
            .iter()
            .map(|(name, dep)| (name.clone(), dep.encode()))
            .collect(),
    )
}
