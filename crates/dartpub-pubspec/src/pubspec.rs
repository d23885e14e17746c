//! Typed pubspec manifest.

use crate::dependency::{
    Dependency, DependencyMap, DependencySection, decode_dependency_map, encode_dependency_map,
};
use crate::error::{PubspecError, Result};
use crate::version::{Version, VersionConstraint};
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, BTreeSet};

/// Top-level pubspec keys understood by [`Pubspec::decode`], in output order.
pub const KNOWN_FIELDS: &[&str] = &[
    "name",
    "version",
    "description",
    "publish_to",
    "author",
    "authors",
    "homepage",
    "repository",
    "issue_tracker",
    "documentation",
    "funding",
    "topics",
    "screenshots",
    "false_secrets",
    "environment",
    "platforms",
    "executables",
    "dependencies",
    "dev_dependencies",
    "dependency_overrides",
    "flutter",
];

/// A screenshot shown on the package page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screenshot {
    description: String,
    path: String,
}

impl Screenshot {
    pub fn new(description: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            path: path.into(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Image path relative to the package root.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// An immutable pubspec.
///
/// Build one with [`Pubspec::builder`] or decode it from its raw map form
/// with [`Pubspec::decode`]. Empty collections are treated as absent and are
/// left out of [`Pubspec::encode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pubspec {
    name: String,
    version: Option<Version>,
    description: Option<String>,
    publish_to: Option<String>,
    author: Option<String>,
    authors: Vec<String>,
    homepage: Option<String>,
    repository: Option<String>,
    issue_tracker: Option<String>,
    documentation: Option<String>,
    funding: Vec<String>,
    topics: Vec<String>,
    screenshots: Vec<Screenshot>,
    false_secrets: Vec<String>,
    environment: BTreeMap<String, VersionConstraint>,
    platforms: BTreeSet<String>,
    executables: BTreeMap<String, Option<String>>,
    dependencies: DependencyMap,
    dev_dependencies: DependencyMap,
    dependency_overrides: DependencyMap,
    flutter: Option<Map<String, Value>>,
}

impl Pubspec {
    pub fn builder(name: impl Into<String>) -> PubspecBuilder {
        PubspecBuilder {
            inner: Self {
                name: name.into(),
                version: None,
                description: None,
                publish_to: None,
                author: None,
                authors: Vec::new(),
                homepage: None,
                repository: None,
                issue_tracker: None,
                documentation: None,
                funding: Vec::new(),
                topics: Vec::new(),
                screenshots: Vec::new(),
                false_secrets: Vec::new(),
                environment: BTreeMap::new(),
                platforms: BTreeSet::new(),
                executables: BTreeMap::new(),
                dependencies: DependencyMap::new(),
                dev_dependencies: DependencyMap::new(),
                dependency_overrides: DependencyMap::new(),
                flutter: None,
            },
        }
    }

    /// Decodes a pubspec from its raw map form.
    ///
    /// Only keys listed in [`KNOWN_FIELDS`] are read; anything else is
    /// skipped. The input is borrowed and never modified.
    pub fn decode(raw: &Value) -> Result<Self> {
        let Value::Object(fields) = raw else {
            return Err(PubspecError::invalid_field(
                "pubspec",
                format!("expected a map at the document root, found {raw}"),
            ));
        };

        for key in fields
            .keys()
            .filter(|k| !KNOWN_FIELDS.contains(&k.as_str()))
        {
            tracing::debug!(key = %key, "skipping unknown pubspec field");
        }

        let name = string_field(fields, "name")?
            .ok_or_else(|| PubspecError::invalid_field("name", "missing required field"))?;

        let version = string_field(fields, "version")?
            .map(|v| Version::parse(&v))
            .transpose()?;

        Ok(Self {
            name,
            version,
            description: string_field(fields, "description")?,
            publish_to: string_field(fields, "publish_to")?,
            author: string_field(fields, "author")?,
            authors: string_list(fields, "authors")?,
            homepage: string_field(fields, "homepage")?,
            repository: string_field(fields, "repository")?,
            issue_tracker: string_field(fields, "issue_tracker")?,
            documentation: string_field(fields, "documentation")?,
            funding: string_list(fields, "funding")?,
            topics: string_list(fields, "topics")?,
            screenshots: decode_screenshots(fields)?,
            false_secrets: string_list(fields, "false_secrets")?,
            environment: decode_environment(fields)?,
            platforms: decode_platforms(fields)?,
            executables: decode_executables(fields)?,
            dependencies: dependency_section(fields, DependencySection::Dependencies)?,
            dev_dependencies: dependency_section(fields, DependencySection::DevDependencies)?,
            dependency_overrides: dependency_section(
                fields,
                DependencySection::DependencyOverrides,
            )?,
            flutter: decode_flutter(fields)?,
        })
    }

    /// Encodes this pubspec back into its raw map form.
    pub fn encode(&self) -> Value {
        Value::Object(
            self.to_mapping()
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        )
    }

    /// Present fields as ordered `(key, value)` pairs, following
    /// [`KNOWN_FIELDS`].
    pub fn to_mapping(&self) -> Vec<(&'static str, Value)> {
        let mut out = vec![("name", Value::from(self.name.as_str()))];

        push_string(&mut out, "version", self.version.as_ref().map(ToString::to_string));
        push_string(&mut out, "description", self.description.clone());
        push_string(&mut out, "publish_to", self.publish_to.clone());
        push_string(&mut out, "author", self.author.clone());
        push_list(&mut out, "authors", &self.authors);
        push_string(&mut out, "homepage", self.homepage.clone());
        push_string(&mut out, "repository", self.repository.clone());
        push_string(&mut out, "issue_tracker", self.issue_tracker.clone());
        push_string(&mut out, "documentation", self.documentation.clone());
        push_list(&mut out, "funding", &self.funding);
        push_list(&mut out, "topics", &self.topics);

        if !self.screenshots.is_empty() {
            let screenshots = self
                .screenshots
                .iter()
                .map(|s| json!({ "description": s.description(), "path": s.path() }))
                .collect();
            out.push(("screenshots", Value::Array(screenshots)));
        }

        push_list(&mut out, "false_secrets", &self.false_secrets);

        if !self.environment.is_empty() {
            let environment = self
                .environment
                .iter()
                .map(|(key, constraint)| (key.clone(), Value::from(constraint.to_string())))
                .collect();
            out.push(("environment", Value::Object(environment)));
        }

        if !self.platforms.is_empty() {
            let platforms = self
                .platforms
                .iter()
                .map(|p| (p.clone(), Value::Null))
                .collect();
            out.push(("platforms", Value::Object(platforms)));
        }

        if !self.executables.is_empty() {
            let executables = self
                .executables
                .iter()
                .map(|(name, script)| (name.clone(), script.clone().map_or(Value::Null, Value::from)))
                .collect();
            out.push(("executables", Value::Object(executables)));
        }

        for section in DependencySection::ALL {
            let deps = self.dependency_section(section);
            if !deps.is_empty() {
                out.push((section.key(), encode_dependency_map(deps)));
            }
        }

        if let Some(flutter) = &self.flutter {
            out.push(("flutter", Value::Object(flutter.clone())));
        }

        out
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Either a repository URL or `none` for packages that are never published.
    pub fn publish_to(&self) -> Option<&str> {
        self.publish_to.as_deref()
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn homepage(&self) -> Option<&str> {
        self.homepage.as_deref()
    }

    pub fn repository(&self) -> Option<&str> {
        self.repository.as_deref()
    }

    pub fn issue_tracker(&self) -> Option<&str> {
        self.issue_tracker.as_deref()
    }

    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    pub fn funding(&self) -> &[String] {
        &self.funding
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn screenshots(&self) -> &[Screenshot] {
        &self.screenshots
    }

    pub fn false_secrets(&self) -> &[String] {
        &self.false_secrets
    }

    /// SDK constraints keyed by SDK name (`sdk`, `flutter`).
    pub const fn environment(&self) -> &BTreeMap<String, VersionConstraint> {
        &self.environment
    }

    pub fn sdk_constraint(&self) -> Option<&VersionConstraint> {
        self.environment.get("sdk")
    }

    /// Supported platform names. Platforms are an unordered set in the
    /// manifest, so they are kept sorted.
    pub const fn platforms(&self) -> &BTreeSet<String> {
        &self.platforms
    }

    pub const fn executables(&self) -> &BTreeMap<String, Option<String>> {
        &self.executables
    }

    pub const fn dependencies(&self) -> &DependencyMap {
        &self.dependencies
    }

    pub const fn dev_dependencies(&self) -> &DependencyMap {
        &self.dev_dependencies
    }

    pub const fn dependency_overrides(&self) -> &DependencyMap {
        &self.dependency_overrides
    }

    pub const fn dependency_section(&self, section: DependencySection) -> &DependencyMap {
        match section {
            DependencySection::Dependencies => &self.dependencies,
            DependencySection::DevDependencies => &self.dev_dependencies,
            DependencySection::DependencyOverrides => &self.dependency_overrides,
        }
    }

    /// Every declared dependency with the section it was declared in.
    pub fn all_dependencies(
        &self,
    ) -> impl Iterator<Item = (DependencySection, &str, &Dependency)> + '_ {
        DependencySection::ALL.into_iter().flat_map(move |section| {
            self.dependency_section(section)
                .iter()
                .map(move |(name, dep)| (section, name.as_str(), dep))
        })
    }

    /// Flutter-specific configuration block, kept as raw JSON.
    pub const fn flutter(&self) -> Option<&Map<String, Value>> {
        self.flutter.as_ref()
    }
}

/// Builder for [`Pubspec`]; obtained from [`Pubspec::builder`].
#[derive(Debug, Clone)]
pub struct PubspecBuilder {
    inner: Pubspec,
}

impl PubspecBuilder {
    pub fn version(mut self, version: Version) -> Self {
        self.inner.version = Some(version);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.inner.description = Some(description.into());
        self
    }

    pub fn publish_to(mut self, publish_to: impl Into<String>) -> Self {
        self.inner.publish_to = Some(publish_to.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.inner.author = Some(author.into());
        self
    }

    pub fn authors(mut self, authors: impl IntoIterator<Item = String>) -> Self {
        self.inner.authors = authors.into_iter().collect();
        self
    }

    pub fn homepage(mut self, homepage: impl Into<String>) -> Self {
        self.inner.homepage = Some(homepage.into());
        self
    }

    pub fn repository(mut self, repository: impl Into<String>) -> Self {
        self.inner.repository = Some(repository.into());
        self
    }

    pub fn issue_tracker(mut self, issue_tracker: impl Into<String>) -> Self {
        self.inner.issue_tracker = Some(issue_tracker.into());
        self
    }

    pub fn documentation(mut self, documentation: impl Into<String>) -> Self {
        self.inner.documentation = Some(documentation.into());
        self
    }

    pub fn funding(mut self, funding: impl IntoIterator<Item = String>) -> Self {
        self.inner.funding = funding.into_iter().collect();
        self
    }

    pub fn topics(mut self, topics: impl IntoIterator<Item = String>) -> Self {
        self.inner.topics = topics.into_iter().collect();
        self
    }

    pub fn screenshot(mut self, screenshot: Screenshot) -> Self {
        self.inner.screenshots.push(screenshot);
        self
    }

    pub fn false_secrets(mut self, patterns: impl IntoIterator<Item = String>) -> Self {
        self.inner.false_secrets = patterns.into_iter().collect();
        self
    }

    pub fn environment(mut self, key: impl Into<String>, constraint: VersionConstraint) -> Self {
        let constraint = if constraint.is_any() {
            VersionConstraint::Any
        } else {
            constraint
        };
        self.inner.environment.insert(key.into(), constraint);
        self
    }

    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.inner.platforms.insert(platform.into());
        self
    }

    pub fn executable(mut self, name: impl Into<String>, script: Option<String>) -> Self {
        self.inner.executables.insert(name.into(), script);
        self
    }

    pub fn dependency(
        mut self,
        section: DependencySection,
        name: impl Into<String>,
        dependency: Dependency,
    ) -> Self {
        let map = match section {
            DependencySection::Dependencies => &mut self.inner.dependencies,
            DependencySection::DevDependencies => &mut self.inner.dev_dependencies,
            DependencySection::DependencyOverrides => &mut self.inner.dependency_overrides,
        };
        map.insert(name.into(), dependency);
        self
    }

    pub fn flutter(mut self, flutter: Map<String, Value>) -> Self {
        self.inner.flutter = Some(flutter);
        self
    }

    pub fn build(self) -> Pubspec {
        self.inner
    }
}

type Fields = Map<String, Value>;

fn string_field(fields: &Fields, key: &str) -> Result<Option<String>> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(PubspecError::invalid_field(
            key,
            format!("expected a string, found {other}"),
        )),
    }
}

fn string_list(fields: &Fields, key: &str) -> Result<Vec<String>> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(PubspecError::invalid_field(
                    key,
                    format!("expected a list of strings, found element {other}"),
                )),
            })
            .collect(),
        Some(other) => Err(PubspecError::invalid_field(
            key,
            format!("expected a list of strings, found {other}"),
        )),
    }
}

fn object_field<'a>(fields: &'a Fields, key: &str) -> Result<Option<&'a Fields>> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(PubspecError::invalid_field(
            key,
            format!("expected a map, found {other}"),
        )),
    }
}

fn decode_environment(fields: &Fields) -> Result<BTreeMap<String, VersionConstraint>> {
    let Some(environment) = object_field(fields, "environment")? else {
        return Ok(BTreeMap::new());
    };
    environment
        .iter()
        .map(|(key, value)| {
            let constraint = match value {
                Value::Null => VersionConstraint::Any,
                Value::String(text) => VersionConstraint::parse(text)?,
                other => {
                    return Err(PubspecError::invalid_field(
                        "environment",
                        format!("constraint for '{key}' must be a string, found {other}"),
                    ));
                }
            };
            Ok((key.clone(), constraint))
        })
        .collect()
}

fn decode_screenshots(fields: &Fields) -> Result<Vec<Screenshot>> {
    let items = match fields.get("screenshots") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(PubspecError::invalid_field(
                "screenshots",
                format!("expected a list, found {other}"),
            ));
        }
    };
    items
        .iter()
        .map(|item| {
            let Value::Object(entry) = item else {
                return Err(PubspecError::invalid_field(
                    "screenshots",
                    format!("expected a map per screenshot, found {item}"),
                ));
            };
            let description = string_field(entry, "description")?;
            let path = string_field(entry, "path")?;
            match (description, path) {
                (Some(description), Some(path)) => Ok(Screenshot::new(description, path)),
                _ => Err(PubspecError::invalid_field(
                    "screenshots",
                    "each screenshot needs a 'description' and a 'path'",
                )),
            }
        })
        .collect()
}

fn decode_platforms(fields: &Fields) -> Result<BTreeSet<String>> {
    Ok(object_field(fields, "platforms")?
        .map(|platforms| platforms.keys().cloned().collect())
        .unwrap_or_default())
}

fn decode_executables(fields: &Fields) -> Result<BTreeMap<String, Option<String>>> {
    let Some(executables) = object_field(fields, "executables")? else {
        return Ok(BTreeMap::new());
    };
    executables
        .iter()
        .map(|(name, script)| match script {
            Value::Null => Ok((name.clone(), None)),
            Value::String(s) => Ok((name.clone(), Some(s.clone()))),
            other => Err(PubspecError::invalid_field(
                "executables",
                format!("script for '{name}' must be a string, found {other}"),
            )),
        })
        .collect()
}

fn dependency_section(fields: &Fields, section: DependencySection) -> Result<DependencyMap> {
    match fields.get(section.key()) {
        None => Ok(DependencyMap::new()),
        Some(raw) => decode_dependency_map(section.key(), raw),
    }
}

fn decode_flutter(fields: &Fields) -> Result<Option<Fields>> {
    Ok(object_field(fields, "flutter")?.cloned())
}

fn push_string(out: &mut Vec<(&'static str, Value)>, key: &'static str, value: Option<String>) {
    if let Some(value) = value {
        out.push((key, Value::String(value)));
    }
}

fn push_list(out: &mut Vec<(&'static str, Value)>, key: &'static str, values: &[String]) {
    if !values.is_empty() {
        out.push((key, values.iter().map(|v| Value::from(v.as_str())).collect()));
    }
}
