//! Versions and version constraints for Dart packages.
//!
//! Supported constraint syntax: `any`, exact versions (`1.2.3`), caret
//! constraints (`^1.2.3`) and ranges built from `>=`, `>`, `<=` and `<`
//! separated by whitespace (`>=1.0.0 <2.0.0`).

use crate::error::{PubspecError, Result};
use std::fmt;
use std::str::FromStr;

/// A single package version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version(semver::Version);

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(semver::Version::new(major, minor, patch))
    }

    pub fn parse(input: &str) -> Result<Self> {
        semver::Version::parse(input.trim())
            .map(Self)
            .map_err(|source| PubspecError::InvalidVersion {
                version: input.to_string(),
                source,
            })
    }

    pub const fn major(&self) -> u64 {
        self.0.major
    }

    pub const fn minor(&self) -> u64 {
        self.0.minor
    }

    pub const fn patch(&self) -> u64 {
        self.0.patch
    }

    pub fn is_prerelease(&self) -> bool {
        !self.0.pre.is_empty()
    }

    pub const fn as_semver(&self) -> &semver::Version {
        &self.0
    }
}

impl FromStr for Version {
    type Err = PubspecError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<semver::Version> for Version {
    fn from(version: semver::Version) -> Self {
        Self(version)
    }
}

/// One end of a [`VersionRange`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bound {
    pub version: Version,
    pub inclusive: bool,
}

impl Bound {
    pub const fn inclusive(version: Version) -> Self {
        Self {
            version,
            inclusive: true,
        }
    }

    pub const fn exclusive(version: Version) -> Self {
        Self {
            version,
            inclusive: false,
        }
    }
}

/// An interval of versions. A missing bound is unbounded on that side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VersionRange {
    pub min: Option<Bound>,
    pub max: Option<Bound>,
}

impl VersionRange {
    pub fn allows(&self, version: &Version) -> bool {
        let above_min = self.min.as_ref().is_none_or(|b| {
            if b.inclusive {
                version >= &b.version
            } else {
                version > &b.version
            }
        });
        let below_max = self.max.as_ref().is_none_or(|b| {
            if b.inclusive {
                version <= &b.version
            } else {
                version < &b.version && !self.is_prerelease_of_max(version, &b.version)
            }
        });
        above_min && below_max
    }

    // `<2.0.0` excludes `2.0.0-dev.1` unless the lower bound is itself a
    // pre-release of 2.0.0.
    fn is_prerelease_of_max(&self, version: &Version, max: &Version) -> bool {
        let same_release = |a: &Version, b: &Version| {
            (a.major(), a.minor(), a.patch()) == (b.major(), b.minor(), b.patch())
        };
        version.is_prerelease()
            && !max.is_prerelease()
            && same_release(version, max)
            && !self
                .min
                .as_ref()
                .is_some_and(|min| min.version.is_prerelease() && same_release(&min.version, max))
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(2);
        if let Some(min) = &self.min {
            let op = if min.inclusive { ">=" } else { ">" };
            parts.push(format!("{op}{}", min.version));
        }
        if let Some(max) = &self.max {
            let op = if max.inclusive { "<=" } else { "<" };
            parts.push(format!("{op}{}", max.version));
        }
        if parts.is_empty() {
            return f.write_str("any");
        }
        f.write_str(&parts.join(" "))
    }
}

/// A version constraint as written in a pubspec.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionConstraint {
    Any,
    Exact(Version),
    Caret(Version),
    Range(VersionRange),
}

impl VersionConstraint {
    pub fn parse(input: &str) -> Result<Self> {
        let text = input.trim();
        if text.is_empty() {
            return Err(PubspecError::invalid_constraint(input, "empty constraint"));
        }
        if text == "any" {
            return Ok(Self::Any);
        }
        if let Some(rest) = text.strip_prefix('^') {
            return constraint_version(input, rest).map(Self::Caret);
        }

        if !text.starts_with(['>', '<']) {
            if text.contains(char::is_whitespace) {
                return Err(PubspecError::invalid_constraint(
                    input,
                    "unexpected text after version",
                ));
            }
            return constraint_version(input, text).map(Self::Exact);
        }

        // Bounds may be separated by whitespace or written back to back
        // (`>=1.0.0<2.0.0`); a version never contains '<' or '>'.
        let mut range = VersionRange::default();
        let mut rest = text;
        while !rest.is_empty() {
            let (op, after_op) = split_operator(rest).ok_or_else(|| {
                let token = rest.split_whitespace().next().unwrap_or(rest);
                PubspecError::invalid_constraint(input, format!("unexpected token '{token}'"))
            })?;
            // Tolerate a space between the operator and its version.
            let after_op = after_op.trim_start();
            let end = after_op
                .find(|c: char| c.is_whitespace() || c == '<' || c == '>')
                .unwrap_or(after_op.len());
            if end == 0 {
                return Err(PubspecError::invalid_constraint(
                    input,
                    format!("'{op}' needs a version"),
                ));
            }
            let version = constraint_version(input, &after_op[..end])?;
            rest = after_op[end..].trim_start();

            match op {
                ">=" | ">" => {
                    if range.min.is_some() {
                        return Err(PubspecError::invalid_constraint(
                            input,
                            "duplicate lower bound",
                        ));
                    }
                    range.min = Some(Bound {
                        version,
                        inclusive: op == ">=",
                    });
                }
                _ => {
                    if range.max.is_some() {
                        return Err(PubspecError::invalid_constraint(
                            input,
                            "duplicate upper bound",
                        ));
                    }
                    range.max = Some(Bound {
                        version,
                        inclusive: op == "<=",
                    });
                }
            }
        }

        Ok(Self::Range(range))
    }

    /// True for `any` and for a range with neither bound, which allow every
    /// version and both display as `any`.
    pub const fn is_any(&self) -> bool {
        matches!(
            self,
            Self::Any
                | Self::Range(VersionRange {
                    min: None,
                    max: None
                })
        )
    }

    /// Checks whether `version` satisfies this constraint.
    ///
    /// Caret constraints follow Dart semantics: `^1.2.3` allows
    /// `>=1.2.3 <2.0.0` and `^0.2.3` allows `>=0.2.3 <0.3.0`.
    pub fn allows(&self, version: &Version) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(v) => version == v,
            Self::Caret(v) => caret_range(v).allows(version),
            Self::Range(range) => range.allows(version),
        }
    }
}

fn caret_range(base: &Version) -> VersionRange {
    let upper = if base.major() == 0 {
        Version::new(0, base.minor() + 1, 0)
    } else {
        Version::new(base.major() + 1, 0, 0)
    };
    VersionRange {
        min: Some(Bound::inclusive(base.clone())),
        max: Some(Bound::exclusive(upper)),
    }
}

fn split_operator(token: &str) -> Option<(&'static str, &str)> {
    [">=", "<=", ">", "<"]
        .into_iter()
        .find_map(|op| token.strip_prefix(op).map(|rest| (op, rest)))
}

fn constraint_version(input: &str, text: &str) -> Result<Version> {
    semver::Version::parse(text.trim())
        .map(Version)
        .map_err(|e| PubspecError::invalid_constraint(input, e.to_string()))
}

impl FromStr for VersionConstraint {
    type Err = PubspecError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Exact(v) => write!(f, "{v}"),
            Self::Caret(v) => write!(f, "^{v}"),
            Self::Range(range) => write!(f, "{range}"),
        }
    }
}
