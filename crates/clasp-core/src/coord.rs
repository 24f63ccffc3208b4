use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::library::Lib;

/// A provider-tagged coordinate for a library version or source location.
///
/// The resolution engine treats the `source` opaquely and delegates all
/// coordinate operations to the provider layer. Any coordinate may carry
/// exclusions, a manifest kind, and a root directory for manifest reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    #[serde(flatten)]
    pub source: Source,

    /// Libraries to suppress transitively under this edge.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<Lib>,

    /// How dependencies are discovered for this coord. Detected by the
    /// provider when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<ManifestKind>,

    /// Directory treated as the current directory when reading this
    /// coord's manifest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

/// The provider-specific part of a coordinate.
///
/// A closed set of variants: adding a provider means adding a variant here
/// and an implementation in the provider layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    /// An artifact in a Maven-layout repository.
    Maven { version: String },
    /// A library rooted at a local directory.
    Local { path: PathBuf },
}

impl Coord {
    pub fn maven(version: impl Into<String>) -> Self {
        Self {
            source: Source::Maven {
                version: version.into(),
            },
            exclusions: Vec::new(),
            manifest: None,
            root: None,
        }
    }

    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::Local { path: path.into() },
            exclusions: Vec::new(),
            manifest: None,
            root: None,
        }
    }

    /// The Maven version string, if this is a Maven coordinate.
    pub fn version(&self) -> Option<&str> {
        match &self.source {
            Source::Maven { version } => Some(version),
            Source::Local { .. } => None,
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Source::Maven { version } => write!(f, "{version}"),
            Source::Local { path } => write!(f, "{}", path.display()),
        }
    }
}

/// Provider-dependent identity collapsing logically equivalent coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum CoordId {
    Version(String),
    Dir(PathBuf),
}

impl fmt::Display for CoordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordId::Version(v) => f.write_str(v),
            CoordId::Dir(p) => write!(f, "{}", p.display()),
        }
    }
}

/// The manifest format used to discover a coordinate's dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestKind {
    Deps,
    Pom,
}

/// A dependency entry as written in `deps.toml`.
///
/// Supports both shorthand (`"1.2.3"`, a Maven version) and the full
/// coordinate table form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DepSpec {
    Short(String),
    Full(Coord),
}

impl DepSpec {
    pub fn into_coord(self) -> Coord {
        match self {
            DepSpec::Short(version) => Coord::maven(version),
            DepSpec::Full(coord) => coord,
        }
    }

    pub fn to_coord(&self) -> Coord {
        self.clone().into_coord()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_maven_table() {
        let coord: Coord = toml::from_str(r#"version = "1.9.0""#).unwrap();
        assert_eq!(coord.version(), Some("1.9.0"));
        assert!(coord.exclusions.is_empty());
    }

    #[test]
    fn deserialize_local_table() {
        let coord: Coord = toml::from_str(r#"path = "../lib""#).unwrap();
        assert_eq!(coord.source, Source::Local { path: "../lib".into() });
    }

    #[test]
    fn deserialize_exclusions_and_manifest() {
        let coord: Coord = toml::from_str(
            r#"
version = "2.0"
exclusions = ["org.slf4j/slf4j-api"]
manifest = "pom"
"#,
        )
        .unwrap();
        assert_eq!(coord.exclusions.len(), 1);
        assert_eq!(coord.manifest, Some(ManifestKind::Pom));
    }

    #[test]
    fn short_spec_is_maven() {
        #[derive(serde::Deserialize)]
        struct Holder {
            v: DepSpec,
        }
        let holder: Holder = toml::from_str(r#"v = "1.0""#).unwrap();
        assert_eq!(holder.v.into_coord().version(), Some("1.0"));
    }

    #[test]
    fn coord_display() {
        assert_eq!(Coord::maven("1.2.3").to_string(), "1.2.3");
    }
}
