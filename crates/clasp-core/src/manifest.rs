use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clasp_util::errors::ClaspError;
use serde::{Deserialize, Serialize};

use crate::alias::Alias;
use crate::coord::DepSpec;
use crate::library::Lib;

/// The parsed representation of a `deps.toml` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepsFile {
    /// Top-level library coordinates.
    #[serde(default)]
    pub deps: BTreeMap<Lib, DepSpec>,

    /// Source paths contributed by the project itself.
    #[serde(default = "default_paths")]
    pub paths: Vec<String>,

    #[serde(default)]
    pub aliases: BTreeMap<String, Alias>,

    #[serde(default)]
    pub maven: MavenSettings,

    /// Directory the manifest was loaded from. Relative `path` coords and
    /// source paths resolve against it.
    #[serde(skip)]
    pub root: PathBuf,
}

/// `[maven]` settings from `deps.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MavenSettings {
    /// Root of the local artifact repository in standard Maven layout.
    #[serde(default, rename = "local-repo")]
    pub local_repo: Option<PathBuf>,
}

fn default_paths() -> Vec<String> {
    vec!["src".to_string()]
}

impl Default for DepsFile {
    fn default() -> Self {
        Self {
            deps: BTreeMap::new(),
            paths: default_paths(),
            aliases: BTreeMap::new(),
            maven: MavenSettings::default(),
            root: PathBuf::new(),
        }
    }
}

impl DepsFile {
    /// Parse manifest TOML text.
    pub fn parse_toml(text: &str) -> Result<Self, ClaspError> {
        toml::from_str(text).map_err(|e| ClaspError::Manifest {
            message: e.to_string(),
        })
    }

    /// Load and parse a `deps.toml`, recording its directory as `root`.
    pub fn load(path: &Path) -> Result<Self, ClaspError> {
        let text = std::fs::read_to_string(path)?;
        let mut file = Self::parse_toml(&text)?;
        file.root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(file)
    }
}
