//! On-disk layout of a local artifact repository (standard Maven layout:
//! `<root>/<group dots as dirs>/<artifact>/<version>/`).

use std::fs;
use std::path::{Path, PathBuf};

use clasp_util::errors::ClaspError;

use crate::pom::{self, Pom};

/// A local Maven-layout repository.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding all files of one artifact version.
    pub fn artifact_dir(&self, group: &str, artifact: &str, version: &str) -> PathBuf {
        self.root
            .join(group.replace('.', "/"))
            .join(artifact)
            .join(version)
    }

    pub fn pom_path(&self, group: &str, artifact: &str, version: &str) -> PathBuf {
        self.artifact_dir(group, artifact, version)
            .join(format!("{artifact}-{version}.pom"))
    }

    pub fn jar_path(&self, group: &str, artifact: &str, version: &str) -> PathBuf {
        self.artifact_dir(group, artifact, version)
            .join(format!("{artifact}-{version}.jar"))
    }

    /// Parse the POM for a coordinate, or `None` when it is not present.
    pub fn load_pom(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
    ) -> Result<Option<Pom>, ClaspError> {
        let path = self.pom_path(group, artifact, version);
        if !path.is_file() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)?;
        pom::parse(&text).map(Some)
    }
}
