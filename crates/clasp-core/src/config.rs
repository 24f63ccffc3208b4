use std::path::{Path, PathBuf};

use crate::manifest::DepsFile;

/// Ambient configuration passed to every provider call.
#[derive(Debug, Clone)]
pub struct ResolveConfig {
    /// Project directory; relative local coords in the project manifest
    /// resolve against it.
    pub project_dir: PathBuf,

    /// Root of the local Maven-layout artifact repository.
    pub local_repo: PathBuf,
}

impl ResolveConfig {
    pub fn new(project_dir: impl Into<PathBuf>, local_repo: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            local_repo: local_repo.into(),
        }
    }

    /// Build configuration for a loaded deps file: the manifest's directory
    /// becomes the project dir, and `[maven] local-repo` (resolved against
    /// it) overrides the default repository location.
    pub fn for_deps_file(deps_file: &DepsFile) -> Self {
        let local_repo = match &deps_file.maven.local_repo {
            Some(repo) => clasp_util::fs::absolutize(&deps_file.root, repo),
            None => default_local_repo(),
        };
        Self {
            project_dir: deps_file.root.clone(),
            local_repo,
        }
    }
}

/// Settings controlling a single resolution run.
#[derive(Debug, Clone, Default)]
pub struct ResolveSettings {
    /// Record an include-decision trace alongside the result.
    pub trace: bool,

    /// Worker pool size. Defaults to the host CPU count.
    pub threads: Option<usize>,
}

impl ResolveSettings {
    pub fn thread_count(&self) -> usize {
        self.threads.unwrap_or_else(default_threads)
    }
}

fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// The default local repository: `$CLASP_REPO`, else `~/.clasp/repository`.
pub fn default_local_repo() -> PathBuf {
    if let Ok(repo) = std::env::var("CLASP_REPO") {
        return PathBuf::from(repo);
    }
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".clasp").join("repository")
}
