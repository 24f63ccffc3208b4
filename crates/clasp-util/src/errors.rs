use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all Clasp operations.
#[derive(Debug, Error, Diagnostic)]
pub enum ClaspError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed deps manifest (deps.toml or pom.xml).
    #[error("Manifest error: {message}")]
    #[diagnostic(help("Check your deps.toml for syntax errors"))]
    Manifest { message: String },

    /// A provider call failed while resolving a coordinate.
    ///
    /// Carries the responsible lib and coordinate so the failure can be
    /// traced back to a specific edge of the dependency graph.
    #[error("Error resolving {lib} {coord}: {message}")]
    Provider {
        lib: String,
        coord: String,
        message: String,
    },

    /// Unknown alias name passed to `combine_aliases`.
    #[error("Unknown alias: {name}")]
    #[diagnostic(help("Aliases are defined under [aliases.<name>] in deps.toml"))]
    Alias { name: String },

    /// Malformed inputs detected before expansion begins.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Work was canceled because another task failed first.
    #[error("Resolution canceled: {message}")]
    Canceled { message: String },
}

impl ClaspError {
    /// Wrap an error as a provider failure for a specific `(lib, coord)` edge.
    pub fn provider(
        lib: impl std::fmt::Display,
        coord: impl std::fmt::Display,
        cause: impl std::fmt::Display,
    ) -> Self {
        Self::Provider {
            lib: lib.to_string(),
            coord: coord.to_string(),
            message: cause.to_string(),
        }
    }
}

/// Convenience alias for `miette::Result<T>`.
pub type ClaspResult<T> = miette::Result<T>;
