//! Command dispatch and handler modules.

mod classpath;
mod tree;

use std::path::PathBuf;

use clasp_core::alias::{combine_aliases, ResolveArgs};
use clasp_core::config::ResolveSettings;
use clasp_core::manifest::DepsFile;
use clasp_core::DEPS_FILE;
use clasp_resolver::LibMap;
use clasp_util::errors::ClaspError;
use miette::Result;

use crate::cli::{Cli, Command, ResolveOpts};

/// Route a parsed CLI invocation to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Tree { resolve } => tree::exec(&resolve).await,
        Command::Classpath { resolve } => classpath::exec(&resolve).await,
    }
}

/// Load the manifest, combine aliases, and resolve. Shared by every
/// resolving command.
pub(crate) async fn resolve(opts: &ResolveOpts) -> Result<(DepsFile, ResolveArgs, LibMap)> {
    let path = manifest_path(opts)?;
    let deps_file = DepsFile::load(&path)?;
    let args = combine_aliases(&deps_file, &opts.aliases)?;
    let settings = ResolveSettings {
        trace: opts.trace,
        threads: opts.threads,
    };

    let lib_map = clasp_resolver::resolve_deps(&deps_file, &args, &settings).await?;

    if let Some(trace) = &lib_map.trace {
        let out = PathBuf::from("trace.json");
        let json = serde_json::to_string_pretty(trace).map_err(|e| ClaspError::Config {
            message: format!("cannot serialize trace: {e}"),
        })?;
        std::fs::write(&out, json).map_err(ClaspError::Io)?;
        tracing::info!("Wrote {}", out.display());
    }

    Ok((deps_file, args, lib_map))
}

fn manifest_path(opts: &ResolveOpts) -> Result<PathBuf> {
    if let Some(path) = &opts.deps_file {
        return Ok(path.clone());
    }
    let cwd = std::env::current_dir().map_err(ClaspError::Io)?;
    let dir = clasp_util::fs::find_ancestor_with(&cwd, DEPS_FILE).ok_or_else(|| {
        ClaspError::Config {
            message: format!("no {DEPS_FILE} found in {} or any parent", cwd.display()),
        }
    })?;
    Ok(dir.join(DEPS_FILE))
}
