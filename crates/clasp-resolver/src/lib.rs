//! Dependency resolution engine for the Clasp tool.
//!
//! Given top-level library coordinates, expands the transitive dependency
//! graph concurrently, resolves version conflicts (top deps win; newer
//! wins among non-top libs), honors per-edge exclusions, and materializes
//! each selection's local artifact paths.

use std::collections::BTreeMap;
use std::sync::Arc;

use clasp_core::alias::ResolveArgs;
use clasp_core::config::{ResolveConfig, ResolveSettings};
use clasp_core::coord::Coord;
use clasp_core::library::Lib;
use clasp_core::manifest::DepsFile;
use clasp_util::errors::ClaspError;

pub mod classpath;
pub mod exclusions;
pub mod executor;
mod expand;
pub mod materialize;
pub mod provider;
pub mod providers;
pub mod trace;
pub mod tree;
pub mod version_map;

pub use classpath::{make_classpath, ClasspathArgs};
pub use materialize::{LibMap, ResolvedLib};
pub use provider::{DefaultProvider, Provider};
pub use trace::{Reason, Trace, TraceEntry};
pub use tree::{print_tree, render_tree};

use executor::Executor;

/// Resolve the deps of a loaded `deps.toml` with the built-in providers.
pub async fn resolve_deps(
    deps_file: &DepsFile,
    args: &ResolveArgs,
    settings: &ResolveSettings,
) -> Result<LibMap, ClaspError> {
    let deps: Vec<(Lib, Coord)> = if args.deps.is_empty() {
        deps_file
            .deps
            .iter()
            .map(|(lib, spec)| (lib.clone(), spec.to_coord()))
            .collect()
    } else {
        args.deps.clone().into_iter().collect()
    };
    let provider: Arc<dyn Provider> = Arc::new(DefaultProvider);
    let config = Arc::new(ResolveConfig::for_deps_file(deps_file));
    resolve_deps_with(provider, config, deps, args, settings).await
}

/// Resolve with an explicit provider and configuration.
///
/// `deps` is the ordered list of top-level deps; `args.extra_deps` extend
/// it (replacing same-lib entries in place). Expansion and materialization
/// are all-or-nothing: the first provider failure shuts the worker pool
/// down and surfaces as the run's error.
pub async fn resolve_deps_with(
    provider: Arc<dyn Provider>,
    config: Arc<ResolveConfig>,
    deps: Vec<(Lib, Coord)>,
    args: &ResolveArgs,
    settings: &ResolveSettings,
) -> Result<LibMap, ClaspError> {
    let mut seed = deps;
    for (lib, coord) in &args.extra_deps {
        match seed.iter_mut().find(|(l, _)| l == lib) {
            Some(slot) => slot.1 = coord.clone(),
            None => seed.push((lib.clone(), coord.clone())),
        }
    }

    let mut canonical = Vec::with_capacity(seed.len());
    for (lib, coord) in seed {
        canonical.push(provider.canonicalize(&lib, &coord, &config)?);
    }
    let override_deps = canonicalize_map(&provider, &config, &args.override_deps)?;
    let default_deps = canonicalize_map(&provider, &config, &args.default_deps)?;

    let executor = Executor::new(settings.thread_count());
    let expansion = expand::expand_deps(
        canonical,
        &override_deps,
        &default_deps,
        &provider,
        &config,
        &executor,
        settings.trace,
    )
    .await?;

    let mut libs = materialize::lib_paths(&expansion.version_map);
    materialize::materialize_paths(&mut libs, &provider, &config, &executor).await?;

    tracing::debug!("Resolved {} libs", libs.len());
    Ok(LibMap {
        libs,
        trace: expansion.trace,
    })
}

fn canonicalize_map(
    provider: &Arc<dyn Provider>,
    config: &Arc<ResolveConfig>,
    deps: &BTreeMap<Lib, Coord>,
) -> Result<BTreeMap<Lib, Coord>, ClaspError> {
    let mut out = BTreeMap::new();
    for (lib, coord) in deps {
        let (lib, coord) = provider.canonicalize(lib, coord, config)?;
        out.insert(lib, coord);
    }
    Ok(out)
}
