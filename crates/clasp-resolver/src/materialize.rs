//! Collapse the expanded version map to a flat lib map and resolve each
//! selection to its local artifact paths.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use clasp_core::config::ResolveConfig;
use clasp_core::coord::{Coord, CoordId};
use clasp_core::library::Lib;
use clasp_util::errors::ClaspError;

use crate::executor::Executor;
use crate::provider::Provider;
use crate::trace::Trace;
use crate::version_map::VersionMap;

/// A resolved library: its chosen coordinate, the classpath paths it
/// contributes, and its immediate dependents (empty for top deps).
#[derive(Debug, Clone)]
pub struct ResolvedLib {
    pub coord: Coord,
    pub coord_id: CoordId,
    pub paths: Vec<PathBuf>,
    pub dependents: Vec<Lib>,
}

/// The final flat mapping from each transitively required lib to its
/// selection.
#[derive(Debug, Default)]
pub struct LibMap {
    pub libs: BTreeMap<Lib, ResolvedLib>,
    pub trace: Option<Trace>,
}

/// Collapse the version map to selections, dropping orphans.
///
/// A lib survives only if some recorded parent path of its selected
/// coordinate chains through selected, surviving parents up to a top dep;
/// computed as a fixpoint seeded with the top deps. `dependents` is the
/// set of immediate parents taken from the selection's recorded paths.
pub(crate) fn lib_paths(version_map: &VersionMap) -> BTreeMap<Lib, ResolvedLib> {
    let mut live: HashSet<Lib> = version_map
        .libs()
        .filter(|lib| version_map.is_top(lib))
        .cloned()
        .collect();

    loop {
        let mut changed = false;
        for lib in version_map.libs() {
            if live.contains(lib) {
                continue;
            }
            let Some(paths) = version_map.selected_paths(lib) else {
                continue;
            };
            let reachable = paths.iter().any(|path| match path.split_last() {
                Some((parent, ancestors)) => {
                    live.contains(parent)
                        && version_map
                            .selected_paths(parent)
                            .is_some_and(|pp| pp.contains(ancestors))
                }
                None => true,
            });
            if reachable {
                live.insert(lib.clone());
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    let mut libs = BTreeMap::new();
    for lib in version_map.libs() {
        if !live.contains(lib) {
            tracing::debug!("Dropping orphaned lib {lib}");
            continue;
        }
        let (Some(coord), Some(id)) = (
            version_map.selected_coord(lib),
            version_map.selected_version(lib),
        ) else {
            continue;
        };
        let dependents: BTreeSet<Lib> = version_map
            .selected_paths(lib)
            .into_iter()
            .flatten()
            .filter_map(|path| path.last())
            .cloned()
            .collect();
        libs.insert(
            lib.clone(),
            ResolvedLib {
                coord: coord.clone(),
                coord_id: id.clone(),
                paths: Vec::new(),
                dependents: dependents.into_iter().collect(),
            },
        );
    }
    libs
}

/// Resolve every selection to its local paths, in parallel through the
/// executor. The first failure shuts the pool down and aborts the run.
pub(crate) async fn materialize_paths(
    libs: &mut BTreeMap<Lib, ResolvedLib>,
    provider: &Arc<dyn Provider>,
    config: &Arc<ResolveConfig>,
    executor: &Executor,
) -> Result<(), ClaspError> {
    let mut pending = Vec::with_capacity(libs.len());
    for (lib, resolved) in libs.iter() {
        let provider = Arc::clone(provider);
        let config = Arc::clone(config);
        let task_lib = lib.clone();
        let task_coord = resolved.coord.clone();
        let handle = executor.submit(move || provider.coord_paths(&task_lib, &task_coord, &config));
        pending.push((lib.clone(), handle));
    }

    for (lib, handle) in pending {
        match handle.join().await {
            Ok(paths) => {
                if let Some(resolved) = libs.get_mut(&lib) {
                    resolved.paths = paths;
                }
            }
            Err(e) => {
                executor.shutdown();
                return Err(e);
            }
        }
    }
    Ok(())
}
