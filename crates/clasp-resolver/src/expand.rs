//! Concurrent transitive expansion of the dependency graph.
//!
//! The coordinator walks a FIFO queue of nodes breadth-first, owning all
//! resolution state; child-dependency lists are fetched concurrently in
//! the executor and consumed in enqueue order, so include decisions are
//! deterministic given deterministic providers.

use std::cmp::Ordering;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use clasp_core::config::ResolveConfig;
use clasp_core::coord::Coord;
use clasp_core::library::Lib;
use clasp_util::errors::ClaspError;

use crate::exclusions::{ChildFilter, ExclusionTracker};
use crate::executor::{Executor, TaskHandle};
use crate::provider::Provider;
use crate::trace::{Reason, Trace, TraceEntry};
use crate::version_map::VersionMap;

/// The outcome of expansion: the full version map, and the decision trace
/// when requested.
pub(crate) struct Expansion {
    pub version_map: VersionMap,
    pub trace: Option<Trace>,
}

/// A node to visit: the lib/coord at the end of a parent chain.
struct NodeEntry {
    parents: Vec<Lib>,
    lib: Lib,
    coord: Option<Coord>,
}

/// A pending child fetch: resolves to the children of `parent_path`'s
/// last node, to be filtered by `filter` before enqueueing.
struct ChildLookup {
    pending: TaskHandle<Vec<(Lib, Option<Coord>)>>,
    parent_path: Vec<Lib>,
    filter: ChildFilter,
}

enum QueueItem {
    Node(NodeEntry),
    Lookup(ChildLookup),
}

/// Expand `seed` (already canonicalized top deps, in order) to the full
/// version map.
pub(crate) async fn expand_deps(
    seed: Vec<(Lib, Coord)>,
    override_deps: &BTreeMap<Lib, Coord>,
    default_deps: &BTreeMap<Lib, Coord>,
    provider: &Arc<dyn Provider>,
    config: &Arc<ResolveConfig>,
    executor: &Executor,
    record_trace: bool,
) -> Result<Expansion, ClaspError> {
    let mut expander = Expander {
        version_map: VersionMap::new(),
        exclusions: ExclusionTracker::new(),
        log: Vec::new(),
        record_trace,
        override_deps,
        default_deps,
        provider: Arc::clone(provider),
        config: Arc::clone(config),
        executor,
    };

    let mut q: VecDeque<QueueItem> = seed
        .into_iter()
        .map(|(lib, coord)| {
            QueueItem::Node(NodeEntry {
                parents: Vec::new(),
                lib,
                coord: Some(coord),
            })
        })
        .collect();
    let mut pendq: VecDeque<NodeEntry> = VecDeque::new();

    loop {
        let entry = if let Some(entry) = pendq.pop_front() {
            entry
        } else {
            match q.pop_front() {
                None => break,
                Some(QueueItem::Node(entry)) => entry,
                Some(QueueItem::Lookup(lookup)) => {
                    let children = match lookup.pending.join().await {
                        Ok(children) => children,
                        Err(e) => {
                            executor.shutdown();
                            return Err(e);
                        }
                    };
                    pendq.extend(
                        children
                            .into_iter()
                            .filter(|(lib, _)| lookup.filter.admits(lib))
                            .map(|(lib, coord)| NodeEntry {
                                parents: lookup.parent_path.clone(),
                                lib,
                                coord,
                            }),
                    );
                    continue;
                }
            }
        };

        match expander.visit(entry) {
            Ok(Some(lookup)) => q.push_back(QueueItem::Lookup(lookup)),
            Ok(None) => {}
            Err(e) => {
                executor.shutdown();
                return Err(e);
            }
        }
    }

    let trace = record_trace.then(|| Trace {
        log: expander.log,
        exclusions: expander.exclusions.path_exclusions(),
    });
    Ok(Expansion {
        version_map: expander.version_map,
        trace,
    })
}

struct Expander<'a> {
    version_map: VersionMap,
    exclusions: ExclusionTracker,
    log: Vec<TraceEntry>,
    record_trace: bool,
    override_deps: &'a BTreeMap<Lib, Coord>,
    default_deps: &'a BTreeMap<Lib, Coord>,
    provider: Arc<dyn Provider>,
    config: Arc<ResolveConfig>,
    executor: &'a Executor,
}

impl Expander<'_> {
    /// Process one dequeued node: decide inclusion, apply exclusion side
    /// effects, and start a child fetch when the decision calls for one.
    fn visit(&mut self, entry: NodeEntry) -> Result<Option<ChildLookup>, ClaspError> {
        let NodeEntry { parents, lib, coord } = entry;

        let override_coord = self.override_deps.get(&lib).cloned();
        let chosen = override_coord
            .clone()
            .or_else(|| coord.clone())
            .or_else(|| self.default_deps.get(&lib).cloned())
            .ok_or_else(|| {
                ClaspError::provider(&lib, "-", "no coordinate declared and no default-deps entry")
            })?;

        let use_coord = self.provider.manifest_type(&lib, &chosen, &self.config)?;
        let id = self.provider.dep_id(&lib, &use_coord, &self.config)?;

        let reason = if parents.is_empty() {
            self.version_map
                .add_version(&lib, use_coord.clone(), &parents, id.clone());
            self.version_map.select_version(&lib, &id, true);
            Reason::NewTopDep
        } else if self.exclusions.excluded(&parents, &lib) {
            Reason::Excluded
        } else if self.version_map.is_top(&lib) {
            Reason::UseTop
        } else if self.version_map.parent_missing(&parents) {
            Reason::ParentOmitted
        } else if !self.version_map.contains(&lib) {
            self.version_map
                .add_version(&lib, use_coord.clone(), &parents, id.clone());
            self.version_map.select_version(&lib, &id, false);
            Reason::NewDep
        } else if self.version_map.selected_version(&lib) == Some(&id) {
            // Still record the new parent path: later orphan checks
            // depend on it.
            self.version_map
                .add_version(&lib, use_coord.clone(), &parents, id.clone());
            Reason::SameVersion
        } else {
            let selected = self.version_map.selected_coord(&lib).cloned().ok_or_else(|| {
                ClaspError::provider(&lib, &use_coord, "lib has no selected coordinate")
            })?;
            if self
                .provider
                .compare_versions(&lib, &use_coord, &selected, &self.config)?
                == Ordering::Greater
            {
                self.version_map
                    .add_version(&lib, use_coord.clone(), &parents, id.clone());
                self.version_map.select_version(&lib, &id, false);
                Reason::NewerVersion
            } else {
                Reason::OlderVersion
            }
        };
        let include = reason.included();

        let use_path: Vec<Lib> = parents.iter().cloned().chain([lib.clone()]).collect();
        let filter = self
            .exclusions
            .update(&lib, &use_coord, &id, &use_path, include, reason);

        tracing::debug!("{lib} {use_coord} at {use_path:?}: {reason}");
        if self.record_trace {
            self.log.push(TraceEntry {
                path: parents,
                lib: lib.clone(),
                coord,
                use_coord: use_coord.clone(),
                coord_id: id,
                override_coord,
                include,
                reason,
            });
        }

        Ok(filter.map(|filter| {
            let provider = Arc::clone(&self.provider);
            let config = Arc::clone(&self.config);
            let task_lib = lib;
            let task_coord = use_coord;
            let pending = self
                .executor
                .submit(move || provider.coord_deps(&task_lib, &task_coord, &config));
            ChildLookup {
                pending,
                parent_path: use_path,
                filter,
            }
        }))
    }
}
