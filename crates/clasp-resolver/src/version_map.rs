//! Per-library bookkeeping for the expansion engine: every coordinate
//! observed for a lib, the parent paths each arrived through, and the
//! current selection.

use std::collections::{HashMap, HashSet};

use clasp_core::coord::{Coord, CoordId};
use clasp_core::library::Lib;

/// One entry per library ever sighted during expansion. Entries are
/// created on first sighting and never removed; a displaced version is
/// expressed purely by the selection moving elsewhere.
#[derive(Debug, Default)]
struct VersionEntry {
    /// Every coordinate observed, keyed by identity.
    versions: HashMap<CoordId, Coord>,
    /// Every parent path each coordinate was seen through.
    paths: HashMap<CoordId, HashSet<Vec<Lib>>>,
    /// The identity currently chosen for this lib.
    select: Option<CoordId>,
    /// True iff the lib appears as a top-level dep. Top selections are
    /// final.
    top: bool,
}

#[derive(Debug, Default)]
pub struct VersionMap {
    entries: HashMap<Lib, VersionEntry>,
}

impl VersionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a coordinate sighting and the parent path it arrived
    /// through. Called for every admitted version and for `same-version`
    /// revisits, whose paths matter to later orphan checks.
    pub fn add_version(&mut self, lib: &Lib, coord: Coord, parent_path: &[Lib], id: CoordId) {
        let entry = self.entries.entry(lib.clone()).or_default();
        entry.versions.insert(id.clone(), coord);
        entry
            .paths
            .entry(id)
            .or_default()
            .insert(parent_path.to_vec());
    }

    /// Choose a coordinate for a lib. A lib already selected as top keeps
    /// its first selection.
    pub fn select_version(&mut self, lib: &Lib, id: &CoordId, top: bool) {
        let entry = self.entries.entry(lib.clone()).or_default();
        if entry.top && entry.select.is_some() {
            return;
        }
        entry.select = Some(id.clone());
        if top {
            entry.top = true;
        }
    }

    pub fn contains(&self, lib: &Lib) -> bool {
        self.entries.contains_key(lib)
    }

    pub fn is_top(&self, lib: &Lib) -> bool {
        self.entries.get(lib).is_some_and(|e| e.top)
    }

    pub fn selected_version(&self, lib: &Lib) -> Option<&CoordId> {
        self.entries.get(lib)?.select.as_ref()
    }

    pub fn selected_coord(&self, lib: &Lib) -> Option<&Coord> {
        let entry = self.entries.get(lib)?;
        entry.versions.get(entry.select.as_ref()?)
    }

    /// Parent paths recorded for the lib's selected coordinate.
    pub fn selected_paths(&self, lib: &Lib) -> Option<&HashSet<Vec<Lib>>> {
        let entry = self.entries.get(lib)?;
        entry.paths.get(entry.select.as_ref()?)
    }

    /// Orphan check for a child whose parent path is `parents`
    /// (`ancestors ++ [parent_lib]`): true iff `ancestors` is no longer a
    /// recorded path of the parent's selected coordinate, meaning the
    /// parent this child was enqueued under has been displaced.
    pub fn parent_missing(&self, parents: &[Lib]) -> bool {
        let Some((parent_lib, ancestors)) = parents.split_last() else {
            return false;
        };
        match self.selected_paths(parent_lib) {
            Some(paths) => !paths.contains(ancestors),
            None => true,
        }
    }

    /// All libs ever sighted.
    pub fn libs(&self) -> impl Iterator<Item = &Lib> {
        self.entries.keys()
    }
}
