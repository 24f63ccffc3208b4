//! Exclusion tracking across parent paths.
//!
//! Exclusion sets attach to edges; the tracker records them keyed by the
//! full parent path so they suppress exactly the subtree under that edge.
//! Per-(lib, version) "cut" sets remember which children were withheld, so
//! a later visit of the same version through a less-excluded path can
//! enqueue exactly the newly uncovered children.

use std::collections::{BTreeSet, HashMap};

use clasp_core::coord::{Coord, CoordId};
use clasp_core::library::Lib;

use crate::trace::{PathExclusion, Reason};

/// Decides which children of a just-visited node get enqueued.
#[derive(Debug, Clone, PartialEq)]
pub enum ChildFilter {
    /// Every child (no exclusions on the edge).
    All,
    /// Children outside the edge's exclusion set.
    Without(BTreeSet<Lib>),
    /// Exactly the previously cut children uncovered by a revisit.
    Only(BTreeSet<Lib>),
}

impl ChildFilter {
    pub fn admits(&self, lib: &Lib) -> bool {
        match self {
            ChildFilter::All => true,
            ChildFilter::Without(excluded) => !excluded.contains(lib),
            ChildFilter::Only(uncovered) => uncovered.contains(lib),
        }
    }
}

#[derive(Debug, Default)]
pub struct ExclusionTracker {
    /// Exclusions in effect at a parent path.
    exclusions: HashMap<Vec<Lib>, BTreeSet<Lib>>,
    /// Children withheld when a (lib, version) was admitted.
    cut: HashMap<(Lib, CoordId), BTreeSet<Lib>>,
}

impl ExclusionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `lib` is suppressed anywhere along `path`.
    ///
    /// Walks the path from full length down to empty; matching uses the
    /// lib's pre-`$` base name.
    pub fn excluded(&self, path: &[Lib], lib: &Lib) -> bool {
        let base = lib.base();
        (0..=path.len())
            .rev()
            .any(|len| {
                self.exclusions
                    .get(&path[..len])
                    .is_some_and(|set| set.contains(&base))
            })
    }

    /// Record the exclusion side effects of an include decision and return
    /// the child filter, if children are to be enqueued at all.
    ///
    /// Included nodes register their edge's exclusions at `use_path` and
    /// seed the cut set. A `same-version` revisit narrows the cut to the
    /// intersection with the new edge's exclusions and admits exactly the
    /// children that were cut before but are no longer excluded; children
    /// already enqueued on an earlier visit are never re-enqueued. Any
    /// other omission leaves the tracker untouched and enqueues nothing.
    pub fn update(
        &mut self,
        lib: &Lib,
        use_coord: &Coord,
        id: &CoordId,
        use_path: &[Lib],
        include: bool,
        reason: Reason,
    ) -> Option<ChildFilter> {
        let edge_exclusions: BTreeSet<Lib> = use_coord.exclusions.iter().cloned().collect();

        if include {
            if edge_exclusions.is_empty() {
                return Some(ChildFilter::All);
            }
            self.exclusions
                .insert(use_path.to_vec(), edge_exclusions.clone());
            self.cut
                .insert((lib.clone(), id.clone()), edge_exclusions.clone());
            return Some(ChildFilter::Without(edge_exclusions));
        }

        if reason == Reason::SameVersion {
            let prev = self
                .cut
                .get(&(lib.clone(), id.clone()))
                .cloned()
                .unwrap_or_default();
            if !edge_exclusions.is_empty() {
                self.exclusions
                    .insert(use_path.to_vec(), edge_exclusions.clone());
            }
            let narrowed: BTreeSet<Lib> =
                prev.intersection(&edge_exclusions).cloned().collect();
            let uncovered: BTreeSet<Lib> =
                prev.difference(&edge_exclusions).cloned().collect();
            self.cut.insert((lib.clone(), id.clone()), narrowed);
            return Some(ChildFilter::Only(uncovered));
        }

        None
    }

    /// The final exclusion map in trace form, sorted by path.
    pub fn path_exclusions(&self) -> Vec<PathExclusion> {
        let mut entries: Vec<PathExclusion> = self
            .exclusions
            .iter()
            .map(|(path, set)| PathExclusion {
                path: path.clone(),
                exclusions: set.iter().cloned().collect(),
            })
            .collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lib(name: &str) -> Lib {
        Lib::new("test", name)
    }

    fn id(v: &str) -> CoordId {
        CoordId::Version(v.to_string())
    }

    fn coord_excluding(version: &str, excl: &[&str]) -> Coord {
        let mut coord = Coord::maven(version);
        coord.exclusions = excl.iter().map(|n| lib(n)).collect();
        coord
    }

    #[test]
    fn include_without_exclusions_admits_all() {
        let mut tracker = ExclusionTracker::new();
        let filter = tracker
            .update(
                &lib("a"),
                &Coord::maven("1"),
                &id("1"),
                &[lib("a")],
                true,
                Reason::NewDep,
            )
            .unwrap();
        assert_eq!(filter, ChildFilter::All);
        assert!(!tracker.excluded(&[lib("a")], &lib("x")));
    }

    #[test]
    fn include_with_exclusions_registers_and_cuts() {
        let mut tracker = ExclusionTracker::new();
        let filter = tracker
            .update(
                &lib("c"),
                &coord_excluding("1", &["d"]),
                &id("1"),
                &[lib("a"), lib("c")],
                true,
                Reason::NewDep,
            )
            .unwrap();

        assert!(!filter.admits(&lib("d")));
        assert!(filter.admits(&lib("e")));
        assert!(tracker.excluded(&[lib("a"), lib("c")], &lib("d")));
        // deeper paths under the edge are covered by the prefix walk
        assert!(tracker.excluded(&[lib("a"), lib("c"), lib("x")], &lib("d")));
        // sibling paths are not
        assert!(!tracker.excluded(&[lib("b"), lib("c")], &lib("d")));
    }

    #[test]
    fn excluded_matches_base_name() {
        let mut tracker = ExclusionTracker::new();
        tracker.update(
            &lib("c"),
            &coord_excluding("1", &["d"]),
            &id("1"),
            &[lib("c")],
            true,
            Reason::NewDep,
        );
        assert!(tracker.excluded(&[lib("c")], &Lib::new("test", "d$natives")));
    }

    #[test]
    fn same_version_uncovers_previously_cut_children() {
        let mut tracker = ExclusionTracker::new();
        // first visit through an edge excluding d
        tracker.update(
            &lib("c"),
            &coord_excluding("1", &["d"]),
            &id("1"),
            &[lib("a"), lib("c")],
            true,
            Reason::NewDep,
        );
        // revisit through an edge with no exclusions
        let filter = tracker
            .update(
                &lib("c"),
                &Coord::maven("1"),
                &id("1"),
                &[lib("b"), lib("c")],
                false,
                Reason::SameVersion,
            )
            .unwrap();

        // exactly d is uncovered; children enqueued the first time are not
        assert!(filter.admits(&lib("d")));
        assert!(!filter.admits(&lib("x")));
    }

    #[test]
    fn same_version_with_no_prior_cut_admits_nothing() {
        let mut tracker = ExclusionTracker::new();
        // first visit had no exclusions, so nothing was cut
        tracker.update(
            &lib("c"),
            &Coord::maven("1"),
            &id("1"),
            &[lib("b"), lib("c")],
            true,
            Reason::NewDep,
        );
        let filter = tracker
            .update(
                &lib("c"),
                &coord_excluding("1", &["d"]),
                &id("1"),
                &[lib("a"), lib("c")],
                false,
                Reason::SameVersion,
            )
            .unwrap();

        assert!(!filter.admits(&lib("d")));
        assert!(!filter.admits(&lib("x")));
        // the new edge's exclusions still register for its own subtree
        assert!(tracker.excluded(&[lib("a"), lib("c")], &lib("d")));
    }

    #[test]
    fn same_version_narrows_cut_to_intersection() {
        let mut tracker = ExclusionTracker::new();
        tracker.update(
            &lib("c"),
            &coord_excluding("1", &["d", "e"]),
            &id("1"),
            &[lib("a"), lib("c")],
            true,
            Reason::NewDep,
        );
        let filter = tracker
            .update(
                &lib("c"),
                &coord_excluding("1", &["e", "f"]),
                &id("1"),
                &[lib("b"), lib("c")],
                false,
                Reason::SameVersion,
            )
            .unwrap();

        // d was cut and is not excluded by the new edge
        assert_eq!(filter, ChildFilter::Only([lib("d")].into_iter().collect()));

        // a third visit can still uncover e, which stayed in the cut
        let filter = tracker
            .update(
                &lib("c"),
                &Coord::maven("1"),
                &id("1"),
                &[lib("g"), lib("c")],
                false,
                Reason::SameVersion,
            )
            .unwrap();
        assert_eq!(filter, ChildFilter::Only([lib("e")].into_iter().collect()));
    }

    #[test]
    fn other_omissions_change_nothing() {
        let mut tracker = ExclusionTracker::new();
        for reason in [Reason::Excluded, Reason::UseTop, Reason::ParentOmitted, Reason::OlderVersion] {
            let filter = tracker.update(
                &lib("c"),
                &coord_excluding("1", &["d"]),
                &id("1"),
                &[lib("a"), lib("c")],
                false,
                reason,
            );
            assert!(filter.is_none());
        }
        assert!(!tracker.excluded(&[lib("a"), lib("c")], &lib("d")));
    }
}
