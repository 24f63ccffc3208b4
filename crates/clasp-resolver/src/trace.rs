//! Include-decision trace recorded during expansion.

use std::fmt;

use clasp_core::coord::{Coord, CoordId};
use clasp_core::library::Lib;
use serde::Serialize;

/// Why a dequeued node was included or omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reason {
    NewTopDep,
    Excluded,
    UseTop,
    ParentOmitted,
    NewDep,
    SameVersion,
    NewerVersion,
    OlderVersion,
}

impl Reason {
    pub fn included(self) -> bool {
        matches!(self, Reason::NewTopDep | Reason::NewDep | Reason::NewerVersion)
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Reason::NewTopDep => "new-top-dep",
            Reason::Excluded => "excluded",
            Reason::UseTop => "use-top",
            Reason::ParentOmitted => "parent-omitted",
            Reason::NewDep => "new-dep",
            Reason::SameVersion => "same-version",
            Reason::NewerVersion => "newer-version",
            Reason::OlderVersion => "older-version",
        };
        f.write_str(s)
    }
}

/// One include decision.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEntry {
    /// Parent chain of the visited node.
    pub path: Vec<Lib>,
    pub lib: Lib,
    /// The coordinate as it appeared on the edge, if any.
    pub coord: Option<Coord>,
    /// The effective coordinate after override/default choice and
    /// manifest detection.
    pub use_coord: Coord,
    pub coord_id: CoordId,
    pub override_coord: Option<Coord>,
    pub include: bool,
    pub reason: Reason,
}

/// Exclusions in effect at one parent path, for trace output.
#[derive(Debug, Clone, Serialize)]
pub struct PathExclusion {
    pub path: Vec<Lib>,
    pub exclusions: Vec<Lib>,
}

/// The full expansion trace: the decision log plus the final exclusion map.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Trace {
    pub log: Vec<TraceEntry>,
    pub exclusions: Vec<PathExclusion>,
}
