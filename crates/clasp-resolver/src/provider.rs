//! The provider contract: every coordinate operation the engine needs,
//! dispatched on the coordinate's source variant.

use std::cmp::Ordering;
use std::path::PathBuf;

use clasp_core::config::ResolveConfig;
use clasp_core::coord::{Coord, CoordId, Source};
use clasp_core::library::Lib;
use clasp_util::errors::ClaspError;

use crate::providers::{local, maven};

/// Coordinate operations supplied by a provider.
///
/// The engine treats coordinates opaquely and calls through this trait for
/// everything coordinate-specific: identity, children, version ordering,
/// and artifact paths. `coord_deps` and `coord_paths` are called from
/// worker tasks and must be safe to invoke concurrently; everything else
/// runs on the coordinator.
pub trait Provider: Send + Sync {
    /// Normalize a lib/coord pair (e.g. resolve a relative local path
    /// against the project directory).
    fn canonicalize(
        &self,
        lib: &Lib,
        coord: &Coord,
        config: &ResolveConfig,
    ) -> Result<(Lib, Coord), ClaspError>;

    /// Stable identity collapsing logically equivalent coordinates.
    fn dep_id(&self, lib: &Lib, coord: &Coord, config: &ResolveConfig)
        -> Result<CoordId, ClaspError>;

    /// Augment the coord with a detected manifest kind; no-op when the
    /// coord already carries one.
    fn manifest_type(
        &self,
        lib: &Lib,
        coord: &Coord,
        config: &ResolveConfig,
    ) -> Result<Coord, ClaspError>;

    /// Direct children of a coordinate, in manifest order. A child may
    /// arrive without a coordinate (e.g. a POM dependency whose version
    /// is left to dependency management); `default-deps` fills the gap.
    fn coord_deps(
        &self,
        lib: &Lib,
        coord: &Coord,
        config: &ResolveConfig,
    ) -> Result<Vec<(Lib, Option<Coord>)>, ClaspError>;

    /// Total order over the provider's version space. Coordinates of
    /// different kinds are not comparable and yield an error.
    fn compare_versions(
        &self,
        lib: &Lib,
        a: &Coord,
        b: &Coord,
        config: &ResolveConfig,
    ) -> Result<Ordering, ClaspError>;

    /// Local filesystem paths the coord contributes to a classpath.
    /// Called after selection, possibly concurrently.
    fn coord_paths(
        &self,
        lib: &Lib,
        coord: &Coord,
        config: &ResolveConfig,
    ) -> Result<Vec<PathBuf>, ClaspError>;

    /// Expected on-disk location of the library (may precede any fetch).
    fn lib_location(
        &self,
        lib: &Lib,
        coord: &Coord,
        config: &ResolveConfig,
    ) -> Result<PathBuf, ClaspError>;

    /// One-line human-readable form for tree output.
    fn coord_summary(&self, lib: &Lib, coord: &Coord) -> String;
}

/// The built-in provider set: Maven-repository and local-directory
/// coordinates, dispatched on [`Source`].
#[derive(Debug, Default)]
pub struct DefaultProvider;

impl Provider for DefaultProvider {
    fn canonicalize(
        &self,
        lib: &Lib,
        coord: &Coord,
        config: &ResolveConfig,
    ) -> Result<(Lib, Coord), ClaspError> {
        match &coord.source {
            Source::Maven { .. } => maven::canonicalize(lib, coord, config),
            Source::Local { .. } => local::canonicalize(lib, coord, config),
        }
    }

    fn dep_id(
        &self,
        lib: &Lib,
        coord: &Coord,
        config: &ResolveConfig,
    ) -> Result<CoordId, ClaspError> {
        match &coord.source {
            Source::Maven { .. } => maven::dep_id(lib, coord, config),
            Source::Local { .. } => local::dep_id(lib, coord, config),
        }
    }

    fn manifest_type(
        &self,
        lib: &Lib,
        coord: &Coord,
        config: &ResolveConfig,
    ) -> Result<Coord, ClaspError> {
        match &coord.source {
            Source::Maven { .. } => maven::manifest_type(lib, coord, config),
            Source::Local { .. } => local::manifest_type(lib, coord, config),
        }
    }

    fn coord_deps(
        &self,
        lib: &Lib,
        coord: &Coord,
        config: &ResolveConfig,
    ) -> Result<Vec<(Lib, Option<Coord>)>, ClaspError> {
        match &coord.source {
            Source::Maven { .. } => maven::coord_deps(lib, coord, config),
            Source::Local { .. } => local::coord_deps(lib, coord, config),
        }
    }

    fn compare_versions(
        &self,
        lib: &Lib,
        a: &Coord,
        b: &Coord,
        config: &ResolveConfig,
    ) -> Result<Ordering, ClaspError> {
        match &a.source {
            Source::Maven { .. } => maven::compare_versions(lib, a, b, config),
            Source::Local { .. } => local::compare_versions(lib, a, b, config),
        }
    }

    fn coord_paths(
        &self,
        lib: &Lib,
        coord: &Coord,
        config: &ResolveConfig,
    ) -> Result<Vec<PathBuf>, ClaspError> {
        match &coord.source {
            Source::Maven { .. } => maven::coord_paths(lib, coord, config),
            Source::Local { .. } => local::coord_paths(lib, coord, config),
        }
    }

    fn lib_location(
        &self,
        lib: &Lib,
        coord: &Coord,
        config: &ResolveConfig,
    ) -> Result<PathBuf, ClaspError> {
        match &coord.source {
            Source::Maven { .. } => maven::lib_location(lib, coord, config),
            Source::Local { .. } => local::lib_location(lib, coord, config),
        }
    }

    fn coord_summary(&self, lib: &Lib, coord: &Coord) -> String {
        match &coord.source {
            Source::Maven { .. } => maven::coord_summary(lib, coord),
            Source::Local { .. } => local::coord_summary(lib, coord),
        }
    }
}
