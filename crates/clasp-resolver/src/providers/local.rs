//! Local-directory coordinates: a library rooted at a directory with its
//! own `deps.toml` or `pom.xml` manifest.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use clasp_core::config::ResolveConfig;
use clasp_core::coord::{Coord, CoordId, ManifestKind, Source};
use clasp_core::library::Lib;
use clasp_core::manifest::DepsFile;
use clasp_core::DEPS_FILE;
use clasp_util::errors::ClaspError;
use clasp_util::fs::{absolutize, canonical_or_clean};

use super::maven;

pub fn canonicalize(
    lib: &Lib,
    coord: &Coord,
    config: &ResolveConfig,
) -> Result<(Lib, Coord), ClaspError> {
    let mut coord = coord.clone();
    coord.source = Source::Local {
        path: resolve_path(&coord, config),
    };
    Ok((lib.clone(), coord))
}

pub fn dep_id(_lib: &Lib, coord: &Coord, config: &ResolveConfig) -> Result<CoordId, ClaspError> {
    Ok(CoordId::Dir(resolve_path(coord, config)))
}

pub fn manifest_type(
    lib: &Lib,
    coord: &Coord,
    config: &ResolveConfig,
) -> Result<Coord, ClaspError> {
    if coord.manifest.is_some() {
        return Ok(coord.clone());
    }
    let dir = manifest_dir(coord, config);
    let mut coord = coord.clone();
    coord.manifest = Some(detect_manifest(lib, coord_path(&coord), &dir)?);
    Ok(coord)
}

pub fn coord_deps(
    lib: &Lib,
    coord: &Coord,
    config: &ResolveConfig,
) -> Result<Vec<(Lib, Option<Coord>)>, ClaspError> {
    let dir = manifest_dir(coord, config);
    match manifest_kind(lib, coord, config)? {
        ManifestKind::Deps => {
            let file = DepsFile::load(&dir.join(DEPS_FILE))?;
            let mut children = Vec::new();
            for (child_lib, spec) in &file.deps {
                let mut child = spec.to_coord();
                // Relative local children resolve against this manifest's dir
                if let Source::Local { path } = &child.source {
                    child.source = Source::Local {
                        path: canonical_or_clean(&absolutize(&dir, path)),
                    };
                }
                children.push((child_lib.clone(), Some(child)));
            }
            Ok(children)
        }
        ManifestKind::Pom => {
            let path = dir.join("pom.xml");
            let text = std::fs::read_to_string(&path).map_err(|e| {
                ClaspError::provider(lib, coord, format!("{}: {e}", path.display()))
            })?;
            let pom = clasp_maven::pom::parse(&text)?;
            Ok(maven::pom_children(pom, &format!("{}", path.display())))
        }
    }
}

pub fn compare_versions(
    lib: &Lib,
    _a: &Coord,
    b: &Coord,
    _config: &ResolveConfig,
) -> Result<Ordering, ClaspError> {
    Err(ClaspError::provider(
        lib,
        b,
        "local coordinates have no version order; pin the lib with override-deps",
    ))
}

pub fn coord_paths(
    lib: &Lib,
    coord: &Coord,
    config: &ResolveConfig,
) -> Result<Vec<PathBuf>, ClaspError> {
    let dir = manifest_dir(coord, config);
    match manifest_kind(lib, coord, config)? {
        ManifestKind::Deps => {
            let file = DepsFile::load(&dir.join(DEPS_FILE))?;
            Ok(file
                .paths
                .iter()
                .map(|p| absolutize(&dir, Path::new(p)))
                .collect())
        }
        ManifestKind::Pom => Ok(vec![dir.join("target").join("classes")]),
    }
}

pub fn lib_location(
    _lib: &Lib,
    coord: &Coord,
    config: &ResolveConfig,
) -> Result<PathBuf, ClaspError> {
    Ok(resolve_path(coord, config))
}

pub fn coord_summary(lib: &Lib, coord: &Coord) -> String {
    format!("{lib} {}", coord_path(coord).display())
}

fn coord_path(coord: &Coord) -> &Path {
    match &coord.source {
        Source::Local { path } => path,
        Source::Maven { .. } => Path::new(""),
    }
}

fn resolve_path(coord: &Coord, config: &ResolveConfig) -> PathBuf {
    canonical_or_clean(&absolutize(&config.project_dir, coord_path(coord)))
}

/// The directory the coord's manifest is read from: an explicit `root`
/// wins over the coord's own path.
fn manifest_dir(coord: &Coord, config: &ResolveConfig) -> PathBuf {
    match &coord.root {
        Some(root) => canonical_or_clean(&absolutize(&config.project_dir, root)),
        None => resolve_path(coord, config),
    }
}

fn manifest_kind(
    lib: &Lib,
    coord: &Coord,
    config: &ResolveConfig,
) -> Result<ManifestKind, ClaspError> {
    match coord.manifest {
        Some(kind) => Ok(kind),
        None => detect_manifest(lib, coord_path(coord), &manifest_dir(coord, config)),
    }
}

fn detect_manifest(lib: &Lib, path: &Path, dir: &Path) -> Result<ManifestKind, ClaspError> {
    if dir.join(DEPS_FILE).is_file() {
        Ok(ManifestKind::Deps)
    } else if dir.join("pom.xml").is_file() {
        Ok(ManifestKind::Pom)
    } else {
        Err(ClaspError::provider(
            lib,
            path.display(),
            format!("no project manifest found in {}", dir.display()),
        ))
    }
}
