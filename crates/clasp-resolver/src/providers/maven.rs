//! Maven coordinates backed by a local-layout artifact repository.
//!
//! A lib name may carry a `$classifier` suffix: the POM and directory come
//! from the base artifact, the jar from the classified file name.

use std::cmp::Ordering;
use std::path::PathBuf;

use clasp_core::config::ResolveConfig;
use clasp_core::coord::{Coord, CoordId, ManifestKind};
use clasp_core::library::Lib;
use clasp_maven::pom::Pom;
use clasp_maven::repo::LocalRepository;
use clasp_maven::version;
use clasp_util::errors::ClaspError;

pub fn canonicalize(
    lib: &Lib,
    coord: &Coord,
    _config: &ResolveConfig,
) -> Result<(Lib, Coord), ClaspError> {
    Ok((lib.clone(), coord.clone()))
}

pub fn dep_id(lib: &Lib, coord: &Coord, _config: &ResolveConfig) -> Result<CoordId, ClaspError> {
    let version = require_version(lib, coord)?;
    Ok(CoordId::Version(version.to_string()))
}

pub fn manifest_type(
    _lib: &Lib,
    coord: &Coord,
    _config: &ResolveConfig,
) -> Result<Coord, ClaspError> {
    let mut coord = coord.clone();
    coord.manifest.get_or_insert(ManifestKind::Pom);
    Ok(coord)
}

pub fn coord_deps(
    lib: &Lib,
    coord: &Coord,
    config: &ResolveConfig,
) -> Result<Vec<(Lib, Option<Coord>)>, ClaspError> {
    let version = require_version(lib, coord)?;
    let pom = load_pom(lib, coord, version, config)?;
    Ok(pom_children(pom, &format!("{lib} {version}")))
}

/// Compile/runtime dependencies of a POM as engine children, in
/// declaration order. Also used for local coords with a `pom.xml`.
pub(crate) fn pom_children(mut pom: Pom, origin: &str) -> Vec<(Lib, Option<Coord>)> {
    pom.resolve_properties();

    let mut children = Vec::new();
    for dep in &pom.dependencies {
        if dep.optional {
            continue;
        }
        let scope = dep.scope.as_deref().unwrap_or("compile");
        if scope != "compile" && scope != "runtime" {
            continue;
        }
        if dep.group_id.is_empty() || dep.artifact_id.is_empty() {
            tracing::debug!("Skipping incomplete dependency entry in {origin}");
            continue;
        }

        let child_lib = Lib::new(dep.group_id.clone(), dep.artifact_id.clone());
        let child_coord = dep
            .version
            .clone()
            .or_else(|| {
                pom.managed_version(&dep.group_id, &dep.artifact_id)
                    .map(str::to_string)
            })
            .map(|v| {
                let mut c = Coord::maven(v);
                c.exclusions = dep
                    .exclusions
                    .iter()
                    .filter_map(|e| match &e.artifact_id {
                        Some(a) if a != "*" => Some(Lib::new(e.group_id.clone(), a.clone())),
                        _ => {
                            tracing::debug!(
                                "Ignoring wildcard exclusion on {} in {origin}",
                                e.group_id
                            );
                            None
                        }
                    })
                    .collect();
                c
            });

        children.push((child_lib, child_coord));
    }
    children
}

pub fn compare_versions(
    lib: &Lib,
    a: &Coord,
    b: &Coord,
    _config: &ResolveConfig,
) -> Result<Ordering, ClaspError> {
    let va = require_version(lib, a)?;
    let vb = b.version().ok_or_else(|| {
        ClaspError::provider(lib, b, "cannot compare versions of different coordinate kinds")
    })?;
    Ok(version::compare(va, vb))
}

pub fn coord_paths(
    lib: &Lib,
    coord: &Coord,
    config: &ResolveConfig,
) -> Result<Vec<PathBuf>, ClaspError> {
    let version = require_version(lib, coord)?;
    let repo = LocalRepository::new(&config.local_repo);
    let base = lib.base();
    let jar = match classifier(lib) {
        Some(cls) => repo
            .artifact_dir(base.group(), base.name(), version)
            .join(format!("{}-{version}-{cls}.jar", base.name())),
        None => repo.jar_path(base.group(), base.name(), version),
    };
    if jar.is_file() {
        return Ok(vec![jar]);
    }
    // Packaging "pom" contributes no classpath entries
    if let Some(pom) = repo.load_pom(base.group(), base.name(), version)? {
        if pom.packaging.as_deref() == Some("pom") {
            return Ok(Vec::new());
        }
    }
    Err(ClaspError::provider(
        lib,
        coord,
        format!("artifact not found in local repository: {}", jar.display()),
    ))
}

pub fn lib_location(
    lib: &Lib,
    coord: &Coord,
    config: &ResolveConfig,
) -> Result<PathBuf, ClaspError> {
    let version = require_version(lib, coord)?;
    let base = lib.base();
    Ok(LocalRepository::new(&config.local_repo).artifact_dir(base.group(), base.name(), version))
}

pub fn coord_summary(lib: &Lib, coord: &Coord) -> String {
    match coord.version() {
        Some(version) => format!("{lib} {version}"),
        None => lib.to_string(),
    }
}

fn require_version<'c>(lib: &Lib, coord: &'c Coord) -> Result<&'c str, ClaspError> {
    coord
        .version()
        .ok_or_else(|| ClaspError::provider(lib, coord, "expected a Maven coordinate"))
}

fn classifier(lib: &Lib) -> Option<&str> {
    lib.name().split_once('$').map(|(_, cls)| cls)
}

fn load_pom(
    lib: &Lib,
    coord: &Coord,
    version: &str,
    config: &ResolveConfig,
) -> Result<Pom, ClaspError> {
    let base = lib.base();
    let repo = LocalRepository::new(&config.local_repo);
    repo.load_pom(base.group(), base.name(), version)?
        .ok_or_else(|| {
            ClaspError::provider(
                lib,
                coord,
                format!(
                    "pom not found in local repository: {}",
                    repo.pom_path(base.group(), base.name(), version).display()
                ),
            )
        })
}
