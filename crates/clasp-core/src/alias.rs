//! Alias tables and their combination rules.
//!
//! An alias is a named bundle of resolution and classpath arguments stored
//! under `[aliases.<name>]` in `deps.toml`. Combining aliases folds their
//! maps into a single [`ResolveArgs`] under per-key merge rules.

use std::collections::BTreeMap;

use clasp_util::errors::ClaspError;
use serde::{Deserialize, Serialize};

use crate::coord::{Coord, DepSpec};
use crate::library::Lib;
use crate::manifest::DepsFile;

/// One `[aliases.<name>]` table. Unknown keys are rejected at parse time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Alias {
    /// Replacement project deps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deps: Option<BTreeMap<Lib, DepSpec>>,

    /// Additional top-level deps.
    #[serde(default, rename = "extra-deps", skip_serializing_if = "Option::is_none")]
    pub extra_deps: Option<BTreeMap<Lib, DepSpec>>,

    /// Coordinates that win over any transitively requested version.
    #[serde(default, rename = "override-deps", skip_serializing_if = "Option::is_none")]
    pub override_deps: Option<BTreeMap<Lib, DepSpec>>,

    /// Coordinates used when a dependency arrives without one.
    #[serde(default, rename = "default-deps", skip_serializing_if = "Option::is_none")]
    pub default_deps: Option<BTreeMap<Lib, DepSpec>>,

    /// Per-lib classpath path replacements.
    #[serde(
        default,
        rename = "classpath-overrides",
        skip_serializing_if = "Option::is_none"
    )]
    pub classpath_overrides: Option<BTreeMap<Lib, String>>,

    /// Replacement source paths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<String>>,

    /// Additional source paths.
    #[serde(default, rename = "extra-paths", skip_serializing_if = "Option::is_none")]
    pub extra_paths: Option<Vec<String>>,

    /// JVM options, concatenated across aliases.
    #[serde(default, rename = "jvm-opts", skip_serializing_if = "Option::is_none")]
    pub jvm_opts: Option<Vec<String>>,

    /// Main-class options; the last non-empty set wins.
    #[serde(default, rename = "main-opts", skip_serializing_if = "Option::is_none")]
    pub main_opts: Option<Vec<String>>,
}

/// The combined argument map produced by [`combine_aliases`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveArgs {
    pub deps: BTreeMap<Lib, Coord>,
    pub extra_deps: BTreeMap<Lib, Coord>,
    pub override_deps: BTreeMap<Lib, Coord>,
    pub default_deps: BTreeMap<Lib, Coord>,
    pub classpath_overrides: BTreeMap<Lib, String>,
    pub paths: Vec<String>,
    pub extra_paths: Vec<String>,
    pub jvm_opts: Vec<String>,
    pub main_opts: Vec<String>,
}

impl ResolveArgs {
    /// Merge another args map into this one.
    ///
    /// Dep maps merge right-wins per key; path lists concatenate and
    /// de-duplicate preserving first occurrence; `jvm_opts` concatenate;
    /// `main_opts` is replaced when the right side is non-empty. This
    /// merge is associative, so folding aliases one at a time gives the
    /// same result as combining them all at once.
    pub fn merge(mut self, other: ResolveArgs) -> ResolveArgs {
        self.deps.extend(other.deps);
        self.extra_deps.extend(other.extra_deps);
        self.override_deps.extend(other.override_deps);
        self.default_deps.extend(other.default_deps);
        self.classpath_overrides.extend(other.classpath_overrides);
        self.paths = concat_dedupe(self.paths, other.paths);
        self.extra_paths = concat_dedupe(self.extra_paths, other.extra_paths);
        self.jvm_opts.extend(other.jvm_opts);
        if !other.main_opts.is_empty() {
            self.main_opts = other.main_opts;
        }
        self
    }
}

impl From<&Alias> for ResolveArgs {
    fn from(alias: &Alias) -> Self {
        ResolveArgs {
            deps: coord_map(&alias.deps),
            extra_deps: coord_map(&alias.extra_deps),
            override_deps: coord_map(&alias.override_deps),
            default_deps: coord_map(&alias.default_deps),
            classpath_overrides: alias.classpath_overrides.clone().unwrap_or_default(),
            paths: alias.paths.clone().unwrap_or_default(),
            extra_paths: alias.extra_paths.clone().unwrap_or_default(),
            jvm_opts: alias.jvm_opts.clone().unwrap_or_default(),
            main_opts: alias.main_opts.clone().unwrap_or_default(),
        }
    }
}

fn coord_map(specs: &Option<BTreeMap<Lib, DepSpec>>) -> BTreeMap<Lib, Coord> {
    specs
        .iter()
        .flatten()
        .map(|(lib, spec)| (lib.clone(), spec.to_coord()))
        .collect()
}

fn concat_dedupe(mut left: Vec<String>, right: Vec<String>) -> Vec<String> {
    for item in right {
        if !left.contains(&item) {
            left.push(item);
        }
    }
    left
}

/// Combine the named aliases from a deps file into one argument map.
///
/// Aliases apply in the order given; an unknown alias name is an error.
pub fn combine_aliases(deps_file: &DepsFile, names: &[String]) -> Result<ResolveArgs, ClaspError> {
    let mut args = ResolveArgs::default();
    for name in names {
        let alias = deps_file
            .aliases
            .get(name)
            .ok_or_else(|| ClaspError::Alias { name: name.clone() })?;
        args = args.merge(ResolveArgs::from(alias));
    }
    Ok(args)
}
