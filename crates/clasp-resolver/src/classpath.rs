//! Classpath assembly from a resolved lib map.

use std::collections::BTreeMap;

use clasp_core::library::Lib;

use crate::materialize::LibMap;

/// Classpath-affecting arguments, usually taken from combined aliases.
#[derive(Debug, Clone, Default)]
pub struct ClasspathArgs {
    pub extra_paths: Vec<String>,
    pub classpath_overrides: BTreeMap<Lib, String>,
}

/// Assemble the classpath string: extra paths, then project paths, then
/// every lib's artifact paths (replaced by its override when present).
/// Blank entries are dropped; entries join with the platform separator.
pub fn make_classpath(lib_map: &LibMap, paths: &[String], args: &ClasspathArgs) -> String {
    let mut entries: Vec<String> = Vec::new();
    entries.extend(args.extra_paths.iter().cloned());
    entries.extend(paths.iter().cloned());
    for (lib, resolved) in &lib_map.libs {
        match args.classpath_overrides.get(lib) {
            Some(replacement) => entries.push(replacement.clone()),
            None => entries.extend(resolved.paths.iter().map(|p| p.display().to_string())),
        }
    }
    entries.retain(|entry| !entry.trim().is_empty());
    entries.join(separator())
}

fn separator() -> &'static str {
    if cfg!(windows) {
        ";"
    } else {
        ":"
    }
}
