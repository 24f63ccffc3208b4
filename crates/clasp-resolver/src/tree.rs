//! Dependency tree rendering from a resolved lib map.
//!
//! The lib map is flat; the forest is reconstructed by inverting each
//! lib's `dependents` into parent→child edges.

use std::collections::{BTreeMap, HashSet};

use clasp_core::library::Lib;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::materialize::LibMap;
use crate::provider::Provider;

/// Render the dependency forest as an indented listing, one root per top
/// dep, children sorted by lib name. Cycles are cut at the repeated node.
pub fn render_tree(lib_map: &LibMap, provider: &dyn Provider) -> String {
    let mut graph: DiGraph<Lib, ()> = DiGraph::new();
    let mut index: BTreeMap<&Lib, NodeIndex> = BTreeMap::new();
    for lib in lib_map.libs.keys() {
        index.insert(lib, graph.add_node(lib.clone()));
    }
    for (lib, resolved) in &lib_map.libs {
        for parent in &resolved.dependents {
            if let (Some(&from), Some(&to)) = (index.get(parent), index.get(lib)) {
                graph.add_edge(from, to, ());
            }
        }
    }

    let mut output = String::new();
    let roots: Vec<&Lib> = lib_map
        .libs
        .iter()
        .filter(|(_, resolved)| resolved.dependents.is_empty())
        .map(|(lib, _)| lib)
        .collect();
    let mut visited = HashSet::new();
    for root in roots {
        if let Some(&idx) = index.get(root) {
            print_subtree(lib_map, provider, &graph, idx, 0, &mut visited, &mut output);
        }
    }
    output
}

fn print_subtree(
    lib_map: &LibMap,
    provider: &dyn Provider,
    graph: &DiGraph<Lib, ()>,
    idx: NodeIndex,
    depth: usize,
    visited: &mut HashSet<NodeIndex>,
    output: &mut String,
) {
    let lib = &graph[idx];
    let line = match lib_map.libs.get(lib) {
        Some(resolved) => provider.coord_summary(lib, &resolved.coord),
        None => lib.to_string(),
    };
    output.push_str(&"  ".repeat(depth));
    output.push_str(&line);
    output.push('\n');

    if !visited.insert(idx) {
        return;
    }

    let mut children: Vec<NodeIndex> = graph.neighbors_directed(idx, Direction::Outgoing).collect();
    children.sort_by(|a, b| graph[*a].cmp(&graph[*b]));
    for child in children {
        print_subtree(lib_map, provider, graph, child, depth + 1, visited, output);
    }

    visited.remove(&idx);
}

/// Print the forest to stdout.
pub fn print_tree(lib_map: &LibMap, provider: &dyn Provider) {
    print!("{}", render_tree(lib_map, provider));
}
