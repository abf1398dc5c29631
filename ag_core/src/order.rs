//! Install-order computation over a finished dependency graph.
//!
//! Kahn's algorithm, seeded from the queried root. Edges point from a
//! package to its dependencies, so the raw processing sequence is
//! dependent-first; reversing it yields the install order (dependencies
//! before the packages that need them). Nodes left with a positive
//! in-degree — cycle remnants — are simply omitted, so the order may be a
//! strict subset of the graph.

use std::collections::{BTreeMap, VecDeque};

use crate::graph::DependencyGraph;

/// Compute a dependency-first install order for `start`.
///
/// Returns an empty order when `start` is absent from the graph, matches
/// the filter substring, or has incoming edges within the graph (it is
/// itself depended upon, which only happens in synthetic graphs).
pub fn install_order(graph: &DependencyGraph, start: &str, filter: Option<&str>) -> Vec<String> {
    let filter = filter.map(str::to_lowercase);
    let is_filtered =
        |name: &str| filter.as_deref().is_some_and(|f| name.to_lowercase().contains(f));

    if !graph.contains_key(start) || is_filtered(start) {
        return Vec::new();
    }

    let mut indegree: BTreeMap<&str, usize> = graph.keys().map(|k| (k.as_str(), 0)).collect();
    for deps in graph.values() {
        for dep in deps {
            if let Some(count) = indegree.get_mut(dep.as_str()) {
                *count += 1;
            }
        }
    }

    if indegree.get(start).copied() != Some(0) {
        return Vec::new();
    }

    let mut queue: VecDeque<&str> = VecDeque::new();
    queue.push_back(start);

    let mut dependents_first = Vec::with_capacity(graph.len());
    while let Some(name) = queue.pop_front() {
        dependents_first.push(name.to_string());

        let Some(deps) = graph.get(name) else {
            continue;
        };
        for dep in deps {
            if let Some(count) = indegree.get_mut(dep.as_str()) {
                *count -= 1;
                if *count == 0 && !is_filtered(dep) {
                    queue.push_back(dep.as_str());
                }
            }
        }
    }

    dependents_first.reverse();
    dependents_first
}
