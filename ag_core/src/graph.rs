//! Transitive dependency graph construction with cycle tolerance.
//!
//! # Algorithm Overview
//!
//! 1. **Depth-first expansion**: starting from the root, each package's
//!    direct dependencies are resolved through an [`AdjacencySource`] and
//!    visited recursively.
//! 2. **Cycle detection**: a stack of the ancestors currently being
//!    expanded identifies back-edges; a detected cycle is recorded as data
//!    and its edges are withheld from the result graph, but traversal
//!    continues past it.
//! 3. **Filtering**: packages whose name contains the filter substring
//!    (case-insensitive) are excluded from the graph along with all of
//!    their edges; the excluded names are recorded for the renderer.
//!
//! # Determinism
//!
//! Node iteration order is stable (`BTreeMap`) and per-node edge order
//! follows the adjacency source, so building the same inputs twice yields
//! identical graphs.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Supplier of direct-dependency edges, resolved on demand.
///
/// Implemented by the offline test graph and by the package index.
/// Returning `None` marks the name as unknown; the traversal treats
/// unknown names as leaves rather than errors, tolerating the partial
/// metadata found in real-world indexes.
pub trait AdjacencySource {
    fn direct_deps(&self, name: &str) -> Option<Vec<String>>;
}

/// Package name to ordered direct-dependency names. Every reachable,
/// non-filtered package appears as a key, even with no dependencies.
pub type DependencyGraph = BTreeMap<String, Vec<String>>;

/// The materialized graph together with everything observed while
/// building it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// The package the traversal started from.
    pub root: String,
    pub graph: DependencyGraph,
    /// One record per distinct cycle path, each closed by repeating the
    /// package where the cycle was entered.
    pub cycles: Vec<Vec<String>>,
    /// Names excluded by the filter substring.
    pub filtered: BTreeSet<String>,
}

impl Resolution {
    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    /// Cycle paths rendered as `a -> b -> a` strings.
    pub fn rendered_cycles(&self) -> Vec<String> {
        self.cycles.iter().map(|c| c.join(" -> ")).collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.len()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.values().map(Vec::len).sum()
    }
}

/// Builds a [`Resolution`] by depth-first traversal over an adjacency
/// source. All traversal state is owned by the single `build` call.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    filter: Option<String>,
}

/// Mutable traversal state threaded through the recursion.
#[derive(Default)]
struct Traversal {
    /// Packages whose subtree has been fully expanded.
    visited: BTreeSet<String>,
    /// Chain of ancestors currently being expanded.
    path: Vec<String>,
    /// Rendered cycle paths already recorded, for deduplication.
    seen_cycles: BTreeSet<String>,
    /// Edges withheld from the graph because they lie on a detected cycle.
    suppressed: BTreeSet<(String, String)>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude every package whose name contains `filter`
    /// (case-insensitive substring containment).
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into().to_lowercase());
        self
    }

    fn is_filtered(&self, name: &str) -> bool {
        self.filter
            .as_deref()
            .is_some_and(|f| name.to_lowercase().contains(f))
    }

    /// Materialize the full transitive dependency graph below `root`.
    ///
    /// Cycles are not fatal: they are collected on the returned
    /// [`Resolution`] and traversal continues. A filtered root yields an
    /// empty resolution.
    pub fn build(&self, root: &str, source: &dyn AdjacencySource) -> Resolution {
        let mut resolution = Resolution {
            root: root.to_string(),
            ..Default::default()
        };
        let mut traversal = Traversal::default();
        self.visit(root, source, &mut traversal, &mut resolution);
        resolution
    }

    fn visit(
        &self,
        name: &str,
        source: &dyn AdjacencySource,
        traversal: &mut Traversal,
        out: &mut Resolution,
    ) {
        if self.is_filtered(name) {
            out.filtered.insert(name.to_string());
            return;
        }

        // A name already on the ancestor chain closes a cycle. Record the
        // path from its first occurrence and withhold every edge along it.
        if let Some(start) = traversal.path.iter().position(|p| p == name) {
            let mut cycle: Vec<String> = traversal.path[start..].to_vec();
            cycle.push(name.to_string());
            for pair in cycle.windows(2) {
                traversal
                    .suppressed
                    .insert((pair[0].clone(), pair[1].clone()));
            }
            if traversal.seen_cycles.insert(cycle.join(" -> ")) {
                out.cycles.push(cycle);
            }
            return;
        }

        // Fully expanded from another branch; its adjacency is reused.
        if traversal.visited.contains(name) {
            return;
        }

        traversal.visited.insert(name.to_string());
        traversal.path.push(name.to_string());
        out.graph.entry(name.to_string()).or_default();

        let deps = source.direct_deps(name).unwrap_or_default();
        for dep in &deps {
            self.visit(dep, source, traversal, out);

            let edge = (name.to_string(), dep.clone());
            if !self.is_filtered(dep) && !traversal.suppressed.contains(&edge) {
                if let Some(edges) = out.graph.get_mut(name) {
                    edges.push(dep.clone());
                }
            }
        }

        traversal.path.pop();
    }
}
