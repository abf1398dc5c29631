//! Offline test-graph format for exercising the resolver without an index.
//!
//! One line per package, `NAME: dep1, dep2, ...`. Blank lines and lines
//! beginning with `#` are comments. Names are case-normalized to
//! uppercase, dependencies included.

use std::collections::BTreeMap;

use crate::errors::Error;
use crate::graph::AdjacencySource;

/// A pre-built adjacency table parsed from the test-graph format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestGraph {
    adjacency: BTreeMap<String, Vec<String>>,
}

impl TestGraph {
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.adjacency.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    /// Fail with a lookup error (plus a hint of known names) when the
    /// requested root is not part of this graph. Unknown names appearing
    /// as dependencies stay tolerated as leaves; only the root is held to
    /// a stricter standard, since asking for it was explicit.
    pub fn require(&self, name: &str) -> Result<(), Error> {
        if self.contains(name) {
            return Ok(());
        }
        Err(Error::MissingPackage {
            name: name.to_string(),
            available: self.names().take(5).map(str::to_string).collect(),
        })
    }
}

impl AdjacencySource for TestGraph {
    fn direct_deps(&self, name: &str) -> Option<Vec<String>> {
        self.adjacency.get(name).cloned()
    }
}

/// Parse test-graph text. Never fails; a line without a colon is treated
/// as a package with no dependencies.
pub fn parse_test_graph(text: &str) -> TestGraph {
    let mut adjacency = BTreeMap::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (name, rest) = line.split_once(':').unwrap_or((line, ""));
        let name = name.trim().to_uppercase();
        if name.is_empty() {
            continue;
        }

        let deps: Vec<String> = rest
            .split(',')
            .map(|dep| dep.trim().to_uppercase())
            .filter(|dep| !dep.is_empty())
            .collect();
        adjacency.insert(name, deps);
    }

    TestGraph { adjacency }
}
