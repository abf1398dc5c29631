//! End-to-end resolution tests: acquire a package source from disk the way
//! the CLI does, then parse, build the graph, and order it.

use ag_core::{
    GraphBuilder, install_order, parse_package_index, parse_test_graph, render_dot,
};
use ag_io::Fetcher;
use std::io::Write;
use std::path::PathBuf;

fn write_fixture(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

// ============================================================================
// Test-graph mode
// ============================================================================

mod test_graph_mode {
    use super::*;

    #[tokio::test]
    async fn resolves_acyclic_graph_with_install_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "graph.txt", b"A: B, C\nB: C\nC:\n");

        let text = Fetcher::new().fetch_file(&path).await.unwrap();
        let graph = parse_test_graph(&text);
        let resolution = GraphBuilder::new().build("A", &graph);

        assert_eq!(resolution.graph["A"], vec!["B", "C"]);
        assert_eq!(resolution.graph["B"], vec!["C"]);
        assert!(resolution.graph["C"].is_empty());
        assert!(!resolution.has_cycles());

        let order = install_order(&resolution.graph, "A", None);
        assert_eq!(order, vec!["C", "B", "A"]);
    }

    #[tokio::test]
    async fn two_node_cycle_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "graph.txt", b"A: B\nB: A\n");

        let text = Fetcher::new().fetch_file(&path).await.unwrap();
        let graph = parse_test_graph(&text);
        let resolution = GraphBuilder::new().build("A", &graph);

        assert!(resolution.graph["A"].is_empty());
        assert!(resolution.graph["B"].is_empty());
        assert_eq!(resolution.rendered_cycles(), vec!["A -> B -> A"]);
    }

    #[tokio::test]
    async fn lowercase_query_matches_uppercased_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "graph.txt", b"# comment\napp: lib\nlib:\n");

        let text = Fetcher::new().fetch_file(&path).await.unwrap();
        let graph = parse_test_graph(&text);

        // The CLI uppercases the queried package in test mode.
        let root = "app".to_uppercase();
        assert!(graph.require(&root).is_ok());
        let resolution = GraphBuilder::new().build(&root, &graph);
        assert_eq!(resolution.graph["APP"], vec!["LIB"]);
    }

    #[tokio::test]
    async fn unknown_root_is_a_lookup_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "graph.txt", b"A: B\nB:\n");

        let text = Fetcher::new().fetch_file(&path).await.unwrap();
        let graph = parse_test_graph(&text);
        assert!(graph.require("MISSING").is_err());
    }
}

// ============================================================================
// Index mode (local file, optionally compressed)
// ============================================================================

mod index_mode {
    use super::*;

    const INDEX: &str = "\
Package: foo
Version: 1.0
Architecture: amd64
Depends: bar (>= 2.0) | baz, qux

Package: bar
Version: 2.1
Architecture: amd64
Depends: qux

Package: qux
Version: 0.3
Architecture: all
";

    #[tokio::test]
    async fn resolves_from_plain_index_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "Packages", INDEX.as_bytes());

        let text = Fetcher::new().fetch_file(&path).await.unwrap();
        let index = parse_package_index(&text);
        let record = index.lookup("foo", None).unwrap();
        assert_eq!(record.version, "1.0");

        let resolution = GraphBuilder::new().build("foo", &index);

        // First alternative only: baz is never considered.
        assert_eq!(resolution.graph["foo"], vec!["bar", "qux"]);
        assert_eq!(resolution.graph["bar"], vec!["qux"]);
        assert!(!resolution.graph.contains_key("baz"));
    }

    #[tokio::test]
    async fn resolves_from_gzipped_index_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(INDEX.as_bytes()).unwrap();
        let path = write_fixture(&dir, "Packages.gz", &encoder.finish().unwrap());

        let text = Fetcher::new().fetch_file(&path).await.unwrap();
        let index = parse_package_index(&text);
        assert_eq!(index.len(), 3);
    }

    #[tokio::test]
    async fn version_pin_selects_or_rejects() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "Packages", INDEX.as_bytes());

        let text = Fetcher::new().fetch_file(&path).await.unwrap();
        let index = parse_package_index(&text);

        assert!(index.lookup("bar", Some("2.1")).is_ok());
        assert!(index.lookup("bar", Some("9.9")).is_err());
    }

    #[tokio::test]
    async fn filter_prunes_matching_packages_everywhere() {
        let dir = tempfile::tempdir().unwrap();
        let index_text = "\
Package: app
Version: 1.0
Depends: libfoo, tool

Package: libfoo
Version: 1.0
Depends: libbar

Package: libbar
Version: 1.0

Package: tool
Version: 1.0
";
        let path = write_fixture(&dir, "Packages", index_text.as_bytes());

        let text = Fetcher::new().fetch_file(&path).await.unwrap();
        let index = parse_package_index(&text);
        let resolution = GraphBuilder::new().with_filter("lib").build("app", &index);

        assert!(!resolution.graph.contains_key("libfoo"));
        assert!(!resolution.graph.contains_key("libbar"));
        assert_eq!(resolution.graph["app"], vec!["tool"]);

        let order = install_order(&resolution.graph, "app", Some("lib"));
        assert_eq!(order, vec!["tool", "app"]);
    }

    #[tokio::test]
    async fn dot_output_reflects_the_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "Packages", INDEX.as_bytes());

        let text = Fetcher::new().fetch_file(&path).await.unwrap();
        let index = parse_package_index(&text);
        let resolution = GraphBuilder::new().build("foo", &index);

        let dot = render_dot(&resolution);
        assert!(dot.contains("\"foo\" [fillcolor=gold"));
        assert!(dot.contains("\"foo\" -> \"bar\";"));
        assert!(dot.contains("\"bar\" -> \"qux\";"));
    }
}
