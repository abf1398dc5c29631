//! DOT-language description of a resolution, for Graphviz rendering.
//!
//! Output is deterministic: nodes in graph key order, filtered names in
//! set order, edges in per-node adjacency order, cycle edges last.

use crate::graph::Resolution;

/// Render a resolution as a `digraph` description.
///
/// The root is highlighted, regular dependencies are plain boxes, names
/// excluded by the filter appear grayed out and dashed, and the edges of
/// detected cycles are drawn dashed in red (they are withheld from the
/// graph itself).
pub fn render_dot(resolution: &Resolution) -> String {
    let mut lines = Vec::new();
    lines.push("digraph dependencies {".to_string());
    lines.push("    rankdir=TB;".to_string());
    lines.push("    node [shape=box, style=filled, fillcolor=lightblue];".to_string());

    for name in resolution.graph.keys() {
        if *name == resolution.root {
            lines.push(format!(
                "    \"{}\" [fillcolor=gold, penwidth=2];",
                escape(name)
            ));
        } else {
            lines.push(format!("    \"{}\";", escape(name)));
        }
    }

    for name in &resolution.filtered {
        lines.push(format!(
            "    \"{}\" [style=\"filled,dashed\", fillcolor=lightgray, fontcolor=gray40];",
            escape(name)
        ));
    }

    for (from, deps) in &resolution.graph {
        for to in deps {
            lines.push(format!("    \"{}\" -> \"{}\";", escape(from), escape(to)));
        }
    }

    for cycle in &resolution.cycles {
        for pair in cycle.windows(2) {
            lines.push(format!(
                "    \"{}\" -> \"{}\" [color=red, style=dashed];",
                escape(&pair[0]),
                escape(&pair[1])
            ));
        }
    }

    lines.push("}".to_string());
    lines.join("\n")
}

fn escape(name: &str) -> String {
    name.replace('"', "\\\"")
}
