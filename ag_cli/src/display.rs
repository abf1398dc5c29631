//! Terminal presentation helpers: styled headers, the dependency tree,
//! cycle warnings, and the install-order listing.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeSet;
use std::time::Duration;

use ag_core::Resolution;

/// Spinner shown while the index is being acquired.
pub fn fetch_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("    {spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

// ============================================================================
// Formatting helpers (pure functions for testability)
// ============================================================================

/// Header line naming the resolved package (and pinned version, if any).
pub fn format_header(root: &str, version: Option<&str>) -> String {
    match version {
        Some(v) => format!(
            "{} Dependency graph for {} {}:",
            style("==>").cyan().bold(),
            style(root).bold(),
            style(v).dim()
        ),
        None => format!(
            "{} Dependency graph for {}:",
            style("==>").cyan().bold(),
            style(root).bold()
        ),
    }
}

/// Summary line after the tree.
pub fn format_summary(nodes: usize, edges: usize) -> String {
    format!(
        "{} {} packages, {} dependency edges",
        style("==>").cyan().bold(),
        style(nodes).green().bold(),
        edges
    )
}

/// One warning line per detected cycle.
pub fn format_cycle_line(rendered: &str) -> String {
    format!(
        "{} dependency cycle: {}",
        style("warning:").yellow().bold(),
        rendered
    )
}

/// Dim note about names the filter excluded.
pub fn format_filtered_note(count: usize, filter: &str) -> String {
    format!(
        "    {}",
        style(format!("{count} package(s) excluded by filter '{filter}'")).dim()
    )
}

/// Header for the install-order listing.
pub fn format_order_header(count: usize) -> String {
    format!(
        "{} Install order ({} packages, dependencies first):",
        style("==>").cyan().bold(),
        style(count).green().bold()
    )
}

/// Numbered install-order lines.
pub fn format_order_lines(order: &[String]) -> Vec<String> {
    order
        .iter()
        .enumerate()
        .map(|(i, name)| format!("  {:>3}. {}", i + 1, name))
        .collect()
}

/// The dependency tree as plain text lines, root first.
///
/// A package expanded earlier in the tree is not expanded again; when it
/// has dependencies that are being elided, the line says so.
pub fn format_tree_lines(resolution: &Resolution) -> Vec<String> {
    let mut lines = Vec::new();
    if !resolution.graph.contains_key(&resolution.root) {
        return lines;
    }
    let mut seen = BTreeSet::new();
    walk(resolution, &resolution.root, "", true, true, &mut seen, &mut lines);
    lines
}

fn walk(
    resolution: &Resolution,
    name: &str,
    prefix: &str,
    is_last: bool,
    is_root: bool,
    seen: &mut BTreeSet<String>,
    lines: &mut Vec<String>,
) {
    let first_visit = seen.insert(name.to_string());
    let deps = resolution.graph.get(name);
    let has_children = deps.is_some_and(|d| !d.is_empty());

    let connector = if is_root {
        ""
    } else if is_last {
        "└── "
    } else {
        "├── "
    };
    let suffix = if !first_visit && has_children {
        " (see above)"
    } else {
        ""
    };
    lines.push(format!("{prefix}{connector}{name}{suffix}"));

    if !first_visit {
        return;
    }

    let Some(deps) = deps else {
        return;
    };
    let child_prefix = if is_root {
        String::new()
    } else if is_last {
        format!("{prefix}    ")
    } else {
        format!("{prefix}│   ")
    };
    for (i, dep) in deps.iter().enumerate() {
        let last = i + 1 == deps.len();
        walk(resolution, dep, &child_prefix, last, false, seen, lines);
    }
}

// ============================================================================
// Printing
// ============================================================================

pub fn print_tree(resolution: &Resolution) {
    for line in format_tree_lines(resolution) {
        println!("{line}");
    }
}

pub fn print_cycles(resolution: &Resolution) {
    for rendered in resolution.rendered_cycles() {
        eprintln!("{}", format_cycle_line(&rendered));
    }
}

pub fn print_install_order(order: &[String]) {
    println!();
    println!("{}", format_order_header(order.len()));
    for line in format_order_lines(order) {
        println!("{line}");
    }
}

pub fn note_skipped(count: usize) {
    eprintln!(
        "    {}",
        style(format!("Note: skipped {count} malformed index stanza(s)")).dim()
    );
}

// ============================================================================
// Unit Tests
// ============================================================================
