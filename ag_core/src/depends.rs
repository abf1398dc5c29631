//! Extraction of bare package names from `Depends` expressions.
//!
//! A `Depends` value is a comma-separated list of groups, each group a
//! `|`-separated list of alternatives, each alternative optionally followed
//! by a version constraint in parentheses:
//!
//! ```text
//! libc6 (>= 2.34), libssl3 | libssl1.1, default-mta | mail-transport-agent
//! ```
//!
//! Alternative satisfiability is out of scope: only the first alternative
//! of each group is taken, which keeps the output deterministic at the cost
//! of not modeling apt's dynamic alternative selection.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Leading package-name token of an alternative: everything up to the
/// first space, parenthesis, or angle bracket.
static NAME_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s()<>]+").expect("name-token pattern is valid"));

/// Extract the direct-dependency names from a raw `Depends` expression.
///
/// Returns one name per comma-separated group (first alternative only),
/// deduplicated, preserving first-seen source order. Virtual-package
/// placeholders wrapped in angle brackets are discarded.
pub fn extract_depends(raw: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut names = Vec::new();

    for group in raw.split(',') {
        let first_alternative = group.split('|').next().unwrap_or("").trim();
        if first_alternative.is_empty() || first_alternative.starts_with('<') {
            continue;
        }
        let Some(token) = NAME_TOKEN.find(first_alternative) else {
            continue;
        };
        let name = token.as_str().to_string();
        if seen.insert(name.clone()) {
            names.push(name);
        }
    }

    names
}
