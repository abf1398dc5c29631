//! Debian-style package index parsing.
//!
//! The index is an RFC822-like stanza format: blocks separated by blank
//! lines, each line `Key: Value`. Parsing is deliberately permissive since
//! upstream repository data is not fully controlled: lines without a colon
//! are skipped, and blocks missing `Package` or `Version` are dropped and
//! only counted. A partial parse is preferable to total failure.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::depends::extract_depends;
use crate::errors::Error;
use crate::graph::AdjacencySource;

/// Architecture used when a stanza carries no `Architecture` field.
pub const DEFAULT_ARCHITECTURE: &str = "all";

/// Maximum number of alternative names/versions listed in lookup error hints.
const HINT_LIMIT: usize = 5;

/// One parsed stanza of the package index. Immutable after parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageRecord {
    pub name: String,
    pub architecture: String,
    pub version: String,
    /// The raw `Depends` expression, exactly as written in the index.
    pub depends_raw: Option<String>,
    /// All key-value pairs of the stanza, including the recognized ones.
    pub fields: BTreeMap<String, String>,
}

impl PackageRecord {
    /// Composite key this record is stored under.
    pub fn key(&self) -> String {
        format!("{}:{}", self.name, self.architecture)
    }
}

/// Read-only mapping from `name:architecture` to package metadata.
/// If a key repeats in the source text, the last-seen record wins.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PackageIndex {
    records: BTreeMap<String, PackageRecord>,
    skipped: usize,
}

impl PackageIndex {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of stanzas dropped for lacking `Package` or `Version`.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn get(&self, key: &str) -> Option<&PackageRecord> {
        self.records.get(key)
    }

    pub fn records(&self) -> impl Iterator<Item = &PackageRecord> {
        self.records.values()
    }

    /// Find a record by bare package name, across architectures.
    ///
    /// Without a version constraint the first match in key order is
    /// returned, which makes repeated lookups deterministic. With a
    /// version constraint the record must match it exactly.
    pub fn lookup(&self, name: &str, version: Option<&str>) -> Result<&PackageRecord, Error> {
        let mut versions = Vec::new();

        for record in self.records.values().filter(|r| r.name == name) {
            match version {
                None => return Ok(record),
                Some(v) if record.version == v => return Ok(record),
                Some(_) => {
                    if !versions.contains(&record.version) {
                        versions.push(record.version.clone());
                    }
                }
            }
        }

        if versions.is_empty() {
            Err(Error::MissingPackage {
                name: name.to_string(),
                available: self.suggestions(name),
            })
        } else {
            versions.truncate(HINT_LIMIT);
            Err(Error::VersionNotFound {
                name: name.to_string(),
                requested: version.unwrap_or_default().to_string(),
                available: versions,
            })
        }
    }

    /// A few package names to offer when a lookup misses: substring
    /// matches first, otherwise the first few names in the index.
    fn suggestions(&self, query: &str) -> Vec<String> {
        let query_lower = query.to_lowercase();
        let mut names: Vec<String> = self
            .records
            .values()
            .filter(|r| r.name.to_lowercase().contains(&query_lower))
            .map(|r| r.name.clone())
            .collect();
        names.dedup();

        if names.is_empty() {
            names = self.records.values().map(|r| r.name.clone()).collect();
            names.dedup();
        }

        names.truncate(HINT_LIMIT);
        names
    }
}

/// Dependency edges come straight from each record's `Depends` field;
/// names absent from the index resolve to `None` and are treated as
/// leaves by the traversal.
impl AdjacencySource for PackageIndex {
    fn direct_deps(&self, name: &str) -> Option<Vec<String>> {
        let record = self.lookup(name, None).ok()?;
        Some(
            record
                .depends_raw
                .as_deref()
                .map(extract_depends)
                .unwrap_or_default(),
        )
    }
}

/// Parse decoded package-index text into a lookup table.
///
/// Never fails: malformed lines and incomplete stanzas are tolerated,
/// the latter surfacing only in [`PackageIndex::skipped`].
pub fn parse_package_index(text: &str) -> PackageIndex {
    let mut index = PackageIndex::default();
    let mut block: Vec<(String, String)> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            flush_block(&mut block, &mut index);
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            block.push((key.trim().to_string(), value.trim().to_string()));
        }
        // Lines without a colon (including continuation lines) are skipped.
    }
    flush_block(&mut block, &mut index);

    index
}

fn flush_block(block: &mut Vec<(String, String)>, index: &mut PackageIndex) {
    if block.is_empty() {
        return;
    }
    let fields: BTreeMap<String, String> = block.drain(..).collect();

    let (Some(name), Some(version)) = (fields.get("Package"), fields.get("Version")) else {
        index.skipped += 1;
        return;
    };

    let record = PackageRecord {
        name: name.clone(),
        architecture: fields
            .get("Architecture")
            .cloned()
            .unwrap_or_else(|| DEFAULT_ARCHITECTURE.to_string()),
        version: version.clone(),
        depends_raw: fields.get("Depends").cloned(),
        fields,
    };
    index.records.insert(record.key(), record);
}
