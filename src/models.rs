//! Data models shared across discovery, analysis and reporting.
//!
//! This module contains the package table produced by discovery, the
//! issues extracted from the analyzer's xUnit output, and the
//! `summary.json` document whose history is carried across runs.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::path::{Path, PathBuf};

/// A ROS package found during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Name declared in the package manifest (trimmed, non-empty).
    pub name: String,
    /// Directory containing the manifest.
    pub path: PathBuf,
}

/// Table of discovered packages keyed by name.
///
/// Iteration is sorted by name. The first registration of a name wins,
/// later ones are reported back to the caller and dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packages {
    by_name: BTreeMap<String, PathBuf>,
}

impl Packages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package unless the name is already taken.
    ///
    /// Returns `false` when an earlier registration was kept.
    pub fn insert_first(&mut self, name: String, path: PathBuf) -> bool {
        match self.by_name.entry(name) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(path);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    /// Merge another table in, keeping existing names.
    pub fn absorb(&mut self, other: Packages) {
        for (name, path) in other.by_name {
            self.insert_first(name, path);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.by_name.get(name).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = Package> + '_ {
        self.by_name.iter().map(|(name, path)| Package {
            name: name.clone(),
            path: path.clone(),
        })
    }

    /// The only package's name, if exactly one was found.
    pub fn single_name(&self) -> Option<&str> {
        if self.by_name.len() == 1 {
            self.names().next()
        } else {
            None
        }
    }
}

/// One failing test case from the analyzer's xUnit report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Rule identifier (`UNKNOWN ISSUE` when the report omits it).
    pub id: String,
    /// Severity as reported in the failure `type` attribute.
    pub severity: String,
    pub message: String,
    pub category: String,
    pub file: String,
    pub line: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}:{}]: ({}: {}) {}",
            self.file, self.line, self.severity, self.id, self.message
        )
    }
}

/// Summary of issues found during analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    /// Total number of issues.
    pub total: usize,
    /// Issues grouped by severity.
    pub by_severity: BTreeMap<String, usize>,
    /// Issues grouped by category.
    pub by_category: BTreeMap<String, usize>,
}

impl IssueSummary {
    /// Creates a summary from a list of issues.
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut summary = Self {
            total: issues.len(),
            ..Self::default()
        };

        for issue in issues {
            *summary
                .by_severity
                .entry(issue.severity.clone())
                .or_insert(0) += 1;
            *summary
                .by_category
                .entry(issue.category.clone())
                .or_insert(0) += 1;
        }

        summary
    }

    pub fn is_clean(&self) -> bool {
        self.total == 0
    }
}

/// The analyzer's `summary.json`.
///
/// Only `history` is interpreted; every other field is carried through
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    /// Series key to ordered data points, oldest first.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub history: BTreeMap<String, Vec<Value>>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// `"history": null` means no history yet.
fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}
