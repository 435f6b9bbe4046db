//! Dependency graph assembled from a directory of `*.d` files.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::depfile::{parse_depfile, DependencyRecord};

/// Extension of compiler-emitted dependency record files.
pub const DEPFILE_EXTENSION: &str = "d";

/// Mapping `target → {dependency}`.
///
/// Built fresh for every impact computation and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyGraph {
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from the dependency records directly inside `dir`.
    ///
    /// Files are processed in lexicographic file-name order, so when two
    /// records declare the same target the one in the later file wins on
    /// every platform. Unreadable or malformed records are skipped.
    pub fn build(dir: &Path) -> io::Result<Self> {
        if !dir.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("dependency directory not found: {}", dir.display()),
            ));
        }

        let mut graph = Self::new();
        let mut skipped = 0usize;

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Failed to read dependency directory entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_depfile(entry.path()) {
                continue;
            }

            match parse_depfile(entry.path()) {
                Ok(Some(record)) => {
                    if graph.edges.contains_key(&record.target) {
                        debug!(
                            target = %record.target,
                            file = %entry.path().display(),
                            "Overwriting previously declared target"
                        );
                    }
                    graph.insert(record);
                }
                Ok(None) => {
                    skipped += 1;
                    debug!(file = %entry.path().display(), "Skipping malformed dependency record");
                }
                Err(e) => {
                    skipped += 1;
                    debug!(file = %entry.path().display(), error = %e, "Skipping unreadable dependency record");
                }
            }
        }

        info!(
            dir = %dir.display(),
            targets = graph.len(),
            edges = graph.edge_count(),
            skipped,
            "Built dependency graph"
        );

        Ok(graph)
    }

    /// Build a graph from in-memory records; later records overwrite earlier
    /// ones with the same target.
    pub fn from_records(records: impl IntoIterator<Item = DependencyRecord>) -> Self {
        let mut graph = Self::new();
        for record in records {
            graph.insert(record);
        }
        graph
    }

    /// Insert a record, replacing any previous dependencies of its target.
    pub fn insert(&mut self, record: DependencyRecord) {
        self.edges.insert(record.target, record.dependencies);
    }

    /// Dependencies of a target.
    pub fn get(&self, target: &str) -> Option<&BTreeSet<String>> {
        self.edges.get(target)
    }

    /// All targets in the graph.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }

    /// Iterate over `(target, dependencies)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.edges.iter().map(|(t, d)| (t.as_str(), d))
    }

    /// Number of targets.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no targets.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Total number of `target → dependency` edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    /// Derive the reverse mapping `dependency → {target}`.
    pub fn reverse(&self) -> ReverseGraph {
        ReverseGraph::from_graph(self)
    }
}

/// Mapping `dependency → {target that depends on it}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReverseGraph {
    dependents: BTreeMap<String, BTreeSet<String>>,
}

impl ReverseGraph {
    /// Invert every edge `t → d` of `graph` into `d → t`.
    pub fn from_graph(graph: &DependencyGraph) -> Self {
        let mut dependents: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (target, deps) in graph.iter() {
            for dep in deps {
                dependents
                    .entry(dep.clone())
                    .or_default()
                    .insert(target.to_string());
            }
        }
        Self { dependents }
    }

    /// Targets that directly depend on `path`.
    pub fn dependents(&self, path: &str) -> impl Iterator<Item = &str> {
        self.dependents
            .get(path)
            .into_iter()
            .flat_map(|targets| targets.iter().map(String::as_str))
    }

    /// Number of distinct dependencies with at least one dependent.
    pub fn len(&self) -> usize {
        self.dependents.len()
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.dependents.is_empty()
    }
}

fn is_depfile(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == DEPFILE_EXTENSION)
        .unwrap_or(false)
}
