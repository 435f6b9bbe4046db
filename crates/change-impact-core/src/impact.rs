//! Change-impact analysis over a [`DependencyGraph`].

use std::collections::{BTreeSet, VecDeque};

use tracing::debug;

use crate::graph::DependencyGraph;
use crate::language::Language;

/// Compute every path that directly or transitively depends on a changed
/// path. The result always contains the changed paths themselves.
///
/// Each node is enqueued at most once, so this runs in `O(V + E)` and
/// terminates on cyclic graphs. Only the resulting set is meaningful; the
/// traversal order is not.
pub fn compute_affected<I, S>(changed: I, graph: &DependencyGraph) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let reverse = graph.reverse();

    let mut affected: BTreeSet<String> = BTreeSet::new();
    let mut queue: VecDeque<String> = VecDeque::new();
    for path in changed {
        let path = path.into();
        if affected.insert(path.clone()) {
            queue.push_back(path);
        }
    }
    let changed_count = affected.len();

    while let Some(node) = queue.pop_front() {
        for target in reverse.dependents(&node) {
            if !affected.contains(target) {
                affected.insert(target.to_string());
                queue.push_back(target.to_string());
            }
        }
    }

    debug!(
        changed = changed_count,
        affected = affected.len(),
        "Computed affected set"
    );

    affected
}

/// Keep only C/C++ translation units.
pub fn source_files<'a>(paths: impl IntoIterator<Item = &'a String>) -> BTreeSet<String> {
    paths
        .into_iter()
        .filter(|p| Language::from_path(p.as_str()).is_some())
        .cloned()
        .collect()
}

/// Map object targets to the C/C++ sources listed in their records.
///
/// Targets without a record contribute nothing.
pub fn sources_for_targets<'a>(
    targets: impl IntoIterator<Item = &'a str>,
    graph: &DependencyGraph,
) -> BTreeSet<String> {
    targets
        .into_iter()
        .filter_map(|t| graph.get(t))
        .flat_map(|deps| source_files(deps))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depfile::DependencyRecord;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample_graph() -> DependencyGraph {
        DependencyGraph::from_records([
            DependencyRecord::new("utils.o", ["utils.c", "utils.h", "defs.h"]),
            DependencyRecord::new("main.o", ["main.c", "defs.h", "utils.h"]),
        ])
    }

    #[test]
    fn test_shared_header_affects_both_objects() {
        let affected = compute_affected(["defs.h"], &sample_graph());
        assert_eq!(affected, set(&["defs.h", "main.o", "utils.o"]));
    }

    #[test]
    fn test_single_source_affects_its_object() {
        let affected = compute_affected(["main.c"], &sample_graph());
        assert_eq!(affected, set(&["main.c", "main.o"]));
    }

    #[test]
    fn test_unknown_path_affects_only_itself() {
        let affected = compute_affected(["README.md"], &sample_graph());
        assert_eq!(affected, set(&["README.md"]));
    }

    #[test]
    fn test_empty_change_set() {
        let affected = compute_affected(Vec::<String>::new(), &sample_graph());
        assert!(affected.is_empty());
    }

    #[test]
    fn test_cycle_terminates() {
        let graph = DependencyGraph::from_records([
            DependencyRecord::new("A", ["B"]),
            DependencyRecord::new("B", ["A"]),
        ]);
        assert_eq!(compute_affected(["A"], &graph), set(&["A", "B"]));
    }

    #[test]
    fn test_transitive_chain() {
        let graph = DependencyGraph::from_records([
            DependencyRecord::new("app", ["libfoo.a"]),
            DependencyRecord::new("libfoo.a", ["foo.o"]),
            DependencyRecord::new("foo.o", ["foo.c", "foo.h"]),
        ]);
        assert_eq!(
            compute_affected(["foo.h"], &graph),
            set(&["foo.h", "foo.o", "libfoo.a", "app"])
        );
    }

    #[test]
    fn test_superset_and_idempotent() {
        let graph = sample_graph();
        let cases: &[&[&str]] = &[
            &["defs.h"],
            &["main.c"],
            &["utils.h"],
            &["main.c", "utils.h"],
            &["nothing"],
        ];
        for changed in cases {
            let once = compute_affected(changed.iter().copied(), &graph);
            for c in changed.iter() {
                assert!(once.contains(*c));
            }
            let twice = compute_affected(once.iter().cloned(), &graph);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_source_files_filter() {
        let paths = set(&["main.c", "defs.h", "main.o", "foo.cpp"]);
        assert_eq!(source_files(&paths), set(&["main.c", "foo.cpp"]));
    }

    #[test]
    fn test_sources_for_targets() {
        let graph = sample_graph();
        let sources = sources_for_targets(["main.o", "utils.o", "missing.o"], &graph);
        assert_eq!(sources, set(&["main.c", "utils.c"]));
    }
}
