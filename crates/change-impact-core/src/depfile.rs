//! Parsing of make-style dependency records.
//!
//! A record looks like `main.o: main.c defs.h utils.h`, possibly spread over
//! several lines with a trailing backslash:
//!
//! ```text
//! utils.o: utils.c \
//!   utils.h defs.h
//! ```

use std::collections::BTreeSet;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// One parsed dependency rule: a build target and the paths it depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    /// Left-hand side of the rule (usually an object file).
    pub target: String,
    /// Paths the target depends on. Never empty for a parsed record.
    pub dependencies: BTreeSet<String>,
}

impl DependencyRecord {
    /// Create a record from a target and its dependencies.
    pub fn new(
        target: impl Into<String>,
        dependencies: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            target: target.into(),
            dependencies: dependencies.into_iter().map(Into::into).collect(),
        }
    }
}

/// Replace every backslash-newline continuation with a single space.
pub fn fold_continuations(text: &str) -> String {
    text.replace("\\\r\n", " ").replace("\\\n", " ")
}

/// Parse the text of a dependency record.
///
/// The rule is split at the first colon only, so dependency paths that
/// contain colons (`C:/include/defs.h`) survive intact. Returns `None` when
/// the target or the dependency list is missing.
pub fn parse_depfile_str(text: &str) -> Option<DependencyRecord> {
    let folded = fold_continuations(text);
    let (target, deps) = folded.split_once(':')?;

    let target = target.trim();
    if target.is_empty() {
        return None;
    }

    let dependencies: BTreeSet<String> = deps.split_whitespace().map(str::to_string).collect();
    if dependencies.is_empty() {
        return None;
    }

    Some(DependencyRecord {
        target: target.to_string(),
        dependencies,
    })
}

/// Read and parse a dependency record file.
pub fn parse_depfile(path: &Path) -> io::Result<Option<DependencyRecord>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(parse_depfile_str(&contents))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deps(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_simple_rule() {
        let record = parse_depfile_str("main.o: main.c defs.h utils.h").unwrap();
        assert_eq!(record.target, "main.o");
        assert_eq!(record.dependencies, deps(&["main.c", "defs.h", "utils.h"]));
    }

    #[test]
    fn test_parse_line_continuations() {
        let text = "utils.o: utils.c \\\n  utils.h \\\n  defs.h\n";
        let record = parse_depfile_str(text).unwrap();
        assert_eq!(record.target, "utils.o");
        assert_eq!(record.dependencies, deps(&["utils.c", "utils.h", "defs.h"]));
    }

    #[test]
    fn test_parse_crlf_continuations() {
        let text = "a.o: a.c \\\r\n b.h\r\n";
        let record = parse_depfile_str(text).unwrap();
        assert_eq!(record.dependencies, deps(&["a.c", "b.h"]));
    }

    #[test]
    fn test_split_only_on_first_colon() {
        let record = parse_depfile_str("main.o: C:/src/main.c D:/inc/defs.h").unwrap();
        assert_eq!(record.target, "main.o");
        assert_eq!(
            record.dependencies,
            deps(&["C:/src/main.c", "D:/inc/defs.h"])
        );
    }

    #[test]
    fn test_missing_colon_is_rejected() {
        assert!(parse_depfile_str("main.o main.c").is_none());
    }

    #[test]
    fn test_empty_sides_are_rejected() {
        assert!(parse_depfile_str(": main.c").is_none());
        assert!(parse_depfile_str("main.o:").is_none());
        assert!(parse_depfile_str("main.o:   \n").is_none());
        assert!(parse_depfile_str("").is_none());
    }

    #[test]
    fn test_duplicate_dependencies_collapse() {
        let record = parse_depfile_str("x.o: x.c x.h x.h").unwrap();
        assert_eq!(record.dependencies.len(), 2);
    }
}
