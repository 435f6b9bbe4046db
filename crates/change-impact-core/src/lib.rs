//! Core domain types for change-impact analysis.
//!
//! Compilers emit make-style dependency records (`*.d` files) next to the
//! objects they build. This crate parses those records into a
//! [`DependencyGraph`], derives the [`ReverseGraph`], and computes the set of
//! files affected by a change.
//!
//! ```rust
//! use change_impact_core::{compute_affected, DependencyGraph, DependencyRecord};
//!
//! let graph = DependencyGraph::from_records([
//!     DependencyRecord::new("main.o", ["main.c", "defs.h"]),
//!     DependencyRecord::new("utils.o", ["utils.c", "defs.h"]),
//! ]);
//!
//! let affected = compute_affected(["defs.h"], &graph);
//! assert!(affected.contains("main.o"));
//! assert!(affected.contains("utils.o"));
//! ```

mod depfile;
mod graph;
mod impact;
mod language;

pub use depfile::{fold_continuations, parse_depfile, parse_depfile_str, DependencyRecord};
pub use graph::{DependencyGraph, ReverseGraph, DEPFILE_EXTENSION};
pub use impact::{compute_affected, source_files, sources_for_targets};
pub use language::Language;
