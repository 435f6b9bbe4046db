//! Request DTOs for operations.
//!
//! Each request type encapsulates all the parameters needed for an operation,
//! making it easy to call from the CLI or programmatically.

use std::path::PathBuf;

use change_impact_core::Language;
use serde::{Deserialize, Serialize};

/// One file to analyze, supplied by the change source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Name reported back in the file report (usually a repo-relative path).
    pub filename: String,

    /// Full source text.
    pub content: String,

    /// Language to analyze the file as.
    pub language: Language,
}

impl AnalyzeRequest {
    /// Create a request for in-memory source text.
    pub fn new(filename: impl Into<String>, content: impl Into<String>, language: Language) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            language,
        }
    }
}

/// An ordered batch of files to analyze.
///
/// Serialized as a plain JSON array of [`AnalyzeRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalyzeBatchRequest {
    /// Files in report order.
    pub files: Vec<AnalyzeRequest>,
}

impl AnalyzeBatchRequest {
    /// Create a batch from a list of files.
    pub fn new(files: Vec<AnalyzeRequest>) -> Self {
        Self { files }
    }

    /// Append a file.
    pub fn with_file(mut self, file: AnalyzeRequest) -> Self {
        self.files.push(file);
        self
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Request to compute the files affected by a change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffectedRequest {
    /// Paths known to have changed, as they appear in the dependency records.
    pub changed_files: Vec<String>,

    /// Directory holding the `*.d` dependency records.
    pub dependency_dir: PathBuf,
}

impl AffectedRequest {
    /// Create an affected-files request.
    pub fn new(
        changed_files: impl IntoIterator<Item = impl Into<String>>,
        dependency_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            changed_files: changed_files.into_iter().map(Into::into).collect(),
            dependency_dir: dependency_dir.into(),
        }
    }
}

/// Request to analyze every source impacted by a change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactScanRequest {
    /// Paths known to have changed.
    pub changed_files: Vec<String>,

    /// Directory holding the `*.d` dependency records.
    pub dependency_dir: PathBuf,

    /// Directory that relative source paths are resolved against.
    #[serde(default = "default_source_root")]
    pub source_root: PathBuf,
}

fn default_source_root() -> PathBuf {
    PathBuf::from(".")
}

impl ImpactScanRequest {
    /// Create an impact-scan request resolving sources against `.`.
    pub fn new(
        changed_files: impl IntoIterator<Item = impl Into<String>>,
        dependency_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            changed_files: changed_files.into_iter().map(Into::into).collect(),
            dependency_dir: dependency_dir.into(),
            source_root: default_source_root(),
        }
    }

    /// Resolve sources against another directory.
    pub fn with_source_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.source_root = root.into();
        self
    }

    /// The affected-files part of this request.
    pub fn affected_request(&self) -> AffectedRequest {
        AffectedRequest {
            changed_files: self.changed_files.clone(),
            dependency_dir: self.dependency_dir.clone(),
        }
    }
}
