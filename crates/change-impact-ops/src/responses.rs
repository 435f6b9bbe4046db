//! Response DTOs for operations.
//!
//! Each response type contains all the data produced by an operation,
//! making it easy to consume from the CLI or programmatically.

use std::collections::BTreeMap;

use change_impact_scanners::ScanResult;
use serde::{Deserialize, Serialize};

/// Response from an affected-files query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffectedResponse {
    /// Every affected path, sorted. Order carries no meaning.
    pub affected_files: Vec<String>,

    /// Number of distinct changed paths.
    pub changed_count: usize,

    /// Number of targets in the dependency graph.
    pub target_count: usize,
}

/// Results of all analyzers for one file.
///
/// Serialized as `{"file": ..., "<tool>": {...}, ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    /// The caller's filename.
    pub file: String,

    /// Results keyed by tool identifier.
    #[serde(flatten)]
    pub results: BTreeMap<String, ScanResult>,
}

impl FileReport {
    /// Result of one tool, if it ran.
    pub fn result(&self, tool: &str) -> Option<&ScanResult> {
        self.results.get(tool)
    }

    /// Whether every tool reported success.
    pub fn passed(&self) -> bool {
        self.results.values().all(|r| r.success)
    }

    /// Tools that reported failure.
    pub fn failed_tools(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|(_, r)| !r.success)
            .map(|(tool, _)| tool.as_str())
            .collect()
    }

    /// Total number of structured issues across tools.
    pub fn issue_count(&self) -> usize {
        self.results.values().map(|r| r.issues.len()).sum()
    }
}

/// Per-file reports in the order the files were requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisReport {
    /// One entry per requested file.
    pub files: Vec<FileReport>,
}

impl AnalysisReport {
    /// Wrap a list of file reports.
    pub fn new(files: Vec<FileReport>) -> Self {
        Self { files }
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no files were analyzed.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate over file reports.
    pub fn iter(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter()
    }

    /// Report for a given filename.
    pub fn file(&self, name: &str) -> Option<&FileReport> {
        self.files.iter().find(|f| f.file == name)
    }

    /// Whether every tool passed on every file.
    pub fn all_passed(&self) -> bool {
        self.files.iter().all(FileReport::passed)
    }

    /// Aggregate counts.
    pub fn summary(&self) -> ReportSummary {
        let mut tool_failures: BTreeMap<String, usize> = BTreeMap::new();
        for file in &self.files {
            for tool in file.failed_tools() {
                *tool_failures.entry(tool.to_string()).or_default() += 1;
            }
        }

        let passed_files = self.files.iter().filter(|f| f.passed()).count();
        ReportSummary {
            files: self.files.len(),
            passed_files,
            failed_files: self.files.len() - passed_files,
            issues: self.files.iter().map(FileReport::issue_count).sum(),
            tool_failures,
        }
    }
}

/// Aggregate counts over an [`AnalysisReport`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Files analyzed.
    pub files: usize,
    /// Files on which every tool passed.
    pub passed_files: usize,
    /// Files with at least one failing tool.
    pub failed_files: usize,
    /// Structured issues across all files and tools.
    pub issues: usize,
    /// Failing-file count per tool.
    #[serde(default)]
    pub tool_failures: BTreeMap<String, usize>,
}

/// Response from a batch analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Per-file results in request order.
    pub report: AnalysisReport,

    /// Aggregate counts.
    pub summary: ReportSummary,

    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Response from an impact scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactScanResponse {
    /// Every affected path, sorted.
    pub affected_files: Vec<String>,

    /// Sources that were analyzed, in report order.
    pub analyzed_files: Vec<String>,

    /// Affected sources that were not found under the source root.
    #[serde(default)]
    pub missing_files: Vec<String>,

    /// Per-file results.
    pub report: AnalysisReport,

    /// Aggregate counts.
    pub summary: ReportSummary,
}
