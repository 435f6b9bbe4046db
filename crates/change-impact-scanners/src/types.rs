//! Scan request and result types.

use std::path::{Path, PathBuf};

use change_impact_core::Language;
use serde::{Deserialize, Serialize};

/// Prefix of the `output` of a result whose tool was killed on timeout.
pub const TIMEOUT_MARKER: &str = "[timeout]";

/// Input to one adapter invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    /// File to analyze.
    pub file_path: PathBuf,
    /// Language the file is analyzed as.
    pub language: Language,
}

impl ScanRequest {
    /// Create a request for a file.
    pub fn new(file_path: impl Into<PathBuf>, language: Language) -> Self {
        Self {
            file_path: file_path.into(),
            language,
        }
    }

    /// The file path as a single argument string.
    pub fn path_arg(&self) -> String {
        self.file_path.display().to_string()
    }

    /// Borrow the file path.
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

/// One structured finding extracted from a tool report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// File as reported by the tool.
    pub file: String,
    /// 1-based line (0 when the finding is file-wide).
    pub line: u32,
    /// 1-based column (0 when unknown).
    pub column: u32,
    /// Tool-specific severity (`error`, `warning`, `style`, ...).
    pub severity: String,
    /// Human-readable message.
    pub message: String,
    /// Checker identifier (`nullPointer`, `bugprone-*`, ...).
    pub checker: String,
}

/// Normalized outcome of one tool on one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Tool identifier.
    pub tool: String,
    /// Whether the tool considers the file clean.
    pub success: bool,
    /// Tool output (filtered report, reformatted text or failure reason).
    pub output: String,
    /// Structured findings, in report order.
    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl ScanResult {
    /// A failed result with no structured findings.
    pub fn failure(tool: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            success: false,
            output: output.into(),
            issues: Vec::new(),
        }
    }

    /// Whether this result came from a tool killed on timeout.
    pub fn timed_out(&self) -> bool {
        !self.success && self.output.starts_with(TIMEOUT_MARKER)
    }
}
