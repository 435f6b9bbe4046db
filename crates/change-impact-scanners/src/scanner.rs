//! The scanner contract and the built-in adapters.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::clang_format::ClangFormatScanner;
use crate::clang_tidy::ClangTidyScanner;
use crate::cppcheck::CppcheckScanner;
use crate::platform::SystemIncludes;
use crate::process::ToolCommand;
use crate::types::{ScanRequest, ScanResult};

/// Anything that can analyze one file and report a [`ScanResult`].
///
/// Implementations must not fail: every problem is reported through
/// `ScanResult::success == false`.
#[async_trait]
pub trait Scanner: Send + Sync {
    /// Tool identifier, used as the key in file reports.
    fn tool(&self) -> &str;

    /// Analyze the file named by `request`.
    async fn execute(&self, request: &ScanRequest) -> ScanResult;
}

/// The built-in analyzers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScannerKind {
    /// cppcheck defect checker.
    #[serde(rename = "cppcheck")]
    Cppcheck,
    /// clang-tidy semantic linter.
    #[serde(rename = "clang-tidy")]
    ClangTidy,
    /// clang-format formatting checker.
    #[serde(rename = "clang-format")]
    ClangFormat,
}

impl ScannerKind {
    /// All built-in analyzers, in report order.
    pub const ALL: [ScannerKind; 3] = [
        ScannerKind::Cppcheck,
        ScannerKind::ClangTidy,
        ScannerKind::ClangFormat,
    ];

    /// Tool identifier used in reports.
    pub fn tool_name(&self) -> &'static str {
        match self {
            ScannerKind::Cppcheck => CppcheckScanner::TOOL,
            ScannerKind::ClangTidy => ClangTidyScanner::TOOL,
            ScannerKind::ClangFormat => ClangFormatScanner::TOOL,
        }
    }

    /// Default program name.
    pub fn default_program(&self) -> &'static str {
        self.tool_name()
    }
}

impl fmt::Display for ScannerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tool_name())
    }
}

impl std::str::FromStr for ScannerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cppcheck" => Ok(ScannerKind::Cppcheck),
            "clang-tidy" | "clang_tidy" | "clangtidy" => Ok(ScannerKind::ClangTidy),
            "clang-format" | "clang_format" | "clangformat" => Ok(ScannerKind::ClangFormat),
            _ => Err(format!("Unknown tool: {}", s)),
        }
    }
}

/// A built-in adapter, dispatched statically by variant.
#[derive(Debug, Clone)]
pub enum ToolScanner {
    Cppcheck(CppcheckScanner),
    ClangTidy(ClangTidyScanner),
    ClangFormat(ClangFormatScanner),
}

impl ToolScanner {
    /// Build the adapter for `kind`.
    pub fn new(kind: ScannerKind, command: ToolCommand, timeout: Duration) -> Self {
        match kind {
            ScannerKind::Cppcheck => ToolScanner::Cppcheck(CppcheckScanner::new(command, timeout)),
            ScannerKind::ClangTidy => {
                ToolScanner::ClangTidy(ClangTidyScanner::new(command, timeout))
            }
            ScannerKind::ClangFormat => {
                ToolScanner::ClangFormat(ClangFormatScanner::new(command, timeout))
            }
        }
    }

    /// Use the given system header location (ignored by clang-format).
    pub fn with_includes(self, includes: SystemIncludes) -> Self {
        match self {
            ToolScanner::Cppcheck(s) => ToolScanner::Cppcheck(s.with_includes(includes)),
            ToolScanner::ClangTidy(s) => ToolScanner::ClangTidy(s.with_includes(includes)),
            other => other,
        }
    }

    /// System header location passed to the tool, if it takes one.
    pub fn includes(&self) -> Option<&SystemIncludes> {
        match self {
            ToolScanner::Cppcheck(s) => Some(s.includes()),
            ToolScanner::ClangTidy(s) => Some(s.includes()),
            ToolScanner::ClangFormat(_) => None,
        }
    }

    /// Which analyzer this is.
    pub fn kind(&self) -> ScannerKind {
        match self {
            ToolScanner::Cppcheck(_) => ScannerKind::Cppcheck,
            ToolScanner::ClangTidy(_) => ScannerKind::ClangTidy,
            ToolScanner::ClangFormat(_) => ScannerKind::ClangFormat,
        }
    }
}

#[async_trait]
impl Scanner for ToolScanner {
    fn tool(&self) -> &str {
        self.kind().tool_name()
    }

    async fn execute(&self, request: &ScanRequest) -> ScanResult {
        match self {
            ToolScanner::Cppcheck(s) => s.execute(request).await,
            ToolScanner::ClangTidy(s) => s.execute(request).await,
            ToolScanner::ClangFormat(s) => s.execute(request).await,
        }
    }
}
