//! cppcheck adapter (defect checker).

use std::sync::OnceLock;
use std::time::Duration;

use change_impact_core::Language;
use regex::Regex;
use tracing::{debug, warn};

use crate::platform::SystemIncludes;
use crate::process::{run_tool, ToolCommand};
use crate::types::{Issue, ScanRequest, ScanResult};

/// Informational note cppcheck prints when it cannot resolve system headers.
const MISSING_INCLUDE_NOTE: &str = "Cppcheck cannot find all the include files";

/// Runs cppcheck on a single file and parses its report.
#[derive(Debug, Clone)]
pub struct CppcheckScanner {
    command: ToolCommand,
    timeout: Duration,
    includes: SystemIncludes,
}

impl CppcheckScanner {
    /// Tool identifier used in reports.
    pub const TOOL: &'static str = "cppcheck";

    /// Create the adapter.
    ///
    /// System headers default to the generic layout; use
    /// [`with_includes`](Self::with_includes) to pass a detected SDK.
    pub fn new(command: ToolCommand, timeout: Duration) -> Self {
        Self {
            command,
            timeout,
            includes: SystemIncludes::Generic,
        }
    }

    /// Use the given system header location.
    pub fn with_includes(mut self, includes: SystemIncludes) -> Self {
        self.includes = includes;
        self
    }

    /// System header location passed to the tool.
    pub fn includes(&self) -> &SystemIncludes {
        &self.includes
    }

    /// Argument list for one invocation.
    pub fn args(request: &ScanRequest, includes: &SystemIncludes) -> Vec<String> {
        let std = match request.language {
            Language::C => "--std=c11",
            Language::Cpp => "--std=c++17",
        };
        vec![
            "--enable=all".to_string(),
            "--inconclusive".to_string(),
            std.to_string(),
            "--suppress=missingIncludeSystem".to_string(),
            "--suppress=unmatchedSuppression".to_string(),
            "--suppress=checkersReport".to_string(),
            "--force".to_string(),
            format!("-I{}", includes.include_dir()),
            request.path_arg(),
        ]
    }

    /// Run cppcheck against `request.file_path`.
    pub async fn execute(&self, request: &ScanRequest) -> ScanResult {
        let args = Self::args(request, &self.includes);

        let output = match run_tool(&self.command, &args, self.timeout).await {
            Ok(output) => output,
            Err(e) => {
                warn!(tool = Self::TOOL, file = %request.path().display(), error = %e, "cppcheck failed to run");
                return ScanResult::failure(Self::TOOL, e.failure_output());
            }
        };

        let filtered = filter_output(&output.combined());
        let matched = has_blocking_findings(&filtered);
        let issues = parse_issues(&filtered);

        if !output.success() && !matched && issues.is_empty() {
            let message = if filtered.is_empty() {
                format!("cppcheck failed with {}", output.exit_description())
            } else {
                filtered
            };
            return ScanResult::failure(Self::TOOL, message);
        }

        let success = !matched && output.success();
        debug!(
            tool = Self::TOOL,
            file = %request.path().display(),
            issues = issues.len(),
            success,
            "cppcheck finished"
        );

        ScanResult {
            tool: Self::TOOL.to_string(),
            success,
            output: filtered,
            issues,
        }
    }
}

/// Drop progress lines, the missing-include note and blank lines.
pub(crate) fn filter_output(raw: &str) -> String {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !line.starts_with("Checking "))
        .filter(|line| !line.contains(MISSING_INCLUDE_NOTE))
        .collect::<Vec<_>>()
        .join("\n")
}

fn issue_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(.+?):(\d+):(\d+):\s+(style|error|warning|information):\s+(.*?)\s+\[(\w+)\]\s*$")
            .expect("cppcheck issue pattern is valid")
    })
}

fn blocking_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r": (error|warning|performance|portability|style):")
            .expect("cppcheck severity pattern is valid")
    })
}

/// Whether the report contains a finding that fails the check.
pub(crate) fn has_blocking_findings(filtered: &str) -> bool {
    blocking_pattern().is_match(filtered)
}

/// Parse `file:line:column: severity: message [checkerId]` lines.
pub(crate) fn parse_issues(filtered: &str) -> Vec<Issue> {
    filtered
        .lines()
        .filter_map(|line| issue_pattern().captures(line))
        .map(|cap| Issue {
            file: cap[1].to_string(),
            line: cap[2].parse().unwrap_or(0),
            column: cap[3].parse().unwrap_or(0),
            severity: cap[4].to_string(),
            message: cap[5].to_string(),
            checker: cap[6].to_string(),
        })
        .collect()
}
