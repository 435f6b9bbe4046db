//! clang-tidy adapter (semantic linter).

use std::sync::OnceLock;
use std::time::Duration;

use change_impact_core::Language;
use regex::Regex;
use tracing::{debug, warn};

use crate::platform::SystemIncludes;
use crate::process::{run_tool, ToolCommand, ToolOutput};
use crate::types::{Issue, ScanRequest, ScanResult};

/// Runs clang-tidy with the default check set on a single file.
#[derive(Debug, Clone)]
pub struct ClangTidyScanner {
    command: ToolCommand,
    timeout: Duration,
    includes: SystemIncludes,
}

impl ClangTidyScanner {
    /// Tool identifier used in reports.
    pub const TOOL: &'static str = "clang-tidy";

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

    /// Argument list for one invocation. Compiler flags follow `--`.
    pub fn args(request: &ScanRequest, includes: &SystemIncludes) -> Vec<String> {
        let std = match request.language {
            Language::C => "-std=c11",
            Language::Cpp => "-std=c++17",
        };
        let mut args = vec![request.path_arg(), "--".to_string(), std.to_string()];
        args.extend(includes.clang_flags());
        args
    }

    /// Run clang-tidy against `request.file_path`.
    pub async fn execute(&self, request: &ScanRequest) -> ScanResult {
        let args = Self::args(request, &self.includes);

        match run_tool(&self.command, &args, self.timeout).await {
            Ok(output) if output.success() => {
                let combined = output.combined();
                let issues = parse_issues(&combined);
                debug!(tool = Self::TOOL, file = %request.path().display(), issues = issues.len(), "clang-tidy passed");
                ScanResult {
                    tool: Self::TOOL.to_string(),
                    success: true,
                    output: combined,
                    issues,
                }
            }
            Ok(output) => {
                debug!(
                    tool = Self::TOOL,
                    file = %request.path().display(),
                    exit = %output.exit_description(),
                    "clang-tidy reported failure"
                );
                ScanResult {
                    tool: Self::TOOL.to_string(),
                    success: false,
                    output: failure_output(&output),
                    issues: parse_issues(&output.combined()),
                }
            }
            Err(e) => {
                warn!(tool = Self::TOOL, file = %request.path().display(), error = %e, "clang-tidy failed to run");
                ScanResult::failure(Self::TOOL, e.failure_output())
            }
        }
    }
}

/// Failure text: stdout if present, else stderr, else the exit status.
fn failure_output(output: &ToolOutput) -> String {
    if !output.stdout.trim().is_empty() {
        output.stdout.clone()
    } else if !output.stderr.trim().is_empty() {
        output.stderr.clone()
    } else {
        format!("clang-tidy failed with {}", output.exit_description())
    }
}

fn issue_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(.*?):(\d+):(\d+):\s+(error|warning|note):\s+(.*?)\s+\[([\w.,-]+)\]\s*$")
            .expect("clang-tidy issue pattern is valid")
    })
}

/// Parse `file:line:column: severity: message [check-name]` lines.
pub(crate) fn parse_issues(output: &str) -> Vec<Issue> {
    output
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
