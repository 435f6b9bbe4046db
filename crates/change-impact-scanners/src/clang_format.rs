//! clang-format adapter (formatting checker).
//!
//! Two phases: a `--dry-run --Werror` check decides compliance, then a
//! plain run produces the reformatted text for the report.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::ToolError;
use crate::process::{run_tool, ToolCommand, ToolOutput};
use crate::types::{Issue, ScanRequest, ScanResult};

/// Message attached to a non-compliant file.
const STYLE_MISMATCH: &str =
    "[clang-format] code style does not match; reformat the file with clang-format";

/// Prefix of the output when clang-format itself failed.
const EXECUTION_ERROR: &str = "[clang-format] execution error:";

/// Outcome of the dry-run phase.
#[derive(Debug)]
enum Compliance {
    Compliant,
    NonCompliant,
}

/// Checks formatting and captures the reformatted source.
#[derive(Debug, Clone)]
pub struct ClangFormatScanner {
    command: ToolCommand,
    timeout: Duration,
}

impl ClangFormatScanner {
    /// Tool identifier used in reports.
    pub const TOOL: &'static str = "clang-format";

    /// Create the adapter.
    pub fn new(command: ToolCommand, timeout: Duration) -> Self {
        Self { command, timeout }
    }

    /// Arguments of the dry-run phase.
    pub fn check_args(request: &ScanRequest) -> Vec<String> {
        vec![
            "--dry-run".to_string(),
            "--Werror".to_string(),
            request.path_arg(),
        ]
    }

    /// Arguments of the reformat phase.
    pub fn format_args(request: &ScanRequest) -> Vec<String> {
        vec![request.path_arg()]
    }

    /// Check and reformat `request.file_path`.
    pub async fn execute(&self, request: &ScanRequest) -> ScanResult {
        let compliance = match self.check(request).await {
            Ok(compliance) => compliance,
            Err(reason) => {
                warn!(tool = Self::TOOL, file = %request.path().display(), "clang-format check failed");
                return ScanResult::failure(Self::TOOL, reason);
            }
        };

        let mut issues = Vec::new();
        if let Compliance::NonCompliant = compliance {
            issues.push(Issue {
                file: request.path_arg(),
                line: 0,
                column: 0,
                severity: "style".to_string(),
                message: STYLE_MISMATCH.to_string(),
                checker: Self::TOOL.to_string(),
            });
        }

        let output = match run_tool(&self.command, &Self::format_args(request), self.timeout).await {
            Ok(formatted) if formatted.success() => formatted.stdout,
            Ok(formatted) => execution_error(&formatted),
            Err(e) => e.failure_output(),
        };

        let success = matches!(compliance, Compliance::Compliant);
        debug!(tool = Self::TOOL, file = %request.path().display(), success, "clang-format finished");

        ScanResult {
            tool: Self::TOOL.to_string(),
            success,
            output,
            issues,
        }
    }

    /// Dry-run phase. `Err` carries the failure text for the result.
    async fn check(&self, request: &ScanRequest) -> Result<Compliance, String> {
        match run_tool(&self.command, &Self::check_args(request), self.timeout).await {
            Ok(output) => match output.exit_code {
                Some(0) => Ok(Compliance::Compliant),
                Some(1) => Ok(Compliance::NonCompliant),
                _ => Err(execution_error(&output)),
            },
            Err(e @ ToolError::Timeout { .. }) => Err(e.failure_output()),
            Err(e) => Err(format!("{}\n{}", EXECUTION_ERROR, e)),
        }
    }
}

fn execution_error(output: &ToolOutput) -> String {
    let mut text = EXECUTION_ERROR.to_string();
    if !output.stdout.is_empty() {
        text.push('\n');
        text.push_str(&output.stdout);
    }
    if !output.stderr.is_empty() {
        text.push('\n');
        text.push_str(&output.stderr);
    }
    text.push('\n');
    text.push_str(&output.exit_description());
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use change_impact_core::Language;

    #[test]
    fn test_phase_args() {
        let request = ScanRequest::new("/tmp/a.c", Language::C);
        assert_eq!(
            ClangFormatScanner::check_args(&request),
            vec!["--dry-run", "--Werror", "/tmp/a.c"]
        );
        assert_eq!(ClangFormatScanner::format_args(&request), vec!["/tmp/a.c"]);
    }

    #[test]
    fn test_execution_error_text() {
        let output = ToolOutput {
            exit_code: Some(2),
            stdout: String::new(),
            stderr: "error: unknown argument".into(),
            duration: Duration::from_millis(1),
        };
        let text = execution_error(&output);
        assert!(text.starts_with(EXECUTION_ERROR));
        assert!(text.contains("unknown argument"));
        assert!(text.ends_with("exit code 2"));
    }
}
