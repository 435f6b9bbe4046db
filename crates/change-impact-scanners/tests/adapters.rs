//! Adapter behavior against scripted stand-ins for the real analyzers.
//!
//! Each fake tool is a small shell script run through `sh`, so these tests
//! only need a POSIX shell, not cppcheck or clang.
//!
//! Run with: `cargo test --package change-impact-scanners --test adapters`

#![cfg(unix)]

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use change_impact_core::Language;
use change_impact_scanners::{
    ClangFormatScanner, ClangTidyScanner, CppcheckScanner, ScanRequest, Scanner, ScannerKind,
    SystemIncludes, ToolCommand, ToolScanner,
};
use tempfile::TempDir;

const TIMEOUT: Duration = Duration::from_secs(10);

/// Shell snippet that stores the last argument (the scanned file) in `$FILE`.
const LAST_ARG: &str = "for a in \"$@\"; do FILE=\"$a\"; done\n";

fn fake_tool(dir: &TempDir, name: &str, body: &str) -> ToolCommand {
    let path = dir.path().join(format!("{}.sh", name));
    fs::write(&path, format!("{}{}", LAST_ARG, body)).unwrap();
    ToolCommand::new("sh").with_prefix_args([path.display().to_string()])
}

fn source_file(dir: &TempDir, language: Language) -> ScanRequest {
    let path: PathBuf = match language {
        Language::C => dir.path().join("main.c"),
        Language::Cpp => dir.path().join("main.cpp"),
    };
    fs::write(&path, "int main(void) { return 0; }\n").unwrap();
    ScanRequest::new(path, language)
}

// =============================================================================
// cppcheck
// =============================================================================

#[tokio::test]
async fn test_cppcheck_clean_file_passes() {
    let dir = TempDir::new().unwrap();
    let cmd = fake_tool(&dir, "cppcheck", "echo \"Checking $FILE ...\"\nexit 0\n");
    let request = source_file(&dir, Language::C);

    let result = CppcheckScanner::new(cmd, TIMEOUT).execute(&request).await;

    assert_eq!(result.tool, "cppcheck");
    assert!(result.success);
    assert!(result.issues.is_empty());
    assert!(!result.output.contains("Checking"));
}

#[tokio::test]
async fn test_cppcheck_error_line_fails_and_is_parsed() {
    let dir = TempDir::new().unwrap();
    let cmd = fake_tool(
        &dir,
        "cppcheck",
        "echo \"Checking $FILE ...\"\n\
         echo \"$FILE:3:5: error: Null pointer dereference: p [nullPointer]\" 1>&2\n\
         exit 0\n",
    );
    let request = source_file(&dir, Language::C);

    let result = CppcheckScanner::new(cmd, TIMEOUT).execute(&request).await;

    assert!(!result.success);
    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].line, 3);
    assert_eq!(result.issues[0].column, 5);
    assert_eq!(result.issues[0].severity, "error");
    assert_eq!(result.issues[0].checker, "nullPointer");
}

#[tokio::test]
async fn test_cppcheck_information_only_passes() {
    let dir = TempDir::new().unwrap();
    let cmd = fake_tool(
        &dir,
        "cppcheck",
        "echo \"$FILE:1:0: information: Limiting analysis of branches. [normalCheckLevelMaxBranches]\" 1>&2\n\
         exit 0\n",
    );
    let request = source_file(&dir, Language::C);

    let result = CppcheckScanner::new(cmd, TIMEOUT).execute(&request).await;

    assert!(result.success);
    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].severity, "information");
}

#[tokio::test]
async fn test_cppcheck_nonzero_exit_without_findings_fails() {
    let dir = TempDir::new().unwrap();
    let cmd = fake_tool(&dir, "cppcheck", "echo \"cppcheck: failed to load config\" 1>&2\nexit 1\n");
    let request = source_file(&dir, Language::C);

    let result = CppcheckScanner::new(cmd, TIMEOUT).execute(&request).await;

    assert!(!result.success);
    assert!(result.issues.is_empty());
    assert!(result.output.contains("failed to load config"));
}

#[tokio::test]
async fn test_cppcheck_timeout_is_marked() {
    let dir = TempDir::new().unwrap();
    let cmd = fake_tool(&dir, "cppcheck", "sleep 10\n");
    let request = source_file(&dir, Language::C);

    let result = CppcheckScanner::new(cmd, Duration::from_millis(300))
        .execute(&request)
        .await;

    assert!(!result.success);
    assert!(result.timed_out());
    assert!(result.output.starts_with("[timeout]"));
}

#[tokio::test]
async fn test_cppcheck_uses_injected_includes() {
    let dir = TempDir::new().unwrap();
    let cmd = fake_tool(&dir, "cppcheck", "echo \"args: $*\"\nexit 0\n");
    let request = source_file(&dir, Language::C);

    let result = CppcheckScanner::new(cmd, TIMEOUT)
        .with_includes(SystemIncludes::Sdk("/sdk/MacOSX.sdk".into()))
        .execute(&request)
        .await;

    assert!(result.success);
    assert!(result.output.contains("-I/sdk/MacOSX.sdk/usr/include"));
}

#[tokio::test]
async fn test_cppcheck_missing_binary_fails() {
    let dir = TempDir::new().unwrap();
    let request = source_file(&dir, Language::C);
    let cmd = ToolCommand::new("change-impact-missing-cppcheck");

    let result = CppcheckScanner::new(cmd, TIMEOUT).execute(&request).await;

    assert!(!result.success);
    assert!(result.issues.is_empty());
    assert!(result.output.contains("failed to start"));
}

// =============================================================================
// clang-tidy
// =============================================================================

#[tokio::test]
async fn test_clang_tidy_success_keeps_combined_output() {
    let dir = TempDir::new().unwrap();
    let cmd = fake_tool(
        &dir,
        "clang-tidy",
        "echo \"$FILE:2:7: warning: variable 'x' is not initialized [cppcoreguidelines-init-variables]\"\n\
         echo \"1 warning generated.\" 1>&2\n\
         exit 0\n",
    );
    let request = source_file(&dir, Language::Cpp);

    let result = ClangTidyScanner::new(cmd, TIMEOUT).execute(&request).await;

    assert_eq!(result.tool, "clang-tidy");
    assert!(result.success);
    assert!(result.output.contains("not initialized"));
    assert!(result.output.contains("1 warning generated."));
    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].checker, "cppcoreguidelines-init-variables");
}

#[tokio::test]
async fn test_clang_tidy_failure_prefers_stdout() {
    let dir = TempDir::new().unwrap();
    let cmd = fake_tool(
        &dir,
        "clang-tidy",
        "echo \"$FILE:1:1: error: unknown type name 'foo' [clang-diagnostic-error]\"\n\
         echo \"Found compiler error(s).\" 1>&2\n\
         exit 1\n",
    );
    let request = source_file(&dir, Language::C);

    let result = ClangTidyScanner::new(cmd, TIMEOUT).execute(&request).await;

    assert!(!result.success);
    assert!(result.output.contains("unknown type name"));
    assert!(!result.output.contains("Found compiler error"));
}

#[tokio::test]
async fn test_clang_tidy_failure_falls_back_to_stderr() {
    let dir = TempDir::new().unwrap();
    let cmd = fake_tool(&dir, "clang-tidy", "echo \"Error while processing\" 1>&2\nexit 1\n");
    let request = source_file(&dir, Language::C);

    let result = ClangTidyScanner::new(cmd, TIMEOUT).execute(&request).await;

    assert!(!result.success);
    assert_eq!(result.output.trim(), "Error while processing");
}

#[tokio::test]
async fn test_clang_tidy_timeout_is_marked() {
    let dir = TempDir::new().unwrap();
    let cmd = fake_tool(&dir, "clang-tidy", "sleep 10\n");
    let request = source_file(&dir, Language::Cpp);

    let result = ClangTidyScanner::new(cmd, Duration::from_millis(300))
        .execute(&request)
        .await;

    assert_eq!(result.tool, "clang-tidy");
    assert!(!result.success);
    assert!(result.timed_out());
    assert!(result.issues.is_empty());
}

#[tokio::test]
async fn test_clang_tidy_passes_sdk_flags() {
    let dir = TempDir::new().unwrap();
    let cmd = fake_tool(&dir, "clang-tidy", "echo \"args: $*\"\nexit 0\n");
    let request = source_file(&dir, Language::C);

    let result = ClangTidyScanner::new(cmd, TIMEOUT)
        .with_includes(SystemIncludes::Sdk("/sdk/MacOSX.sdk".into()))
        .execute(&request)
        .await;

    assert!(result.success);
    assert!(result.output.contains("-- -std=c11 -isysroot /sdk/MacOSX.sdk"));
}

// =============================================================================
// clang-format
// =============================================================================

fn fake_clang_format(dir: &TempDir, check_code: i32) -> ToolCommand {
    fake_tool(
        dir,
        "clang-format",
        &format!(
            "if [ \"$1\" = \"--dry-run\" ]; then\n  echo \"check output\" 1>&2\n  exit {}\nfi\necho \"int main(void) {{ return 0; }}\"\n",
            check_code
        ),
    )
}

#[tokio::test]
async fn test_clang_format_compliant() {
    let dir = TempDir::new().unwrap();
    let request = source_file(&dir, Language::C);

    let result = ClangFormatScanner::new(fake_clang_format(&dir, 0), TIMEOUT)
        .execute(&request)
        .await;

    assert_eq!(result.tool, "clang-format");
    assert!(result.success);
    assert!(result.issues.is_empty());
    assert_eq!(result.output.trim(), "int main(void) { return 0; }");
}

#[tokio::test]
async fn test_clang_format_non_compliant_still_reformats() {
    let dir = TempDir::new().unwrap();
    let request = source_file(&dir, Language::C);

    let result = ClangFormatScanner::new(fake_clang_format(&dir, 1), TIMEOUT)
        .execute(&request)
        .await;

    assert!(!result.success);
    assert_eq!(result.output.trim(), "int main(void) { return 0; }");
    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].severity, "style");
    assert_eq!(result.issues[0].checker, "clang-format");
}

#[tokio::test]
async fn test_clang_format_other_exit_is_tool_error() {
    let dir = TempDir::new().unwrap();
    let request = source_file(&dir, Language::C);

    let result = ClangFormatScanner::new(fake_clang_format(&dir, 3), TIMEOUT)
        .execute(&request)
        .await;

    assert!(!result.success);
    assert!(result.issues.is_empty());
    assert!(result.output.starts_with("[clang-format] execution error:"));
    assert!(result.output.contains("check output"));
    assert!(!result.output.contains("return 0"));
}

#[tokio::test]
async fn test_clang_format_reformat_failure_keeps_check_verdict() {
    let dir = TempDir::new().unwrap();
    let request = source_file(&dir, Language::C);
    let cmd = fake_tool(
        &dir,
        "clang-format",
        "if [ \"$1\" = \"--dry-run\" ]; then exit 0; fi\n\
         echo \"cannot read configuration\" 1>&2\n\
         exit 2\n",
    );

    let result = ClangFormatScanner::new(cmd, TIMEOUT).execute(&request).await;

    assert!(result.success);
    assert!(result.issues.is_empty());
    assert!(result.output.starts_with("[clang-format] execution error:"));
    assert!(result.output.contains("cannot read configuration"));
}

#[tokio::test]
async fn test_clang_format_check_timeout_skips_reformat() {
    let dir = TempDir::new().unwrap();
    let request = source_file(&dir, Language::C);
    let cmd = fake_tool(
        &dir,
        "clang-format",
        "if [ \"$1\" = \"--dry-run\" ]; then sleep 10; fi\n\
         echo \"REFORMATTED\"\n",
    );

    let start = std::time::Instant::now();
    let result = ClangFormatScanner::new(cmd, Duration::from_millis(300))
        .execute(&request)
        .await;

    assert!(!result.success);
    assert!(result.timed_out());
    assert!(result.issues.is_empty());
    assert!(!result.output.contains("REFORMATTED"));
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_clang_format_missing_binary_is_tool_error() {
    let dir = TempDir::new().unwrap();
    let request = source_file(&dir, Language::C);
    let cmd = ToolCommand::new("change-impact-missing-clang-format");

    let result = ClangFormatScanner::new(cmd, TIMEOUT).execute(&request).await;

    assert!(!result.success);
    assert!(!result.timed_out());
    assert!(result.issues.is_empty());
    assert!(result.output.starts_with("[clang-format] execution error:"));
    assert!(result.output.contains("failed to start"));
}

// =============================================================================
// Static dispatch
// =============================================================================

#[tokio::test]
async fn test_tool_scanner_dispatches_to_adapter() {
    let dir = TempDir::new().unwrap();
    let request = source_file(&dir, Language::C);
    let scanner = ToolScanner::new(ScannerKind::ClangFormat, fake_clang_format(&dir, 0), TIMEOUT);

    let result = scanner.execute(&request).await;

    assert_eq!(scanner.tool(), "clang-format");
    assert_eq!(result.tool, "clang-format");
    assert!(result.success);
}
