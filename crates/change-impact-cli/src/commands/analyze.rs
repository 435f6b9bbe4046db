//! Analyze command implementation.
//!
//! Runs the configured analyzers on files from disk or on a JSON batch.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use change_impact_core::Language;
use change_impact_ops::{
    AnalysisReport, AnalyzeBatchRequest, AnalyzeRequest, OpsContext, ReportSummary,
};

use super::print_json;

/// Read a batch request from a JSON file, or stdin for `-`.
pub fn read_batch(path: &Path) -> Result<AnalyzeBatchRequest> {
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read batch request from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read batch request {}", path.display()))?
    };

    serde_json::from_str(&contents).context("Invalid batch request")
}

/// Build a batch request from source files on disk.
pub fn read_files(files: &[PathBuf], language: Option<Language>) -> Result<AnalyzeBatchRequest> {
    let mut request = AnalyzeBatchRequest::default();

    for path in files {
        let language = match language.or_else(|| Language::from_path(path)) {
            Some(language) => language,
            None => anyhow::bail!(
                "Cannot detect the language of {}; pass --language c|cpp",
                path.display()
            ),
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        request = request.with_file(AnalyzeRequest::new(
            path.display().to_string(),
            content,
            language,
        ));
    }

    Ok(request)
}

/// Analyze the batch and print the report. Returns whether everything passed.
pub async fn execute(ctx: &OpsContext, request: AnalyzeBatchRequest, json: bool) -> Result<bool> {
    let response = ctx.analyze(request).await?;

    if json {
        print_json(&response.report)?;
    } else {
        print_report(&response.report);
        print_summary(&response.summary);
        println!("⏱️  {} ms", response.duration_ms);
    }

    Ok(response.report.all_passed())
}

/// Human-readable per-file report.
pub fn print_report(report: &AnalysisReport) {
    for file in report.iter() {
        let mark = if file.passed() { "✅" } else { "❌" };
        println!("{} {}", mark, file.file);

        for (tool, result) in &file.results {
            if result.success {
                println!("   ✓ {}", tool);
                continue;
            }

            if result.timed_out() {
                println!("   ✗ {} (timed out)", tool);
            } else {
                println!("   ✗ {} ({} issues)", tool, result.issues.len());
            }
            for issue in &result.issues {
                println!(
                    "      {}:{}:{}: {}: {} [{}]",
                    file.file, issue.line, issue.column, issue.severity, issue.message, issue.checker
                );
            }
            if result.issues.is_empty() && !result.output.is_empty() {
                for line in result.output.lines().take(10) {
                    println!("      {}", line);
                }
            }
        }
    }
}

/// One-line totals.
pub fn print_summary(summary: &ReportSummary) {
    println!();
    println!("{:─<50}", "");
    println!(
        "📊 {} files: {} passed, {} failed, {} issues",
        summary.files, summary.passed_files, summary.failed_files, summary.issues
    );
    for (tool, failures) in &summary.tool_failures {
        println!("   {}: {} failing", tool, failures);
    }
}
