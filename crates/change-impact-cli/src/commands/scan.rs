//! Scan command implementation.
//!
//! Computes the affected set and analyzes the affected sources in one go.

use std::path::PathBuf;

use anyhow::Result;
use change_impact_ops::{ImpactScanRequest, OpsContext};

use super::analyze::{print_report, print_summary};
use super::print_json;

/// Analyze every source affected by `changed`. Returns whether everything passed.
pub async fn execute(
    ctx: &OpsContext,
    deps: PathBuf,
    root: PathBuf,
    changed: Vec<String>,
    json: bool,
) -> Result<bool> {
    let request = ImpactScanRequest::new(changed, deps).with_source_root(root);
    let response = ctx.impact_scan(request).await?;

    if json {
        print_json(&response)?;
        return Ok(response.report.all_passed());
    }

    println!("🔍 Affected:  {} paths", response.affected_files.len());
    println!("📄 Analyzed:  {} sources", response.analyzed_files.len());
    if !response.missing_files.is_empty() {
        println!("⚠️  Missing:   {}", response.missing_files.join(", "));
    }
    println!();

    if response.report.is_empty() {
        println!("No affected sources to analyze");
    } else {
        print_report(&response.report);
        print_summary(&response.summary);
    }

    Ok(response.report.all_passed())
}
