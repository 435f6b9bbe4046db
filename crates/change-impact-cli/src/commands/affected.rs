//! Affected command implementation.

use std::path::PathBuf;

use anyhow::Result;
use change_impact_ops::{AffectedRequest, OpsContext};

use super::print_json;

/// Print every path affected by `changed`.
pub fn execute(ctx: &OpsContext, deps: PathBuf, changed: Vec<String>, json: bool) -> Result<()> {
    let response = ctx.affected(AffectedRequest::new(changed, deps))?;

    if json {
        return print_json(&response);
    }

    for path in &response.affected_files {
        println!("{}", path);
    }
    Ok(())
}
