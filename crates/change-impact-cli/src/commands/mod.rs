//! CLI command implementations.

pub mod affected;
pub mod analyze;
pub mod config;
pub mod scan;

use anyhow::Result;
use serde::Serialize;

/// Pretty-print a response as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
