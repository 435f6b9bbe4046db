//! Change-Impact Operations Layer
//!
//! This crate provides a clean, typed API for all change-impact operations.
//! It is consumed by the CLI and can be embedded in CI services.
//!
//! ## Architecture
//!
//! - **Requests**: Typed input DTOs for each operation
//! - **Responses**: Typed output DTOs with all relevant data
//! - **OpsContext**: The main service that executes operations
//! - **Orchestrator**: Stages sources as temporary artifacts and runs every
//!   scanner on them
//!
//! ## Usage
//!
//! ```rust,no_run
//! use change_impact_ops::{Config, ImpactScanRequest, OpsContext, OpsResult};
//!
//! #[tokio::main]
//! async fn main() -> OpsResult<()> {
//!     let ctx = OpsContext::new(Config::load()?);
//!
//!     let request = ImpactScanRequest::new(["include/defs.h"], "build");
//!     let response = ctx.impact_scan(request).await?;
//!
//!     println!("Analyzed {} files", response.analyzed_files.len());
//!     Ok(())
//! }
//! ```

mod artifact;
mod config;
mod context;
mod error;
mod orchestrator;
mod requests;
mod responses;

// Re-export public API
pub use artifact::{artifact_name, sanitize_filename, Artifact};
pub use config::Config;
pub use context::OpsContext;
pub use error::{OpsError, OpsResult};
pub use orchestrator::Orchestrator;
pub use requests::*;
pub use responses::*;
