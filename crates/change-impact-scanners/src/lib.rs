//! Static-analysis scanner adapters.
//!
//! Each adapter wraps one external analyzer behind the [`Scanner`] trait:
//!
//! - [`CppcheckScanner`]: defect checker, issues parsed from its report
//! - [`ClangTidyScanner`]: semantic linter
//! - [`ClangFormatScanner`]: formatting checker (dry run, then reformat)
//!
//! Adapters never fail. Spawn errors, non-zero exits and timeouts all come
//! back as a [`ScanResult`] with `success == false`.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use change_impact_core::Language;
//! use change_impact_scanners::{ScanRequest, Scanner, ScannerKind, ToolCommand, ToolScanner};
//!
//! # async fn run() {
//! let scanner = ToolScanner::new(
//!     ScannerKind::Cppcheck,
//!     ToolCommand::new("cppcheck"),
//!     Duration::from_secs(30),
//! );
//! let result = scanner.execute(&ScanRequest::new("main.c", Language::C)).await;
//! println!("{}: {}", result.tool, result.success);
//! # }
//! ```

mod clang_format;
mod clang_tidy;
mod cppcheck;
mod error;
mod platform;
mod process;
mod scanner;
mod types;

pub use clang_format::ClangFormatScanner;
pub use clang_tidy::ClangTidyScanner;
pub use cppcheck::CppcheckScanner;
pub use error::ToolError;
pub use platform::SystemIncludes;
pub use process::{run_tool, ToolCommand, ToolOutput};
pub use scanner::{Scanner, ScannerKind, ToolScanner};
pub use types::{Issue, ScanRequest, ScanResult, TIMEOUT_MARKER};
