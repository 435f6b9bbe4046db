//! Host system header locations passed to the analyzers.

use std::time::Duration;

use tracing::debug;

use crate::process::{run_tool, ToolCommand};

/// Generic system include directory on non-macOS hosts.
const GENERIC_INCLUDE_DIR: &str = "/usr/include";

/// Where the host keeps its system headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemIncludes {
    /// macOS platform SDK root (output of `xcrun --show-sdk-path`).
    Sdk(String),
    /// Plain `/usr/include`.
    Generic,
}

impl SystemIncludes {
    /// Detect the include location for the current host.
    ///
    /// On macOS this asks `xcrun` for the SDK path and falls back to the
    /// generic layout if that fails.
    pub async fn detect(timeout: Duration) -> Self {
        if !cfg!(target_os = "macos") {
            return SystemIncludes::Generic;
        }

        let xcrun = ToolCommand::new("xcrun");
        match run_tool(&xcrun, &["--show-sdk-path".to_string()], timeout).await {
            Ok(output) if output.success() && !output.stdout.trim().is_empty() => {
                SystemIncludes::Sdk(output.stdout.trim().to_string())
            }
            Ok(output) => {
                debug!(exit = %output.exit_description(), "xcrun did not report an SDK path");
                SystemIncludes::Generic
            }
            Err(e) => {
                debug!(error = %e, "xcrun unavailable");
                SystemIncludes::Generic
            }
        }
    }

    /// The SDK root, if any.
    pub fn sdk_path(&self) -> Option<&str> {
        match self {
            SystemIncludes::Sdk(path) => Some(path),
            SystemIncludes::Generic => None,
        }
    }

    /// The directory holding the system headers.
    pub fn include_dir(&self) -> String {
        match self {
            SystemIncludes::Sdk(path) => format!("{}/usr/include", path),
            SystemIncludes::Generic => GENERIC_INCLUDE_DIR.to_string(),
        }
    }

    /// Flags for clang-based tools: `-isysroot` plus include paths.
    pub fn clang_flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        if let SystemIncludes::Sdk(path) = self {
            flags.push("-isysroot".to_string());
            flags.push(path.clone());
            flags.push("-I".to_string());
            flags.push(self.include_dir());
        }
        flags.push("-I".to_string());
        flags.push(GENERIC_INCLUDE_DIR.to_string());
        flags
    }
}
