//! Errors raised by the process layer.
//!
//! These never escape an adapter; they are folded into a failed
//! [`ScanResult`](crate::ScanResult).

use std::io;

use thiserror::Error;

use crate::types::TIMEOUT_MARKER;

/// Failure to run an external tool to completion.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The process could not be started (missing binary, permissions).
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Reading the process output or exit status failed.
    #[error("failed to wait for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The process exceeded its time budget and was killed.
    #[error("{program} timed out after {millis}ms")]
    Timeout { program: String, millis: u64 },
}

impl ToolError {
    /// Whether this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ToolError::Timeout { .. })
    }

    /// Text placed in a failed result's `output`.
    pub fn failure_output(&self) -> String {
        if self.is_timeout() {
            format!("{} {}", TIMEOUT_MARKER, self)
        } else {
            self.to_string()
        }
    }
}
