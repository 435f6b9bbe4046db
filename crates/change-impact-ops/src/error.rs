//! Error types for the operations layer.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for operations.
pub type OpsResult<T> = Result<T, OpsError>;

/// Errors that can occur during operations.
///
/// Scanner problems never show up here; they are reported inside each
/// file's `ScanResult`. Only failures that prevent staging a file at all
/// abort an operation.
#[derive(Debug, Error)]
pub enum OpsError {
    /// The dependency record directory does not exist.
    #[error("No dependency directory found at {path}")]
    DependencyDirNotFound { path: PathBuf },

    /// A temporary artifact could not be written.
    #[error("Failed to write analysis artifact {path}: {source}")]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source file selected for analysis could not be read.
    #[error("Failed to read source file {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl OpsError {
    /// Create an artifact write error.
    pub fn artifact_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ArtifactWrite {
            path: path.into(),
            source,
        }
    }

    /// The file path this error is about, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::DependencyDirNotFound { path }
            | Self::ArtifactWrite { path, .. }
            | Self::SourceRead { path, .. } => Some(path),
            _ => None,
        }
    }
}
