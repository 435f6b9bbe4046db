//! Temporary on-disk copies of in-memory sources.
//!
//! The analyzers only read files, so every submitted source is staged as an
//! [`Artifact`] for the duration of its analysis. The file is removed when
//! the artifact is dropped, including on early return, panic or when the
//! owning future is cancelled.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{OpsError, OpsResult};

/// A uniquely named temporary file, deleted on drop.
#[derive(Debug)]
pub struct Artifact {
    path: PathBuf,
}

impl Artifact {
    /// Write `content` to a fresh file in `dir`.
    ///
    /// The name embeds a timestamp and a random token followed by the
    /// sanitized `filename`, so the extension (and with it the language
    /// detection of the tools) is preserved.
    pub async fn create(dir: &Path, filename: &str, content: &str) -> OpsResult<Self> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| OpsError::artifact_write(dir, e))?;

        // Guard first, so a partial write is cleaned up too.
        let artifact = Self {
            path: dir.join(artifact_name(filename)),
        };

        tokio::fs::write(&artifact.path, content)
            .await
            .map_err(|e| OpsError::artifact_write(&artifact.path, e))?;

        debug!(path = %artifact.path.display(), bytes = content.len(), "Staged artifact");
        Ok(artifact)
    }

    /// Location of the staged file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Artifact {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed artifact"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Artifact already gone");
            }
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove artifact"),
        }
    }
}

/// Make a caller-supplied filename safe to use as a single path component.
pub fn sanitize_filename(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '_' | '-' => c,
            _ => '_',
        })
        .collect();

    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        "source".to_string()
    } else {
        sanitized
    }
}

/// Unique artifact filename for `filename`.
pub fn artifact_name(filename: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let token = Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}", millis, &token[..8], sanitize_filename(filename))
}
