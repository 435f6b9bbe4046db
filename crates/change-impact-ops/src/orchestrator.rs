//! Batch analysis: stage each file, run every scanner on it, collect reports.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use change_impact_scanners::{ScanRequest, Scanner};
use futures::future::join_all;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

use crate::artifact::Artifact;
use crate::error::OpsResult;
use crate::requests::AnalyzeRequest;
use crate::responses::{AnalysisReport, FileReport};

/// Runs a fixed set of scanners over batches of in-memory sources.
///
/// Within one file all scanners run concurrently. Files are processed
/// `max_concurrent_files` at a time and reported in input order.
#[derive(Debug, Clone)]
pub struct Orchestrator<S> {
    scanners: Vec<S>,
    artifact_dir: PathBuf,
    max_concurrent_files: usize,
}

impl<S: Scanner> Orchestrator<S> {
    /// Create an orchestrator that stages artifacts in `artifact_dir` and
    /// analyzes one file at a time.
    pub fn new(scanners: Vec<S>, artifact_dir: impl Into<PathBuf>) -> Self {
        Self {
            scanners,
            artifact_dir: artifact_dir.into(),
            max_concurrent_files: 1,
        }
    }

    /// Analyze up to `n` files at once (values below 1 mean 1).
    pub fn with_max_concurrent_files(mut self, n: usize) -> Self {
        self.max_concurrent_files = n.max(1);
        self
    }

    /// The configured scanners, in report order.
    pub fn scanners(&self) -> &[S] {
        &self.scanners
    }

    /// Tool identifiers of the configured scanners.
    pub fn tools(&self) -> Vec<&str> {
        self.scanners.iter().map(|s| s.tool()).collect()
    }

    /// Directory artifacts are staged in.
    pub fn artifact_dir(&self) -> &Path {
        &self.artifact_dir
    }

    /// Analyze every file of the batch.
    ///
    /// Scanner problems are reported per file and never abort the batch.
    /// Failing to stage a file does: the error is returned and any
    /// in-flight artifacts are removed.
    pub async fn analyze_batch(&self, files: &[AnalyzeRequest]) -> OpsResult<AnalysisReport> {
        info!(
            files = files.len(),
            tools = ?self.tools(),
            concurrency = self.max_concurrent_files,
            "Analyzing batch"
        );

        let futures: Vec<_> = files.iter().map(|file| self.analyze_file(file)).collect();
        let reports: Vec<FileReport> = stream::iter(futures)
            .buffered(self.max_concurrent_files)
            .try_collect()
            .await?;

        let report = AnalysisReport::new(reports);
        info!(
            files = report.len(),
            passed = report.all_passed(),
            "Batch analyzed"
        );
        Ok(report)
    }

    /// Analyze a single file with every scanner.
    pub async fn analyze_file(&self, file: &AnalyzeRequest) -> OpsResult<FileReport> {
        let artifact = Artifact::create(&self.artifact_dir, &file.filename, &file.content).await?;
        let request = ScanRequest::new(artifact.path(), file.language);

        let results = join_all(self.scanners.iter().map(|s| s.execute(&request))).await;

        let results: BTreeMap<String, _> = self
            .scanners
            .iter()
            .map(|s| s.tool().to_string())
            .zip(results)
            .collect();

        debug!(
            file = %file.filename,
            failed = results.values().filter(|r| !r.success).count(),
            "File analyzed"
        );

        Ok(FileReport {
            file: file.filename.clone(),
            results,
        })
    }
}
