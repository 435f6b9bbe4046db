//! OpsContext - The main service for executing operations.
//!
//! The OpsContext holds configuration and provides methods for all
//! change-impact operations. It can be used by the CLI or any other consumer.

use std::collections::BTreeSet;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use change_impact_core::{
    compute_affected, source_files, sources_for_targets, DependencyGraph, Language,
};
use change_impact_scanners::{SystemIncludes, ToolScanner};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{OpsError, OpsResult};
use crate::orchestrator::Orchestrator;
use crate::requests::*;
use crate::responses::*;

/// The main operations context.
///
/// Holds configuration and provides methods for all operations.
/// Thread-safe and can be shared across async tasks.
#[derive(Debug, Clone)]
pub struct OpsContext {
    /// Configuration for operations.
    pub config: Config,

    /// System header location, detected on first use and shared by clones.
    includes: Arc<OnceCell<SystemIncludes>>,
}

impl OpsContext {
    /// Create a new OpsContext with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            includes: Arc::new(OnceCell::new()),
        }
    }

    /// Use a known system header location instead of detecting it.
    pub fn with_includes(self, includes: SystemIncludes) -> Self {
        Self {
            includes: Arc::new(OnceCell::new_with(Some(includes))),
            ..self
        }
    }

    /// System header location for the analyzers.
    pub async fn includes(&self) -> &SystemIncludes {
        self.includes
            .get_or_init(|| SystemIncludes::detect(self.config.tool_timeout()))
            .await
    }

    /// Create a new OpsContext with default configuration.
    pub fn default_config() -> OpsResult<Self> {
        Ok(Self::new(Config::load()?))
    }

    /// Orchestrator running the configured analyzers.
    pub async fn orchestrator(&self) -> Orchestrator<ToolScanner> {
        let scanners = self.config.scanners(self.includes().await);
        Orchestrator::new(scanners, &self.config.artifact_dir)
            .with_max_concurrent_files(self.config.max_concurrent_files)
    }

    // =========================================================================
    // Impact Operations
    // =========================================================================

    /// Compute every path affected by the changed files.
    pub fn affected(&self, request: AffectedRequest) -> OpsResult<AffectedResponse> {
        let graph = load_graph(&request.dependency_dir)?;

        let changed: BTreeSet<String> = request.changed_files.into_iter().collect();
        let affected = compute_affected(changed.iter().cloned(), &graph);

        info!(
            changed = changed.len(),
            affected = affected.len(),
            "Computed affected files"
        );

        Ok(AffectedResponse {
            affected_files: affected.into_iter().collect(),
            changed_count: changed.len(),
            target_count: graph.len(),
        })
    }

    // =========================================================================
    // Analysis Operations
    // =========================================================================

    /// Analyze a batch of in-memory sources with every configured tool.
    pub async fn analyze(&self, request: AnalyzeBatchRequest) -> OpsResult<AnalyzeResponse> {
        let start = Instant::now();
        let report = self.orchestrator().await.analyze_batch(&request.files).await?;
        let summary = report.summary();

        Ok(AnalyzeResponse {
            report,
            summary,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Analyze every C/C++ source affected by the changed files.
    ///
    /// Affected sources are the changed or dependent paths that are sources
    /// themselves, plus the sources recorded for every affected target.
    /// Sources are resolved against `source_root`; those that do not exist
    /// there are reported as missing and skipped.
    pub async fn impact_scan(&self, request: ImpactScanRequest) -> OpsResult<ImpactScanResponse> {
        let graph = load_graph(&request.dependency_dir)?;
        let affected = compute_affected(request.changed_files.iter().cloned(), &graph);

        let mut sources = source_files(&affected);
        sources.extend(sources_for_targets(
            affected.iter().map(String::as_str),
            &graph,
        ));

        let mut files = Vec::new();
        let mut missing_files = Vec::new();
        for source in &sources {
            let Some(language) = Language::from_path(source) else {
                continue;
            };

            let path = request.source_root.join(source);
            if !path.is_file() {
                debug!(path = %path.display(), "Affected source not found, skipping");
                missing_files.push(source.clone());
                continue;
            }

            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| OpsError::SourceRead {
                    path: path.clone(),
                    source: e,
                })?;
            files.push(AnalyzeRequest::new(source.clone(), content, language));
        }

        info!(
            affected = affected.len(),
            sources = files.len(),
            missing = missing_files.len(),
            "Scanning affected sources"
        );

        let report = self.orchestrator().await.analyze_batch(&files).await?;
        let summary = report.summary();

        Ok(ImpactScanResponse {
            affected_files: affected.into_iter().collect(),
            analyzed_files: files.into_iter().map(|f| f.filename).collect(),
            missing_files,
            report,
            summary,
        })
    }
}

fn load_graph(dir: &Path) -> OpsResult<DependencyGraph> {
    DependencyGraph::build(dir).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => OpsError::DependencyDirNotFound {
            path: dir.to_path_buf(),
        },
        _ => OpsError::Io(e),
    })
}
