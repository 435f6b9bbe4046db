//! Configuration for the operations layer.

use std::path::PathBuf;
use std::time::Duration;

use change_impact_scanners::{ScannerKind, SystemIncludes, ToolCommand, ToolScanner};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{OpsError, OpsResult};

/// Configuration for change-impact operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Upper bound for a single analyzer invocation (in seconds).
    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: u64,

    /// Directory where temporary source artifacts are written.
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,

    /// How many files of a batch are analyzed at once (1 = sequential).
    #[serde(default = "default_max_concurrent_files")]
    pub max_concurrent_files: usize,

    /// Analyzers run on every file, in report order.
    ///
    /// cppcheck and clang-tidy are always present; clang-format is optional.
    #[serde(default = "default_tools")]
    pub tools: Vec<ScannerKind>,

    /// How to invoke cppcheck.
    #[serde(default = "default_cppcheck")]
    pub cppcheck: ToolCommand,

    /// How to invoke clang-tidy.
    #[serde(default = "default_clang_tidy")]
    pub clang_tidy: ToolCommand,

    /// How to invoke clang-format.
    #[serde(default = "default_clang_format")]
    pub clang_format: ToolCommand,
}

fn default_tool_timeout_secs() -> u64 {
    30
}

fn default_artifact_dir() -> PathBuf {
    std::env::temp_dir()
}

fn default_max_concurrent_files() -> usize {
    1
}

fn default_tools() -> Vec<ScannerKind> {
    ScannerKind::ALL.to_vec()
}

fn default_cppcheck() -> ToolCommand {
    ToolCommand::new(ScannerKind::Cppcheck.default_program())
}

fn default_clang_tidy() -> ToolCommand {
    ToolCommand::new(ScannerKind::ClangTidy.default_program())
}

fn default_clang_format() -> ToolCommand {
    ToolCommand::new(ScannerKind::ClangFormat.default_program())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tool_timeout_secs: default_tool_timeout_secs(),
            artifact_dir: default_artifact_dir(),
            max_concurrent_files: default_max_concurrent_files(),
            tools: default_tools(),
            cppcheck: default_cppcheck(),
            clang_tidy: default_clang_tidy(),
            clang_format: default_clang_format(),
        }
    }
}

impl Config {
    /// Known configuration keys, for `get`/`set`.
    pub const KEYS: [&'static str; 7] = [
        "tool_timeout_secs",
        "artifact_dir",
        "max_concurrent_files",
        "tools",
        "cppcheck",
        "clang_tidy",
        "clang_format",
    ];

    /// Analyzers that every configuration must enable.
    pub const REQUIRED_TOOLS: [ScannerKind; 2] = [ScannerKind::Cppcheck, ScannerKind::ClangTidy];

    /// Load configuration from disk with environment overrides.
    pub fn load() -> OpsResult<Self> {
        let mut config = match Self::config_file_path() {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path)?;
                serde_json::from_str(&contents)?
            }
            _ => Self::default(),
        };

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration file's contents and validate the result.
    pub fn from_json(contents: &str) -> OpsResult<Self> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants every usable configuration satisfies.
    pub fn validate(&self) -> OpsResult<()> {
        if self.tool_timeout_secs == 0 {
            return Err(OpsError::Config(
                "tool_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.max_concurrent_files == 0 {
            return Err(OpsError::Config(
                "max_concurrent_files must be at least 1".to_string(),
            ));
        }
        if let Some(missing) = Self::REQUIRED_TOOLS
            .iter()
            .find(|kind| !self.tools.contains(*kind))
        {
            return Err(OpsError::Config(format!(
                "tools must include cppcheck and clang-tidy (missing {})",
                missing
            )));
        }
        Ok(())
    }

    /// Override values from `IMPACT_*` environment variables.
    pub fn apply_env(&mut self) -> OpsResult<()> {
        const OVERRIDES: [(&str, &str); 6] = [
            ("IMPACT_TOOL_TIMEOUT_SECS", "tool_timeout_secs"),
            ("IMPACT_ARTIFACT_DIR", "artifact_dir"),
            ("IMPACT_MAX_CONCURRENT_FILES", "max_concurrent_files"),
            ("IMPACT_CPPCHECK", "cppcheck"),
            ("IMPACT_CLANG_TIDY", "clang_tidy"),
            ("IMPACT_CLANG_FORMAT", "clang_format"),
        ];

        for (var, key) in OVERRIDES {
            if let Ok(value) = std::env::var(var) {
                self.set(key, &value)?;
            }
        }
        Ok(())
    }

    /// Save configuration to disk.
    pub fn save(&self) -> OpsResult<()> {
        if let Some(path) = Self::config_file_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(self)?;
            std::fs::write(&path, contents)?;
        }
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// `IMPACT_CONFIG` takes precedence over the platform config directory.
    pub fn config_file_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("IMPACT_CONFIG") {
            if !path.is_empty() {
                return Some(PathBuf::from(path));
            }
        }
        ProjectDirs::from("dev", "change-impact", "impact")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Time budget of one analyzer invocation.
    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    /// How to invoke the given analyzer.
    pub fn command_for(&self, kind: ScannerKind) -> &ToolCommand {
        match kind {
            ScannerKind::Cppcheck => &self.cppcheck,
            ScannerKind::ClangTidy => &self.clang_tidy,
            ScannerKind::ClangFormat => &self.clang_format,
        }
    }

    /// Build the configured analyzers, sharing one system header location.
    pub fn scanners(&self, includes: &SystemIncludes) -> Vec<ToolScanner> {
        self.tools
            .iter()
            .map(|kind| {
                ToolScanner::new(*kind, self.command_for(*kind).clone(), self.tool_timeout())
                    .with_includes(includes.clone())
            })
            .collect()
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "tool_timeout_secs" => Some(self.tool_timeout_secs.to_string()),
            "artifact_dir" => Some(self.artifact_dir.display().to_string()),
            "max_concurrent_files" => Some(self.max_concurrent_files.to_string()),
            "tools" => Some(
                self.tools
                    .iter()
                    .map(|k| k.tool_name())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            "cppcheck" => Some(self.cppcheck.program.clone()),
            "clang_tidy" => Some(self.clang_tidy.program.clone()),
            "clang_format" => Some(self.clang_format.program.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key.
    ///
    /// The change is applied only if the resulting configuration is valid.
    pub fn set(&mut self, key: &str, value: &str) -> OpsResult<()> {
        let mut updated = self.clone();
        updated.assign(key, value)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    fn assign(&mut self, key: &str, value: &str) -> OpsResult<()> {
        match key {
            "tool_timeout_secs" => {
                self.tool_timeout_secs = parse_number(value)?;
            }
            "artifact_dir" => {
                self.artifact_dir = PathBuf::from(value);
            }
            "max_concurrent_files" => {
                self.max_concurrent_files = parse_number(value)?;
            }
            "tools" => {
                let mut tools = Vec::new();
                for name in value.split(',').filter(|s| !s.trim().is_empty()) {
                    let kind: ScannerKind = name.parse().map_err(OpsError::Config)?;
                    if !tools.contains(&kind) {
                        tools.push(kind);
                    }
                }
                self.tools = tools;
            }
            "cppcheck" => {
                self.cppcheck = ToolCommand::new(value);
            }
            "clang_tidy" => {
                self.clang_tidy = ToolCommand::new(value);
            }
            "clang_format" => {
                self.clang_format = ToolCommand::new(value);
            }
            _ => {
                return Err(OpsError::Config(format!("Unknown config key: {}", key)));
            }
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(value: &str) -> OpsResult<T> {
    value
        .parse()
        .map_err(|_| OpsError::Config(format!("Invalid number: {}", value)))
}
