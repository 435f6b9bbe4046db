//! Change-Impact CLI - find what a change touches and analyze it.
//!
//! Reads the `*.d` dependency records a compiler leaves in the build
//! directory, computes every file affected by a set of changes, and runs
//! cppcheck, clang-tidy and clang-format on the affected sources.

use std::path::PathBuf;

use anyhow::{Context, Result};
use change_impact_core::Language;
use change_impact_ops::{Config, OpsContext};
use clap::{Parser, Subcommand};
use tracing::Level;

mod commands;

use commands::{affected, analyze, config as config_cmd, scan};

/// Change-Impact CLI - Static analysis for exactly what a change touches.
#[derive(Parser, Debug)]
#[command(
    name = "impact",
    author,
    version,
    about = "Change-impact analysis and static-analysis orchestration for C/C++",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List every path affected by the changed files.
    Affected {
        /// Directory holding the `*.d` dependency records.
        #[arg(short, long)]
        deps: PathBuf,

        /// Changed paths, as they appear in the dependency records.
        #[arg(required = true)]
        changed: Vec<String>,

        /// Print JSON instead of one path per line.
        #[arg(long)]
        json: bool,
    },

    /// Run the configured analyzers on source files.
    Analyze {
        /// Source files to analyze.
        #[arg(required_unless_present = "batch", conflicts_with = "batch")]
        files: Vec<PathBuf>,

        /// JSON batch request (`[{filename, content, language}]`), `-` for stdin.
        #[arg(short, long)]
        batch: Option<PathBuf>,

        /// Analyze every file as this language instead of detecting it.
        #[arg(short, long)]
        language: Option<Language>,

        /// Print the JSON report.
        #[arg(long)]
        json: bool,

        /// Exit with status 1 unless every analyzer passed on every file.
        #[arg(long)]
        strict: bool,
    },

    /// Analyze every source affected by the changed files.
    Scan {
        /// Directory holding the `*.d` dependency records.
        #[arg(short, long)]
        deps: PathBuf,

        /// Directory source paths are resolved against.
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Changed paths, as they appear in the dependency records.
        #[arg(required = true)]
        changed: Vec<String>,

        /// Print JSON instead of a summary.
        #[arg(long)]
        json: bool,

        /// Exit with status 1 unless every analyzer passed on every file.
        #[arg(long)]
        strict: bool,
    },

    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration.
    Show,

    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,
        /// Configuration value.
        value: String,
    },

    /// Get a configuration value.
    Get {
        /// Configuration key.
        key: String,
    },

    /// Reset configuration to defaults.
    Reset,

    /// Show path to config file.
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Reset and path must work even when the saved config is invalid.
    let config = match &cli.command {
        Commands::Config(ConfigCommands::Reset | ConfigCommands::Path) => Config::default(),
        _ => Config::load().context("Failed to load configuration")?,
    };

    let passed = match cli.command {
        Commands::Affected {
            deps,
            changed,
            json,
        } => {
            let ctx = OpsContext::new(config);
            affected::execute(&ctx, deps, changed, json)?;
            true
        }

        Commands::Analyze {
            files,
            batch,
            language,
            json,
            strict,
        } => {
            let ctx = OpsContext::new(config);
            let request = match batch {
                Some(path) => analyze::read_batch(&path)?,
                None => analyze::read_files(&files, language)?,
            };
            let passed = analyze::execute(&ctx, request, json).await?;
            passed || !strict
        }

        Commands::Scan {
            deps,
            root,
            changed,
            json,
            strict,
        } => {
            let ctx = OpsContext::new(config);
            let passed = scan::execute(&ctx, deps, root, changed, json).await?;
            passed || !strict
        }

        Commands::Config(config_cmd_inner) => {
            let mut config = config;
            match config_cmd_inner {
                ConfigCommands::Show => {
                    config_cmd::show(&config)?;
                }
                ConfigCommands::Set { key, value } => {
                    config_cmd::set(&mut config, &key, &value)?;
                }
                ConfigCommands::Get { key } => {
                    config_cmd::get(&config, &key)?;
                }
                ConfigCommands::Reset => {
                    config_cmd::reset()?;
                }
                ConfigCommands::Path => {
                    if let Some(path) = Config::config_file_path() {
                        println!("{}", path.display());
                    } else {
                        println!("(no config file path available)");
                    }
                }
            }
            true
        }
    };

    if !passed {
        std::process::exit(1);
    }

    Ok(())
}
