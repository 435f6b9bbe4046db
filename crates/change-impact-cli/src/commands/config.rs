//! Config command implementation.
//!
//! Manages CLI configuration.

use anyhow::Result;
use change_impact_ops::Config;
use change_impact_scanners::ToolCommand;

fn describe(command: &ToolCommand) -> String {
    if command.prefix_args.is_empty() {
        command.program.clone()
    } else {
        format!("{} {}", command.program, command.prefix_args.join(" "))
    }
}

/// Show current configuration.
pub fn show(config: &Config) -> Result<()> {
    println!("Change-Impact Configuration");
    println!("{:-<40}", "");

    println!("Tool Timeout:        {} s", config.tool_timeout_secs);
    println!("Artifact Directory:  {}", config.artifact_dir.display());
    println!("Concurrent Files:    {}", config.max_concurrent_files);
    println!(
        "Tools:               {}",
        config.get("tools").unwrap_or_default()
    );
    println!("cppcheck:            {}", describe(&config.cppcheck));
    println!("clang-tidy:          {}", describe(&config.clang_tidy));
    println!("clang-format:        {}", describe(&config.clang_format));

    if let Some(config_path) = Config::config_file_path() {
        println!("\nConfig file: {}", config_path.display());
    }

    Ok(())
}

/// Set a configuration value.
pub fn set(config: &mut Config, key: &str, value: &str) -> Result<()> {
    if let Err(e) = config.set(key, value) {
        anyhow::bail!("{}. Valid keys: {}", e, Config::KEYS.join(", "));
    }
    config.save()?;
    println!("Set {} to: {}", key, value);
    Ok(())
}

/// Get a configuration value.
pub fn get(config: &Config, key: &str) -> Result<()> {
    match config.get(key) {
        Some(value) => println!("{}", value),
        None => anyhow::bail!("Unknown config key: {}", key),
    }
    Ok(())
}

/// Reset configuration to defaults.
pub fn reset() -> Result<()> {
    let config = Config::default();
    config.save()?;
    println!("Configuration reset to defaults");
    Ok(())
}
