//! Bounded execution of external tools.

use std::process::Stdio;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::ToolError;

/// How to invoke a tool: the program plus arguments placed before the
/// adapter's own arguments (e.g. a wrapper such as `xcrun` or a script
/// interpreter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCommand {
    /// Program name or path.
    pub program: String,
    /// Arguments inserted before the adapter arguments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prefix_args: Vec<String>,
}

impl ToolCommand {
    /// Invoke `program` directly.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            prefix_args: Vec::new(),
        }
    }

    /// Insert arguments before the adapter arguments.
    pub fn with_prefix_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.prefix_args.extend(args.into_iter().map(Into::into));
        self
    }
}

/// Captured result of a tool that ran to completion.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Exit code; `None` when terminated by a signal.
    pub exit_code: Option<i32>,
    /// Captured stdout.
    pub stdout: String,
    /// Captured stderr.
    pub stderr: String,
    /// Wall-clock duration.
    pub duration: Duration,
}

impl ToolOutput {
    /// Whether the tool exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// stdout followed by stderr, separated by a newline when both exist.
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }

    /// Describe how the process exited.
    pub fn exit_description(&self) -> String {
        match self.exit_code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Run `command` with `args`, killing it if it runs longer than `timeout`.
///
/// This is the only suspension point of an adapter. On timeout the child is
/// dropped, which kills it.
pub async fn run_tool(
    command: &ToolCommand,
    args: &[String],
    timeout: Duration,
) -> Result<ToolOutput, ToolError> {
    debug!(program = %command.program, ?args, "Running tool");
    let start = Instant::now();

    let child = Command::new(&command.program)
        .args(&command.prefix_args)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ToolError::Spawn {
            program: command.program.clone(),
            source,
        })?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(source)) => {
            return Err(ToolError::Wait {
                program: command.program.clone(),
                source,
            })
        }
        Err(_) => {
            warn!(
                program = %command.program,
                timeout_ms = timeout.as_millis() as u64,
                "Tool exceeded its time budget, killed"
            );
            return Err(ToolError::Timeout {
                program: command.program.clone(),
                millis: timeout.as_millis() as u64,
            });
        }
    };

    let duration = start.elapsed();
    let result = ToolOutput {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        duration,
    };

    debug!(
        program = %command.program,
        exit_code = ?result.exit_code,
        duration_ms = duration.as_millis() as u64,
        "Tool completed"
    );

    Ok(result)
}
