//! Argv-based command execution.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::error::{Result, TrestleError};

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables merged over the inherited environment.
    pub env: BTreeMap<String, String>,

    /// Capture stdout/stderr; if false, the child inherits the terminal.
    pub capture: bool,
}

impl ExecOptions {
    /// Options for a command run interactively in `cwd` with extra env vars.
    pub fn in_dir(cwd: &Path, env: BTreeMap<String, String>) -> Self {
        Self {
            cwd: Some(cwd.to_path_buf()),
            env,
            capture: false,
        }
    }

    /// Options capturing output, for probes and parsed results.
    pub fn captured(cwd: Option<&Path>) -> Self {
        Self {
            cwd: cwd.map(Path::to_path_buf),
            env: BTreeMap::new(),
            capture: true,
        }
    }
}

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Captured standard output (empty when inherited).
    pub stdout: String,

    /// Captured standard error (empty when inherited).
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether the command exited with code 0.
    pub success: bool,
}

impl ExecResult {
    /// Exit code to propagate to the process boundary.
    pub fn code(&self) -> i32 {
        self.exit_code.unwrap_or(1)
    }
}

/// Render a program + args for logs and error messages.
pub fn render_command(program: &Path, args: &[String]) -> String {
    let mut parts = vec![program.display().to_string()];
    parts.extend(args.iter().cloned());
    parts.join(" ")
}

/// Execute a command synchronously and wait for completion.
///
/// No shell is involved; `program` is spawned directly with `args`. There is
/// no timeout — a hung binary hangs the process, by contract. A spawn
/// failure with `NotFound` maps to [`TrestleError::MissingExecutable`];
/// other spawn failures map to [`TrestleError::CommandFailed`]. A nonzero
/// exit is NOT an error here: callers decide how to propagate the code.
pub fn run<S: AsRef<OsStr>>(program: &Path, args: &[S], options: &ExecOptions) -> Result<ExecResult> {
    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }
    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    if options.capture {
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
    }

    let rendered = || {
        let args: Vec<String> = args
            .iter()
            .map(|a| a.as_ref().to_string_lossy().into_owned())
            .collect();
        render_command(program, &args)
    };

    tracing::debug!(command = %rendered(), "spawning");

    let output = cmd.output().map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            TrestleError::MissingExecutable {
                name: program.display().to_string(),
            }
        } else {
            TrestleError::CommandFailed {
                command: rendered(),
                code: None,
            }
        }
    })?;

    let duration = start.elapsed();
    let stdout = if options.capture {
        String::from_utf8_lossy(&output.stdout).to_string()
    } else {
        String::new()
    };
    let stderr = if options.capture {
        String::from_utf8_lossy(&output.stderr).to_string()
    } else {
        String::new()
    };

    Ok(ExecResult {
        exit_code: output.status.code(),
        stdout,
        stderr,
        duration,
        success: output.status.success(),
    })
}
