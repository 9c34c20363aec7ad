//! Error types for trestle operations.
//!
//! This module defines [`TrestleError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Configuration errors (bad execution mode, unsupported mode for the
//!   current context) are raised immediately and never retried
//! - External tool failures keep their exit code so it can be propagated
//!   verbatim to the process boundary
//! - Missing binaries are reported distinctly from generic failures so
//!   operators know to install rather than debug
//! - Use `anyhow::Error` (via `TrestleError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for trestle operations.
#[derive(Debug, Error)]
pub enum TrestleError {
    /// An explicitly requested execution mode is not a known value.
    #[error("Invalid execution mode '{requested}'. Must be one of: local, docker")]
    InvalidMode { requested: String },

    /// Docker execution requested while running under a CI/CD pipeline.
    #[error("Docker execution not supported in CI/CD environment")]
    DockerInCi,

    /// Docker execution requested while already inside a container.
    #[error("Docker execution not supported when already running in container")]
    DockerInContainer,

    /// Docker execution requested but no docker binary is on PATH.
    #[error("Docker not available in PATH")]
    DockerNotFound,

    /// The Docker daemon did not respond to a version probe.
    #[error("Docker daemon is not running")]
    DockerDaemonDown,

    /// A required executable is absent from the virtual environment and PATH.
    #[error("Executable '{name}' not found in virtual environment or PATH")]
    MissingExecutable { name: String },

    /// Spawning or waiting on a child process failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// Failed to append to a CI-provided output file.
    #[error("Failed to write CI output file {path}: {message}")]
    CiOutput { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for trestle operations.
pub type Result<T> = std::result::Result<T, TrestleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_mode_lists_valid_modes() {
        let err = TrestleError::InvalidMode {
            requested: "bogus".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("bogus"));
        assert!(msg.contains("local"));
        assert!(msg.contains("docker"));
    }

    #[test]
    fn docker_errors_have_distinct_messages() {
        let ci = TrestleError::DockerInCi.to_string();
        let container = TrestleError::DockerInContainer.to_string();
        let path = TrestleError::DockerNotFound.to_string();
        assert_ne!(ci, container);
        assert_ne!(container, path);
        assert_ne!(ci, path);
    }

    #[test]
    fn missing_executable_displays_name() {
        let err = TrestleError::MissingExecutable {
            name: "sqlfluff".into(),
        };
        assert!(err.to_string().contains("sqlfluff"));
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = TrestleError::CommandFailed {
            command: "dbt run".into(),
            code: Some(2),
        };
        let msg = err.to_string();
        assert!(msg.contains("dbt run"));
        assert!(msg.contains("2"));
    }

    #[test]
    fn ci_output_displays_path() {
        let err = TrestleError::CiOutput {
            path: PathBuf::from("/tmp/gh_output"),
            message: "permission denied".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/gh_output"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: TrestleError = io_err.into();
        assert!(matches!(err, TrestleError::Io(_)));
    }
}
