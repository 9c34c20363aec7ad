//! Executable resolution.
//!
//! Programs are resolved by preferring the project virtual environment, then
//! walking PATH entries directly. Does NOT shell out to `which` — its
//! behavior varies across systems and is sometimes a shell builtin with
//! inconsistent error handling.

use std::path::{Path, PathBuf};

use crate::context::ProjectContext;
use crate::error::{Result, TrestleError};

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Find a program by iterating over PATH entries.
///
/// Returns the first candidate that exists and is executable. On Windows an
/// `.exe` suffix is also tried.
pub fn find_on_path(program: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    for dir in path_entries {
        let candidate = dir.join(program);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
        if cfg!(windows) {
            let candidate = dir.join(format!("{}.exe", program));
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

/// Whether a docker binary is discoverable on the search path.
pub fn docker_on_path() -> bool {
    find_on_path("docker", &parse_system_path()).is_some()
}

/// Resolve a program, preferring the project virtual environment.
///
/// Falls back to the system PATH; a program found in neither is a
/// [`TrestleError::MissingExecutable`], distinct from a failing command so
/// operators know to install rather than debug.
pub fn resolve_program(ctx: &ProjectContext, program: &str) -> Result<PathBuf> {
    let venv_candidate = ctx.venv_executable(program);
    // In containerized contexts venv_executable returns the bare name,
    // which is_file() rejects; the PATH walk below handles it.
    if venv_candidate.is_absolute() && venv_candidate.is_file() {
        return Ok(venv_candidate);
    }

    find_on_path(program, &parse_system_path()).ok_or_else(|| TrestleError::MissingExecutable {
        name: program.to_string(),
    })
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}
