//! Execution mode resolution and validation.
//!
//! dbt can run natively on the host or inside a Docker container. The mode
//! is requested per operation (`--mode`), defaulting to local. Resolution is
//! the one place where caller input can be rejected: an unknown mode string
//! or a docker request the current context cannot honor is a configuration
//! error, raised immediately and never retried.

use std::str::FromStr;

use crate::error::{Result, TrestleError};

use super::detection::ExecutionContext;

/// How dbt commands are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Native execution via the project virtual environment.
    Local,
    /// Containerized execution via `docker run`.
    Docker,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Docker => "docker",
        }
    }

    /// Whether docker execution is available and appropriate.
    ///
    /// Pure function of the context and docker binary availability. Docker
    /// execution is never legal from CI or from inside a container, because
    /// those contexts either lack a daemon or are the container already.
    pub fn supports_docker(context: ExecutionContext, docker_on_path: bool) -> bool {
        if matches!(
            context,
            ExecutionContext::GithubActions | ExecutionContext::Docker | ExecutionContext::Ecs
        ) {
            return false;
        }
        docker_on_path
    }

    /// Resolve the requested mode against the current context.
    ///
    /// `None` or an empty string defaults to [`ExecutionMode::Local`] with no
    /// validation. A docker request fails with a distinct error per cause:
    /// running under CI, already inside a container, or no docker binary on
    /// the search path.
    pub fn resolve(
        requested: Option<&str>,
        context: ExecutionContext,
        docker_on_path: bool,
    ) -> Result<Self> {
        let mode = match requested {
            None => Self::Local,
            Some("") => Self::Local,
            Some(value) => value.parse().map_err(|_| TrestleError::InvalidMode {
                requested: value.to_string(),
            })?,
        };

        if mode == Self::Docker && !Self::supports_docker(context, docker_on_path) {
            return Err(match context {
                ExecutionContext::GithubActions => TrestleError::DockerInCi,
                ExecutionContext::Docker | ExecutionContext::Ecs => {
                    TrestleError::DockerInContainer
                }
                ExecutionContext::Local => TrestleError::DockerNotFound,
            });
        }

        Ok(mode)
    }
}

impl FromStr for ExecutionMode {
    type Err = String;

    // Exact value match; mode strings are a flag surface, not user prose.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "docker" => Ok(Self::Docker),
            _ => Err(format!("unknown execution mode: {}", s)),
        }
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
