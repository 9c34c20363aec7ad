//! Execution context detection.
//!
//! Determines where trestle is running by checking environment signals in a
//! fixed priority order. The order matters: a GitHub Actions job can itself
//! run inside a container, and an ECS task always does. Downstream mode
//! validation relies on this exact precedence, so the broader classification
//! always wins:
//!
//! 1. ECS markers (`AWS_EXECUTION_ENV=AWS_ECS_FARGATE` or
//!    `ECS_CONTAINER_METADATA_URI`)
//! 2. GitHub Actions (`GITHUB_ACTIONS=true`)
//! 3. Docker (`/.dockerenv` marker file or `DOCKER_CONTAINER=true`)
//! 4. Local shell

use std::path::Path;

/// Where the current process is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    /// Local development shell.
    Local,
    /// Inside a Docker container.
    Docker,
    /// GitHub Actions CI/CD pipeline.
    GithubActions,
    /// AWS ECS/Fargate managed container service.
    Ecs,
}

impl ExecutionContext {
    /// Detect the current execution context from the real environment.
    pub fn detect() -> Self {
        Self::detect_with(
            |key| std::env::var(key),
            Path::new("/.dockerenv").exists(),
        )
    }

    /// Detect with an injected env lookup and dockerenv marker (for testing).
    pub fn detect_with<F>(env_fn: F, dockerenv_present: bool) -> Self
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        // 1. ECS: either the Fargate execution env or the metadata endpoint.
        if env_fn("AWS_EXECUTION_ENV").as_deref() == Ok("AWS_ECS_FARGATE")
            || env_fn("ECS_CONTAINER_METADATA_URI").is_ok()
        {
            return Self::Ecs;
        }

        // 2. GitHub Actions. Must win over generic container detection:
        //    CI jobs frequently run inside containers.
        if env_fn("GITHUB_ACTIONS").as_deref() == Ok("true") {
            return Self::GithubActions;
        }

        // 3. Docker: marker file or explicit flag variable.
        if dockerenv_present || env_fn("DOCKER_CONTAINER").as_deref() == Ok("true") {
            return Self::Docker;
        }

        Self::Local
    }

    /// Lowercase name, used in exported environment variables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Docker => "docker",
            Self::GithubActions => "github_actions",
            Self::Ecs => "ecs",
        }
    }

    /// Whether this context already runs inside a container.
    ///
    /// Containerized contexts use fixed image paths (`/var/task`) and bare
    /// tool names instead of project-relative virtual environment paths.
    pub fn in_container(&self) -> bool {
        matches!(self, Self::Docker | Self::Ecs)
    }
}

impl std::fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
