//! Deployment environment resolution.
//!
//! Resolves the logical environment (dev / staging / prod) using the
//! priority chain:
//!
//! 1. Explicit `--env` override
//! 2. `ENVIRONMENT` variable
//! 3. GitHub Actions branch/event heuristics (only when running under CI)
//! 4. Fallback to dev
//!
//! An override or variable that fails to parse is silently ignored and
//! resolution continues down the chain. Callers passing a typo therefore get
//! dev, not an error; `trestle info` shows the resolved value.

use std::str::FromStr;

use super::detection::ExecutionContext;

/// The logical deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    /// Lowercase value, as accepted by `--env` and `ENVIRONMENT`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Staging => "staging",
            Self::Prod => "prod",
        }
    }

    /// Resolve the environment from the real process environment.
    pub fn determine(override_: Option<&str>, context: ExecutionContext) -> Self {
        Self::determine_with(override_, context, |key| std::env::var(key))
    }

    /// Resolve with an injected env lookup (for testing).
    pub fn determine_with<F>(
        override_: Option<&str>,
        context: ExecutionContext,
        env_fn: F,
    ) -> Self
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        // 1. Explicit override. Invalid values fall through, not error.
        if let Some(value) = override_ {
            if let Ok(env) = value.parse() {
                return env;
            }
        }

        // 2. ENVIRONMENT variable, same matching rule.
        if let Ok(value) = env_fn("ENVIRONMENT") {
            if let Ok(env) = value.parse() {
                return env;
            }
        }

        // 3. CI heuristics.
        if context == ExecutionContext::GithubActions {
            return Self::from_ci_signals(&env_fn);
        }

        // 4. Default.
        Self::Dev
    }

    /// Derive the environment from GitHub Actions event variables.
    ///
    /// Workflow inputs (`INPUT_*`) take precedence over the ambient
    /// `GITHUB_*` variables so that reusable workflows can forward their
    /// caller's event data.
    fn from_ci_signals<F>(env_fn: &F) -> Self
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let var = |input: &str, ambient: &str| -> String {
            env_fn(input)
                .or_else(|_| env_fn(ambient))
                .unwrap_or_default()
        };

        let event_name = var("INPUT_EVENT_NAME", "GITHUB_EVENT_NAME");
        let ref_name = var("INPUT_REF_NAME", "GITHUB_REF_NAME");
        let base_ref = env_fn("INPUT_BASE_REF").unwrap_or_default();
        let manual_environment = env_fn("INPUT_MANUAL_ENVIRONMENT").unwrap_or_default();

        let target_branch = if event_name == "workflow_dispatch" && !manual_environment.is_empty()
        {
            // Manual deployment with an explicit environment input.
            manual_environment
        } else if event_name == "pull_request" && !base_ref.is_empty() {
            // For PRs, the base branch decides the target environment.
            base_ref
        } else if !ref_name.is_empty() {
            // Push events use the current branch.
            ref_name
        } else {
            // Legacy fallback: substring match on the full GITHUB_REF.
            let github_ref = env_fn("GITHUB_REF").unwrap_or_default();
            if github_ref.contains("main") {
                return Self::Prod;
            }
            if github_ref.contains("staging") {
                return Self::Staging;
            }
            if github_ref.contains("develop") {
                return Self::Dev;
            }
            String::new()
        };

        Self::from_branch(&target_branch)
    }

    /// Map a branch name to an environment.
    ///
    /// `develop`, `dev`, feature branches, and anything unrecognized all map
    /// to dev.
    pub fn from_branch(branch: &str) -> Self {
        match branch {
            "main" | "prod" => Self::Prod,
            "staging" | "test" => Self::Staging,
            _ => Self::Dev,
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "staging" => Ok(Self::Staging),
            "prod" => Ok(Self::Prod),
            _ => Err(format!("unknown environment: {}", s)),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
