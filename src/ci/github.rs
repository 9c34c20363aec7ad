//! GitHub Actions output emission.
//!
//! Downstream workflow steps consume the resolved context through the
//! standard `GITHUB_OUTPUT` / `GITHUB_ENV` append files. The step summary is
//! cosmetic, so failures writing it only warn; the output and env files are
//! load-bearing and failures there abort the command.

use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::context::{Environment, ProjectContext};
use crate::error::{Result, TrestleError};
use crate::ui::Output;

/// AWS account that owns the deployment ECR registry.
pub const AWS_ACCOUNT_ID: &str = "891612547191";
/// ECR repository the deployment image is pushed to.
pub const ECR_REPOSITORY: &str = "data-transformation";
/// Region the deployment pipeline operates in. Fixed: workflows deploy to
/// one region regardless of the operator's `AWS_REGION`.
pub const PIPELINE_AWS_REGION: &str = "us-east-2";

/// Resolved pipeline configuration exported to workflow steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionsConfig {
    pub environment: String,
    pub dbt_target: String,
    pub is_production: bool,
    pub is_pull_request: bool,
    pub skip_integration_tests: bool,
    pub aws_region: String,
    pub aws_account_id: String,
    pub ecr_repository: String,
}

impl ActionsConfig {
    pub fn from_context(ctx: &ProjectContext) -> Self {
        Self::from_context_with(ctx, |key| std::env::var(key))
    }

    pub fn from_context_with<F>(ctx: &ProjectContext, env_fn: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
    {
        let event = env_fn("INPUT_EVENT_NAME")
            .or_else(|_| env_fn("GITHUB_EVENT_NAME"))
            .unwrap_or_default();

        Self {
            environment: ctx.environment().to_string(),
            dbt_target: ctx.dbt_target().to_string(),
            is_production: ctx.environment() == Environment::Prod,
            is_pull_request: event == "pull_request",
            skip_integration_tests: ctx.environment() == Environment::Dev,
            aws_region: PIPELINE_AWS_REGION.to_string(),
            aws_account_id: AWS_ACCOUNT_ID.to_string(),
            ecr_repository: ECR_REPOSITORY.to_string(),
        }
    }

    /// `key=value` lines for the `GITHUB_OUTPUT` append file.
    fn output_lines(&self) -> String {
        let mut lines = String::new();
        let _ = writeln!(lines, "environment={}", self.environment);
        let _ = writeln!(lines, "dbt-target={}", self.dbt_target);
        let _ = writeln!(lines, "is-production={}", self.is_production);
        let _ = writeln!(lines, "is-pull-request={}", self.is_pull_request);
        let _ = writeln!(lines, "skip-integration-tests={}", self.skip_integration_tests);
        let _ = writeln!(lines, "aws-region={}", self.aws_region);
        let _ = writeln!(lines, "aws-account-id={}", self.aws_account_id);
        let _ = writeln!(lines, "ecr-repository={}", self.ecr_repository);
        lines
    }

    /// Variable lines for the `GITHUB_ENV` append file.
    fn env_lines(&self) -> String {
        let mut lines = String::new();
        let _ = writeln!(lines, "ENVIRONMENT={}", self.environment);
        let _ = writeln!(lines, "DBT_TARGET={}", self.dbt_target);
        let _ = writeln!(lines, "IS_PRODUCTION={}", self.is_production);
        let _ = writeln!(lines, "USE_AWS_SECRETS=true");
        let _ = writeln!(lines, "AWS_REGION={}", self.aws_region);
        let _ = writeln!(lines, "AWS_ACCOUNT_ID={}", self.aws_account_id);
        let _ = writeln!(lines, "ECR_REPOSITORY_NAME={}", self.ecr_repository);
        lines
    }

    /// Markdown table for the workflow step summary.
    fn summary_markdown(&self) -> String {
        let mut md = String::new();
        let _ = writeln!(md, "## Deployment Context");
        let _ = writeln!(md);
        let _ = writeln!(md, "| Setting | Value |");
        let _ = writeln!(md, "| --- | --- |");
        let _ = writeln!(md, "| Environment | {} |", self.environment);
        let _ = writeln!(md, "| dbt target | {} |", self.dbt_target);
        let _ = writeln!(md, "| Production | {} |", self.is_production);
        let _ = writeln!(md, "| Pull request | {} |", self.is_pull_request);
        let _ = writeln!(md, "| Integration tests | {} |",
            if self.skip_integration_tests { "skipped" } else { "enabled" });
        let _ = writeln!(md, "| AWS region | {} |", self.aws_region);
        let _ = writeln!(md, "| ECR repository | {} |", self.ecr_repository);
        md
    }
}

/// Append-file destinations provided by the Actions runner.
#[derive(Debug, Clone, Default)]
pub struct OutputSinks {
    pub output: Option<PathBuf>,
    pub env: Option<PathBuf>,
    pub step_summary: Option<PathBuf>,
}

impl OutputSinks {
    /// Read sink paths from the runner-provided environment variables.
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key))
    }

    pub fn from_env_with<F>(env_fn: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
    {
        let path = |key: &str| env_fn(key).ok().filter(|v| !v.is_empty()).map(PathBuf::from);
        Self {
            output: path("GITHUB_OUTPUT"),
            env: path("GITHUB_ENV"),
            step_summary: path("GITHUB_STEP_SUMMARY"),
        }
    }

    /// Write the resolved configuration to every available sink.
    ///
    /// Missing `output`/`env` sinks are skipped with a warning (the command
    /// is still useful for local inspection); failures appending to a
    /// present sink are fatal because the workflow depends on those values.
    pub fn emit(&self, config: &ActionsConfig, out: &Output) -> Result<()> {
        match &self.output {
            Some(path) => append(path, &config.output_lines())?,
            None => out.warn("GITHUB_OUTPUT is not set; skipping step outputs"),
        }
        match &self.env {
            Some(path) => append(path, &config.env_lines())?,
            None => out.warn("GITHUB_ENV is not set; skipping environment exports"),
        }
        if let Some(path) = &self.step_summary {
            if let Err(err) = append(path, &config.summary_markdown()) {
                out.warn(&format!("could not write step summary: {}", err));
            }
        }
        debug!(environment = %config.environment, "pipeline outputs emitted");
        Ok(())
    }
}

fn append(path: &Path, content: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| TrestleError::CiOutput {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    file.write_all(content.as_bytes())
        .map_err(|err| TrestleError::CiOutput {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    Ok(())
}
