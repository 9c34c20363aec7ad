//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Trestle - dbt project orchestration.
#[derive(Debug, Parser)]
#[command(name = "trestle")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Deployment environment (dev, staging, prod); overrides detection
    #[arg(short, long, global = true, value_name = "ENV")]
    pub env: Option<String>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the resolved execution context
    Info(InfoArgs),

    /// Export the resolved context to GitHub Actions output files
    GithubActions,

    /// Compile models without running them
    Compile(DbtArgs),

    /// Run models
    Run(DbtArgs),

    /// Build models, tests, seeds, and snapshots
    Build(DbtArgs),

    /// Load seed files
    Seed(DbtArgs),

    /// Take snapshots
    Snapshot(DbtArgs),

    /// Run tests (unit, integration, or both)
    Test(TestArgs),

    /// Install dbt packages
    Deps(DepsArgs),

    /// List installed dbt packages
    ListPackages,

    /// Generate (and optionally serve) documentation
    Docs(DocsArgs),

    /// Lint SQL sources and run hooks
    Lint(LintArgs),

    /// Run pre-commit hooks only
    Precommit(PrecommitArgs),

    /// Build the deployment docker image
    DockerBuild(DockerBuildArgs),

    /// Set up the full development environment
    Setup(SetupArgs),

    /// Install Python dependencies into the virtual environment
    Install(InstallArgs),

    /// Remove build artifacts and the virtual environment
    Clean,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments shared by dbt passthrough commands.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DbtArgs {
    /// dbt target profile (defaults to the environment's target)
    #[arg(short, long)]
    pub target: Option<String>,

    /// Execution mode: local or docker
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Extra arguments passed to dbt verbatim
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub passthrough: Vec<String>,
}

/// Arguments for the `test` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct TestArgs {
    /// Run only the unit suite
    #[arg(long, conflicts_with = "integration")]
    pub unit: bool,

    /// Run only the integration suite
    #[arg(long)]
    pub integration: bool,

    /// dbt target profile (defaults to the environment's target)
    #[arg(short, long)]
    pub target: Option<String>,

    /// Execution mode: local or docker
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<String>,
}

/// Arguments for the `info` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InfoArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `deps` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DepsArgs {
    /// Remove installed packages first for a clean reinstall
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the `docs` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DocsArgs {
    /// Serve the generated docs after building
    #[arg(long)]
    pub serve: bool,

    /// Port for the docs server
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// dbt target profile (defaults to the environment's target)
    #[arg(short, long)]
    pub target: Option<String>,
}

/// Arguments for the `lint` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct LintArgs {
    /// Auto-fix violations where possible
    #[arg(long)]
    pub fix: bool,

    /// Paths to lint (defaults to models, tests, macros)
    pub paths: Vec<String>,
}

/// Arguments for the `precommit` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct PrecommitArgs {
    /// Let hooks rewrite files in place
    #[arg(long)]
    pub fix: bool,
}

/// Arguments for the `docker-build` command.
#[derive(Debug, Clone, clap::Args)]
pub struct DockerBuildArgs {
    /// Image tag
    #[arg(short, long, default_value = "data-transformation")]
    pub tag: String,

    /// Dockerfile path relative to the project root
    #[arg(short, long, default_value = "Dockerfile")]
    pub dockerfile: String,
}

/// Arguments for the `setup` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SetupArgs {
    /// Rebuild the virtual environment from scratch
    #[arg(long)]
    pub force_python: bool,

    /// Reinstall dbt packages from scratch
    #[arg(long)]
    pub force_dbt: bool,

    /// Skip the post-setup smoke test
    #[arg(long)]
    pub skip_tests: bool,
}

/// Arguments for the `install` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InstallArgs {
    /// Rebuild the virtual environment from scratch
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
