//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use crate::cli::args::{Cli, Commands};
use crate::context::ProjectContext;
use crate::error::Result;
use crate::ui::Output;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command against the resolved context.
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ctx: &ProjectContext, out: &Output) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Create a result from a child process exit code.
    pub fn from_code(code: i32) -> Self {
        if code == 0 {
            Self::success()
        } else {
            Self::failure(code)
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher;

impl CommandDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub fn dispatch(&self, cli: &Cli, ctx: &ProjectContext, out: &Output) -> Result<CommandResult> {
        match &cli.command {
            Commands::Info(args) => {
                let cmd = super::info::InfoCommand::new(args.clone());
                cmd.execute(ctx, out)
            }
            Commands::GithubActions => {
                let cmd = super::github_actions::GithubActionsCommand::new();
                cmd.execute(ctx, out)
            }
            Commands::Compile(args) => {
                let cmd = super::dbt::DbtCommand::new("compile", args.clone());
                cmd.execute(ctx, out)
            }
            Commands::Run(args) => {
                let cmd = super::dbt::DbtCommand::new("run", args.clone());
                cmd.execute(ctx, out)
            }
            Commands::Build(args) => {
                let cmd = super::dbt::DbtCommand::new("build", args.clone());
                cmd.execute(ctx, out)
            }
            Commands::Seed(args) => {
                let cmd = super::dbt::DbtCommand::new("seed", args.clone());
                cmd.execute(ctx, out)
            }
            Commands::Snapshot(args) => {
                let cmd = super::dbt::DbtCommand::new("snapshot", args.clone());
                cmd.execute(ctx, out)
            }
            Commands::Test(args) => {
                let cmd = super::dbt::TestCommand::new(args.clone());
                cmd.execute(ctx, out)
            }
            Commands::Deps(args) => {
                let cmd = super::dbt::DepsCommand::new(args.clone());
                cmd.execute(ctx, out)
            }
            Commands::ListPackages => {
                let cmd = super::dbt::ListPackagesCommand::new();
                cmd.execute(ctx, out)
            }
            Commands::Docs(args) => {
                let cmd = super::dbt::DocsCommand::new(args.clone());
                cmd.execute(ctx, out)
            }
            Commands::Lint(args) => {
                let cmd = super::lint::LintCommand::new(args.clone());
                cmd.execute(ctx, out)
            }
            Commands::Precommit(args) => {
                let cmd = super::lint::PrecommitCommand::new(args.clone());
                cmd.execute(ctx, out)
            }
            Commands::DockerBuild(args) => {
                let cmd = super::docker::DockerBuildCommand::new(args.clone());
                cmd.execute(ctx, out)
            }
            Commands::Setup(args) => {
                let cmd = super::setup::SetupCommand::new(args.clone());
                cmd.execute(ctx, out)
            }
            Commands::Install(args) => {
                let cmd = super::setup::InstallCommand::new(args.clone());
                cmd.execute(ctx, out)
            }
            Commands::Clean => {
                let cmd = super::setup::CleanCommand::new();
                cmd.execute(ctx, out)
            }
            Commands::Completions(args) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ctx, out)
            }
        }
    }
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(2);
        assert!(!result.success);
        assert_eq!(result.exit_code, 2);
    }

    #[test]
    fn command_result_from_code() {
        assert!(CommandResult::from_code(0).success);
        let failed = CommandResult::from_code(3);
        assert!(!failed.success);
        assert_eq!(failed.exit_code, 3);
    }
}
