//! `github-actions` command: export the resolved context to the runner.

use crate::ci::{ActionsConfig, OutputSinks};
use crate::cli::commands::dispatcher::{Command, CommandResult};
use crate::context::ProjectContext;
use crate::error::Result;
use crate::ui::Output;

pub struct GithubActionsCommand;

impl GithubActionsCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GithubActionsCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for GithubActionsCommand {
    fn execute(&self, ctx: &ProjectContext, out: &Output) -> Result<CommandResult> {
        let config = ActionsConfig::from_context(ctx);
        let sinks = OutputSinks::from_env();

        sinks.emit(&config, out)?;
        out.success(&format!(
            "exported {} context for downstream steps",
            config.environment
        ));
        Ok(CommandResult::success())
    }
}
