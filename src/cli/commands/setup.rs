//! `setup`, `install`, and `clean` commands.

use crate::cli::args::{InstallArgs, SetupArgs};
use crate::cli::commands::dispatcher::{Command, CommandResult};
use crate::context::ProjectContext;
use crate::error::Result;
use crate::secrets::AwsCliStore;
use crate::setup;
use crate::ui::Output;

pub struct SetupCommand {
    args: SetupArgs,
}

impl SetupCommand {
    pub fn new(args: SetupArgs) -> Self {
        Self { args }
    }
}

impl Command for SetupCommand {
    fn execute(&self, ctx: &ProjectContext, out: &Output) -> Result<CommandResult> {
        let store = AwsCliStore::new();
        let code = setup::complete(
            ctx,
            &store,
            out,
            self.args.force_python,
            self.args.force_dbt,
            self.args.skip_tests,
        )?;
        Ok(CommandResult::from_code(code))
    }
}

pub struct InstallCommand {
    args: InstallArgs,
}

impl InstallCommand {
    pub fn new(args: InstallArgs) -> Self {
        Self { args }
    }
}

impl Command for InstallCommand {
    fn execute(&self, ctx: &ProjectContext, out: &Output) -> Result<CommandResult> {
        let code = setup::install_python_dependencies(ctx, out, self.args.force)?;
        Ok(CommandResult::from_code(code))
    }
}

pub struct CleanCommand;

impl CleanCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CleanCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for CleanCommand {
    fn execute(&self, ctx: &ProjectContext, out: &Output) -> Result<CommandResult> {
        let code = setup::clean_environment(ctx, out)?;
        Ok(CommandResult::from_code(code))
    }
}
