//! dbt passthrough commands and the test suites.

use crate::cli::args::{DbtArgs, DepsArgs, DocsArgs, TestArgs};
use crate::cli::commands::dispatcher::{Command, CommandResult};
use crate::context::ProjectContext;
use crate::dbt::{DbtRunner, TestSuite};
use crate::error::Result;
use crate::ui::Output;

/// A dbt subcommand run with the context's target and profiles directory.
pub struct DbtCommand {
    subcommand: &'static str,
    args: DbtArgs,
}

impl DbtCommand {
    pub fn new(subcommand: &'static str, args: DbtArgs) -> Self {
        Self { subcommand, args }
    }
}

impl Command for DbtCommand {
    fn execute(&self, ctx: &ProjectContext, out: &Output) -> Result<CommandResult> {
        let runner = DbtRunner::new(ctx, out);
        let code = runner.subcommand_with_mode(
            self.subcommand,
            self.args.target.as_deref(),
            self.args.mode.as_deref(),
            &self.args.passthrough,
        )?;
        Ok(CommandResult::from_code(code))
    }
}

pub struct TestCommand {
    args: TestArgs,
}

impl TestCommand {
    pub fn new(args: TestArgs) -> Self {
        Self { args }
    }
}

impl Command for TestCommand {
    fn execute(&self, ctx: &ProjectContext, out: &Output) -> Result<CommandResult> {
        let suite = TestSuite::new(ctx, out);
        let target = self.args.target.as_deref();
        let mode = self.args.mode.as_deref();

        let code = if self.args.unit {
            suite.unit(target, mode)?
        } else if self.args.integration {
            suite.integration(target, mode)?
        } else {
            suite.all(target, mode)?
        };
        Ok(CommandResult::from_code(code))
    }
}

pub struct DepsCommand {
    args: DepsArgs,
}

impl DepsCommand {
    pub fn new(args: DepsArgs) -> Self {
        Self { args }
    }
}

impl Command for DepsCommand {
    fn execute(&self, ctx: &ProjectContext, out: &Output) -> Result<CommandResult> {
        let code = DbtRunner::new(ctx, out).deps(self.args.force)?;
        Ok(CommandResult::from_code(code))
    }
}

pub struct ListPackagesCommand;

impl ListPackagesCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ListPackagesCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for ListPackagesCommand {
    fn execute(&self, ctx: &ProjectContext, out: &Output) -> Result<CommandResult> {
        let code = DbtRunner::new(ctx, out).list_packages()?;
        Ok(CommandResult::from_code(code))
    }
}

pub struct DocsCommand {
    args: DocsArgs,
}

impl DocsCommand {
    pub fn new(args: DocsArgs) -> Self {
        Self { args }
    }
}

impl Command for DocsCommand {
    fn execute(&self, ctx: &ProjectContext, out: &Output) -> Result<CommandResult> {
        let runner = DbtRunner::new(ctx, out);
        let target = self.args.target.as_deref();
        let code = if self.args.serve {
            runner.docs_serve(target, self.args.port)?
        } else {
            runner.docs_generate(target)?
        };
        Ok(CommandResult::from_code(code))
    }
}
