//! `lint` and `precommit` commands.

use crate::cli::args::{LintArgs, PrecommitArgs};
use crate::cli::commands::dispatcher::{Command, CommandResult};
use crate::context::ProjectContext;
use crate::error::Result;
use crate::lint;
use crate::ui::Output;

pub struct LintCommand {
    args: LintArgs,
}

impl LintCommand {
    pub fn new(args: LintArgs) -> Self {
        Self { args }
    }
}

impl Command for LintCommand {
    fn execute(&self, ctx: &ProjectContext, out: &Output) -> Result<CommandResult> {
        let code = if self.args.paths.is_empty() {
            lint::all(ctx, out, self.args.fix)?
        } else {
            // Explicit paths mean SQL-only linting; hooks cover the
            // whole repository and ignore path selection.
            lint::sqlfluff(ctx, out, self.args.fix, &self.args.paths)?
        };
        Ok(CommandResult::from_code(code))
    }
}

pub struct PrecommitCommand {
    args: PrecommitArgs,
}

impl PrecommitCommand {
    pub fn new(args: PrecommitArgs) -> Self {
        Self { args }
    }
}

impl Command for PrecommitCommand {
    fn execute(&self, ctx: &ProjectContext, out: &Output) -> Result<CommandResult> {
        let code = lint::pre_commit(ctx, out, self.args.fix)?;
        if code == 0 {
            out.success("pre-commit hooks passed");
        }
        Ok(CommandResult::from_code(code))
    }
}
