//! `info` command: show the resolved execution context.

use serde::Serialize;

use crate::cli::args::InfoArgs;
use crate::cli::commands::dispatcher::{Command, CommandResult};
use crate::context::ProjectContext;
use crate::error::Result;
use crate::ui::Output;

pub struct InfoCommand {
    args: InfoArgs,
}

impl InfoCommand {
    pub fn new(args: InfoArgs) -> Self {
        Self { args }
    }
}

/// JSON shape of `info --json`, consumed by scripts and CI steps.
#[derive(Debug, Serialize)]
struct InfoReport {
    platform: String,
    execution_context: String,
    environment: String,
    dbt_target: String,
    project_root: String,
    profiles_dir: String,
    secret_id: String,
    aws_region: String,
    supports_docker: bool,
}

impl InfoReport {
    fn from_context(ctx: &ProjectContext) -> Self {
        Self {
            platform: ctx.platform().to_string(),
            execution_context: ctx.execution_context().to_string(),
            environment: ctx.environment().to_string(),
            dbt_target: ctx.dbt_target().to_string(),
            project_root: ctx.project_root().display().to_string(),
            profiles_dir: ctx.profiles_dir().display().to_string(),
            secret_id: ctx.secret_id(),
            aws_region: ctx.aws_region(),
            supports_docker: ctx.supports_docker(),
        }
    }
}

impl Command for InfoCommand {
    fn execute(&self, ctx: &ProjectContext, out: &Output) -> Result<CommandResult> {
        let report = InfoReport::from_context(ctx);

        if self.args.json {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|err| anyhow::anyhow!("could not serialize context: {}", err))?;
            out.plain(&json);
            return Ok(CommandResult::success());
        }

        out.plain(&ctx.describe());
        out.plain(&format!("  environment:     {}", report.environment));
        out.plain(&format!("  dbt target:      {}", report.dbt_target));
        out.plain(&format!("  project root:    {}", report.project_root));
        out.plain(&format!("  profiles dir:    {}", report.profiles_dir));
        out.plain(&format!("  secret id:       {}", report.secret_id));
        out.plain(&format!("  aws region:      {}", report.aws_region));
        out.plain(&format!("  docker capable:  {}", report.supports_docker));
        Ok(CommandResult::success())
    }
}
