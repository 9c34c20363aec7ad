//! `docker-build` command.

use crate::cli::args::DockerBuildArgs;
use crate::cli::commands::dispatcher::{Command, CommandResult};
use crate::context::ProjectContext;
use crate::docker::DockerManager;
use crate::error::Result;
use crate::ui::Output;

pub struct DockerBuildCommand {
    args: DockerBuildArgs,
}

impl DockerBuildCommand {
    pub fn new(args: DockerBuildArgs) -> Self {
        Self { args }
    }
}

impl Command for DockerBuildCommand {
    fn execute(&self, ctx: &ProjectContext, out: &Output) -> Result<CommandResult> {
        let docker = DockerManager::new(ctx, out);
        let code = docker.build_image(&self.args.tag, &self.args.dockerfile)?;
        Ok(CommandResult::from_code(code))
    }
}
