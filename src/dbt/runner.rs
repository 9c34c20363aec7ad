//! dbt subcommand execution.
//!
//! All dbt invocations flow through [`DbtRunner`]: target and profiles
//! directory come from the resolved context, the context's exports are
//! merged into the child environment, and exit codes are returned verbatim
//! so the process boundary can propagate them.

use tracing::debug;

use crate::context::{ExecutionMode, ProjectContext};
use crate::docker::{DockerManager, DEFAULT_IMAGE};
use crate::error::Result;
use crate::shell::{self, ExecOptions};
use crate::ui::Output;

pub struct DbtRunner<'a> {
    ctx: &'a ProjectContext,
    out: &'a Output,
}

impl<'a> DbtRunner<'a> {
    pub fn new(ctx: &'a ProjectContext, out: &'a Output) -> Self {
        Self { ctx, out }
    }

    /// Execute `dbt` with raw arguments in the project root.
    pub fn exec(&self, args: &[String]) -> Result<i32> {
        let dbt = shell::resolve_program(self.ctx, "dbt")?;
        let options = ExecOptions::in_dir(self.ctx.project_root(), self.ctx.env_vars());
        debug!(args = ?args, "invoking dbt");
        let result = shell::run(&dbt, args, &options)?;
        Ok(result.code())
    }

    /// Run a dbt subcommand with the context's target and profiles
    /// directory, plus any extra passthrough arguments.
    pub fn subcommand(&self, name: &str, target: Option<&str>, extra: &[String]) -> Result<i32> {
        let target = target.unwrap_or_else(|| self.ctx.dbt_target());
        // Multi-word subcommands ("docs generate") become separate argv
        // elements.
        let mut args: Vec<String> = name.split_whitespace().map(str::to_string).collect();
        args.extend([
            "--target".to_string(),
            target.to_string(),
            "--profiles-dir".to_string(),
            self.ctx.profiles_dir().display().to_string(),
        ]);
        args.extend(extra.iter().cloned());

        self.out
            .step(&format!("dbt {} (target: {})", name, target));
        self.exec(&args)
    }

    /// Run a dbt subcommand that rejects `--profiles-dir` (`docs`,
    /// `source freshness`). The profiles location still reaches dbt through
    /// the exported `DBT_PROFILES_DIR`.
    pub fn subcommand_bare(&self, name: &str, target: Option<&str>, extra: &[String]) -> Result<i32> {
        let target = target.unwrap_or_else(|| self.ctx.dbt_target());
        let mut args: Vec<String> = name.split_whitespace().map(str::to_string).collect();
        args.extend(["--target".to_string(), target.to_string()]);
        args.extend(extra.iter().cloned());

        self.out
            .step(&format!("dbt {} (target: {})", name, target));
        self.exec(&args)
    }

    /// Run a dbt subcommand locally or in a container per the requested
    /// mode. Mode validation errors surface before anything runs.
    pub fn subcommand_with_mode(
        &self,
        name: &str,
        target: Option<&str>,
        mode: Option<&str>,
        extra: &[String],
    ) -> Result<i32> {
        match self.ctx.execution_mode(mode)? {
            ExecutionMode::Local => self.subcommand(name, target, extra),
            ExecutionMode::Docker => {
                let docker = DockerManager::new(self.ctx, self.out);
                let build_code = docker.build_image(DEFAULT_IMAGE, "Dockerfile")?;
                if build_code != 0 {
                    return Ok(build_code);
                }
                let target = target.unwrap_or_else(|| self.ctx.dbt_target());
                docker.run_dbt(DEFAULT_IMAGE, name, target, extra)
            }
        }
    }

    /// Install dbt packages. `force` clears `dbt_packages` first for a
    /// clean reinstall.
    pub fn deps(&self, force: bool) -> Result<i32> {
        if force {
            let packages_dir = self.ctx.project_root().join("dbt_packages");
            if packages_dir.is_dir() {
                self.out.info("removing dbt_packages for clean reinstall");
                std::fs::remove_dir_all(&packages_dir)?;
            }
        }
        self.out.step("installing dbt packages");
        let code = self.exec(&["deps".to_string()])?;
        if code == 0 {
            self.out.success("dbt packages installed");
        }
        Ok(code)
    }

    /// List installed dbt packages from the `dbt_packages` directory.
    pub fn list_packages(&self) -> Result<i32> {
        let packages_dir = self.ctx.project_root().join("dbt_packages");
        if !packages_dir.is_dir() {
            self.out.warn("no dbt_packages directory; run `trestle deps` first");
            return Ok(0);
        }

        let mut names: Vec<String> = std::fs::read_dir(&packages_dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();

        if names.is_empty() {
            self.out.plain("no packages installed");
        } else {
            for name in &names {
                self.out.plain(name);
            }
        }
        Ok(0)
    }

    /// Generate documentation.
    pub fn docs_generate(&self, target: Option<&str>) -> Result<i32> {
        self.subcommand_bare("docs generate", target, &[])
    }

    /// Generate and serve documentation on a local port. Blocks until the
    /// server is interrupted.
    pub fn docs_serve(&self, target: Option<&str>, port: u16) -> Result<i32> {
        let code = self.docs_generate(target)?;
        if code != 0 {
            return Ok(code);
        }
        self.out
            .info(&format!("docs at http://localhost:{}", port));
        self.subcommand_bare(
            "docs serve",
            target,
            &["--port".to_string(), port.to_string()],
        )
    }

    /// Check source freshness. Failures are expected from time to time, so
    /// this reports the code rather than erroring.
    pub fn source_freshness(&self, target: Option<&str>) -> Result<i32> {
        self.subcommand_bare("source freshness", target, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Environment, ExecutionContext, Platform};
    use crate::ui::{Output, OutputMode};

    /// Project with a stub `dbt` in the venv that appends its argv to
    /// `dbt_args.log` in the working directory.
    #[cfg(unix)]
    fn stub_project() -> (tempfile::TempDir, ProjectContext) {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::TempDir::new().unwrap();
        let bin = temp.path().join("transform").join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        let dbt = bin.join("dbt");
        std::fs::write(&dbt, "#!/bin/sh\necho \"$@\" >> dbt_args.log\n").unwrap();
        std::fs::set_permissions(&dbt, std::fs::Permissions::from_mode(0o755)).unwrap();

        let ctx = ProjectContext::from_parts(
            Platform::Linux,
            ExecutionContext::Local,
            Environment::Dev,
            temp.path().to_path_buf(),
        );
        (temp, ctx)
    }

    #[cfg(unix)]
    fn logged_args(temp: &tempfile::TempDir) -> Vec<String> {
        std::fs::read_to_string(temp.path().join("dbt_args.log"))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[cfg(unix)]
    #[test]
    fn regular_subcommands_pass_target_and_profiles_dir() {
        let (temp, ctx) = stub_project();
        let out = Output::new(OutputMode::Quiet);
        let runner = DbtRunner::new(&ctx, &out);

        assert_eq!(runner.subcommand("compile", None, &[]).unwrap(), 0);

        let lines = logged_args(&temp);
        assert!(lines[0].starts_with("compile"));
        assert!(lines[0].contains("--target dev"));
        assert!(lines[0].contains("--profiles-dir"));
    }

    #[cfg(unix)]
    #[test]
    fn docs_and_freshness_omit_profiles_dir() {
        let (temp, ctx) = stub_project();
        let out = Output::new(OutputMode::Quiet);
        let runner = DbtRunner::new(&ctx, &out);

        assert_eq!(runner.docs_generate(None).unwrap(), 0);
        assert_eq!(runner.source_freshness(None).unwrap(), 0);

        let lines = logged_args(&temp);
        assert!(lines[0].starts_with("docs generate"));
        assert!(lines[0].contains("--target dev"));
        assert!(!lines[0].contains("--profiles-dir"));
        assert!(lines[1].starts_with("source freshness"));
        assert!(!lines[1].contains("--profiles-dir"));
    }

    #[cfg(unix)]
    #[test]
    fn docs_serve_passes_target_and_port() {
        let (temp, ctx) = stub_project();
        let out = Output::new(OutputMode::Quiet);
        let runner = DbtRunner::new(&ctx, &out);

        assert_eq!(runner.docs_serve(Some("prod"), 9090).unwrap(), 0);

        let lines = logged_args(&temp);
        assert!(lines[0].starts_with("docs generate"));
        assert!(lines[0].contains("--target prod"));
        assert!(lines[1].starts_with("docs serve"));
        assert!(lines[1].contains("--target prod"));
        assert!(lines[1].contains("--port 9090"));
        assert!(!lines[1].contains("--profiles-dir"));
    }

    #[cfg(unix)]
    #[test]
    fn passthrough_args_reach_dbt() {
        let (temp, ctx) = stub_project();
        let out = Output::new(OutputMode::Quiet);
        let runner = DbtRunner::new(&ctx, &out);

        let extra = vec!["--select".to_string(), "orders".to_string()];
        assert_eq!(runner.subcommand("run", None, &extra).unwrap(), 0);

        let lines = logged_args(&temp);
        assert!(lines[0].contains("--select orders"));
    }
}
