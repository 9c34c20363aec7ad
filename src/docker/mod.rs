//! Docker image builds and containerized dbt runs.
//!
//! The docker CLI is an opaque collaborator. Before any operation the daemon
//! is probed with `docker version`; a daemon that does not answer is a
//! distinct error with a remediation hint, not a generic command failure.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::context::{Platform, ProjectContext};
use crate::error::{Result, TrestleError};
use crate::shell::{self, ExecOptions};
use crate::ui::Output;

/// Image name built and run when no tag override is given.
pub const DEFAULT_IMAGE: &str = "data-transformation";

/// Project mount point inside the container.
const CONTAINER_WORKDIR: &str = "/var/task";

pub struct DockerManager<'a> {
    ctx: &'a ProjectContext,
    out: &'a Output,
}

impl<'a> DockerManager<'a> {
    pub fn new(ctx: &'a ProjectContext, out: &'a Output) -> Self {
        Self { ctx, out }
    }

    /// Locate the docker binary and confirm the daemon answers.
    fn ensure_daemon(&self) -> Result<PathBuf> {
        let docker = shell::find_on_path("docker", &shell::parse_system_path())
            .ok_or(TrestleError::DockerNotFound)?;

        let probe = shell::run(&docker, &["version"], &ExecOptions::captured(None))?;
        if !probe.success {
            self.out
                .error("Docker daemon is not responding. Start Docker Desktop and retry.");
            return Err(TrestleError::DockerDaemonDown);
        }
        debug!(docker = %docker.display(), "docker daemon is up");
        Ok(docker)
    }

    /// Build the project image. Returns the build's exit code.
    pub fn build_image(&self, tag: &str, dockerfile: &str) -> Result<i32> {
        let docker = self.ensure_daemon()?;

        self.out.step(&format!("building image {}", tag));
        let args = ["build", "-t", tag, "-f", dockerfile, "."];
        let result = shell::run(
            &docker,
            &args,
            &ExecOptions::in_dir(self.ctx.project_root(), Default::default()),
        )?;

        if result.success {
            self.out.success(&format!("image {} built", tag));
        } else {
            self.out.error(&format!("image build failed ({})", result.code()));
        }
        Ok(result.code())
    }

    /// Run a dbt subcommand inside the project image.
    ///
    /// The host profiles directory is mounted read-only into the container
    /// and the `.env` file, when present, is passed through so containerized
    /// runs see the same credentials as local ones. `extra` arguments are
    /// forwarded to dbt verbatim.
    pub fn run_dbt(
        &self,
        image: &str,
        subcommand: &str,
        target: &str,
        extra: &[String],
    ) -> Result<i32> {
        let docker = self.ensure_daemon()?;

        let profiles_mount = format!(
            "{}:{}/profiles",
            host_path(&self.ctx.project_root().join("profiles"), self.ctx.platform()),
            CONTAINER_WORKDIR
        );
        let env_file = self.ctx.project_root().join(".env");
        let env_file = env_file.is_file().then_some(env_file.as_path());

        let args = container_run_args(&profiles_mount, env_file, image, subcommand, target, extra);

        self.out
            .step(&format!("running dbt {} in {}", subcommand, image));
        let result = shell::run(
            &docker,
            &args,
            &ExecOptions::in_dir(self.ctx.project_root(), Default::default()),
        )?;
        Ok(result.code())
    }
}

/// Assemble the `docker run` argv for a containerized dbt invocation.
fn container_run_args(
    profiles_mount: &str,
    env_file: Option<&Path>,
    image: &str,
    subcommand: &str,
    target: &str,
    extra: &[String],
) -> Vec<String> {
    let container_profiles = format!("{}/profiles", CONTAINER_WORKDIR);

    let mut args: Vec<String> = vec![
        "run".into(),
        "--rm".into(),
        "-v".into(),
        profiles_mount.into(),
        "-e".into(),
        format!("DBT_PROFILES_DIR={}", container_profiles),
        "-e".into(),
        format!("DBT_PROJECT_DIR={}", CONTAINER_WORKDIR),
        "-w".into(),
        CONTAINER_WORKDIR.into(),
    ];

    if let Some(env_file) = env_file {
        args.push("--env-file".into());
        args.push(env_file.display().to_string());
    }

    args.push(image.into());
    args.push("dbt".into());
    args.extend(subcommand.split_whitespace().map(String::from));
    args.extend([
        "--target".into(),
        target.into(),
        "--profiles-dir".into(),
        container_profiles,
    ]);
    args.extend(extra.iter().cloned());
    args
}

/// Render a host path for a docker `-v` mount.
///
/// Docker Desktop on Windows expects forward slashes and `/c`-style drive
/// prefixes.
fn host_path(path: &Path, platform: Platform) -> String {
    let raw = path.display().to_string();
    if platform != Platform::Windows {
        return raw;
    }
    let forward = raw.replace('\\', "/");
    let mut chars = forward.chars();
    match (chars.next(), chars.next()) {
        (Some(drive), Some(':')) if drive.is_ascii_alphabetic() => {
            format!("/{}{}", drive.to_ascii_lowercase(), chars.collect::<String>())
        }
        _ => forward,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_path_is_unchanged_on_unix() {
        let path = Path::new("/work/proj/profiles");
        assert_eq!(host_path(path, Platform::Linux), "/work/proj/profiles");
        assert_eq!(host_path(path, Platform::MacOs), "/work/proj/profiles");
    }

    #[test]
    fn host_path_converts_windows_drives() {
        let path = Path::new("C:\\Users\\dev\\proj\\profiles");
        assert_eq!(
            host_path(path, Platform::Windows),
            "/c/Users/dev/proj/profiles"
        );
    }

    #[test]
    fn host_path_leaves_driveless_windows_paths() {
        let path = Path::new("\\\\share\\proj");
        assert_eq!(host_path(path, Platform::Windows), "//share/proj");
    }

    #[test]
    fn container_args_forward_passthrough() {
        let extra = vec!["--select".to_string(), "orders".to_string()];
        let args = container_run_args(
            "/work/proj/profiles:/var/task/profiles",
            None,
            DEFAULT_IMAGE,
            "run",
            "dev",
            &extra,
        );

        let image_pos = args.iter().position(|a| a == DEFAULT_IMAGE).unwrap();
        let select_pos = args.iter().position(|a| a == "--select").unwrap();
        assert!(select_pos > image_pos);
        assert_eq!(args[select_pos + 1], "orders");
        assert_eq!(args.last().unwrap(), "orders");
    }

    #[test]
    fn container_args_include_env_file_when_present() {
        let args = container_run_args(
            "/p:/var/task/profiles",
            Some(Path::new("/work/proj/.env")),
            DEFAULT_IMAGE,
            "test",
            "prod",
            &[],
        );
        let flag_pos = args.iter().position(|a| a == "--env-file").unwrap();
        assert_eq!(args[flag_pos + 1], "/work/proj/.env");

        let without = container_run_args("/p:/var/task/profiles", None, DEFAULT_IMAGE, "test", "prod", &[]);
        assert!(!without.iter().any(|a| a == "--env-file"));
    }
}
