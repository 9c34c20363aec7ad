//! The resolved project context.
//!
//! [`ProjectContext`] is the immutable configuration snapshot the rest of
//! trestle consumes. Platform, execution context, and environment are
//! detected exactly once at construction and never change; every derived
//! value below is a total, idempotent function of those three enums plus the
//! project root.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::detection::ExecutionContext;
use super::environment::Environment;
use super::mode::ExecutionMode;
use super::platform::Platform;

/// Virtual environment directory name inside the project root.
const VENV_DIR: &str = "transform";

/// Fixed project mount point inside containers.
const CONTAINER_TASK_DIR: &str = "/var/task";

/// Secret store namespace prefix.
const SECRET_NAMESPACE: &str = "ellen-young-yt";

/// Default AWS region when `AWS_REGION` is unset.
const DEFAULT_AWS_REGION: &str = "us-east-2";

/// Immutable runtime context, resolved once per process.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    platform: Platform,
    context: ExecutionContext,
    environment: Environment,
    project_root: PathBuf,
}

impl ProjectContext {
    /// Detect and resolve the full context.
    ///
    /// `env_override` is the `--env` flag value; invalid overrides fall
    /// through the resolution chain rather than failing.
    pub fn resolve(env_override: Option<&str>) -> Self {
        let start = std::env::current_dir().unwrap_or_default();
        Self::resolve_from(env_override, &start)
    }

    /// Detect and resolve, searching for the project root from `start`.
    pub fn resolve_from(env_override: Option<&str>, start: &Path) -> Self {
        let platform = Platform::detect();
        let context = ExecutionContext::detect();
        let environment = Environment::determine(env_override, context);
        let project_root = find_project_root(start);

        tracing::debug!(
            platform = %platform,
            context = %context,
            environment = %environment,
            root = %project_root.display(),
            "resolved project context"
        );

        Self {
            platform,
            context,
            environment,
            project_root,
        }
    }

    /// Build a context from already-resolved parts (for testing).
    pub fn from_parts(
        platform: Platform,
        context: ExecutionContext,
        environment: Environment,
        project_root: PathBuf,
    ) -> Self {
        Self {
            platform,
            context,
            environment,
            project_root,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn execution_context(&self) -> ExecutionContext {
        self.context
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// dbt profiles directory: a fixed container path in Docker/ECS,
    /// project-relative otherwise.
    pub fn profiles_dir(&self) -> PathBuf {
        if self.context.in_container() {
            PathBuf::from(CONTAINER_TASK_DIR).join("profiles")
        } else {
            self.project_root.join("profiles")
        }
    }

    /// dbt project directory.
    pub fn project_dir(&self) -> PathBuf {
        if self.context.in_container() {
            PathBuf::from(CONTAINER_TASK_DIR)
        } else {
            self.project_root.clone()
        }
    }

    /// Binary directory of the project virtual environment.
    pub fn venv_path(&self) -> PathBuf {
        let bin = if self.platform.uses_exe_suffix() {
            "Scripts"
        } else {
            "bin"
        };
        self.project_root.join(VENV_DIR).join(bin)
    }

    /// Root directory of the project virtual environment.
    pub fn venv_root(&self) -> PathBuf {
        self.project_root.join(VENV_DIR)
    }

    /// Path of an executable inside the virtual environment.
    ///
    /// In containerized contexts the image's own tools are on PATH, so this
    /// returns the bare name instead.
    pub fn venv_executable(&self, name: &str) -> PathBuf {
        if self.context.in_container() {
            return PathBuf::from(name);
        }
        let file = if self.platform.uses_exe_suffix() {
            format!("{}.exe", name)
        } else {
            name.to_string()
        };
        self.venv_path().join(file)
    }

    pub fn dbt_executable(&self) -> PathBuf {
        self.venv_executable("dbt")
    }

    pub fn python_executable(&self) -> PathBuf {
        self.venv_executable("python")
    }

    pub fn pip_executable(&self) -> PathBuf {
        self.venv_executable("pip")
    }

    pub fn sqlfluff_executable(&self) -> PathBuf {
        self.venv_executable("sqlfluff")
    }

    /// The dbt target profile for the current environment.
    ///
    /// Staging reuses the `test` target; changing this would select a
    /// different profile in the external configuration.
    pub fn dbt_target(&self) -> &'static str {
        match self.environment {
            Environment::Dev => "dev",
            Environment::Staging => "test",
            Environment::Prod => "prod",
        }
    }

    /// Docker service name for the current environment.
    ///
    /// Production uses the unsuffixed base name.
    pub fn docker_service_name(&self, base: &str) -> String {
        match self.environment {
            Environment::Dev => format!("{}-dev", base),
            Environment::Staging => format!("{}-test", base),
            Environment::Prod => base.to_string(),
        }
    }

    /// Secret store identifier for the current environment's credentials.
    pub fn secret_id(&self) -> String {
        format!(
            "{}/{}/snowflake/credentials",
            SECRET_NAMESPACE,
            self.environment.as_str()
        )
    }

    /// AWS region, honoring the `AWS_REGION` override.
    pub fn aws_region(&self) -> String {
        self.aws_region_with(|key| std::env::var(key))
    }

    /// AWS region with an injected env lookup (for testing).
    pub fn aws_region_with<F>(&self, env_fn: F) -> String
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        env_fn("AWS_REGION").unwrap_or_else(|_| DEFAULT_AWS_REGION.to_string())
    }

    /// Environment variables exported to every child process.
    pub fn env_vars(&self) -> BTreeMap<String, String> {
        let mut vars = BTreeMap::new();
        vars.insert(
            "DBT_PROFILES_DIR".to_string(),
            self.profiles_dir().display().to_string(),
        );
        vars.insert(
            "DBT_PROJECT_DIR".to_string(),
            self.project_dir().display().to_string(),
        );
        vars.insert("DBT_TARGET".to_string(), self.dbt_target().to_string());
        vars.insert(
            "ENVIRONMENT".to_string(),
            self.environment.as_str().to_string(),
        );
        vars.insert(
            "EXECUTION_CONTEXT".to_string(),
            self.context.as_str().to_string(),
        );
        vars.insert("PLATFORM".to_string(), self.platform.as_str().to_string());
        vars
    }

    /// Whether docker execution is available from this context.
    pub fn supports_docker(&self) -> bool {
        ExecutionMode::supports_docker(self.context, crate::shell::docker_on_path())
    }

    /// Resolve the per-operation execution mode against this context.
    pub fn execution_mode(&self, requested: Option<&str>) -> crate::error::Result<ExecutionMode> {
        ExecutionMode::resolve(requested, self.context, crate::shell::docker_on_path())
    }

    /// Human-readable one-line description.
    pub fn describe(&self) -> String {
        format!(
            "{} platform in {} context ({})",
            self.platform,
            self.context,
            self.environment.as_str().to_uppercase()
        )
    }
}

/// Locate the project root by walking up from `start` looking for
/// `dbt_project.yml`. Falls back to `start` itself.
pub fn find_project_root(start: &Path) -> PathBuf {
    for dir in start.ancestors() {
        if dir.join("dbt_project.yml").is_file() {
            return dir.to_path_buf();
        }
    }
    start.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(
        platform: Platform,
        context: ExecutionContext,
        environment: Environment,
    ) -> ProjectContext {
        ProjectContext::from_parts(platform, context, environment, PathBuf::from("/work/proj"))
    }

    #[test]
    fn profiles_dir_is_container_path_in_docker_and_ecs() {
        for context in [ExecutionContext::Docker, ExecutionContext::Ecs] {
            let c = ctx(Platform::Linux, context, Environment::Dev);
            assert_eq!(c.profiles_dir(), PathBuf::from("/var/task/profiles"));
            assert_eq!(c.project_dir(), PathBuf::from("/var/task"));
        }
    }

    #[test]
    fn profiles_dir_is_project_relative_elsewhere() {
        for context in [ExecutionContext::Local, ExecutionContext::GithubActions] {
            let c = ctx(Platform::Linux, context, Environment::Dev);
            assert_eq!(c.profiles_dir(), PathBuf::from("/work/proj/profiles"));
            assert_eq!(c.project_dir(), PathBuf::from("/work/proj"));
        }
    }

    #[test]
    fn venv_layout_differs_by_platform() {
        let linux = ctx(Platform::Linux, ExecutionContext::Local, Environment::Dev);
        assert_eq!(linux.venv_path(), PathBuf::from("/work/proj/transform/bin"));
        assert_eq!(
            linux.dbt_executable(),
            PathBuf::from("/work/proj/transform/bin/dbt")
        );

        let windows = ctx(Platform::Windows, ExecutionContext::Local, Environment::Dev);
        assert_eq!(
            windows.venv_path(),
            PathBuf::from("/work/proj/transform/Scripts")
        );
        assert_eq!(
            windows.dbt_executable(),
            PathBuf::from("/work/proj/transform/Scripts/dbt.exe")
        );
    }

    #[test]
    fn venv_executable_is_bare_name_in_containers() {
        let c = ctx(Platform::Linux, ExecutionContext::Ecs, Environment::Prod);
        assert_eq!(c.dbt_executable(), PathBuf::from("dbt"));
        assert_eq!(c.sqlfluff_executable(), PathBuf::from("sqlfluff"));
    }

    #[test]
    fn dbt_target_staging_reuses_test() {
        assert_eq!(
            ctx(Platform::Linux, ExecutionContext::Local, Environment::Dev).dbt_target(),
            "dev"
        );
        assert_eq!(
            ctx(Platform::Linux, ExecutionContext::Local, Environment::Staging).dbt_target(),
            "test"
        );
        assert_eq!(
            ctx(Platform::Linux, ExecutionContext::Local, Environment::Prod).dbt_target(),
            "prod"
        );
    }

    #[test]
    fn docker_service_name_suffixes() {
        let dev = ctx(Platform::Linux, ExecutionContext::Local, Environment::Dev);
        let staging = ctx(Platform::Linux, ExecutionContext::Local, Environment::Staging);
        let prod = ctx(Platform::Linux, ExecutionContext::Local, Environment::Prod);
        assert_eq!(dev.docker_service_name("svc"), "svc-dev");
        assert_eq!(staging.docker_service_name("svc"), "svc-test");
        assert_eq!(prod.docker_service_name("svc"), "svc");
    }

    #[test]
    fn secret_id_is_environment_namespaced() {
        let staging = ctx(Platform::Linux, ExecutionContext::Local, Environment::Staging);
        assert_eq!(
            staging.secret_id(),
            "ellen-young-yt/staging/snowflake/credentials"
        );
    }

    #[test]
    fn aws_region_honors_override() {
        let c = ctx(Platform::Linux, ExecutionContext::Local, Environment::Dev);
        let region = c.aws_region_with(|key| {
            if key == "AWS_REGION" {
                Ok("eu-west-1".to_string())
            } else {
                Err(std::env::VarError::NotPresent)
            }
        });
        assert_eq!(region, "eu-west-1");

        let region = c.aws_region_with(|_| Err(std::env::VarError::NotPresent));
        assert_eq!(region, "us-east-2");
    }

    #[test]
    fn env_vars_cover_all_exports() {
        let c = ctx(Platform::Linux, ExecutionContext::Docker, Environment::Staging);
        let vars = c.env_vars();
        assert_eq!(vars.get("DBT_PROFILES_DIR").unwrap(), "/var/task/profiles");
        assert_eq!(vars.get("DBT_PROJECT_DIR").unwrap(), "/var/task");
        assert_eq!(vars.get("DBT_TARGET").unwrap(), "test");
        assert_eq!(vars.get("ENVIRONMENT").unwrap(), "staging");
        assert_eq!(vars.get("EXECUTION_CONTEXT").unwrap(), "docker");
        assert_eq!(vars.get("PLATFORM").unwrap(), "linux");
    }

    #[test]
    fn accessors_are_idempotent() {
        let c = ctx(Platform::MacOs, ExecutionContext::Local, Environment::Prod);
        assert_eq!(c.profiles_dir(), c.profiles_dir());
        assert_eq!(c.dbt_target(), c.dbt_target());
        assert_eq!(c.docker_service_name("x"), c.docker_service_name("x"));
        assert_eq!(c.secret_id(), c.secret_id());
        assert_eq!(c.env_vars(), c.env_vars());
    }

    #[test]
    fn describe_mentions_all_three_enums() {
        let c = ctx(Platform::Linux, ExecutionContext::Local, Environment::Staging);
        let text = c.describe();
        assert!(text.contains("linux"));
        assert!(text.contains("local"));
        assert!(text.contains("STAGING"));
    }

    #[test]
    fn find_project_root_walks_up_to_marker() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("dbt_project.yml"), "name: proj\n").unwrap();
        let nested = temp.path().join("models").join("staging");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&nested), temp.path());
    }

    #[test]
    fn find_project_root_falls_back_to_start() {
        let temp = tempfile::TempDir::new().unwrap();
        assert_eq!(find_project_root(temp.path()), temp.path());
    }
}
