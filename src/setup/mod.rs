//! Environment setup and teardown.
//!
//! `trestle setup` takes a fresh checkout to a working development
//! environment: virtual environment, Python dependencies, dbt packages,
//! git hooks, configuration checks, and a smoke test. Each phase reports
//! through [`Output`] and the pipeline stops at the first fatal failure.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::anyhow;
use tracing::debug;

use crate::config;
use crate::context::ProjectContext;
use crate::dbt::DbtRunner;
use crate::error::{Result, TrestleError};
use crate::secrets::{self, SecretStore};
use crate::shell::{self, ExecOptions};
use crate::ui::Output;

/// Load `.env`, fetch credentials, and export the context's variables.
///
/// `.env` values and the derived context exports fill gaps without
/// overwriting what the process inherited; secret store values overwrite,
/// since the store is authoritative wherever it applies.
pub fn prepare_environment(
    ctx: &ProjectContext,
    store: &dyn SecretStore,
    out: &Output,
) -> Result<()> {
    let env_file = ctx.project_root().join(".env");
    let file_vars = config::load_env_file_optional(&env_file).map_err(TrestleError::Other)?;
    for (key, value) in file_vars {
        if std::env::var(&key).is_err() {
            std::env::set_var(&key, value);
        }
    }

    secrets::load_secrets(ctx, store, out);

    for (key, value) in ctx.env_vars() {
        if std::env::var(&key).is_err() {
            std::env::set_var(&key, value);
        }
    }

    secrets::validate_credentials(ctx, out);
    Ok(())
}

/// Create the virtual environment and install Python dependencies.
///
/// An existing venv is reused unless `force` is set or it is incomplete
/// (interpreter missing), in which case it is rebuilt from scratch.
pub fn install_python_dependencies(ctx: &ProjectContext, out: &Output, force: bool) -> Result<i32> {
    let venv_root = ctx.venv_root();
    let interpreter = ctx.python_executable();

    let rebuild = force || (venv_root.exists() && !interpreter.is_file());
    if rebuild && venv_root.exists() {
        out.info("removing existing virtual environment");
        std::fs::remove_dir_all(&venv_root)?;
    }

    if !venv_root.exists() {
        out.step("creating virtual environment");
        let python = system_python(ctx)?;
        let args = [
            "-m".to_string(),
            "venv".to_string(),
            venv_root.display().to_string(),
            "--upgrade-deps".to_string(),
        ];
        let result = shell::run(
            &python,
            &args,
            &ExecOptions::in_dir(ctx.project_root(), BTreeMap::new()),
        )?;
        if !result.success {
            out.error("virtual environment creation failed");
            return Ok(result.code());
        }
    } else {
        debug!("reusing existing virtual environment");
    }

    let requirements = ctx.project_root().join("requirements.txt");
    if !requirements.is_file() {
        out.warn("no requirements.txt; skipping Python dependency install");
        return Ok(0);
    }

    out.step("installing Python dependencies");
    let pip = ctx.pip_executable();
    let args = [
        "install".to_string(),
        "-r".to_string(),
        requirements.display().to_string(),
    ];
    let result = shell::run(
        &pip,
        &args,
        &ExecOptions::in_dir(ctx.project_root(), BTreeMap::new()),
    )?;
    if result.success {
        out.success("Python dependencies installed");
    }
    Ok(result.code())
}

/// Find a Python interpreter outside the virtual environment.
fn system_python(ctx: &ProjectContext) -> Result<std::path::PathBuf> {
    let entries = shell::parse_system_path();
    for name in ["python3", "python"] {
        if let Some(path) = shell::find_on_path(name, &entries) {
            // The venv's own interpreter cannot rebuild its venv.
            if !path.starts_with(ctx.venv_root()) {
                return Ok(path);
            }
        }
    }
    Err(TrestleError::MissingExecutable {
        name: "python3".to_string(),
    })
}

/// Install dbt packages through the runner.
pub fn install_dbt_packages(ctx: &ProjectContext, out: &Output, force: bool) -> Result<i32> {
    DbtRunner::new(ctx, out).deps(force)
}

/// Install the git hooks managed by pre-commit.
///
/// A missing pre-commit binary downgrades to a warning: hooks are a
/// convenience, not a requirement for running transformations.
pub fn setup_pre_commit_hooks(ctx: &ProjectContext, out: &Output) -> Result<i32> {
    let program = match shell::resolve_program(ctx, "pre-commit") {
        Ok(path) => path,
        Err(TrestleError::MissingExecutable { .. }) => {
            out.warn("pre-commit not installed; skipping git hooks");
            return Ok(0);
        }
        Err(err) => return Err(err),
    };

    out.step("installing git hooks");
    let result = shell::run(
        &program,
        &["install".to_string()],
        &ExecOptions::in_dir(ctx.project_root(), BTreeMap::new()),
    )?;
    Ok(result.code())
}

/// Check that the expected project files exist.
///
/// Returns the list of problems found; an empty list means the layout is
/// complete.
pub fn validate_config(ctx: &ProjectContext) -> Vec<String> {
    let root = ctx.project_root();
    let mut problems = Vec::new();

    let required: &[(&str, &str)] = &[
        ("dbt_project.yml", "dbt project definition"),
        ("profiles/profiles.yml", "connection profiles"),
        ("Dockerfile", "deployment image definition"),
    ];
    for (file, what) in required {
        if !root.join(file).is_file() {
            problems.push(format!("missing {} ({})", file, what));
        }
    }

    if !root.join(".env").is_file() {
        if root.join(".env.example").is_file() {
            problems.push("missing .env (copy .env.example to get started)".to_string());
        } else {
            problems.push("missing .env".to_string());
        }
    }

    problems
}

/// Smoke-test the environment: the project must parse; a compile failure
/// only warns since it may need live credentials.
pub fn initial_tests(ctx: &ProjectContext, out: &Output) -> Result<i32> {
    let runner = DbtRunner::new(ctx, out);

    let parse_code = runner.subcommand("parse", None, &[])?;
    if parse_code != 0 {
        out.error("project does not parse");
        return Ok(parse_code);
    }

    let compile_code = runner.subcommand("compile", None, &[])?;
    if compile_code != 0 {
        out.warn("compile failed; check warehouse credentials");
    }
    Ok(0)
}

/// Run the full setup pipeline.
pub fn complete(
    ctx: &ProjectContext,
    store: &dyn SecretStore,
    out: &Output,
    force_python: bool,
    force_dbt: bool,
    skip_tests: bool,
) -> Result<i32> {
    let problems = validate_config(ctx);
    for problem in &problems {
        out.warn(problem);
    }

    let code = install_python_dependencies(ctx, out, force_python)?;
    if code != 0 {
        return Ok(code);
    }

    prepare_environment(ctx, store, out)?;

    let code = install_dbt_packages(ctx, out, force_dbt)?;
    if code != 0 {
        return Ok(code);
    }

    let code = setup_pre_commit_hooks(ctx, out)?;
    if code != 0 {
        return Ok(code);
    }

    if !skip_tests {
        let code = initial_tests(ctx, out)?;
        if code != 0 {
            return Ok(code);
        }
    }

    display_summary(ctx, out, &problems);
    Ok(0)
}

/// Print the post-setup summary.
fn display_summary(ctx: &ProjectContext, out: &Output, problems: &[String]) {
    out.success("setup complete");
    out.plain(&format!("  context:     {}", ctx.describe()));
    out.plain(&format!("  dbt target:  {}", ctx.dbt_target()));
    out.plain(&format!("  venv:        {}", ctx.venv_root().display()));
    if problems.is_empty() {
        out.plain("  config:      complete");
    } else {
        out.plain(&format!("  config:      {} issue(s), see warnings", problems.len()));
    }
    out.plain("run `trestle compile` to verify the project builds");
}

/// Remove build artifacts and the virtual environment.
pub fn clean_environment(ctx: &ProjectContext, out: &Output) -> Result<i32> {
    // Best effort: dbt clean needs a working venv, which may be half-gone.
    let runner = DbtRunner::new(ctx, out);
    match runner.exec(&["clean".to_string()]) {
        Ok(0) => {}
        Ok(code) => debug!(code, "dbt clean exited nonzero"),
        Err(err) => debug!(%err, "dbt clean unavailable"),
    }

    remove_dir_if_present(ctx.project_root(), "target", out)?;
    remove_dir_if_present(ctx.project_root(), "dbt_packages", out)?;

    let venv_root = ctx.venv_root();
    if venv_root.exists() {
        out.step("removing virtual environment");
        std::fs::remove_dir_all(&venv_root)?;
    }

    out.success("environment cleaned");
    Ok(0)
}

fn remove_dir_if_present(root: &Path, name: &str, out: &Output) -> Result<()> {
    let dir = root.join(name);
    if dir.is_dir() {
        out.info(&format!("removing {}", name));
        std::fs::remove_dir_all(&dir).map_err(|err| anyhow!("could not remove {}: {}", name, err))?;
    }
    Ok(())
}
