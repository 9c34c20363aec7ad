//! Linting wrappers for pre-commit and sqlfluff.
//!
//! Both tools come from the project virtual environment, falling back to
//! PATH. Exit codes are returned verbatim so CI can gate on them.

use tracing::debug;

use crate::context::ProjectContext;
use crate::error::Result;
use crate::shell::{self, ExecOptions};
use crate::ui::Output;

/// Directories linted when no explicit paths are given.
const DEFAULT_SQL_PATHS: &[&str] = &["models", "tests", "macros"];

/// Run all configured pre-commit hooks across the repository.
pub fn pre_commit(ctx: &ProjectContext, out: &Output, fix: bool) -> Result<i32> {
    let program = shell::resolve_program(ctx, "pre-commit")?;

    // pre-commit fixes in place when hooks support it; without --fix we ask
    // for a check-only pass via the SKIP-free default and report findings.
    let mut args = vec!["run".to_string(), "--all-files".to_string()];
    if !fix {
        args.push("--show-diff-on-failure".to_string());
    }

    debug!(fix, "running pre-commit");
    out.info(&format!("pre-commit {}", args.join(" ")));
    let options = ExecOptions::in_dir(ctx.project_root(), ctx.env_vars());
    let result = shell::run(&program, &args, &options)?;
    Ok(result.code())
}

/// Lint SQL sources with sqlfluff.
///
/// With `fix` the violations that sqlfluff can rewrite are fixed in place;
/// otherwise a nonzero exit produces a hint to rerun with `--fix`.
pub fn sqlfluff(ctx: &ProjectContext, out: &Output, fix: bool, paths: &[String]) -> Result<i32> {
    let program = shell::resolve_program(ctx, "sqlfluff")?;

    let mut args = vec![if fix { "fix" } else { "lint" }.to_string()];
    if paths.is_empty() {
        args.extend(
            DEFAULT_SQL_PATHS
                .iter()
                .filter(|dir| ctx.project_root().join(dir).is_dir())
                .map(|dir| dir.to_string()),
        );
    } else {
        args.extend(paths.iter().cloned());
    }

    out.step(&format!("sqlfluff {}", args.join(" ")));
    let options = ExecOptions::in_dir(ctx.project_root(), ctx.env_vars());
    let result = shell::run(&program, &args, &options)?;

    if !result.success && !fix {
        out.warn("sqlfluff found violations; rerun with --fix to auto-correct");
    }
    Ok(result.code())
}

/// Run every linter, reporting the worst exit code.
pub fn all(ctx: &ProjectContext, out: &Output, fix: bool) -> Result<i32> {
    let hook_code = pre_commit(ctx, out, fix)?;
    let sql_code = sqlfluff(ctx, out, fix, &[])?;

    let worst = hook_code.max(sql_code);
    if worst == 0 {
        out.success("all linters passed");
    }
    Ok(worst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_cover_sql_sources() {
        assert!(DEFAULT_SQL_PATHS.contains(&"models"));
        assert!(DEFAULT_SQL_PATHS.contains(&"tests"));
        assert!(DEFAULT_SQL_PATHS.contains(&"macros"));
    }
}
