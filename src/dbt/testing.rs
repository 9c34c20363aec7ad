//! Unit and integration test orchestration.
//!
//! Unit tests gate merges and run everywhere; integration tests exercise the
//! warehouse and run only where credentials exist. Anomaly monitoring and
//! freshness checks are advisory, so their failures warn instead of failing
//! the suite.

use tracing::debug;

use crate::context::{Platform, ProjectContext};
use crate::dbt::DbtRunner;
use crate::error::{Result, TrestleError};
use crate::lint;
use crate::shell::{self, ExecOptions};
use crate::ui::Output;

pub struct TestSuite<'a> {
    ctx: &'a ProjectContext,
    out: &'a Output,
}

impl<'a> TestSuite<'a> {
    pub fn new(ctx: &'a ProjectContext, out: &'a Output) -> Self {
        Self { ctx, out }
    }

    /// Run the unit suite: lint hooks, a parse check, then dbt tests.
    ///
    /// A parse failure means broken project code; nothing after it can give
    /// a meaningful result, so the suite short-circuits.
    pub fn unit(&self, target: Option<&str>, mode: Option<&str>) -> Result<i32> {
        let runner = DbtRunner::new(self.ctx, self.out);

        self.out.step("running pre-commit hooks");
        let hook_code = lint::pre_commit(self.ctx, self.out, false)?;
        if hook_code != 0 {
            self.out.error("pre-commit hooks failed");
            return Ok(hook_code);
        }

        self.out.step("parsing project");
        let parse_code = runner.subcommand("parse", target, &[])?;
        if parse_code != 0 {
            self.out.error("project does not parse");
            return Ok(parse_code);
        }

        let code = runner.subcommand_with_mode("test", target, mode, &[])?;
        if code == 0 {
            self.out.success("unit tests passed");
        }
        Ok(code)
    }

    /// Run the integration suite against the environment's warehouse target.
    pub fn integration(&self, target: Option<&str>, mode: Option<&str>) -> Result<i32> {
        let runner = DbtRunner::new(self.ctx, self.out);

        let code = runner.subcommand_with_mode("test", target, mode, &[])?;
        if code != 0 {
            self.out.error("integration tests failed");
            return Ok(code);
        }

        // Advisory checks; never fail the suite.
        self.run_anomaly_monitor();
        if let Err(err) = runner.source_freshness(target) {
            self.out
                .warn(&format!("source freshness check errored: {}", err));
        }

        self.out.success("integration tests passed");
        Ok(0)
    }

    /// Run unit then integration, short-circuiting on unit failure.
    pub fn all(&self, target: Option<&str>, mode: Option<&str>) -> Result<i32> {
        let unit_code = self.unit(target, mode)?;
        if unit_code != 0 {
            return Ok(unit_code);
        }
        self.integration(target, mode)
    }

    /// Run the Elementary anomaly monitor if its `edr` binary is installed.
    ///
    /// Elementary does not ship Windows wheels, so the check is skipped
    /// there. All failures warn only.
    fn run_anomaly_monitor(&self) {
        if self.ctx.platform() == Platform::Windows {
            debug!("skipping anomaly monitor on windows");
            return;
        }

        let edr = match shell::resolve_program(self.ctx, "edr") {
            Ok(path) => path,
            Err(TrestleError::MissingExecutable { .. }) => {
                debug!("edr not installed; skipping anomaly monitor");
                return;
            }
            Err(err) => {
                self.out.warn(&format!("anomaly monitor unavailable: {}", err));
                return;
            }
        };

        let mut args = vec!["monitor".to_string(), "--test".to_string(), "true".to_string()];
        if let Ok(webhook) = std::env::var("ELEMENTARY_SLACK_WEBHOOK") {
            if !webhook.is_empty() {
                args.push("--slack-webhook".to_string());
                args.push(webhook);
            }
        }

        self.out.step("running anomaly monitor");
        let options = ExecOptions::in_dir(self.ctx.project_root(), self.ctx.env_vars());
        match shell::run(&edr, &args, &options) {
            Ok(result) if !result.success => {
                self.out
                    .warn(&format!("anomaly monitor reported issues ({})", result.code()));
            }
            Ok(_) => {}
            Err(err) => self.out.warn(&format!("anomaly monitor errored: {}", err)),
        }
    }
}
