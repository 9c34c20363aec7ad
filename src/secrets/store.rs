//! Secret store access.

use std::collections::BTreeMap;

use anyhow::{anyhow, Context};

use crate::error::Result;
use crate::shell::{self, ExecOptions};

/// Fetch-by-identifier interface over the secret store.
///
/// Implemented for real by [`AwsCliStore`]; tests inject an in-memory map.
pub trait SecretStore {
    /// Fetch a secret payload as key/value credential pairs.
    fn fetch(&self, secret_id: &str, region: &str) -> Result<BTreeMap<String, String>>;
}

/// Secret store backed by the AWS CLI.
///
/// Shells out to `aws secretsmanager get-secret-value` and parses the JSON
/// SecretString, keeping the secret store an opaque CLI collaborator like
/// every other external tool trestle drives.
#[derive(Debug, Default)]
pub struct AwsCliStore;

impl AwsCliStore {
    pub fn new() -> Self {
        Self
    }
}

impl SecretStore for AwsCliStore {
    fn fetch(&self, secret_id: &str, region: &str) -> Result<BTreeMap<String, String>> {
        let aws = shell::find_on_path("aws", &shell::parse_system_path())
            .ok_or_else(|| anyhow!("aws CLI not found in PATH"))?;

        let args = [
            "secretsmanager",
            "get-secret-value",
            "--secret-id",
            secret_id,
            "--region",
            region,
            "--query",
            "SecretString",
            "--output",
            "text",
        ];
        let result = shell::run(&aws, &args, &ExecOptions::captured(None))?;
        if !result.success {
            return Err(anyhow!(
                "aws secretsmanager get-secret-value exited with {:?}: {}",
                result.exit_code,
                result.stderr.trim()
            )
            .into());
        }

        parse_secret_string(&result.stdout)
    }
}

/// Parse a SecretString JSON object into string pairs.
///
/// Non-string JSON values are kept in their JSON rendering, matching how
/// they would be exported as environment variables.
pub fn parse_secret_string(payload: &str) -> Result<BTreeMap<String, String>> {
    let value: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(payload.trim()).context("secret payload is not a JSON object")?;

    Ok(value
        .into_iter()
        .map(|(key, val)| {
            let rendered = match val {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (key, rendered)
        })
        .collect())
}
