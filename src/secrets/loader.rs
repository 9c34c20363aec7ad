//! Credential loading and key normalization.

use std::collections::BTreeMap;

use tracing::debug;

use crate::context::{Environment, ProjectContext};
use crate::secrets::SecretStore;
use crate::ui::Output;

/// Decide whether credentials should be fetched from the secret store.
///
/// Dev runs against local credentials by default; setting
/// `USE_AWS_SECRETS=true` opts in. Staging and Prod always fetch.
pub fn should_load_secrets(environment: Environment) -> bool {
    should_load_secrets_with(environment, |key| std::env::var(key))
}

pub fn should_load_secrets_with<F>(environment: Environment, env_fn: F) -> bool
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    if environment == Environment::Dev {
        return env_fn("USE_AWS_SECRETS")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
    }
    true
}

/// Map a secret payload key to its environment variable name.
///
/// Keys the warehouse driver expects under specific names get those names;
/// everything else is exported as `SNOWFLAKE_<KEY>` uppercased.
pub fn normalize_keys(raw: BTreeMap<String, String>) -> BTreeMap<String, String> {
    raw.into_iter()
        .map(|(key, value)| {
            let name = match key.to_lowercase().as_str() {
                "private_key" | "privatekey" => "SNOWFLAKE_PRIVATE_KEY".to_string(),
                "private_key_passphrase" | "passphrase" => {
                    "SNOWFLAKE_PRIVATE_KEY_PASSPHRASE".to_string()
                }
                _ => format!("SNOWFLAKE_{}", key.to_uppercase()),
            };
            (name, value)
        })
        .collect()
}

/// Fetch credentials from the store and export them into the process
/// environment. Store values overwrite anything already set: where the
/// store applies (staging, prod, opted-in dev) it is the source of truth,
/// and inherited shell values must not shadow a rotated credential.
///
/// Returns whether credentials were loaded. Failures are downgraded to
/// warnings: a broken store connection must not block local work.
pub fn load_secrets(ctx: &ProjectContext, store: &dyn SecretStore, out: &Output) -> bool {
    if !should_load_secrets(ctx.environment()) {
        debug!("skipping secret store in dev (set USE_AWS_SECRETS=true to opt in)");
        return false;
    }

    let secret_id = ctx.secret_id();
    let region = ctx.aws_region();
    out.info(&format!("loading credentials from {}", secret_id));

    match store.fetch(&secret_id, &region) {
        Ok(raw) => {
            let normalized = normalize_keys(raw);
            let exported = normalized.len();
            for (name, value) in normalized {
                std::env::set_var(&name, value);
            }
            debug!(exported, "credentials loaded from secret store");
            true
        }
        Err(err) => {
            out.warn(&format!(
                "could not load credentials from {}: {}",
                secret_id, err
            ));
            out.warn("continuing with credentials from .env");
            false
        }
    }
}

/// Warn about missing warehouse credentials.
///
/// Only a warning: some commands (compile, lint) work without a live
/// connection, and the warehouse itself gives the authoritative error.
pub fn validate_credentials(ctx: &ProjectContext, out: &Output) {
    let missing: Vec<&str> = ["SNOWFLAKE_ACCOUNT", "SNOWFLAKE_USER"]
        .into_iter()
        .filter(|name| std::env::var(name).is_err())
        .collect();

    if missing.is_empty() {
        return;
    }

    out.warn(&format!(
        "missing Snowflake credentials: {}",
        missing.join(", ")
    ));
    match ctx.environment() {
        Environment::Dev => out.warn("add them to .env (see .env.example)"),
        _ => out.warn(&format!(
            "check the secret store entry {} in {}",
            ctx.secret_id(),
            ctx.aws_region()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Result<String, std::env::VarError> {
        let map: std::collections::HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned().ok_or(std::env::VarError::NotPresent)
    }

    #[test]
    fn dev_skips_secrets_by_default() {
        assert!(!should_load_secrets_with(Environment::Dev, make_env(&[])));
    }

    #[test]
    fn dev_opts_in_with_flag() {
        // opt-in value matches case-insensitively
        for value in ["true", "True", "TRUE"] {
            assert!(should_load_secrets_with(
                Environment::Dev,
                make_env(&[("USE_AWS_SECRETS", value)])
            ));
        }
        assert!(!should_load_secrets_with(
            Environment::Dev,
            make_env(&[("USE_AWS_SECRETS", "yes")])
        ));
    }

    #[test]
    fn staging_and_prod_always_load() {
        assert!(should_load_secrets_with(Environment::Staging, make_env(&[])));
        assert!(should_load_secrets_with(Environment::Prod, make_env(&[])));
    }

    #[test]
    fn normalizes_private_key_aliases() {
        let raw: BTreeMap<String, String> = [
            ("private_key".to_string(), "pem".to_string()),
            ("passphrase".to_string(), "pw".to_string()),
        ]
        .into();
        let normalized = normalize_keys(raw);
        assert_eq!(normalized.get("SNOWFLAKE_PRIVATE_KEY").unwrap(), "pem");
        assert_eq!(
            normalized.get("SNOWFLAKE_PRIVATE_KEY_PASSPHRASE").unwrap(),
            "pw"
        );
    }

    #[test]
    fn normalizes_alternate_aliases() {
        let raw: BTreeMap<String, String> = [
            ("privateKey".to_string(), "pem".to_string()),
            ("private_key_passphrase".to_string(), "pw".to_string()),
        ]
        .into();
        let normalized = normalize_keys(raw);
        assert!(normalized.contains_key("SNOWFLAKE_PRIVATE_KEY"));
        assert!(normalized.contains_key("SNOWFLAKE_PRIVATE_KEY_PASSPHRASE"));
    }

    #[test]
    fn prefixes_other_keys() {
        let raw: BTreeMap<String, String> = [
            ("account".to_string(), "abc123".to_string()),
            ("warehouse".to_string(), "loading".to_string()),
        ]
        .into();
        let normalized = normalize_keys(raw);
        assert_eq!(normalized.get("SNOWFLAKE_ACCOUNT").unwrap(), "abc123");
        assert_eq!(normalized.get("SNOWFLAKE_WAREHOUSE").unwrap(), "loading");
    }

    #[test]
    fn store_values_overwrite_inherited_vars() {
        use crate::context::{ExecutionContext, Platform, ProjectContext};
        use crate::ui::{Output, OutputMode};
        use std::path::PathBuf;

        struct FixedStore(BTreeMap<String, String>);
        impl crate::secrets::SecretStore for FixedStore {
            fn fetch(&self, _: &str, _: &str) -> crate::error::Result<BTreeMap<String, String>> {
                Ok(self.0.clone())
            }
        }

        // Variable name unique to this test so parallel tests can't race it.
        std::env::set_var("SNOWFLAKE_LOADER_OVERWRITE_CHECK", "stale");

        let ctx = ProjectContext::from_parts(
            Platform::Linux,
            ExecutionContext::Local,
            Environment::Prod,
            PathBuf::from("/work/proj"),
        );
        let store = FixedStore(
            [("loader_overwrite_check".to_string(), "rotated".to_string())].into(),
        );
        let out = Output::new(OutputMode::Quiet);

        assert!(load_secrets(&ctx, &store, &out));
        assert_eq!(
            std::env::var("SNOWFLAKE_LOADER_OVERWRITE_CHECK").unwrap(),
            "rotated"
        );
        std::env::remove_var("SNOWFLAKE_LOADER_OVERWRITE_CHECK");
    }

    #[test]
    fn already_prefixed_keys_are_not_double_prefixed() {
        // payloads written with full variable names come through uppercased
        let raw: BTreeMap<String, String> =
            [("ACCOUNT".to_string(), "abc".to_string())].into();
        let normalized = normalize_keys(raw);
        assert!(normalized.contains_key("SNOWFLAKE_ACCOUNT"));
    }
}
