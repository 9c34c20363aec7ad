//! Credential loading from the secret store.
//!
//! The secret store is an external collaborator consumed as an opaque
//! fetch-by-identifier interface ([`SecretStore`]), so the loading logic is
//! testable without network access. Fetch failures are never fatal: they are
//! logged as warnings and execution continues with whatever credentials the
//! `.env` file provided.

pub mod loader;
pub mod store;

pub use loader::{load_secrets, normalize_keys, should_load_secrets, validate_credentials};
pub use store::{AwsCliStore, SecretStore};
