//! Trestle - environment-aware orchestration for dbt projects.
//!
//! Trestle replaces the ad-hoc shell scripts around a dbt data
//! transformation project with one CLI that resolves its execution context
//! once (platform, execution context, deployment environment) and drives
//! every external tool from that snapshot.
//!
//! # Modules
//!
//! - [`ci`] - GitHub Actions output emission
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - `.env` file parsing
//! - [`context`] - Platform, context, and environment resolution
//! - [`dbt`] - dbt invocation and test orchestration
//! - [`docker`] - Image builds and containerized runs
//! - [`error`] - Error types and result aliases
//! - [`lint`] - pre-commit and sqlfluff wrappers
//! - [`secrets`] - Credential loading from the secret store
//! - [`setup`] - Environment setup and teardown
//! - [`shell`] - Process execution and executable resolution
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use trestle::context::{Environment, ExecutionContext};
//!
//! // Branch names resolve to deployment environments.
//! let env = Environment::from_branch("main");
//! assert_eq!(env, Environment::Prod);
//!
//! // The execution context knows whether it is already containerized.
//! assert!(ExecutionContext::Ecs.in_container());
//! ```

pub mod ci;
pub mod cli;
pub mod config;
pub mod context;
pub mod dbt;
pub mod docker;
pub mod error;
pub mod lint;
pub mod secrets;
pub mod setup;
pub mod shell;
pub mod ui;

pub use error::{Result, TrestleError};
