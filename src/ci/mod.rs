//! CI pipeline integration.

pub mod github;

pub use github::{ActionsConfig, OutputSinks};
