//! Command implementations.

pub mod completions;
pub mod dbt;
pub mod dispatcher;
pub mod docker;
pub mod github_actions;
pub mod info;
pub mod lint;
pub mod setup;
