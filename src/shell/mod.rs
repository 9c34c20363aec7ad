//! Subprocess execution and binary resolution.
//!
//! All external collaborators (dbt, docker, pip, pre-commit, sqlfluff, the
//! AWS CLI) are invoked through this module: argv-based, synchronous, no
//! shell interpolation, no timeout, no retry. Exit codes propagate verbatim.

pub mod exec;
pub mod lookup;

pub use exec::{run, ExecOptions, ExecResult};
pub use lookup::{docker_on_path, find_on_path, parse_system_path, resolve_program};
