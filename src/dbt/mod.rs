//! dbt CLI invocation and test orchestration.

pub mod runner;
pub mod testing;

pub use runner::DbtRunner;
pub use testing::TestSuite;
