//! Runtime context detection and resolution.
//!
//! This is the decision-making core of trestle. Everything else in the
//! repository assembles argument lists and dispatches subprocesses; this
//! module determines *which* arguments and *whether* a dispatch is legal:
//!
//! - [`Platform`] - host operating system (detected once)
//! - [`ExecutionContext`] - local shell, Docker, GitHub Actions, or ECS
//!   (detected once, fixed signal precedence)
//! - [`Environment`] - dev / staging / prod (resolved once through the
//!   override → env var → CI heuristics → default chain)
//! - [`ExecutionMode`] - native vs. containerized dbt execution (requested
//!   per operation, validated against the detected context)
//! - [`ProjectContext`] - the immutable snapshot combining all of the above
//!   with total accessors for every derived path and value
//!
//! Detection runs exactly once, at [`ProjectContext`] construction. The
//! snapshot is then passed by reference to every consumer; there is no
//! global state and no re-detection.

pub mod detection;
pub mod environment;
pub mod mode;
pub mod platform;
pub mod resolver;

pub use detection::ExecutionContext;
pub use environment::Environment;
pub use mode::ExecutionMode;
pub use platform::Platform;
pub use resolver::ProjectContext;
