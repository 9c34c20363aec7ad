//! Local configuration files.
//!
//! trestle's configuration is almost entirely environment-variable driven;
//! the only file it reads is the project `.env`, parsed here.

pub mod env_file;

pub use env_file::{load_env_file, load_env_file_optional, parse_env_file};
