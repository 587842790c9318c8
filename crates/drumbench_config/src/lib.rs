//! Parsing and validation of `drumbench.toml` bench configuration files.
//!
//! This crate reads the bench configuration file and produces a strongly-typed
//! [`BenchConfig`]. Every field has a default, so a missing or empty file
//! describes the stock drum-machine bench.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{find_config_dir, load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
