//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::BenchConfig;
use drumbench_common::Mode;
use std::path::{Path, PathBuf};

/// Name of the bench configuration file.
pub const CONFIG_FILE_NAME: &str = "drumbench.toml";

/// Loads and validates a `drumbench.toml` configuration from a bench directory.
///
/// Reads `<bench_dir>/drumbench.toml`, parses it, and validates its values.
pub fn load_config(bench_dir: &Path) -> Result<BenchConfig, ConfigError> {
    let config_path = bench_dir.join(CONFIG_FILE_NAME);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `drumbench.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<BenchConfig, ConfigError> {
    let config: BenchConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Walks up from `start` looking for a directory containing `drumbench.toml`.
pub fn find_config_dir(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE_NAME).is_file())
        .map(Path::to_path_buf)
}

/// Validates that configuration values are consistent.
fn validate_config(config: &BenchConfig) -> Result<(), ConfigError> {
    for (field, name) in [
        ("images.kick", &config.images.kick),
        ("images.clap", &config.images.clap),
        ("images.hihat", &config.images.hihat),
        ("images.snare", &config.images.snare),
    ] {
        if name.is_empty() {
            return Err(ConfigError::MissingField(field.to_string()));
        }
    }

    validate_priority(&config.controller.priority)?;

    if config.sample.latency == 0 {
        return Err(ConfigError::ValidationError(
            "sample.latency must be at least 1".to_string(),
        ));
    }

    let top = &config.top;
    if top.window == 0 || top.window > u32::from(u16::MAX) {
        return Err(ConfigError::ValidationError(format!(
            "top.window must be between 1 and {}, got {}",
            u16::MAX,
            top.window
        )));
    }
    if top.samples == 0 {
        return Err(ConfigError::ValidationError(
            "top.samples must be at least 1".to_string(),
        ));
    }
    top.fast_clock
        .toggle_modulus(top.slow_clock)
        .map_err(|e| ConfigError::ValidationError(format!("top clocks: {e}")))?;

    Ok(())
}

/// Checks that `priority` names every mode exactly once with EDIT last.
fn validate_priority(priority: &[Mode]) -> Result<(), ConfigError> {
    let is_permutation =
        priority.len() == Mode::ALL.len() && Mode::ALL.iter().all(|m| priority.contains(m));
    if !is_permutation {
        return Err(ConfigError::ValidationError(
            "controller.priority must name edit, play and raw exactly once".to_string(),
        ));
    }
    if priority.last() != Some(&Mode::Edit) {
        return Err(ConfigError::ValidationError(
            "controller.priority must rank edit lowest".to_string(),
        ));
    }
    Ok(())
}
