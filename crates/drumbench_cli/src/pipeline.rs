//! Shared helpers for CLI commands: locating and loading the bench configuration.

use std::path::{Path, PathBuf};

use drumbench_config::{find_config_dir, load_config, load_config_from_str, BenchConfig};

use crate::GlobalArgs;

/// Loads the bench configuration and the directory image paths resolve against.
///
/// With `--config`, a file is loaded directly and its parent becomes the
/// root; a directory must contain `drumbench.toml`. Without it, the nearest
/// `drumbench.toml` above the current directory is used, falling back to the
/// built-in defaults rooted at the current directory.
pub fn resolve_bench(global: &GlobalArgs) -> Result<(BenchConfig, PathBuf), Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        return load_from(Path::new(config_path));
    }
    let cwd = std::env::current_dir()?;
    match find_config_dir(&cwd) {
        Some(dir) => {
            tracing::debug!(dir = %dir.display(), "using bench configuration");
            Ok((load_config(&dir)?, dir))
        }
        None => {
            tracing::info!("no drumbench.toml found, using default configuration");
            Ok((BenchConfig::default(), cwd))
        }
    }
}

fn load_from(path: &Path) -> Result<(BenchConfig, PathBuf), Box<dyn std::error::Error>> {
    if path.is_file() {
        let content = std::fs::read_to_string(path)?;
        let config = load_config_from_str(&content)?;
        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok((config, root))
    } else {
        Ok((load_config(path)?, path.to_path_buf()))
    }
}
