//! Path resolution for the config file and data directory.

use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::{default_config_path, default_data_dir, PillboxConfig};
use crate::constants::CONFIG_ENV;

/// Resolve the config file path, checking PILLBOX_CONFIG first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(CONFIG_ENV) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve the data directory.
///
/// Precedence: `--data` / `PILLBOX_DATA`, then `[data] path` from the config
/// file, then the XDG data directory.
pub fn resolve_data_dir(cli: &Cli, config: &PillboxConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.data.as_deref().filter(|p| !p.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = config.data.path.as_deref().filter(|p| !p.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }
    default_data_dir()
}
