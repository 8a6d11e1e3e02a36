use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Get the XDG data directory
///
/// Returns `$XDG_DATA_HOME` or `~/.local/share` if not set
pub fn data_dir() -> Result<PathBuf> {
    match env::var_os("XDG_DATA_HOME") {
        Some(base) if !base.is_empty() => Ok(PathBuf::from(base)),
        _ => Ok(home_dir()?.join(".local/share")),
    }
}

/// Get the home directory
pub fn home_dir() -> Result<PathBuf> {
    directories::BaseDirs::new()
        .context("Failed to get home directory")
        .map(|bd| bd.home_dir().to_path_buf())
}
