pub mod xdg;

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Expand `~` and environment variables in `raw`, then make it absolute
/// against the current directory.
///
/// Symlinks are not resolved; the path is recorded the way the user wrote it.
pub fn expand_path(raw: &str) -> Result<PathBuf> {
    let expanded =
        shellexpand::full(raw).with_context(|| format!("Failed to expand path '{raw}'"))?;

    std::path::absolute(expanded.as_ref())
        .with_context(|| format!("Failed to resolve path '{expanded}'"))
}
