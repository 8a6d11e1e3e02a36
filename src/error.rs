use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Every failure the core can report.
///
/// All variants are user-facing conditions; the command layer prints them
/// verbatim after a `Transpose Error:` prefix.
#[derive(Debug, Error)]
pub enum TransposeError {
    #[error("'{name}' already exists")]
    AlreadyExists { name: String },

    /// Names must be a single plain path component inside the store.
    #[error("Invalid entry name: '{name}'")]
    InvalidName { name: String },

    #[error("'{name}' does not exist in Transpose config entries")]
    NotFound { name: String },

    #[error("Entry is disabled (force required): '{name}'")]
    Disabled { name: String },

    /// The original location is occupied by something other than a symlink.
    #[error("Entry path already exists, cannot {action} (force required): '{}'", path.display())]
    PathConflict { action: &'static str, path: PathBuf },

    #[error("Store path already exists: '{}'", path.display())]
    StoreConflict { path: PathBuf },

    #[error("Source path does not exist: '{}'", path.display())]
    SourceMissing { path: PathBuf },

    #[error("Stored entry does not exist: '{}'", path.display())]
    StoreMissing { path: PathBuf },

    /// A force backup would clobber an earlier `.backup`.
    #[error("Backup path already exists, refusing to overwrite: '{}'", path.display())]
    BackupExists { path: PathBuf },

    #[error("Invalid JSON format for '{}': {err}", path.display())]
    InvalidFormat { path: PathBuf, err: serde_json::Error },

    #[error("Unrecognized Transpose config file format for '{}': {err}", path.display())]
    UnrecognizedFormat { path: PathBuf, err: serde_json::Error },

    #[error("Unknown entry field '{field}' (expected one of: path, enabled)")]
    UnknownField { field: String },

    #[error("Invalid value for '{field}': '{value}'")]
    InvalidValue { field: &'static str, value: String },

    // Causes are part of the message, not `source()`.
    #[error("{context}: {err}")]
    Io { context: String, err: io::Error },

    #[error("Failed to serialize Transpose config: {0}")]
    Serialize(serde_json::Error),
}

impl TransposeError {
    /// Wrap an I/O failure with the operation and path that produced it.
    pub(crate) fn io(action: &str, path: &Path, err: io::Error) -> Self {
        Self::Io {
            context: format!("Failed to {action} '{}'", path.display()),
            err,
        }
    }
}

/// Result alias used throughout the core.
pub type Result<T, E = TransposeError> = std::result::Result<T, E>;
