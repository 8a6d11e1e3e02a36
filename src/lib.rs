// Public API
pub mod cli;
pub mod commands;

// Core domain types
mod error;
mod fs;
mod legacy;
mod registry;
mod settings;
mod transpose;
mod ui;
mod util;

// Re-export main types
pub use error::{Result, TransposeError};
pub use legacy::{upgrade_registry, LegacyCache, DEFAULT_CACHE_FILENAME};
pub use registry::{Entry, EntryField, Registry};
pub use settings::{Settings, CONFIG_FILENAME};
pub use transpose::{ApplyReport, Transpose};
