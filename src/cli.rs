use clap::{Parser, Subcommand};

use crate::legacy::DEFAULT_CACHE_FILENAME;

/// Transpose - Move and symlink a path for easy, central management
///
/// transpose moves a directory into a central store and leaves a symlink
/// in its place. Stored entries are tracked in `transpose.json` inside the
/// store so they can be re-linked on a new machine or moved back later.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The location to store the moved entities
    ///
    /// Defaults to $XDG_DATA_HOME/transpose (~/.local/share/transpose).
    #[arg(
        short,
        long,
        global = true,
        value_name = "PATH",
        env = "TRANSPOSE_STORE_PATH"
    )]
    pub store_path: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Move target and create symlink in place
    Store {
        /// The path to the directory that should be moved to storage
        #[arg(value_name = "TARGET_PATH")]
        target_path: String,

        /// The name of the directory that will be created in the store path
        /// (defaults to the last component of TARGET_PATH)
        #[arg(value_name = "NAME")]
        name: Option<String>,
    },

    /// Recreate the symlink for an entry (useful after moving store locations)
    Apply {
        /// The name of the stored entry to apply
        #[arg(value_name = "NAME")]
        name: String,

        /// If the original path already exists, move it to <path>.backup and continue
        #[arg(long)]
        force: bool,
    },

    /// Recreate the symlink for all entries
    #[command(name = "apply-all")]
    ApplyAll {
        /// If the original path already exists, move it to <path>.backup and continue
        #[arg(long)]
        force: bool,
    },

    /// Move a stored entry back to its original location
    Restore {
        /// The name of the stored entry to restore
        #[arg(value_name = "NAME")]
        name: String,

        /// If the original path already exists, move it to <path>.backup and continue
        #[arg(long)]
        force: bool,
    },

    /// Modify the transpose config file without any filesystem changes
    #[command(subcommand)]
    Config(ConfigAction),
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Add an entry manually to the transpose config
    Add {
        /// The name of the entry in the store path
        #[arg(value_name = "NAME")]
        name: String,

        /// The path of the directory that should be symlinked to the store
        #[arg(value_name = "PATH")]
        path: String,
    },

    /// Retrieve the settings of a specific entry, such as the path
    Get {
        /// The name of the entry in the store path
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// List the names of all entries in the transpose config
    List,

    /// Remove an entry from the config
    Remove {
        /// The name of the entry in the store path
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Update a field of an entry (path or enabled)
    Update {
        /// The name of the entry in the store path
        #[arg(value_name = "NAME")]
        name: String,

        /// The config key to be updated
        #[arg(value_name = "FIELD_KEY")]
        field_key: String,

        /// The value to set
        #[arg(value_name = "FIELD_VALUE")]
        field_value: String,
    },

    /// Enable an entry so apply and restore act on it
    Enable {
        /// The name of the entry in the store path
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Disable an entry; apply and restore then require --force
    Disable {
        /// The name of the entry in the store path
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Register stored directories that still carry a per-directory cache file
    #[command(name = "import-legacy")]
    ImportLegacy {
        /// Name of the cache file inside each stored directory
        #[arg(
            long,
            value_name = "FILENAME",
            env = "TRANSPOSE_CACHE_FILENAME",
            default_value = DEFAULT_CACHE_FILENAME
        )]
        cache_filename: String,
    },

    /// Rewrite a registry from an older release, filling in missing entry fields
    Upgrade,
}
