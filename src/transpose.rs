use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{Result, TransposeError};
use crate::fs::{backup_path, exists_or_dangling, move_path, remove, symlink};
use crate::legacy;
use crate::registry::{validate_name, Entry, Registry};

/// Outcome of applying a single entry during [`Transpose::apply_all`]
#[derive(Debug)]
pub struct ApplyReport {
    pub name: String,
    pub result: Result<()>,
}

impl ApplyReport {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Transpose - moves entries in and out of the store
///
/// The store is the directory holding the registry file; every entry lives
/// at `store_path/<name>` while stored.
#[derive(Debug)]
pub struct Transpose {
    registry: Registry,
    config_path: PathBuf,
    store_path: PathBuf,
}

impl Transpose {
    /// Open the store whose registry lives at `config_path`
    ///
    /// A missing registry file is treated as empty, and the store directory
    /// is created if needed.
    pub fn open(config_path: impl Into<PathBuf>, version: impl Into<String>) -> Result<Self> {
        let config_path = config_path.into();
        let registry = Registry::load(&config_path, version)?;
        let store_path = match config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        if !store_path.exists() {
            debug!(path = %store_path.display(), "creating store directory");
            fs::create_dir_all(&store_path)
                .map_err(|err| TransposeError::io("create directory", &store_path, err))?;
        }

        Ok(Self {
            registry,
            config_path,
            store_path,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access for registry-only edits; call [`Transpose::save`] after
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Where the content of `name` lives while stored
    pub fn stored_path(&self, name: &str) -> PathBuf {
        self.store_path.join(name)
    }

    pub fn save(&self) -> Result<()> {
        self.registry.save(&self.config_path)
    }

    /// Move `source_path` into the store as `name` and leave a symlink behind
    pub fn store(&mut self, name: &str, source_path: &Path) -> Result<()> {
        validate_name(name)?;
        if self.registry.contains(name) {
            return Err(TransposeError::AlreadyExists {
                name: name.to_string(),
            });
        }

        let storage_path = self.stored_path(name);
        if exists_or_dangling(&storage_path) {
            return Err(TransposeError::StoreConflict { path: storage_path });
        }

        if !source_path.exists() {
            return Err(TransposeError::SourceMissing {
                path: source_path.to_path_buf(),
            });
        }

        move_path(source_path, &storage_path)?;
        symlink(&storage_path, source_path)?;

        self.registry.add(name, source_path, None)?;
        self.save()?;

        info!(
            name = %name,
            path = %source_path.display(),
            store = %storage_path.display(),
            "stored entry"
        );
        Ok(())
    }

    /// Create or recreate the symlink for a stored entry
    pub fn apply(&self, name: &str, force: bool) -> Result<()> {
        let entry = self.usable_entry(name, force)?;
        let entry_path = entry.path();

        clear_entry_path(entry_path, "apply", force)?;
        symlink(&self.stored_path(name), entry_path)?;

        info!(name = %name, path = %entry_path.display(), "applied entry");
        Ok(())
    }

    /// Apply every entry in name order, collecting failures instead of
    /// stopping at the first one
    pub fn apply_all(&self, force: bool) -> Vec<ApplyReport> {
        self.registry
            .names()
            .into_iter()
            .map(|name| {
                let result = self.apply(&name, force);
                if let Err(err) = &result {
                    debug!(name = %name, error = %err, "apply failed");
                }
                ApplyReport { name, result }
            })
            .collect()
    }

    /// Move a stored entry back to its original path and forget it
    pub fn restore(&mut self, name: &str, force: bool) -> Result<()> {
        let entry_path = self.usable_entry(name, force)?.path().to_path_buf();

        let storage_path = self.stored_path(name);
        if !exists_or_dangling(&storage_path) {
            return Err(TransposeError::StoreMissing { path: storage_path });
        }

        clear_entry_path(&entry_path, "restore", force)?;
        move_path(&storage_path, &entry_path)?;

        self.registry.remove(name)?;
        self.save()?;

        info!(name = %name, path = %entry_path.display(), "restored entry");
        Ok(())
    }

    /// Register directories left behind by the per-directory cache layout
    pub fn import_legacy(&mut self, cache_filename: &str) -> Result<Vec<String>> {
        let imported = legacy::import(&mut self.registry, &self.store_path, cache_filename)?;
        if !imported.is_empty() {
            self.save()?;
        }
        Ok(imported)
    }

    fn usable_entry(&self, name: &str, force: bool) -> Result<&Entry> {
        let entry = self.registry.get(name)?;
        if !entry.is_enabled() && !force {
            return Err(TransposeError::Disabled {
                name: name.to_string(),
            });
        }
        Ok(entry)
    }
}

/// Make room at an entry's original path.
///
/// Symlinks are always removed. Anything else is moved to `<path>.backup`
/// when forced, and is a conflict otherwise.
fn clear_entry_path(entry_path: &Path, action: &'static str, force: bool) -> Result<()> {
    if entry_path.is_symlink() {
        return remove(entry_path);
    }

    if !entry_path.exists() {
        return Ok(());
    }

    if !force {
        return Err(TransposeError::PathConflict {
            action,
            path: entry_path.to_path_buf(),
        });
    }

    let backup = backup_path(entry_path);
    if exists_or_dangling(&backup) {
        return Err(TransposeError::BackupExists { path: backup });
    }

    warn!(
        path = %entry_path.display(),
        backup = %backup.display(),
        "path already exists, moving it aside"
    );
    move_path(entry_path, &backup)
}
