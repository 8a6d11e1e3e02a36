//! Migrations for data written by older releases.
//!
//! Before the central registry existed every stored directory carried its
//! own cache file (`.transpose.json` by default) recording where it came
//! from. Importing folds those into the registry so the entries can be
//! applied and restored like any other.
//!
//! Registries written before 2.2 lack the `created` and `enabled` entry
//! fields and are rejected by [`Registry::load`]; [`upgrade_registry`]
//! rewrites them in the current layout.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Result, TransposeError};
use crate::fs::check_path;
use crate::registry::Registry;

pub const DEFAULT_CACHE_FILENAME: &str = ".transpose.json";

/// Contents of a legacy cache file
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyCache {
    #[serde(default)]
    pub version: Option<String>,
    pub original_path: PathBuf,
}

impl LegacyCache {
    pub fn load(path: &Path) -> Result<Self> {
        read_json(path)
    }
}

/// Registry layout accepted by [`upgrade_registry`]
#[derive(Debug, Deserialize)]
struct OldRegistryFile {
    entries: BTreeMap<String, OldEntry>,
}

#[derive(Debug, Deserialize)]
struct OldEntry {
    path: PathBuf,
    #[serde(default)]
    created: Option<String>,
    #[serde(default)]
    enabled: Option<bool>,
}

/// Add an entry for every stored directory that carries a cache file
///
/// Only real directories directly inside `store_path` are considered. Names
/// already in the registry are skipped. Returns the names that were added,
/// in sorted order.
pub fn import(registry: &mut Registry, store_path: &Path, cache_filename: &str) -> Result<Vec<String>> {
    let mut candidates = Vec::new();
    let dir_entries =
        fs::read_dir(store_path).map_err(|err| TransposeError::io("read directory", store_path, err))?;

    for dir_entry in dir_entries {
        let dir_entry =
            dir_entry.map_err(|err| TransposeError::io("read directory", store_path, err))?;
        let path = dir_entry.path();
        if !check_path(&path, false) {
            continue;
        }

        let cache_path = path.join(cache_filename);
        if !cache_path.is_file() {
            continue;
        }

        let name = dir_entry.file_name().to_string_lossy().into_owned();
        candidates.push((name, cache_path));
    }
    candidates.sort();

    let mut imported = Vec::new();
    for (name, cache_path) in candidates {
        if registry.contains(&name) {
            debug!(name = %name, "already registered, skipping legacy cache");
            continue;
        }

        let cache = LegacyCache::load(&cache_path)?;
        debug!(
            name = %name,
            version = cache.version.as_deref().unwrap_or("unknown"),
            "importing legacy cache"
        );
        registry.add(name.as_str(), cache.original_path, None)?;
        imported.push(name);
    }

    info!(count = imported.len(), "imported legacy cache files");
    Ok(imported)
}

/// Rewrite the registry at `config_path` in the current layout
///
/// Entries missing `created` get the current time and entries missing
/// `enabled` are enabled. Existing values are kept. The file is re-stamped
/// with `version`. Returns the names of entries that needed filling in; a
/// missing file is left alone.
pub fn upgrade_registry(config_path: &Path, version: &str) -> Result<Vec<String>> {
    if !config_path.exists() {
        debug!(path = %config_path.display(), "no registry file to upgrade");
        return Ok(Vec::new());
    }

    let file: OldRegistryFile = read_json(config_path)?;
    let mut registry = Registry::new(version);
    let mut upgraded = Vec::new();

    for (name, entry) in file.entries {
        if entry.created.is_none() || entry.enabled.is_none() {
            debug!(name = %name, "filling in missing entry fields");
            upgraded.push(name.clone());
        }

        registry.add(name.as_str(), entry.path, entry.created)?;
        if entry.enabled == Some(false) {
            registry.disable(&name)?;
        }
    }

    registry.save(config_path)?;
    info!(
        path = %config_path.display(),
        count = upgraded.len(),
        "upgraded registry"
    );
    Ok(upgraded)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents =
        fs::read_to_string(path).map_err(|err| TransposeError::io("read", path, err))?;

    let value: serde_json::Value =
        serde_json::from_str(&contents).map_err(|err| TransposeError::InvalidFormat {
            path: path.to_path_buf(),
            err,
        })?;

    serde_json::from_value(value).map_err(|err| TransposeError::UnrecognizedFormat {
        path: path.to_path_buf(),
        err,
    })
}
