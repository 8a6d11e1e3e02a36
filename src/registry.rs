use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::error::{Result, TransposeError};

/// A single stored relocation: where `name` originally lived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    name: String,
    path: PathBuf,
    created: String,
    enabled: bool,
}

impl Entry {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Original location of the entry, replaced by a symlink while stored
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn created(&self) -> &str {
        &self.created
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Entry fields that may be changed after creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Path,
    Enabled,
}

impl EntryField {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryField::Path => "path",
            EntryField::Enabled => "enabled",
        }
    }
}

impl FromStr for EntryField {
    type Err = TransposeError;

    fn from_str(key: &str) -> Result<Self> {
        match key.to_lowercase().as_str() {
            "path" => Ok(EntryField::Path),
            "enabled" => Ok(EntryField::Enabled),
            _ => Err(TransposeError::UnknownField {
                field: key.to_string(),
            }),
        }
    }
}

/// Registry of stored entries, persisted as `transpose.json` in the store
///
/// Entries are keyed by name and always iterated in name order.
#[derive(Debug, Clone, Serialize)]
pub struct Registry {
    version: String,
    entries: BTreeMap<String, Entry>,
}

/// On-disk shape accepted by [`Registry::load`]
#[derive(Debug, Deserialize)]
struct RegistryFile {
    entries: BTreeMap<String, StoredEntry>,
}

#[derive(Debug, Deserialize)]
struct StoredEntry {
    path: PathBuf,
    created: String,
    enabled: bool,
}

impl Registry {
    /// Create an empty registry stamped with the producing version
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Load a registry from disk
    ///
    /// A missing file yields an empty registry. The returned registry carries
    /// `version`, not whatever version the file was written by.
    pub fn load(path: &Path, version: impl Into<String>) -> Result<Self> {
        let mut registry = Self::new(version);

        if !path.exists() {
            debug!(path = %path.display(), "no registry file, starting empty");
            return Ok(registry);
        }

        let contents =
            fs::read_to_string(path).map_err(|err| TransposeError::io("read", path, err))?;

        let value: serde_json::Value =
            serde_json::from_str(&contents).map_err(|err| TransposeError::InvalidFormat {
                path: path.to_path_buf(),
                err,
            })?;

        let file: RegistryFile =
            serde_json::from_value(value).map_err(|err| TransposeError::UnrecognizedFormat {
                path: path.to_path_buf(),
                err,
            })?;

        for (name, stored) in file.entries {
            registry.add(name.as_str(), stored.path, Some(stored.created))?;
            if !stored.enabled {
                registry.disable(&name)?;
            }
        }

        debug!(
            path = %path.display(),
            entries = registry.len(),
            "loaded registry"
        );

        Ok(registry)
    }

    /// Save the registry as JSON, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| TransposeError::io("create directory", parent, err))?;
        }

        let contents = serde_json::to_string_pretty(self).map_err(TransposeError::Serialize)?;
        fs::write(path, contents).map_err(|err| TransposeError::io("write", path, err))?;

        debug!(path = %path.display(), entries = self.len(), "saved registry");
        Ok(())
    }

    /// Add a new, enabled entry. `created` defaults to now.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        created: Option<String>,
    ) -> Result<()> {
        let name = name.into();
        validate_name(&name)?;
        if self.entries.contains_key(&name) {
            return Err(TransposeError::AlreadyExists { name });
        }

        let entry = Entry {
            name: name.clone(),
            path: path.into(),
            created: created.unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
            enabled: true,
        };
        self.entries.insert(name, entry);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Entry> {
        self.entries.get(name).ok_or_else(|| not_found(name))
    }

    pub fn remove(&mut self, name: &str) -> Result<Entry> {
        self.entries.remove(name).ok_or_else(|| not_found(name))
    }

    /// Set one updatable field from its textual value
    pub fn update(&mut self, name: &str, field: EntryField, value: &str) -> Result<()> {
        let entry = self.get_mut(name)?;
        match field {
            EntryField::Path => entry.path = PathBuf::from(value),
            EntryField::Enabled => entry.enabled = parse_bool(field, value)?,
        }
        Ok(())
    }

    pub fn enable(&mut self, name: &str) -> Result<()> {
        self.get_mut(name)?.enabled = true;
        Ok(())
    }

    pub fn disable(&mut self, name: &str) -> Result<()> {
        self.get_mut(name)?.enabled = false;
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterate over all entries in name order
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Entry names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Entry> {
        self.entries.get_mut(name).ok_or_else(|| not_found(name))
    }
}

/// Check that `name` is exactly one normal path component, so
/// `store_path.join(name)` stays directly inside the store.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name => Ok(()),
        _ => Err(TransposeError::InvalidName {
            name: name.to_string(),
        }),
    }
}

fn not_found(name: &str) -> TransposeError {
    TransposeError::NotFound {
        name: name.to_string(),
    }
}

fn parse_bool(field: EntryField, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(TransposeError::InvalidValue {
            field: field.as_str(),
            value: value.to_string(),
        }),
    }
}
