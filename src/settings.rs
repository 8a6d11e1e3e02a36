use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::transpose::Transpose;
use crate::util::{expand_path, xdg};

/// Registry file name inside the store
pub const CONFIG_FILENAME: &str = "transpose.json";

const STORE_DIR_NAME: &str = "transpose";

/// Resolved runtime settings
///
/// Built once per invocation from CLI flags and environment variables and
/// passed down explicitly.
#[derive(Debug, Clone)]
pub struct Settings {
    store_path: PathBuf,
    version: String,
}

impl Settings {
    /// Resolve settings, falling back to `$XDG_DATA_HOME/transpose` when no
    /// store path is given
    pub fn new(store_path: Option<&str>) -> Result<Self> {
        let store_path = match store_path {
            Some(raw) => expand_path(raw)?,
            None => Self::default_store_path()?,
        };

        Ok(Self {
            store_path,
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    pub fn default_store_path() -> Result<PathBuf> {
        Ok(xdg::data_dir()?.join(STORE_DIR_NAME))
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    pub fn config_path(&self) -> PathBuf {
        self.store_path.join(CONFIG_FILENAME)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Open the store these settings point at
    pub fn open(&self) -> Result<Transpose> {
        let config_path = self.config_path();
        Transpose::open(&config_path, self.version.as_str())
            .with_context(|| format!("Failed to open store {:?}", self.store_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_store_path() {
        let settings = Settings::new(Some("/mnt/store")).unwrap();
        assert_eq!(settings.store_path(), Path::new("/mnt/store"));
        assert_eq!(
            settings.config_path(),
            PathBuf::from("/mnt/store/transpose.json")
        );
        assert_eq!(settings.version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    #[serial]
    fn test_default_store_path_uses_xdg_data_home() {
        let temp = TempDir::new().unwrap();
        let original = env::var_os("XDG_DATA_HOME");
        env::set_var("XDG_DATA_HOME", temp.path());

        let settings = Settings::new(None).unwrap();
        assert_eq!(settings.store_path(), temp.path().join("transpose"));

        match original {
            Some(value) => env::set_var("XDG_DATA_HOME", value),
            None => env::remove_var("XDG_DATA_HOME"),
        }
    }

    #[test]
    fn test_open_creates_store() {
        let temp = TempDir::new().unwrap();
        let store = temp.path().join("store");
        let settings = Settings::new(Some(store.to_str().unwrap())).unwrap();

        let transpose = settings.open().unwrap();

        assert!(store.is_dir());
        assert_eq!(transpose.config_path(), store.join("transpose.json"));
        assert_eq!(transpose.registry().version(), env!("CARGO_PKG_VERSION"));
    }
}
