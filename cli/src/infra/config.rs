//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::KfoConfig;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "KFO_CONFIG";

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
pub struct YamlConfigStore {
    path: Option<PathBuf>,
}

impl YamlConfigStore {
    /// Store reading `path`, or `$KFO_CONFIG` when `path` is `None`.
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// File this store reads, if any.
    #[must_use]
    pub fn path(&self) -> Option<PathBuf> {
        self.path
            .clone()
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<KfoConfig> {
        let Some(path) = self.path() else {
            return Ok(KfoConfig::default());
        };
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }
}
