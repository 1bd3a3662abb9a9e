//! Store configuration.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::meta::Meta;
use crate::shared::{SharedStore, DEFAULT_CACHE_CAPACITY};

/// Callback producing the extension value of each distinct [`Meta`].
///
/// It is called once per distinct metadata per load, before the value is
/// stored, so the `extension` field of its argument is always `None`.
pub type Enricher<E> = Arc<dyn Fn(&Meta<E>) -> E + Send + Sync>;

/// Data files and enricher used by every load of a [`Store`](crate::Store).
pub struct StoreConfig<E = ()> {
    /// Range files, read in order into one table
    pub files: Vec<PathBuf>,
    /// Optional metadata enricher
    pub enricher: Option<Enricher<E>>,
}

impl<E> StoreConfig<E> {
    /// Create a configuration reading the given files.
    pub fn new<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
            enricher: None,
        }
    }

    /// Set the metadata enricher.
    pub fn with_enricher<F>(mut self, enricher: F) -> Self
    where
        F: Fn(&Meta<E>) -> E + Send + Sync + 'static,
    {
        self.enricher = Some(Arc::new(enricher));
        self
    }

    /// Replace the file list.
    pub fn with_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    /// Fails with [`Error::Config`] when no data file is configured.
    pub fn validate(&self) -> Result<()> {
        if self.files.is_empty() {
            return Err(Error::Config("no data files given".to_string()));
        }
        Ok(())
    }
}

impl<E> Clone for StoreConfig<E> {
    fn clone(&self) -> Self {
        Self {
            files: self.files.clone(),
            enricher: self.enricher.clone(),
        }
    }
}

impl<E> Default for StoreConfig<E> {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            enricher: None,
        }
    }
}

impl<E> fmt::Debug for StoreConfig<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("files", &self.files)
            .field("enricher", &self.enricher.is_some())
            .finish()
    }
}

/// Options file accepted by the command line tool.
///
/// ```yaml
/// files:
///   - /var/lib/ipgeo/ipv6.txt
///   - /var/lib/ipgeo/ipv4.txt.gz
/// cache_capacity: 50000
/// refresh_interval_secs: 3600
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StoreOptions {
    pub files: Vec<PathBuf>,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    #[serde(default)]
    pub refresh_interval_secs: Option<u64>,
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

impl StoreOptions {
    /// Parse options from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load options from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Store configuration for these files, without an enricher.
    pub fn store_config<E>(&self) -> StoreConfig<E> {
        StoreConfig::new(self.files.iter().cloned())
    }

    /// Empty shared store with the configured cache size. A size of 0
    /// disables the query cache.
    pub fn shared_store<E>(&self) -> SharedStore<E> {
        SharedStore::with_cache_capacity(self.cache_capacity)
    }

    /// Refresh interval, if periodic refresh is configured.
    pub fn refresh_interval(&self) -> Option<Duration> {
        self.refresh_interval_secs.map(Duration::from_secs)
    }
}
