//! Store owning the live table and the configuration it is rebuilt from.

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::builder::TableBuilder;
use crate::config::StoreConfig;
use crate::entity::{V4Entity, V6Entity};
use crate::error::Result;
use crate::meta::Meta;
use crate::stats::LoadStats;
use crate::table::Table;

/// In-memory IP range store.
///
/// Each [`Store::load_data`] or [`Store::update`] rebuilds the whole table
/// from the configured files and replaces the live one only once every
/// file has been read. A failed load leaves the previous table untouched.
///
/// The store itself is not synchronized; wrap it in
/// [`SharedStore`](crate::SharedStore) to reload while other threads search.
///
/// # Example
///
/// ```ignore
/// use ipgeo::{Store, StoreConfig};
///
/// let mut store = Store::new();
/// store.load_data(StoreConfig::new(["ipv6.txt", "ipv4.txt"]))?;
///
/// if let Some(meta) = store.search_str("1.30.13.90") {
///     println!("{}", meta);
/// }
/// ```
pub struct Store<E = ()> {
    config: StoreConfig<E>,
    table: Arc<Table<E>>,
}

impl<E> Store<E> {
    /// Create an empty store. Every search misses until a load succeeds.
    pub fn new() -> Self {
        Self {
            config: StoreConfig::default(),
            table: Arc::new(Table::empty()),
        }
    }

    /// Set the configuration and load it.
    ///
    /// Fails with a configuration error before any I/O when no files are
    /// given. The configuration is kept even if loading fails, so a later
    /// [`Store::update`] retries it.
    pub fn load_data(&mut self, config: StoreConfig<E>) -> Result<()> {
        config.validate()?;
        self.config = config;
        self.update()
    }

    /// Rebuild the table from the stored configuration.
    pub fn update(&mut self) -> Result<()> {
        self.config.validate()?;

        let mut builder = TableBuilder::new(self.config.enricher.clone());
        builder.read_files(&self.config.files)?;
        let table = builder.finish();

        let stats = table.stats();
        log::info!(
            "Loaded {} IPv4 and {} IPv6 ranges with {} distinct metadata from {} files ({} lines skipped)",
            stats.v4_entities,
            stats.v6_entities,
            stats.metas,
            stats.files,
            stats.skipped
        );

        self.table = Arc::new(table);
        Ok(())
    }

    /// Replace the data files used by later updates.
    ///
    /// An empty list is ignored.
    pub fn with_data_files<I, P>(&mut self, files: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let files: Vec<PathBuf> = files.into_iter().map(Into::into).collect();
        if !files.is_empty() {
            self.config.files = files;
        }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &StoreConfig<E> {
        &self.config
    }

    /// Find the metadata of the range containing `addr`.
    pub fn search(&self, addr: IpAddr) -> Option<&Arc<Meta<E>>> {
        self.table.search(addr)
    }

    /// Find the metadata of the range containing a textual address.
    pub fn search_str(&self, addr: &str) -> Option<&Arc<Meta<E>>> {
        self.table.search_str(addr)
    }

    /// Get the live table.
    pub fn table(&self) -> &Arc<Table<E>> {
        &self.table
    }

    /// Number of IPv4 entities.
    pub fn v4_count(&self) -> usize {
        self.table.v4_count()
    }

    /// Number of IPv6 entities.
    pub fn v6_count(&self) -> usize {
        self.table.v6_count()
    }

    /// Number of distinct metadata values.
    pub fn meta_count(&self) -> usize {
        self.table.meta_count()
    }

    /// Get the IPv4 entity at position `i`.
    pub fn v4_entity(&self, i: usize) -> Option<&V4Entity> {
        self.table.v4_entity(i)
    }

    /// Get the IPv6 entity at position `i`.
    pub fn v6_entity(&self, i: usize) -> Option<&V6Entity> {
        self.table.v6_entity(i)
    }

    /// Statistics of the last committed load.
    pub fn stats(&self) -> &LoadStats {
        self.table.stats()
    }
}

impl<E> Default for Store<E> {
    fn default() -> Self {
        Self::new()
    }
}
