//! Thread-safe store facade with hot reload support.
//!
//! This module provides a store wrapper with:
//! - Lock-free lookups against the last committed table
//! - Serialized reloads that swap the table atomically once fully built
//! - An optional cache for query results

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use quick_cache::sync::Cache;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::StoreConfig;
use crate::error::Result;
use crate::meta::Meta;
use crate::protocol::{classify, classify_str, IpKey};
use crate::stats::LoadStats;
use crate::store::Store;
use crate::table::Table;

/// Default cache capacity (number of entries).
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

type CacheKey = (u64, IpKey);

/// Store shared between searching threads and a reloading thread.
///
/// Searches read the committed table without taking a lock. Loads and
/// updates are serialized; each one builds a complete table and then
/// publishes it with a single atomic swap, so a search sees either the old
/// table or the new one, never a mix. In-flight searches finish on the
/// table they started with.
///
/// # Example
///
/// ```ignore
/// use ipgeo::{SharedStore, StoreConfig};
/// use std::sync::Arc;
///
/// let store = Arc::new(SharedStore::new());
/// store.load(StoreConfig::new(["ipv4.txt"]))?;
///
/// let meta = store.search("1.30.13.90");
///
/// // From a maintenance thread:
/// store.update_files(["ipv4-next.txt"])?;
/// ```
pub struct SharedStore<E = ()> {
    /// Writer side; held for the whole reload.
    store: Mutex<Store<E>>,
    /// Committed table, replaced atomically on reload.
    current: ArcSwap<Table<E>>,
    /// Cache for query results, keyed by generation.
    cache: Option<Cache<CacheKey, Option<Arc<Meta<E>>>>>,
    /// Maximum number of cached results; 0 when caching is off.
    cache_capacity: usize,
    /// Generation counter, incremented after each published table.
    generation: AtomicU64,
}

impl<E> SharedStore<E> {
    /// Create an empty shared store caching up to
    /// [`DEFAULT_CACHE_CAPACITY`] results.
    pub fn new() -> Self {
        Self::with_cache_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Create an empty shared store caching up to `capacity` results.
    ///
    /// A capacity of 0 disables the query cache.
    pub fn with_cache_capacity(capacity: usize) -> Self {
        Self {
            store: Mutex::new(Store::new()),
            current: ArcSwap::from_pointee(Table::empty()),
            cache: (capacity > 0).then(|| Cache::new(capacity)),
            cache_capacity: capacity,
            generation: AtomicU64::new(0),
        }
    }

    /// Set the configuration and load it.
    pub fn load(&self, config: StoreConfig<E>) -> Result<()> {
        let mut store = self.store.lock();
        store.load_data(config)?;
        self.publish(&store);
        Ok(())
    }

    /// Reload from the stored configuration.
    pub fn update(&self) -> Result<()> {
        let mut store = self.store.lock();
        store.update()?;
        self.publish(&store);
        Ok(())
    }

    /// Replace the data files, then reload.
    ///
    /// An empty list keeps the current files.
    pub fn update_files<I, P>(&self, files: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut store = self.store.lock();
        store.with_data_files(files);
        store.update()?;
        self.publish(&store);
        Ok(())
    }

    /// Reload only if the last committed load is older than `interval`.
    ///
    /// Returns `true` if the table was reloaded.
    pub fn update_if_needed(&self, interval: Duration) -> Result<bool> {
        if self.current.load().stats().needs_update(interval) {
            self.update()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Find the metadata of the range containing a textual address.
    ///
    /// Text that is not an IP address finds nothing.
    pub fn search(&self, addr: &str) -> Option<Arc<Meta<E>>> {
        classify_str(addr).and_then(|key| self.search_key(key))
    }

    /// Find the metadata of the range containing `addr`.
    pub fn search_addr(&self, addr: IpAddr) -> Option<Arc<Meta<E>>> {
        self.search_key(classify(addr))
    }

    fn search_key(&self, key: IpKey) -> Option<Arc<Meta<E>>> {
        let cache = match self.cache {
            Some(ref cache) => cache,
            None => return self.current.load().search_key(key).cloned(),
        };

        // Generation before table: a result is never cached under a
        // generation newer than the table it came from.
        let cache_key = (self.generation.load(Ordering::SeqCst), key);
        if let Some(result) = cache.get(&cache_key) {
            return result;
        }

        let result = self.current.load().search_key(key).cloned();
        self.cache_result(cache, cache_key, &result);
        result
    }

    /// Cache `result` unless a reload was published since `cache_key`'s
    /// generation was read. That reload already cleared the cache, and an
    /// entry under the old generation could never be read again.
    fn cache_result(
        &self,
        cache: &Cache<CacheKey, Option<Arc<Meta<E>>>>,
        cache_key: CacheKey,
        result: &Option<Arc<Meta<E>>>,
    ) {
        if self.generation.load(Ordering::SeqCst) == cache_key.0 {
            cache.insert(cache_key, result.clone());
        }
    }

    /// Get the committed table.
    ///
    /// The returned table stays valid, but may be stale, after a reload.
    pub fn table(&self) -> Arc<Table<E>> {
        self.current.load_full()
    }

    /// Statistics of the last committed load.
    pub fn stats(&self) -> LoadStats {
        self.current.load().stats().clone()
    }

    /// Get the current generation (incremented on each reload).
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Clear the cache.
    pub fn clear_cache(&self) {
        if let Some(ref cache) = self.cache {
            cache.clear();
        }
    }

    /// Get cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        if let Some(ref cache) = self.cache {
            CacheStats {
                capacity: self.cache_capacity,
                len: cache.len(),
                enabled: true,
            }
        } else {
            CacheStats {
                capacity: 0,
                len: 0,
                enabled: false,
            }
        }
    }

    fn publish(&self, store: &Store<E>) {
        self.current.store(store.table().clone());
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.clear_cache();
        log::debug!("Published table generation {}", self.generation());
    }
}

impl<E> Default for SharedStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    /// Maximum cache capacity.
    pub capacity: usize,
    /// Current number of entries in the cache.
    pub len: usize,
    /// Whether caching is enabled.
    pub enabled: bool,
}
