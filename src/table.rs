//! Committed lookup table.

use std::net::IpAddr;
use std::sync::Arc;

use crate::entity::{floor_search, V4Entity, V6Entity};
use crate::meta::Meta;
use crate::protocol::{classify, classify_str, IpKey};
use crate::stats::LoadStats;

/// One consistent generation of the two entity lists and the metadata list.
///
/// A table is never modified after it is built; a reload produces a new one.
pub struct Table<E = ()> {
    v4: Vec<V4Entity>,
    v6: Vec<V6Entity>,
    metas: Vec<Arc<Meta<E>>>,
    stats: LoadStats,
}

impl<E> Table<E> {
    pub(crate) fn new(
        v4: Vec<V4Entity>,
        v6: Vec<V6Entity>,
        metas: Vec<Arc<Meta<E>>>,
        stats: LoadStats,
    ) -> Self {
        Self {
            v4,
            v6,
            metas,
            stats,
        }
    }

    /// A table with no entries; every lookup misses.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new(), LoadStats::default())
    }

    /// Find the metadata of the range containing `addr`.
    ///
    /// The range is the one whose start is the greatest start not above
    /// `addr`. End address and netmask columns are not consulted.
    pub fn search(&self, addr: IpAddr) -> Option<&Arc<Meta<E>>> {
        self.search_key(classify(addr))
    }

    /// Like [`Table::search`] for a textual address.
    ///
    /// Text that is not an IP address finds nothing.
    pub fn search_str(&self, addr: &str) -> Option<&Arc<Meta<E>>> {
        classify_str(addr).and_then(|key| self.search_key(key))
    }

    /// Find the metadata for an already derived key.
    pub fn search_key(&self, key: IpKey) -> Option<&Arc<Meta<E>>> {
        let meta_index = match key {
            IpKey::V4(key) => floor_search(&self.v4, key)?.meta_index(),
            IpKey::V6(key) => floor_search(&self.v6, key)?.meta_index(),
        };
        self.metas.get(meta_index as usize)
    }

    /// Number of IPv4 entities.
    pub fn v4_count(&self) -> usize {
        self.v4.len()
    }

    /// Number of IPv6 entities.
    pub fn v6_count(&self) -> usize {
        self.v6.len()
    }

    /// Number of distinct metadata values.
    pub fn meta_count(&self) -> usize {
        self.metas.len()
    }

    /// Returns `true` if the table has no entities at all.
    pub fn is_empty(&self) -> bool {
        self.v4.is_empty() && self.v6.is_empty()
    }

    /// Get the IPv4 entity at position `i`.
    pub fn v4_entity(&self, i: usize) -> Option<&V4Entity> {
        self.v4.get(i)
    }

    /// Get the IPv6 entity at position `i`.
    pub fn v6_entity(&self, i: usize) -> Option<&V6Entity> {
        self.v6.get(i)
    }

    /// Get the metadata at position `i`.
    pub fn meta(&self, i: usize) -> Option<&Arc<Meta<E>>> {
        self.metas.get(i)
    }

    /// Iterate the distinct metadata values in insertion order.
    pub fn metas(&self) -> impl Iterator<Item = &Arc<Meta<E>>> {
        self.metas.iter()
    }

    /// Statistics of the load that built this table.
    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }
}

impl<E> Default for Table<E> {
    fn default() -> Self {
        Self::empty()
    }
}
