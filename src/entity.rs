//! Indexed entities and the floor search over them.

/// Minimal indexed unit: the start key of a range and the index of its
/// metadata in the table's metadata list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entity<K> {
    key: K,
    meta_index: u32,
}

/// IPv4 entity, keyed by the 32-bit start address.
pub type V4Entity = Entity<u32>;

/// IPv6 entity, keyed by the leading 64 bits of the start address.
pub type V6Entity = Entity<u64>;

impl<K: Copy> Entity<K> {
    pub fn new(key: K, meta_index: u32) -> Self {
        Self { key, meta_index }
    }

    /// Start key of the range.
    pub fn key(&self) -> K {
        self.key
    }

    /// Index into the metadata list.
    pub fn meta_index(&self) -> u32 {
        self.meta_index
    }
}

/// Find the entity whose key is the greatest one not exceeding `key`.
///
/// `entities` must be sorted ascending by key. The search looks for the
/// first entity with a key `>= key`; unless that key is an exact match (or
/// the search ran past the end) it steps back one position. Returns `None`
/// when `key` is below every start key or the list is empty.
pub fn floor_search<K: Ord + Copy>(entities: &[Entity<K>], key: K) -> Option<&Entity<K>> {
    let index = entities.partition_point(|e| e.key < key);
    match entities.get(index) {
        Some(entity) if entity.key == key => Some(entity),
        _ => index.checked_sub(1).and_then(|i| entities.get(i)),
    }
}
