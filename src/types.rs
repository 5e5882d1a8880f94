//! # Common Types

/// Index of an entry within a vocabulary table.
///
/// Indices are assigned in strictly increasing order starting at 0;
/// once assigned, an index's value never changes.
pub type TokenIndex = u32;

cfg_if::cfg_if! {
    if #[cfg(feature = "ahash")] {
        /// Type alias for hash maps in this crate.
        pub type CommonHashMap<K, V> = ahash::AHashMap<K, V>;

        /// Create a new empty hash map.
        pub fn common_hash_map_new<K, V>() -> CommonHashMap<K, V> {
            CommonHashMap::new()
        }

        /// Create a new hash map with the given capacity.
        pub fn common_hash_map_with_capacity<K, V>(capacity: usize) -> CommonHashMap<K, V> {
            CommonHashMap::with_capacity(capacity)
        }
    } else {
        /// Type alias for hash maps in this crate.
        pub type CommonHashMap<K, V> = std::collections::HashMap<K, V>;

        /// Create a new empty hash map.
        pub fn common_hash_map_new<K, V>() -> CommonHashMap<K, V> {
            CommonHashMap::new()
        }

        /// Create a new hash map with the given capacity.
        pub fn common_hash_map_with_capacity<K, V>(capacity: usize) -> CommonHashMap<K, V> {
            CommonHashMap::with_capacity(capacity)
        }
    }
}
