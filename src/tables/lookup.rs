//! # Encode-Time Lookup Table

use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::Hash;
use std::sync::Arc;

use crate::category::TokenCategory;
use crate::limits::TableLimits;
use crate::types::{common_hash_map_new, CommonHashMap, TokenIndex};

/// A value that can be stored in a vocabulary table.
pub trait TableValue: Clone + Eq + Hash + Debug {
    /// Size of the value in bytes, charged against a byte-size ceiling.
    fn byte_len(&self) -> usize;

    /// True for the zero-length value.
    ///
    /// The zero-length sentinel is reserved for "absent" and is never
    /// assigned an index by the vocabulary conversion pass.
    fn is_absent(&self) -> bool {
        self.byte_len() == 0
    }
}

impl TableValue for String {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

/// Outcome of an encode-time [`LookupTable::obtain_index`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Obtained {
    /// The value was already indexed, in the local region or the layered
    /// base.
    Found(TokenIndex),

    /// The value was appended at this index.
    ///
    /// The caller still encodes the value literally, flagged for addition
    /// to the peer decoder's table.
    Added(TokenIndex),

    /// A configured ceiling blocked the append; the value stays unindexed
    /// and must be encoded literally.
    Rejected,
}

impl Obtained {
    /// The assigned index, if any.
    #[inline(always)]
    pub fn index(&self) -> Option<TokenIndex> {
        match *self {
            Obtained::Found(index) | Obtained::Added(index) => Some(index),
            Obtained::Rejected => None,
        }
    }

    /// True if the call appended a new entry.
    #[inline(always)]
    pub fn is_new(&self) -> bool {
        matches!(self, Obtained::Added(_))
    }
}

/// Encode-time value -> index table for one token category.
///
/// Indices are assigned in strictly increasing order; first occurrence
/// wins, and equal values never receive a second index. An optional
/// read-only base occupies the low index range; local entries start at the
/// base's size.
#[derive(Debug, Clone)]
pub struct LookupTable<V: TableValue> {
    category: TokenCategory,
    limits: TableLimits,

    /// Local entries, in index-assignment order.
    entries: Vec<V>,

    /// Dedup map over the local entries, holding absolute indices.
    map: CommonHashMap<V, TokenIndex>,

    /// Cumulative byte size of the local entries.
    bytes: usize,

    /// Entry and byte counts contributed by seeded fixed entries.
    /// Fixed entries are exempt from the ceilings and never charged
    /// against them.
    seeded_entries: usize,
    seeded_bytes: usize,

    base: Option<Arc<LookupTable<V>>>,
}

impl<V: TableValue> LookupTable<V> {
    /// Create an unbounded table.
    pub fn new(category: TokenCategory) -> Self {
        Self::with_limits(category, TableLimits::UNBOUNDED)
    }

    /// Create a table with the given growth ceilings.
    pub fn with_limits(
        category: TokenCategory,
        limits: TableLimits,
    ) -> Self {
        Self {
            category,
            limits,
            entries: Vec::new(),
            map: common_hash_map_new(),
            bytes: 0,
            seeded_entries: 0,
            seeded_bytes: 0,
            base: None,
        }
    }

    /// The category this table serves.
    #[inline(always)]
    pub fn category(&self) -> TokenCategory {
        self.category
    }

    /// The configured growth ceilings.
    pub fn limits(&self) -> TableLimits {
        self.limits
    }

    /// Number of entries contributed by the layered base, if any.
    pub fn base_len(&self) -> usize {
        self.base.as_ref().map_or(0, |base| base.len())
    }

    /// Number of local (non-base) entries.
    pub fn local_len(&self) -> usize {
        self.entries.len()
    }

    /// Total number of entries, base plus local.
    pub fn len(&self) -> usize {
        self.base_len() + self.entries.len()
    }

    /// True when neither the base nor the local region holds entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cumulative byte size of the local entries.
    pub fn byte_size(&self) -> usize {
        self.bytes
    }

    /// Check whether a value of `byte_len` bytes could still be appended.
    ///
    /// The bitstream encoder uses this to decide up front whether a large
    /// chunk is worth cloning for table insertion.
    pub fn can_add(
        &self,
        byte_len: usize,
    ) -> bool {
        self.limits.admits(
            self.entries.len() - self.seeded_entries,
            self.bytes - self.seeded_bytes,
            byte_len,
        )
    }

    /// Look up the index of `value` without mutating the table.
    ///
    /// The layered base is consulted first; it owns the low index range.
    pub fn get<Q>(
        &self,
        value: &Q,
    ) -> Option<TokenIndex>
    where
        V: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if let Some(base) = &self.base {
            if let Some(index) = base.get(value) {
                return Some(index);
            }
        }
        self.map.get(value).copied()
    }

    /// Return the index of `value`, appending it when absent.
    ///
    /// Appends are subject to the configured ceilings; a blocked append
    /// yields [`Obtained::Rejected`] and the caller encodes the value
    /// literally.
    pub fn obtain_index<Q>(
        &mut self,
        value: &Q,
    ) -> Obtained
    where
        V: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = V> + ?Sized,
    {
        if let Some(index) = self.get(value) {
            return Obtained::Found(index);
        }

        let value = value.to_owned();
        if !self.can_add(value.byte_len()) {
            log::trace!("{} table at capacity, value left unindexed", self.category);
            return Obtained::Rejected;
        }

        Obtained::Added(self.push_entry(value))
    }

    /// Insert a fixed, format-mandated entry, exempt from the ceilings.
    ///
    /// The value must not already be present.
    pub(crate) fn seed(
        &mut self,
        value: V,
    ) -> TokenIndex {
        debug_assert!(self.get(&value).is_none());
        self.seeded_entries += 1;
        self.seeded_bytes += value.byte_len();
        self.push_entry(value)
    }

    fn push_entry(
        &mut self,
        value: V,
    ) -> TokenIndex {
        let index = (self.base_len() + self.entries.len()) as TokenIndex;
        self.bytes += value.byte_len();
        self.map.insert(value.clone(), index);
        self.entries.push(value);
        index
    }

    /// Local (non-base) values, in index-assignment order.
    pub fn local_values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter()
    }

    /// Empty the local region; the layered base is untouched.
    pub fn clear_local(&mut self) {
        self.entries.clear();
        self.map.clear();
        self.bytes = 0;
        self.seeded_entries = 0;
        self.seeded_bytes = 0;
    }

    /// Detach the layered base, if any.
    pub fn detach_base(&mut self) {
        self.base = None;
    }

    /// Install `base` as the read-only tier beneath this table.
    ///
    /// `clear` discards the local region first; this is required when a
    /// different base is being swapped in, since stale local entries would
    /// collide with the new base's index range.
    pub fn set_read_only_base(
        &mut self,
        base: Arc<LookupTable<V>>,
        clear: bool,
    ) {
        if clear {
            self.clear_local();
        }
        self.base = Some(base);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> LookupTable<String> {
        LookupTable::new(TokenCategory::LocalName)
    }

    #[test]
    fn test_obtain_and_dedup() {
        let mut t = table();

        assert_eq!(t.obtain_index("foo"), Obtained::Added(0));
        assert_eq!(t.obtain_index("bar"), Obtained::Added(1));
        assert_eq!(t.obtain_index("foo"), Obtained::Found(0));

        assert_eq!(t.len(), 2);
        assert_eq!(t.get("bar"), Some(1));
        assert_eq!(t.get("baz"), None);
        assert_eq!(
            t.local_values().cloned().collect::<Vec<_>>(),
            vec!["foo".to_string(), "bar".to_string()]
        );
    }

    #[test]
    fn test_entry_ceiling_rejects() {
        let mut t = LookupTable::<String>::with_limits(
            TokenCategory::AttributeValue,
            TableLimits::default().with_max_entries(2),
        );

        assert_eq!(t.obtain_index("a"), Obtained::Added(0));
        assert_eq!(t.obtain_index("b"), Obtained::Added(1));
        assert_eq!(t.obtain_index("c"), Obtained::Rejected);

        // Existing entries still resolve after the ceiling is reached.
        assert_eq!(t.obtain_index("a"), Obtained::Found(0));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_byte_ceiling_rejects() {
        let mut t = LookupTable::<String>::with_limits(
            TokenCategory::CharacterContentChunk,
            TableLimits::default().with_max_bytes(8),
        );

        assert_eq!(t.obtain_index("abcd"), Obtained::Added(0));
        assert!(t.can_add(4));
        assert!(!t.can_add(5));
        assert_eq!(t.obtain_index("abcdefgh"), Obtained::Rejected);
        assert_eq!(t.obtain_index("efgh"), Obtained::Added(1));
        assert_eq!(t.byte_size(), 8);
        assert_eq!(t.obtain_index("x"), Obtained::Rejected);
    }

    #[test]
    fn test_seeded_entries_exempt_from_ceilings() {
        let mut t = LookupTable::<String>::with_limits(
            TokenCategory::Prefix,
            TableLimits::default().with_max_entries(1).with_max_bytes(8),
        );
        t.seed("xml".to_string());

        // The seeded entry counts against neither ceiling.
        assert!(t.can_add(8));
        assert_eq!(t.obtain_index("p"), Obtained::Added(1));
        assert_eq!(t.obtain_index("q"), Obtained::Rejected);
        assert_eq!(t.obtain_index("xml"), Obtained::Found(0));
    }

    #[test]
    fn test_layered_base_precedence() {
        let mut base = table();
        base.obtain_index("x");
        base.obtain_index("y");
        let base = Arc::new(base);

        let mut child = table();
        child.set_read_only_base(base.clone(), false);

        assert_eq!(child.base_len(), 2);
        assert_eq!(child.get("x"), Some(0));
        assert_eq!(child.get("y"), Some(1));

        // Local entries start immediately above the base's top index.
        assert_eq!(child.obtain_index("z"), Obtained::Added(2));
        assert_eq!(child.obtain_index("x"), Obtained::Found(0));

        // The base itself never grew.
        assert_eq!(base.len(), 2);
    }

    #[test]
    fn test_clear_local_keeps_base() {
        let mut base = table();
        base.obtain_index("x");
        let base = Arc::new(base);

        let mut child = table();
        child.set_read_only_base(base, false);
        child.obtain_index("a");

        child.clear_local();
        assert_eq!(child.local_len(), 0);
        assert_eq!(child.get("x"), Some(0));
        assert_eq!(child.obtain_index("b"), Obtained::Added(1));
    }

    #[test]
    fn test_base_swap_with_clear() {
        let mut child = table();
        child.obtain_index("stale");

        let mut base = table();
        base.obtain_index("x");
        child.set_read_only_base(Arc::new(base), true);

        assert_eq!(child.local_len(), 0);
        assert_eq!(child.get("stale"), None);
        assert_eq!(child.obtain_index("fresh"), Obtained::Added(1));
    }
}
