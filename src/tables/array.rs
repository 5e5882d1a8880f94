//! # Decode-Time Growable Array

use std::sync::Arc;

use crate::category::TokenCategory;
use crate::errors::{VocabError, VocabResult};
use crate::types::TokenIndex;

/// Decode-time index -> value table for one token category.
///
/// The decoder appends a value whenever the stream carries a literal
/// flagged for table addition, and resolves previously assigned indices
/// back to values. No deduplication happens here: the stream already
/// guarantees the decoder only adds a value the encoder chose not to
/// reference by index.
#[derive(Debug, Clone)]
pub struct ValueArray<V> {
    category: TokenCategory,

    /// Local entries; entry `i` has absolute index `base_len + i`.
    entries: Vec<V>,

    base: Option<Arc<ValueArray<V>>>,
}

impl<V> ValueArray<V> {
    /// Create an empty array.
    pub fn new(category: TokenCategory) -> Self {
        Self {
            category,
            entries: Vec::new(),
            base: None,
        }
    }

    /// The category this table serves.
    #[inline(always)]
    pub fn category(&self) -> TokenCategory {
        self.category
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

    /// Append `value`, returning its freshly assigned index.
    pub fn add(
        &mut self,
        value: V,
    ) -> TokenIndex {
        let index = (self.base_len() + self.entries.len()) as TokenIndex;
        self.entries.push(value);
        index
    }

    /// Resolve an index back to its value.
    ///
    /// The layered base owns the low index range `[0, base_len)`.
    ///
    /// ## Returns
    /// [`VocabError::IndexOutOfRange`] when `index` has no corresponding
    /// entry in the local region or the layered base.
    pub fn get(
        &self,
        index: TokenIndex,
    ) -> VocabResult<&V> {
        let base_len = self.base_len();
        if (index as usize) < base_len {
            if let Some(base) = &self.base {
                return base.get(index);
            }
        }
        self.entries
            .get(index as usize - base_len)
            .ok_or(VocabError::IndexOutOfRange {
                category: self.category,
                index,
                len: self.len(),
            })
    }

    /// Local (non-base) values, in index-assignment order.
    pub fn local_values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter()
    }

    /// Empty the local region; the layered base is untouched.
    pub fn clear_local(&mut self) {
        self.entries.clear();
    }

    /// Detach the layered base, if any.
    pub fn detach_base(&mut self) {
        self.base = None;
    }

    /// Install `base` as the read-only tier beneath this table.
    ///
    /// `clear` discards the local region first; required when a different
    /// base is being swapped in.
    pub fn set_read_only_base(
        &mut self,
        base: Arc<ValueArray<V>>,
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

    fn array() -> ValueArray<String> {
        ValueArray::new(TokenCategory::AttributeValue)
    }

    #[test]
    fn test_append_only_indices() {
        let mut a = array();

        assert_eq!(a.add("x".to_string()), 0);
        assert_eq!(a.add("y".to_string()), 1);
        // Equal values are appended again; the decoder never deduplicates.
        assert_eq!(a.add("x".to_string()), 2);

        assert_eq!(a.len(), 3);
        assert_eq!(a.get(0).unwrap(), "x");
        assert_eq!(a.get(2).unwrap(), "x");
    }

    #[test]
    fn test_out_of_range() {
        let mut a = array();
        a.add("x".to_string());

        let err = a.get(1).unwrap_err();
        assert!(matches!(
            err,
            VocabError::IndexOutOfRange {
                category: TokenCategory::AttributeValue,
                index: 1,
                len: 1,
            }
        ));
    }

    #[test]
    fn test_layered_base() {
        let mut base = array();
        base.add("x".to_string());
        base.add("y".to_string());
        let base = Arc::new(base);

        let mut child = array();
        child.set_read_only_base(base.clone(), false);

        assert_eq!(child.add("z".to_string()), 2);
        assert_eq!(child.get(0).unwrap(), "x");
        assert_eq!(child.get(1).unwrap(), "y");
        assert_eq!(child.get(2).unwrap(), "z");
        assert!(child.get(3).is_err());

        assert_eq!(base.len(), 2);
    }

    #[test]
    fn test_clear_local_keeps_base() {
        let mut base = array();
        base.add("x".to_string());

        let mut child = array();
        child.set_read_only_base(Arc::new(base), false);
        child.add("a".to_string());

        child.clear_local();
        assert_eq!(child.len(), 1);
        assert_eq!(child.get(0).unwrap(), "x");
        assert_eq!(child.add("b".to_string()), 1);
    }
}
