//! # Qualified-Name Tables
//!
//! Qualified names compose three component tables (prefix, namespace name,
//! local name) into combined entries. The encode-time shape buckets entries
//! by local name, since most documents use a local name under a single
//! namespace; the decode-time shape is a growable array whose attribute
//! variant tracks duplicate attributes per element.

use std::sync::Arc;

use crate::category::TokenCategory;
use crate::errors::{VocabError, VocabResult};
use crate::limits::TableLimits;
use crate::types::{common_hash_map_new, CommonHashMap, TokenIndex};

/// A (prefix, namespace, local-name) triple indexed as one entry.
///
/// The component index fields reference entries in the respective component
/// tables; `None` stands for an absent component (no prefix, no namespace)
/// or a component the encoder left unindexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    /// Prefix string; empty when absent.
    pub prefix: String,

    /// Namespace name (URI); empty when absent.
    pub namespace_name: String,

    /// Local name.
    pub local_name: String,

    /// Index of the prefix in the prefix table.
    pub prefix_index: Option<TokenIndex>,

    /// Index of the namespace name in the namespace-name table.
    pub namespace_index: Option<TokenIndex>,

    /// Index of the local name in the local-name table.
    pub local_name_index: Option<TokenIndex>,

    /// This entry's own index in the qualified-name table.
    pub index: TokenIndex,
}

impl QualifiedName {
    /// True when this name matches the given (prefix, namespace) pair.
    #[inline(always)]
    fn matches(
        &self,
        prefix: &str,
        namespace_name: &str,
    ) -> bool {
        self.prefix == prefix && self.namespace_name == namespace_name
    }
}

/// Encode-time qualified-name table, bucketed by local name.
#[derive(Debug, Clone)]
pub struct NameLookupTable {
    category: TokenCategory,
    limits: TableLimits,

    /// Local entries, bucketed by local name.
    buckets: CommonHashMap<String, Vec<QualifiedName>>,

    /// Number of local entries across all buckets.
    local_len: usize,

    base: Option<Arc<NameLookupTable>>,
}

impl NameLookupTable {
    /// Create an unbounded table.
    pub fn new(category: TokenCategory) -> Self {
        Self::with_limits(category, TableLimits::UNBOUNDED)
    }

    /// Create a table with the given growth ceilings.
    ///
    /// Only the entry-count ceiling applies to qualified names.
    pub fn with_limits(
        category: TokenCategory,
        limits: TableLimits,
    ) -> Self {
        Self {
            category,
            limits,
            buckets: common_hash_map_new(),
            local_len: 0,
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
        self.local_len
    }

    /// Total number of entries, base plus local.
    pub fn len(&self) -> usize {
        self.base_len() + self.local_len
    }

    /// True when neither the base nor the local region holds entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The index the next declared name will receive.
    pub fn next_index(&self) -> TokenIndex {
        (self.base_len() + self.local_len) as TokenIndex
    }

    /// Look up the index of a qualified-name triple.
    ///
    /// The layered base is consulted first; it owns the low index range.
    pub fn get(
        &self,
        prefix: &str,
        namespace_name: &str,
        local_name: &str,
    ) -> Option<TokenIndex> {
        if let Some(base) = &self.base {
            if let Some(index) = base.get(prefix, namespace_name, local_name) {
                return Some(index);
            }
        }
        self.buckets
            .get(local_name)?
            .iter()
            .find(|name| name.matches(prefix, namespace_name))
            .map(|name| name.index)
    }

    /// Append a literal-encoded qualified name at the next free index.
    ///
    /// `name.index` is overwritten with the assigned index. The caller must
    /// have checked [`Self::get`] first; equal triples are not detected
    /// here.
    ///
    /// ## Returns
    /// `None` when the entry-count ceiling was reached and the name stays
    /// unindexed.
    pub fn declare(
        &mut self,
        mut name: QualifiedName,
    ) -> Option<TokenIndex> {
        if let Some(max) = self.limits.max_entries {
            if self.local_len >= max {
                log::trace!("{} table at capacity, name left unindexed", self.category);
                return None;
            }
        }

        let index = self.next_index();
        name.index = index;
        self.buckets
            .entry(name.local_name.clone())
            .or_default()
            .push(name);
        self.local_len += 1;
        Some(index)
    }

    /// Local (non-base) entries, in index-assignment order.
    pub fn local_names(&self) -> Vec<&QualifiedName> {
        let mut names: Vec<&QualifiedName> = self.buckets.values().flatten().collect();
        names.sort_by_key(|name| name.index);
        names
    }

    /// Empty the local region; the layered base is untouched.
    pub fn clear_local(&mut self) {
        self.buckets.clear();
        self.local_len = 0;
    }

    /// Detach the layered base, if any.
    pub fn detach_base(&mut self) {
        self.base = None;
    }

    /// Install `base` as the read-only tier beneath this table.
    pub fn set_read_only_base(
        &mut self,
        base: Arc<NameLookupTable>,
        clear: bool,
    ) {
        if clear {
            self.clear_local();
        }
        self.base = Some(base);
    }
}

/// Decode-time qualified-name table.
///
/// The attribute-name instance additionally tracks, per entry, the element
/// on which the attribute was last decoded; decoding the same attribute
/// index twice within one element is a stream conformance error. The marks
/// are session-local state: they cover the base range too, so sessions
/// sharing a base vocabulary never observe each other's elements.
#[derive(Debug, Clone)]
pub struct NameArray {
    category: TokenCategory,

    /// Local entries; entry `i` has absolute index `base_len + i`.
    entries: Vec<QualifiedName>,

    /// Duplicate-attribute marks over the whole index space (base plus
    /// local). `0` means never seen; otherwise the element serial of the
    /// last sighting. Constructed empty alongside each entry.
    marks: Vec<u64>,

    base: Option<Arc<NameArray>>,
}

impl NameArray {
    /// Create an empty array.
    pub fn new(category: TokenCategory) -> Self {
        Self {
            category,
            entries: Vec::new(),
            marks: Vec::new(),
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

    /// Append a literal-decoded qualified name, returning its index.
    ///
    /// `name.index` is overwritten with the assigned index; the entry's
    /// duplicate-attribute mark starts out empty.
    pub fn add(
        &mut self,
        mut name: QualifiedName,
    ) -> TokenIndex {
        let index = (self.base_len() + self.entries.len()) as TokenIndex;
        name.index = index;
        self.entries.push(name);
        self.marks.push(0);
        index
    }

    /// Resolve an index back to its qualified name.
    ///
    /// ## Returns
    /// [`VocabError::IndexOutOfRange`] when `index` has no corresponding
    /// entry in the local region or the layered base.
    pub fn get(
        &self,
        index: TokenIndex,
    ) -> VocabResult<&QualifiedName> {
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

    /// Mark `index` as decoded on the element with `element_serial`.
    ///
    /// Serials must be non-zero and strictly increase per element; the
    /// decoder vocabulary supplies them.
    ///
    /// ## Returns
    /// [`VocabError::DuplicateAttribute`] when the entry was already marked
    /// for this serial; [`VocabError::IndexOutOfRange`] for a bad index.
    pub fn check_duplicate(
        &mut self,
        index: TokenIndex,
        element_serial: u64,
    ) -> VocabResult<()> {
        debug_assert!(element_serial > 0);

        if index as usize >= self.len() {
            return Err(VocabError::IndexOutOfRange {
                category: self.category,
                index,
                len: self.len(),
            });
        }
        if self.marks[index as usize] == element_serial {
            let local_name = self.get(index)?.local_name.clone();
            return Err(VocabError::DuplicateAttribute { local_name });
        }
        self.marks[index as usize] = element_serial;
        Ok(())
    }

    /// Local (non-base) entries, in index-assignment order.
    pub fn local_names(&self) -> impl Iterator<Item = &QualifiedName> {
        self.entries.iter()
    }

    /// Empty the local region and all duplicate marks; the layered base is
    /// untouched.
    pub fn clear_local(&mut self) {
        self.entries.clear();
        self.marks.clear();
        self.marks.resize(self.base_len(), 0);
    }

    /// Detach the layered base, if any.
    pub fn detach_base(&mut self) {
        self.base = None;
        self.marks.clear();
        self.marks.resize(self.entries.len(), 0);
    }

    /// Install `base` as the read-only tier beneath this table.
    ///
    /// Every base entry receives a fresh, empty duplicate mark in this
    /// session.
    pub fn set_read_only_base(
        &mut self,
        base: Arc<NameArray>,
        clear: bool,
    ) {
        if clear {
            self.entries.clear();
        }
        let mut marks = vec![0; base.len()];
        marks.resize(base.len() + self.entries.len(), 0);
        self.marks = marks;
        self.base = Some(base);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qname(
        prefix: &str,
        namespace_name: &str,
        local_name: &str,
    ) -> QualifiedName {
        QualifiedName {
            prefix: prefix.to_string(),
            namespace_name: namespace_name.to_string(),
            local_name: local_name.to_string(),
            prefix_index: None,
            namespace_index: None,
            local_name_index: None,
            index: 0,
        }
    }

    #[test]
    fn test_lookup_buckets_by_local_name() {
        let mut t = NameLookupTable::new(TokenCategory::ElementName);

        assert_eq!(t.declare(qname("", "urn:a", "item")), Some(0));
        assert_eq!(t.declare(qname("", "urn:b", "item")), Some(1));
        assert_eq!(t.declare(qname("p", "urn:a", "other")), Some(2));

        assert_eq!(t.get("", "urn:a", "item"), Some(0));
        assert_eq!(t.get("", "urn:b", "item"), Some(1));
        assert_eq!(t.get("p", "urn:a", "other"), Some(2));
        assert_eq!(t.get("", "urn:c", "item"), None);
        assert_eq!(t.get("", "urn:a", "missing"), None);

        let locals = t.local_names();
        assert_eq!(locals.len(), 3);
        assert_eq!(locals[0].namespace_name, "urn:a");
        assert_eq!(locals[2].local_name, "other");
    }

    #[test]
    fn test_lookup_entry_ceiling() {
        let mut t = NameLookupTable::with_limits(
            TokenCategory::AttributeName,
            TableLimits::default().with_max_entries(1),
        );

        assert_eq!(t.declare(qname("", "", "a")), Some(0));
        assert_eq!(t.declare(qname("", "", "b")), None);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_lookup_layered_base() {
        let mut base = NameLookupTable::new(TokenCategory::ElementName);
        base.declare(qname("", "urn:a", "item"));
        let base = Arc::new(base);

        let mut child = NameLookupTable::new(TokenCategory::ElementName);
        child.set_read_only_base(base, false);

        assert_eq!(child.get("", "urn:a", "item"), Some(0));
        assert_eq!(child.next_index(), 1);
        assert_eq!(child.declare(qname("", "urn:b", "item")), Some(1));
    }

    #[test]
    fn test_array_add_and_get() {
        let mut t = NameArray::new(TokenCategory::AttributeName);

        assert_eq!(t.add(qname("", "", "id")), 0);
        assert_eq!(t.add(qname("", "urn:a", "href")), 1);

        assert_eq!(t.get(1).unwrap().local_name, "href");
        assert!(matches!(
            t.get(2),
            Err(VocabError::IndexOutOfRange { index: 2, .. })
        ));
    }

    #[test]
    fn test_duplicate_attribute_detection() {
        let mut t = NameArray::new(TokenCategory::AttributeName);
        t.add(qname("", "", "id"));
        t.add(qname("", "", "href"));

        // First element: both attributes once, then `id` again.
        assert!(t.check_duplicate(0, 1).is_ok());
        assert!(t.check_duplicate(1, 1).is_ok());
        let err = t.check_duplicate(0, 1).unwrap_err();
        assert!(matches!(
            err,
            VocabError::DuplicateAttribute { local_name } if local_name == "id"
        ));

        // Next element: the same attribute is fine again.
        assert!(t.check_duplicate(0, 2).is_ok());
    }

    #[test]
    fn test_duplicate_marks_cover_base_range() {
        let mut base = NameArray::new(TokenCategory::AttributeName);
        base.add(qname("", "", "id"));
        let base = Arc::new(base);

        let mut child = NameArray::new(TokenCategory::AttributeName);
        child.set_read_only_base(base, false);

        assert!(child.check_duplicate(0, 1).is_ok());
        assert!(child.check_duplicate(0, 1).is_err());

        // Marks are local to the child; the shared base holds no state.
        let mut sibling = NameArray::new(TokenCategory::AttributeName);
        sibling.add(qname("", "", "id"));
        assert!(sibling.check_duplicate(0, 1).is_ok());
    }
}
