//! # Decode-Time Vocabulary

use std::sync::Arc;

use strum::IntoEnumIterator;

use crate::category::TokenCategory;
use crate::errors::VocabResult;
use crate::tables::{NameArray, QualifiedName, ValueArray};
use crate::types::{common_hash_map_with_capacity, CommonHashMap, TokenIndex};
use crate::vocab::generic::{Name, Vocabulary};
use crate::vocab::{RESERVED_XML_INDEX, XML_NAMESPACE_NAME, XML_PREFIX};

/// The twelve-table aggregate driven by one decode session.
///
/// The bitstream decoder appends freshly read tokens and resolves
/// previously read indices back to values. Tables are plain growable
/// arrays; the stream itself guarantees the decoder only adds a value when
/// the encoder chose not to reuse an index.
#[derive(Debug, Clone)]
pub struct DecoderVocabulary {
    /// Restricted alphabet table.
    pub restricted_alphabet: ValueArray<String>,

    /// Encoding algorithm table.
    pub encoding_algorithm: ValueArray<String>,

    /// Prefix table; holds the reserved `xml` entry at index 0.
    pub prefix: ValueArray<String>,

    /// Namespace-name table; holds the reserved XML namespace at index 0.
    pub namespace_name: ValueArray<String>,

    /// Local-name table.
    pub local_name: ValueArray<String>,

    /// Other-NCName table.
    pub other_ncname: ValueArray<String>,

    /// Other-URI table.
    pub other_uri: ValueArray<String>,

    /// Attribute-value table.
    pub attribute_value: ValueArray<String>,

    /// Character-content-chunk table.
    pub character_content_chunk: ValueArray<String>,

    /// Other-string table.
    pub other_string: ValueArray<String>,

    /// Element qualified-name table.
    pub element_name: NameArray,

    /// Attribute qualified-name table.
    pub attribute_name: NameArray,

    external_uri: Option<String>,
    initial_vocabulary: bool,

    /// Serial of the element currently being decoded; never 0.
    element_serial: u64,
}

/// Borrowed view of one per-category decode-time table.
#[derive(Debug, Clone, Copy)]
pub enum ArrayTableRef<'a> {
    /// A string-valued growable array.
    Strings(&'a ValueArray<String>),

    /// A qualified-name array.
    Names(&'a NameArray),
}

impl ArrayTableRef<'_> {
    /// Total number of entries, base plus local.
    pub fn len(&self) -> usize {
        match self {
            ArrayTableRef::Strings(table) => table.len(),
            ArrayTableRef::Names(table) => table.len(),
        }
    }

    /// True when the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Immutable, cheaply cloneable form of a [`DecoderVocabulary`].
///
/// Installable as the read-only tier beneath any number of session
/// vocabularies; no mutation path exists through it.
#[derive(Debug, Clone)]
pub struct SharedDecoderVocabulary {
    restricted_alphabet: Arc<ValueArray<String>>,
    encoding_algorithm: Arc<ValueArray<String>>,
    prefix: Arc<ValueArray<String>>,
    namespace_name: Arc<ValueArray<String>>,
    local_name: Arc<ValueArray<String>>,
    other_ncname: Arc<ValueArray<String>>,
    other_uri: Arc<ValueArray<String>>,
    attribute_value: Arc<ValueArray<String>>,
    character_content_chunk: Arc<ValueArray<String>>,
    other_string: Arc<ValueArray<String>>,
    element_name: Arc<NameArray>,
    attribute_name: Arc<NameArray>,
}

impl Default for DecoderVocabulary {
    fn default() -> Self {
        Self::new()
    }
}

impl DecoderVocabulary {
    /// Create an empty vocabulary holding only the fixed entries.
    pub fn new() -> Self {
        use TokenCategory::*;

        let mut vocabulary = Self {
            restricted_alphabet: ValueArray::new(RestrictedAlphabet),
            encoding_algorithm: ValueArray::new(EncodingAlgorithm),
            prefix: ValueArray::new(Prefix),
            namespace_name: ValueArray::new(NamespaceName),
            local_name: ValueArray::new(LocalName),
            other_ncname: ValueArray::new(OtherNcName),
            other_uri: ValueArray::new(OtherUri),
            attribute_value: ValueArray::new(AttributeValue),
            character_content_chunk: ValueArray::new(CharacterContentChunk),
            other_string: ValueArray::new(OtherString),
            element_name: NameArray::new(ElementName),
            attribute_name: NameArray::new(AttributeName),
            external_uri: None,
            initial_vocabulary: false,
            element_serial: 1,
        };
        vocabulary.seed_fixed_entries();
        vocabulary
    }

    /// Build a vocabulary from a format-agnostic description.
    ///
    /// Entries are appended in the iteration order of the source sequences,
    /// per category; zero-length raw values are skipped. Qualified-name
    /// component indices are resolved through conversion-local auxiliary
    /// maps, since the growable arrays carry no dedup maps of their own.
    pub fn from_vocabulary(vocabulary: &Vocabulary) -> Self {
        let mut v = Self::new();

        let fill = |table: &mut ValueArray<String>, values: &[String]| {
            for value in values {
                if !value.is_empty() {
                    table.add(value.clone());
                }
            }
        };
        fill(&mut v.restricted_alphabet, &vocabulary.restricted_alphabets);
        fill(&mut v.encoding_algorithm, &vocabulary.encoding_algorithms);
        // The reserved pair is already seeded; a description that lists it
        // anyway must not produce a second entry.
        for value in &vocabulary.prefixes {
            if !value.is_empty() && value != XML_PREFIX {
                v.prefix.add(value.clone());
            }
        }
        for value in &vocabulary.namespace_names {
            if !value.is_empty() && value != XML_NAMESPACE_NAME {
                v.namespace_name.add(value.clone());
            }
        }
        fill(&mut v.local_name, &vocabulary.local_names);
        fill(&mut v.other_ncname, &vocabulary.other_ncnames);
        fill(&mut v.other_uri, &vocabulary.other_uris);
        fill(&mut v.attribute_value, &vocabulary.attribute_values);
        fill(
            &mut v.character_content_chunk,
            &vocabulary.character_content_chunks,
        );
        fill(&mut v.other_string, &vocabulary.other_strings);

        // Conversion-pass component dedup, separate from the permanent
        // tables.
        let mut aux = ComponentIndexes::new(&v);
        v.add_name_entries(&vocabulary.element_names, false, &mut aux);
        v.add_name_entries(&vocabulary.attribute_names, true, &mut aux);

        v
    }

    fn seed_fixed_entries(&mut self) {
        if self.prefix.is_empty() {
            let index = self.prefix.add(XML_PREFIX.to_string());
            debug_assert_eq!(index, RESERVED_XML_INDEX);
        }
        if self.namespace_name.is_empty() {
            let index = self.namespace_name.add(XML_NAMESPACE_NAME.to_string());
            debug_assert_eq!(index, RESERVED_XML_INDEX);
        }
    }

    fn add_name_entries(
        &mut self,
        names: &[Name],
        attribute: bool,
        aux: &mut ComponentIndexes,
    ) {
        for name in names {
            if name.local_name.is_empty() {
                // The zero-length sentinel is reserved for "absent".
                continue;
            }

            let prefix_index = if name.prefix.is_empty() {
                None
            } else {
                Some(aux.prefix(&mut self.prefix, &name.prefix))
            };
            let namespace_index = if name.namespace_name.is_empty() {
                None
            } else {
                Some(aux.namespace(&mut self.namespace_name, &name.namespace_name))
            };
            let local_name_index = Some(aux.local(&mut self.local_name, &name.local_name));

            let entry = QualifiedName {
                prefix: name.prefix.clone(),
                namespace_name: name.namespace_name.clone(),
                local_name: name.local_name.clone(),
                prefix_index,
                namespace_index,
                local_name_index,
                index: 0,
            };
            if attribute {
                self.attribute_name.add(entry);
            } else {
                self.element_name.add(entry);
            }
        }
    }

    /// Advance and return the element serial used by duplicate-attribute
    /// checks. Called once per decoded element start.
    pub fn begin_element(&mut self) -> u64 {
        self.element_serial += 1;
        self.element_serial
    }

    /// Mark attribute-name `index` as decoded on the current element.
    ///
    /// ## Returns
    /// [`crate::VocabError::DuplicateAttribute`] when the index was already
    /// decoded for this element.
    pub fn check_duplicate_attribute(
        &mut self,
        index: TokenIndex,
    ) -> VocabResult<()> {
        self.attribute_name
            .check_duplicate(index, self.element_serial)
    }

    /// The table for a category.
    pub fn table(
        &self,
        category: TokenCategory,
    ) -> ArrayTableRef<'_> {
        match category {
            TokenCategory::RestrictedAlphabet => ArrayTableRef::Strings(&self.restricted_alphabet),
            TokenCategory::EncodingAlgorithm => ArrayTableRef::Strings(&self.encoding_algorithm),
            TokenCategory::Prefix => ArrayTableRef::Strings(&self.prefix),
            TokenCategory::NamespaceName => ArrayTableRef::Strings(&self.namespace_name),
            TokenCategory::LocalName => ArrayTableRef::Strings(&self.local_name),
            TokenCategory::OtherNcName => ArrayTableRef::Strings(&self.other_ncname),
            TokenCategory::OtherUri => ArrayTableRef::Strings(&self.other_uri),
            TokenCategory::AttributeValue => ArrayTableRef::Strings(&self.attribute_value),
            TokenCategory::CharacterContentChunk => {
                ArrayTableRef::Strings(&self.character_content_chunk)
            }
            TokenCategory::OtherString => ArrayTableRef::Strings(&self.other_string),
            TokenCategory::ElementName => ArrayTableRef::Names(&self.element_name),
            TokenCategory::AttributeName => ArrayTableRef::Names(&self.attribute_name),
        }
    }

    /// Iterate all twelve tables in category order.
    pub fn tables(&self) -> impl Iterator<Item = (TokenCategory, ArrayTableRef<'_>)> {
        TokenCategory::iter().map(move |category| (category, self.table(category)))
    }

    /// Freeze this vocabulary into its shareable, read-only form.
    pub fn into_shared(self) -> SharedDecoderVocabulary {
        SharedDecoderVocabulary {
            restricted_alphabet: Arc::new(self.restricted_alphabet),
            encoding_algorithm: Arc::new(self.encoding_algorithm),
            prefix: Arc::new(self.prefix),
            namespace_name: Arc::new(self.namespace_name),
            local_name: Arc::new(self.local_name),
            other_ncname: Arc::new(self.other_ncname),
            other_uri: Arc::new(self.other_uri),
            attribute_value: Arc::new(self.attribute_value),
            character_content_chunk: Arc::new(self.character_content_chunk),
            other_string: Arc::new(self.other_string),
            element_name: Arc::new(self.element_name),
            attribute_name: Arc::new(self.attribute_name),
        }
    }

    /// Install `base` as the initial vocabulary.
    ///
    /// All twelve tables are relinked together. Any recorded external
    /// vocabulary URI is forgotten; the initial vocabulary is mutually
    /// exclusive with an externally referenced one at the same layer.
    pub fn set_initial_vocabulary(
        &mut self,
        base: &SharedDecoderVocabulary,
        clear: bool,
    ) {
        self.relink(base, clear);
        self.external_uri = None;
        self.initial_vocabulary = true;
    }

    /// Install `base` as the external vocabulary identified by `uri`.
    ///
    /// Always carries `clear` semantics relative to whatever was installed
    /// before.
    pub fn set_external_vocabulary(
        &mut self,
        uri: &str,
        base: &SharedDecoderVocabulary,
    ) {
        log::debug!("installing external vocabulary {uri}");
        self.relink(base, true);
        self.initial_vocabulary = false;
        self.external_uri = Some(uri.to_string());
    }

    /// Install `base` in response to an in-document vocabulary reference.
    ///
    /// A call with the currently recorded URI is a complete no-op, whatever
    /// `base` is: the URI string alone identifies an external vocabulary.
    pub fn set_referenced_vocabulary(
        &mut self,
        uri: &str,
        base: &SharedDecoderVocabulary,
        clear: bool,
    ) {
        if self.external_uri.as_deref() == Some(uri) {
            return;
        }
        log::debug!("installing referenced vocabulary {uri}");
        self.relink(base, clear);
        self.initial_vocabulary = false;
        self.external_uri = Some(uri.to_string());
    }

    fn relink(
        &mut self,
        base: &SharedDecoderVocabulary,
        clear: bool,
    ) {
        self.restricted_alphabet
            .set_read_only_base(base.restricted_alphabet.clone(), clear);
        self.encoding_algorithm
            .set_read_only_base(base.encoding_algorithm.clone(), clear);
        self.prefix.set_read_only_base(base.prefix.clone(), clear);
        self.namespace_name
            .set_read_only_base(base.namespace_name.clone(), clear);
        self.local_name
            .set_read_only_base(base.local_name.clone(), clear);
        self.other_ncname
            .set_read_only_base(base.other_ncname.clone(), clear);
        self.other_uri
            .set_read_only_base(base.other_uri.clone(), clear);
        self.attribute_value
            .set_read_only_base(base.attribute_value.clone(), clear);
        self.character_content_chunk
            .set_read_only_base(base.character_content_chunk.clone(), clear);
        self.other_string
            .set_read_only_base(base.other_string.clone(), clear);
        self.element_name
            .set_read_only_base(base.element_name.clone(), clear);
        self.attribute_name
            .set_read_only_base(base.attribute_name.clone(), clear);
    }

    /// True when an initial vocabulary is installed.
    pub fn has_initial_vocabulary(&self) -> bool {
        self.initial_vocabulary
    }

    /// True when an external vocabulary is installed.
    pub fn has_external_vocabulary(&self) -> bool {
        self.external_uri.is_some()
    }

    /// The URI of the currently installed external vocabulary, if any.
    pub fn external_vocabulary_uri(&self) -> Option<&str> {
        self.external_uri.as_deref()
    }

    /// Empty the vocabulary entirely: local entries, layering, markers.
    ///
    /// Fixed entries are re-seeded afterwards.
    pub fn clear(&mut self) {
        self.clear_retaining_layering();
        self.restricted_alphabet.detach_base();
        self.encoding_algorithm.detach_base();
        self.prefix.detach_base();
        self.namespace_name.detach_base();
        self.local_name.detach_base();
        self.other_ncname.detach_base();
        self.other_uri.detach_base();
        self.attribute_value.detach_base();
        self.character_content_chunk.detach_base();
        self.other_string.detach_base();
        self.element_name.detach_base();
        self.attribute_name.detach_base();
        self.external_uri = None;
        self.initial_vocabulary = false;
        self.seed_fixed_entries();
    }

    /// Empty the mutable region only, leaving layering configuration in
    /// place.
    pub fn clear_retaining_layering(&mut self) {
        self.restricted_alphabet.clear_local();
        self.encoding_algorithm.clear_local();
        self.prefix.clear_local();
        self.namespace_name.clear_local();
        self.local_name.clear_local();
        self.other_ncname.clear_local();
        self.other_uri.clear_local();
        self.attribute_value.clear_local();
        self.character_content_chunk.clear_local();
        self.other_string.clear_local();
        self.element_name.clear_local();
        self.attribute_name.clear_local();
        self.element_serial = 1;
        self.seed_fixed_entries();
    }

    /// Export the local (non-base) entries as a generic [`Vocabulary`].
    ///
    /// The reserved `xml` prefix/namespace pair is omitted: fixed entries
    /// exist implicitly in every vocabulary and are re-seeded on
    /// conversion.
    pub fn to_vocabulary(&self) -> Vocabulary {
        let names = |table: &NameArray| -> Vec<Name> {
            table
                .local_names()
                .map(|name| {
                    Name::new(
                        name.prefix.clone(),
                        name.namespace_name.clone(),
                        name.local_name.clone(),
                    )
                })
                .collect()
        };

        Vocabulary {
            restricted_alphabets: self.restricted_alphabet.local_values().cloned().collect(),
            encoding_algorithms: self.encoding_algorithm.local_values().cloned().collect(),
            prefixes: self
                .prefix
                .local_values()
                .filter(|value| *value != XML_PREFIX)
                .cloned()
                .collect(),
            namespace_names: self
                .namespace_name
                .local_values()
                .filter(|value| *value != XML_NAMESPACE_NAME)
                .cloned()
                .collect(),
            local_names: self.local_name.local_values().cloned().collect(),
            other_ncnames: self.other_ncname.local_values().cloned().collect(),
            other_uris: self.other_uri.local_values().cloned().collect(),
            attribute_values: self.attribute_value.local_values().cloned().collect(),
            character_content_chunks: self
                .character_content_chunk
                .local_values()
                .cloned()
                .collect(),
            other_strings: self.other_string.local_values().cloned().collect(),
            element_names: names(&self.element_name),
            attribute_names: names(&self.attribute_name),
        }
    }
}

/// Conversion-local component index maps, used to resolve qualified-name
/// components without re-scanning the arrays on every lookup.
struct ComponentIndexes {
    prefixes: CommonHashMap<String, TokenIndex>,
    namespaces: CommonHashMap<String, TokenIndex>,
    locals: CommonHashMap<String, TokenIndex>,
}

impl ComponentIndexes {
    fn new(vocabulary: &DecoderVocabulary) -> Self {
        let index_of = |table: &ValueArray<String>| {
            let mut map = common_hash_map_with_capacity(table.local_len());
            for (i, value) in table.local_values().enumerate() {
                map.insert(value.clone(), i as TokenIndex);
            }
            map
        };
        Self {
            prefixes: index_of(&vocabulary.prefix),
            namespaces: index_of(&vocabulary.namespace_name),
            locals: index_of(&vocabulary.local_name),
        }
    }

    fn resolve(
        map: &mut CommonHashMap<String, TokenIndex>,
        table: &mut ValueArray<String>,
        value: &str,
    ) -> TokenIndex {
        if let Some(&index) = map.get(value) {
            return index;
        }
        let index = table.add(value.to_string());
        map.insert(value.to_string(), index);
        index
    }

    fn prefix(
        &mut self,
        table: &mut ValueArray<String>,
        value: &str,
    ) -> TokenIndex {
        Self::resolve(&mut self.prefixes, table, value)
    }

    fn namespace(
        &mut self,
        table: &mut ValueArray<String>,
        value: &str,
    ) -> TokenIndex {
        Self::resolve(&mut self.namespaces, table, value)
    }

    fn local(
        &mut self,
        table: &mut ValueArray<String>,
        value: &str,
    ) -> TokenIndex {
        Self::resolve(&mut self.locals, table, value)
    }
}
