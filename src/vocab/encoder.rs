//! # Encode-Time Vocabulary

use std::sync::Arc;

use strum::IntoEnumIterator;

use crate::category::TokenCategory;
use crate::limits::VocabularyLimits;
use crate::tables::{LookupTable, NameLookupTable, Obtained, QualifiedName, TableValue};
use crate::vocab::generic::{Name, Vocabulary};
use crate::vocab::{RESERVED_XML_INDEX, XML_NAMESPACE_NAME, XML_PREFIX};

/// The twelve-table aggregate driven by one encode session.
///
/// The bitstream encoder calls `obtain_index` on the category tables to
/// obtain-or-create an index for each token it is about to write. Before
/// any document content is processed, the session setup may layer a
/// [`SharedEncoderVocabulary`] beneath the tables (initial or externally
/// referenced vocabulary).
#[derive(Debug, Clone)]
pub struct EncoderVocabulary {
    /// Restricted alphabet table.
    pub restricted_alphabet: LookupTable<String>,

    /// Encoding algorithm table.
    pub encoding_algorithm: LookupTable<String>,

    /// Prefix table; holds the reserved `xml` entry at index 0.
    pub prefix: LookupTable<String>,

    /// Namespace-name table; holds the reserved XML namespace at index 0.
    pub namespace_name: LookupTable<String>,

    /// Local-name table.
    pub local_name: LookupTable<String>,

    /// Other-NCName table.
    pub other_ncname: LookupTable<String>,

    /// Other-URI table.
    pub other_uri: LookupTable<String>,

    /// Attribute-value table.
    pub attribute_value: LookupTable<String>,

    /// Character-content-chunk table.
    pub character_content_chunk: LookupTable<String>,

    /// Other-string table.
    pub other_string: LookupTable<String>,

    /// Element qualified-name table.
    pub element_name: NameLookupTable,

    /// Attribute qualified-name table.
    pub attribute_name: NameLookupTable,

    external_uri: Option<String>,
    initial_vocabulary: bool,
}

/// Borrowed view of one per-category encode-time table.
#[derive(Debug, Clone, Copy)]
pub enum LookupTableRef<'a> {
    /// A string-valued lookup table.
    Strings(&'a LookupTable<String>),

    /// A qualified-name lookup table.
    Names(&'a NameLookupTable),
}

impl LookupTableRef<'_> {
    /// Total number of entries, base plus local.
    pub fn len(&self) -> usize {
        match self {
            LookupTableRef::Strings(table) => table.len(),
            LookupTableRef::Names(table) => table.len(),
        }
    }

    /// True when the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Immutable, cheaply cloneable form of an [`EncoderVocabulary`].
///
/// Installable as the read-only tier beneath any number of session
/// vocabularies; no mutation path exists through it.
#[derive(Debug, Clone)]
pub struct SharedEncoderVocabulary {
    restricted_alphabet: Arc<LookupTable<String>>,
    encoding_algorithm: Arc<LookupTable<String>>,
    prefix: Arc<LookupTable<String>>,
    namespace_name: Arc<LookupTable<String>>,
    local_name: Arc<LookupTable<String>>,
    other_ncname: Arc<LookupTable<String>>,
    other_uri: Arc<LookupTable<String>>,
    attribute_value: Arc<LookupTable<String>>,
    character_content_chunk: Arc<LookupTable<String>>,
    other_string: Arc<LookupTable<String>>,
    element_name: Arc<NameLookupTable>,
    attribute_name: Arc<NameLookupTable>,
}

impl Default for EncoderVocabulary {
    fn default() -> Self {
        Self::new()
    }
}

impl EncoderVocabulary {
    /// Create a vocabulary with unbounded tables.
    pub fn new() -> Self {
        Self::with_limits(&VocabularyLimits::unbounded())
    }

    /// Create a vocabulary with the given per-category growth ceilings.
    pub fn with_limits(limits: &VocabularyLimits) -> Self {
        use TokenCategory::*;

        let mut vocabulary = Self {
            restricted_alphabet: LookupTable::with_limits(
                RestrictedAlphabet,
                limits.get(RestrictedAlphabet),
            ),
            encoding_algorithm: LookupTable::with_limits(
                EncodingAlgorithm,
                limits.get(EncodingAlgorithm),
            ),
            prefix: LookupTable::with_limits(Prefix, limits.get(Prefix)),
            namespace_name: LookupTable::with_limits(NamespaceName, limits.get(NamespaceName)),
            local_name: LookupTable::with_limits(LocalName, limits.get(LocalName)),
            other_ncname: LookupTable::with_limits(OtherNcName, limits.get(OtherNcName)),
            other_uri: LookupTable::with_limits(OtherUri, limits.get(OtherUri)),
            attribute_value: LookupTable::with_limits(AttributeValue, limits.get(AttributeValue)),
            character_content_chunk: LookupTable::with_limits(
                CharacterContentChunk,
                limits.get(CharacterContentChunk),
            ),
            other_string: LookupTable::with_limits(OtherString, limits.get(OtherString)),
            element_name: NameLookupTable::with_limits(ElementName, limits.get(ElementName)),
            attribute_name: NameLookupTable::with_limits(AttributeName, limits.get(AttributeName)),
            external_uri: None,
            initial_vocabulary: false,
        };
        vocabulary.seed_fixed_entries();
        vocabulary
    }

    /// Build a vocabulary from a format-agnostic description.
    ///
    /// Entries are assigned indices in the iteration order of the source
    /// sequences, per category; zero-length raw values are skipped.
    pub fn from_vocabulary(
        vocabulary: &Vocabulary,
        limits: &VocabularyLimits,
    ) -> Self {
        let mut v = Self::with_limits(limits);

        let fill = |table: &mut LookupTable<String>, values: &[String]| {
            for value in values {
                if !value.is_absent() {
                    table.obtain_index(value.as_str());
                }
            }
        };
        fill(&mut v.restricted_alphabet, &vocabulary.restricted_alphabets);
        fill(&mut v.encoding_algorithm, &vocabulary.encoding_algorithms);
        fill(&mut v.prefix, &vocabulary.prefixes);
        fill(&mut v.namespace_name, &vocabulary.namespace_names);
        fill(&mut v.local_name, &vocabulary.local_names);
        fill(&mut v.other_ncname, &vocabulary.other_ncnames);
        fill(&mut v.other_uri, &vocabulary.other_uris);
        fill(&mut v.attribute_value, &vocabulary.attribute_values);
        fill(
            &mut v.character_content_chunk,
            &vocabulary.character_content_chunks,
        );
        fill(&mut v.other_string, &vocabulary.other_strings);

        for name in &vocabulary.element_names {
            v.obtain_element_name(&name.prefix, &name.namespace_name, &name.local_name);
        }
        for name in &vocabulary.attribute_names {
            v.obtain_attribute_name(&name.prefix, &name.namespace_name, &name.local_name);
        }

        v
    }

    fn seed_fixed_entries(&mut self) {
        if self.prefix.get(XML_PREFIX).is_none() {
            let index = self.prefix.seed(XML_PREFIX.to_string());
            debug_assert_eq!(index, RESERVED_XML_INDEX);
        }
        if self.namespace_name.get(XML_NAMESPACE_NAME).is_none() {
            let index = self.namespace_name.seed(XML_NAMESPACE_NAME.to_string());
            debug_assert_eq!(index, RESERVED_XML_INDEX);
        }
    }

    /// Obtain the index for an element qualified-name triple, declaring it
    /// (and any unindexed components) when absent.
    pub fn obtain_element_name(
        &mut self,
        prefix: &str,
        namespace_name: &str,
        local_name: &str,
    ) -> Obtained {
        self.obtain_name(prefix, namespace_name, local_name, false)
    }

    /// Obtain the index for an attribute qualified-name triple, declaring
    /// it (and any unindexed components) when absent.
    pub fn obtain_attribute_name(
        &mut self,
        prefix: &str,
        namespace_name: &str,
        local_name: &str,
    ) -> Obtained {
        self.obtain_name(prefix, namespace_name, local_name, true)
    }

    fn obtain_name(
        &mut self,
        prefix: &str,
        namespace_name: &str,
        local_name: &str,
        attribute: bool,
    ) -> Obtained {
        if local_name.is_empty() {
            // The zero-length sentinel is reserved for "absent".
            return Obtained::Rejected;
        }

        let table = if attribute {
            &self.attribute_name
        } else {
            &self.element_name
        };
        if let Some(index) = table.get(prefix, namespace_name, local_name) {
            return Obtained::Found(index);
        }

        // Literal encoding still indexes the components where possible.
        let prefix_index = if prefix.is_empty() {
            None
        } else {
            self.prefix.obtain_index(prefix).index()
        };
        let namespace_index = if namespace_name.is_empty() {
            None
        } else {
            self.namespace_name.obtain_index(namespace_name).index()
        };
        let local_name_index = self.local_name.obtain_index(local_name).index();

        let name = QualifiedName {
            prefix: prefix.to_string(),
            namespace_name: namespace_name.to_string(),
            local_name: local_name.to_string(),
            prefix_index,
            namespace_index,
            local_name_index,
            index: 0,
        };
        let table = if attribute {
            &mut self.attribute_name
        } else {
            &mut self.element_name
        };
        match table.declare(name) {
            Some(index) => Obtained::Added(index),
            None => Obtained::Rejected,
        }
    }

    /// The table for a category.
    pub fn table(
        &self,
        category: TokenCategory,
    ) -> LookupTableRef<'_> {
        match category {
            TokenCategory::RestrictedAlphabet => LookupTableRef::Strings(&self.restricted_alphabet),
            TokenCategory::EncodingAlgorithm => LookupTableRef::Strings(&self.encoding_algorithm),
            TokenCategory::Prefix => LookupTableRef::Strings(&self.prefix),
            TokenCategory::NamespaceName => LookupTableRef::Strings(&self.namespace_name),
            TokenCategory::LocalName => LookupTableRef::Strings(&self.local_name),
            TokenCategory::OtherNcName => LookupTableRef::Strings(&self.other_ncname),
            TokenCategory::OtherUri => LookupTableRef::Strings(&self.other_uri),
            TokenCategory::AttributeValue => LookupTableRef::Strings(&self.attribute_value),
            TokenCategory::CharacterContentChunk => {
                LookupTableRef::Strings(&self.character_content_chunk)
            }
            TokenCategory::OtherString => LookupTableRef::Strings(&self.other_string),
            TokenCategory::ElementName => LookupTableRef::Names(&self.element_name),
            TokenCategory::AttributeName => LookupTableRef::Names(&self.attribute_name),
        }
    }

    /// Iterate all twelve tables in category order.
    pub fn tables(&self) -> impl Iterator<Item = (TokenCategory, LookupTableRef<'_>)> {
        TokenCategory::iter().map(move |category| (category, self.table(category)))
    }

    /// Freeze this vocabulary into its shareable, read-only form.
    pub fn into_shared(self) -> SharedEncoderVocabulary {
        SharedEncoderVocabulary {
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
        base: &SharedEncoderVocabulary,
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
        base: &SharedEncoderVocabulary,
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
        base: &SharedEncoderVocabulary,
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
        base: &SharedEncoderVocabulary,
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
        self.seed_fixed_entries();
    }

    /// Export the local (non-base) entries as a generic [`Vocabulary`],
    /// e.g. to publish this session's tables as a shareable external
    /// vocabulary.
    ///
    /// The reserved `xml` prefix/namespace pair is omitted: fixed entries
    /// exist implicitly in every vocabulary and are re-seeded on
    /// conversion.
    pub fn to_vocabulary(&self) -> Vocabulary {
        let names = |table: &NameLookupTable| -> Vec<Name> {
            table
                .local_names()
                .into_iter()
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
