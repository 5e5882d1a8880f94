//! # Format-Agnostic Vocabulary Description

/// Raw qualified name in a [`Vocabulary`] description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Name {
    /// Prefix string; empty when absent.
    pub prefix: String,

    /// Namespace name (URI); empty when absent.
    pub namespace_name: String,

    /// Local name.
    pub local_name: String,
}

impl Name {
    /// Create a raw qualified name.
    pub fn new(
        prefix: impl Into<String>,
        namespace_name: impl Into<String>,
        local_name: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            namespace_name: namespace_name.into(),
            local_name: local_name.into(),
        }
    }
}

/// Format-agnostic description of a vocabulary.
///
/// Lists, per category, the ordered raw tokens from which a specialized
/// encode-time or decode-time vocabulary is built. Index assignment during
/// conversion follows the iteration order of these sequences, independently
/// per category; zero-length raw values are skipped and never assigned an
/// index.
///
/// This is what a URI-to-vocabulary registry resolves an external
/// vocabulary reference into, and what
/// [`super::EncoderVocabulary::to_vocabulary`] exports for sharing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    /// Restricted alphabet identifiers.
    pub restricted_alphabets: Vec<String>,

    /// Encoding algorithm names.
    pub encoding_algorithms: Vec<String>,

    /// Namespace prefixes.
    pub prefixes: Vec<String>,

    /// Namespace names (URIs).
    pub namespace_names: Vec<String>,

    /// Element and attribute local names.
    pub local_names: Vec<String>,

    /// NCNames outside element/attribute names.
    pub other_ncnames: Vec<String>,

    /// URIs outside namespace names.
    pub other_uris: Vec<String>,

    /// Attribute values.
    pub attribute_values: Vec<String>,

    /// Character content chunks.
    pub character_content_chunks: Vec<String>,

    /// Strings outside the other categories.
    pub other_strings: Vec<String>,

    /// Element qualified names.
    pub element_names: Vec<Name>,

    /// Attribute qualified names.
    pub attribute_names: Vec<Name>,
}

impl Vocabulary {
    /// True when no category lists any token.
    pub fn is_empty(&self) -> bool {
        self.restricted_alphabets.is_empty()
            && self.encoding_algorithms.is_empty()
            && self.prefixes.is_empty()
            && self.namespace_names.is_empty()
            && self.local_names.is_empty()
            && self.other_ncnames.is_empty()
            && self.other_uris.is_empty()
            && self.attribute_values.is_empty()
            && self.character_content_chunks.is_empty()
            && self.other_strings.is_empty()
            && self.element_names.is_empty()
            && self.attribute_names.is_empty()
    }
}
