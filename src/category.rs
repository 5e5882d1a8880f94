//! # Token Categories

use strum::{Display, EnumCount, EnumIter};

/// The twelve kinds of recurring lexical item subject to index-based
/// compression.
///
/// Every vocabulary holds one table per category. The declaration order
/// matches the order in which table sets appear in an initial-vocabulary
/// segment of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCount, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum TokenCategory {
    /// Restricted alphabet identifiers.
    RestrictedAlphabet,
    /// Encoding algorithm names.
    EncodingAlgorithm,
    /// Namespace prefixes.
    Prefix,
    /// Namespace names (URIs).
    NamespaceName,
    /// Element and attribute local names.
    LocalName,
    /// NCNames outside element/attribute names (PI targets, entity names).
    OtherNcName,
    /// URIs outside namespace names (system/public identifiers).
    OtherUri,
    /// Attribute values.
    AttributeValue,
    /// Character content chunks.
    CharacterContentChunk,
    /// Strings outside the other categories (comments, PI data).
    OtherString,
    /// Element qualified names.
    ElementName,
    /// Attribute qualified names.
    AttributeName,
}

#[cfg(test)]
mod tests {
    use strum::{EnumCount, IntoEnumIterator};

    use super::*;

    #[test]
    fn test_category_count() {
        assert_eq!(TokenCategory::COUNT, 12);
        assert_eq!(TokenCategory::iter().count(), 12);
    }

    #[test]
    fn test_category_display() {
        assert_eq!(TokenCategory::RestrictedAlphabet.to_string(), "restricted-alphabet");
        assert_eq!(TokenCategory::CharacterContentChunk.to_string(), "character-content-chunk");
        assert_eq!(TokenCategory::AttributeName.to_string(), "attribute-name");
    }
}
