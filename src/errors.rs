//! # Error Types

use crate::category::TokenCategory;

/// Errors from vocabulary table operations.
#[derive(Debug, thiserror::Error)]
pub enum VocabError {
    /// Decode-time lookup of an index with no corresponding entry in the
    /// mutable region or the layered base.
    ///
    /// Surfaced to the bitstream decoder, which must treat it as a corrupt
    /// or non-conformant stream.
    #[error("index {index} out of range for {category} table of size {len}")]
    IndexOutOfRange {
        /// The table the lookup was made against.
        category: TokenCategory,
        /// The requested index.
        index: crate::types::TokenIndex,
        /// The table size (base plus local entries).
        len: usize,
    },

    /// The same attribute name occurred twice on one element.
    #[error("duplicate attribute {local_name}")]
    DuplicateAttribute {
        /// Local name of the duplicated attribute.
        local_name: String,
    },
}

/// Result type for vocabulary operations.
pub type VocabResult<T> = core::result::Result<T, VocabError>;
