//! # Vocabularies
//!
//! A vocabulary aggregates exactly twelve per-category tables for one
//! encode or decode session, or for one shared external dictionary.
//!
//! * [`Vocabulary`] - the format-agnostic description: ordered raw tokens
//!   per category, as resolved from a vocabulary registry.
//! * [`EncoderVocabulary`] / [`DecoderVocabulary`] - the specialized
//!   session forms, built fresh or via `from_vocabulary`.
//! * [`SharedEncoderVocabulary`] / [`SharedDecoderVocabulary`] - frozen,
//!   cheaply cloneable forms installed as the read-only tier beneath a
//!   session vocabulary (initial or externally referenced layering).

pub mod decoder;
pub mod encoder;
pub mod generic;

#[doc(inline)]
pub use decoder::{ArrayTableRef, DecoderVocabulary, SharedDecoderVocabulary};
#[doc(inline)]
pub use encoder::{EncoderVocabulary, LookupTableRef, SharedEncoderVocabulary};
#[doc(inline)]
pub use generic::{Name, Vocabulary};

use crate::types::TokenIndex;

/// The reserved XML namespace prefix, present in every vocabulary.
pub const XML_PREFIX: &str = "xml";

/// The reserved XML namespace name, present in every vocabulary.
pub const XML_NAMESPACE_NAME: &str = "http://www.w3.org/XML/1998/namespace";

/// Fixed index of the reserved [`XML_PREFIX`] / [`XML_NAMESPACE_NAME`]
/// pair in the prefix and namespace-name tables.
pub const RESERVED_XML_INDEX: TokenIndex = 0;
