//! # `fastinfoset-vocab` Vocabulary Tables
//!
//! This is the vocabulary (symbol table) subsystem underlying a Fast
//! Infoset style binary XML encoding. Recurring lexical material — prefixes,
//! namespace names, local names, qualified names, attribute values, and
//! character content chunks — is transmitted once and referenced thereafter
//! by a small integer index.
//!
//! See:
//! * [`tables`] for the per-category table shapes:
//!   [`tables::LookupTable`] (value -> index, used while encoding) and
//!   [`tables::ValueArray`] (index -> value, used while decoding).
//! * [`vocab`] for the twelve-table aggregates:
//!   [`vocab::EncoderVocabulary`] and [`vocab::DecoderVocabulary`],
//!   the format-agnostic [`vocab::Vocabulary`] description,
//!   and the shareable frozen forms used for vocabulary layering.
//! * [`limits`] to configure per-category growth ceilings.
//!
//! A vocabulary instance is driven by exactly one encode or decode session
//! at a time; shared base vocabularies are immutable and may back any
//! number of concurrent sessions.
//!
//! ## Crate Features
//!
//! #### feature: ``ahash``
//!
//! This swaps all `HashMap` implementations for ``ahash``; which is a
//! performance win on many/(most?) modern CPUs.
//!
//! This is done by the [`types::CommonHashMap`] type alias machinery.
//!
//! ## Example
//!
//! ```rust
//! use fastinfoset_vocab::tables::Obtained;
//! use fastinfoset_vocab::vocab::{DecoderVocabulary, EncoderVocabulary};
//!
//! let mut enc = EncoderVocabulary::new();
//! assert_eq!(enc.local_name.obtain_index("item"), Obtained::Added(0));
//! assert_eq!(enc.local_name.obtain_index("item"), Obtained::Found(0));
//!
//! let mut dec = DecoderVocabulary::new();
//! let index = dec.local_name.add("item".to_string());
//! assert_eq!(dec.local_name.get(index).unwrap(), "item");
//! ```
#![warn(missing_docs, unused)]

pub mod category;
pub mod errors;
pub mod limits;
pub mod tables;
pub mod types;
pub mod vocab;

#[doc(inline)]
pub use category::TokenCategory;
#[doc(inline)]
pub use errors::{VocabError, VocabResult};
#[doc(inline)]
pub use limits::{TableLimits, VocabularyLimits};
#[doc(inline)]
pub use tables::{LookupTable, NameArray, NameLookupTable, Obtained, QualifiedName, ValueArray};
#[doc(inline)]
pub use vocab::{
    DecoderVocabulary, EncoderVocabulary, Name, SharedDecoderVocabulary, SharedEncoderVocabulary,
    Vocabulary,
};
