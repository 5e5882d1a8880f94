//! # Per-Category Tables
//!
//! One token category is backed by one table. Two shapes exist over the
//! same logical contents:
//! * [`LookupTable`] - value -> index with deduplication, used while
//!   encoding.
//! * [`ValueArray`] / [`NameArray`] - index -> value growable arrays, used
//!   while decoding.
//!
//! Every shape supports an optional read-only base tier
//! (`set_read_only_base`): the base occupies the low index range, local
//! entries start at the base's size, and the base is never mutated through
//! the child.

pub mod array;
pub mod lookup;
pub mod names;

#[doc(inline)]
pub use array::ValueArray;
#[doc(inline)]
pub use lookup::{LookupTable, Obtained, TableValue};
#[doc(inline)]
pub use names::{NameArray, NameLookupTable, QualifiedName};
