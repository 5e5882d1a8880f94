//! # Table Growth Ceilings

use strum::EnumCount;

use crate::category::TokenCategory;

/// Growth ceilings for a single vocabulary table.
///
/// Once a ceiling is reached the table silently stops growing; callers are
/// expected to fall back to literal encoding of the value. Reaching a
/// ceiling is a policy outcome, never an error.
///
/// Fixed, format-mandated entries are seeded before any document content
/// and are not counted against the ceilings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableLimits {
    /// Maximum number of entries; `None` for unbounded.
    pub max_entries: Option<usize>,

    /// Maximum cumulative byte size of entries; `None` for unbounded.
    pub max_bytes: Option<usize>,
}

impl TableLimits {
    /// Unbounded limits.
    pub const UNBOUNDED: TableLimits = TableLimits {
        max_entries: None,
        max_bytes: None,
    };

    /// Cap the number of entries.
    pub fn with_max_entries(
        mut self,
        max_entries: usize,
    ) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    /// Cap the cumulative byte size of entries.
    pub fn with_max_bytes(
        mut self,
        max_bytes: usize,
    ) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    /// Check whether a value of `byte_len` bytes may still be added to a
    /// table already holding `entries` entries totalling `bytes` bytes.
    pub fn admits(
        &self,
        entries: usize,
        bytes: usize,
        byte_len: usize,
    ) -> bool {
        if let Some(max) = self.max_entries {
            if entries >= max {
                return false;
            }
        }
        if let Some(max) = self.max_bytes {
            if bytes + byte_len > max {
                return false;
            }
        }
        true
    }
}

/// Per-category growth ceilings for a whole vocabulary.
///
/// Read once at vocabulary construction time; the default is unbounded for
/// every category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyLimits {
    limits: [TableLimits; TokenCategory::COUNT],
}

impl Default for VocabularyLimits {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl VocabularyLimits {
    /// Limits that never reject an entry.
    pub fn unbounded() -> Self {
        Self {
            limits: [TableLimits::UNBOUNDED; TokenCategory::COUNT],
        }
    }

    /// The limits for one category.
    pub fn get(
        &self,
        category: TokenCategory,
    ) -> TableLimits {
        self.limits[category as usize]
    }

    /// Set the limits for one category.
    pub fn set(
        &mut self,
        category: TokenCategory,
        limits: TableLimits,
    ) {
        self.limits[category as usize] = limits;
    }

    /// Builder-style [`Self::set`].
    pub fn with(
        mut self,
        category: TokenCategory,
        limits: TableLimits,
    ) -> Self {
        self.set(category, limits);
        self
    }
}
