//! Textual edits over byte offsets of the original file.

use serde::{Deserialize, Serialize};

/// One edit against the original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextEdit {
    /// Insert `text` before the byte at `at`.
    Insertion {
        /// Byte offset.
        at: u32,
        /// Inserted text.
        text: String,
    },
    /// Replace bytes `[start, end)` with `text`.
    Replacement {
        /// First replaced byte.
        start: u32,
        /// One past the last replaced byte.
        end: u32,
        /// Replacement text.
        text: String,
    },
}

impl TextEdit {
    /// An insertion.
    #[must_use]
    pub fn insertion(at: u32, text: impl Into<String>) -> Self {
        Self::Insertion {
            at,
            text: text.into(),
        }
    }

    /// A replacement.
    #[must_use]
    pub fn replacement(start: u32, end: u32, text: impl Into<String>) -> Self {
        Self::Replacement {
            start,
            end,
            text: text.into(),
        }
    }

    /// Start of the affected range.
    #[must_use]
    pub const fn start(&self) -> u32 {
        match self {
            Self::Insertion { at, .. } => *at,
            Self::Replacement { start, .. } => *start,
        }
    }

    /// End of the affected range; equal to `start()` for insertions.
    #[must_use]
    pub const fn end(&self) -> u32 {
        match self {
            Self::Insertion { at, .. } => *at,
            Self::Replacement { end, .. } => *end,
        }
    }

    /// The text written by the edit.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Insertion { text, .. } | Self::Replacement { text, .. } => text,
        }
    }

    /// Returns `true` if the two edits touch the same bytes.
    ///
    /// Insertions never overlap each other, and an insertion only overlaps a
    /// replacement when it falls strictly inside it.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        let (a_start, a_end) = (self.start(), self.end());
        let (b_start, b_end) = (other.start(), other.end());
        match (a_start == a_end, b_start == b_end) {
            (true, true) => false,
            (true, false) => b_start < a_start && a_start < b_end,
            (false, true) => a_start < b_start && b_start < a_end,
            (false, false) => a_start < b_end && b_start < a_end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_rules() {
        let replace = TextEdit::replacement(2, 6, "x");
        assert!(replace.overlaps(&TextEdit::replacement(5, 8, "y")));
        assert!(!replace.overlaps(&TextEdit::replacement(6, 8, "y")));
        assert!(replace.overlaps(&TextEdit::insertion(4, "i")));
        assert!(!replace.overlaps(&TextEdit::insertion(2, "i")));
        assert!(!replace.overlaps(&TextEdit::insertion(6, "i")));
        assert!(!TextEdit::insertion(3, "a").overlaps(&TextEdit::insertion(3, "b")));
    }
}
