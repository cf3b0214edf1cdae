//! Applies accepted fix-its to the original text.
//!
//! Edits are grouped per diagnostic. A group is accepted or rejected as a
//! whole, so a file never ends up with half of a fix.
//!
//! # Usage
//!
//! ```
//! use clazy::fix::{SourceRewriter, TextEdit};
//!
//! let mut rewriter = SourceRewriter::new("foo(\"abc\");");
//! rewriter
//!     .add_group(&[
//!         TextEdit::insertion(4, "QString::fromLatin1("),
//!         TextEdit::insertion(9, ")"),
//!     ])
//!     .unwrap();
//! assert_eq!(rewriter.apply().unwrap(), "foo(QString::fromLatin1(\"abc\"));");
//! ```

use super::TextEdit;
use thiserror::Error;

/// Why a group of edits cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    /// Two edits touch the same bytes.
    #[error("edits {edit_a} and {edit_b} overlap")]
    OverlappingEdits {
        /// Index of the earlier edit.
        edit_a: usize,
        /// Index of the later edit.
        edit_b: usize,
    },
    /// An edit reaches past the end of the text.
    #[error("edit {edit_index} out of bounds: end {end} > source length {source_len}")]
    OutOfBounds {
        /// Index of the bad edit.
        edit_index: usize,
        /// Its end offset.
        end: u32,
        /// Length of the text.
        source_len: usize,
    },
    /// A replacement whose end precedes its start.
    #[error("edit {edit_index} ends before it starts")]
    Reversed {
        /// Index of the bad edit.
        edit_index: usize,
    },
    /// An edit boundary splits a UTF-8 sequence.
    #[error("offset {offset} is not on a character boundary")]
    NotCharBoundary {
        /// Offending offset.
        offset: u32,
    },
}

/// Collects edit groups against one file and applies them in a single pass.
#[derive(Debug, Clone)]
pub struct SourceRewriter {
    source: String,
    edits: Vec<TextEdit>,
}

impl SourceRewriter {
    /// A rewriter over `source` with no pending edits.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            edits: Vec::new(),
        }
    }

    /// Number of pending edits.
    #[must_use]
    pub fn edit_count(&self) -> usize {
        self.edits.len()
    }

    /// Returns `true` if any edit is pending.
    #[must_use]
    pub fn has_edits(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Queues one diagnostic's edits, or none of them.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the pending edits untouched, if an edit is
    /// out of bounds or reversed, splits a character, or overlaps another
    /// edit of the group or an already accepted one.
    pub fn add_group(&mut self, group: &[TextEdit]) -> Result<(), RewriteError> {
        let offset = self.edits.len();
        for (i, edit) in group.iter().enumerate() {
            self.check_bounds(offset + i, edit)?;
        }
        for (i, edit) in group.iter().enumerate() {
            let b = offset + i;
            let mut earlier = self.edits.iter().chain(&group[..i]);
            if let Some(a) = earlier.position(|other| other.overlaps(edit)) {
                return Err(RewriteError::OverlappingEdits { edit_a: a, edit_b: b });
            }
        }
        self.edits.extend_from_slice(group);
        Ok(())
    }

    fn check_bounds(&self, edit_index: usize, edit: &TextEdit) -> Result<(), RewriteError> {
        if edit.end() < edit.start() {
            return Err(RewriteError::Reversed { edit_index });
        }
        if edit.end() as usize > self.source.len() {
            return Err(RewriteError::OutOfBounds {
                edit_index,
                end: edit.end(),
                source_len: self.source.len(),
            });
        }
        for offset in [edit.start(), edit.end()] {
            if !self.source.is_char_boundary(offset as usize) {
                return Err(RewriteError::NotCharBoundary { offset });
            }
        }
        Ok(())
    }

    /// Applies every pending edit and returns the new text.
    ///
    /// Edits are applied in start order. Insertions at the same offset keep
    /// the order they were added in and go before a replacement starting there.
    ///
    /// # Errors
    ///
    /// Never fails for edits accepted by [`SourceRewriter::add_group`]; the
    /// result type leaves room for hosts that build edit lists by hand.
    pub fn apply(self) -> Result<String, RewriteError> {
        let mut edits = self.edits;
        edits.sort_by_key(|e| (e.start(), matches!(e, TextEdit::Replacement { .. })));

        let mut result = String::with_capacity(self.source.len());
        let mut cursor = 0usize;
        for (i, edit) in edits.iter().enumerate() {
            let (start, end) = (edit.start() as usize, edit.end() as usize);
            let Some(kept) = self.source.get(cursor..start) else {
                return Err(RewriteError::OverlappingEdits {
                    edit_a: i.saturating_sub(1),
                    edit_b: i,
                });
            };
            result.push_str(kept);
            result.push_str(edit.text());
            cursor = cursor.max(end);
        }
        result.push_str(self.source.get(cursor..).unwrap_or_default());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_replacement() {
        let mut rewriter = SourceRewriter::new("hello world");
        rewriter
            .add_group(&[TextEdit::replacement(0, 5, "hi")])
            .expect("should accept");
        assert_eq!(rewriter.apply().expect("should apply"), "hi world");
    }

    #[test]
    fn test_overlapping_group_is_rejected_whole() {
        let mut rewriter = SourceRewriter::new("hello world");
        rewriter
            .add_group(&[TextEdit::replacement(0, 8, "hi")])
            .expect("should accept");
        let result = rewriter.add_group(&[
            TextEdit::insertion(10, "!"),
            TextEdit::replacement(5, 10, "there"),
        ]);
        assert!(matches!(result, Err(RewriteError::OverlappingEdits { .. })));
        assert_eq!(rewriter.edit_count(), 1);
        assert_eq!(rewriter.apply().expect("should apply"), "hirld");
    }

    #[test]
    fn test_out_of_bounds_error() {
        let mut rewriter = SourceRewriter::new("short");
        let result = rewriter.add_group(&[TextEdit::replacement(0, 100, "long")]);
        assert!(matches!(result, Err(RewriteError::OutOfBounds { .. })));
        assert!(!rewriter.has_edits());
    }

    #[test]
    fn test_reversed_and_char_boundary() {
        let mut rewriter = SourceRewriter::new("héllo");
        assert_eq!(
            rewriter.add_group(&[TextEdit::replacement(3, 1, "x")]),
            Err(RewriteError::Reversed { edit_index: 0 })
        );
        assert_eq!(
            rewriter.add_group(&[TextEdit::insertion(2, "x")]),
            Err(RewriteError::NotCharBoundary { offset: 2 })
        );
    }

    #[test]
    fn test_same_position_insertions_keep_emission_order() {
        let mut rewriter = SourceRewriter::new("x;");
        rewriter
            .add_group(&[TextEdit::insertion(1, "a"), TextEdit::insertion(1, "b")])
            .expect("should accept");
        rewriter
            .add_group(&[TextEdit::insertion(1, "c")])
            .expect("should accept");
        assert_eq!(rewriter.apply().expect("should apply"), "xabc;");
    }

    #[test]
    fn test_insertion_before_replacement_at_same_offset() {
        let mut rewriter = SourceRewriter::new("QString(s)");
        rewriter
            .add_group(&[TextEdit::replacement(0, 7, "QString::fromLatin1")])
            .expect("should accept");
        rewriter
            .add_group(&[TextEdit::insertion(0, "/*x*/")])
            .expect("should accept");
        assert_eq!(
            rewriter.apply().expect("should apply"),
            "/*x*/QString::fromLatin1(s)"
        );
    }

    #[test]
    fn test_adjacent_non_overlapping_edits() {
        let mut rewriter = SourceRewriter::new("abcdef");
        rewriter
            .add_group(&[
                TextEdit::replacement(0, 3, "XXX"),
                TextEdit::replacement(3, 6, "YYY"),
            ])
            .expect("should accept");
        assert_eq!(rewriter.apply().expect("should apply"), "XXXYYY");
    }

    #[test]
    fn test_empty_edits() {
        let rewriter = SourceRewriter::new("hello world");
        assert_eq!(rewriter.apply().expect("should apply"), "hello world");
    }
}
