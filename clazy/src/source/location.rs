//! Positions and extents inside one translation unit's main file.

use serde::{Deserialize, Serialize};

/// A position reported by the frontend.
///
/// Only `File` locations can be lexed or rewritten. `Macro` locations come from
/// macro expansions and carry the offset of the expansion point, which keeps
/// them orderable against file locations without letting anyone edit through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceLocation {
    /// No location. Must be checked before use.
    #[default]
    Invalid,
    /// Byte offset into the file text.
    File(u32),
    /// Token produced by a macro expansion, positioned at its expansion point.
    Macro(u32),
}

impl SourceLocation {
    /// Shorthand for a file location.
    #[must_use]
    pub const fn file(offset: u32) -> Self {
        Self::File(offset)
    }

    /// Returns `true` for anything but [`SourceLocation::Invalid`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        !matches!(self, Self::Invalid)
    }

    /// Returns `true` if the location came out of a macro expansion.
    #[must_use]
    pub const fn is_macro(self) -> bool {
        matches!(self, Self::Macro(_))
    }

    /// The byte offset of a file location.
    #[must_use]
    pub const fn offset(self) -> Option<u32> {
        match self {
            Self::File(offset) => Some(offset),
            Self::Invalid | Self::Macro(_) => None,
        }
    }

    /// The offset used for ordering; the expansion point for macro locations.
    #[must_use]
    pub const fn ordering_offset(self) -> Option<u32> {
        match self {
            Self::File(offset) | Self::Macro(offset) => Some(offset),
            Self::Invalid => None,
        }
    }

    /// Strict "comes before" in file order. Invalid locations are never before anything.
    #[must_use]
    pub fn is_before(self, other: Self) -> bool {
        match (self.ordering_offset(), other.ordering_offset()) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }
}

/// A half-open byte span `[start, end)` over file locations.
///
/// Construction normalizes anything that is not two ordered file locations to
/// [`SourceSpan::INVALID`], so a valid span can always be sliced and rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceSpan {
    start: SourceLocation,
    end: SourceLocation,
}

impl SourceSpan {
    /// The sentinel returned by every utility that cannot produce a span.
    pub const INVALID: Self = Self {
        start: SourceLocation::Invalid,
        end: SourceLocation::Invalid,
    };

    /// Creates a span, or [`SourceSpan::INVALID`] if the bounds are not two ordered file locations.
    #[must_use]
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        match (start.offset(), end.offset()) {
            (Some(a), Some(b)) if a <= b => Self { start, end },
            _ => Self::INVALID,
        }
    }

    /// Start of the span.
    #[must_use]
    pub const fn start(&self) -> SourceLocation {
        self.start
    }

    /// One past the last byte of the span.
    #[must_use]
    pub const fn end(&self) -> SourceLocation {
        self.end
    }

    /// Returns `true` unless this is the invalid sentinel.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.start.is_valid()
    }

    /// Byte offsets of a valid span.
    #[must_use]
    pub const fn offsets(&self) -> Option<(u32, u32)> {
        match (self.start.offset(), self.end.offset()) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

/// Extent of an AST node in the frontend's convention: `begin` is the start of
/// the first token and `end` is the start of the *last* token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceRange {
    /// Start of the first token.
    pub begin: SourceLocation,
    /// Start of the last token.
    pub end: SourceLocation,
}

impl SourceRange {
    /// Creates a range from its two token locations.
    #[must_use]
    pub const fn new(begin: SourceLocation, end: SourceLocation) -> Self {
        Self { begin, end }
    }

    /// A range made of one token.
    #[must_use]
    pub const fn at(loc: SourceLocation) -> Self {
        Self {
            begin: loc,
            end: loc,
        }
    }

    /// Returns `true` if both ends are valid.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.begin.is_valid() && self.end.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_normalizes_to_invalid() {
        assert!(!SourceSpan::new(SourceLocation::file(5), SourceLocation::file(2)).is_valid());
        assert!(!SourceSpan::new(SourceLocation::Macro(1), SourceLocation::file(2)).is_valid());
        assert!(!SourceSpan::new(SourceLocation::Invalid, SourceLocation::file(2)).is_valid());
        assert_eq!(
            SourceSpan::new(SourceLocation::file(2), SourceLocation::file(2)).offsets(),
            Some((2, 2))
        );
    }

    #[test]
    fn test_ordering_with_macro_locations() {
        assert!(SourceLocation::file(3).is_before(SourceLocation::Macro(4)));
        assert!(!SourceLocation::Invalid.is_before(SourceLocation::file(4)));
        assert!(!SourceLocation::file(4).is_before(SourceLocation::Invalid));
    }
}
