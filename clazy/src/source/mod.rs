//! The parsed-source model the checks query: locations, tokens and line mapping.

mod location;
mod tokens;

pub use location::{SourceLocation, SourceRange, SourceSpan};
pub use tokens::{Token, TokenBuffer, TokenKind};

use crate::constants::DEFAULT_SCAN_LIMIT;

/// A utility struct to convert byte offsets to line and column numbers.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Stores the byte index of the start of each line.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Creates a new `LineIndex` by scanning the source code for newlines.
    /// Uses byte iteration since '\n' is always a single byte in UTF-8.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, byte) in source.as_bytes().iter().enumerate() {
            if *byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Converts a byte offset to a 1-indexed line number.
    #[must_use]
    pub fn line_index(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }

    /// Converts a byte offset to a 1-indexed column number.
    #[must_use]
    pub fn column_index(&self, offset: usize) -> usize {
        let line = self.line_index(offset);
        let start = self.line_starts.get(line - 1).copied().unwrap_or(0);
        offset.saturating_sub(start) + 1
    }
}

/// Read-only view of one translation unit's main file.
///
/// Bundles the text, its token buffer and line index, and the limit on how far
/// forward token scans may run.
#[derive(Debug, Clone)]
pub struct SourceManager {
    text: String,
    tokens: TokenBuffer,
    line_index: LineIndex,
    scan_limit: usize,
}

impl SourceManager {
    /// Lexes `text` and indexes its lines.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let tokens = TokenBuffer::lex(&text);
        let line_index = LineIndex::new(&text);
        Self {
            text,
            tokens,
            line_index,
            scan_limit: DEFAULT_SCAN_LIMIT,
        }
    }

    /// Overrides how many tokens a forward scan may inspect.
    #[must_use]
    pub fn with_scan_limit(mut self, scan_limit: usize) -> Self {
        self.scan_limit = scan_limit;
        self
    }

    /// The file text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The token buffer.
    #[must_use]
    pub fn tokens(&self) -> &TokenBuffer {
        &self.tokens
    }

    /// Maximum number of tokens a forward scan inspects.
    #[must_use]
    pub fn scan_limit(&self) -> usize {
        self.scan_limit
    }

    /// Index of the token containing a file location.
    #[must_use]
    pub fn token_index(&self, loc: SourceLocation) -> Option<usize> {
        self.tokens.index_containing(loc.offset()?)
    }

    /// The token containing a file location.
    #[must_use]
    pub fn token_at(&self, loc: SourceLocation) -> Option<&Token> {
        self.token_index(loc).and_then(|i| self.tokens.get(i))
    }

    /// Kind of the token containing a file location.
    #[must_use]
    pub fn token_kind_at(&self, loc: SourceLocation) -> Option<TokenKind> {
        self.token_at(loc).map(|t| t.kind)
    }

    /// The text covered by a valid span.
    #[must_use]
    pub fn slice(&self, span: SourceSpan) -> Option<&str> {
        let (start, end) = span.offsets()?;
        self.text.get(start as usize..end as usize)
    }

    /// 1-indexed line and column of a location; `(0, 0)` when invalid.
    ///
    /// Macro locations map to their expansion point.
    #[must_use]
    pub fn line_column(&self, loc: SourceLocation) -> (usize, usize) {
        match loc.ordering_offset() {
            Some(offset) => {
                let offset = offset as usize;
                (
                    self.line_index.line_index(offset),
                    self.line_index.column_index(offset),
                )
            }
            None => (0, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_column() {
        let sm = SourceManager::new("int a;\nint b;\n");
        assert_eq!(sm.line_column(SourceLocation::file(0)), (1, 1));
        assert_eq!(sm.line_column(SourceLocation::file(11)), (2, 5));
        assert_eq!(sm.line_column(SourceLocation::Macro(7)), (2, 1));
        assert_eq!(sm.line_column(SourceLocation::Invalid), (0, 0));
    }

    #[test]
    fn test_token_queries() {
        let sm = SourceManager::new("foo(\"x\");");
        assert_eq!(
            sm.token_kind_at(SourceLocation::file(1)),
            Some(TokenKind::Identifier)
        );
        assert_eq!(
            sm.token_kind_at(SourceLocation::file(4)),
            Some(TokenKind::StringLiteral)
        );
        assert_eq!(sm.token_kind_at(SourceLocation::Macro(4)), None);
        let span = SourceSpan::new(SourceLocation::file(0), SourceLocation::file(3));
        assert_eq!(sm.slice(span), Some("foo"));
    }
}
