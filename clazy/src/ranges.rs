//! Token-granular location arithmetic over the main file.
//!
//! Every function here answers with [`SourceLocation::Invalid`] or
//! [`SourceSpan::INVALID`] instead of guessing: invalid input, macro locations
//! and offsets that fall off the token buffer all end up as the sentinel.

use crate::ast::{NodeId, NodeKind, TranslationUnit};
use crate::source::{SourceLocation, SourceManager, SourceSpan, Token, TokenKind};

/// The span covering every adjacent token of a (possibly concatenated) string literal.
///
/// `"a" "b" "c"` is one literal node made of three tokens; the span ends after
/// the third. The span is invalid if `node` is not a string literal, or if the
/// node's reported extent ends past the run of literal tokens the buffer sees.
#[must_use]
pub fn span_of_literal(
    unit: &TranslationUnit,
    sources: &SourceManager,
    node: NodeId,
) -> SourceSpan {
    if !matches!(unit.kind(node), Some(NodeKind::StringLiteral { .. })) {
        return SourceSpan::INVALID;
    }
    let range = unit.range(node);
    let (Some(begin), Some(reported_end)) = (range.begin.offset(), range.end.offset()) else {
        return SourceSpan::INVALID;
    };

    let tokens = sources.tokens();
    let is_literal = |index: usize| {
        tokens
            .get(index)
            .is_some_and(|t| t.kind == TokenKind::StringLiteral)
    };
    let Some(first) = tokens.index_containing(begin).filter(|&i| is_literal(i)) else {
        return SourceSpan::INVALID;
    };
    let limit = tokens.len().min(first.saturating_add(sources.scan_limit()));
    let last = (first..limit)
        .take_while(|&i| is_literal(i))
        .last()
        .unwrap_or(first);

    match tokens.get(last) {
        Some(last_token) if reported_end <= last_token.start => SourceSpan::new(
            SourceLocation::file(begin),
            SourceLocation::file(last_token.end),
        ),
        _ => SourceSpan::INVALID,
    }
}

/// Location of the first token of `kind` at or after `start`.
///
/// The token containing `start` counts. The scan stops at the end of the file
/// or after the source manager's scan limit.
#[must_use]
pub fn locate_next_token(
    sources: &SourceManager,
    start: SourceLocation,
    kind: TokenKind,
) -> SourceLocation {
    let Some(offset) = start.offset() else {
        return SourceLocation::Invalid;
    };
    let tokens = sources.tokens();
    let first = tokens
        .index_containing(offset)
        .unwrap_or_else(|| tokens.index_at_or_after(offset));
    tokens
        .tokens()
        .iter()
        .skip(first)
        .take(sources.scan_limit())
        .find(|t| t.kind == kind)
        .map_or(SourceLocation::Invalid, |t| SourceLocation::file(t.start))
}

fn shifted_token(sources: &SourceManager, loc: SourceLocation, offset: i32) -> Option<&Token> {
    let index = sources.token_index(loc)?;
    let shifted = i64::try_from(index).ok()?.checked_add(i64::from(offset))?;
    sources.tokens().get(usize::try_from(shifted).ok()?)
}

/// The location just past the token containing `loc`, moved by `offset` tokens.
///
/// `end_of_token(loc, 0)` is the end of the token at `loc`; `-1` is the end of
/// the token before it.
#[must_use]
pub fn end_of_token(sources: &SourceManager, loc: SourceLocation, offset: i32) -> SourceLocation {
    shifted_token(sources, loc, offset)
        .map_or(SourceLocation::Invalid, |t| SourceLocation::file(t.end))
}

/// The start of the token containing `loc`, moved by `offset` tokens.
#[must_use]
pub fn begin_of_token(sources: &SourceManager, loc: SourceLocation, offset: i32) -> SourceLocation {
    shifted_token(sources, loc, offset)
        .map_or(SourceLocation::Invalid, |t| SourceLocation::file(t.start))
}

/// The rightmost location among the extents of `node` and its descendants.
///
/// Invalid if no node in the subtree has a valid extent, or if the rightmost
/// one comes from a macro expansion.
#[must_use]
pub fn deepest_source_location(unit: &TranslationUnit, node: NodeId) -> SourceLocation {
    let mut deepest = SourceLocation::Invalid;
    for visit in crate::ast::PreOrder::new(unit, node) {
        let range = unit.range(visit.node);
        for loc in [range.begin, range.end] {
            if deepest.is_before(loc) || (!deepest.is_valid() && loc.is_valid()) {
                deepest = loc;
            }
        }
    }
    if deepest.is_macro() {
        SourceLocation::Invalid
    } else {
        deepest
    }
}
