//! Builds the edits behind each fix-it.
//!
//! Every algorithm either returns a complete, ordered, non-overlapping edit
//! list or [`Unfixable`]. There is no partial result: a check that gets
//! `Err` emits its warning without edits and queues a manual-fixit note.

use super::TextEdit;
use crate::ast::{CallChain, Callee, NodeId, NodeKind, TranslationUnit};
use crate::ranges::{deepest_source_location, end_of_token, locate_next_token, span_of_literal};
use crate::source::{SourceLocation, SourceManager, SourceSpan, TokenKind};
use thiserror::Error;

/// Why a fix-it could not be synthesized for this instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unfixable {
    /// A location involved is invalid or comes from a macro expansion.
    #[error("source range is invalid or inside a macro expansion")]
    InvalidRange,
    /// The node is not a string literal.
    #[error("node is not a string literal")]
    NotALiteral,
    /// The second call is not invoked on the result of the first.
    #[error("calls are not chained")]
    NotChained,
    /// The tokens around a call do not have the expected shape.
    #[error("unexpected token shape: expected {expected}")]
    UnexpectedTokens {
        /// What was expected.
        expected: &'static str,
    },
    /// The replacement cannot follow the qualifier in front of the call.
    #[error("replacement `{0}` cannot follow a qualified name")]
    QualifiedReplacement(String),
    /// Neither the token scan nor the spelling check found the constructor's type name.
    #[error("cannot locate constructor type name `{0}`")]
    TypeNameNotFound(String),
}

/// Stateless edit synthesis over one translation unit.
#[derive(Debug, Clone, Copy)]
pub struct FixItSynthesizer<'a> {
    unit: &'a TranslationUnit,
    sources: &'a SourceManager,
}

/// `QString`, `::QString` and `Qt::QString` all name `QString`; `decltype(s)` does not.
fn names_type(spelled: &str, type_name: &str) -> bool {
    let spelled: String = spelled.split_whitespace().collect();
    let last = type_name.rsplit("::").next().unwrap_or(type_name);
    spelled == type_name
        || spelled
            .strip_suffix(last)
            .and_then(|qualifier| qualifier.strip_suffix("::"))
            .is_some_and(|qualifier| {
                qualifier
                    .chars()
                    .all(|c| c == ':' || c == '_' || c.is_ascii_alphanumeric())
            })
}

fn offset_of(loc: SourceLocation) -> Result<u32, Unfixable> {
    loc.offset().ok_or(Unfixable::InvalidRange)
}

impl<'a> FixItSynthesizer<'a> {
    /// A synthesizer over `unit` and the text it was parsed from.
    #[must_use]
    pub fn new(unit: &'a TranslationUnit, sources: &'a SourceManager) -> Self {
        Self { unit, sources }
    }

    /// `method(` before the span and `)` after it.
    ///
    /// # Errors
    ///
    /// [`Unfixable::InvalidRange`] if the span is invalid.
    pub fn wrap_in_call(
        &self,
        span: SourceSpan,
        method: &str,
    ) -> Result<Vec<TextEdit>, Unfixable> {
        let (start, end) = span.offsets().ok_or(Unfixable::InvalidRange)?;
        Ok(vec![
            TextEdit::insertion(start, format!("{method}(")),
            TextEdit::insertion(end, ")"),
        ])
    }

    /// Wraps a whole string literal, every concatenated token of it, in `method(...)`.
    ///
    /// # Errors
    ///
    /// [`Unfixable::NotALiteral`] for other nodes and
    /// [`Unfixable::InvalidRange`] if the literal's tokens cannot be delimited.
    pub fn wrap_literal_in_call(
        &self,
        literal: NodeId,
        method: &str,
    ) -> Result<Vec<TextEdit>, Unfixable> {
        if !matches!(
            self.unit.kind(literal),
            Some(NodeKind::StringLiteral { .. })
        ) {
            return Err(Unfixable::NotALiteral);
        }
        self.wrap_in_call(span_of_literal(self.unit, self.sources, literal), method)
    }

    /// Wraps any expression in `method(...)`, from its first token to the end
    /// of the rightmost token of its subtree.
    ///
    /// # Errors
    ///
    /// [`Unfixable::InvalidRange`] if either end is invalid or a macro location.
    pub fn wrap_expr_in_call(
        &self,
        expr: NodeId,
        method: &str,
    ) -> Result<Vec<TextEdit>, Unfixable> {
        let begin = self.unit.range(expr).begin;
        let end = end_of_token(self.sources, deepest_source_location(self.unit, expr), 0);
        self.wrap_in_call(SourceSpan::new(begin, end), method)
    }

    /// Turns `foo(args).bar()` into `name(args)suffix`.
    ///
    /// `first` is the `foo(args)` call and `second` the member call made on its
    /// result. The single replacement runs from `foo`'s name token (any
    /// qualifier in front of it is kept) to the end of `second`.
    ///
    /// # Errors
    ///
    /// [`Unfixable::NotChained`] if `second` is not called on `first`,
    /// [`Unfixable::UnexpectedTokens`] if the text between the calls is not
    /// `) . bar (` (or `->`), and [`Unfixable::InvalidRange`] for invalid or
    /// macro locations.
    pub fn collapse_calls(
        &self,
        first: NodeId,
        second: NodeId,
        name: &str,
        suffix: &str,
    ) -> Result<Vec<TextEdit>, Unfixable> {
        let receiver = self
            .unit
            .implicit_object_argument(second)
            .map(|r| self.unit.ignore_implicit(r));
        if receiver != Some(first) {
            return Err(Unfixable::NotChained);
        }

        let first_range = self.unit.range(first);
        let first_begin = offset_of(first_range.begin)?;
        let rparen = offset_of(first_range.end)?;
        let callee_name = self
            .unit
            .callee(first)
            .map(Callee::name)
            .ok_or(Unfixable::UnexpectedTokens {
                expected: "resolved callee",
            })?;

        let tokens = self.sources.tokens();
        let (name_start, lparen) = self
            .callee_name_index(first, first_begin, rparen, callee_name)
            .and_then(|i| Some((tokens.get(i)?.start, tokens.get(i + 1)?.start)))
            .ok_or(Unfixable::UnexpectedTokens {
                expected: "callee name followed by `(`",
            })?;
        let starts_identifier = name.starts_with(|c: char| c == '_' || c.is_ascii_alphabetic());
        if name_start != first_begin && !starts_identifier {
            return Err(Unfixable::QualifiedReplacement(name.to_owned()));
        }

        let rparen_loc = SourceLocation::file(rparen);
        let rparen_index = self
            .sources
            .token_index(rparen_loc)
            .filter(|_| self.sources.token_kind_at(rparen_loc) == Some(TokenKind::RParen))
            .ok_or(Unfixable::UnexpectedTokens { expected: "`)`" })?;
        let kind_at = |i: usize| tokens.get(rparen_index + i).map(|t| t.kind);
        if !matches!(kind_at(1), Some(TokenKind::Period | TokenKind::Arrow))
            || kind_at(2) != Some(TokenKind::Identifier)
            || kind_at(3) != Some(TokenKind::LParen)
        {
            return Err(Unfixable::UnexpectedTokens {
                expected: "`.member(` after the first call",
            });
        }

        let args_span = SourceSpan::new(
            end_of_token(self.sources, SourceLocation::file(lparen), 0),
            rparen_loc,
        );
        let args = self
            .sources
            .slice(args_span)
            .ok_or(Unfixable::InvalidRange)?;
        let end = offset_of(end_of_token(self.sources, self.unit.range(second).end, 0))?;
        if end <= rparen {
            return Err(Unfixable::InvalidRange);
        }

        Ok(vec![TextEdit::replacement(
            name_start,
            end,
            format!("{name}({args}){suffix}"),
        )])
    }

    /// Index of the token naming the callee of `call`, the one right before
    /// the call's own `(`.
    ///
    /// The callee expression ends on that token. When its extent does not
    /// point at `name (`, the pair is searched inside the call and accepted
    /// only if it occurs once.
    fn callee_name_index(
        &self,
        call: NodeId,
        begin: u32,
        rparen: u32,
        name: &str,
    ) -> Option<usize> {
        let tokens = self.sources.tokens();
        let text = self.sources.text();
        let names_call = |i: usize| match (tokens.get(i), tokens.get(i + 1)) {
            (Some(t), Some(next)) => {
                t.kind == TokenKind::Identifier
                    && next.kind == TokenKind::LParen
                    && (begin..rparen).contains(&t.start)
                    && text.get(t.start as usize..t.end as usize) == Some(name)
            }
            _ => false,
        };

        let spelled = self
            .unit
            .children(call)
            .first()
            .and_then(|&callee| self.sources.token_index(self.unit.range(callee).end));
        if let Some(index) = spelled.filter(|&i| names_call(i)) {
            return Some(index);
        }

        let first = tokens.index_containing(begin)?;
        let mut found = (first..tokens.len())
            .take(self.sources.scan_limit())
            .take_while(|&i| tokens.get(i).is_some_and(|t| t.start < rparen))
            .filter(|&i| names_call(i));
        match (found.next(), found.next()) {
            (Some(index), None) => Some(index),
            _ => None,
        }
    }

    /// Replaces the whole chain ending in `second`, from the start of its
    /// innermost call through the end of `second`, with `text`.
    ///
    /// # Errors
    ///
    /// [`Unfixable::InvalidRange`] if the chain's start or `second`'s end is
    /// invalid or a macro location.
    pub fn replace_chain(&self, second: NodeId, text: &str) -> Result<Vec<TextEdit>, Unfixable> {
        let chain = CallChain::ending_at(self.unit, second);
        let innermost = chain.first().ok_or(Unfixable::NotChained)?;
        let start = offset_of(self.unit.range(innermost).begin)?;
        let end = offset_of(end_of_token(self.sources, self.unit.range(second).end, 0))?;
        if end < start {
            return Err(Unfixable::InvalidRange);
        }
        Ok(vec![TextEdit::replacement(start, end, text)])
    }

    /// Replaces the type name in front of a constructor call, `QString("x")`
    /// becoming `QString::fromLatin1("x")`.
    ///
    /// The name ends at the token before the constructor's `(`, and the text
    /// up to there must spell `type_name`, possibly qualified. Otherwise the
    /// text at the start of the constructor is accepted only if it is exactly
    /// `type_name` followed by `(`.
    ///
    /// # Errors
    ///
    /// [`Unfixable::TypeNameNotFound`] if neither approach finds the name.
    pub fn replace_constructor_with_factory(
        &self,
        ctor: NodeId,
        type_name: &str,
        factory: &str,
    ) -> Result<Vec<TextEdit>, Unfixable> {
        let range = self.unit.range(ctor);
        let start = offset_of(range.begin)?;

        let lparen = locate_next_token(self.sources, range.begin, TokenKind::LParen);
        let inside = matches!(
            (lparen.ordering_offset(), range.end.ordering_offset()),
            (Some(l), Some(e)) if l <= e
        );
        let name_end = if inside {
            end_of_token(self.sources, lparen, -1).offset()
        } else {
            None
        };
        let spells_type = |end: u32| {
            end > start
                && self
                    .sources
                    .text()
                    .get(start as usize..end as usize)
                    .is_some_and(|spelled| names_type(spelled, type_name))
        };
        if let Some(end) = name_end.filter(|&end| spells_type(end)) {
            return Ok(vec![TextEdit::replacement(start, end, factory)]);
        }

        tracing::debug!(
            type_name,
            "token scan failed, checking spelling at constructor start"
        );
        let spelled = self
            .sources
            .text()
            .get(start as usize..)
            .and_then(|rest| rest.strip_prefix(type_name))
            .is_some_and(|rest| rest.trim_start().starts_with('('));
        let name_end = u32::try_from(type_name.len())
            .ok()
            .and_then(|len| start.checked_add(len))
            .filter(|_| spelled);
        match name_end {
            Some(end) => Ok(vec![TextEdit::replacement(start, end, factory)]),
            None => Err(Unfixable::TypeNameNotFound(type_name.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::UnitBuilder;
    use crate::fix::SourceRewriter;
    use crate::source::SourceRange;

    #[allow(clippy::cast_possible_truncation)]
    fn find_from(text: &str, needle: &str, from: u32) -> u32 {
        let from = from as usize;
        (text[from..].find(needle).unwrap() + from) as u32
    }

    #[allow(clippy::cast_possible_truncation)]
    fn rfind_before(text: &str, needle: &str, before: u32) -> u32 {
        text[..before as usize].rfind(needle).unwrap() as u32
    }

    fn rewrite(text: &str, edits: &[TextEdit]) -> String {
        let mut rewriter = SourceRewriter::new(text);
        rewriter.add_group(edits).unwrap();
        rewriter.apply().unwrap()
    }

    /// `<begin>...name(...) method()` with both calls resolved on `QDateTime`.
    ///
    /// The callee expression ends on `name` unless `spelled_callee` is false,
    /// in which case its end is left invalid.
    fn chained(
        text: &str,
        begin: &str,
        name: &str,
        method: &str,
        spelled_callee: bool,
    ) -> (TranslationUnit, NodeId, NodeId) {
        let file = SourceLocation::file;
        let mut b = UnitBuilder::new();
        let begin = find_from(text, begin, 0);
        let method_at = find_from(text, method, begin);
        let rparen = rfind_before(text, ")", method_at);
        let name_at = rfind_before(text, name, rparen);

        let callee_end = if spelled_callee {
            file(name_at)
        } else {
            SourceLocation::Invalid
        };
        let callee = b.decl_ref(SourceRange::new(file(begin), callee_end), name);
        let first = b.call(
            Callee::new(format!("QDateTime::{name}")).in_record("QDateTime"),
            callee,
            [],
            file(rparen),
        );
        let temporary = b.wrap(NodeKind::MaterializeTemporary, first);
        let member = b.member(temporary, method, file(method_at));
        let second = b.member_call(
            Callee::new(format!("QDateTime::{method}")).in_record("QDateTime"),
            member,
            [],
            file(find_from(text, ")", method_at)),
        );
        let root = b.add(NodeKind::TranslationUnit, SourceRange::default(), [second]);
        (b.finish(root).unwrap(), first, second)
    }

    /// A `QString` construct starting at `begin` and ending at `end`.
    fn construct(text: &str, begin: &str, end: SourceLocation) -> (TranslationUnit, NodeId) {
        let mut b = UnitBuilder::new();
        let literal = b.string_literal(SourceLocation::file(find_from(text, "\"", 0)), "abc");
        let ctor = b.add(
            NodeKind::Construct {
                constructor: Some(Callee::new("QString::QString").in_record("QString")),
            },
            SourceRange::new(SourceLocation::file(find_from(text, begin, 0)), end),
            [literal],
        );
        let root = b.add(NodeKind::TranslationUnit, SourceRange::default(), [ctor]);
        (b.finish(root).unwrap(), ctor)
    }

    fn closing_paren(text: &str) -> SourceLocation {
        SourceLocation::file(find_from(text, ")", find_from(text, "\"", 0)))
    }

    #[test]
    fn test_collapse_keeps_qualifier() {
        let text = "auto d = QDateTime::currentDateTime().toUTC();";
        let (unit, first, second) = chained(text, "QDateTime", "currentDateTime", "toUTC", true);
        let sm = SourceManager::new(text);
        let edits = FixItSynthesizer::new(&unit, &sm)
            .collapse_calls(first, second, "currentDateTimeUtc", "")
            .unwrap();
        assert_eq!(
            rewrite(text, &edits),
            "auto d = QDateTime::currentDateTimeUtc();"
        );
    }

    #[test]
    fn test_collapse_with_parenthesized_qualifier() {
        let text = "auto d = decltype(x)::currentDateTime().toUTC();";
        let (unit, first, second) = chained(text, "decltype", "currentDateTime", "toUTC", true);
        let sm = SourceManager::new(text);
        let edits = FixItSynthesizer::new(&unit, &sm)
            .collapse_calls(first, second, "currentDateTimeUtc", "")
            .unwrap();
        assert_eq!(
            rewrite(text, &edits),
            "auto d = decltype(x)::currentDateTimeUtc();"
        );
    }

    #[test]
    fn test_collapse_searches_name_when_callee_extent_is_unusable() {
        let text = "auto d = decltype(x)::currentDateTime().toUTC();";
        let (unit, first, second) = chained(text, "decltype", "currentDateTime", "toUTC", false);
        let sm = SourceManager::new(text);
        let edits = FixItSynthesizer::new(&unit, &sm)
            .collapse_calls(first, second, "currentDateTimeUtc", "")
            .unwrap();
        assert_eq!(
            rewrite(text, &edits),
            "auto d = decltype(x)::currentDateTimeUtc();"
        );
    }

    #[test]
    fn test_collapse_refuses_ambiguous_name_search() {
        let text = "auto d = decltype(currentDateTime())::currentDateTime().toUTC();";
        let (unit, first, second) = chained(text, "decltype", "currentDateTime", "toUTC", false);
        let sm = SourceManager::new(text);
        let result = FixItSynthesizer::new(&unit, &sm).collapse_calls(
            first,
            second,
            "currentDateTimeUtc",
            "",
        );
        assert!(matches!(result, Err(Unfixable::UnexpectedTokens { .. })));
    }

    #[test]
    fn test_collapse_rejects_macro_between_calls() {
        // #define UTC .toUTC
        let text = "auto d = QDateTime::currentDateTime() UTC();";
        let (unit, first, second) = chained(text, "QDateTime", "currentDateTime", "UTC", true);
        let sm = SourceManager::new(text);
        let result = FixItSynthesizer::new(&unit, &sm).collapse_calls(
            first,
            second,
            "currentDateTimeUtc",
            "",
        );
        assert_eq!(
            result,
            Err(Unfixable::UnexpectedTokens {
                expected: "`.member(` after the first call"
            })
        );
    }

    #[test]
    fn test_collapse_rejects_unchained_calls() {
        let text = "auto d = QDateTime::currentDateTime().toUTC();";
        let (unit, _, second) = chained(text, "QDateTime", "currentDateTime", "toUTC", true);
        let sm = SourceManager::new(text);
        let result = FixItSynthesizer::new(&unit, &sm).collapse_calls(
            second,
            second,
            "currentDateTimeUtc",
            "",
        );
        assert_eq!(result, Err(Unfixable::NotChained));
    }

    #[test]
    fn test_collapse_rejects_operator_after_qualifier() {
        let text = "auto d = QDateTime::currentDateTime().toUTC();";
        let (unit, first, second) = chained(text, "QDateTime", "currentDateTime", "toUTC", true);
        let sm = SourceManager::new(text);
        let result = FixItSynthesizer::new(&unit, &sm).collapse_calls(first, second, "!now", "");
        assert_eq!(result, Err(Unfixable::QualifiedReplacement("!now".to_owned())));
    }

    #[test]
    fn test_invalid_span_and_non_literal() {
        let text = "auto d = QDateTime::currentDateTime().toUTC();";
        let (unit, first, _) = chained(text, "QDateTime", "currentDateTime", "toUTC", true);
        let sm = SourceManager::new(text);
        let synth = FixItSynthesizer::new(&unit, &sm);
        assert_eq!(
            synth.wrap_in_call(SourceSpan::INVALID, "f"),
            Err(Unfixable::InvalidRange)
        );
        assert_eq!(
            synth.wrap_literal_in_call(first, "QLatin1String"),
            Err(Unfixable::NotALiteral)
        );
    }

    #[test]
    fn test_factory_replaces_type_name() {
        let text = "foo(QString(\"abc\"));";
        let (unit, ctor) = construct(text, "QString", closing_paren(text));
        let sm = SourceManager::new(text);
        let edits = FixItSynthesizer::new(&unit, &sm)
            .replace_constructor_with_factory(ctor, "QString", "QString::fromLatin1")
            .unwrap();
        assert_eq!(edits, vec![TextEdit::replacement(4, 11, "QString::fromLatin1")]);
    }

    #[test]
    fn test_factory_replaces_qualified_type_name() {
        let text = "foo(::QString(\"abc\"));";
        let (unit, ctor) = construct(text, "::QString", closing_paren(text));
        let sm = SourceManager::new(text);
        let edits = FixItSynthesizer::new(&unit, &sm)
            .replace_constructor_with_factory(ctor, "QString", "QString::fromLatin1")
            .unwrap();
        assert_eq!(
            rewrite(text, &edits),
            "foo(QString::fromLatin1(\"abc\"));"
        );
    }

    #[test]
    fn test_factory_refuses_decltype() {
        let text = "foo(decltype(s)(\"abc\"));";
        let (unit, ctor) = construct(text, "decltype", closing_paren(text));
        let sm = SourceManager::new(text);
        let result = FixItSynthesizer::new(&unit, &sm).replace_constructor_with_factory(
            ctor,
            "QString",
            "QString::fromLatin1",
        );
        assert_eq!(result, Err(Unfixable::TypeNameNotFound("QString".to_owned())));
    }

    #[test]
    fn test_factory_spelling_fallback() {
        // The construct's end is unknown, so the `(` cannot be placed inside it
        let text = "QString (\"abc\")";
        let (unit, ctor) = construct(text, "QString", SourceLocation::Invalid);
        let sm = SourceManager::new(text);
        let edits = FixItSynthesizer::new(&unit, &sm)
            .replace_constructor_with_factory(ctor, "QString", "QString::fromLatin1")
            .unwrap();
        assert_eq!(edits, vec![TextEdit::replacement(0, 7, "QString::fromLatin1")]);
    }

    #[test]
    fn test_factory_spelling_fallback_fails() {
        let text = "QStr (\"abc\")";
        let (unit, ctor) = construct(text, "QStr", SourceLocation::Invalid);
        let sm = SourceManager::new(text);
        let result = FixItSynthesizer::new(&unit, &sm).replace_constructor_with_factory(
            ctor,
            "QString",
            "QString::fromLatin1",
        );
        assert_eq!(result, Err(Unfixable::TypeNameNotFound("QString".to_owned())));
    }

    #[test]
    fn test_names_type() {
        assert!(names_type("QString", "QString"));
        assert!(names_type("::QString", "QString"));
        assert!(names_type("Qt :: QString", "QString"));
        assert!(!names_type("decltype", "QString"));
        assert!(!names_type("MyQString", "QString"));
    }
}
