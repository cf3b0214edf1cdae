//! Shared helpers: build trees whose extents point into a source snippet.
#![allow(dead_code, clippy::unwrap_used, clippy::cast_possible_truncation)]

use clazy::ast::{Callee, NodeId, NodeKind, TranslationUnit, UnitBuilder};
use clazy::diagnostic::Diagnostic;
use clazy::dispatch::CheckDispatcher;
use clazy::fix::SourceRewriter;
use clazy::registry::Registry;
use clazy::source::{SourceLocation, SourceManager, SourceRange};

/// Byte offset of the first `needle` at or after `from`.
pub fn find_from(src: &str, needle: &str, from: u32) -> u32 {
    let from = from as usize;
    (src[from..].find(needle).unwrap() + from) as u32
}

/// Byte offset of the first `needle`.
pub fn offset(src: &str, needle: &str) -> u32 {
    find_from(src, needle, 0)
}

/// Location of the first `needle`.
pub fn loc(src: &str, needle: &str) -> SourceLocation {
    SourceLocation::file(offset(src, needle))
}

/// Runs the named checks with the named fixits over `unit`.
pub fn run(src: &str, unit: &TranslationUnit, checks: &[&str], fixits: &[&str]) -> Vec<Diagnostic> {
    let registry = Registry::builtin().unwrap();
    let selection = registry.select(checks, fixits).unwrap();
    let sources = SourceManager::new(src);
    CheckDispatcher::new(&selection).run(unit, &sources)
}

/// Applies every diagnostic's edits to `src`.
pub fn apply(src: &str, diagnostics: &[Diagnostic]) -> String {
    let mut rewriter = SourceRewriter::new(src);
    for diagnostic in diagnostics {
        rewriter.add_group(&diagnostic.fixits).unwrap();
    }
    rewriter.apply().unwrap()
}

/// Wraps `nodes` in a function body under a translation unit root.
pub fn finish(mut b: UnitBuilder, nodes: impl IntoIterator<Item = NodeId>) -> TranslationUnit {
    let body = b.add(NodeKind::Compound, SourceRange::default(), nodes);
    let function = b.add(
        NodeKind::Function {
            qualified_name: "f".to_owned(),
            params: Vec::new(),
        },
        SourceRange::default(),
        [body],
    );
    let root = b.add(NodeKind::TranslationUnit, SourceRange::default(), [function]);
    b.finish(root).unwrap()
}

/// A call written `first_begin ... first_name(arg).method()` in `src`.
pub struct Chain<'a> {
    /// Where the callee expression starts (the qualifier, if any).
    pub first_begin: &'a str,
    /// The callee's name token.
    pub first_name: &'a str,
    /// Resolution of the first call.
    pub first: Callee,
    /// A single argument: a string literal when quoted, else a variable.
    pub arg: Option<&'a str>,
    /// Member called on the result.
    pub method: &'a str,
    /// Resolution of the member call.
    pub second: Callee,
}

/// Builds `chain` inside a function body. Returns the unit and the two calls.
pub fn chain_unit(src: &str, chain: Chain<'_>) -> (TranslationUnit, NodeId, NodeId) {
    let at = SourceLocation::file;
    let mut b = UnitBuilder::new();

    let begin = offset(src, chain.first_begin);
    let name = find_from(src, chain.first_name, begin);
    let callee_name = chain.first.name().to_owned();
    let callee_ref = b.decl_ref(SourceRange::new(at(begin), at(name)), &callee_name);

    let mut args = Vec::new();
    if let Some(arg) = chain.arg {
        let arg_at = at(find_from(src, arg, name));
        let node = if arg.starts_with('"') {
            b.string_literal(arg_at, arg.trim_matches('"'))
        } else {
            b.decl_ref(SourceRange::at(arg_at), arg)
        };
        args.push(b.wrap(NodeKind::ImplicitCast, node));
    }

    let rparen = find_from(src, ")", name);
    let first = b.call(chain.first, callee_ref, args, at(rparen));
    let temporary = b.wrap(NodeKind::MaterializeTemporary, first);

    let method = find_from(src, chain.method, rparen);
    let member = b.member(temporary, chain.method, at(method));
    let second_rparen = find_from(src, ")", method);
    let second = b.member_call(chain.second, member, [], at(second_rparen));

    (finish(b, [second]), first, second)
}

/// `QDateTime::currentDateTime().<method>()`
pub fn date_time_unit(src: &str, method: &str) -> (TranslationUnit, NodeId, NodeId) {
    chain_unit(
        src,
        Chain {
            first_begin: "QDateTime::currentDateTime",
            first_name: "currentDateTime",
            first: Callee::new("QDateTime::currentDateTime").in_record("QDateTime"),
            arg: None,
            method,
            second: Callee::new(format!("QDateTime::{method}")).in_record("QDateTime"),
        },
    )
}

/// `qgetenv(<arg>).<method>()`
pub fn qgetenv_unit(src: &str, arg: &str, method: &str) -> (TranslationUnit, NodeId, NodeId) {
    chain_unit(
        src,
        Chain {
            first_begin: "qgetenv",
            first_name: "qgetenv",
            first: Callee::new("qgetenv").with_params(["const char *"]),
            arg: Some(arg),
            method,
            second: Callee::new(format!("QByteArray::{method}")).in_record("QByteArray"),
        },
    )
}

/// A `QString` constructor call taking `param`, with one argument starting at `arg`.
///
/// As a temporary the tree is `FunctionalCast > BindTemporary > Construct`,
/// otherwise the construct initializes variable `s` directly.
pub fn qstring_ctor_unit(
    src: &str,
    param: &str,
    arg: &str,
    temporary: bool,
) -> (TranslationUnit, NodeId) {
    let at = SourceLocation::file;
    let mut b = UnitBuilder::new();

    let begin = offset(src, "QString");
    let rparen = find_from(src, ")", begin);
    let arg_at = find_from(src, arg, begin);
    let argument = if arg.starts_with('"') {
        b.string_literal(at(arg_at), arg.trim_matches('"'))
    } else {
        b.decl_ref(SourceRange::at(at(arg_at)), arg)
    };
    let argument = b.wrap(NodeKind::ImplicitCast, argument);

    let constructor = Callee::new("QString::QString")
        .in_record("QString")
        .with_params([param]);
    let range = if temporary {
        SourceRange::new(at(begin), at(rparen))
    } else {
        // `QString s("abc")`: the construct starts at the variable name
        SourceRange::new(at(find_from(src, "s", begin + 7)), at(rparen))
    };
    let ctor = b.add(
        NodeKind::Construct {
            constructor: Some(constructor),
        },
        range,
        [argument],
    );

    let top = if temporary {
        let bound = b.wrap(NodeKind::BindTemporary, ctor);
        b.add(
            NodeKind::FunctionalCast {
                type_name: "QString".to_owned(),
            },
            SourceRange::new(at(begin), at(rparen)),
            [bound],
        )
    } else {
        b.add(
            NodeKind::Var {
                name: "s".to_owned(),
                type_name: "QString".to_owned(),
            },
            SourceRange::new(at(begin), at(rparen)),
            [ctor],
        )
    };
    let stmt = if temporary {
        top
    } else {
        b.add(NodeKind::DeclStmt, SourceRange::new(at(begin), at(rparen)), [top])
    };
    (finish(b, [stmt]), ctor)
}
