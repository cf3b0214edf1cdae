//! Finds implicit `const char *` / `QByteArray` to `QString` conversions.
//!
//! Under Qt 4 these went through `QString::fromAscii()`. Porting code builds
//! with `QT_NO_CAST_FROM_ASCII`, so each call site gets an explicit
//! `QString::fromLatin1()`.

use crate::ast::{Callee, NodeId, NodeKind, TranslationUnit};
use crate::checks::ids::{CHECK_QT4_QSTRING_FROM_ARRAY, FIXIT_QT4_QSTRING_FROM_ARRAY};
use crate::checks::{Check, CheckContext, CheckError};
use crate::fix::{FixItSynthesizer, TextEdit, Unfixable};
use crate::registry::{CheckDescriptor, CheckLevel, FixitDescriptor, FixitId, Interest};

const FIXIT_FROM_LATIN1: FixitId = FixitId(1);

const FACTORY: &str = "QString::fromLatin1";

/// Registration entry.
pub const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
    name: CHECK_QT4_QSTRING_FROM_ARRAY,
    level: CheckLevel::Hidden,
    interest: Interest::Stmts,
    description: "Finds QString constructions and methods taking const char * or QByteArray",
    factory: create,
    fixits: &[FixitDescriptor {
        id: FIXIT_FROM_LATIN1,
        name: FIXIT_QT4_QSTRING_FROM_ARRAY,
        check: CHECK_QT4_QSTRING_FROM_ARRAY,
    }],
};

const METHODS: &[&str] = &[
    "append",
    "prepend",
    "operator=",
    "operator==",
    "operator!=",
    "operator<",
    "operator<=",
    "operator>",
    "operator>=",
    "operator+=",
];

fn create() -> Box<dyn Check> {
    Box::new(Qt4QStringFromArray)
}

/// Which kind of byte array a parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayParam {
    CharPtr,
    ByteArray,
}

impl ArrayParam {
    fn classify(type_name: &str) -> Option<Self> {
        match type_name {
            "const char *" => Some(Self::CharPtr),
            "const QByteArray &" => Some(Self::ByteArray),
            _ => None,
        }
    }

    fn spelling(self) -> &'static str {
        match self {
            Self::CharPtr => "const char *",
            Self::ByteArray => "QByteArray",
        }
    }
}

fn first_param(callee: &Callee) -> Option<ArrayParam> {
    callee
        .params
        .first()
        .and_then(|p| ArrayParam::classify(&p.type_name))
}

/// Wraps the converted argument in `QString::fromLatin1(...)`.
fn wrap_argument(
    unit: &TranslationUnit,
    synth: FixItSynthesizer<'_>,
    arg: NodeId,
) -> Result<Vec<TextEdit>, Unfixable> {
    let inner = unit.ignore_implicit(arg);
    if matches!(unit.kind(inner), Some(NodeKind::StringLiteral { .. })) {
        synth.wrap_literal_in_call(inner, FACTORY)
    } else {
        synth.wrap_expr_in_call(arg, FACTORY)
    }
}

/// The `qt4-qstring-from-array` check.
#[derive(Debug, Default)]
pub struct Qt4QStringFromArray;

impl Qt4QStringFromArray {
    fn visit_construct(ctor: NodeId, callee: &Callee, cx: &mut CheckContext<'_>) {
        let unit = cx.unit;
        if !callee.is_member_of("QString") {
            return;
        }
        let Some(param) = first_param(callee) else {
            return;
        };

        // QString("foo") as a temporary: the type name itself becomes the factory
        let is_temporary = matches!(
            cx.parents.parent_of(ctor).and_then(|p| unit.kind(p)),
            Some(NodeKind::BindTemporary)
        ) && matches!(
            cx.parents.parent_at_depth(ctor, 2).and_then(|g| unit.kind(g)),
            Some(NodeKind::FunctionalCast { .. })
        );

        let loc = unit.range(ctor).begin;
        let arg = unit.call_args(ctor).first().copied();
        let fixits = cx.try_fixit(FIXIT_FROM_LATIN1, loc, |synth| {
            if is_temporary {
                synth.replace_constructor_with_factory(ctor, "QString", FACTORY)
            } else {
                let arg = arg.ok_or(Unfixable::InvalidRange)?;
                wrap_argument(unit, synth, arg)
            }
        });
        cx.emit_warning(
            loc,
            format!("QString({}) ctor being called", param.spelling()),
            fixits,
        );
    }

    fn visit_method(
        call: NodeId,
        callee: &Callee,
        is_operator: bool,
        cx: &mut CheckContext<'_>,
    ) -> Result<(), CheckError> {
        let unit = cx.unit;
        if !callee.is_member_of("QString")
            || callee.params.len() != 1
            || !METHODS.contains(&callee.name())
        {
            return Ok(());
        }
        let Some(param) = first_param(callee) else {
            return Ok(());
        };

        // Operator calls carry the object as their first argument
        let args = unit.call_args(call);
        let arg = match (is_operator, args) {
            (true, [_, arg]) | (false, [arg]) => *arg,
            _ => {
                return Err(CheckError::UnexpectedShape(format!(
                    "QString::{} called with {} arguments",
                    callee.name(),
                    args.len()
                )));
            }
        };

        let loc = unit.range(call).begin;
        let fixits = cx.try_fixit(FIXIT_FROM_LATIN1, loc, |synth| {
            wrap_argument(unit, synth, arg)
        });
        cx.emit_warning(
            loc,
            format!(
                "QString::{}({}) being called",
                callee.name(),
                param.spelling()
            ),
            fixits,
        );
        Ok(())
    }
}

impl Check for Qt4QStringFromArray {
    fn name(&self) -> &'static str {
        CHECK_QT4_QSTRING_FROM_ARRAY
    }

    fn visit_stmt(&mut self, stmt: NodeId, cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        let unit = cx.unit;
        match unit.kind(stmt) {
            Some(NodeKind::Construct {
                constructor: Some(constructor),
            }) => {
                Self::visit_construct(stmt, constructor, cx);
                Ok(())
            }
            Some(NodeKind::OperatorCall {
                callee: Some(callee),
            }) => Self::visit_method(stmt, callee, true, cx),
            Some(NodeKind::MemberCall {
                callee: Some(callee),
            }) => Self::visit_method(stmt, callee, false, cx),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_classification() {
        assert_eq!(
            ArrayParam::classify("const char *"),
            Some(ArrayParam::CharPtr)
        );
        assert_eq!(
            ArrayParam::classify("const QByteArray &"),
            Some(ArrayParam::ByteArray)
        );
        assert_eq!(ArrayParam::classify("const QString &"), None);
        assert_eq!(ArrayParam::ByteArray.spelling(), "QByteArray");
    }
}
