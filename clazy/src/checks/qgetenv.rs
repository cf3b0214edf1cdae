//! Finds `qgetenv()` calls whose `QByteArray` is only tested or converted.

use crate::ast::{CallChain, NodeId, NodeKind};
use crate::checks::ids::{CHECK_QGETENV, FIXIT_QGETENV};
use crate::checks::{Check, CheckContext, CheckError};
use crate::registry::{CheckDescriptor, CheckLevel, FixitDescriptor, FixitId, Interest};

const FIXIT_ALL: FixitId = FixitId(1);

/// Registration entry.
pub const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
    name: CHECK_QGETENV,
    level: CheckLevel::Level0,
    interest: Interest::Stmts,
    description: "Finds qgetenv() calls that allocate for nothing",
    factory: create,
    fixits: &[FixitDescriptor {
        id: FIXIT_ALL,
        name: FIXIT_QGETENV,
        check: CHECK_QGETENV,
    }],
};

fn create() -> Box<dyn Check> {
    Box::new(QGetEnv)
}

/// The `qgetenv` check.
#[derive(Debug, Default)]
pub struct QGetEnv;

impl Check for QGetEnv {
    fn name(&self) -> &'static str {
        CHECK_QGETENV
    }

    fn visit_stmt(&mut self, stmt: NodeId, cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        let unit = cx.unit;
        if !matches!(unit.kind(stmt), Some(NodeKind::MemberCall { .. })) {
            return Ok(());
        }
        let Some(method) = unit.callee(stmt).filter(|c| c.is_member_of("QByteArray")) else {
            return Ok(());
        };
        let replacement = match method.name() {
            "isEmpty" => "qEnvironmentVariableIsEmpty",
            "isNull" => "!qEnvironmentVariableIsSet",
            // toInt(bool *ok, int base) with arguments has no equivalent
            "toInt" if unit.call_args(stmt).is_empty() => "qEnvironmentVariableIntValue",
            _ => return Ok(()),
        };

        let chain = CallChain::ending_at(unit, stmt);
        let Some(first) = chain.preceding(stmt) else {
            return Ok(());
        };
        if unit.callee(first).map(|c| c.qualified_name.as_str()) != Some("qgetenv") {
            return Ok(());
        }

        let loc = unit.range(stmt).begin;
        let message = format!(
            "qgetenv().{}() allocates. Use {}() instead",
            method.name(),
            replacement.trim_start_matches('!')
        );
        let fixits = cx.try_fixit(FIXIT_ALL, loc, |synth| {
            synth.collapse_calls(first, stmt, replacement, "")
        });
        cx.emit_warning(loc, message, fixits);
        Ok(())
    }
}
