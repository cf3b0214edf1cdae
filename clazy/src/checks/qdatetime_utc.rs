//! Finds `QDateTime::currentDateTime()` converted straight to UTC or epoch time.
//!
//! `currentDateTime()` computes the local time zone offset, which the
//! conversion then throws away. `currentDateTimeUtc()` and
//! `currentMSecsSinceEpoch()` skip that work.

use crate::ast::{CallChain, NodeId, NodeKind};
use crate::checks::ids::{CHECK_QDATETIME_UTC, FIXIT_QDATETIME_UTC};
use crate::checks::{Check, CheckContext, CheckError};
use crate::registry::{CheckDescriptor, CheckLevel, FixitDescriptor, FixitId, Interest};

const FIXIT_ALL: FixitId = FixitId(1);

/// Registration entry.
pub const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
    name: CHECK_QDATETIME_UTC,
    level: CheckLevel::Level0,
    interest: Interest::Stmts,
    description: "Finds QDateTime::currentDateTime() that should be currentDateTimeUtc()",
    factory: create,
    fixits: &[FixitDescriptor {
        id: FIXIT_ALL,
        name: FIXIT_QDATETIME_UTC,
        check: CHECK_QDATETIME_UTC,
    }],
};

fn create() -> Box<dyn Check> {
    Box::new(QDateTimeUtc)
}

enum Rewrite {
    /// Keep the first call's arguments, rename it and append `suffix`.
    Collapse { suffix: &'static str },
    /// Replace the whole chain.
    Replace { text: &'static str },
}

/// The `qdatetime-utc` check.
#[derive(Debug, Default)]
pub struct QDateTimeUtc;

impl Check for QDateTimeUtc {
    fn name(&self) -> &'static str {
        CHECK_QDATETIME_UTC
    }

    fn visit_stmt(&mut self, stmt: NodeId, cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        let unit = cx.unit;
        if !matches!(unit.kind(stmt), Some(NodeKind::MemberCall { .. })) {
            return Ok(());
        }
        let Some(second) = unit.callee(stmt) else {
            return Ok(());
        };
        let (rewrite, advice) = match second.qualified_name.as_str() {
            "QDateTime::toTime_t" => (
                Rewrite::Collapse {
                    suffix: ".toTime_t()",
                },
                "QDateTime::currentDateTimeUtc().toTime_t()",
            ),
            "QDateTime::toUTC" => (
                Rewrite::Collapse { suffix: "" },
                "QDateTime::currentDateTimeUtc()",
            ),
            "QDateTime::toMSecsSinceEpoch" => (
                Rewrite::Replace {
                    text: "QDateTime::currentMSecsSinceEpoch()",
                },
                "QDateTime::currentMSecsSinceEpoch()",
            ),
            _ => return Ok(()),
        };

        let chain = CallChain::ending_at(unit, stmt);
        let Some(first) = chain.preceding(stmt) else {
            return Ok(());
        };
        let is_current_date_time = unit
            .callee(first)
            .is_some_and(|c| c.qualified_name == "QDateTime::currentDateTime");
        if !is_current_date_time {
            return Ok(());
        }

        let loc = unit.range(stmt).begin;
        let fixits = cx.try_fixit(FIXIT_ALL, loc, |synth| match rewrite {
            Rewrite::Collapse { suffix } => {
                synth.collapse_calls(first, stmt, "currentDateTimeUtc", suffix)
            }
            Rewrite::Replace { text } => synth.replace_chain(stmt, text),
        });
        cx.emit_warning(loc, format!("Use {advice} instead"), fixits);
        Ok(())
    }
}
