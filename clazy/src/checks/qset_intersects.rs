//! Finds `a.intersect(b).isEmpty()`, which copies and modifies `a` just to test for overlap.

use crate::ast::{CallChain, NodeId, NodeKind};
use crate::checks::ids::CHECK_QSET_INTERSECTS;
use crate::checks::{Check, CheckContext, CheckError};
use crate::registry::{CheckDescriptor, CheckLevel, Interest};

/// Registration entry.
pub const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
    name: CHECK_QSET_INTERSECTS,
    level: CheckLevel::Level0,
    interest: Interest::Stmts,
    description: "Finds QSet::intersect() used as a test, use QSet::intersects() instead",
    factory: create,
    fixits: &[],
};

fn create() -> Box<dyn Check> {
    Box::new(QSetIntersects)
}

/// The `qset-intersects` check.
#[derive(Debug, Default)]
pub struct QSetIntersects;

impl Check for QSetIntersects {
    fn name(&self) -> &'static str {
        CHECK_QSET_INTERSECTS
    }

    fn visit_stmt(&mut self, stmt: NodeId, cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        let unit = cx.unit;
        if !matches!(unit.kind(stmt), Some(NodeKind::MemberCall { .. })) {
            return Ok(());
        }
        let is_empty_call = unit
            .callee(stmt)
            .is_some_and(|c| c.is_member_of("QSet") && c.name() == "isEmpty");
        if !is_empty_call {
            return Ok(());
        }

        let chain = CallChain::ending_at(unit, stmt);
        let intersected = chain
            .preceding(stmt)
            .and_then(|first| unit.callee(first))
            .is_some_and(|c| c.is_member_of("QSet") && c.name() == "intersect");
        if intersected {
            cx.emit_warning(
                unit.range(stmt).begin,
                "Use QSet::intersects() instead",
                Vec::new(),
            );
        }
        Ok(())
    }
}
