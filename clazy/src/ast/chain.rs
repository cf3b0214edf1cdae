//! Chains of calls where each call is invoked on the result of the previous one.

use super::{NodeId, NodeKind, TranslationUnit};
use smallvec::SmallVec;

/// `a().b().c()` as `[a, b, c]`: innermost call first, outermost last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallChain {
    calls: SmallVec<[NodeId; 4]>,
}

impl CallChain {
    /// The chain that ends at `call`, following member-call receivers inwards.
    ///
    /// Implicit casts and temporaries between the calls are skipped. If `call`
    /// is not a call at all, the chain is empty.
    #[must_use]
    pub fn ending_at(unit: &TranslationUnit, call: NodeId) -> Self {
        let mut calls = SmallVec::new();
        let mut current = Some(call);
        while let Some(id) = current {
            let Some(kind) = unit.kind(id) else { break };
            if !kind.is_call() {
                break;
            }
            calls.push(id);
            current = match kind {
                NodeKind::MemberCall { .. } => unit
                    .implicit_object_argument(id)
                    .map(|receiver| unit.ignore_implicit(receiver)),
                _ => None,
            };
        }
        calls.reverse();
        Self { calls }
    }

    /// Calls in evaluation order.
    #[must_use]
    pub fn calls(&self) -> &[NodeId] {
        &self.calls
    }

    /// The innermost call.
    #[must_use]
    pub fn first(&self) -> Option<NodeId> {
        self.calls.first().copied()
    }

    /// The outermost call.
    #[must_use]
    pub fn last(&self) -> Option<NodeId> {
        self.calls.last().copied()
    }

    /// Number of calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Returns `true` if the chain has no calls.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// The call whose result `call` is invoked on.
    #[must_use]
    pub fn preceding(&self, call: NodeId) -> Option<NodeId> {
        let position = self.calls.iter().position(|&c| c == call)?;
        position.checked_sub(1).map(|i| self.calls[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Callee, UnitBuilder};
    use crate::source::{SourceLocation, SourceRange};

    #[test]
    fn test_chain_through_temporaries() {
        // QDateTime::currentDateTime().toTime_t()
        let mut b = UnitBuilder::new();
        let at = SourceLocation::file;
        let callee_ref = b.decl_ref(SourceRange::new(at(0), at(11)), "currentDateTime");
        let inner = b.call(
            Callee::new("QDateTime::currentDateTime").in_record("QDateTime"),
            callee_ref,
            [],
            at(27),
        );
        let temp = b.wrap(NodeKind::MaterializeTemporary, inner);
        let member = b.member(temp, "toTime_t", at(29));
        let outer = b.member_call(
            Callee::new("QDateTime::toTime_t").in_record("QDateTime"),
            member,
            [],
            at(38),
        );
        let root = b.add(NodeKind::TranslationUnit, SourceRange::default(), [outer]);
        let unit = b.finish(root).unwrap();

        let chain = CallChain::ending_at(&unit, outer);
        assert_eq!(chain.calls(), &[inner, outer]);
        assert_eq!(chain.preceding(outer), Some(inner));
        assert_eq!(chain.preceding(inner), None);
        assert!(CallChain::ending_at(&unit, root).is_empty());
    }
}
