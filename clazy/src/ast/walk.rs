//! Iterative pre-order traversal.

use super::{NodeId, TranslationUnit};

/// One step of a [`PreOrder`] walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
    /// The node being entered.
    pub node: NodeId,
    /// Its parent, `None` for the starting node.
    pub parent: Option<NodeId>,
    /// Distance from the starting node.
    pub depth: usize,
}

/// Pre-order, left-to-right traversal with an explicit stack.
///
/// Deep expression chains never touch the call stack.
#[derive(Debug)]
pub struct PreOrder<'a> {
    unit: &'a TranslationUnit,
    stack: Vec<Visit>,
}

impl<'a> PreOrder<'a> {
    /// Starts a walk at `start`.
    #[must_use]
    pub fn new(unit: &'a TranslationUnit, start: NodeId) -> Self {
        Self {
            unit,
            stack: vec![Visit {
                node: start,
                parent: None,
                depth: 0,
            }],
        }
    }
}

impl Iterator for PreOrder<'_> {
    type Item = Visit;

    fn next(&mut self) -> Option<Visit> {
        let visit = self.stack.pop()?;
        let children = self.unit.children(visit.node);
        self.stack.extend(children.iter().rev().map(|&child| Visit {
            node: child,
            parent: Some(visit.node),
            depth: visit.depth + 1,
        }));
        Some(visit)
    }
}
