//! Child-to-parent lookup, filled while the tree is walked.

use super::NodeId;
use rustc_hash::FxHashMap;

/// Maps each visited node to its parent.
///
/// The dispatcher records a node before any check sees it, so by the time a
/// check runs, the node and all of its ancestors are present. Entries are
/// never overwritten.
#[derive(Debug, Default, Clone)]
pub struct ParentIndex {
    parents: FxHashMap<NodeId, NodeId>,
}

impl ParentIndex {
    /// An empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, child: NodeId, parent: NodeId) {
        self.parents.entry(child).or_insert(parent);
    }

    /// The parent of `node`, if it has been recorded.
    #[must_use]
    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.parents.get(&node).copied()
    }

    /// The ancestor `depth` levels up; depth 0 is the node itself.
    #[must_use]
    pub fn parent_at_depth(&self, node: NodeId, depth: usize) -> Option<NodeId> {
        let mut current = node;
        for _ in 0..depth {
            current = self.parent_of(current)?;
        }
        Some(current)
    }

    /// Ancestors of `node`, nearest first.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent_of(node), move |&n| self.parent_of(n))
    }

    /// Number of recorded edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_node_has_no_parent() {
        let index = ParentIndex::new();
        assert_eq!(index.parent_of(NodeId(3)), None);
        assert_eq!(index.parent_at_depth(NodeId(3), 0), Some(NodeId(3)));
        assert_eq!(index.parent_at_depth(NodeId(3), 1), None);
    }

    #[test]
    fn test_first_record_wins() {
        let mut index = ParentIndex::new();
        index.record(NodeId(1), NodeId(0));
        index.record(NodeId(1), NodeId(5));
        assert_eq!(index.parent_of(NodeId(1)), Some(NodeId(0)));
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let mut index = ParentIndex::new();
        index.record(NodeId(3), NodeId(2));
        index.record(NodeId(2), NodeId(1));
        index.record(NodeId(1), NodeId(0));
        let chain: Vec<_> = index.ancestors(NodeId(3)).collect();
        assert_eq!(chain, vec![NodeId(2), NodeId(1), NodeId(0)]);
        assert_eq!(index.parent_at_depth(NodeId(3), 2), Some(NodeId(1)));
    }
}
