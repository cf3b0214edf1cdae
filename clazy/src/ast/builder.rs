//! Bottom-up construction and validation of a [`TranslationUnit`].

use super::{Callee, Node, NodeId, NodeKind, TranslationUnit};
use crate::source::{SourceLocation, SourceRange};
use thiserror::Error;

/// Why a node arena is not a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    /// The arena has no nodes.
    #[error("translation unit has no nodes")]
    Empty,
    /// The root id is outside the arena.
    #[error("root node {0} does not exist")]
    MissingRoot(u32),
    /// A child id is outside the arena.
    #[error("node {parent} refers to missing child {child}")]
    MissingChild {
        /// Referring node.
        parent: u32,
        /// Missing id.
        child: u32,
    },
    /// A node is listed as a child more than once, or the root is someone's child.
    #[error("node {0} has more than one parent")]
    SharedNode(u32),
    /// Some nodes cannot be reached from the root.
    #[error("{0} node(s) unreachable from the root")]
    Unreachable(usize),
}

/// Checks that `nodes` form a tree rooted at `root`.
pub(super) fn validate(nodes: &[Node], root: NodeId) -> Result<(), UnitError> {
    if nodes.is_empty() {
        return Err(UnitError::Empty);
    }
    if root.index() >= nodes.len() {
        return Err(UnitError::MissingRoot(root.0));
    }

    let mut has_parent = vec![false; nodes.len()];
    has_parent[root.index()] = true;
    for (index, node) in nodes.iter().enumerate() {
        for child in &node.children {
            let Some(seen) = has_parent.get_mut(child.index()) else {
                #[allow(clippy::cast_possible_truncation)]
                return Err(UnitError::MissingChild {
                    parent: index as u32,
                    child: child.0,
                });
            };
            if *seen {
                return Err(UnitError::SharedNode(child.0));
            }
            *seen = true;
        }
    }

    // Single parents everywhere; a disconnected cycle is the only way left to
    // break the tree, and it shows up as unreachable nodes.
    let mut reached = 0usize;
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        reached += 1;
        stack.extend(nodes[id.index()].children.iter().copied());
    }
    if reached == nodes.len() {
        Ok(())
    } else {
        Err(UnitError::Unreachable(nodes.len() - reached))
    }
}

/// Builds a unit from the leaves up: children are added before their parent.
///
/// ```
/// use clazy::ast::{NodeKind, UnitBuilder};
/// use clazy::source::{SourceLocation, SourceRange};
///
/// let mut b = UnitBuilder::new();
/// let lit = b.string_literal(SourceLocation::file(0), "abc");
/// let root = b.add(NodeKind::TranslationUnit, SourceRange::default(), [lit]);
/// let unit = b.finish(root).unwrap();
/// assert_eq!(unit.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct UnitBuilder {
    nodes: Vec<Node>,
}

impl UnitBuilder {
    /// An empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its id.
    pub fn add(
        &mut self,
        kind: NodeKind,
        range: SourceRange,
        children: impl IntoIterator<Item = NodeId>,
    ) -> NodeId {
        #[allow(clippy::cast_possible_truncation)]
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            range,
            children: children.into_iter().collect(),
        });
        id
    }

    /// Extent of a node added earlier.
    #[must_use]
    pub fn range_of(&self, id: NodeId) -> SourceRange {
        self.nodes.get(id.index()).map(|n| n.range).unwrap_or_default()
    }

    /// A single-token string literal.
    pub fn string_literal(&mut self, at: SourceLocation, value: &str) -> NodeId {
        self.add(
            NodeKind::StringLiteral {
                value: value.to_owned(),
            },
            SourceRange::at(at),
            [],
        )
    }

    /// A reference to a named declaration.
    pub fn decl_ref(&mut self, range: SourceRange, name: &str) -> NodeId {
        self.add(
            NodeKind::DeclRef {
                name: name.to_owned(),
            },
            range,
            [],
        )
    }

    /// Wraps `inner` in a node of `kind` with the same extent.
    pub fn wrap(&mut self, kind: NodeKind, inner: NodeId) -> NodeId {
        let range = self.range_of(inner);
        self.add(kind, range, [inner])
    }

    /// `base.name` spanning from the base to `name_at`.
    pub fn member(&mut self, base: NodeId, name: &str, name_at: SourceLocation) -> NodeId {
        let range = SourceRange::new(self.range_of(base).begin, name_at);
        self.add(
            NodeKind::Member {
                name: name.to_owned(),
                arrow: false,
            },
            range,
            [base],
        )
    }

    /// A member call whose extent runs from the receiver to `rparen`.
    pub fn member_call(
        &mut self,
        callee: Callee,
        member: NodeId,
        args: impl IntoIterator<Item = NodeId>,
        rparen: SourceLocation,
    ) -> NodeId {
        let range = SourceRange::new(self.range_of(member).begin, rparen);
        self.add(
            NodeKind::MemberCall {
                callee: Some(callee),
            },
            range,
            std::iter::once(member).chain(args),
        )
    }

    /// A free-function or static call whose extent runs from the callee expression to `rparen`.
    pub fn call(
        &mut self,
        callee: Callee,
        callee_expr: NodeId,
        args: impl IntoIterator<Item = NodeId>,
        rparen: SourceLocation,
    ) -> NodeId {
        let range = SourceRange::new(self.range_of(callee_expr).begin, rparen);
        self.add(
            NodeKind::Call {
                callee: Some(callee),
            },
            range,
            std::iter::once(callee_expr).chain(args),
        )
    }

    /// Validates the arena and freezes it.
    ///
    /// # Errors
    ///
    /// Returns a [`UnitError`] if the nodes do not form a tree rooted at `root`.
    pub fn finish(self, root: NodeId) -> Result<TranslationUnit, UnitError> {
        validate(&self.nodes, root)?;
        Ok(TranslationUnit {
            nodes: self.nodes,
            root,
        })
    }
}
