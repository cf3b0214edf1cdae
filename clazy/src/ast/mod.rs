//! Arena model of the translation unit handed over by the frontend.
//!
//! The frontend owns parsing, name lookup and overload resolution. What reaches
//! the checks is this immutable tree: node kinds, extents, children in source
//! order, and the already-resolved target of every call.

mod builder;
mod chain;
mod parents;
mod walk;

pub use builder::{UnitBuilder, UnitError};
pub use chain::CallChain;
pub use parents::ParentIndex;
pub use walk::{PreOrder, Visit};

use crate::source::SourceRange;
use serde::{Deserialize, Serialize};

/// Index of a node inside its [`TranslationUnit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Position in the node arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A parameter of a resolved function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Spelled type, e.g. `const char *` or `const QByteArray &`.
    pub type_name: String,
    /// Parameter name, when declared.
    #[serde(default)]
    pub name: Option<String>,
}

impl Param {
    /// An unnamed parameter of the given type.
    #[must_use]
    pub fn of_type(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: None,
        }
    }
}

/// The function or method a call resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callee {
    /// Fully qualified name, e.g. `QDateTime::currentDateTime`.
    pub qualified_name: String,
    /// Declaring record for methods and constructors.
    #[serde(default)]
    pub record: Option<String>,
    /// Declared parameters.
    #[serde(default)]
    pub params: Vec<Param>,
}

impl Callee {
    /// A free function or a method, by qualified name.
    #[must_use]
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            record: None,
            params: Vec::new(),
        }
    }

    /// Sets the declaring record.
    #[must_use]
    pub fn in_record(mut self, record: impl Into<String>) -> Self {
        self.record = Some(record.into());
        self
    }

    /// Sets the parameter types.
    #[must_use]
    pub fn with_params<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = types.into_iter().map(Param::of_type).collect();
        self
    }

    /// Unqualified name: the last `::` segment.
    #[must_use]
    pub fn name(&self) -> &str {
        self.qualified_name
            .rsplit("::")
            .next()
            .unwrap_or(&self.qualified_name)
    }

    /// Returns `true` if the callee is declared in `record`.
    #[must_use]
    pub fn is_member_of(&self, record: &str) -> bool {
        self.record.as_deref() == Some(record)
    }
}

/// What kind of special member a method is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodRole {
    /// Ordinary member function.
    #[default]
    Method,
    /// Constructor other than copy/move.
    Constructor,
    /// `T(const T &)`
    CopyConstructor,
    /// `T(T &&)`
    MoveConstructor,
    /// `T &operator=(const T &)`
    CopyAssignment,
    /// `T &operator=(T &&)`
    MoveAssignment,
    /// `~T()`
    Destructor,
}

/// A method declaration inside a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    /// Unqualified name.
    pub name: String,
    /// Declaring record.
    pub record: String,
    /// Special-member classification.
    #[serde(default)]
    pub role: MethodRole,
    /// Declared parameters.
    #[serde(default)]
    pub params: Vec<Param>,
    /// Declared by the compiler rather than the user.
    #[serde(default)]
    pub is_implicit: bool,
    /// `= delete`
    #[serde(default)]
    pub is_deleted: bool,
    /// `= default`
    #[serde(default)]
    pub is_defaulted: bool,
}

impl MethodDecl {
    /// Declared in source, not synthesized by the compiler.
    #[must_use]
    pub fn is_user_declared(&self) -> bool {
        !self.is_implicit
    }
}

/// Node kinds. Declarations come first, then statements and expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    /// Root of the tree.
    TranslationUnit,
    /// `class` / `struct` definition.
    Record {
        /// Qualified name.
        name: String,
        /// Every base class, direct and indirect, by qualified name.
        #[serde(default)]
        bases: Vec<String>,
    },
    /// Method, constructor or destructor.
    Method(MethodDecl),
    /// Free function.
    Function {
        /// Qualified name.
        qualified_name: String,
        /// Declared parameters.
        #[serde(default)]
        params: Vec<Param>,
    },
    /// Variable declaration.
    Var {
        /// Variable name.
        name: String,
        /// Spelled type.
        type_name: String,
    },
    /// `{ ... }`
    Compound,
    /// Statement wrapping declarations.
    DeclStmt,
    /// `return ...;`
    Return,
    /// Free-function or static-method call. Children: callee expression, then arguments.
    Call {
        /// Resolved target, if the frontend could resolve it directly.
        #[serde(default)]
        callee: Option<Callee>,
    },
    /// Member call. Children: the member expression, then arguments.
    MemberCall {
        /// Resolved target method.
        #[serde(default)]
        callee: Option<Callee>,
    },
    /// Overloaded operator call. Children: callee expression, then operands.
    OperatorCall {
        /// Resolved operator function.
        #[serde(default)]
        callee: Option<Callee>,
    },
    /// Constructor invocation. Children: arguments.
    Construct {
        /// Resolved constructor.
        #[serde(default)]
        constructor: Option<Callee>,
    },
    /// Temporary that needs a destructor call.
    BindTemporary,
    /// Temporary materialized to bind a reference.
    MaterializeTemporary,
    /// Conversion inserted by the compiler.
    ImplicitCast,
    /// `T(expr)`
    FunctionalCast {
        /// Spelled target type.
        type_name: String,
    },
    /// `( expr )`
    Paren,
    /// String literal, possibly several adjacent tokens.
    StringLiteral {
        /// Concatenated value.
        value: String,
    },
    /// Integer literal.
    IntegerLiteral {
        /// Value.
        value: i64,
    },
    /// Reference to a named declaration.
    DeclRef {
        /// Name as referenced.
        name: String,
    },
    /// `base.name` or `base->name`. Child: base.
    Member {
        /// Member name.
        name: String,
        /// `->` rather than `.`.
        #[serde(default)]
        arrow: bool,
    },
}

impl NodeKind {
    /// Returns `true` for declaration kinds.
    #[must_use]
    pub fn is_decl(&self) -> bool {
        matches!(
            self,
            Self::TranslationUnit
                | Self::Record { .. }
                | Self::Method(_)
                | Self::Function { .. }
                | Self::Var { .. }
        )
    }

    /// Returns `true` for statements and expressions.
    #[must_use]
    pub fn is_stmt(&self) -> bool {
        !self.is_decl()
    }

    /// Returns `true` for the three call kinds.
    #[must_use]
    pub fn is_call(&self) -> bool {
        matches!(
            self,
            Self::Call { .. } | Self::MemberCall { .. } | Self::OperatorCall { .. }
        )
    }

    /// Nodes the compiler inserts around an expression without changing its spelling.
    #[must_use]
    pub fn is_implicit_wrapper(&self) -> bool {
        matches!(
            self,
            Self::ImplicitCast | Self::MaterializeTemporary | Self::BindTemporary
        )
    }
}

/// One node: kind, extent and children in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// What the node is.
    #[serde(flatten)]
    pub kind: NodeKind,
    /// Extent in the frontend's token convention.
    #[serde(default)]
    pub range: SourceRange,
    /// Children in source order.
    #[serde(default)]
    pub children: Vec<NodeId>,
}

#[derive(Deserialize)]
struct UnitParts {
    nodes: Vec<Node>,
    root: NodeId,
}

/// An immutable, validated tree for one translation unit.
///
/// Every node is reachable from the root and has exactly one parent (the root
/// has none), so a walk from the root visits each node once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UnitParts")]
pub struct TranslationUnit {
    nodes: Vec<Node>,
    root: NodeId,
}

impl TryFrom<UnitParts> for TranslationUnit {
    type Error = UnitError;

    fn try_from(parts: UnitParts) -> Result<Self, Self::Error> {
        builder::validate(&parts.nodes, parts.root)?;
        Ok(Self {
            nodes: parts.nodes,
            root: parts.root,
        })
    }
}

impl TranslationUnit {
    /// The root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the unit has no nodes (never the case for a validated unit).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// A node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|n| &n.kind)
    }

    /// Extent of a node, or an invalid range for unknown ids.
    #[must_use]
    pub fn range(&self, id: NodeId) -> SourceRange {
        self.node(id).map(|n| n.range).unwrap_or_default()
    }

    /// Children of a node, in source order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Pre-order traversal from the root.
    #[must_use]
    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder::new(self, self.root)
    }

    /// The resolved target of a call or constructor invocation.
    #[must_use]
    pub fn callee(&self, id: NodeId) -> Option<&Callee> {
        match self.kind(id)? {
            NodeKind::Call { callee }
            | NodeKind::MemberCall { callee }
            | NodeKind::OperatorCall { callee } => callee.as_ref(),
            NodeKind::Construct { constructor } => constructor.as_ref(),
            _ => None,
        }
    }

    /// Arguments of a call (callee expression excluded) or constructor invocation.
    ///
    /// For operator calls the first argument is the left operand.
    #[must_use]
    pub fn call_args(&self, id: NodeId) -> &[NodeId] {
        match self.kind(id) {
            Some(kind) if kind.is_call() => self.children(id).get(1..).unwrap_or(&[]),
            Some(NodeKind::Construct { .. }) => self.children(id),
            _ => &[],
        }
    }

    /// The object a member call is invoked on, as spelled (implicit nodes kept).
    #[must_use]
    pub fn implicit_object_argument(&self, member_call: NodeId) -> Option<NodeId> {
        if !matches!(self.kind(member_call)?, NodeKind::MemberCall { .. }) {
            return None;
        }
        let member = *self.children(member_call).first()?;
        match self.kind(member)? {
            NodeKind::Member { .. } => self.children(member).first().copied(),
            _ => None,
        }
    }

    /// Skips implicit casts, materialized and bound temporaries.
    #[must_use]
    pub fn ignore_implicit(&self, mut id: NodeId) -> NodeId {
        while let Some(kind) = self.kind(id) {
            if !kind.is_implicit_wrapper() {
                break;
            }
            match self.children(id).first() {
                Some(&inner) => id = inner,
                None => break,
            }
        }
        id
    }
}
