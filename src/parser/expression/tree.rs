use compact_str::CompactString;

use crate::token::Location;

use super::{InfixOperator, PrefixOperator};

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionAtomKind {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Identifier(CompactString),
    StringLiteral(CompactString),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionAtom {
    pub kind: ExpressionAtomKind,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpressionNodeRef(pub(crate) u32);

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionNode {
    Atom(ExpressionAtom),
    Prefix {
        operator: PrefixOperator,
        rhs: ExpressionNodeRef,
        /// Position of the operator, spanning the whole expression.
        location: Location,
    },
    Infix {
        operator: InfixOperator,
        lhs: ExpressionNodeRef,
        rhs: ExpressionNodeRef,
        /// Position of the operator, spanning the whole expression.
        location: Location,
    },
}

impl ExpressionNode {
    pub fn get_location(&self) -> Location {
        match self {
            ExpressionNode::Atom(ExpressionAtom { location, .. })
            | ExpressionNode::Prefix { location, .. }
            | ExpressionNode::Infix { location, .. } => *location,
        }
    }
}

/// Arena that expression nodes are pushed into while parsing.
#[derive(Debug, Clone, Default)]
pub struct IncompleteExpression {
    nodes: Vec<ExpressionNode>,
    depths: Vec<u32>,
}

/// A finished expression: an arena of nodes plus the root node.
/// Children always precede their parents in `nodes`.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    nodes: Vec<ExpressionNode>,
    root: ExpressionNodeRef,
}

impl IncompleteExpression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: ExpressionNode) -> ExpressionNodeRef {
        let depth = match node {
            ExpressionNode::Atom(_) => 1,
            ExpressionNode::Prefix { rhs, .. } => self.get_depth(rhs) + 1,
            // Left operands are walked in a loop rather than recursed into.
            ExpressionNode::Infix { lhs, rhs, .. } => {
                self.get_depth(lhs).max(self.get_depth(rhs) + 1)
            }
        };
        self.nodes.push(node);
        self.depths.push(depth);
        ExpressionNodeRef(self.nodes.len() as u32 - 1)
    }

    pub fn get_node(&self, node: ExpressionNodeRef) -> Option<&ExpressionNode> {
        self.nodes.get(node.0 as usize)
    }

    /// Recursion depth needed to walk the subtree rooted at `node`. A lone atom has depth 1,
    /// and only prefix operands and right operands add a level.
    pub fn get_depth(&self, node: ExpressionNodeRef) -> u32 {
        self.depths.get(node.0 as usize).copied().unwrap_or(0)
    }

    pub fn get_location(&self, node: ExpressionNodeRef) -> Option<Location> {
        self.get_node(node).map(ExpressionNode::get_location)
    }

    pub fn finish(self, root: ExpressionNodeRef) -> Option<Expression> {
        Expression::new(self, root)
    }
}

impl Expression {
    pub fn new(tree: IncompleteExpression, root: ExpressionNodeRef) -> Option<Self> {
        if !(0..tree.nodes.len()).contains(&(root.0 as usize)) {
            None
        } else {
            Some(Self {
                nodes: tree.nodes,
                root,
            })
        }
    }

    pub fn get_root_ref(&self) -> ExpressionNodeRef {
        self.root
    }

    pub fn get_root(&self) -> &ExpressionNode {
        &self.nodes[self.root.0 as usize]
    }

    pub fn get_node(&self, node: ExpressionNodeRef) -> Option<&ExpressionNode> {
        self.nodes.get(node.0 as usize)
    }

    pub fn get_location(&self) -> Location {
        self.get_root().get_location()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
