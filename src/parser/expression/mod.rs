mod operator;
mod tree;

pub use operator::{InfixOperator, PrefixOperator};
pub use tree::{
    Expression, ExpressionAtom, ExpressionAtomKind, ExpressionNode, ExpressionNodeRef,
    IncompleteExpression,
};
