use compact_str::CompactString;
use std::fmt::Display;

use super::expression::Expression;
use crate::token::Location;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    VariableDeclaration(VariableDeclaration),
    Print(PrintStatement),
    Expression(ExpressionStatement),
    If(IfExpression),
}

impl Statement {
    pub fn get_location(&self) -> Location {
        match self {
            Statement::VariableDeclaration(VariableDeclaration { location, .. })
            | Statement::Print(PrintStatement { location, .. })
            | Statement::Expression(ExpressionStatement { location, .. })
            | Statement::If(IfExpression { location, .. }) => *location,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: CompactString,
    pub location: Location,
}

/// Optional annotation on a declaration. Parsed and kept, never checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    Int,
    Float,
    String,
    Bool,
}

impl TypeName {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "string" => Some(Self::String),
            "bool" => Some(Self::Bool),
            _ => None,
        }
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeName::Int => write!(f, "int"),
            TypeName::Float => write!(f, "float"),
            TypeName::String => write!(f, "string"),
            TypeName::Bool => write!(f, "bool"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// `sprout x = v`: always binds in the current scope.
    Declaration,
    /// `x = v`: updates the nearest scope that already holds `x`.
    Reassignment,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub name: Ident,
    pub declared_type: Option<TypeName>,
    pub value: Expression,
    pub binding: BindingKind,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintStatement {
    pub value: Expression,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expr: Expression,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfExpression {
    pub condition: Expression,
    pub consequence: BlockStatement,
    pub alternative: Option<BlockStatement>,
    pub location: Location,
}
