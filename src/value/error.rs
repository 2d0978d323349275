use super::ObjectType;
use crate::parser::expression::{InfixOperator, PrefixOperator};
use crate::token::Location;
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeErrorKind {
    #[error("identifier not found: {0}")]
    IdentifierNotFound(CompactString),
    #[error("division by zero")]
    DivisionByZero,
    #[error("modulo by zero")]
    ModuloByZero,
    #[error("type mismatch: {lhs} {operator} {rhs}")]
    TypeMismatch {
        lhs: ObjectType,
        operator: InfixOperator,
        rhs: ObjectType,
    },
    #[error("unknown operator: {lhs} {operator} {rhs}")]
    UnknownInfixOperator {
        lhs: ObjectType,
        operator: InfixOperator,
        rhs: ObjectType,
    },
    #[error("unknown operator: {operator}{operand}")]
    UnknownPrefixOperator {
        operator: PrefixOperator,
        operand: ObjectType,
    },
    #[error("integer overflow: {lhs} {operator} {rhs}")]
    IntegerOverflow {
        lhs: i64,
        operator: InfixOperator,
        rhs: i64,
    },
    #[error("integer overflow: -{0}")]
    NegationOverflow(i64),
    #[error("maximum nesting depth of {0} exceeded")]
    NestingTooDeep(usize),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct RuntimeError {
    #[source]
    pub kind: RuntimeErrorKind,
    pub location: Location,
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind, location: Location) -> Self {
        Self { kind, location }
    }

    pub fn code(&self) -> &'static str {
        match self.kind {
            RuntimeErrorKind::IdentifierNotFound(_) => "RT001",
            RuntimeErrorKind::DivisionByZero => "RT002",
            RuntimeErrorKind::ModuloByZero => "RT003",
            RuntimeErrorKind::TypeMismatch { .. } => "RT004",
            RuntimeErrorKind::UnknownInfixOperator { .. } => "RT005",
            RuntimeErrorKind::UnknownPrefixOperator { .. } => "RT006",
            RuntimeErrorKind::IntegerOverflow { .. } | RuntimeErrorKind::NegationOverflow(_) => {
                "RT007"
            }
            RuntimeErrorKind::NestingTooDeep(_) => "RT008",
        }
    }
}
