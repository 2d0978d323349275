use crate::lexer::{LexicalError, TokenKind};
use crate::token::Location;
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParserErrorKind {
    #[error("Expected next token to be {expected}, got {actual} instead")]
    UnexpectedToken {
        actual: TokenKind,
        expected: TokenKind,
    },
    #[error("Expected an expression, got {0} instead")]
    NonExpression(TokenKind),
    #[error("Could not parse {0:?} as integer")]
    InvalidInteger(CompactString),
    #[error("Could not parse {0:?} as float")]
    InvalidFloat(CompactString),
    #[error("maximum nesting depth of {0} exceeded")]
    NestingTooDeep(usize),
    #[error(transparent)]
    LexicalError(#[from] LexicalError),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("[Line {}:{}] {kind}", location.line, location.column)]
pub struct ParserError {
    #[source]
    pub kind: ParserErrorKind,
    pub location: Location,
}

impl ParserError {
    pub fn new(kind: ParserErrorKind, location: Location) -> Self {
        Self { kind, location }
    }

    pub fn code(&self) -> &'static str {
        match self.kind {
            ParserErrorKind::UnexpectedToken { .. } => "PA001",
            ParserErrorKind::NonExpression(_) => "PA002",
            ParserErrorKind::InvalidInteger(_) => "PA003",
            ParserErrorKind::InvalidFloat(_) => "PA004",
            ParserErrorKind::NestingTooDeep(_) => "PA005",
            ParserErrorKind::LexicalError(ref error) => error.code(),
        }
    }
}

impl From<LexicalError> for ParserError {
    fn from(error: LexicalError) -> Self {
        let location = error.location;
        Self {
            kind: ParserErrorKind::LexicalError(error),
            location,
        }
    }
}
