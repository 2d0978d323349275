use crate::token::Location;
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexicalErrorKind {
    #[error("unexpected character {0}")]
    Unrecognized(char),
    #[error("unterminated string")]
    UnterminatedString,
    #[error("multiple decimal points in number {0}")]
    MultipleDecimalPoints(CompactString),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct LexicalError {
    #[source]
    pub kind: LexicalErrorKind,
    pub location: Location,
}

impl LexicalError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            LexicalErrorKind::Unrecognized(_) => "LX001",
            LexicalErrorKind::UnterminatedString => "LX002",
            LexicalErrorKind::MultipleDecimalPoints(_) => "LX003",
        }
    }
}
