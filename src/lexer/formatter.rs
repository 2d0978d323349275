use super::{LexicalError, Token, TokenKind};

/// Interface for creating new token formatters.
pub trait TokenFormatter {
    /// Formats a token into a string.
    fn format(&self, token: &Token) -> String;
    /// Formats a lexer error into a string.
    fn format_lexical_error(&self, error: &LexicalError) -> String;
}

pub struct BasicFormatter;

impl TokenFormatter for BasicFormatter {
    fn format(&self, token: &Token) -> String {
        let position = format!("{}:{}", token.line, token.column);
        match token.kind {
            TokenKind::StringLiteral => format!("{} {:?} {position}", token.kind, token.lexeme),
            TokenKind::Eof => format!("{}  {position}", token.kind),
            kind => format!("{kind} {} {position}", token.lexeme),
        }
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        format!(
            "[Line {}:{}] Error: {}",
            error.location.line, error.location.column, error
        )
    }
}

pub struct DebugFormatter;

impl TokenFormatter for DebugFormatter {
    fn format(&self, token: &Token) -> String {
        format!("{token:?}")
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        format!("{error:?}")
    }
}
