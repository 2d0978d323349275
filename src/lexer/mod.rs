mod cursor;
mod error;
pub mod formatter;

use compact_str::{CompactString, ToCompactString};
use cursor::SourceChar;
pub use error::{LexicalError, LexicalErrorKind};
use std::{iter::Peekable, str::CharIndices};

pub use crate::token::{Location, Span, SpanIndex, Token, TokenKind, KEYWORD_HASHMAP};

/// Scans the whole source, turning lexical errors into `Illegal` tokens.
/// The returned tokens always end with exactly one `Eof`.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

#[derive(Debug)]
pub struct Lexer<'src> {
    source: &'src str,
    chars: Peekable<CharIndices<'src>>,
    line: u32,
    column: u32,
    offset: SpanIndex,
    finished: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            line: 1,
            column: 1,
            offset: SpanIndex::default(),
            finished: false,
        }
    }
}

// Cursor
impl<'src> Lexer<'src> {
    fn next_char(&mut self) -> Option<SourceChar> {
        let (offset, value) = self.chars.next()?;
        let current = SourceChar {
            value,
            offset: offset.into(),
            line: self.line,
            column: self.column,
        };
        if value == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.offset = current.next_offset();
        Some(current)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn eat_if(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            let _ = self.next_char();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            let _ = self.next_char();
        }
    }

    fn span_from(&self, start: &SourceChar) -> Span {
        Span::new(start.offset, self.offset)
    }

    fn make_token(&self, kind: TokenKind, start: &SourceChar) -> Token {
        let span = self.span_from(start);
        Token {
            kind,
            lexeme: self.source[span.range()].into(),
            line: start.line,
            column: start.column,
            span,
        }
    }

    fn make_error(&self, kind: LexicalErrorKind, start: &SourceChar) -> LexicalError {
        let error = LexicalError {
            kind,
            location: Location {
                line: start.line,
                column: start.column,
                span: self.span_from(start),
            },
        };
        tracing::debug!(%error, line = start.line, column = start.column, "lexical error");
        error
    }
}

impl<'src> Lexer<'src> {
    /// Produces the next token. Once the source is exhausted every call returns `Eof`.
    pub fn next_token(&mut self) -> Result<Token, LexicalError> {
        self.skip_whitespace();

        let Some(first) = self.next_char() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                lexeme: CompactString::default(),
                line: self.line,
                column: self.column,
                span: Span::new(self.offset, self.offset),
            });
        };

        let kind = match first.value {
            // Single character tokens
            '(' => TokenKind::LeftParenthesis,
            ')' => TokenKind::RightParenthesis,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            // One character lookahead
            '*' if self.eat_if('*') => TokenKind::StarStar,
            '*' => TokenKind::Star,
            '=' if self.eat_if('=') => TokenKind::EqualEqual,
            '=' => TokenKind::Equal,
            '!' if self.eat_if('=') => TokenKind::BangEqual,
            '!' => TokenKind::Bang,
            '<' if self.eat_if('=') => TokenKind::LessThanEqual,
            '<' => TokenKind::LessThan,
            '>' if self.eat_if('=') => TokenKind::GreaterThanEqual,
            '>' => TokenKind::GreaterThan,
            '&' if self.eat_if('&') => TokenKind::AmpersandAmpersand,
            '|' if self.eat_if('|') => TokenKind::PipePipe,
            // Multi character tokens
            '#' => return Ok(self.lex_comment(first)),
            '"' => return self.lex_string(first),
            c if c.is_ascii_digit() => return self.lex_number(first),
            c if c.is_alphabetic() || c == '_' => return Ok(self.lex_ident_or_keyword(first)),
            c => return Err(self.make_error(LexicalErrorKind::Unrecognized(c), &first)),
        };

        Ok(self.make_token(kind, &first))
    }

    fn lex_comment(&mut self, first: SourceChar) -> Token {
        while self.peek_char().is_some_and(|c| c != '\n') {
            let _ = self.next_char();
        }
        self.make_token(TokenKind::Comment, &first)
    }

    fn lex_string(&mut self, first: SourceChar) -> Result<Token, LexicalError> {
        let mut value = CompactString::default();
        loop {
            let Some(current) = self.next_char() else {
                return Err(self.make_error(LexicalErrorKind::UnterminatedString, &first));
            };
            match current.value {
                '"' => break,
                '\\' => {
                    let Some(escaped) = self.next_char() else {
                        return Err(self.make_error(LexicalErrorKind::UnterminatedString, &first));
                    };
                    match escaped.value {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        '"' => value.push('"'),
                        '\\' => value.push('\\'),
                        other => {
                            value.push('\\');
                            value.push(other);
                        }
                    }
                }
                c => value.push(c),
            }
        }

        Ok(Token {
            kind: TokenKind::StringLiteral,
            lexeme: value,
            line: first.line,
            column: first.column,
            span: self.span_from(&first),
        })
    }

    fn lex_number(&mut self, first: SourceChar) -> Result<Token, LexicalError> {
        let mut decimal_points = 0usize;
        while let Some(c) = self.peek_char() {
            match c {
                '0'..='9' => {}
                '.' => decimal_points += 1,
                _ => break,
            }
            let _ = self.next_char();
        }

        match decimal_points {
            0 => Ok(self.make_token(TokenKind::IntegerLiteral, &first)),
            1 => Ok(self.make_token(TokenKind::FloatLiteral, &first)),
            _ => {
                let lexeme = CompactString::from(&self.source[self.span_from(&first).range()]);
                Err(self.make_error(LexicalErrorKind::MultipleDecimalPoints(lexeme), &first))
            }
        }
    }

    fn lex_ident_or_keyword(&mut self, first: SourceChar) -> Token {
        while self
            .peek_char()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            let _ = self.next_char();
        }
        let mut token = self.make_token(TokenKind::Ident, &first);
        if let Some(kind) = KEYWORD_HASHMAP.get(token.lexeme.as_str()) {
            token.kind = *kind;
        }
        token
    }
}

impl From<LexicalError> for Token {
    fn from(error: LexicalError) -> Self {
        let lexeme = match error.kind {
            LexicalErrorKind::Unrecognized(c) => c.to_compact_string(),
            ref kind => kind.to_compact_string(),
        };
        Token {
            kind: TokenKind::Illegal,
            lexeme,
            line: error.location.line,
            column: error.location.column,
            span: error.location.span,
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token().unwrap_or_else(Token::from);
        if token.is_eof() {
            self.finished = true;
        }
        Some(token)
    }
}
