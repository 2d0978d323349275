mod span;

use compact_str::CompactString;
pub use span::{Span, SpanIndex, SpanLength};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::LazyLock;

/// The hashmap for keywords
pub static KEYWORD_HASHMAP: LazyLock<HashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    map.insert("sprout", TokenKind::KeywordSprout);
    map.insert("echo", TokenKind::KeywordEcho);
    map.insert("if", TokenKind::KeywordIf);
    map.insert("else", TokenKind::KeywordElse);
    map.insert("and", TokenKind::KeywordAnd);
    map.insert("or", TokenKind::KeywordOr);
    map.insert("not", TokenKind::KeywordNot);
    map.insert("true", TokenKind::KeywordTrue);
    map.insert("false", TokenKind::KeywordFalse);
    map.insert("int", TokenKind::TypeName);
    map.insert("float", TokenKind::TypeName);
    map.insert("string", TokenKind::TypeName);
    map.insert("bool", TokenKind::TypeName);
    map
});

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Parentheses
    LeftParenthesis,
    RightParenthesis,
    // Braces
    LeftBrace,
    RightBrace,
    // Punctuation
    Comma,
    Dot,
    Colon,
    Semicolon,
    // Arithmetic
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    // Comparison and assignment
    Equal,
    EqualEqual,
    Bang,
    BangEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    // Logical
    AmpersandAmpersand,
    PipePipe,

    // Literals
    IntegerLiteral,
    FloatLiteral,
    StringLiteral,
    Ident,
    TypeName,

    // Keywords
    KeywordSprout,
    KeywordEcho,
    KeywordIf,
    KeywordElse,
    KeywordAnd,
    KeywordOr,
    KeywordNot,
    KeywordTrue,
    KeywordFalse,

    Comment,
    Illegal,
    // End of file.
    Eof,
}

impl TokenKind {
    /// Tokens that may begin a statement. Used by the parser to resynchronise.
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::KeywordSprout | TokenKind::KeywordEcho | TokenKind::KeywordIf
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::LeftParenthesis => write!(f, "LEFT_PAREN"),
            TokenKind::RightParenthesis => write!(f, "RIGHT_PAREN"),
            TokenKind::LeftBrace => write!(f, "LEFT_BRACE"),
            TokenKind::RightBrace => write!(f, "RIGHT_BRACE"),
            TokenKind::Comma => write!(f, "COMMA"),
            TokenKind::Dot => write!(f, "DOT"),
            TokenKind::Colon => write!(f, "COLON"),
            TokenKind::Semicolon => write!(f, "SEMICOLON"),
            TokenKind::Plus => write!(f, "PLUS"),
            TokenKind::Minus => write!(f, "MINUS"),
            TokenKind::Star => write!(f, "STAR"),
            TokenKind::StarStar => write!(f, "STAR_STAR"),
            TokenKind::Slash => write!(f, "SLASH"),
            TokenKind::Percent => write!(f, "PERCENT"),
            TokenKind::Equal => write!(f, "EQUAL"),
            TokenKind::EqualEqual => write!(f, "EQUAL_EQUAL"),
            TokenKind::Bang => write!(f, "BANG"),
            TokenKind::BangEqual => write!(f, "BANG_EQUAL"),
            TokenKind::LessThan => write!(f, "LESS"),
            TokenKind::LessThanEqual => write!(f, "LESS_EQUAL"),
            TokenKind::GreaterThan => write!(f, "GREATER"),
            TokenKind::GreaterThanEqual => write!(f, "GREATER_EQUAL"),
            TokenKind::AmpersandAmpersand => write!(f, "AND_AND"),
            TokenKind::PipePipe => write!(f, "OR_OR"),
            TokenKind::IntegerLiteral => write!(f, "INT"),
            TokenKind::FloatLiteral => write!(f, "FLOAT"),
            TokenKind::StringLiteral => write!(f, "STRING"),
            TokenKind::Ident => write!(f, "IDENT"),
            TokenKind::TypeName => write!(f, "TYPE_IDENT"),
            TokenKind::KeywordSprout => write!(f, "SPROUT"),
            TokenKind::KeywordEcho => write!(f, "ECHO"),
            TokenKind::KeywordIf => write!(f, "IF"),
            TokenKind::KeywordElse => write!(f, "ELSE"),
            TokenKind::KeywordAnd => write!(f, "AND"),
            TokenKind::KeywordOr => write!(f, "OR"),
            TokenKind::KeywordNot => write!(f, "NOT"),
            TokenKind::KeywordTrue => write!(f, "TRUE"),
            TokenKind::KeywordFalse => write!(f, "FALSE"),
            TokenKind::Comment => write!(f, "COMMENT"),
            TokenKind::Illegal => write!(f, "ILLEGAL"),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// The token text. String literals hold their contents with escapes resolved.
    pub lexeme: CompactString,
    pub line: u32,
    pub column: u32,
    pub span: Span,
}

impl Token {
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    pub fn location(&self) -> Location {
        Location {
            line: self.line,
            column: self.column,
            span: self.span,
        }
    }
}

/// Where a token, node or error sits in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub line: u32,
    pub column: u32,
    pub span: Span,
}

impl Location {
    /// Keeps the line and column of `self` while widening the span to cover `other`.
    pub fn extend(&self, other: &Location) -> Location {
        Location {
            line: self.line,
            column: self.column,
            span: self.span.merge(&other.span),
        }
    }
}
