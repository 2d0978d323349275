mod error;
pub mod expression;
pub mod formatter;
mod program;
pub mod statement;

use crate::{
    lexer::Lexer,
    token::{Location, Token, TokenKind},
    MAX_BLOCK_DEPTH, MAX_NESTING_DEPTH,
};
pub use error::{ParserError, ParserErrorKind};
use expression::{
    Expression, ExpressionAtom, ExpressionAtomKind, ExpressionNode, ExpressionNodeRef,
    IncompleteExpression, InfixOperator, PrefixOperator,
};
pub use program::Program;
use statement::{
    BindingKind, BlockStatement, ExpressionStatement, Ident, IfExpression, PrintStatement,
    Statement, TypeName, VariableDeclaration,
};

/// Parses a whole source. Every syntax error found is returned alongside
/// whatever statements could still be recovered.
pub fn parse(source: &str) -> (Program, Vec<ParserError>) {
    Parser::new(source).parse_program()
}

pub struct Parser<'src> {
    lexer: Lexer<'src>,
    lookahead: Option<Token>,
    errors: Vec<ParserError>,
    depth: usize,
    block_depth: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            lexer: Lexer::new(source),
            lookahead: None,
            errors: Vec::new(),
            depth: 0,
            block_depth: 0,
        }
    }

    /// Pulls the next significant token from the lexer. Comments never reach the parser and a
    /// lexical error is handed out exactly once.
    fn fetch(&mut self) -> Result<Token, ParserError> {
        loop {
            let token = self.lexer.next_token()?;
            if token.kind != TokenKind::Comment {
                tracing::trace!(kind = %token.kind, line = token.line, column = token.column, "token");
                return Ok(token);
            }
        }
    }

    fn peek(&mut self) -> Result<Token, ParserError> {
        match self.lookahead {
            Some(ref token) => Ok(token.clone()),
            None => {
                let token = self.fetch()?;
                self.lookahead = Some(token.clone());
                Ok(token)
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, ParserError> {
        match self.lookahead.take() {
            Some(token) => Ok(token),
            None => self.fetch(),
        }
    }

    /// Consumes the next token only if it has the expected kind.
    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParserError> {
        let next_token = self.peek()?;
        if next_token.kind != expected {
            Err(ParserError::new(
                ParserErrorKind::UnexpectedToken {
                    actual: next_token.kind,
                    expected,
                },
                next_token.location(),
            ))
        } else {
            self.next_token()
        }
    }

    fn eat_if(&mut self, next: TokenKind) -> Result<Option<Token>, ParserError> {
        let next_token = self.peek()?;
        if next_token.kind != next {
            Ok(None)
        } else {
            self.next_token().map(Some)
        }
    }

    /// Runs `parse` one nesting level deeper, refusing to go past the limit.
    fn nested<T>(
        &mut self,
        location: Location,
        parse: impl FnOnce(&mut Self) -> Result<T, ParserError>,
    ) -> Result<T, ParserError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParserError::new(
                ParserErrorKind::NestingTooDeep(MAX_NESTING_DEPTH),
                location,
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn report(&mut self, error: ParserError) {
        tracing::debug!(%error, code = error.code(), "syntax error");
        self.errors.push(error);
    }

    /// Skips tokens until a point where a fresh statement can begin: just past a `;`, or at a
    /// statement keyword, a closing brace or the end of input.
    fn synchronize(&mut self) {
        loop {
            match self.peek() {
                Ok(token) => match token.kind {
                    TokenKind::Eof | TokenKind::RightBrace => return,
                    TokenKind::Semicolon => {
                        let _ = self.next_token();
                        return;
                    }
                    kind if kind.starts_statement() => return,
                    _ => {
                        let _ = self.next_token();
                    }
                },
                Err(error) => self.report(error),
            }
        }
    }
}

// Pratt parser for expressions
impl<'src> Parser<'src> {
    pub fn parse_expression(&mut self) -> Result<Expression, ParserError> {
        let mut tree = IncompleteExpression::new();
        let root = self.parse_expression_pratt(0, &mut tree)?;
        Ok(tree
            .finish(root)
            .expect("Root was obtained from the tree itself so it must be valid."))
    }

    fn peek_infix_operator(&mut self) -> Result<Option<(InfixOperator, Token)>, ParserError> {
        let token = self.peek()?;

        let operator = match token.kind {
            TokenKind::Plus => InfixOperator::Add,
            TokenKind::Minus => InfixOperator::Subtract,
            TokenKind::Star => InfixOperator::Multiply,
            TokenKind::Slash => InfixOperator::Divide,
            TokenKind::Percent => InfixOperator::Modulo,
            TokenKind::StarStar => InfixOperator::Power,
            TokenKind::LessThan => InfixOperator::LessThan,
            TokenKind::LessThanEqual => InfixOperator::LessThanEqual,
            TokenKind::GreaterThan => InfixOperator::GreaterThan,
            TokenKind::GreaterThanEqual => InfixOperator::GreaterThanEqual,
            TokenKind::EqualEqual => InfixOperator::EqualEqual,
            TokenKind::BangEqual => InfixOperator::BangEqual,
            TokenKind::AmpersandAmpersand | TokenKind::KeywordAnd => InfixOperator::And,
            TokenKind::PipePipe | TokenKind::KeywordOr => InfixOperator::Or,
            _ => return Ok(None),
        };
        Ok(Some((operator, token)))
    }

    fn can_start_expression(kind: TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::IntegerLiteral
                | TokenKind::FloatLiteral
                | TokenKind::StringLiteral
                | TokenKind::Ident
                | TokenKind::KeywordTrue
                | TokenKind::KeywordFalse
                | TokenKind::Minus
                | TokenKind::Bang
                | TokenKind::KeywordNot
                | TokenKind::LeftParenthesis
        )
    }

    fn push_checked(
        &mut self,
        tree: &mut IncompleteExpression,
        node: ExpressionNode,
    ) -> Result<ExpressionNodeRef, ParserError> {
        let location = node.get_location();
        let node = tree.push(node);
        if tree.get_depth(node) as usize > MAX_NESTING_DEPTH {
            return Err(ParserError::new(
                ParserErrorKind::NestingTooDeep(MAX_NESTING_DEPTH),
                location,
            ));
        }
        Ok(node)
    }

    fn expect_left_expression(
        &mut self,
        tree: &mut IncompleteExpression,
    ) -> Result<ExpressionNodeRef, ParserError> {
        let token = self.peek()?;
        if !Self::can_start_expression(token.kind) {
            return Err(ParserError::new(
                ParserErrorKind::NonExpression(token.kind),
                token.location(),
            ));
        }
        let token = self.next_token()?;
        let location = token.location();

        let atom = |kind| ExpressionNode::Atom(ExpressionAtom { kind, location });

        let node = match token.kind {
            TokenKind::IntegerLiteral => {
                let value = token.lexeme.parse().map_err(|_| {
                    ParserError::new(
                        ParserErrorKind::InvalidInteger(token.lexeme.clone()),
                        location,
                    )
                })?;
                tree.push(atom(ExpressionAtomKind::Integer(value)))
            }
            TokenKind::FloatLiteral => {
                let value = token.lexeme.parse().map_err(|_| {
                    ParserError::new(ParserErrorKind::InvalidFloat(token.lexeme.clone()), location)
                })?;
                tree.push(atom(ExpressionAtomKind::Float(value)))
            }
            TokenKind::StringLiteral => {
                tree.push(atom(ExpressionAtomKind::StringLiteral(token.lexeme)))
            }
            TokenKind::Ident => tree.push(atom(ExpressionAtomKind::Identifier(token.lexeme))),
            TokenKind::KeywordTrue => tree.push(atom(ExpressionAtomKind::Bool(true))),
            TokenKind::KeywordFalse => tree.push(atom(ExpressionAtomKind::Bool(false))),
            // Prefix operators
            TokenKind::Minus | TokenKind::Bang | TokenKind::KeywordNot => {
                let operator = match token.kind {
                    TokenKind::Minus => PrefixOperator::Minus,
                    _ => PrefixOperator::Bang,
                };
                let rbp = operator.get_binding_power();
                let rhs = self.parse_expression_pratt(rbp, tree)?;
                let location = tree
                    .get_location(rhs)
                    .map_or(location, |rhs| location.extend(&rhs));
                self.push_checked(
                    tree,
                    ExpressionNode::Prefix {
                        operator,
                        rhs,
                        location,
                    },
                )?
            }
            // Bracketed expression
            TokenKind::LeftParenthesis => {
                let inner = self.parse_expression_pratt(0, tree)?;
                self.expect(TokenKind::RightParenthesis)?;
                inner
            }
            kind => {
                return Err(ParserError::new(
                    ParserErrorKind::NonExpression(kind),
                    location,
                ))
            }
        };
        Ok(node)
    }

    fn parse_expression_pratt(
        &mut self,
        min_bp: u8,
        tree: &mut IncompleteExpression,
    ) -> Result<ExpressionNodeRef, ParserError> {
        let location = self.peek()?.location();
        self.nested(location, |parser| {
            let lhs = parser.expect_left_expression(tree)?;
            parser.parse_infix_chain(lhs, min_bp, tree)
        })
    }

    fn parse_infix_chain(
        &mut self,
        mut lhs: ExpressionNodeRef,
        min_bp: u8,
        tree: &mut IncompleteExpression,
    ) -> Result<ExpressionNodeRef, ParserError> {
        while let Some((operator, token)) = self.peek_infix_operator()? {
            let (lbp, rbp) = operator.get_binding_power();
            if lbp < min_bp {
                break;
            }
            let _ = self.next_token()?;

            let rhs = self.parse_expression_pratt(rbp, tree)?;
            let mut location = token.location();
            for side in [lhs, rhs] {
                if let Some(side) = tree.get_location(side) {
                    location = location.extend(&side);
                }
            }
            lhs = self.push_checked(
                tree,
                ExpressionNode::Infix {
                    operator,
                    lhs,
                    rhs,
                    location,
                },
            )?;
        }
        Ok(lhs)
    }
}

// Parse program/statements
impl<'src> Parser<'src> {
    pub fn parse_program(mut self) -> (Program, Vec<ParserError>) {
        let mut statements = Vec::new();

        loop {
            let token = match self.peek() {
                Ok(token) => token,
                Err(error) => {
                    self.report(error);
                    continue;
                }
            };
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Semicolon => {
                    let _ = self.next_token();
                }
                _ => self.parse_statement_into(&mut statements),
            }
        }

        tracing::debug!(
            statements = statements.len(),
            errors = self.errors.len(),
            "parsed program"
        );
        (Program::new(statements), self.errors)
    }

    fn parse_statement_into(&mut self, statements: &mut Vec<Statement>) {
        match self.parse_statement() {
            Ok(Some(statement)) => statements.push(statement),
            Ok(None) => {}
            Err(error) => {
                self.report(error);
                self.synchronize();
            }
        }
    }

    /// Parses one statement. `Ok(None)` means the leading token could not start anything and
    /// was dropped.
    fn parse_statement(&mut self) -> Result<Option<Statement>, ParserError> {
        let token = self.peek()?;
        let statement = match token.kind {
            TokenKind::KeywordSprout => {
                Statement::VariableDeclaration(self.parse_variable_declaration()?)
            }
            TokenKind::KeywordEcho => Statement::Print(self.parse_print_statement()?),
            TokenKind::KeywordIf => Statement::If(self.parse_if_expression()?),
            TokenKind::Ident => self.parse_identifier_statement()?,
            kind if Self::can_start_expression(kind) => {
                let expr = self.parse_expression()?;
                Statement::Expression(ExpressionStatement {
                    location: expr.get_location(),
                    expr,
                })
            }
            _ => {
                let _ = self.next_token()?;
                tracing::trace!(kind = %token.kind, "dropped token that starts no statement");
                return Ok(None);
            }
        };
        let _ = self.eat_if(TokenKind::Semicolon)?;
        Ok(Some(statement))
    }

    fn parse_variable_declaration(&mut self) -> Result<VariableDeclaration, ParserError> {
        let keyword = self.expect(TokenKind::KeywordSprout)?;
        let name = self.expect(TokenKind::Ident)?;
        let declared_type = self
            .eat_if(TokenKind::TypeName)?
            .and_then(|token| TypeName::from_keyword(&token.lexeme));
        self.expect(TokenKind::Equal)?;
        let value = self.parse_expression()?;

        Ok(VariableDeclaration {
            name: Ident {
                location: name.location(),
                name: name.lexeme,
            },
            declared_type,
            value,
            binding: BindingKind::Declaration,
            location: keyword.location(),
        })
    }

    /// Handles statements that open with an identifier: either `name = value` or an
    /// expression whose leftmost operand is the identifier.
    fn parse_identifier_statement(&mut self) -> Result<Statement, ParserError> {
        let name = self.expect(TokenKind::Ident)?;
        let location = name.location();

        if self.eat_if(TokenKind::Equal)?.is_some() {
            let value = self.parse_expression()?;
            return Ok(Statement::VariableDeclaration(VariableDeclaration {
                name: Ident {
                    location,
                    name: name.lexeme,
                },
                declared_type: None,
                value,
                binding: BindingKind::Reassignment,
                location,
            }));
        }

        let mut tree = IncompleteExpression::new();
        let lhs = tree.push(ExpressionNode::Atom(ExpressionAtom {
            kind: ExpressionAtomKind::Identifier(name.lexeme),
            location,
        }));
        let root = self.parse_infix_chain(lhs, 0, &mut tree)?;
        let expr = tree
            .finish(root)
            .expect("Root was obtained from the tree itself so it must be valid.");
        Ok(Statement::Expression(ExpressionStatement {
            location: expr.get_location(),
            expr,
        }))
    }

    fn parse_print_statement(&mut self) -> Result<PrintStatement, ParserError> {
        let keyword = self.expect(TokenKind::KeywordEcho)?;
        let value = self.parse_expression()?;
        Ok(PrintStatement {
            value,
            location: keyword.location(),
        })
    }

    fn parse_if_expression(&mut self) -> Result<IfExpression, ParserError> {
        let keyword = self.expect(TokenKind::KeywordIf)?;
        self.expect(TokenKind::LeftParenthesis)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RightParenthesis)?;
        let consequence = self.parse_block()?;
        let alternative = match self.eat_if(TokenKind::KeywordElse)? {
            Some(_) => Some(self.parse_block()?),
            None => None,
        };

        Ok(IfExpression {
            condition,
            consequence,
            alternative,
            location: keyword.location(),
        })
    }

    fn parse_block(&mut self) -> Result<BlockStatement, ParserError> {
        let brace = self.expect(TokenKind::LeftBrace)?;
        let location = brace.location();
        if self.block_depth >= MAX_BLOCK_DEPTH {
            return Err(ParserError::new(
                ParserErrorKind::NestingTooDeep(MAX_BLOCK_DEPTH),
                location,
            ));
        }

        self.block_depth += 1;
        let block = self.nested(location, |parser| {
            let mut statements = Vec::new();
            loop {
                let token = match parser.peek() {
                    Ok(token) => token,
                    Err(error) => {
                        parser.report(error);
                        continue;
                    }
                };
                match token.kind {
                    TokenKind::RightBrace => {
                        let _ = parser.next_token()?;
                        break;
                    }
                    TokenKind::Eof => {
                        return Err(ParserError::new(
                            ParserErrorKind::UnexpectedToken {
                                actual: TokenKind::Eof,
                                expected: TokenKind::RightBrace,
                            },
                            token.location(),
                        ))
                    }
                    TokenKind::Semicolon => {
                        let _ = parser.next_token();
                    }
                    _ => parser.parse_statement_into(&mut statements),
                }
            }
            Ok(BlockStatement {
                statements,
                location,
            })
        });
        self.block_depth -= 1;
        block
    }
}
