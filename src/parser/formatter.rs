use super::{
    expression::{Expression, ExpressionAtom, ExpressionAtomKind, ExpressionNode, ExpressionNodeRef},
    statement::{BindingKind, BlockStatement, Statement},
    ParserError, ParserErrorKind, Program,
};
use ariadne::{Color, Label, Report, ReportKind, Source};
use std::path::Path;

const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

pub trait ExpressionFormatter {
    fn format(&self, tree: &Expression) -> String;
}

pub trait ProgramFormatter {
    fn format_program(&self, program: &Program) -> String;
}

pub struct DebugExpressionFormatter;

impl ExpressionFormatter for DebugExpressionFormatter {
    fn format(&self, tree: &Expression) -> String {
        format!("{tree:?}")
    }
}

impl ProgramFormatter for DebugExpressionFormatter {
    fn format_program(&self, program: &Program) -> String {
        program
            .iter()
            .map(|statement| format!("{statement:#?}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Renders expressions as fully parenthesised prefix forms, e.g. `(+ 1 (* 2 3))`.
pub struct SExpressionFormatter;

impl SExpressionFormatter {
    fn format_atom(atom: &ExpressionAtom) -> String {
        match atom.kind {
            ExpressionAtomKind::Integer(v) => format!("{v}"),
            ExpressionAtomKind::Float(v) => format!("{v:?}"),
            ExpressionAtomKind::Bool(v) => format!("{v}"),
            ExpressionAtomKind::Identifier(ref name) => format!("{name}"),
            ExpressionAtomKind::StringLiteral(ref v) => format!("{v:?}"),
        }
    }

    fn format_node(tree: &Expression, node: ExpressionNodeRef) -> String {
        // Walk the left spine in a loop so long chains like `1 + 2 + ... + n` stay flat.
        let mut spine = Vec::new();
        let mut cursor = node;
        while let Some(&ExpressionNode::Infix {
            operator, lhs, rhs, ..
        }) = tree.get_node(cursor)
        {
            spine.push((operator, rhs));
            cursor = lhs;
        }

        let mut buffer = String::new();
        for (operator, _) in spine.iter() {
            buffer.push_str(&format!("({operator} "));
        }
        let leftmost = tree
            .get_node(cursor)
            .expect("Caller should make sure the ref is valid.");
        match leftmost {
            ExpressionNode::Atom(atom) => buffer.push_str(&Self::format_atom(atom)),
            ExpressionNode::Prefix { operator, rhs, .. } => {
                buffer.push_str(&format!("({operator} {})", Self::format_node(tree, *rhs)))
            }
            ExpressionNode::Infix { .. } => unreachable!("the spine loop consumes infix nodes"),
        }
        for (_, rhs) in spine.iter().rev() {
            buffer.push(' ');
            buffer.push_str(&Self::format_node(tree, *rhs));
            buffer.push(')');
        }
        buffer
    }

    fn format_block(block: &BlockStatement) -> String {
        let mut buffer = String::from("(block");
        for statement in block.statements.iter() {
            buffer.push(' ');
            buffer.push_str(&Self::format_statement(statement));
        }
        buffer.push(')');
        buffer
    }

    pub fn format_statement(statement: &Statement) -> String {
        match statement {
            Statement::VariableDeclaration(decl) => {
                let value = Self::format_node(&decl.value, decl.value.get_root_ref());
                match (decl.binding, decl.declared_type) {
                    (BindingKind::Declaration, Some(ty)) => {
                        format!("(sprout {}:{ty} {value})", decl.name.name)
                    }
                    (BindingKind::Declaration, None) => {
                        format!("(sprout {} {value})", decl.name.name)
                    }
                    (BindingKind::Reassignment, _) => format!("(= {} {value})", decl.name.name),
                }
            }
            Statement::Print(print) => {
                format!(
                    "(echo {})",
                    Self::format_node(&print.value, print.value.get_root_ref())
                )
            }
            Statement::Expression(stmt) => Self::format_node(&stmt.expr, stmt.expr.get_root_ref()),
            Statement::If(stmt) => {
                let mut buffer = format!(
                    "(if {} {}",
                    Self::format_node(&stmt.condition, stmt.condition.get_root_ref()),
                    Self::format_block(&stmt.consequence)
                );
                if let Some(ref alternative) = stmt.alternative {
                    buffer.push(' ');
                    buffer.push_str(&Self::format_block(alternative));
                }
                buffer.push(')');
                buffer
            }
        }
    }
}

impl ExpressionFormatter for SExpressionFormatter {
    fn format(&self, tree: &Expression) -> String {
        SExpressionFormatter::format_node(tree, tree.get_root_ref())
    }
}

impl ProgramFormatter for SExpressionFormatter {
    fn format_program(&self, program: &Program) -> String {
        program
            .iter()
            .map(SExpressionFormatter::format_statement)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub trait ParserFormatter {
    fn format_error(&self, error: &ParserError) -> String;
}

pub struct DebugParserFormatter;

impl ParserFormatter for DebugParserFormatter {
    fn format_error(&self, error: &ParserError) -> String {
        format!("{error:?}")
    }
}

/// One line per error: `[Line L:C] message`.
pub struct BasicParserFormatter;

impl ParserFormatter for BasicParserFormatter {
    fn format_error(&self, error: &ParserError) -> String {
        format!("{error}")
    }
}

pub struct PrettyParserFormatter<'src> {
    text: &'src str,
    path: &'src Path,
}

impl<'src> PrettyParserFormatter<'src> {
    pub fn new(text: &'src str, path: &'src Path) -> Self {
        Self { text, path }
    }
}

impl<'src> ParserFormatter for PrettyParserFormatter<'src> {
    fn format_error(&self, error: &ParserError) -> String {
        let path = &self.path.to_string_lossy();
        let span = error.location.span;
        let label = match error.kind {
            ParserErrorKind::UnexpectedToken { expected, actual } => {
                format!("Expected {expected} but got {actual}")
            }
            ParserErrorKind::NonExpression(kind) => format!("Not an expression token {kind}"),
            ParserErrorKind::InvalidInteger(_) | ParserErrorKind::InvalidFloat(_) => {
                "Literal out of range".into()
            }
            ParserErrorKind::NestingTooDeep(_) => "Nested too deeply here".into(),
            ParserErrorKind::LexicalError(ref err) => format!("{err}"),
        };

        let mut output = std::io::Cursor::new(Vec::new());
        Report::build(ReportKind::Error, (path, span.range()))
            .with_code(error.code())
            .with_message(format!("{}", error.kind))
            .with_label(
                Label::new((path, span.range()))
                    .with_message(label)
                    .with_color(Color::BrightRed),
            )
            .finish()
            .write((path, Source::from(self.text)), &mut output)
            .expect(ARIADNE_WRITE_MSG);
        String::from_utf8(output.into_inner()).expect(ARIADNE_MSG)
    }
}
