use super::error::{RuntimeError, RuntimeErrorKind};
use super::Object;
use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::path::Path;

const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

pub trait ValueFormatter {
    fn format(&self, value: &Object) -> String;
    fn format_error(&self, error: &RuntimeError) -> String;
}

pub struct DebugFormatter;

impl ValueFormatter for DebugFormatter {
    fn format(&self, value: &Object) -> String {
        format!("{value:?}")
    }

    fn format_error(&self, error: &RuntimeError) -> String {
        format!("{error:?}")
    }
}

pub struct BasicFormatter;

impl ValueFormatter for BasicFormatter {
    fn format(&self, value: &Object) -> String {
        value.inspect()
    }

    fn format_error(&self, error: &RuntimeError) -> String {
        format!(
            "[Line {}:{}] ERROR: {error}",
            error.location.line, error.location.column
        )
    }
}

pub struct PrettyFormatter<'src> {
    text: &'src str,
    path: &'src Path,
}

impl<'src> PrettyFormatter<'src> {
    pub fn new(text: &'src str, path: &'src Path) -> Self {
        Self { text, path }
    }

    fn label(kind: &RuntimeErrorKind) -> String {
        match kind {
            RuntimeErrorKind::IdentifierNotFound(name) => {
                format!("{} is not bound in any enclosing scope", name.fg(Color::BrightRed))
            }
            RuntimeErrorKind::DivisionByZero | RuntimeErrorKind::ModuloByZero => {
                "Right operand is zero".into()
            }
            RuntimeErrorKind::TypeMismatch { lhs, rhs, .. } => format!(
                "Operands are {} and {}",
                lhs.fg(Color::BrightRed),
                rhs.fg(Color::BrightRed)
            ),
            RuntimeErrorKind::UnknownInfixOperator { lhs, operator, .. } => {
                format!("{operator} is not defined for {}", lhs.fg(Color::BrightRed))
            }
            RuntimeErrorKind::UnknownPrefixOperator { operator, operand } => {
                format!("{operator} is not defined for {}", operand.fg(Color::BrightRed))
            }
            RuntimeErrorKind::IntegerOverflow { .. } | RuntimeErrorKind::NegationOverflow(_) => {
                "Result does not fit in a 64-bit integer".into()
            }
            RuntimeErrorKind::NestingTooDeep(_) => "Nested too deeply here".into(),
        }
    }
}

impl<'src> ValueFormatter for PrettyFormatter<'src> {
    fn format(&self, value: &Object) -> String {
        value.inspect()
    }

    fn format_error(&self, error: &RuntimeError) -> String {
        let path = &self.path.to_string_lossy();
        let span = error.location.span;
        let mut output = std::io::Cursor::new(Vec::new());
        Report::build(ReportKind::Error, (path, span.range()))
            .with_code(error.code())
            .with_message(format!("{error}"))
            .with_label(
                Label::new((path, span.range()))
                    .with_message(Self::label(&error.kind))
                    .with_color(Color::BrightRed),
            )
            .finish()
            .write((path, Source::from(self.text)), &mut output)
            .expect(ARIADNE_WRITE_MSG);
        String::from_utf8(output.into_inner()).expect(ARIADNE_MSG)
    }
}
