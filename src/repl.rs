use crate::{
    interpreter::{BufferedContext, Tracer, TreeWalkInterpreter},
    parser::{parse, statement::Statement},
    value::Object,
};
use std::io::{BufRead, Write};

pub const PROMPT: &str = "sprout> ";

/// What a single line typed at the prompt asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand<'line> {
    Help,
    Clear,
    Env,
    TraceOn,
    TraceOff,
    Exit,
    Empty,
    Source(&'line str),
}

impl<'line> ReplCommand<'line> {
    pub fn parse(line: &'line str) -> Self {
        match line.trim() {
            "" => Self::Empty,
            "help" => Self::Help,
            "clear" => Self::Clear,
            "env" => Self::Env,
            "trace on" => Self::TraceOn,
            "trace off" => Self::TraceOff,
            "exit" | "quit" => Self::Exit,
            source => Self::Source(source),
        }
    }
}

/// Interactive session. Bindings persist from one line to the next until `clear`.
pub struct Repl {
    interpreter: TreeWalkInterpreter<BufferedContext>,
}

impl Repl {
    pub fn new(tracer: Tracer) -> Self {
        Self {
            interpreter: TreeWalkInterpreter::new(BufferedContext::new()).with_tracer(tracer),
        }
    }

    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> std::io::Result<()> {
        writeln!(output, "Welcome to the Sprout Programming Language REPL!")?;
        writeln!(output, "Type 'help' for commands, 'exit' to quit")?;
        writeln!(output)?;

        let mut lines = input.lines();
        loop {
            write!(output, "{PROMPT}")?;
            output.flush()?;
            let Some(line) = lines.next() else {
                break;
            };
            if !self.handle_line(&line?, output)? {
                break;
            }
        }
        Ok(())
    }

    /// Handles one line of input. Returns `false` once the session should end.
    pub fn handle_line<W: Write>(&mut self, line: &str, output: &mut W) -> std::io::Result<bool> {
        match ReplCommand::parse(line) {
            ReplCommand::Empty => {}
            ReplCommand::Exit => {
                writeln!(output, "Goodbye!")?;
                return Ok(false);
            }
            ReplCommand::Help => Self::print_help(output)?,
            ReplCommand::Clear => {
                self.interpreter.reset_environment();
                writeln!(output, "Environment cleared!")?;
            }
            ReplCommand::Env => self.print_environment(output)?,
            ReplCommand::TraceOn => {
                self.interpreter.get_tracer_mut().set_enabled(true);
                writeln!(output, "Trace mode enabled!")?;
            }
            ReplCommand::TraceOff => {
                self.interpreter.get_tracer_mut().set_enabled(false);
                writeln!(output, "Trace mode disabled!")?;
            }
            ReplCommand::Source(source) => self.evaluate(source, output)?,
        }
        Ok(true)
    }

    fn evaluate<W: Write>(&mut self, source: &str, output: &mut W) -> std::io::Result<()> {
        let (program, errors) = parse(source);
        if !errors.is_empty() {
            writeln!(output, "Parser errors:")?;
            for error in errors.iter() {
                writeln!(output, "  {error}")?;
            }
            return Ok(());
        }
        let Some(last) = program.last() else {
            return Ok(());
        };
        let echoes = matches!(last, Statement::Print(_));

        let result = self.interpreter.run(&program);
        output.write_all(self.interpreter.get_context_mut().take_data().as_bytes())?;

        match *result {
            Object::Error(ref error) => writeln!(output, "Error: {error}")?,
            Object::Null => {}
            ref value if !echoes => writeln!(output, "{value}")?,
            _ => {}
        }
        Ok(())
    }

    fn print_environment<W: Write>(&self, output: &mut W) -> std::io::Result<()> {
        let bindings = self.interpreter.get_environment().bindings();
        if bindings.is_empty() {
            return writeln!(output, "No variables defined yet.");
        }
        writeln!(output, "Current environment variables:")?;
        for (name, value) in bindings {
            writeln!(output, "  {name} = {value}")?;
        }
        Ok(())
    }

    fn print_help<W: Write>(output: &mut W) -> std::io::Result<()> {
        writeln!(output, "Sprout REPL Commands:")?;
        writeln!(output, "  help       - Show this help message")?;
        writeln!(output, "  clear      - Clear all variables from environment")?;
        writeln!(output, "  env        - Show all variables in current environment")?;
        writeln!(output, "  trace on   - Enable trace execution mode")?;
        writeln!(output, "  trace off  - Disable trace execution mode")?;
        writeln!(output, "  exit/quit  - Exit the REPL")?;
        writeln!(output)?;
        writeln!(output, "Language Features:")?;
        writeln!(output, "  sprout x = 10;           - Declare variable")?;
        writeln!(output, "  x = 20;                  - Reassign variable")?;
        writeln!(output, "  echo \"Hello\";            - Print output")?;
        writeln!(output, "  if (x > 5) {{ echo x; }}   - Conditionals")?;
        writeln!(output, "  5 + 3 * 2;               - Expressions")?;
        writeln!(output, "  true && false;           - Logical operations")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(input: &str) -> String {
        let mut output = Vec::new();
        Repl::new(Tracer::disabled())
            .run(input.as_bytes(), &mut output)
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn commands_are_recognised() {
        assert_eq!(ReplCommand::parse("  trace on "), ReplCommand::TraceOn);
        assert_eq!(ReplCommand::parse("quit"), ReplCommand::Exit);
        assert_eq!(ReplCommand::parse("x + 1"), ReplCommand::Source("x + 1"));
    }

    #[test]
    fn bindings_persist_between_lines() {
        let output = session("sprout x = 4\nx * 2\nexit\nx\n");
        assert!(output.contains("sprout> 4\n"));
        assert!(output.contains("sprout> 8\n"));
        assert!(output.ends_with("Goodbye!\n"));
    }

    #[test]
    fn echo_is_not_repeated() {
        let output = session("echo \"hi\"\n");
        assert_eq!(output.matches("hi").count(), 1);
    }

    #[test]
    fn errors_are_reported() {
        let output = session("sprout = 1\nmissing\n");
        assert!(output.contains("Parser errors:\n  [Line 1:8] Expected next token to be IDENT, got EQUAL instead\n"));
        assert!(output.contains("Error: identifier not found: missing\n"));
    }

    #[test]
    fn env_and_clear() {
        let output = session("env\nsprout b = 2\nsprout a = 1\nenv\nclear\nenv\n");
        assert!(output.contains("No variables defined yet."));
        assert!(output.contains("Current environment variables:\n  a = 1\n  b = 2\n"));
        assert!(output.contains("Environment cleared!"));
    }
}
