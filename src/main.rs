use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{bail, Result};
use std::path::{Path, PathBuf};
use std::{fs::read_to_string, process::ExitCode};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const EXIT_SYNTAX_ERROR: u8 = 65;
const EXIT_RUNTIME_ERROR: u8 = 70;

#[derive(Debug, Parser)]
#[clap(name = "sprout", version)]
pub struct CLArgs {
    #[clap(subcommand)]
    pub routine: SproutCommand,
}

#[derive(Debug, Subcommand)]
pub enum SproutCommand {
    /// Print the token stream of a source file.
    Tokenize {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "basic")]
        format: TokenFormat,
    },
    /// Print the syntax tree of a source file.
    Parse {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "sexpr")]
        format: ProgramFormat,
    },
    /// Execute a `.spr` script.
    Run {
        path: PathBuf,
        /// Trace every evaluated statement.
        #[clap(long)]
        trace: bool,
        /// Log at debug level.
        #[clap(long)]
        debug: bool,
    },
    /// Start an interactive session.
    Repl {
        #[clap(long)]
        trace: bool,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum TokenFormat {
    Debug,
    Basic,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ProgramFormat {
    Debug,
    #[clap(name = "sexpr")]
    SExpr,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let args = CLArgs::parse();
    let debug = matches!(args.routine, SproutCommand::Run { debug: true, .. });
    init_tracing(debug);

    match args.routine {
        SproutCommand::Tokenize { path, format } => {
            tracing::info!(?path, "tokenizing");
            let src = read_to_string(&path)?;
            if !tokenize(&src, &format) {
                return Ok(ExitCode::from(EXIT_SYNTAX_ERROR));
            }
        }
        SproutCommand::Parse { path, format } => {
            tracing::info!(?path, "parsing");
            let src = read_to_string(&path)?;
            if !parse(&src, &format) {
                return Ok(ExitCode::from(EXIT_SYNTAX_ERROR));
            }
        }
        SproutCommand::Run { path, trace, .. } => {
            if path.extension().and_then(|ext| ext.to_str()) != Some("spr") {
                bail!("File must have .spr extension: {}", path.display());
            }
            let src = read_to_string(&path)?;
            return Ok(run(&src, &path, trace));
        }
        SproutCommand::Repl { trace } => {
            use sprout::interpreter::Tracer;
            use sprout::repl::Repl;

            let tracer = if trace {
                Tracer::enabled()
            } else {
                Tracer::disabled()
            };
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            Repl::new(tracer).run(stdin.lock(), &mut stdout)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Logs go to stderr. `RUST_LOG` takes precedence over the defaults; trace events are always
/// let through since the interpreter's tracer decides whether to emit them.
fn init_tracing(debug: bool) {
    let default = if debug {
        "debug,sprout::trace=trace"
    } else {
        "warn,sprout::trace=trace"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init();
}

fn tokenize(src: &str, format: &TokenFormat) -> bool {
    use sprout::lexer::formatter::{BasicFormatter, DebugFormatter, TokenFormatter};
    use sprout::lexer::Lexer;

    let mut scanner = Lexer::new(src);
    let formatter: Box<dyn TokenFormatter> = match format {
        TokenFormat::Debug => Box::new(DebugFormatter),
        TokenFormat::Basic => Box::new(BasicFormatter),
    };
    let mut succeeded = true;
    loop {
        match scanner.next_token() {
            Ok(token) => {
                println!("{}", formatter.format(&token));
                if token.is_eof() {
                    return succeeded;
                }
            }
            Err(error) => {
                eprintln!("{}", formatter.format_lexical_error(&error));
                succeeded = false;
            }
        };
    }
}

fn parse(src: &str, format: &ProgramFormat) -> bool {
    use sprout::parser::formatter::{
        BasicParserFormatter, DebugExpressionFormatter, DebugParserFormatter, ParserFormatter,
        ProgramFormatter, SExpressionFormatter,
    };

    let (program, errors) = sprout::parse(src);
    let (formatter, error_formatter): (Box<dyn ProgramFormatter>, Box<dyn ParserFormatter>) =
        match format {
            ProgramFormat::Debug => (
                Box::new(DebugExpressionFormatter),
                Box::new(DebugParserFormatter),
            ),
            ProgramFormat::SExpr => (Box::new(SExpressionFormatter), Box::new(BasicParserFormatter)),
        };
    for error in errors.iter() {
        eprintln!("{}", error_formatter.format_error(error));
    }
    if !program.is_empty() {
        println!("{}", formatter.format_program(&program));
    }
    errors.is_empty()
}

fn run(src: &str, path: &Path, trace: bool) -> ExitCode {
    use sprout::interpreter::{StdioContext, Tracer, TreeWalkInterpreter};
    use sprout::parser::formatter::{ParserFormatter, PrettyParserFormatter};
    use sprout::value::formatter::{PrettyFormatter, ValueFormatter};
    use sprout::value::Object;

    let (program, errors) = sprout::parse(src);
    if !errors.is_empty() {
        let formatter = PrettyParserFormatter::new(src, path);
        for error in errors.iter() {
            eprint!("{}", formatter.format_error(error));
        }
        return ExitCode::from(EXIT_SYNTAX_ERROR);
    }

    eprintln!("=== Sprout Interpreter ===");
    eprintln!("Executing: {}", path.display());
    if trace {
        eprintln!("Trace mode: ON");
    }

    let tracer = if trace {
        Tracer::enabled()
    } else {
        Tracer::disabled()
    };
    let mut interpreter = TreeWalkInterpreter::new(StdioContext).with_tracer(tracer);
    let result = interpreter.run(&program);
    if let Object::Error(ref error) = *result {
        eprint!("{}", PrettyFormatter::new(src, path).format_error(error));
        return ExitCode::from(EXIT_RUNTIME_ERROR);
    }

    eprintln!("=== Done ===");
    ExitCode::SUCCESS
}
