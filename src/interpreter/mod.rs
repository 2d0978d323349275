mod context;
mod environment;
mod trace;
mod tree;

use crate::{parser::Program, value::ObjectRef, MAX_NESTING_DEPTH};
pub use context::{BufferedContext, StdioContext};
pub use environment::Environment;
pub use trace::{Tracer, TRACE_TARGET};
pub use tree::TreeWalkInterpreter;

/// Recursion bound for evaluation. Parsed programs nest blocks and expressions at most
/// `MAX_NESTING_DEPTH` each, so only hand-built trees can reach it.
pub const MAX_EVALUATION_DEPTH: usize = 2 * MAX_NESTING_DEPTH;

/// Sink for everything a program prints.
pub trait SystemContext {
    fn writeln(&mut self, text: &str);
}

/// Evaluates `program` against `environment`, printing into `context`. Runtime errors come
/// back as an `Object::Error` value.
pub fn evaluate<C: SystemContext>(
    program: &Program,
    environment: &Environment,
    context: &mut C,
) -> ObjectRef {
    TreeWalkInterpreter::with_environment(environment.clone(), context).run(program)
}
