pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod token;
pub mod value;

pub use interpreter::evaluate;
pub use lexer::tokenize;
pub use parser::parse;

/// Deepest nesting of blocks, parentheses and operator chains the parser accepts.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Deepest nesting of `{ ... }` blocks. Each level costs several statement frames, so blocks
/// get a tighter bound than expressions.
pub const MAX_BLOCK_DEPTH: usize = 64;
