//! Azalea: an indentation-based scripting language whose programs can ask an
//! external text generator for code and run the answer.
//!
//! ```text
//! source ──lexer──▶ tokens ──parser──▶ AST ──▶ interpreter
//!                                       │          │
//!                                       │          └─ collaborator ─▶ source ─▶ compile ─▶ splice
//!                                       └─ printer ─▶ source
//! ```

pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod log;
pub mod parser;

pub use error::{AzaleaError, CompileError, ErrorKind, LexError, ParseError, RuntimeError};
pub use evaluator::{EvalConfig, Flow, Interpreter};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::ast::Program;
pub use parser::Parser;

/// Tokenize and parse `source` with freshly constructed state.
///
/// This is the only way the interpreter compiles collaborator output, so a
/// nested compilation never shares a lexer or parser with the program that
/// triggered it.
pub fn compile(source: &str) -> error::CompileResult<Program> {
    let tokens = Lexer::new(source).tokenize()?;
    let program = Parser::new(tokens).parse()?;
    Ok(program)
}
