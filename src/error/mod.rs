//! Error types for every stage of the Azalea pipeline.
//!
//! Lexing and parsing fail fast: the first error aborts the compilation unit.
//! Runtime errors travel up through statement execution as the `Err` side of
//! a `Result`, which keeps them apart from `return`, carried by
//! [`crate::evaluator::Flow`].

use crate::evaluator::collaborator::CollaboratorError;
use crate::lexer::token::TokenKind;
use text_size::TextRange;
use thiserror::Error;

/// Errors raised while turning source text into tokens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("Unexpected character '{ch}' at line {line}")]
    UnexpectedCharacter {
        ch: char,
        line: usize,
        column: usize,
        span: TextRange,
    },

    #[error("Unterminated string literal at line {line}")]
    UnterminatedString {
        line: usize,
        column: usize,
        span: TextRange,
    },

    #[error("Indentation error at line {line}. Expected {expected} but got {found}.")]
    IndentMismatch {
        expected: usize,
        found: usize,
        line: usize,
        span: TextRange,
    },
}

impl LexError {
    pub fn line(&self) -> usize {
        match self {
            LexError::UnexpectedCharacter { line, .. }
            | LexError::UnterminatedString { line, .. }
            | LexError::IndentMismatch { line, .. } => *line,
        }
    }

    pub fn span(&self) -> TextRange {
        match self {
            LexError::UnexpectedCharacter { span, .. }
            | LexError::UnterminatedString { span, .. }
            | LexError::IndentMismatch { span, .. } => *span,
        }
    }
}

/// An unmet token expectation. There is no recovery.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at line {line}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub span: TextRange,
    pub found: TokenKind,
}

/// Failure of the tokenize + parse step, used both by drivers and by the
/// interpreter when it compiles collaborator output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Errors raised while evaluating a program.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("Variable {0} not defined")]
    UndefinedVariable(String),

    #[error("Function {0} not found")]
    FunctionNotFound(String),

    #[error("Unsupported operand types for '{op}': {left} and {right}")]
    Type {
        op: String,
        left: &'static str,
        right: &'static str,
    },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Maximum call depth of {0} exceeded")]
    CallDepthExceeded(usize),

    #[error("AI collaborator failed: {0}")]
    Collaborator(#[from] CollaboratorError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

impl From<LexError> for RuntimeError {
    fn from(error: LexError) -> Self {
        RuntimeError::Compile(CompileError::Lex(error))
    }
}

impl From<ParseError> for RuntimeError {
    fn from(error: ParseError) -> Self {
        RuntimeError::Compile(CompileError::Parse(error))
    }
}

/// Coarse classification used by drivers when reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lex,
    Parse,
    Name,
    Type,
    Runtime,
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Lex => "Lexical Error",
            ErrorKind::Parse => "Parse Error",
            ErrorKind::Name => "Name Error",
            ErrorKind::Type => "Type Error",
            ErrorKind::Runtime => "Runtime Error",
        }
    }
}

/// Where in the source an error was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub span: TextRange,
}

/// Any error the pipeline can produce.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AzaleaError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl From<LexError> for AzaleaError {
    fn from(error: LexError) -> Self {
        AzaleaError::Compile(error.into())
    }
}

impl From<ParseError> for AzaleaError {
    fn from(error: ParseError) -> Self {
        AzaleaError::Compile(error.into())
    }
}

impl CompileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompileError::Lex(_) => ErrorKind::Lex,
            CompileError::Parse(_) => ErrorKind::Parse,
        }
    }

    pub fn location(&self) -> Location {
        match self {
            CompileError::Lex(err) => {
                let column = match err {
                    LexError::UnexpectedCharacter { column, .. }
                    | LexError::UnterminatedString { column, .. } => *column,
                    LexError::IndentMismatch { .. } => 1,
                };
                Location {
                    line: err.line(),
                    column,
                    span: err.span(),
                }
            }
            CompileError::Parse(err) => Location {
                line: err.line,
                column: err.column,
                span: err.span,
            },
        }
    }
}

impl RuntimeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::UndefinedVariable(_) | RuntimeError::FunctionNotFound(_) => {
                ErrorKind::Name
            }
            RuntimeError::Type { .. } => ErrorKind::Type,
            RuntimeError::Compile(inner) => inner.kind(),
            RuntimeError::DivisionByZero
            | RuntimeError::CallDepthExceeded(_)
            | RuntimeError::Collaborator(_) => ErrorKind::Runtime,
        }
    }
}

impl AzaleaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AzaleaError::Compile(err) => err.kind(),
            AzaleaError::Runtime(err) => err.kind(),
        }
    }

    /// Source location, when the error came from the driver's own input.
    ///
    /// Compile errors nested inside a runtime error refer to collaborator
    /// output rather than the file being run, so they carry no location here.
    pub fn location(&self) -> Option<Location> {
        match self {
            AzaleaError::Compile(err) => Some(err.location()),
            AzaleaError::Runtime(_) => None,
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;
pub type RuntimeResult<T> = Result<T, RuntimeError>;
