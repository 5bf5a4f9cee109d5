//! Indentation-sensitive tokenizer.
//!
//! The input is processed line by line. Each non-blank line first has its
//! indentation compared against the [`IndentationTracker`], then its content
//! is scanned by a [`LineCursor`]. Every newline character in the source
//! becomes a NEWLINE token, including those ending blank or comment-only
//! lines; such lines never produce INDENT or DEDENT.

mod cursor;
mod indentation;
pub mod token;

pub use cursor::LineCursor;
pub use indentation::{IndentationTracker, TAB_WIDTH};
pub use token::{Token, TokenKind};

use crate::error::LexError;
use text_size::{TextRange, TextSize};

/// Lexer that tokenizes a whole source text up front.
pub struct Lexer {
    input: String,
    indentation: IndentationTracker,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.to_string(),
            indentation: IndentationTracker::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.input
    }

    /// Tokenize the entire input. The result always ends with EOF, preceded by
    /// one DEDENT per block still open at end of input.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        self.indentation = IndentationTracker::new();

        let mut tokens = Vec::new();
        let mut line_start = 0;
        let lines: Vec<&str> = self.input.split('\n').collect();
        let last_index = lines.len() - 1;

        for (index, line) in lines.iter().enumerate() {
            let line_number = index + 1;
            let (width, indent_bytes) = IndentationTracker::measure(line);
            let content = line[indent_bytes..].trim();
            let is_blank = content.is_empty() || content.starts_with('#');

            if !is_blank {
                let at = TextSize::from((line_start + indent_bytes) as u32);
                let column = line[..indent_bytes].chars().count() + 1;
                let layout = self.indentation.process_indentation(
                    width,
                    line_number,
                    column,
                    TextRange::new(at, at),
                )?;
                tokens.extend(layout);

                let cursor = LineCursor::new(line_start, line_number);
                tokens.extend(cursor.tokenize_line(line)?);
            }

            if index < last_index {
                let at = line_start + line.len();
                tokens.push(Token::new(
                    TokenKind::Newline,
                    "\n",
                    line_number,
                    line.chars().count() + 1,
                    TextRange::new(
                        TextSize::from(at as u32),
                        TextSize::from((at + 1) as u32),
                    ),
                ));
            }

            line_start += line.len() + 1;
        }

        let eof = TextSize::from(self.input.len() as u32);
        let eof_span = TextRange::new(eof, eof);
        let eof_line = last_index + 1;
        let eof_column = lines[last_index].chars().count() + 1;

        tokens.extend(self.indentation.finalize(eof_line, eof_column, eof_span));
        tokens.push(Token::new(TokenKind::Eof, "", eof_line, eof_column, eof_span));

        Ok(tokens)
    }
}

/// Convenience wrapper constructing a fresh [`Lexer`].
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}
