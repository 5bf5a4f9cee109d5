//! Indentation tracking for indentation-based syntax.

use super::token::{Token, TokenKind};
use crate::error::LexError;
use text_size::TextRange;

/// Width of a tab when measuring indentation.
pub const TAB_WIDTH: usize = 4;

/// Tracks indentation levels and turns changes into INDENT/DEDENT tokens.
pub struct IndentationTracker {
    /// Stack of indentation widths, always starting with 0.
    indent_stack: Vec<usize>,
}

impl IndentationTracker {
    pub fn new() -> Self {
        IndentationTracker {
            indent_stack: vec![0],
        }
    }

    /// Current nesting depth (number of open indented blocks).
    pub fn depth(&self) -> usize {
        self.indent_stack.len() - 1
    }

    /// Compare a line's indentation width with the stack and emit layout tokens.
    ///
    /// A decrease must land exactly on a width already on the stack.
    pub fn process_indentation(
        &mut self,
        width: usize,
        line: usize,
        column: usize,
        span: TextRange,
    ) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let current = self.top();

        if width > current {
            self.indent_stack.push(width);
            tokens.push(Token::new(TokenKind::Indent, "", line, column, span));
        } else if width < current {
            while self.indent_stack.len() > 1 && self.top() > width {
                self.indent_stack.pop();
                tokens.push(Token::new(TokenKind::Dedent, "", line, column, span));
            }

            if self.top() != width {
                return Err(LexError::IndentMismatch {
                    expected: self.top(),
                    found: width,
                    line,
                    span,
                });
            }
        }

        Ok(tokens)
    }

    /// Emit one DEDENT per open block at end of input.
    pub fn finalize(&mut self, line: usize, column: usize, span: TextRange) -> Vec<Token> {
        let mut tokens = Vec::new();

        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            tokens.push(Token::new(TokenKind::Dedent, "", line, column, span));
        }

        tokens
    }

    /// Measure leading indentation: a space counts 1, a tab counts [`TAB_WIDTH`].
    ///
    /// Returns the width and the number of bytes the indentation occupies.
    pub fn measure(line: &str) -> (usize, usize) {
        let mut width = 0;
        let mut bytes = 0;
        for ch in line.chars() {
            match ch {
                ' ' => width += 1,
                '\t' => width += TAB_WIDTH,
                _ => break,
            }
            bytes += 1;
        }
        (width, bytes)
    }

    fn top(&self) -> usize {
        self.indent_stack.last().copied().unwrap_or(0)
    }
}

impl Default for IndentationTracker {
    fn default() -> Self {
        Self::new()
    }
}
