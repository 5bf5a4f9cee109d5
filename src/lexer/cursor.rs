//! Low-level cursor for tokenizing the content of a single line.

use super::token::{LogosToken, Token, TokenKind};
use crate::error::LexError;
use logos::Logos;
use text_size::{TextRange, TextSize};

/// A cursor over one line of source code, positioned in the whole input.
pub struct LineCursor {
    line_start_offset: usize,
    line_number: usize,
}

impl LineCursor {
    pub fn new(line_start_offset: usize, line_number: usize) -> Self {
        LineCursor {
            line_start_offset,
            line_number,
        }
    }

    /// Tokenize a single line of code (without indentation handling).
    ///
    /// `line` must not contain the terminating newline.
    pub fn tokenize_line(&self, line: &str) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let mut lexer = LogosToken::lexer(line);

        while let Some(result) = lexer.next() {
            let local = lexer.span();
            let span = self.span(local.start, local.end);
            let column = self.column(line, local.start);

            let tok = match result {
                Ok(tok) => tok,
                Err(()) => {
                    let ch = line[local.start..].chars().next().unwrap_or('\0');
                    return Err(if ch == '"' || ch == '\'' {
                        LexError::UnterminatedString {
                            line: self.line_number,
                            column,
                            span: self.span(local.start, line.len()),
                        }
                    } else {
                        LexError::UnexpectedCharacter {
                            ch,
                            line: self.line_number,
                            column,
                            span,
                        }
                    });
                }
            };

            let slice = lexer.slice();
            let kind = match tok {
                LogosToken::Comment => continue,
                LogosToken::Word => TokenKind::keyword(slice).unwrap_or(TokenKind::Ident),
                LogosToken::Number => TokenKind::Number,
                LogosToken::String => TokenKind::String,
                LogosToken::Plus => TokenKind::Plus,
                LogosToken::Minus => TokenKind::Minus,
                LogosToken::Star => TokenKind::Star,
                LogosToken::Slash => TokenKind::Slash,
                LogosToken::Assign => TokenKind::Assign,
                LogosToken::EqualEqual => TokenKind::EqualEqual,
                LogosToken::NotEqual => TokenKind::NotEqual,
                LogosToken::Less => TokenKind::Less,
                LogosToken::Greater => TokenKind::Greater,
                LogosToken::LeftParen => TokenKind::LeftParen,
                LogosToken::RightParen => TokenKind::RightParen,
                LogosToken::Comma => TokenKind::Comma,
                LogosToken::Colon => TokenKind::Colon,
            };
            // Quotes are ASCII, so trimming one byte per side is safe.
            let text = if kind == TokenKind::String {
                &slice[1..slice.len() - 1]
            } else {
                slice
            };

            tokens.push(Token::new(kind, text, self.line_number, column, span));
        }

        Ok(tokens)
    }

    fn span(&self, start: usize, end: usize) -> TextRange {
        TextRange::new(
            TextSize::from((self.line_start_offset + start) as u32),
            TextSize::from((self.line_start_offset + end) as u32),
        )
    }

    fn column(&self, line: &str, byte_offset: usize) -> usize {
        line[..byte_offset].chars().count() + 1
    }
}
