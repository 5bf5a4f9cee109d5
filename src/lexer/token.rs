//! Token definitions.

use logos::Logos;
use std::fmt;
use text_size::TextRange;

/// A positioned token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token. String tokens hold their content without quotes.
    pub text: String,
    pub line: usize,
    pub column: usize,
    pub span: TextRange,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        text: impl Into<String>,
        line: usize,
        column: usize,
        span: TextRange,
    ) -> Self {
        Token {
            kind,
            text: text.into(),
            line,
            column,
            span,
        }
    }
}

/// Lexical token kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    Fn,
    Var,
    Return,
    If,
    Else,
    While,
    Box,
    Text,
    Button,
    Generate,
    Description,
    Ai,
    AiOptimize,
    AiImport,
    AiSearch,
    AiInspect,

    // Identifiers and literals
    Ident,
    Number,
    String,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Assign,
    EqualEqual,
    NotEqual,
    Less,
    Greater,

    // Delimiters
    LeftParen,
    RightParen,
    Comma,
    Colon,

    // Layout
    Newline,
    Indent,
    Dedent,
    Eof,
}

impl TokenKind {
    /// Resolve a scanned word against the keyword table.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "fn" => TokenKind::Fn,
            "var" | "let" => TokenKind::Var,
            "return" => TokenKind::Return,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "box" => TokenKind::Box,
            "text" => TokenKind::Text,
            "button" => TokenKind::Button,
            "generate" => TokenKind::Generate,
            "description" => TokenKind::Description,
            "ai" => TokenKind::Ai,
            "ai.optimize" => TokenKind::AiOptimize,
            "ai.import" => TokenKind::AiImport,
            "ai.search" => TokenKind::AiSearch,
            "ai.inspect" => TokenKind::AiInspect,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_ui_primitive(self) -> bool {
        matches!(self, TokenKind::Box | TokenKind::Text | TokenKind::Button)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Fn => "'fn'",
            TokenKind::Var => "'var'",
            TokenKind::Return => "'return'",
            TokenKind::If => "'if'",
            TokenKind::Else => "'else'",
            TokenKind::While => "'while'",
            TokenKind::Box => "'box'",
            TokenKind::Text => "'text'",
            TokenKind::Button => "'button'",
            TokenKind::Generate => "'generate'",
            TokenKind::Description => "'description'",
            TokenKind::Ai => "'ai'",
            TokenKind::AiOptimize => "'ai.optimize'",
            TokenKind::AiImport => "'ai.import'",
            TokenKind::AiSearch => "'ai.search'",
            TokenKind::AiInspect => "'ai.inspect'",
            TokenKind::Ident => "identifier",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Assign => "'='",
            TokenKind::EqualEqual => "'=='",
            TokenKind::NotEqual => "'!='",
            TokenKind::Less => "'<'",
            TokenKind::Greater => "'>'",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::Newline => "newline",
            TokenKind::Indent => "indent",
            TokenKind::Dedent => "dedent",
            TokenKind::Eof => "end of input",
        };
        f.write_str(text)
    }
}

/// Logos-based scanner for the contents of a single line.
///
/// Layout tokens are produced by the line driver, not here.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\f]+")]
pub enum LogosToken {
    // Keywords are resolved from words afterwards so `ai.optimize` and
    // dotted identifiers share one rule.
    #[regex(r"[A-Za-z_][A-Za-z0-9_.]*")]
    Word,

    #[regex(r"[0-9]+")]
    Number,

    // No escape sequences: the content runs verbatim to the matching quote.
    #[regex(r#""[^"\n]*"|'[^'\n]*'"#)]
    String,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("=")]
    Assign,
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    NotEqual,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,

    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,

    #[regex(r"#[^\n]*")]
    Comment,
}
