//! Recursive-descent parser.
//!
//! Precedence ladder, lowest first: comparison (`< > == !=`), term (`+ -`),
//! factor (`* /`), primary. All binary levels are left-associative.

pub mod ast;
pub mod printer;

use crate::error::ParseError;
use crate::lexer::token::{Token, TokenKind};
use ast::*;
use text_size::TextRange;

pub type ParseResult<T> = Result<T, ParseError>;

/// Maximum combined depth of blocks, children blocks, parentheses and
/// argument lists. Collaborator output is parsed in-process, so this keeps
/// hostile nesting from exhausting the stack.
pub const MAX_NESTING_DEPTH: usize = 100;

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    nesting: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let (line, span) = tokens
                .last()
                .map(|t| (t.line, TextRange::empty(t.span.end())))
                .unwrap_or((1, TextRange::default()));
            tokens.push(Token::new(TokenKind::Eof, "", line, 1, span));
        }
        Parser {
            tokens,
            current: 0,
            nesting: 0,
        }
    }

    pub fn parse(&mut self) -> ParseResult<Program> {
        let mut body = Vec::new();

        loop {
            self.skip_newlines();
            if self.is_at_end() {
                break;
            }
            body.push(self.parse_statement()?);
        }

        Ok(Program { body })
    }

    // Token helpers

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> Option<&Token> {
        self.current.checked_sub(1).map(|index| &self.tokens[index])
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.current].clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(message))
        }
    }

    fn skip_newlines(&mut self) {
        while self.match_token(TokenKind::Newline) {}
    }

    fn enter_nesting(&mut self) -> ParseResult<()> {
        if self.nesting >= MAX_NESTING_DEPTH {
            return Err(self.error(format!(
                "Nesting too deep: more than {MAX_NESTING_DEPTH} levels"
            )));
        }
        self.nesting += 1;
        Ok(())
    }

    fn leave_nesting(&mut self) {
        self.nesting -= 1;
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let token = self.peek();
        ParseError {
            message: message.into(),
            line: token.line,
            column: token.column,
            span: token.span,
            found: token.kind,
        }
    }

    // Statements

    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        let stmt = match self.peek().kind {
            TokenKind::Fn => {
                self.advance();
                Stmt::FunctionDeclaration(self.parse_function()?)
            }
            TokenKind::Var => self.parse_variable()?,
            TokenKind::Return => self.parse_return()?,
            TokenKind::If => self.parse_if()?,
            TokenKind::While => self.parse_while()?,
            TokenKind::Generate => self.parse_generate()?,
            TokenKind::AiOptimize => {
                self.advance();
                self.consume(TokenKind::Colon, "Expected ':' after ai.optimize")?;
                Stmt::AiOptimize {
                    body: self.parse_block()?,
                }
            }
            TokenKind::Ai => self.parse_ai()?,
            TokenKind::AiImport => self.parse_import()?,
            TokenKind::AiSearch => {
                self.advance();
                let query = self.consume(TokenKind::String, "Expected search query string")?;
                Stmt::Rag { query: query.text }
            }
            TokenKind::AiInspect => {
                self.advance();
                Stmt::Inspect {
                    target: self.parse_expression()?,
                }
            }
            _ => Stmt::Expression(self.parse_expression()?),
        };

        self.expect_statement_end()?;
        Ok(stmt)
    }

    /// A statement ends at a line break, a block boundary or end of input.
    /// Statements that end in their own block have already consumed a DEDENT.
    fn expect_statement_end(&self) -> ParseResult<()> {
        if self.previous().map(|t| t.kind) == Some(TokenKind::Dedent) {
            return Ok(());
        }
        match self.peek().kind {
            TokenKind::Newline | TokenKind::Dedent | TokenKind::Eof => Ok(()),
            found => Err(self.error(format!("Expected newline after statement, found {found}"))),
        }
    }

    fn parse_function(&mut self) -> ParseResult<FunctionDeclaration> {
        let name = self.consume(TokenKind::Ident, "Expected function name")?.text;
        let params = self.parse_params()?;
        self.consume(TokenKind::Colon, "Expected ':' before function body")?;
        let body = self.parse_block()?;

        Ok(FunctionDeclaration { name, params, body })
    }

    fn parse_params(&mut self) -> ParseResult<Vec<String>> {
        self.consume(TokenKind::LeftParen, "Expected '(' after function name")?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                params.push(self.consume(TokenKind::Ident, "Expected parameter name")?.text);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.consume(TokenKind::RightParen, "Expected ')' after parameters")?;
        Ok(params)
    }

    fn parse_variable(&mut self) -> ParseResult<Stmt> {
        self.advance();
        let name = self.consume(TokenKind::Ident, "Expected variable name")?.text;
        let init = if self.match_token(TokenKind::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        Ok(Stmt::VariableDeclaration { name, init })
    }

    fn parse_return(&mut self) -> ParseResult<Stmt> {
        self.advance();
        let argument = match self.peek().kind {
            TokenKind::Newline | TokenKind::Dedent | TokenKind::Eof => None,
            _ => Some(self.parse_expression()?),
        };

        Ok(Stmt::Return(argument))
    }

    fn parse_if(&mut self) -> ParseResult<Stmt> {
        self.advance();
        let test = self.parse_expression()?;
        self.consume(TokenKind::Colon, "Expected ':' after if condition")?;
        let consequent = self.parse_block()?;

        // Blank lines may separate the block from `else`. Without an `else`
        // they belong to whatever follows, so restore the position.
        let saved = self.current;
        self.skip_newlines();

        let alternate = if self.match_token(TokenKind::Else) {
            self.consume(TokenKind::Colon, "Expected ':' after else")?;
            Some(self.parse_block()?)
        } else {
            self.current = saved;
            None
        };

        Ok(Stmt::If {
            test,
            consequent,
            alternate,
        })
    }

    fn parse_while(&mut self) -> ParseResult<Stmt> {
        self.advance();
        let test = self.parse_expression()?;
        self.consume(TokenKind::Colon, "Expected ':' after while condition")?;
        let body = self.parse_block()?;

        Ok(Stmt::While { test, body })
    }

    /// `generate fn name(params): description "text"`
    fn parse_generate(&mut self) -> ParseResult<Stmt> {
        self.advance();
        let introduces_function = self.check(TokenKind::Fn)
            || (self.check(TokenKind::Ident) && self.peek().text == "function");
        if !introduces_function {
            return Err(self.error("Expected 'fn' after generate"));
        }
        self.advance();

        let name = self.consume(TokenKind::Ident, "Expected function name")?.text;
        let params = self.parse_params()?;
        self.consume(TokenKind::Colon, "Expected ':' after generated function signature")?;
        self.consume(TokenKind::Description, "Expected 'description'")?;
        let description = self
            .consume(TokenKind::String, "Expected description string")?
            .text;

        Ok(Stmt::Generate {
            name,
            params,
            description,
        })
    }

    /// `ai ["instruction"] [":" block]`
    fn parse_ai(&mut self) -> ParseResult<Stmt> {
        self.advance();
        let instruction = if self.check(TokenKind::String) {
            Some(self.advance().text)
        } else {
            None
        };
        let body = if self.match_token(TokenKind::Colon) {
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Stmt::Ai { instruction, body })
    }

    fn parse_import(&mut self) -> ParseResult<Stmt> {
        self.advance();
        match self.peek().kind {
            TokenKind::Ident | TokenKind::String => Ok(Stmt::Import {
                module: self.advance().text,
            }),
            _ => Err(self.error("Expected module name after ai.import")),
        }
    }

    /// Block protocol: NEWLINE, blank lines, INDENT, statements, DEDENT.
    fn parse_block(&mut self) -> ParseResult<Vec<Stmt>> {
        self.enter_nesting()?;
        self.open_block()?;

        let mut stmts = Vec::new();
        loop {
            self.skip_newlines();
            if self.check(TokenKind::Dedent) || self.is_at_end() {
                break;
            }
            stmts.push(self.parse_statement()?);
        }

        self.consume(TokenKind::Dedent, "Expected dedent after block")?;
        self.leave_nesting();
        Ok(stmts)
    }

    fn open_block(&mut self) -> ParseResult<()> {
        self.consume(TokenKind::Newline, "Expected newline before block")?;
        self.skip_newlines();
        self.consume(TokenKind::Indent, "Expected indentation")?;
        Ok(())
    }

    // Expressions

    pub fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        self.parse_binary_level(1)
    }

    /// One rung of the precedence ladder; `level` 1..=3 are binary, 4 is primary.
    fn parse_binary_level(&mut self, level: u8) -> ParseResult<Expr> {
        if level > 3 {
            return self.parse_primary();
        }

        let mut expr = self.parse_binary_level(level + 1)?;
        while let Some(op) = BinaryOp::from_token(self.peek().kind) {
            if op.precedence() != level {
                break;
            }
            self.advance();
            let right = self.parse_binary_level(level + 1)?;
            expr = Expr::binary(op, expr, right);
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let token = self.peek().clone();

        match token.kind {
            TokenKind::Number => {
                self.advance();
                let value = token
                    .text
                    .parse::<f64>()
                    .map_err(|_| self.error(format!("Invalid number '{}'", token.text)))?;
                Ok(Expr::number(value))
            }
            TokenKind::String => {
                self.advance();
                Ok(Expr::text(token.text))
            }
            TokenKind::Ident => {
                self.advance();
                if self.check(TokenKind::LeftParen) {
                    let args = self.parse_arguments()?;
                    Ok(Expr::Call {
                        callee: token.text,
                        args,
                    })
                } else {
                    Ok(Expr::Identifier(token.text))
                }
            }
            TokenKind::Box | TokenKind::Text | TokenKind::Button => self.parse_ui_primitive(),
            TokenKind::LeftParen => {
                self.enter_nesting()?;
                self.advance();
                let expr = self.parse_expression()?;
                self.consume(TokenKind::RightParen, "Expected ')' after expression")?;
                self.leave_nesting();
                Ok(expr)
            }
            found => Err(self.error(format!("Unexpected token {found}"))),
        }
    }

    fn parse_arguments(&mut self) -> ParseResult<Vec<Expr>> {
        self.enter_nesting()?;
        self.consume(TokenKind::LeftParen, "Expected '('")?;

        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.consume(TokenKind::RightParen, "Expected ')' after arguments")?;
        self.leave_nesting();
        Ok(args)
    }

    /// `box`, `text` or `button`, optional arguments, optional children block.
    fn parse_ui_primitive(&mut self) -> ParseResult<Expr> {
        let token = self.advance();
        let kind = UiKind::from_token(token.kind)
            .ok_or_else(|| self.error(format!("Expected UI primitive, found {}", token.kind)))?;

        let args = if self.check(TokenKind::LeftParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };

        let mut children = Vec::new();
        if self.match_token(TokenKind::Colon) {
            self.enter_nesting()?;
            self.open_block()?;
            loop {
                self.skip_newlines();
                if self.check(TokenKind::Dedent) || self.is_at_end() {
                    break;
                }
                children.push(self.parse_expression()?);
                self.expect_statement_end()?;
            }
            self.consume(TokenKind::Dedent, "Expected dedent after children")?;
            self.leave_nesting();
        }

        Ok(Expr::Ui {
            kind,
            args,
            children,
        })
    }
}
