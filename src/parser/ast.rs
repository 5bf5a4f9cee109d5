//! Abstract syntax tree for Azalea programs.

use crate::lexer::token::TokenKind;
use std::fmt;

/// A parsed compilation unit. Statements are in execution order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub body: Vec<Stmt>,
}

impl Program {
    pub fn new(body: Vec<Stmt>) -> Self {
        Program { body }
    }

    /// Function declarations at the top level of this program.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDeclaration> {
        self.body.iter().filter_map(|stmt| match stmt {
            Stmt::FunctionDeclaration(decl) => Some(decl),
            _ => None,
        })
    }
}

/// `fn name(params):` followed by a block.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    FunctionDeclaration(FunctionDeclaration),

    VariableDeclaration {
        name: String,
        init: Option<Expr>,
    },

    If {
        test: Expr,
        consequent: Vec<Stmt>,
        alternate: Option<Vec<Stmt>>,
    },

    While {
        test: Expr,
        body: Vec<Stmt>,
    },

    Return(Option<Expr>),

    Expression(Expr),

    // AI-integrated statements. Descriptions, instructions and queries are
    // opaque text handed to the collaborator.
    Generate {
        name: String,
        params: Vec<String>,
        description: String,
    },

    AiOptimize {
        body: Vec<Stmt>,
    },

    Ai {
        instruction: Option<String>,
        body: Option<Vec<Stmt>>,
    },

    Import {
        module: String,
    },

    Rag {
        query: String,
    },

    Inspect {
        target: Expr,
    },
}

impl Stmt {
    /// Whether the statement's source form ends with an indented block.
    pub fn ends_with_block(&self) -> bool {
        matches!(
            self,
            Stmt::FunctionDeclaration(_)
                | Stmt::If { .. }
                | Stmt::While { .. }
                | Stmt::AiOptimize { .. }
                | Stmt::Ai { body: Some(_), .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    Identifier(String),

    Literal(Literal),

    Call {
        callee: String,
        args: Vec<Expr>,
    },

    Ui {
        kind: UiKind,
        args: Vec<Expr>,
        children: Vec<Expr>,
    },
}

impl Expr {
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn number(value: f64) -> Self {
        Expr::Literal(Literal::Number(value))
    }

    pub fn text(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::Text(value.into()))
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Identifier(name.into())
    }

    pub fn call(callee: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: callee.into(),
            args,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Less,
    Greater,
    Equal,
    NotEqual,
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<BinaryOp> {
        let op = match kind {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Less => BinaryOp::Less,
            TokenKind::Greater => BinaryOp::Greater,
            TokenKind::EqualEqual => BinaryOp::Equal,
            TokenKind::NotEqual => BinaryOp::NotEqual,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
        }
    }

    /// Binding strength on the comparison < term < factor ladder.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Less | BinaryOp::Greater | BinaryOp::Equal | BinaryOp::NotEqual => 1,
            BinaryOp::Add | BinaryOp::Sub => 2,
            BinaryOp::Mul | BinaryOp::Div => 3,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiKind {
    Box,
    Text,
    Button,
}

impl UiKind {
    pub fn from_token(kind: TokenKind) -> Option<UiKind> {
        match kind {
            TokenKind::Box => Some(UiKind::Box),
            TokenKind::Text => Some(UiKind::Text),
            TokenKind::Button => Some(UiKind::Button),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            UiKind::Box => "box",
            UiKind::Text => "text",
            UiKind::Button => "button",
        }
    }
}
