//! Renders AST fragments back to Azalea source.
//!
//! Output re-parses to a structurally equal tree. Two constructs need care:
//!
//! * Binary operands are parenthesised exactly where the left-associative
//!   precedence ladder would otherwise regroup them.
//! * A UI primitive with children ends in an indented block. Any further text
//!   belonging to the same statement (a closing parenthesis, an operator, the
//!   `:` of an `if`) is moved to a fresh line at the statement's indentation,
//!   so the parser sees the block's DEDENT before it.

use super::ast::*;

const INDENT: &str = "    ";

/// Print a whole program, one top-level statement per line.
pub fn print_program(program: &Program) -> String {
    let mut out = print_statements(&program.body);
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// Print statements at depth 0, separated by newlines.
pub fn print_statements(stmts: &[Stmt]) -> String {
    let mut printer = Printer::new();
    for (i, stmt) in stmts.iter().enumerate() {
        if i > 0 {
            printer.out.push('\n');
        }
        printer.statement(stmt, 0);
    }
    printer.finish()
}

pub fn print_statement(stmt: &Stmt, depth: usize) -> String {
    let mut printer = Printer::new();
    printer.statement(stmt, depth);
    printer.finish()
}

/// Print an expression as it would appear inside a statement at `depth`.
pub fn print_expression(expr: &Expr, depth: usize) -> String {
    let mut printer = Printer::new();
    printer.expr(expr, depth);
    printer.finish()
}

/// Render a string literal, preferring double quotes.
pub fn quote(text: &str) -> String {
    if text.contains('"') {
        format!("'{text}'")
    } else {
        format!("\"{text}\"")
    }
}

/// Render an integral number without a fractional part.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

struct Printer {
    out: String,
    /// Indentation of a line break owed before the next text of the current
    /// statement, set after a UI children block.
    pending_break: Option<usize>,
}

impl Printer {
    fn new() -> Self {
        Printer {
            out: String::new(),
            pending_break: None,
        }
    }

    fn finish(self) -> String {
        self.out
    }

    fn write(&mut self, text: &str) {
        match self.pending_break.take() {
            Some(depth) => {
                self.out.push('\n');
                self.indent(depth);
                // Leading spaces would read as a deeper indentation level.
                self.out.push_str(text.trim_start());
            }
            None => self.out.push_str(text),
        }
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
    }

    fn statement(&mut self, stmt: &Stmt, depth: usize) {
        self.pending_break = None;
        self.indent(depth);

        match stmt {
            Stmt::FunctionDeclaration(decl) => {
                self.write(&format!("fn {}({}):", decl.name, decl.params.join(", ")));
                self.block(&decl.body, depth);
            }
            Stmt::VariableDeclaration { name, init } => {
                self.write(&format!("var {name}"));
                if let Some(init) = init {
                    self.write(" = ");
                    self.expr(init, depth);
                }
            }
            Stmt::If {
                test,
                consequent,
                alternate,
            } => {
                self.write("if ");
                self.test(test, depth);
                self.write(":");
                self.block(consequent, depth);
                if let Some(alternate) = alternate {
                    self.out.push('\n');
                    self.indent(depth);
                    self.write("else:");
                    self.block(alternate, depth);
                }
            }
            Stmt::While { test, body } => {
                self.write("while ");
                self.test(test, depth);
                self.write(":");
                self.block(body, depth);
            }
            Stmt::Return(argument) => {
                self.write("return");
                if let Some(argument) = argument {
                    self.write(" ");
                    self.expr(argument, depth);
                }
            }
            Stmt::Expression(expr) => self.expr(expr, depth),
            Stmt::Generate {
                name,
                params,
                description,
            } => {
                self.write(&format!(
                    "generate fn {}({}): description {}",
                    name,
                    params.join(", "),
                    quote(description)
                ));
            }
            Stmt::AiOptimize { body } => {
                self.write("ai.optimize:");
                self.block(body, depth);
            }
            Stmt::Ai { instruction, body } => {
                self.write("ai");
                if let Some(instruction) = instruction {
                    self.write(" ");
                    self.write(&quote(instruction));
                }
                if let Some(body) = body {
                    self.write(":");
                    self.block(body, depth);
                }
            }
            Stmt::Import { module } => {
                self.write("ai.import ");
                if is_plain_identifier(module) {
                    self.write(module);
                } else {
                    self.write(&quote(module));
                }
            }
            Stmt::Rag { query } => {
                self.write("ai.search ");
                self.write(&quote(query));
            }
            Stmt::Inspect { target } => {
                self.write("ai.inspect ");
                self.expr(target, depth);
            }
        }

        self.pending_break = None;
    }

    fn block(&mut self, stmts: &[Stmt], depth: usize) {
        for stmt in stmts {
            self.pending_break = None;
            self.out.push('\n');
            self.statement(stmt, depth + 1);
        }
    }

    /// Condition of `if`/`while`. A trailing childless UI primitive would
    /// swallow the following `:` as the start of a children block.
    fn test(&mut self, test: &Expr, depth: usize) {
        if ends_with_bare_ui(test) {
            self.write("(");
            self.expr(test, depth);
            self.write(")");
        } else {
            self.expr(test, depth);
        }
    }

    fn expr(&mut self, expr: &Expr, depth: usize) {
        match expr {
            Expr::Binary { op, left, right } => {
                let prec = op.precedence();
                self.operand(left, depth, binary_precedence(left) < prec);
                self.write(&format!(" {} ", op.symbol()));
                self.operand(right, depth, binary_precedence(right) <= prec);
            }
            Expr::Identifier(name) => self.write(name),
            Expr::Literal(Literal::Number(value)) => self.write(&format_number(*value)),
            Expr::Literal(Literal::Text(text)) => self.write(&quote(text)),
            Expr::Call { callee, args } => {
                self.write(callee);
                self.arguments(args, depth);
            }
            Expr::Ui {
                kind,
                args,
                children,
            } => {
                self.write(kind.name());
                self.arguments(args, depth);
                if !children.is_empty() {
                    self.write(":");
                    for child in children {
                        self.pending_break = None;
                        self.out.push('\n');
                        self.indent(depth + 1);
                        self.expr(child, depth + 1);
                    }
                    self.pending_break = Some(depth);
                }
            }
        }
    }

    fn operand(&mut self, expr: &Expr, depth: usize, parenthesize: bool) {
        if parenthesize {
            self.write("(");
            self.expr(expr, depth);
            self.write(")");
        } else {
            self.expr(expr, depth);
        }
    }

    fn arguments(&mut self, args: &[Expr], depth: usize) {
        self.write("(");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.expr(arg, depth);
        }
        self.write(")");
    }
}

/// Precedence of an expression as an operand; non-binary nodes bind tightest.
fn binary_precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Binary { op, .. } => op.precedence(),
        _ => u8::MAX,
    }
}

fn ends_with_bare_ui(expr: &Expr) -> bool {
    match expr {
        Expr::Ui { children, .. } => children.is_empty(),
        Expr::Binary { right, .. } => ends_with_bare_ui(right),
        _ => false,
    }
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_well = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    starts_well
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        && crate::lexer::token::TokenKind::keyword(name).is_none()
}
