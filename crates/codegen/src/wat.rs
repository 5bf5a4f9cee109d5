//! WebAssembly text emitter.
//!
//! Every top-level function becomes an exported-style `func` taking and
//! returning `i32`. Only parameters have storage: local variables and string
//! data are never allocated, so constructs that would need them are rejected
//! instead of being lowered to placeholders.

use crate::error::{CodegenError, CodegenResult};
use azalea_lang::parser::ast::*;
use azalea_lang::parser::printer::format_number;
use std::collections::HashMap;

const BACKEND: &str = "wat";

const PREAMBLE: &[&str] = &[
    r#"(import "env" "log" (func $log (param i32)))"#,
    r#"(import "env" "createBox" (func $createBox (result i32)))"#,
    r#"(import "env" "createText" (func $createText (param i32 i32) (result i32)))"#,
    r#"(import "env" "createButton" (func $createButton (param i32 i32) (result i32)))"#,
    r#"(import "env" "appendChild" (func $appendChild (param i32 i32)))"#,
    r#"(memory $memory 1)"#,
    r#"(export "memory" (memory $memory))"#,
];

/// Emit a WAT module for the program's top-level functions.
pub fn emit_wat(program: &Program) -> CodegenResult<String> {
    WatEmitter::new(program).emit(program)
}

pub struct WatEmitter {
    out: String,
    depth: usize,
    /// Arity of every function the module will define.
    arities: HashMap<String, usize>,
    params: Vec<String>,
}

impl WatEmitter {
    pub fn new(program: &Program) -> Self {
        WatEmitter {
            out: String::new(),
            depth: 0,
            arities: program
                .functions()
                .map(|decl| (decl.name.clone(), decl.params.len()))
                .collect(),
            params: Vec::new(),
        }
    }

    pub fn emit(mut self, program: &Program) -> CodegenResult<String> {
        self.line("(module");
        self.depth += 1;
        for import in PREAMBLE {
            self.line(import);
        }

        for decl in program.functions() {
            self.function(decl)?;
        }

        self.depth -= 1;
        self.line(")");
        Ok(self.out)
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth * usize::from(!text.is_empty()) {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn function(&mut self, decl: &FunctionDeclaration) -> CodegenResult<()> {
        let mut header = format!("(func ${}", decl.name);
        for i in 0..decl.params.len() {
            header.push_str(&format!(" (param $p{i} i32)"));
        }
        header.push_str(" (result i32)");

        self.line("");
        self.line(&header);
        self.depth += 1;
        self.params = decl.params.clone();
        for stmt in &decl.body {
            self.statement(stmt)?;
        }
        // Falling off the end returns 0.
        self.line("i32.const 0");
        self.params.clear();
        self.depth -= 1;
        self.line(")");

        if decl.name == "main" {
            self.line(r#"(export "main" (func $main))"#);
        }
        Ok(())
    }

    fn statement(&mut self, stmt: &Stmt) -> CodegenResult<()> {
        match stmt {
            Stmt::FunctionDeclaration(decl) => {
                return Err(CodegenError::unsupported(
                    BACKEND,
                    format!("nested function '{}'", decl.name),
                ));
            }
            Stmt::VariableDeclaration { init, .. } => {
                if let Some(init) = init {
                    self.expression(init)?;
                    self.line("drop");
                }
            }
            Stmt::If {
                test,
                consequent,
                alternate,
            } => {
                self.expression(test)?;
                self.line("if");
                self.nested(consequent)?;
                if let Some(alternate) = alternate {
                    self.line("else");
                    self.nested(alternate)?;
                }
                self.line("end");
            }
            Stmt::While { test, body } => {
                self.line("block $break");
                self.depth += 1;
                self.line("loop $continue");
                self.depth += 1;
                self.expression(test)?;
                self.line("i32.eqz");
                self.line("br_if $break");
                for stmt in body {
                    self.statement(stmt)?;
                }
                self.line("br $continue");
                self.depth -= 1;
                self.line("end");
                self.depth -= 1;
                self.line("end");
            }
            Stmt::Return(argument) => {
                match argument {
                    Some(argument) => self.expression(argument)?,
                    None => self.line("i32.const 0"),
                }
                self.line("return");
            }
            Stmt::Expression(expr) => {
                self.expression(expr)?;
                self.line("drop");
            }
            Stmt::Generate { name, .. } => {
                self.line(&format!(";; generate fn {name}: not compiled"));
            }
            Stmt::AiOptimize { .. } => self.line(";; ai.optimize block: not compiled"),
            Stmt::Ai { .. } => self.line(";; ai statement: not compiled"),
            Stmt::Import { module } => self.line(&format!(";; ai.import {module}: not compiled")),
            Stmt::Rag { .. } => self.line(";; ai.search: not compiled"),
            Stmt::Inspect { .. } => self.line(";; ai.inspect: not compiled"),
        }
        Ok(())
    }

    fn nested(&mut self, stmts: &[Stmt]) -> CodegenResult<()> {
        self.depth += 1;
        for stmt in stmts {
            self.statement(stmt)?;
        }
        self.depth -= 1;
        Ok(())
    }

    /// Lower an expression so that it leaves exactly one `i32` on the stack.
    fn expression(&mut self, expr: &Expr) -> CodegenResult<()> {
        match expr {
            Expr::Literal(Literal::Number(n)) => {
                let in_range = n.fract() == 0.0 && *n >= i32::MIN as f64 && *n <= i32::MAX as f64;
                if !in_range {
                    return Err(CodegenError::NumberOutOfRange(format_number(*n)));
                }
                self.line(&format!("i32.const {}", *n as i32));
            }
            Expr::Literal(Literal::Text(text)) => {
                return Err(CodegenError::unsupported(
                    BACKEND,
                    format!("string literal \"{text}\""),
                ));
            }
            Expr::Identifier(name) => match self.params.iter().position(|p| p == name) {
                Some(index) => self.line(&format!("local.get $p{index}")),
                None => {
                    return Err(CodegenError::unsupported(
                        BACKEND,
                        format!("read of variable '{name}'"),
                    ));
                }
            },
            Expr::Binary { op, left, right } => {
                self.expression(left)?;
                self.expression(right)?;
                self.line(binary_instruction(*op));
            }
            Expr::Call { callee, args } => self.call(callee, args)?,
            Expr::Ui { kind, children, .. } => {
                match kind {
                    UiKind::Box => self.line("call $createBox"),
                    UiKind::Text => {
                        self.line("i32.const 0");
                        self.line("i32.const 0");
                        self.line("call $createText");
                    }
                    UiKind::Button => {
                        self.line("i32.const 0");
                        self.line("i32.const 0");
                        self.line("call $createButton");
                    }
                }
                for child in children {
                    self.expression(child)?;
                    self.line("drop");
                }
            }
        }
        Ok(())
    }

    fn call(&mut self, callee: &str, args: &[Expr]) -> CodegenResult<()> {
        if callee == "print" {
            for arg in args {
                self.expression(arg)?;
                self.line("call $log");
            }
            self.line("i32.const 0");
            return Ok(());
        }

        let Some(&arity) = self.arities.get(callee) else {
            return Err(CodegenError::unsupported(
                BACKEND,
                format!("call to undeclared function '{callee}'"),
            ));
        };
        if arity != args.len() {
            return Err(CodegenError::unsupported(
                BACKEND,
                format!(
                    "call to '{callee}' with {} argument(s), expected {arity}",
                    args.len()
                ),
            ));
        }

        for arg in args {
            self.expression(arg)?;
        }
        self.line(&format!("call ${callee}"));
        Ok(())
    }
}

fn binary_instruction(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "i32.add",
        BinaryOp::Sub => "i32.sub",
        BinaryOp::Mul => "i32.mul",
        BinaryOp::Div => "i32.div_s",
        BinaryOp::Equal => "i32.eq",
        BinaryOp::NotEqual => "i32.ne",
        BinaryOp::Less => "i32.lt_s",
        BinaryOp::Greater => "i32.gt_s",
    }
}
