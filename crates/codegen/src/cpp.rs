//! C++ text emitter.
//!
//! A structural translation: functions and variables use `auto`, UI
//! primitives call console stubs from a fixed preamble, and AI statements are
//! left as comments. The stubs are templates taking any argument list, and
//! like the interpreter they only show the first argument.

use crate::error::CodegenResult;
use azalea_lang::parser::ast::*;
use azalea_lang::parser::printer::format_number;

const INDENT: &str = "    ";

pub const PREAMBLE: &str = r#"#include <iostream>
#include <string>
#include <vector>
#include <functional>

using namespace std;

template <typename... Args>
void box(Args...) { cout << "[BOX]" << endl; }
template <typename T, typename... Rest>
void text(T content, Rest...) { cout << content << endl; }
template <typename T, typename... Rest>
void button(T label, Rest...) { cout << "[BUTTON: " << label << "]" << endl; }

void print() { cout << endl; }
template <typename T, typename... Rest>
void print(T first, Rest... rest) {
    cout << first;
    ((cout << " " << rest), ...);
    cout << endl;
}
"#;

/// Emit a C++ translation unit for the program.
pub fn emit_cpp(program: &Program) -> CodegenResult<String> {
    let mut emitter = CppEmitter::new();
    emitter.program(program);
    Ok(emitter.out)
}

pub struct CppEmitter {
    out: String,
    in_main: bool,
}

impl Default for CppEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl CppEmitter {
    pub fn new() -> Self {
        CppEmitter {
            out: String::from(PREAMBLE),
            in_main: false,
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    pub fn program(&mut self, program: &Program) {
        for decl in program.functions() {
            self.out.push('\n');
            self.function(decl, 0);
        }

        // Mirror the interpreter: top-level statements only run without `main`.
        let has_main = program.functions().any(|decl| decl.name == "main");
        if has_main {
            return;
        }

        let script: Vec<&Stmt> = program
            .body
            .iter()
            .filter(|stmt| !matches!(stmt, Stmt::FunctionDeclaration(_)))
            .collect();
        if script.is_empty() {
            return;
        }

        self.out.push_str("\nint main() {\n");
        self.in_main = true;
        for stmt in script {
            self.statement(stmt, 1);
        }
        self.line(1, "return 0;");
        self.in_main = false;
        self.out.push_str("}\n");
    }

    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn function(&mut self, decl: &FunctionDeclaration, depth: usize) {
        if decl.name == "main" {
            self.line(depth, "int main() {");
            self.in_main = true;
            self.block(&decl.body, depth);
            self.line(depth + 1, "return 0;");
            self.in_main = false;
        } else {
            let params: Vec<String> = decl.params.iter().map(|p| format!("auto {p}")).collect();
            self.line(
                depth,
                &format!("auto {}({}) {{", decl.name, params.join(", ")),
            );
            let was_main = std::mem::replace(&mut self.in_main, false);
            self.block(&decl.body, depth);
            self.in_main = was_main;
        }
        self.line(depth, "}");
    }

    fn block(&mut self, stmts: &[Stmt], depth: usize) {
        for stmt in stmts {
            self.statement(stmt, depth + 1);
        }
    }

    fn statement(&mut self, stmt: &Stmt, depth: usize) {
        match stmt {
            Stmt::FunctionDeclaration(decl) => {
                // Local functions become lambdas.
                let params: Vec<String> = decl.params.iter().map(|p| format!("auto {p}")).collect();
                self.line(
                    depth,
                    &format!("auto {} = [&]({}) {{", decl.name, params.join(", ")),
                );
                let was_main = std::mem::replace(&mut self.in_main, false);
                self.block(&decl.body, depth);
                self.in_main = was_main;
                self.line(depth, "};");
            }
            Stmt::VariableDeclaration { name, init } => {
                let init = init
                    .as_ref()
                    .map(|init| self.expression(init, depth))
                    .unwrap_or_else(|| "0".to_string());
                self.line(depth, &format!("auto {name} = {init};"));
            }
            Stmt::If {
                test,
                consequent,
                alternate,
            } => {
                let test = self.expression(test, depth);
                self.line(depth, &format!("if ({test}) {{"));
                self.block(consequent, depth);
                if let Some(alternate) = alternate {
                    self.line(depth, "} else {");
                    self.block(alternate, depth);
                }
                self.line(depth, "}");
            }
            Stmt::While { test, body } => {
                let test = self.expression(test, depth);
                self.line(depth, &format!("while ({test}) {{"));
                self.block(body, depth);
                self.line(depth, "}");
            }
            Stmt::Return(argument) => match argument {
                Some(argument) => {
                    let value = self.expression(argument, depth);
                    self.line(depth, &format!("return {value};"));
                }
                None if self.in_main => self.line(depth, "return 0;"),
                None => self.line(depth, "return;"),
            },
            Stmt::Expression(expr) => {
                let expr = self.expression(expr, depth);
                self.line(depth, &format!("{expr};"));
            }
            Stmt::Generate { name, .. } => {
                self.line(depth, &format!("// [AI generated function '{name}' placeholder]"));
            }
            Stmt::AiOptimize { .. } => self.line(depth, "// [AI optimized block placeholder]"),
            Stmt::Ai { instruction, .. } => {
                let instruction = instruction.as_deref().unwrap_or("Improve this code");
                self.line(depth, &format!("// [AI instruction placeholder: {instruction}]"));
            }
            Stmt::Import { module } => {
                self.line(depth, &format!("// [AI module '{module}' placeholder]"));
            }
            Stmt::Rag { query } => self.line(depth, &format!("// [AI search: {query}]")),
            Stmt::Inspect { .. } => self.line(depth, "// [AI inspect placeholder]"),
        }
    }

    fn expression(&mut self, expr: &Expr, depth: usize) -> String {
        match expr {
            Expr::Literal(Literal::Number(n)) => format_number(*n),
            Expr::Literal(Literal::Text(text)) => format!("string(\"{}\")", escape(text)),
            Expr::Identifier(name) => name.clone(),
            Expr::Binary { op, left, right } => {
                let left = self.operand(left, depth);
                let right = self.operand(right, depth);
                format!("{left} {} {right}", op.symbol())
            }
            Expr::Call { callee, args } => {
                let args = self.arguments(args, depth);
                format!("{callee}({args})")
            }
            Expr::Ui {
                kind,
                args,
                children,
            } => {
                let args = match (kind, args.is_empty()) {
                    (UiKind::Text, true) => "string(\"\")".to_string(),
                    (UiKind::Button, true) => "string(\"Button\")".to_string(),
                    _ => self.arguments(args, depth),
                };
                let call = format!("{}({})", kind.name(), args);
                if children.is_empty() {
                    return call;
                }

                let inner = INDENT.repeat(depth + 1);
                let mut code = format!("[&]() {{\n{inner}{call};\n");
                for child in children {
                    let child = self.expression(child, depth + 1);
                    code.push_str(&format!("{inner}{child};\n"));
                }
                code.push_str(&INDENT.repeat(depth));
                code.push_str("}()");
                code
            }
        }
    }

    fn operand(&mut self, expr: &Expr, depth: usize) -> String {
        let code = self.expression(expr, depth);
        if matches!(expr, Expr::Binary { .. }) {
            format!("({code})")
        } else {
            code
        }
    }

    fn arguments(&mut self, args: &[Expr], depth: usize) -> String {
        args.iter()
            .map(|arg| self.expression(arg, depth))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Escape text for a C++ string literal.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}
