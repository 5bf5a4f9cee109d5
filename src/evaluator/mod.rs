//! Tree-walking interpreter.
//!
//! The interpreter owns the function table, the variable frames, the output
//! log and the remembered facts. Statements that ask the collaborator for code
//! compile the answer with a fresh lexer and parser and splice it into the
//! running program (see `ai.rs`).

mod ai;
pub mod builtins;
pub mod collaborator;
pub mod config;
pub mod renderer;
pub mod value;

pub use config::EvalConfig;

use crate::debug_log;
use crate::error::{AzaleaError, RuntimeError, RuntimeResult};
use crate::parser::ast::*;
use collaborator::Collaborator;
use indexmap::IndexMap;
use renderer::Renderer;
use std::rc::Rc;
use value::{Environment, Value};

/// Outcome of executing a statement. `return` unwinds as `Flow::Return`
/// until the enclosing call boundary; errors travel separately as `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal,
    Return(Value),
}

/// An entry of the function table.
#[derive(Debug, Clone, PartialEq)]
pub enum Callable {
    /// Runs in a copy of the globals plus its parameters.
    Function(Rc<FunctionDeclaration>),
    /// Runs in a copy of the caller's frame plus its parameters.
    Macro(Rc<FunctionDeclaration>),
}

impl Callable {
    pub fn declaration(&self) -> &FunctionDeclaration {
        match self {
            Callable::Function(decl) | Callable::Macro(decl) => decl,
        }
    }
}

pub struct Interpreter<C: Collaborator, R: Renderer> {
    functions: IndexMap<String, Callable>,
    env: Environment,
    collaborator: C,
    renderer: R,
    output: Vec<String>,
    facts: Vec<String>,
    config: EvalConfig,
}

impl<C: Collaborator, R: Renderer> Interpreter<C, R> {
    pub fn new(collaborator: C, renderer: R) -> Self {
        Self::with_config(collaborator, renderer, EvalConfig::new())
    }

    pub fn with_config(collaborator: C, renderer: R, config: EvalConfig) -> Self {
        let mut env = Environment::new();
        builtins::install(&mut env);

        Interpreter {
            functions: IndexMap::new(),
            env,
            collaborator,
            renderer,
            output: Vec::new(),
            facts: Vec::new(),
            config,
        }
    }

    // Accessors

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    pub fn facts(&self) -> &[String] {
        &self.facts
    }

    pub fn functions(&self) -> &IndexMap<String, Callable> {
        &self.functions
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn globals(&self) -> &value::Scope {
        self.env.globals()
    }

    pub fn global(&self, name: &str) -> Option<&Value> {
        self.env.globals().get(name)
    }

    pub fn collaborator(&self) -> &C {
        &self.collaborator
    }

    pub fn collaborator_mut(&mut self) -> &mut C {
        &mut self.collaborator
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_parts(self) -> (C, R) {
        (self.collaborator, self.renderer)
    }

    /// Clear the output log and remembered facts. Functions and globals stay.
    pub fn reset(&mut self) {
        self.output.clear();
        self.facts.clear();
    }

    /// Register a macro: called like a function, but sees the caller's frame.
    pub fn define_macro(&mut self, name: impl Into<String>, params: Vec<String>, body: Vec<Stmt>) {
        let name = name.into();
        debug_log!("registered macro '{}'", name);
        let decl = FunctionDeclaration {
            name: name.clone(),
            params,
            body,
        };
        self.functions.insert(name, Callable::Macro(Rc::new(decl)));
    }

    fn register_function(&mut self, decl: FunctionDeclaration) {
        debug_log!("registered function '{}'", decl.name);
        self.functions
            .insert(decl.name.clone(), Callable::Function(Rc::new(decl)));
    }

    pub(crate) fn emit(&mut self, line: impl Into<String>) {
        let line = line.into();
        if self.config.echo_output {
            println!("{line}");
        }
        self.output.push(line);
    }

    // Entry points

    /// Compile and evaluate source text. Compile errors are returned without
    /// touching interpreter state.
    pub fn run_source(&mut self, source: &str) -> Result<(), AzaleaError> {
        let program = crate::compile(source)?;
        self.evaluate(&program)?;
        Ok(())
    }

    /// Run a program, recording any unhandled error as diagnostic output.
    ///
    /// After a failure one best-effort fix suggestion is requested from the
    /// collaborator. It is appended to the output and never executed.
    pub fn evaluate(&mut self, program: &Program) -> RuntimeResult<()> {
        match self.run_program(program) {
            Ok(()) => Ok(()),
            Err(error) => {
                self.report_failure(&error);
                Err(error)
            }
        }
    }

    /// Register the program's functions, then call its `main` if it declares
    /// one, or else run the remaining top-level statements in order.
    pub fn run_program(&mut self, program: &Program) -> RuntimeResult<()> {
        for decl in program.functions() {
            self.register_function(decl.clone());
        }

        if program.functions().any(|decl| decl.name == "main") {
            self.call_function("main", Vec::new())?;
            return Ok(());
        }

        for stmt in &program.body {
            if matches!(stmt, Stmt::FunctionDeclaration(_)) {
                continue;
            }
            // A top-level `return` ends the script.
            if let Flow::Return(_) = self.execute(stmt)? {
                break;
            }
        }

        Ok(())
    }

    fn report_failure(&mut self, error: &RuntimeError) {
        self.emit(format!("Runtime Error: {error}"));
        if !self.config.suggest_fixes {
            return;
        }

        self.emit("[AI Debugger] Analyzing error...");
        match self
            .collaborator
            .process(&format!("Fix this error: {error}"), "")
        {
            Ok(fix) => self.emit(format!("[AI Suggestion]:\n{}", fix.text())),
            Err(reason) => self.emit(format!("[AI Debugger] No suggestion available: {reason}")),
        }
    }

    // Statements

    pub fn execute(&mut self, stmt: &Stmt) -> RuntimeResult<Flow> {
        match stmt {
            Stmt::FunctionDeclaration(decl) => self.register_function(decl.clone()),

            Stmt::VariableDeclaration { name, init } => {
                let value = match init {
                    Some(init) => self.evaluate_expr(init)?,
                    None => Value::Null,
                };
                self.env.define(name.clone(), value);
            }

            Stmt::If {
                test,
                consequent,
                alternate,
            } => {
                if self.evaluate_expr(test)?.is_truthy() {
                    return self.execute_block(consequent);
                } else if let Some(alternate) = alternate {
                    return self.execute_block(alternate);
                }
            }

            Stmt::While { test, body } => {
                while self.evaluate_expr(test)?.is_truthy() {
                    if let Flow::Return(value) = self.execute_block(body)? {
                        return Ok(Flow::Return(value));
                    }
                }
            }

            Stmt::Return(argument) => {
                let value = match argument {
                    Some(argument) => self.evaluate_expr(argument)?,
                    None => Value::Null,
                };
                return Ok(Flow::Return(value));
            }

            Stmt::Expression(expr) => {
                self.evaluate_expr(expr)?;
            }

            Stmt::Generate {
                name,
                params,
                description,
            } => self.generate_function(name, params, description)?,

            Stmt::AiOptimize { body } => return self.optimize_block(body),

            Stmt::Ai { instruction, body } => {
                return self.process_instruction(instruction.as_deref(), body.as_deref());
            }

            Stmt::Import { module } => self.import_module(module)?,

            Stmt::Rag { query } => self.search(query)?,

            Stmt::Inspect { target } => self.inspect(target)?,
        }

        Ok(Flow::Normal)
    }

    pub fn execute_block(&mut self, stmts: &[Stmt]) -> RuntimeResult<Flow> {
        for stmt in stmts {
            if let Flow::Return(value) = self.execute(stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    // Expressions

    pub fn evaluate_expr(&mut self, expr: &Expr) -> RuntimeResult<Value> {
        match expr {
            Expr::Literal(Literal::Number(n)) => Ok(Value::Number(*n)),
            Expr::Literal(Literal::Text(s)) => Ok(Value::Text(s.clone())),

            Expr::Identifier(name) => self
                .env
                .get(name)
                .cloned()
                .ok_or_else(|| RuntimeError::UndefinedVariable(name.clone())),

            Expr::Binary { op, left, right } => {
                let left = self.evaluate_expr(left)?;
                let right = self.evaluate_expr(right)?;
                Value::binary(*op, &left, &right)
            }

            Expr::Call { callee, args } => {
                let args = self.evaluate_args(args)?;
                self.call_function(callee, args)
            }

            Expr::Ui {
                kind,
                args,
                children,
            } => {
                let args = self.evaluate_args(args)?;
                self.call_scope_builtin(kind.name(), args)?;
                for child in children {
                    self.evaluate_expr(child)?;
                }
                Ok(Value::Undefined)
            }
        }
    }

    fn evaluate_args(&mut self, args: &[Expr]) -> RuntimeResult<Vec<Value>> {
        args.iter().map(|arg| self.evaluate_expr(arg)).collect()
    }

    /// Call a function or macro from the table, falling back to a builtin
    /// bound in the active scope.
    pub fn call_function(&mut self, name: &str, args: Vec<Value>) -> RuntimeResult<Value> {
        let Some(callable) = self.functions.get(name).cloned() else {
            return self.call_scope_builtin(name, args);
        };

        if self.env.depth() >= self.config.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded(self.config.max_call_depth));
        }

        let decl = callable.declaration();
        match &callable {
            Callable::Function(_) => self.env.push_call_frame(&decl.params, args),
            Callable::Macro(_) => self.env.push_macro_frame(&decl.params, args),
        }
        let result = self.execute_block(&decl.body);
        self.env.pop_frame();

        match result? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Undefined),
        }
    }

    fn call_scope_builtin(&mut self, name: &str, args: Vec<Value>) -> RuntimeResult<Value> {
        match self.env.get(name) {
            Some(Value::Builtin(builtin)) => {
                let builtin = *builtin;
                self.call_builtin(builtin, args)
            }
            _ => Err(RuntimeError::FunctionNotFound(name.to_string())),
        }
    }
}
