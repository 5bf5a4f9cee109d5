//! Statements that round-trip through the collaborator.
//!
//! Each one blocks until the collaborator answers. Code that comes back is
//! compiled by [`crate::compile`], which builds a new lexer and parser, so the
//! outer program being executed is never disturbed.

use super::collaborator::{strip_code_fence, Collaborator, CollaboratorResult};
use super::renderer::Renderer;
use super::{Flow, Interpreter};
use crate::debug_log;
use crate::error::RuntimeResult;
use crate::parser::ast::{Expr, Stmt};
use crate::parser::printer::print_statements;

/// Unwrap a collaborator answer that is expected to be Azalea source.
fn received_code(operation: &str, result: CollaboratorResult) -> RuntimeResult<String> {
    let completion = result?;
    let code = strip_code_fence(&completion.text());
    debug_log!(
        "{}: received {} bytes in {} chunk(s)",
        operation,
        code.len(),
        completion.chunks().len()
    );
    Ok(code)
}

impl<C: Collaborator, R: Renderer> Interpreter<C, R> {
    pub(super) fn generate_function(
        &mut self,
        name: &str,
        params: &[String],
        description: &str,
    ) -> RuntimeResult<()> {
        self.emit(format!("[AI] Generating function '{name}'..."));
        let code = received_code(
            "generate_function",
            self.collaborator.generate_function(name, params, description),
        )?;
        self.emit(format!("[AI] Generated:\n{code}"));

        let program = crate::compile(&code)?;
        for decl in program.functions() {
            self.register_function(decl.clone());
            self.emit(format!("[AI] Function '{}' registered.", decl.name));
        }

        Ok(())
    }

    /// Replace a block with the collaborator's optimised version of it.
    pub(super) fn optimize_block(&mut self, body: &[Stmt]) -> RuntimeResult<Flow> {
        self.emit("[AI] Optimizing block...");
        let source = print_statements(body);
        let code = received_code("optimize_block", self.collaborator.optimize_block(&source))?;
        self.emit(format!("[AI] Optimized Code:\n{code}"));

        let program = crate::compile(&code)?;
        self.execute_block(&program.body)
    }

    pub(super) fn process_instruction(
        &mut self,
        instruction: Option<&str>,
        body: Option<&[Stmt]>,
    ) -> RuntimeResult<Flow> {
        let instruction = instruction
            .map(str::to_string)
            .unwrap_or_else(|| self.config.default_instruction.clone());
        self.emit(format!("[AI] Instruction: \"{instruction}\""));

        let context = body.map(print_statements).unwrap_or_default();
        let request = if self.facts.is_empty() {
            instruction
        } else {
            format!("{instruction}\n[Memory]: {}", self.facts.join("; "))
        };

        let result = received_code("process", self.collaborator.process(&request, &context))?;
        self.emit(format!("[AI] Result:\n{result}"));
        if result.trim().is_empty() {
            return Ok(Flow::Normal);
        }

        let program = crate::compile(&result)?;
        self.execute_block(&program.body)
    }

    /// Generate a module and run it like a program of its own.
    ///
    /// Its functions join the shared table; its top-level statements run in
    /// the scope that is active at the import.
    pub(super) fn import_module(&mut self, module: &str) -> RuntimeResult<()> {
        self.emit(format!("[AI] Importing module '{module}'..."));
        let code = received_code("generate_module", self.collaborator.generate_module(module))?;

        let program = crate::compile(&code)?;
        self.run_program(&program)
    }

    pub(super) fn search(&mut self, query: &str) -> RuntimeResult<()> {
        let answer = self.collaborator.rag_search(query, &self.facts)?.text();
        debug_log!("rag_search: received {} bytes", answer.len());
        self.emit(format!("[AI Search]: {answer}"));
        Ok(())
    }

    pub(super) fn inspect(&mut self, target: &Expr) -> RuntimeResult<()> {
        let value = self.evaluate_expr(target)?;
        let answer = self.collaborator.inspect(&value)?.text();
        debug_log!("inspect: received {} bytes", answer.len());
        self.emit(format!("[AI Inspect]: {answer}"));
        Ok(())
    }
}
