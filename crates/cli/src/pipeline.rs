//! Pipeline for processing Azalea files.
//!
//! Every command reads one file and compiles it. Compile errors are shown
//! with source context by [`DiagnosticFormatter`]; runtime errors have
//! already been written to the program's output by the interpreter. Either
//! way the command fails with an error whose display is empty, so `main`
//! only sets the exit code.

use crate::diagnostics::{DiagnosticConfig, DiagnosticFormatter};
use azalea_codegen::{CodegenError, Target};
use azalea_lang::evaluator::collaborator::{
    Collaborator, PromptedCollaborator, ScriptedBackend, UnavailableBackend,
};
use azalea_lang::evaluator::renderer::ConsoleRenderer;
use azalea_lang::parser::printer::print_program;
use azalea_lang::{debug_log, AzaleaError, EvalConfig, Interpreter, Lexer, Program, Token};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Pipeline error type
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Code generation error: {0}")]
    Codegen(#[from] CodegenError),

    /// Already shown to the user.
    #[error("")]
    Reported(AzaleaError),
}

/// The interpreter as the command line drives it.
pub type CliInterpreter = Interpreter<Box<dyn Collaborator>, ConsoleRenderer>;

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Options {
    /// Scripted collaborator responses; without it every AI request fails.
    pub ai_script: Option<PathBuf>,
    pub suggest_fixes: bool,
    pub echo_output: bool,
    pub diagnostics: DiagnosticConfig,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            ai_script: None,
            suggest_fixes: true,
            echo_output: true,
            diagnostics: DiagnosticConfig::new(),
        }
    }
}

impl Options {
    pub fn eval_config(&self) -> EvalConfig {
        EvalConfig::new()
            .with_suggest_fixes(self.suggest_fixes)
            .with_echo_output(self.echo_output)
    }
}

/// Split a response script into individual responses.
///
/// Responses are separated by lines that contain only `---`.
pub fn split_script(script: &str) -> Vec<String> {
    let mut responses = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in script.lines() {
        if line.trim() == "---" {
            responses.push(current.join("\n"));
            current.clear();
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        responses.push(current.join("\n"));
    }

    responses
}

/// Build an interpreter with the collaborator selected by `options`.
pub fn build_interpreter(options: &Options) -> PipelineResult<CliInterpreter> {
    let collaborator: Box<dyn Collaborator> = match &options.ai_script {
        Some(path) => {
            let responses = split_script(&fs::read_to_string(path)?);
            debug_log!(
                "loaded {} scripted response(s) from {}",
                responses.len(),
                path.display()
            );
            Box::new(PromptedCollaborator::new(ScriptedBackend::with_responses(
                responses,
            )))
        }
        None => Box::new(PromptedCollaborator::new(UnavailableBackend::default())),
    };

    Ok(Interpreter::with_config(
        collaborator,
        ConsoleRenderer,
        options.eval_config(),
    ))
}

/// Display an error with source context on stderr.
pub fn display_error(error: &AzaleaError, source: &str, path: Option<&Path>, config: &DiagnosticConfig) {
    let formatter = DiagnosticFormatter::new(config.clone());
    eprint!("{}", formatter.format(error, source, path));
}

fn compile_file(path: &Path, options: &Options) -> PipelineResult<(String, Program)> {
    let source = fs::read_to_string(path)?;
    match azalea_lang::compile(&source) {
        Ok(program) => Ok((source, program)),
        Err(error) => {
            let error = AzaleaError::from(error);
            display_error(&error, &source, Some(path), &options.diagnostics);
            Err(PipelineError::Reported(error))
        }
    }
}

/// Run an Azalea file.
pub fn run_file(path: &Path, options: &Options) -> PipelineResult<CliInterpreter> {
    let (_, program) = compile_file(path, options)?;
    let mut interpreter = build_interpreter(options)?;

    interpreter
        .evaluate(&program)
        .map_err(|error| PipelineError::Reported(error.into()))?;
    Ok(interpreter)
}

/// Check an Azalea file for lexical and syntax errors.
pub fn check_file(path: &Path, options: &Options) -> PipelineResult<Program> {
    let (_, program) = compile_file(path, options)?;
    debug_log!("{}: {} top-level statement(s)", path.display(), program.body.len());
    Ok(program)
}

/// Print a file in canonical layout, or rewrite it when `write` is set.
pub fn format_file(path: &Path, write: bool, options: &Options) -> PipelineResult<String> {
    let (source, program) = compile_file(path, options)?;
    let formatted = print_program(&program);

    if write {
        if formatted != source {
            fs::write(path, &formatted)?;
        }
    } else {
        print!("{formatted}");
    }
    Ok(formatted)
}

/// Translate a file with the selected backend.
pub fn emit_file(
    path: &Path,
    target: Target,
    output: Option<&Path>,
    options: &Options,
) -> PipelineResult<String> {
    let (_, program) = compile_file(path, options)?;
    let code = azalea_codegen::emit(&program, target)?;

    match output {
        Some(output) => fs::write(output, &code)?,
        None => print!("{code}"),
    }
    Ok(code)
}

/// One line per token: position, kind and text.
pub fn describe_token(token: &Token) -> String {
    format!(
        "{}:{} {:?} {:?}",
        token.line, token.column, token.kind, token.text
    )
}

/// Print the token stream of a file.
pub fn dump_tokens(path: &Path, options: &Options) -> PipelineResult<Vec<String>> {
    let source = fs::read_to_string(path)?;
    let tokens = match Lexer::new(&source).tokenize() {
        Ok(tokens) => tokens,
        Err(error) => {
            let error = AzaleaError::from(error);
            display_error(&error, &source, Some(path), &options.diagnostics);
            return Err(PipelineError::Reported(error));
        }
    };

    let lines: Vec<String> = tokens.iter().map(describe_token).collect();
    for line in &lines {
        println!("{line}");
    }
    Ok(lines)
}
