//! Interactive read-eval-print loop.
//!
//! The interpreter persists across inputs, so functions and globals defined
//! on one line stay visible on the next.

use crate::diagnostics::{DiagnosticConfig, DiagnosticFormatter};
use azalea_lang::evaluator::collaborator::Collaborator;
use azalea_lang::evaluator::renderer::Renderer;
use azalea_lang::evaluator::value::Value;
use azalea_lang::{AzaleaError, Interpreter};
use std::io::{self, BufRead, Write};

const PROMPT: &str = "azalea> ";
const CONTINUATION: &str = "   ...> ";

pub struct Repl<C: Collaborator, R: Renderer> {
    interpreter: Interpreter<C, R>,
    formatter: DiagnosticFormatter,
}

impl<C: Collaborator, R: Renderer> Repl<C, R> {
    /// The interpreter should not echo its output; the REPL writes it.
    pub fn new(interpreter: Interpreter<C, R>, diagnostics: DiagnosticConfig) -> Self {
        Repl {
            interpreter,
            formatter: DiagnosticFormatter::new(diagnostics),
        }
    }

    #[cfg(test)]
    pub fn interpreter(&self) -> &Interpreter<C, R> {
        &self.interpreter
    }

    pub fn run<I: BufRead, O: Write>(&mut self, input: I, out: &mut O) -> io::Result<()> {
        writeln!(out, "Azalea REPL v{}", env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "Type 'help' for commands, 'exit' or 'quit' to leave\n")?;

        let mut lines = input.lines();
        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(out)?;
                break;
            };
            let line = line?;

            match line.trim() {
                "" => continue,
                "exit" | "quit" => {
                    writeln!(out, "Goodbye!")?;
                    break;
                }
                "help" => {
                    print_help(out)?;
                    continue;
                }
                "env" => {
                    self.print_env(out)?;
                    continue;
                }
                _ => {}
            }

            let mut source = line.trim().to_string();
            // A header line opens a block that runs until an empty line.
            if source.ends_with(':') {
                loop {
                    write!(out, "{CONTINUATION}")?;
                    out.flush()?;
                    let Some(next) = lines.next() else { break };
                    let next = next?;
                    if next.trim().is_empty() {
                        break;
                    }
                    source.push('\n');
                    source.push_str(&next);
                }
            }
            source.push('\n');

            self.eval(&source, out)?;
        }

        Ok(())
    }

    fn eval<O: Write>(&mut self, source: &str, out: &mut O) -> io::Result<()> {
        let result = self.interpreter.run_source(source);
        for line in self.interpreter.take_output() {
            writeln!(out, "{line}")?;
        }

        // Runtime errors are part of the output already.
        if let Err(error @ AzaleaError::Compile(_)) = result {
            write!(out, "{}", self.formatter.format(&error, source, None))?;
        }
        Ok(())
    }

    fn print_env<O: Write>(&self, out: &mut O) -> io::Result<()> {
        for (name, value) in self.interpreter.globals() {
            if !matches!(value, Value::Builtin(_)) {
                writeln!(out, "{name} = {}", value.repr())?;
            }
        }
        for (name, callable) in self.interpreter.functions() {
            writeln!(out, "fn {name}({})", callable.declaration().params.join(", "))?;
        }
        Ok(())
    }
}

fn print_help<O: Write>(out: &mut O) -> io::Result<()> {
    writeln!(out, "Azalea REPL Commands:")?;
    writeln!(out, "  help  - Show this help message")?;
    writeln!(out, "  env   - Show global variables and functions")?;
    writeln!(out, "  exit  - Exit the REPL")?;
    writeln!(out, "  quit  - Exit the REPL")?;
    writeln!(out, "\nA line ending in ':' starts a block; finish it with an empty line.")
}
