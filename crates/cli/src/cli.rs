//! Command-line interface for Azalea.

use crate::diagnostics::DiagnosticConfig;
use crate::pipeline::Options;
use azalea_codegen::Target;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Azalea - an indentation-based scripting language that writes code with you
#[derive(Parser)]
#[command(name = "azalea")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// File to run (when no subcommand is specified)
    pub file: Option<PathBuf>,

    /// Replay collaborator responses from FILE, separated by lines of `---`
    #[arg(long, value_name = "FILE", global = true)]
    pub ai_script: Option<PathBuf>,

    /// Do not ask the collaborator for a fix after a runtime error
    #[arg(long, global = true)]
    pub no_ai_fix: bool,

    /// Log collaborator traffic and function registration to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable coloured diagnostics
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run an Azalea file
    Run {
        /// Path to the Azalea file
        file: PathBuf,
    },

    /// Tokenize and parse a file without running it
    Check {
        /// Path to the Azalea file
        file: PathBuf,
    },

    /// Print a file in canonical layout
    Fmt {
        /// Path to the Azalea file
        file: PathBuf,

        /// Rewrite the file in place instead of printing it
        #[arg(short, long)]
        write: bool,
    },

    /// Translate a file to another language
    Emit {
        /// Path to the Azalea file
        file: PathBuf,

        /// Output language
        #[arg(short, long, value_enum)]
        target: EmitTarget,

        /// Write the output to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print the token stream of a file
    Tokens {
        /// Path to the Azalea file
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmitTarget {
    /// WebAssembly text format
    Wat,
    /// C++ source
    Cpp,
}

impl From<EmitTarget> for Target {
    fn from(target: EmitTarget) -> Self {
        match target {
            EmitTarget::Wat => Target::Wat,
            EmitTarget::Cpp => Target::Cpp,
        }
    }
}

impl Cli {
    /// Resolve the actual command to run
    pub fn resolve_command(&self) -> ResolvedCommand {
        match &self.command {
            Some(Commands::Run { file }) => ResolvedCommand::Run { file: file.clone() },
            Some(Commands::Check { file }) => ResolvedCommand::Check { file: file.clone() },
            Some(Commands::Fmt { file, write }) => ResolvedCommand::Format {
                file: file.clone(),
                write: *write,
            },
            Some(Commands::Emit {
                file,
                target,
                output,
            }) => ResolvedCommand::Emit {
                file: file.clone(),
                target: (*target).into(),
                output: output.clone(),
            },
            Some(Commands::Tokens { file }) => ResolvedCommand::Tokens { file: file.clone() },
            None => match &self.file {
                // Direct file execution: azalea file.az
                Some(file) => ResolvedCommand::Run { file: file.clone() },
                None => ResolvedCommand::Repl,
            },
        }
    }

    /// Pipeline options derived from the global flags.
    pub fn options(&self) -> Options {
        let mut diagnostics = if self.verbose {
            DiagnosticConfig::verbose()
        } else {
            DiagnosticConfig::new()
        };
        diagnostics.use_colors = !self.no_color;

        Options {
            ai_script: self.ai_script.clone(),
            suggest_fixes: !self.no_ai_fix,
            echo_output: true,
            diagnostics,
        }
    }
}

/// Resolved command after processing CLI arguments
pub enum ResolvedCommand {
    Run {
        file: PathBuf,
    },
    Check {
        file: PathBuf,
    },
    Format {
        file: PathBuf,
        write: bool,
    },
    Emit {
        file: PathBuf,
        target: Target,
        output: Option<PathBuf>,
    },
    Tokens {
        file: PathBuf,
    },
    Repl,
}
