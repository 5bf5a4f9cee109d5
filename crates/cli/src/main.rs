mod cli;
mod diagnostics;
mod pipeline;
mod repl;

use clap::Parser;
use cli::{Cli, ResolvedCommand};
use pipeline::{build_interpreter, check_file, dump_tokens, emit_file, format_file, run_file};
use repl::Repl;
use std::io;
use std::process;

fn start_repl(options: &pipeline::Options) -> pipeline::PipelineResult<()> {
    let options = pipeline::Options {
        echo_output: false,
        ..options.clone()
    };
    let interpreter = build_interpreter(&options)?;
    let mut repl = Repl::new(interpreter, options.diagnostics.clone());
    repl.run(io::stdin().lock(), &mut io::stdout())?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    azalea_lang::log::set_verbose(cli.verbose);
    let options = cli.options();

    let result = match cli.resolve_command() {
        ResolvedCommand::Run { file } => run_file(&file, &options).map(|_| ()),
        ResolvedCommand::Check { file } => check_file(&file, &options).map(|_| ()),
        ResolvedCommand::Format { file, write } => {
            format_file(&file, write, &options).map(|_| ())
        }
        ResolvedCommand::Emit {
            file,
            target,
            output,
        } => emit_file(&file, target, output.as_deref(), &options).map(|_| ()),
        ResolvedCommand::Tokens { file } => dump_tokens(&file, &options).map(|_| ()),
        ResolvedCommand::Repl => start_repl(&options),
    };

    if let Err(error) = result {
        let error = error.to_string();
        if !error.is_empty() {
            eprintln!("{}", error);
        }
        process::exit(1);
    }
}
