mod cli;
mod repl;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, SessionArgs, SourceArgs};
use listlang::engine::env::Frame;
use listlang::engine::eval::Interpreter;
use listlang::engine::loader;
use listlang::engine::value::Value;
use listlang::{evaluate_source, logging};
use std::fs;
use tracing::info;

fn main() -> Result<()> {
    logging::init_logging();
    info!("Starting listlang");

    let cli = Cli::parse();
    info!(?cli, "Parsed CLI arguments");

    match cli.command {
        Commands::Run(args) => {
            let (source, origin) = read_source(&args.source)?;
            let mut interp = new_interpreter(&args.session);
            let value = evaluate_source(&source, &mut interp, &origin)?;
            println!("{}", value);
        }
        Commands::Check(args) => {
            let (source, origin) = read_source(&args)?;
            let program = loader::load_program(&source)
                .with_context(|| format!("Failed to load program from {}", origin))?;
            info!(%program, "Program is valid");
            println!("ok: {}", origin);
        }
        Commands::Repl(args) => {
            let interp = new_interpreter(&args);
            repl::start_repl(interp)?;
        }
    }

    info!("listlang finished");
    Ok(())
}

/// Reads the program text and a label for it used in error messages.
fn read_source(args: &SourceArgs) -> Result<(String, String)> {
    match (&args.expr, &args.file) {
        (Some(expr), _) => Ok((expr.clone(), "--expr".to_string())),
        (None, Some(path)) => {
            info!(path = %path.display(), "Reading program file");
            let source = fs::read_to_string(path)
                .with_context(|| format!("Failed to read program file {}", path.display()))?;
            Ok((source, path.display().to_string()))
        }
        // clap requires one of the two.
        (None, None) => anyhow::bail!("No program given: pass FILE_PATH or --expr"),
    }
}

fn new_interpreter(args: &SessionArgs) -> Interpreter {
    let globals: Frame = args
        .bindings
        .iter()
        .map(|(name, value)| (name.clone(), Value::Integer(*value)))
        .collect();
    Interpreter::new(globals).max_depth(args.max_depth)
}
