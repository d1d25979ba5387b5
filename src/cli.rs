use clap::{Args, Parser, Subcommand};
use listlang::engine::eval::DEFAULT_MAX_DEPTH;
use std::path::PathBuf;

/// Evaluates list-encoded programs written as nested JSON arrays.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(name = "listlang", bin_name = "listlang")]
#[clap(subcommand_required = true, arg_required_else_help = true)] // Ensures a subcommand is given, or help is printed.
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluates a program from a string or a JSON file and prints its result.
    Run(RunArgs),
    /// Validates a program without evaluating it.
    Check(SourceArgs),
    /// Starts an interactive session, one program per line.
    Repl(SessionArgs),
}

#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Program to evaluate, as a JSON string.
    #[clap(short, long, value_name = "PROGRAM", conflicts_with = "file")]
    pub expr: Option<String>,

    /// Path to a JSON file holding the program.
    #[clap(value_name = "FILE_PATH", conflicts_with = "expr", required_unless_present = "expr")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Pre-seeds the global frame with an integer binding. May be repeated.
    #[clap(long = "set", value_name = "NAME=INT", value_parser = parse_binding)]
    pub bindings: Vec<(String, i64)>,

    /// Maximum evaluation depth before a stack overflow error is reported.
    /// Program text itself may nest at most 128 lists deep.
    #[clap(long, value_name = "N", env = "LISTLANG_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[clap(flatten)]
    pub source: SourceArgs,

    #[clap(flatten)]
    pub session: SessionArgs,
}

fn parse_binding(raw: &str) -> Result<(String, i64), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=INT, got '{}'", raw))?;
    if name.is_empty() {
        return Err(format!("missing variable name in '{}'", raw));
    }
    let value = value
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid integer in '{}': {}", raw, e))?;
    Ok((name.to_string(), value))
}
