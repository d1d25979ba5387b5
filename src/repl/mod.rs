mod highlighter;
mod history;

use highlighter::ReplHelper;
use listlang::engine::env::Frame;
use listlang::engine::eval::Interpreter;
use listlang::evaluate_source;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use std::io::Write;
use tracing::{info, warn};

/// What the REPL should do with one line of input.
#[derive(Debug, PartialEq)]
enum Input<'a> {
    Blank,
    Exit,
    ShowFrame,
    Program(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    match line.trim() {
        "" => Input::Blank,
        ".exit" => Input::Exit,
        ".frame" => Input::ShowFrame,
        program => Input::Program(program),
    }
}

/// Renders the global frame's bindings, sorted by name.
fn describe_frame(frame: &Frame) -> String {
    let mut names: Vec<&String> = frame.keys().collect();
    names.sort();
    names
        .into_iter()
        .map(|name| format!("{} = {}", name, frame[name]))
        .collect::<Vec<_>>()
        .join("\n")
}

#[tracing::instrument(skip(interp))]
pub fn start_repl<W: Write>(mut interp: Interpreter<W>) -> anyhow::Result<()> {
    info!("Starting REPL session with rustyline");
    let mut rl = Editor::<ReplHelper, DefaultHistory>::new()?;
    rl.set_helper(Some(ReplHelper));

    let history_path = history::history_path();
    match &history_path {
        Some(path) => history::load_history(&mut rl, path),
        None => warn!("Could not determine history file path. History will not be saved."),
    }

    let mut line_number = 1;
    loop {
        let prompt = format!("listlang ({})> ", line_number);
        match rl.readline(&prompt) {
            Ok(line) => {
                let input = classify(&line);
                if input != Input::Blank {
                    if let Err(err) = rl.add_history_entry(line.as_str()) {
                        warn!("Failed to add line to history: {}", err);
                    }
                }

                match input {
                    Input::Blank => {}
                    Input::Exit => {
                        info!("Exiting REPL session via user command.");
                        println!("Exiting.");
                        break;
                    }
                    Input::ShowFrame => println!("{}", describe_frame(interp.scopes().globals())),
                    Input::Program(source) => {
                        let origin = format!("repl line {}", line_number);
                        match evaluate_source(source, &mut interp, &origin) {
                            Ok(value) => println!("{}", value),
                            Err(e) => eprintln!("Error: {:#}", e),
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                info!("REPL interrupted (Ctrl-C).");
                println!("Interrupted. Type .exit or Ctrl-D to exit.");
            }
            Err(ReadlineError::Eof) => {
                info!("REPL EOF detected (Ctrl-D).");
                println!("Exiting.");
                break;
            }
            Err(err) => {
                eprintln!("REPL Readline Error: {:?}", err);
                break;
            }
        }
        line_number += 1;
    }

    if let Some(path) = &history_path {
        history::save_history(&mut rl, path);
    }
    Ok(())
}
