use crate::repl::highlighter::ReplHelper;
use rustyline::Editor;
use rustyline::history::DefaultHistory;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

const HISTORY_FILE_NAME: &str = "history.txt";

/// Where REPL history lives: `<data dir>/listlang/history.txt`, if the platform has one.
pub(crate) fn history_path() -> Option<PathBuf> {
    dirs::data_dir()
        .or_else(dirs::config_dir)
        .map(history_path_in)
}

fn history_path_in(mut base: PathBuf) -> PathBuf {
    base.push(env!("CARGO_PKG_NAME"));
    base.push(HISTORY_FILE_NAME);
    base
}

pub(crate) fn load_history(rl: &mut Editor<ReplHelper, DefaultHistory>, path: &Path) {
    if let Some(parent_dir) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent_dir) {
            warn!(dir = %parent_dir.display(), error = %e, "Failed to create history directory");
        }
    }
    if !path.exists() {
        info!(path = %path.display(), "No history file yet, it will be created on exit");
        return;
    }
    match rl.load_history(path) {
        Ok(()) => info!(path = %path.display(), "Loaded history"),
        Err(err) => warn!(path = %path.display(), error = %err, "Could not load history"),
    }
}

pub(crate) fn save_history(rl: &mut Editor<ReplHelper, DefaultHistory>, path: &Path) {
    match rl.save_history(path) {
        Ok(()) => info!(path = %path.display(), "Saved history"),
        Err(err) => error!(path = %path.display(), error = %err, "Could not save history"),
    }
}
