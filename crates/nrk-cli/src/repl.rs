//! Interactive line-oriented REPL: reads one line at a time, compiles and
//! runs it against a `Vm`/`Memory` pair that lives for the whole session,
//! so variables and interned strings defined on one line are visible on
//! the next.

use nrk_core::Memory;
use nrk_vm::{InterpretResult, Vm};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

use crate::error::CliError;

const HISTORY_FILE_NAME: &str = ".nrk_history";
const MAX_HISTORY_ENTRIES: usize = 1000;

fn history_path() -> Option<PathBuf> {
    home::home_dir().map(|mut dir| {
        dir.push(HISTORY_FILE_NAME);
        dir
    })
}

/// Run the REPL until the user sends EOF (Ctrl-D) or interrupts with
/// Ctrl-C. Returns the process exit code.
pub fn run(vm: &mut Vm, memory: &mut Memory) -> Result<i32, CliError> {
    let mut editor = DefaultEditor::new()?;
    editor.set_max_history_size(MAX_HISTORY_ENTRIES)?;

    let history_path = history_path();
    if let Some(path) = &history_path {
        // A missing history file is the normal first-run state, not an error.
        let _ = editor.load_history(path);
    }

    println!("nrk {}", env!("CARGO_PKG_VERSION"));

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                editor.add_history_entry(line.as_str())?;
                match nrk_vm::interpret(&line, vm, memory) {
                    InterpretResult::Ok => {}
                    InterpretResult::CompileError(errors) => eprintln!("{errors}"),
                    InterpretResult::RuntimeError(err) => eprintln!("{err}"),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(path) = &history_path {
        editor.save_history(path)?;
    }

    Ok(crate::runner::EXIT_OK)
}
