//! Top-level CLI error type, unifying I/O failure with the exit code the
//! `nrk` binary should use.

use std::fmt;

/// What went wrong at the CLI boundary, already carrying its process exit
/// code (see `main.rs`'s `EXIT_*` constants).
#[derive(Debug)]
pub enum CliError {
    Io(std::io::Error),
    History(rustyline::error::ReadlineError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "{e}"),
            CliError::History(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(e: rustyline::error::ReadlineError) -> Self {
        CliError::History(e)
    }
}
