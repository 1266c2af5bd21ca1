//! Runtime diagnostics.
//!
//! Same shape as `nrk-compiler`'s `CompileError`: a plain struct with a
//! hand-written `Display`/`std::error::Error`, no `thiserror`.

use std::fmt;

/// One runtime failure, tagged with the source line active when the
/// faulting instruction executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeError {
    pub message: String,
    pub line: usize,
}

impl RuntimeError {
    pub fn new(message: impl Into<String>, line: usize) -> Self {
        RuntimeError {
            message: message.into(),
            line,
        }
    }
}

impl fmt::Display for RuntimeError {
    /// `<message>\n[Line N] in script` — the message first, then the
    /// trailer that locates it, matching the two-line shape a runtime
    /// error prints to stderr.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message)?;
        write!(f, "[Line {}] in script", self.line)
    }
}

impl std::error::Error for RuntimeError {}
