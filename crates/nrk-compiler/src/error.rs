//! Compile-time diagnostics: a plain struct with a hand-written
//! `Display`/`std::error::Error` impl, no `thiserror`.

use std::fmt;

/// One compile-time diagnostic, tagged with the source line it was
/// reported against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    pub message: String,
    pub line: usize,
}

impl CompileError {
    pub fn new(message: impl Into<String>, line: usize) -> Self {
        CompileError {
            message: message.into(),
            line,
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Line {}] Error: {}", self.line, self.message)
    }
}

impl std::error::Error for CompileError {}

/// Every diagnostic collected across one compile. The compiler does not
/// stop at the first error — it synchronizes at a statement boundary and
/// keeps going, so a single bad program can surface several independent
/// mistakes at once.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompileErrors(pub Vec<CompileError>);

impl CompileErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, err: CompileError) {
        self.0.push(err);
    }
}

impl fmt::Display for CompileErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CompileErrors {}
