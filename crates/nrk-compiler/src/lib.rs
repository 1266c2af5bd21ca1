//! Scanner and single-pass Pratt-precedence compiler for the nrk
//! language: source text in, a [`nrk_core::Chunk`] (or diagnostics) out.
//!
//! # Modules
//!
//! - `scanner`: the lazy, allocation-free token producer
//! - `rules`: the token-indexed parse-rule table
//! - `compiler`: the parser/emitter itself
//! - `error`: compile-time diagnostics

pub mod compiler;
pub mod error;
pub mod rules;
pub mod scanner;

pub use compiler::compile;
pub use error::{CompileError, CompileErrors};
