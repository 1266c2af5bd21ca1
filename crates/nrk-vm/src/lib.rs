//! The stack-based bytecode VM: decodes and executes a [`nrk_core::Chunk`]
//! against a value stack and the shared [`nrk_core::Memory`] domain.
//!
//! # Modules
//!
//! - `vm`: the decode/dispatch loop, the [`Vm`] handle, and `interpret`
//! - `trace`: run-time execution tracing modes
//! - `error`: runtime diagnostics

pub mod error;
pub mod trace;
pub mod vm;

pub use error::RuntimeError;
pub use trace::TraceMode;
pub use vm::{interpret, InterpretResult, Vm};
