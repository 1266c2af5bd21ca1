//! Run-time execution tracing.
//!
//! `TraceMode` is a run-time flag so the same binary can trace execution
//! on demand instead of needing a recompile. The VM checks it once per
//! dispatch loop iteration and, when enabled, reports through `tracing`
//! rather than `println!`, so trace output composes with whatever
//! subscriber the embedding binary installs (see `nrk-cli`).

/// How much per-instruction detail [`crate::Vm::run`] reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TraceMode {
    /// No per-instruction tracing (the default, and the only mode with
    /// no measurable overhead beyond one enum comparison per iteration).
    #[default]
    Off,
    /// Dump the operand stack before each instruction executes.
    Stack,
    /// Disassemble each instruction (mnemonic, operand, source line)
    /// before executing it.
    Disassemble,
}
