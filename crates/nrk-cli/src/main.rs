//! `nrk`: run a script file, or drop into an interactive REPL when no
//! file is given.

mod error;
mod repl;
mod runner;

use clap::Parser;
use nrk_core::Memory;
use nrk_vm::{TraceMode, Vm};
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_USAGE: u8 = 64;

/// `NRK_TRACE=stack` or `NRK_TRACE=disassemble` turns on per-instruction
/// tracing without a recompile; anything else (including unset) leaves
/// it off.
fn trace_mode_from_env() -> TraceMode {
    match std::env::var("NRK_TRACE").as_deref() {
        Ok("stack") => TraceMode::Stack,
        Ok("disassemble") => TraceMode::Disassemble,
        _ => TraceMode::Off,
    }
}

#[derive(Parser, Debug)]
#[command(name = "nrk", version, about = "A small bytecode-compiled scripting language")]
struct Cli {
    /// Script to run. Omit to start the interactive REPL.
    file: Option<PathBuf>,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("NRK_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    let mut vm = Vm::with_trace_mode(trace_mode_from_env());
    let mut memory = Memory::new();

    let code = match cli.file {
        Some(path) => runner::run_file(&path, &mut vm, &mut memory),
        None => match repl::run(&mut vm, &mut memory) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("nrk: {e}");
                i32::from(EXIT_USAGE)
            }
        },
    };

    ExitCode::from(code as u8)
}
