//! Run a single nrk source file to completion.

use nrk_core::Memory;
use nrk_vm::{InterpretResult, Vm};
use std::path::Path;

/// Exit codes mirroring the classic `sysexits.h` convention this CLI
/// surface follows: `0` OK, `65` compile error, `70` runtime error, `74`
/// file I/O error.
pub const EXIT_OK: i32 = 0;
pub const EXIT_COMPILE_ERROR: i32 = 65;
pub const EXIT_RUNTIME_ERROR: i32 = 70;
pub const EXIT_IO_ERROR: i32 = 74;

/// Read `path`, compile and run it against `vm`/`memory`, and return the
/// process exit code the result implies. Diagnostics are printed to
/// stderr; nothing is printed on success beyond whatever `print`
/// statements in the source wrote to stdout.
pub fn run_file(path: &Path, vm: &mut Vm, memory: &mut Memory) -> i32 {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Could not read file \"{}\": {e}", path.display());
            return EXIT_IO_ERROR;
        }
    };

    match nrk_vm::interpret(&source, vm, memory) {
        InterpretResult::Ok => EXIT_OK,
        InterpretResult::CompileError(errors) => {
            eprintln!("{errors}");
            EXIT_COMPILE_ERROR
        }
        InterpretResult::RuntimeError(err) => {
            eprintln!("{err}");
            EXIT_RUNTIME_ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_source(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn running_a_valid_file_exits_ok() {
        let f = write_source("print 1 + 2 * 3;");
        let mut vm = Vm::new();
        let mut memory = Memory::new();
        assert_eq!(run_file(f.path(), &mut vm, &mut memory), EXIT_OK);
    }

    #[test]
    fn a_compile_error_exits_65() {
        let f = write_source("var = 1;");
        let mut vm = Vm::new();
        let mut memory = Memory::new();
        assert_eq!(run_file(f.path(), &mut vm, &mut memory), EXIT_COMPILE_ERROR);
    }

    #[test]
    fn a_runtime_error_exits_70() {
        let f = write_source(r#"print 1 + "x";"#);
        let mut vm = Vm::new();
        let mut memory = Memory::new();
        assert_eq!(run_file(f.path(), &mut vm, &mut memory), EXIT_RUNTIME_ERROR);
    }

    #[test]
    fn a_missing_file_exits_74() {
        let mut vm = Vm::new();
        let mut memory = Memory::new();
        let missing = std::path::Path::new("/nonexistent/path/to/nrk/source.nrk");
        assert_eq!(run_file(missing, &mut vm, &mut memory), EXIT_IO_ERROR);
    }

    #[test]
    fn globals_persist_across_two_runs_sharing_one_memory() {
        let mut vm = Vm::new();
        let mut memory = Memory::new();
        let f1 = write_source("var a = 1;");
        assert_eq!(run_file(f1.path(), &mut vm, &mut memory), EXIT_OK);
        let f2 = write_source("print a;");
        assert_eq!(run_file(f2.path(), &mut vm, &mut memory), EXIT_OK);
    }
}
