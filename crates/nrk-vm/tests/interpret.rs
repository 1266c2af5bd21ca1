//! End-to-end scenarios exercising the full scan -> compile -> run
//! pipeline through `nrk_vm::interpret`.

use nrk_core::Memory;
use nrk_vm::{interpret, InterpretResult, Vm};

fn run(source: &str) -> InterpretResult {
    let mut vm = Vm::new();
    let mut memory = Memory::new();
    interpret(source, &mut vm, &mut memory)
}

#[test]
fn arithmetic_with_precedence_runs_clean() {
    assert!(matches!(run("print 1 + 2 * 3;"), InterpretResult::Ok));
}

#[test]
fn string_concatenation_interns_the_result() {
    assert!(matches!(
        run(r#"var greeting = "hello" + " " + "world"; print greeting;"#),
        InterpretResult::Ok
    ));
}

#[test]
fn local_shadowing_in_a_nested_scope_is_allowed() {
    let source = r#"
        var x = 1;
        {
            var x = 2;
            print x;
        }
        print x;
    "#;
    assert!(matches!(run(source), InterpretResult::Ok));
}

#[test]
fn reassigning_a_const_global_is_a_compile_error() {
    let source = r#"
        const pi = 3;
        pi = 4;
    "#;
    match run(source) {
        InterpretResult::CompileError(_) => {}
        other => panic!("expected a compile error, got {other:?}"),
    }
}

#[test]
fn postfix_increment_yields_the_pre_increment_value() {
    let source = r#"
        var i = 5;
        var j = i++;
        print j;
        print i;
    "#;
    assert!(matches!(run(source), InterpretResult::Ok));
}

#[test]
fn if_else_runs_exactly_one_branch() {
    let source = r#"
        var flag = true;
        if (flag) {
            print "yes";
        } else {
            print "no";
        }
    "#;
    assert!(matches!(run(source), InterpretResult::Ok));
}

#[test]
fn adding_a_number_to_a_string_is_a_runtime_type_error() {
    match run(r#"print 1 + "x";"#) {
        InterpretResult::RuntimeError(err) => {
            assert_eq!(err.message, "Operands must be two numbers or two strings.");
        }
        other => panic!("expected a runtime error, got {other:?}"),
    }
}

#[test]
fn using_an_undefined_global_is_a_runtime_error() {
    match run("print undeclared_name;") {
        InterpretResult::RuntimeError(err) => {
            assert_eq!(err.message, "Undefined variable 'undeclared_name'.");
        }
        other => panic!("expected a runtime error, got {other:?}"),
    }
}

#[test]
fn assigning_an_undefined_global_is_a_runtime_error() {
    match run("undeclared_name = 1;") {
        InterpretResult::RuntimeError(err) => {
            assert_eq!(err.message, "Undefined variable 'undeclared_name'.");
        }
        other => panic!("expected a runtime error, got {other:?}"),
    }
}

#[test]
fn globals_and_interned_strings_persist_across_interpret_calls() {
    let mut vm = Vm::new();
    let mut memory = Memory::new();

    assert!(matches!(
        interpret("var greeting = \"hi\";", &mut vm, &mut memory),
        InterpretResult::Ok
    ));
    assert!(matches!(
        interpret("print greeting;", &mut vm, &mut memory),
        InterpretResult::Ok
    ));
}

#[test]
fn a_runtime_error_resets_the_stack_so_the_next_call_still_works() {
    let mut vm = Vm::new();
    let mut memory = Memory::new();

    assert!(matches!(
        interpret(r#"print 1 + "x";"#, &mut vm, &mut memory),
        InterpretResult::RuntimeError(_)
    ));
    assert!(matches!(
        interpret("print 1 + 2;", &mut vm, &mut memory),
        InterpretResult::Ok
    ));
}

#[test]
fn bitwise_operators_truncate_through_integers() {
    assert!(matches!(run("print 6 & 3;"), InterpretResult::Ok));
    assert!(matches!(run("print 1 << 4;"), InterpretResult::Ok));
}

#[test]
fn a_syntax_error_reports_as_a_compile_error_not_a_panic() {
    match run("var = 1;") {
        InterpretResult::CompileError(_) => {}
        other => panic!("expected a compile error, got {other:?}"),
    }
}
