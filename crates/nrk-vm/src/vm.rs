//! The bytecode interpreter: a simple decode-dispatch loop over a
//! [`Chunk`]'s instruction stream.

use crate::error::RuntimeError;
use crate::trace::TraceMode;
use nrk_core::{Memory, Object, OpCode, Value};
use std::rc::Rc;

/// Outcome of one `interpret` call.
#[derive(Debug)]
pub enum InterpretResult {
    Ok,
    CompileError(nrk_compiler::CompileErrors),
    RuntimeError(RuntimeError),
}

/// The operand stack and per-instruction tracing mode. Does **not** own
/// a [`Memory`] domain or a [`nrk_core::Chunk`] — both are handed to
/// [`Vm::run`] by the caller (see [`crate::interpret`]), since a REPL
/// reuses one `Vm`/`Memory` pair across many independently-compiled
/// chunks — globals and interned strings are not reset between
/// `interpret` calls.
pub struct Vm {
    stack: Vec<Value>,
    trace_mode: TraceMode,
}

impl Default for Vm {
    fn default() -> Self {
        Vm::new()
    }
}

impl Vm {
    pub fn new() -> Self {
        Vm {
            stack: Vec::new(),
            trace_mode: TraceMode::Off,
        }
    }

    pub fn with_trace_mode(trace_mode: TraceMode) -> Self {
        Vm {
            stack: Vec::new(),
            trace_mode,
        }
    }

    pub fn set_trace_mode(&mut self, trace_mode: TraceMode) {
        self.trace_mode = trace_mode;
    }

    fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    fn pop(&mut self) -> Value {
        self.stack
            .pop()
            .expect("VM stack underflow: the compiler emitted unbalanced bytecode")
    }

    fn peek(&self, distance: usize) -> &Value {
        let len = self.stack.len();
        &self.stack[len - 1 - distance]
    }

    /// Discard the entire operand stack. Run after a runtime error so the
    /// VM is left in a known-empty state for whatever `interpret` call
    /// comes next.
    fn reset_stack(&mut self) {
        self.stack.clear();
    }

    /// Run `chunk` to completion or to its first runtime error.
    pub fn run(&mut self, chunk: &nrk_core::Chunk, memory: &mut Memory) -> Result<(), RuntimeError> {
        let code = chunk.code();
        let mut ip = 0usize;

        loop {
            let instruction_start = ip;
            let line = chunk.line_for_offset(instruction_start).unwrap_or(0);
            let byte = code[ip];
            ip += 1;
            let op = OpCode::try_from(byte)
                .unwrap_or_else(|b| panic!("corrupt bytecode: unknown opcode byte {b}"));

            if self.trace_mode != TraceMode::Off {
                self.trace(op, chunk, instruction_start, line);
            }

            macro_rules! read_u8 {
                () => {{
                    let b = code[ip];
                    ip += 1;
                    b
                }};
            }
            macro_rules! read_u16 {
                () => {{
                    let hi = code[ip] as u16;
                    let lo = code[ip + 1] as u16;
                    ip += 2;
                    (hi << 8) | lo
                }};
            }
            macro_rules! read_u24 {
                () => {{
                    let b0 = code[ip] as u32;
                    let b1 = code[ip + 1] as u32;
                    let b2 = code[ip + 2] as u32;
                    ip += 3;
                    (b0 << 16) | (b1 << 8) | b2
                }};
            }

            macro_rules! runtime_error {
                ($msg:expr) => {{
                    self.reset_stack();
                    return Err(RuntimeError::new($msg, line));
                }};
            }

            match op {
                OpCode::Constant => {
                    let idx = read_u8!() as usize;
                    self.push(chunk.constants()[idx].clone());
                }
                OpCode::ConstantLong => {
                    let idx = read_u24!() as usize;
                    self.push(chunk.constants()[idx].clone());
                }
                OpCode::Nil => self.push(Value::Nil),
                OpCode::True => self.push(Value::Bool(true)),
                OpCode::False => self.push(Value::Bool(false)),
                OpCode::Pop => {
                    self.pop();
                }
                OpCode::Dup => {
                    let top = self.peek(0).clone();
                    self.push(top);
                }
                OpCode::Negate => {
                    if !self.peek(0).is_number() {
                        runtime_error!("Operand must be a number.");
                    }
                    let n = self.pop().as_number().unwrap();
                    self.push(Value::Number(-n));
                }
                OpCode::Not => {
                    let v = self.pop();
                    self.push(Value::Bool(v.is_falsey()));
                }
                OpCode::BitwiseNot => {
                    let Some(n) = as_i64(self.peek(0)) else {
                        runtime_error!("Operand must be a number.");
                    };
                    self.pop();
                    self.push(Value::Number(!n as f64));
                }
                OpCode::Add => {
                    if self.peek(0).is_string() && self.peek(1).is_string() {
                        let b = self.pop();
                        let a = self.pop();
                        let concatenated = format!("{}{}", a.as_str().unwrap(), b.as_str().unwrap());
                        self.push(Value::Object(memory.intern(concatenated)));
                    } else if self.peek(0).is_number() && self.peek(1).is_number() {
                        let b = self.pop().as_number().unwrap();
                        let a = self.pop().as_number().unwrap();
                        self.push(Value::Number(a + b));
                    } else {
                        runtime_error!("Operands must be two numbers or two strings.");
                    }
                }
                OpCode::Subtract => self.numeric_binary_op(line, |a, b| a - b)?,
                OpCode::Multiply => self.numeric_binary_op(line, |a, b| a * b)?,
                OpCode::Divide => self.numeric_binary_op(line, |a, b| a / b)?,
                OpCode::BitwiseShl => self.int_binary_op(line, |a, b| a.wrapping_shl(b as u32))?,
                OpCode::BitwiseShr => self.int_binary_op(line, |a, b| a.wrapping_shr(b as u32))?,
                OpCode::BitwiseAnd => self.int_binary_op(line, |a, b| a & b)?,
                OpCode::BitwiseOr => self.int_binary_op(line, |a, b| a | b)?,
                OpCode::BitwiseXor => self.int_binary_op(line, |a, b| a ^ b)?,
                OpCode::Equal => {
                    let b = self.pop();
                    let a = self.pop();
                    self.push(Value::Bool(a == b));
                }
                OpCode::NotEqual => {
                    let b = self.pop();
                    let a = self.pop();
                    self.push(Value::Bool(a != b));
                }
                OpCode::Less => self.comparison_op(line, |a, b| a < b)?,
                OpCode::Greater => self.comparison_op(line, |a, b| a > b)?,
                OpCode::LessEqual => self.comparison_op(line, |a, b| a <= b)?,
                OpCode::GreaterEqual => self.comparison_op(line, |a, b| a >= b)?,
                OpCode::Print => {
                    println!("{}", self.pop());
                }
                OpCode::Jump => {
                    let offset = read_u16!() as usize;
                    ip += offset;
                }
                OpCode::JumpIfFalse => {
                    let offset = read_u16!() as usize;
                    if self.peek(0).is_falsey() {
                        ip += offset;
                    }
                }
                OpCode::DefineGlobal => {
                    let idx = read_u8!() as usize;
                    let name = global_name(chunk, idx);
                    let value = self.pop();
                    memory.define_global(name, value);
                }
                OpCode::DefineGlobalLong => {
                    let idx = read_u24!() as usize;
                    let name = global_name(chunk, idx);
                    let value = self.pop();
                    memory.define_global(name, value);
                }
                OpCode::GetGlobal => {
                    let idx = read_u8!() as usize;
                    let name = global_name(chunk, idx);
                    match memory.get_global(&name) {
                        Some(value) => {
                            let value = value.clone();
                            self.push(value);
                        }
                        None => runtime_error!(format!("Undefined variable '{name}'.")),
                    }
                }
                OpCode::GetGlobalLong => {
                    let idx = read_u24!() as usize;
                    let name = global_name(chunk, idx);
                    match memory.get_global(&name) {
                        Some(value) => {
                            let value = value.clone();
                            self.push(value);
                        }
                        None => runtime_error!(format!("Undefined variable '{name}'.")),
                    }
                }
                OpCode::SetGlobal => {
                    let idx = read_u8!() as usize;
                    let name = global_name(chunk, idx);
                    let value = self.peek(0).clone();
                    if memory.set_global(Rc::clone(&name), value).is_err() {
                        runtime_error!(format!("Undefined variable '{name}'."));
                    }
                }
                OpCode::SetGlobalLong => {
                    let idx = read_u24!() as usize;
                    let name = global_name(chunk, idx);
                    let value = self.peek(0).clone();
                    if memory.set_global(Rc::clone(&name), value).is_err() {
                        runtime_error!(format!("Undefined variable '{name}'."));
                    }
                }
                OpCode::GetLocal => {
                    let slot = read_u8!() as usize;
                    self.push(self.stack[slot].clone());
                }
                OpCode::SetLocal => {
                    let slot = read_u8!() as usize;
                    self.stack[slot] = self.peek(0).clone();
                }
                OpCode::Increment => {
                    if !self.peek(0).is_number() {
                        runtime_error!("Operand must be a number.");
                    }
                    let n = self.pop().as_number().unwrap();
                    self.push(Value::Number(n + 1.0));
                }
                OpCode::Decrement => {
                    if !self.peek(0).is_number() {
                        runtime_error!("Operand must be a number.");
                    }
                    let n = self.pop().as_number().unwrap();
                    self.push(Value::Number(n - 1.0));
                }
                OpCode::StackReset => self.reset_stack(),
                OpCode::Return => return Ok(()),
            }
        }
    }

    fn numeric_binary_op(&mut self, line: usize, f: impl Fn(f64, f64) -> f64) -> Result<(), RuntimeError> {
        if !self.peek(0).is_number() || !self.peek(1).is_number() {
            self.reset_stack();
            return Err(RuntimeError::new("Operands must be numbers.", line));
        }
        let b = self.pop().as_number().unwrap();
        let a = self.pop().as_number().unwrap();
        self.push(Value::Number(f(a, b)));
        Ok(())
    }

    fn int_binary_op(&mut self, line: usize, f: impl Fn(i64, i64) -> i64) -> Result<(), RuntimeError> {
        let (Some(b), Some(a)) = (as_i64(self.peek(0)), as_i64(self.peek(1))) else {
            self.reset_stack();
            return Err(RuntimeError::new("Operands must be numbers.", line));
        };
        self.pop();
        self.pop();
        self.push(Value::Number(f(a, b) as f64));
        Ok(())
    }

    fn comparison_op(&mut self, line: usize, f: impl Fn(f64, f64) -> bool) -> Result<(), RuntimeError> {
        if !self.peek(0).is_number() || !self.peek(1).is_number() {
            self.reset_stack();
            return Err(RuntimeError::new("Operands must be numbers.", line));
        }
        let b = self.pop().as_number().unwrap();
        let a = self.pop().as_number().unwrap();
        self.push(Value::Bool(f(a, b)));
        Ok(())
    }

    fn trace(&self, op: OpCode, chunk: &nrk_core::Chunk, offset: usize, line: usize) {
        match self.trace_mode {
            TraceMode::Off => {}
            TraceMode::Stack => {
                let rendered: Vec<String> = self.stack.iter().map(|v| format!("[ {v} ]")).collect();
                tracing::debug!(target: "nrk_vm::trace", offset, line, op = op.name(), stack = %rendered.join(""));
            }
            TraceMode::Disassemble => {
                tracing::debug!(
                    target: "nrk_vm::trace",
                    offset,
                    line,
                    op = op.name(),
                    chunk_len = chunk.len(),
                    "disassembled instruction"
                );
            }
        }
    }
}

/// Read constant `idx` out of `chunk` as the `Rc<ObjString>` naming a
/// global, panicking if the compiler ever emitted an index pointing at a
/// non-string constant (an internal invariant, not a user-facing error).
fn global_name(chunk: &nrk_core::Chunk, idx: usize) -> Rc<nrk_core::ObjString> {
    match &chunk.constants()[idx] {
        Value::Object(Object::Str(rc)) => Rc::clone(rc),
        _ => panic!("corrupt bytecode: global-name constant is not a string"),
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    value.as_number().map(|n| n as i64)
}

/// Compile and run `source` against `vm`/`memory`. `memory` is not reset
/// between calls — that persistence across calls is what makes the REPL
/// usable.
pub fn interpret(source: &str, vm: &mut Vm, memory: &mut Memory) -> InterpretResult {
    match nrk_compiler::compile(source, memory) {
        Ok(chunk) => match vm.run(&chunk, memory) {
            Ok(()) => InterpretResult::Ok,
            Err(err) => InterpretResult::RuntimeError(err),
        },
        Err(errors) => InterpretResult::CompileError(errors),
    }
}
