//! The single-pass Pratt compiler: scans, parses, and emits bytecode in
//! one walk with no intermediate AST.

use crate::error::{CompileError, CompileErrors};
use crate::rules::{get_rule, Precedence};
use crate::scanner::{Scanner, Token, TokenKind};
use nrk_core::{Memory, ObjString, OpCode, Value};
use std::rc::Rc;

/// At most this many locals may be live at once per compile; slot indices
/// are emitted as a single `u8` operand, so 256 is a hard correctness
/// bound, not just a tuning knob.
const LOCAL_MAX: usize = 256;

/// One local binding: its name (borrowed from the source), its scope
/// depth (`-1` while its initializer is still being compiled, so that
/// `var a = a;` in the same scope is rejected), and whether it was
/// declared `const`.
struct Local<'src> {
    name: &'src str,
    depth: i32,
    is_const: bool,
}

/// Where a just-parsed variable reference lives, so the postfix `++`/`--`
/// rule can re-emit a get/set pair without mining previously-written
/// bytes.
#[derive(Clone)]
enum LValue {
    Global(Rc<ObjString>, u32),
    Local(u8),
}

struct ParserState<'src> {
    previous: Token<'src>,
    current: Token<'src>,
    had_error: bool,
    panic_mode: bool,
}

/// The compiler's full parsing state: scanner cursor, parser lookahead,
/// the chunk under construction, and the local-variable stack for the
/// scope currently being compiled.
///
/// `'m` borrows the [`Memory`] domain, which outlives any single compile —
/// interning and global/const bookkeeping go through it directly rather
/// than through a compiler-local table.
pub struct Compiler<'src, 'm> {
    scanner: Scanner<'src>,
    memory: &'m mut Memory,
    chunk: nrk_core::Chunk,
    parser: ParserState<'src>,
    locals: Vec<Local<'src>>,
    scope_depth: i32,
    errors: CompileErrors,
    /// Set by `variable()` when it emits a bare get (no assignment);
    /// consumed by `postfix()`. Cleared before every prefix-rule
    /// invocation so a stale descriptor from an earlier primary can never
    /// leak into an unrelated postfix check.
    pending_lvalue: Option<LValue>,
}

/// Compile `source` into a [`nrk_core::Chunk`], or the collected
/// diagnostics if anything went wrong. `memory` supplies string
/// interning and is where global/const bookkeeping is recorded; it is
/// shared across REPL lines, so redefinitions and previously-declared
/// globals are visible here too.
pub fn compile(source: &str, memory: &mut Memory) -> Result<nrk_core::Chunk, CompileErrors> {
    let mut compiler = Compiler::new(source, memory);
    compiler.advance();
    while !compiler.matches(TokenKind::Eof) {
        compiler.declaration();
    }
    compiler.emit_op(OpCode::Return);

    if compiler.errors.is_empty() {
        Ok(compiler.chunk)
    } else {
        Err(compiler.errors)
    }
}

impl<'src, 'm> Compiler<'src, 'm> {
    fn new(source: &'src str, memory: &'m mut Memory) -> Self {
        let eof = Token {
            kind: TokenKind::Eof,
            lexeme: "",
            line: 1,
        };
        Compiler {
            scanner: Scanner::new(source),
            memory,
            chunk: nrk_core::Chunk::new(),
            parser: ParserState {
                previous: eof,
                current: eof,
                had_error: false,
                panic_mode: false,
            },
            locals: Vec::new(),
            scope_depth: 0,
            errors: CompileErrors::default(),
            pending_lvalue: None,
        }
    }

    // ---- token stream -----------------------------------------------

    fn advance(&mut self) {
        self.parser.previous = self.parser.current;
        loop {
            self.parser.current = self.scanner.scan_token();
            if self.parser.current.kind != TokenKind::Error {
                break;
            }
            let message = self.parser.current.lexeme.to_string();
            self.error_at_current(&message);
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.parser.current.kind == kind
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if !self.check(kind) {
            return false;
        }
        self.advance();
        true
    }

    fn consume(&mut self, kind: TokenKind, message: &str) {
        if self.parser.current.kind == kind {
            self.advance();
        } else {
            self.error_at_current(message);
        }
    }

    fn error_at_current(&mut self, message: &str) {
        let token = self.parser.current;
        self.error_at(token, message);
    }

    fn error(&mut self, message: &str) {
        let token = self.parser.previous;
        self.error_at(token, message);
    }

    fn error_at(&mut self, token: Token<'src>, message: &str) {
        if self.parser.panic_mode {
            return;
        }
        self.parser.panic_mode = true;
        self.parser.had_error = true;
        self.errors.push(CompileError::new(message.to_string(), token.line));
    }

    /// After a parse error, discard tokens until a plausible statement
    /// boundary: just past a `;`, or at a token that starts a new
    /// declaration/statement.
    fn synchronize(&mut self) {
        self.parser.panic_mode = false;
        while self.parser.current.kind != TokenKind::Eof {
            if self.parser.previous.kind == TokenKind::Semicolon {
                return;
            }
            match self.parser.current.kind {
                TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Var
                | TokenKind::Const
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return => return,
                _ => self.advance(),
            }
        }
    }

    // ---- emit helpers -------------------------------------------------

    fn emit_byte(&mut self, byte: u8) {
        let line = self.parser.previous.line;
        self.chunk.write_byte(byte, line);
    }

    fn emit_op(&mut self, op: OpCode) {
        self.emit_byte(op as u8);
    }

    fn emit_bytes(&mut self, op: OpCode, operand: u8) {
        self.emit_op(op);
        self.emit_byte(operand);
    }

    fn emit_u24(&mut self, index: u32) {
        self.emit_byte(((index >> 16) & 0xFF) as u8);
        self.emit_byte(((index >> 8) & 0xFF) as u8);
        self.emit_byte((index & 0xFF) as u8);
    }

    /// Emit a 2-byte placeholder jump, returning the offset of its first
    /// operand byte so it can later be backpatched.
    fn emit_jump(&mut self, op: OpCode) -> usize {
        self.emit_op(op);
        self.emit_byte(0xFF);
        self.emit_byte(0xFF);
        self.chunk.len() - 2
    }

    fn patch_jump(&mut self, offset: usize) {
        let jump = self.chunk.len() - offset - 2;
        if jump > u16::MAX as usize {
            self.error("Too much code to jump over.");
            return;
        }
        self.chunk.patch_byte(offset, ((jump >> 8) & 0xFF) as u8);
        self.chunk.patch_byte(offset + 1, (jump & 0xFF) as u8);
    }

    /// Add `value` to the constant pool, reporting "Too many constants in
    /// one chunk." and returning index `0` if the pool is full.
    fn make_constant(&mut self, value: Value) -> u32 {
        match self.chunk.add_constant(value) {
            Some(index) => index,
            None => {
                self.error("Too many constants in one chunk.");
                0
            }
        }
    }

    /// Emit `OP_CONSTANT`/`OP_CONSTANT_LONG` for `value`, picking the
    /// short form while the index still fits a byte.
    fn emit_constant(&mut self, value: Value) {
        let index = self.make_constant(value);
        if index <= u8::MAX as u32 {
            self.emit_bytes(OpCode::Constant, index as u8);
        } else {
            self.emit_op(OpCode::ConstantLong);
            self.emit_u24(index);
        }
    }

    /// Emit whichever of `short`/`long` fits `index`, with its operand.
    fn emit_indexed(&mut self, short: OpCode, long: OpCode, index: u32) {
        if index <= u8::MAX as u32 {
            self.emit_bytes(short, index as u8);
        } else {
            self.emit_op(long);
            self.emit_u24(index);
        }
    }

    /// Intern `name` and add it to the constant pool, for use as the
    /// operand of a global get/define/set instruction.
    fn identifier_constant(&mut self, name: &str) -> (Rc<ObjString>, u32) {
        let obj = self.memory.intern(name.to_string());
        let rc = match obj {
            nrk_core::Object::Str(rc) => rc,
        };
        let index = self.make_constant(Value::Object(nrk_core::Object::Str(Rc::clone(&rc))));
        (rc, index)
    }

    // ---- scopes & locals ----------------------------------------------

    fn begin_scope(&mut self) {
        self.scope_depth += 1;
    }

    fn end_scope(&mut self) {
        self.scope_depth -= 1;
        while let Some(local) = self.locals.last() {
            if local.depth <= self.scope_depth {
                break;
            }
            self.emit_op(OpCode::Pop);
            self.locals.pop();
        }
    }

    fn declare_local(&mut self, name: Token<'src>, is_const: bool) {
        if self.locals.len() >= LOCAL_MAX {
            self.error("Too many local variables in function.");
            return;
        }
        for local in self.locals.iter().rev() {
            if local.depth != -1 && local.depth < self.scope_depth {
                break;
            }
            if local.name == name.lexeme {
                self.error("Already a variable with this name in this scope.");
                return;
            }
        }
        self.locals.push(Local {
            name: name.lexeme,
            depth: -1,
            is_const,
        });
    }

    /// Scan locals from the top of the stack down for a name match; a
    /// match whose initializer hasn't finished compiling yet
    /// (`depth == -1`) is reported rather than silently resolved, so
    /// `var a = a;` can't read garbage.
    fn resolve_local(&mut self, name: &str) -> LocalLookup {
        for (i, local) in self.locals.iter().enumerate().rev() {
            if local.name == name {
                if local.depth == -1 {
                    return LocalLookup::Uninitialized;
                }
                return LocalLookup::Found(i as u8);
            }
        }
        LocalLookup::NotFound
    }

    // ---- declarations & statements --------------------------------------

    fn declaration(&mut self) {
        if self.matches(TokenKind::Var) {
            self.var_declaration();
        } else if self.matches(TokenKind::Const) {
            self.const_declaration();
        } else {
            self.statement();
        }

        if self.parser.panic_mode {
            self.synchronize();
        }
    }

    /// Parse the name of a `var`/`const` declaration, declaring it as a
    /// local if we're inside a scope or reserving a global-name constant
    /// otherwise.
    fn parse_variable(&mut self, message: &str, is_const: bool) -> VarTarget {
        self.consume(TokenKind::Identifier, message);
        let name = self.parser.previous;
        if self.scope_depth > 0 {
            self.declare_local(name, is_const);
            VarTarget::Local
        } else {
            let (rc, index) = self.identifier_constant(name.lexeme);
            VarTarget::Global { name: rc, index }
        }
    }

    fn define_variable(&mut self, target: VarTarget, is_const: bool) {
        match target {
            VarTarget::Global { name, index } => {
                if is_const {
                    self.memory.mark_const(name);
                }
                self.emit_indexed(OpCode::DefineGlobal, OpCode::DefineGlobalLong, index);
            }
            VarTarget::Local => {
                let depth = self.scope_depth;
                if let Some(local) = self.locals.last_mut() {
                    local.depth = depth;
                }
            }
        }
    }

    fn var_declaration(&mut self) {
        let target = self.parse_variable("Expect variable name.", false);
        if self.matches(TokenKind::Equal) {
            self.expression();
        } else {
            self.emit_op(OpCode::Nil);
        }
        self.consume(TokenKind::Semicolon, "Expect ';' after variable declaration.");
        self.define_variable(target, false);
    }

    fn const_declaration(&mut self) {
        let target = self.parse_variable("Expect constant name.", true);
        if self.matches(TokenKind::Equal) {
            self.expression();
        } else {
            self.error("Constants must have an initial value.");
            self.emit_op(OpCode::Nil);
        }
        self.consume(TokenKind::Semicolon, "Expect ';' after constant declaration.");
        self.define_variable(target, true);
    }

    fn statement(&mut self) {
        if self.matches(TokenKind::Print) {
            self.print_statement();
        } else if self.matches(TokenKind::If) {
            self.if_statement();
        } else if self.matches(TokenKind::LeftBrace) {
            self.begin_scope();
            self.block();
            self.end_scope();
        } else {
            self.expression_statement();
        }
    }

    fn print_statement(&mut self) {
        self.expression();
        self.consume(TokenKind::Semicolon, "Expect ';' after value.");
        self.emit_op(OpCode::Print);
    }

    fn expression_statement(&mut self) {
        self.expression();
        self.consume(TokenKind::Semicolon, "Expect ';' after expression.");
        self.emit_op(OpCode::Pop);
    }

    fn block(&mut self) {
        while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::Eof) {
            self.declaration();
        }
        self.consume(TokenKind::RightBrace, "Expect '}' after block.");
    }

    /// One `OP_POP` runs on whichever arm is taken, never both.
    fn if_statement(&mut self) {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'if'.");
        self.expression();
        self.consume(TokenKind::RightParen, "Expect ')' after condition.");

        let then_jump = self.emit_jump(OpCode::JumpIfFalse);
        self.emit_op(OpCode::Pop);
        self.statement();

        let else_jump = self.emit_jump(OpCode::Jump);
        self.patch_jump(then_jump);
        self.emit_op(OpCode::Pop);

        if self.matches(TokenKind::Else) {
            self.statement();
        }
        self.patch_jump(else_jump);
    }

    // ---- expressions ----------------------------------------------------

    fn expression(&mut self) {
        self.parse_precedence(Precedence::Assignment);
    }

    fn parse_precedence(&mut self, min: Precedence) {
        self.advance();
        let prefix_rule = get_rule(self.parser.previous.kind).prefix;
        let Some(prefix_rule) = prefix_rule else {
            self.error("Expect expression.");
            return;
        };

        let can_assign = min <= Precedence::Assignment;
        self.pending_lvalue = None;
        prefix_rule(self, can_assign);

        loop {
            let rule = get_rule(self.parser.current.kind);
            let Some(postfix_rule) = rule.postfix else {
                break;
            };
            if min > rule.precedence {
                break;
            }
            self.advance();
            postfix_rule(self, can_assign);
        }

        loop {
            let rule = get_rule(self.parser.current.kind);
            if min > rule.precedence {
                break;
            }
            self.advance();
            let Some(infix_rule) = get_rule(self.parser.previous.kind).infix else {
                break;
            };
            infix_rule(self, can_assign);
        }

        if can_assign && self.matches(TokenKind::Equal) {
            self.error("Invalid assignment target.");
        }
    }
}

/// Where a parsed variable name will be bound: a reserved global-name
/// constant slot, or (once declared) a local on the compiler's stack.
enum VarTarget {
    Global { name: Rc<ObjString>, index: u32 },
    Local,
}

/// The result of scanning the local stack for a name.
enum LocalLookup {
    NotFound,
    Uninitialized,
    Found(u8),
}

/// The prefix/infix/postfix parsing functions the rule table in
/// [`crate::rules`] dispatches to. Each has the `ParseFn` signature
/// `fn(&mut Compiler, bool)`.
pub mod rules_impl {
    use super::{Compiler, LValue, LocalLookup};
    use crate::scanner::TokenKind;
    use nrk_core::{OpCode, Value};

    pub fn grouping(c: &mut Compiler<'_, '_>, _can_assign: bool) {
        c.expression();
        c.consume(TokenKind::RightParen, "Expect ')' after expressions.");
    }

    pub fn unary(c: &mut Compiler<'_, '_>, _can_assign: bool) {
        let operator = c.parser.previous.kind;
        c.parse_precedence(crate::rules::Precedence::Unary);
        match operator {
            TokenKind::Minus => c.emit_op(OpCode::Negate),
            TokenKind::Bang => c.emit_op(OpCode::Not),
            TokenKind::Tilde => c.emit_op(OpCode::BitwiseNot),
            _ => unreachable!("unary() dispatched for a non-unary token"),
        }
    }

    pub fn binary(c: &mut Compiler<'_, '_>, _can_assign: bool) {
        let operator = c.parser.previous.kind;
        let rule = crate::rules::get_rule(operator);
        c.parse_precedence(rule.precedence.next());
        match operator {
            TokenKind::Plus => c.emit_op(OpCode::Add),
            TokenKind::Minus => c.emit_op(OpCode::Subtract),
            TokenKind::Star => c.emit_op(OpCode::Multiply),
            TokenKind::Slash => c.emit_op(OpCode::Divide),
            TokenKind::BangEqual => c.emit_op(OpCode::NotEqual),
            TokenKind::EqualEqual => c.emit_op(OpCode::Equal),
            TokenKind::Greater => c.emit_op(OpCode::Greater),
            TokenKind::GreaterEqual => c.emit_op(OpCode::GreaterEqual),
            TokenKind::Less => c.emit_op(OpCode::Less),
            TokenKind::LessEqual => c.emit_op(OpCode::LessEqual),
            TokenKind::ShiftLeft => c.emit_op(OpCode::BitwiseShl),
            TokenKind::ShiftRight => c.emit_op(OpCode::BitwiseShr),
            TokenKind::Amp => c.emit_op(OpCode::BitwiseAnd),
            TokenKind::Pipe => c.emit_op(OpCode::BitwiseOr),
            TokenKind::Caret => c.emit_op(OpCode::BitwiseXor),
            _ => unreachable!("binary() dispatched for a non-binary token"),
        }
    }

    pub fn number(c: &mut Compiler<'_, '_>, _can_assign: bool) {
        let lexeme = c.parser.previous.lexeme;
        match lexeme.parse::<f64>() {
            Ok(n) => c.emit_constant(Value::Number(n)),
            Err(_) => c.error("Invalid number literal."),
        }
    }

    /// Strips the surrounding quotes; no escape sequences are recognized.
    pub fn string(c: &mut Compiler<'_, '_>, _can_assign: bool) {
        let lexeme = c.parser.previous.lexeme;
        let content = &lexeme[1..lexeme.len() - 1];
        let obj = c.memory.intern(content.to_string());
        c.emit_constant(Value::Object(obj));
    }

    pub fn literal(c: &mut Compiler<'_, '_>, _can_assign: bool) {
        match c.parser.previous.kind {
            TokenKind::Nil => c.emit_op(OpCode::Nil),
            TokenKind::True => c.emit_op(OpCode::True),
            TokenKind::False => c.emit_op(OpCode::False),
            _ => unreachable!("literal() dispatched for a non-literal token"),
        }
    }

    /// Resolve the identifier against the local stack, falling back to a
    /// global, then honor an `=` or compound-assignment operator if
    /// `can_assign` allows it.
    pub fn variable(c: &mut Compiler<'_, '_>, can_assign: bool) {
        let name = c.parser.previous;

        let location = match c.resolve_local(name.lexeme) {
            LocalLookup::Uninitialized => {
                c.error("Can't read variable in its own initializer.");
                LValue::Local(0)
            }
            LocalLookup::Found(slot) => LValue::Local(slot),
            LocalLookup::NotFound => {
                let (rc, index) = c.identifier_constant(name.lexeme);
                LValue::Global(rc, index)
            }
        };

        if can_assign && c.matches(TokenKind::Equal) {
            c.expression();
            emit_set(c, &location);
            c.pending_lvalue = None;
            return;
        }

        if can_assign {
            if let Some(op) = compound_op(c.parser.current.kind) {
                c.advance();
                emit_get(c, &location);
                c.expression();
                c.emit_op(op);
                emit_set(c, &location);
                c.pending_lvalue = None;
                return;
            }
        }

        emit_get(c, &location);
        c.pending_lvalue = Some(location);
    }

    /// The postfix rule itself only ever sees `++`/`--` dispatched from
    /// the rule table; `=` and the compound-assignment operators are
    /// folded directly into [`variable`] above since `=` is consumed by
    /// lookahead rather than through the generic infix loop.
    pub fn postfix(c: &mut Compiler<'_, '_>, _can_assign: bool) {
        let operator = c.parser.previous.kind;
        let Some(location) = c.pending_lvalue.clone() else {
            c.error("Can only apply postfix operators to a variable.");
            return;
        };

        c.emit_op(OpCode::Dup);
        c.emit_constant(Value::Number(1.0));
        match operator {
            TokenKind::PlusPlus => c.emit_op(OpCode::Add),
            TokenKind::MinusMinus => c.emit_op(OpCode::Subtract),
            _ => unreachable!("postfix() dispatched for a non-postfix token"),
        }

        emit_set(c, &location);
        c.emit_op(OpCode::Pop);
        c.pending_lvalue = None;
    }

    fn compound_op(kind: TokenKind) -> Option<OpCode> {
        match kind {
            TokenKind::PlusEqual => Some(OpCode::Add),
            TokenKind::MinusEqual => Some(OpCode::Subtract),
            TokenKind::StarEqual => Some(OpCode::Multiply),
            TokenKind::SlashEqual => Some(OpCode::Divide),
            _ => None,
        }
    }

    fn emit_get(c: &mut Compiler<'_, '_>, location: &LValue) {
        match location {
            LValue::Local(slot) => c.emit_bytes(OpCode::GetLocal, *slot),
            LValue::Global(_, index) => {
                c.emit_indexed(OpCode::GetGlobal, OpCode::GetGlobalLong, *index)
            }
        }
    }

    /// Both target kinds funnel through here so "Cannot reassign to
    /// constant variable." is reported in exactly one place, whether the
    /// assignment came from `=`, a compound operator, or `++`/`--`.
    fn emit_set(c: &mut Compiler<'_, '_>, location: &LValue) {
        match location {
            LValue::Local(slot) => {
                if c.locals[*slot as usize].is_const {
                    c.error("Cannot reassign to constant variable.");
                    return;
                }
                c.emit_bytes(OpCode::SetLocal, *slot);
            }
            LValue::Global(name, index) => {
                if c.memory.is_const(name) {
                    c.error("Cannot reassign to constant variable.");
                    return;
                }
                c.emit_indexed(OpCode::SetGlobal, OpCode::SetGlobalLong, *index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nrk_core::OpCode as Op;

    fn compile_ok(source: &str) -> nrk_core::Chunk {
        let mut memory = Memory::new();
        compile(source, &mut memory).unwrap_or_else(|e| panic!("unexpected compile error: {e}"))
    }

    fn compile_err(source: &str) -> CompileErrors {
        let mut memory = Memory::new();
        compile(source, &mut memory).expect_err("expected a compile error")
    }

    #[test]
    fn arithmetic_expression_statement_ends_in_pop_and_return() {
        let chunk = compile_ok("1 + 2 * 3;");
        let code = chunk.code();
        assert_eq!(code.last().copied(), Some(Op::Return as u8));
        assert!(code.contains(&(Op::Add as u8)));
        assert!(code.contains(&(Op::Multiply as u8)));
        assert!(code.contains(&(Op::Pop as u8)));
    }

    #[test]
    fn global_variable_round_trips_through_define_and_get() {
        let chunk = compile_ok("var a = 1; print a;");
        let code = chunk.code();
        assert!(code.contains(&(Op::DefineGlobal as u8)));
        assert!(code.contains(&(Op::GetGlobal as u8)));
        assert!(code.contains(&(Op::Print as u8)));
    }

    #[test]
    fn local_variable_uses_get_set_local_not_global_opcodes() {
        let chunk = compile_ok("{ var a = 1; a = a + 1; print a; }");
        let code = chunk.code();
        assert!(code.contains(&(Op::GetLocal as u8)));
        assert!(code.contains(&(Op::SetLocal as u8)));
        assert!(!code.contains(&(Op::DefineGlobal as u8)));
    }

    #[test]
    fn const_without_initializer_is_a_compile_error() {
        let errors = compile_err("const x;");
        assert!(errors
            .0
            .iter()
            .any(|e| e.message.contains("Constants must have an initial value")));
    }

    #[test]
    fn reassigning_a_global_const_is_a_compile_error() {
        let errors = compile_err("const x = 1; x = 2;");
        assert!(errors
            .0
            .iter()
            .any(|e| e.message.contains("Cannot reassign to constant variable")));
    }

    #[test]
    fn reassigning_a_local_const_is_a_compile_error() {
        let errors = compile_err("{ const x = 1; x = 2; }");
        assert!(errors
            .0
            .iter()
            .any(|e| e.message.contains("Cannot reassign to constant variable")));
    }

    #[test]
    fn if_else_emits_exactly_one_pop_per_branch() {
        // JUMP_IF_FALSE, POP, <then>, JUMP, POP, <else>.
        let chunk = compile_ok("if (true) { print 1; } else { print 2; }");
        let code = chunk.code();
        let pop_count = code.iter().filter(|&&b| b == Op::Pop as u8).count();
        // One OP_POP per branch for the condition, plus one each for the
        // `print 1;`/`print 2;` expression statements being absent (print
        // itself consumes its operand) — so exactly the two condition pops.
        assert_eq!(pop_count, 2);
        assert!(code.contains(&(Op::JumpIfFalse as u8)));
        assert!(code.contains(&(Op::Jump as u8)));
    }

    #[test]
    fn postfix_increment_leaves_the_pre_increment_value_on_the_stack() {
        let chunk = compile_ok("var a = 1; print a++;");
        let code = chunk.code();
        assert!(code.contains(&(Op::Dup as u8)));
        assert!(code.contains(&(Op::Add as u8)));
        assert!(code.contains(&(Op::SetGlobal as u8)));
    }

    #[test]
    fn postfix_on_a_non_variable_target_is_rejected() {
        let errors = compile_err("1++;");
        assert!(errors
            .0
            .iter()
            .any(|e| e.message.contains("Can only apply postfix operators to a variable")));
    }

    #[test]
    fn compound_assignment_desugars_to_get_rhs_op_set() {
        let chunk = compile_ok("var a = 1; a += 2;");
        let code = chunk.code();
        assert!(code.contains(&(Op::GetGlobal as u8)));
        assert!(code.contains(&(Op::Add as u8)));
        assert!(code.contains(&(Op::SetGlobal as u8)));
    }

    #[test]
    fn reading_a_local_in_its_own_initializer_is_an_error() {
        let errors = compile_err("{ var a = a; }");
        assert!(errors
            .0
            .iter()
            .any(|e| e.message.contains("Can't read variable in its own initializer")));
    }

    #[test]
    fn redeclaring_a_local_in_the_same_scope_is_an_error() {
        let errors = compile_err("{ var a = 1; var a = 2; }");
        assert!(errors
            .0
            .iter()
            .any(|e| e.message.contains("Already a variable with this name in this scope")));
    }

    #[test]
    fn template_string_literal_is_not_a_valid_expression() {
        let errors = compile_err("print `hi ${1}`;");
        assert!(errors.0.iter().any(|e| e.message.contains("Expect expression")));
    }

    #[test]
    fn string_literal_constant_is_interned_through_memory() {
        let mut memory = Memory::new();
        let chunk = compile(r#""hi!";"#, &mut memory).unwrap();
        assert_eq!(chunk.constants().len(), 1);
        assert!(memory.find_interned("hi!", nrk_core::fnv1a_hash(b"hi!")).is_some());
    }
}
