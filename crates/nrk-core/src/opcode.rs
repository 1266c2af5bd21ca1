//! The instruction set shared by the compiler (which emits it) and the VM
//! (which decodes and executes it).
//!
//! Every "constant-taking" instruction comes in a short form (8-bit operand,
//! up to 256 constants) and a long form (24-bit big-endian operand, up to
//! the chunk's constant-pool limit). The compiler picks the short form
//! while it still fits; see [`crate::chunk::Chunk::add_constant`].

/// A single bytecode operation.
///
/// `repr(u8)` plus `TryFrom<u8>` gives the VM a cheap decode step without a
/// hand-rolled jump table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    Constant = 0,
    ConstantLong = 1,
    Nil = 2,
    True = 3,
    False = 4,
    Pop = 5,
    Dup = 6,
    Negate = 7,
    Not = 8,
    BitwiseNot = 9,
    Add = 10,
    Subtract = 11,
    Multiply = 12,
    Divide = 13,
    BitwiseShl = 14,
    BitwiseShr = 15,
    BitwiseAnd = 16,
    BitwiseOr = 17,
    BitwiseXor = 18,
    Equal = 19,
    NotEqual = 20,
    Less = 21,
    Greater = 22,
    LessEqual = 23,
    GreaterEqual = 24,
    Print = 25,
    Jump = 26,
    JumpIfFalse = 27,
    DefineGlobal = 28,
    DefineGlobalLong = 29,
    GetGlobal = 30,
    GetGlobalLong = 31,
    SetGlobal = 32,
    SetGlobalLong = 33,
    GetLocal = 34,
    SetLocal = 35,
    Increment = 36,
    Decrement = 37,
    StackReset = 38,
    Return = 39,
}

impl OpCode {
    /// Human-readable mnemonic, used by `tracing` dispatch events.
    pub fn name(self) -> &'static str {
        match self {
            OpCode::Constant => "OP_CONSTANT",
            OpCode::ConstantLong => "OP_CONSTANT_LONG",
            OpCode::Nil => "OP_NIL",
            OpCode::True => "OP_TRUE",
            OpCode::False => "OP_FALSE",
            OpCode::Pop => "OP_POP",
            OpCode::Dup => "__OP_DUP",
            OpCode::Negate => "OP_NEGATE",
            OpCode::Not => "OP_NOT",
            OpCode::BitwiseNot => "OP_BITWISE_NOT",
            OpCode::Add => "OP_ADD",
            OpCode::Subtract => "OP_SUBTRACT",
            OpCode::Multiply => "OP_MULTIPLY",
            OpCode::Divide => "OP_DIVIDE",
            OpCode::BitwiseShl => "OP_BITWISE_SHIFT_LEFT",
            OpCode::BitwiseShr => "OP_BITWISE_SHIFT_RIGHT",
            OpCode::BitwiseAnd => "OP_BITWISE_AND",
            OpCode::BitwiseOr => "OP_BITWISE_OR",
            OpCode::BitwiseXor => "OP_BITWISE_XOR",
            OpCode::Equal => "OP_EQUAL",
            OpCode::NotEqual => "OP_NOT_EQUAL",
            OpCode::Less => "OP_LESS",
            OpCode::Greater => "OP_GREATER",
            OpCode::LessEqual => "OP_LESS_EQUAL",
            OpCode::GreaterEqual => "OP_GREATER_EQUAL",
            OpCode::Print => "OP_PRINT",
            OpCode::Jump => "OP_JUMP",
            OpCode::JumpIfFalse => "OP_JUMP_IF_FALSE",
            OpCode::DefineGlobal => "OP_DEFINE_GLOBAL",
            OpCode::DefineGlobalLong => "OP_DEFINE_GLOBAL_LONG",
            OpCode::GetGlobal => "OP_GET_GLOBAL",
            OpCode::GetGlobalLong => "OP_GET_GLOBAL_LONG",
            OpCode::SetGlobal => "OP_SET_GLOBAL",
            OpCode::SetGlobalLong => "OP_SET_GLOBAL_LONG",
            OpCode::GetLocal => "OP_GET_LOCAL",
            OpCode::SetLocal => "OP_SET_LOCAL",
            OpCode::Increment => "OP_INCREMENT",
            OpCode::Decrement => "OP_DECREMENT",
            OpCode::StackReset => "__OP_STACK_RESET",
            OpCode::Return => "OP_RETURN",
        }
    }
}

impl TryFrom<u8> for OpCode {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, u8> {
        // SAFETY-free decode: every discriminant up to Return is listed, so a
        // match is both the clearest and the cheapest option here.
        match byte {
            0 => Ok(OpCode::Constant),
            1 => Ok(OpCode::ConstantLong),
            2 => Ok(OpCode::Nil),
            3 => Ok(OpCode::True),
            4 => Ok(OpCode::False),
            5 => Ok(OpCode::Pop),
            6 => Ok(OpCode::Dup),
            7 => Ok(OpCode::Negate),
            8 => Ok(OpCode::Not),
            9 => Ok(OpCode::BitwiseNot),
            10 => Ok(OpCode::Add),
            11 => Ok(OpCode::Subtract),
            12 => Ok(OpCode::Multiply),
            13 => Ok(OpCode::Divide),
            14 => Ok(OpCode::BitwiseShl),
            15 => Ok(OpCode::BitwiseShr),
            16 => Ok(OpCode::BitwiseAnd),
            17 => Ok(OpCode::BitwiseOr),
            18 => Ok(OpCode::BitwiseXor),
            19 => Ok(OpCode::Equal),
            20 => Ok(OpCode::NotEqual),
            21 => Ok(OpCode::Less),
            22 => Ok(OpCode::Greater),
            23 => Ok(OpCode::LessEqual),
            24 => Ok(OpCode::GreaterEqual),
            25 => Ok(OpCode::Print),
            26 => Ok(OpCode::Jump),
            27 => Ok(OpCode::JumpIfFalse),
            28 => Ok(OpCode::DefineGlobal),
            29 => Ok(OpCode::DefineGlobalLong),
            30 => Ok(OpCode::GetGlobal),
            31 => Ok(OpCode::GetGlobalLong),
            32 => Ok(OpCode::SetGlobal),
            33 => Ok(OpCode::SetGlobalLong),
            34 => Ok(OpCode::GetLocal),
            35 => Ok(OpCode::SetLocal),
            36 => Ok(OpCode::Increment),
            37 => Ok(OpCode::Decrement),
            38 => Ok(OpCode::StackReset),
            39 => Ok(OpCode::Return),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_opcode_round_trips_through_its_byte() {
        for byte in 0..=39u8 {
            let op = OpCode::try_from(byte).unwrap();
            assert_eq!(op as u8, byte);
        }
    }

    #[test]
    fn unknown_byte_is_rejected() {
        assert_eq!(OpCode::try_from(255), Err(255));
    }
}
