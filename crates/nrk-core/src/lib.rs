//! nrk Core: the value model, object/string interning, hash table, and
//! chunk format shared by `nrk-compiler` and `nrk-vm`.
//!
//! # Modules
//!
//! - `value`: the tagged `Value` enum (`nil | bool | number | object`)
//! - `object`: heap objects — today just interned strings
//! - `table`: open-addressed hash table with tombstone deletion
//! - `memory`: the Memory domain (string interner, globals, const-names)
//! - `line_map`: run-length-encoded bytecode-offset-to-source-line map
//! - `chunk`: a compilation unit's code buffer, constant pool, and line map
//! - `opcode`: the shared instruction set

pub mod chunk;
pub mod line_map;
pub mod memory;
pub mod object;
pub mod opcode;
pub mod table;
pub mod value;

pub use chunk::{Chunk, MAX_CONSTANTS};
pub use memory::Memory;
pub use object::{fnv1a_hash, Object, ObjString};
pub use opcode::OpCode;
pub use table::Table;
pub use value::Value;
