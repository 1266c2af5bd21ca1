//! The Memory domain: the one long-lived owner of every interned string,
//! the globals table, and the set of global names declared `const`.
//!
//! Every [`ObjString`] is `Rc`-owned, the intern table is the sole keeper
//! of the canonical copy, and dropping a `Memory` drops everything
//! reachable from it — no tracing GC, no intrusive cleanup list.

use crate::object::{new_obj_string, Object, ObjString};
use crate::table::Table;
use crate::value::Value;
use std::rc::Rc;

/// Owns the object graph, the string intern table, and the global
/// bindings. Created before any compile and dropped only at process exit
/// (or REPL shutdown) so that globals and interned strings persist across
/// `interpret` calls.
#[derive(Default)]
pub struct Memory {
    strings: Table,
    globals: Table,
    /// Global names declared `const`. Values are always `Value::Bool(true)`;
    /// this is a set, represented on the same `Table` the rest of the
    /// domain uses.
    const_names: Table,
}

impl Memory {
    pub fn new() -> Self {
        Memory::default()
    }

    /// Intern `s`, returning the canonical shared [`ObjString`]. If an
    /// equal string is already interned, the fresh one is discarded and
    /// the existing handle is returned, so two equal strings always share
    /// one allocation.
    pub fn intern(&mut self, s: String) -> Object {
        let candidate = new_obj_string(s);
        if let Some(existing) = self.strings.find_string(candidate.as_str(), candidate.hash) {
            return Object::Str(existing);
        }
        let rc = Rc::new(candidate);
        self.strings.set(Rc::clone(&rc), Value::Nil);
        Object::Str(rc)
    }

    /// Look up an already-interned string by content, without allocating.
    /// Used by the compiler so that two occurrences of the same literal in
    /// one source file share one constant.
    pub fn find_interned(&self, s: &str, hash: u32) -> Option<Rc<ObjString>> {
        self.strings.find_string(s, hash)
    }

    pub fn define_global(&mut self, name: Rc<ObjString>, value: Value) {
        // Redefinition is allowed; OP_DEFINE_GLOBAL overwrites unconditionally.
        self.globals.set(name, value);
    }

    pub fn get_global(&self, name: &ObjString) -> Option<&Value> {
        self.globals.get(name)
    }

    /// Setting an absent global is a runtime error, and the table is left
    /// as it was (the speculative insert `set` performed is rolled back).
    pub fn set_global(&mut self, name: Rc<ObjString>, value: Value) -> Result<(), ()> {
        let is_new = self.globals.set(Rc::clone(&name), value);
        if is_new {
            self.globals.delete(&name);
            Err(())
        } else {
            Ok(())
        }
    }

    pub fn mark_const(&mut self, name: Rc<ObjString>) {
        self.const_names.set(name, Value::Bool(true));
    }

    pub fn is_const(&self, name: &ObjString) -> bool {
        self.const_names.get(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_the_same_content_twice_returns_the_same_handle() {
        let mut m = Memory::new();
        let a = m.intern("hi!".to_string());
        let b = m.intern("hi!".to_string());
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn find_interned_locates_a_previously_interned_string() {
        let mut m = Memory::new();
        let interned = m.intern("hi!".to_string());
        let hash = crate::object::fnv1a_hash(b"hi!");
        let found = m.find_interned("hi!", hash).unwrap();
        match interned {
            Object::Str(rc) => assert!(Rc::ptr_eq(&rc, &found)),
        }
    }

    #[test]
    fn set_global_on_undefined_name_errs_and_leaves_it_undefined() {
        let mut m = Memory::new();
        let name = match m.intern("a".to_string()) {
            Object::Str(rc) => rc,
        };
        assert!(m.set_global(Rc::clone(&name), Value::Number(1.0)).is_err());
        assert!(m.get_global(&name).is_none());
    }

    #[test]
    fn define_then_set_then_get_round_trips() {
        let mut m = Memory::new();
        let name = match m.intern("a".to_string()) {
            Object::Str(rc) => rc,
        };
        m.define_global(Rc::clone(&name), Value::Number(1.0));
        assert!(m.set_global(Rc::clone(&name), Value::Number(2.0)).is_ok());
        assert_eq!(m.get_global(&name), Some(&Value::Number(2.0)));
    }

    #[test]
    fn const_names_are_tracked_independently_of_the_globals_table() {
        let mut m = Memory::new();
        let name = match m.intern("k".to_string()) {
            Object::Str(rc) => rc,
        };
        assert!(!m.is_const(&name));
        m.mark_const(Rc::clone(&name));
        assert!(m.is_const(&name));
    }
}
