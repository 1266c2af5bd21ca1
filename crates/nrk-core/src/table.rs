//! Open-addressed hash table with linear probing and tombstone deletion,
//! keyed by interned-string identity.
//!
//! Used for three things in the Memory domain: the string intern table
//! (self-keyed — see [`crate::memory::Memory::intern`]), the globals
//! table, and the const-names set. All three share this one implementation.

use crate::object::ObjString;
use crate::value::Value;
use std::rc::Rc;

const INITIAL_CAPACITY: usize = 8;
const MAX_LOAD: f64 = 0.75;

#[derive(Clone)]
enum Slot {
    Empty,
    Tombstone,
    Live(Rc<ObjString>, Value),
}

/// An open-addressed table from interned string keys to [`Value`]s.
///
/// Capacity always doubles from [`INITIAL_CAPACITY`] and is always a power
/// of two, so `hash & (capacity - 1)` stands in for `hash % capacity`.
pub struct Table {
    entries: Vec<Slot>,
    /// Live entries only; tombstones are not counted.
    count: usize,
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    pub fn new() -> Self {
        Table {
            entries: Vec::new(),
            count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Probe for `key`, returning the index of: a live slot holding an
    /// equal key, else the first tombstone seen, else the first empty
    /// slot. Linear probing with wraparound.
    fn find_slot(entries: &[Slot], key: &ObjString) -> usize {
        let capacity = entries.len();
        let mut index = (key.hash as usize) & (capacity - 1);
        let mut tombstone: Option<usize> = None;
        loop {
            match &entries[index] {
                Slot::Empty => return tombstone.unwrap_or(index),
                Slot::Tombstone => {
                    if tombstone.is_none() {
                        tombstone = Some(index);
                    }
                }
                Slot::Live(k, _) => {
                    if k.hash == key.hash && k.as_str() == key.as_str() {
                        return index;
                    }
                }
            }
            index = (index + 1) & (capacity - 1);
        }
    }

    fn grow(&mut self, new_capacity: usize) {
        let mut new_entries = Vec::with_capacity(new_capacity);
        new_entries.resize_with(new_capacity, || Slot::Empty);

        let mut live = 0;
        for slot in std::mem::take(&mut self.entries) {
            if let Slot::Live(k, v) = slot {
                let idx = Self::find_slot(&new_entries, &k);
                new_entries[idx] = Slot::Live(k, v);
                live += 1;
            }
        }

        self.entries = new_entries;
        self.count = live;
    }

    fn ensure_capacity(&mut self) {
        if self.entries.is_empty() {
            self.grow(INITIAL_CAPACITY);
            return;
        }
        if (self.count + 1) as f64 > self.capacity() as f64 * MAX_LOAD {
            self.grow(self.capacity() * 2);
        }
    }

    /// Insert or overwrite. Returns `true` iff a brand-new live entry was
    /// created (i.e. the slot was fully empty, not a reused tombstone).
    pub fn set(&mut self, key: Rc<ObjString>, value: Value) -> bool {
        self.ensure_capacity();
        let idx = Self::find_slot(&self.entries, &key);
        let is_new = matches!(self.entries[idx], Slot::Empty);
        if is_new {
            self.count += 1;
        }
        self.entries[idx] = Slot::Live(key, value);
        is_new
    }

    pub fn get(&self, key: &ObjString) -> Option<&Value> {
        if self.entries.is_empty() {
            return None;
        }
        let idx = Self::find_slot(&self.entries, key);
        match &self.entries[idx] {
            Slot::Live(_, v) => Some(v),
            _ => None,
        }
    }

    /// Delete `key`, leaving a tombstone (`Bool(true)`, distinguishable
    /// from an empty slot's absence) so later probes that skipped past
    /// this slot still find their target.
    pub fn delete(&mut self, key: &ObjString) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let idx = Self::find_slot(&self.entries, key);
        if matches!(self.entries[idx], Slot::Live(..)) {
            self.entries[idx] = Slot::Tombstone;
            true
        } else {
            false
        }
    }

    /// Probe for a *live* entry whose key matches `bytes`/`hash` by value,
    /// not by prior identity — used by the interner to find an existing
    /// [`ObjString`] before allocating a new one.
    pub fn find_string(&self, bytes: &str, hash: u32) -> Option<Rc<ObjString>> {
        if self.entries.is_empty() {
            return None;
        }
        let capacity = self.entries.len();
        let mut index = (hash as usize) & (capacity - 1);
        loop {
            match &self.entries[index] {
                Slot::Empty => return None,
                Slot::Live(k, _) if k.hash == hash && k.as_str() == bytes => {
                    return Some(Rc::clone(k));
                }
                _ => {}
            }
            index = (index + 1) & (capacity - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::new_obj_string;

    fn key(s: &str) -> Rc<ObjString> {
        Rc::new(new_obj_string(s.to_string()))
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut t = Table::new();
        let k = key("a");
        assert!(t.set(Rc::clone(&k), Value::Number(1.0)));
        assert_eq!(t.get(&k), Some(&Value::Number(1.0)));
    }

    #[test]
    fn delete_then_get_is_absent() {
        let mut t = Table::new();
        let k = key("a");
        t.set(Rc::clone(&k), Value::Number(1.0));
        assert!(t.delete(&k));
        assert!(t.get(&k).is_none());
    }

    #[test]
    fn set_on_existing_key_is_not_a_new_entry() {
        let mut t = Table::new();
        let k = key("a");
        assert!(t.set(Rc::clone(&k), Value::Number(1.0)));
        assert!(!t.set(Rc::clone(&k), Value::Number(2.0)));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn rehash_preserves_live_entries_and_drops_tombstones() {
        let mut t = Table::new();
        let keys: Vec<_> = (0..20).map(|i| key(&format!("k{i}"))).collect();
        for k in &keys {
            t.set(Rc::clone(k), Value::Number(1.0));
        }
        // Delete half, leaving tombstones, then force growth by inserting more.
        for k in keys.iter().take(10) {
            t.delete(k);
        }
        let live_before = t.len();
        for i in 20..40 {
            t.set(key(&format!("k{i}")), Value::Number(2.0));
        }
        assert_eq!(t.len(), live_before + 20);
        for k in keys.iter().skip(10) {
            assert!(t.get(k).is_some());
        }
        for k in keys.iter().take(10) {
            assert!(t.get(k).is_none());
        }
    }

    #[test]
    fn find_string_locates_interned_value_by_content() {
        let mut t = Table::new();
        let k = key("hello");
        t.set(Rc::clone(&k), Value::Nil);
        let found = t.find_string("hello", k.hash).unwrap();
        assert!(Rc::ptr_eq(&found, &k));
        assert!(t.find_string("nope", 0).is_none());
    }
}
