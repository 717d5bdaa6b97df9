//! First-seen string interning with typed ids.
//!
//! Every scope (worker-local, aggregator-global) owns its own interners; ids
//! are dense, assigned in first-seen order, and never reassigned. The id
//! newtypes keep a local path id from ever indexing a global table by accident.

use ahash::AHashMap;
use std::marker::PhantomData;

/// Dense interned id. Implementors are thin `u32` newtypes.
pub trait Id: Copy {
    fn from_raw(raw: u32) -> Self;
    fn index(self) -> usize;
}

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub struct $name(u32);

        impl Id for $name {
            #[inline]
            fn from_raw(raw: u32) -> Self {
                Self(raw)
            }
            #[inline]
            fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

id_type!(
    /// Row index into a [`crate::matrix::CountMatrix`].
    PathId
);
id_type!(
    /// Column index into a [`crate::matrix::CountMatrix`].
    DayId
);

/// Bidirectional string↔id map, first-seen assignment order.
pub struct Interner<I> {
    map: AHashMap<String, u32>,
    keys: Vec<String>,
    _ids: PhantomData<I>,
}

impl<I: Id> Interner<I> {
    pub fn new() -> Self {
        Self { map: AHashMap::new(), keys: Vec::new(), _ids: PhantomData }
    }

    /// Look up `s`, assigning the next sequential id when unseen.
    /// Returns `(id, created)` so callers can grow dependent tables.
    pub fn intern(&mut self, s: &str) -> (I, bool) {
        if let Some(&raw) = self.map.get(s) {
            return (I::from_raw(raw), false);
        }
        let raw = self.keys.len() as u32;
        self.map.insert(s.to_string(), raw);
        self.keys.push(s.to_string());
        (I::from_raw(raw), true)
    }

    /// The interned key for `id`.
    pub fn key(&self, id: I) -> &str {
        &self.keys[id.index()]
    }

    /// All keys in id (first-seen) order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn into_keys(self) -> Vec<String> {
        self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<I: Id> Default for Interner<I> {
    fn default() -> Self {
        Self::new()
    }
}
