//! String interning for names that appear in declarators and type parameters.
//!
//! Names are interned once and carried around as `Atom` handles, so
//! comparisons and hashing never touch string data. The interner is shared by
//! reference and interns through `&self`.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Interned string handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// The empty string. Always interned.
    pub const EMPTY: Self = Self(0);

    pub const fn index(self) -> u32 {
        self.0
    }
}

/// Thread-safe string interner.
pub struct Interner {
    ids: DashMap<Arc<str>, Atom, FxBuildHasher>,
    strings: DashMap<Atom, Arc<str>, FxBuildHasher>,
    next_id: AtomicU32,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    pub fn new() -> Self {
        let interner = Self {
            ids: DashMap::with_hasher(FxBuildHasher),
            strings: DashMap::with_hasher(FxBuildHasher),
            next_id: AtomicU32::new(Atom::EMPTY.0),
        };
        let empty = interner.intern("");
        debug_assert_eq!(empty, Atom::EMPTY);
        interner
    }

    /// Intern `text`, returning the existing atom when it was seen before.
    pub fn intern(&self, text: &str) -> Atom {
        if let Some(existing) = self.ids.get(text) {
            return *existing;
        }
        match self.ids.entry(Arc::from(text)) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let atom = Atom(self.next_id.fetch_add(1, Ordering::Relaxed));
                self.strings.insert(atom, Arc::clone(entry.key()));
                entry.insert(atom);
                atom
            }
        }
    }

    /// Look up an already interned string without interning it.
    pub fn get(&self, text: &str) -> Option<Atom> {
        self.ids.get(text).map(|r| *r)
    }

    /// Resolve an atom back to its text. Unknown atoms resolve to `""`.
    pub fn resolve(&self, atom: Atom) -> Arc<str> {
        self.strings
            .get(&atom)
            .map(|r| Arc::clone(r.value()))
            .unwrap_or_else(|| Arc::from(""))
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.len() <= 1
    }
}
