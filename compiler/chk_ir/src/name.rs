//! Interned identifiers.
//!
//! Every identifier the checker looks at — value names, type names, workspace
//! segments, field names — is interned once up front by the parser/driver and
//! passed around as a [`Name`]. Comparing two names is a `u32` comparison.

use std::fmt;

use rustc_hash::FxHashMap;

/// Interned string identifier. Cheap to copy, compare, and hash.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// The reserved `_` identifier. Never bound by `define`.
    pub const UNDERSCORE: Name = Name(0);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_underscore(self) -> bool {
        self == Name::UNDERSCORE
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

/// Interns strings into [`Name`]s and resolves them back for diagnostics.
///
/// Index 0 is always `_`; the interner is seeded with it in [`NameInterner::new`]
/// so `Name::UNDERSCORE` is valid without a lookup.
#[derive(Debug, Default)]
pub struct NameInterner {
    strings: Vec<Box<str>>,
    lookup: FxHashMap<Box<str>, Name>,
}

impl NameInterner {
    pub fn new() -> Self {
        let mut interner = NameInterner {
            strings: Vec::new(),
            lookup: FxHashMap::default(),
        };
        let underscore = interner.intern("_");
        debug_assert_eq!(underscore, Name::UNDERSCORE);
        interner
    }

    pub fn intern(&mut self, s: &str) -> Name {
        if let Some(&name) = self.lookup.get(s) {
            return name;
        }
        let id = Name::from_raw(self.strings.len() as u32);
        let boxed: Box<str> = s.into();
        self.strings.push(boxed.clone());
        self.lookup.insert(boxed, id);
        id
    }

    pub fn resolve(&self, name: Name) -> &str {
        &self.strings[name.raw() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underscore_is_preseeded() {
        let interner = NameInterner::new();
        assert_eq!(interner.resolve(Name::UNDERSCORE), "_");
    }

    #[test]
    fn interning_is_idempotent() {
        let mut interner = NameInterner::new();
        let a = interner.intern("foo");
        let b = interner.intern("foo");
        assert_eq!(a, b);
        assert_eq!(interner.resolve(a), "foo");
    }

    #[test]
    fn distinct_strings_get_distinct_names() {
        let mut interner = NameInterner::new();
        let a = interner.intern("foo");
        let b = interner.intern("bar");
        assert_ne!(a, b);
    }
}
