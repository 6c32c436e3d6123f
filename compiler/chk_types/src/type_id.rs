//! Interned type handle.

use std::fmt;

/// Interned type handle. O(1) equality; the underlying [`crate::TypeData`] is
/// looked up from a [`crate::TypeInterner`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    // Fixed indices, seeded by `TypeInterner::new` in the same order.
    pub const UNKNOWN: TypeId = TypeId(0);
    pub const BOOL: TypeId = TypeId(1);
    pub const CHAR: TypeId = TypeId(2);
    pub const CHARS: TypeId = TypeId(3);
    pub const STRING: TypeId = TypeId(4);
    pub const I32: TypeId = TypeId(5);
    pub const F32: TypeId = TypeId(6);
    pub const ERROR: TypeId = TypeId(0); // `unknown` doubles as the poisoned sentinel.

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        TypeId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}
