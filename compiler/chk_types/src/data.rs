//! The canonical type representation.

use chk_ir::{DeclId, Name};

use crate::const_value::ConstValue;
use crate::type_id::TypeId;

/// An argument bound to a generic parameter: either a concrete type or a
/// constant value (for generic-const parameters like `List!(3)`'s `3`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeArgValue {
    Type(TypeId),
    Const(ConstValue),
}

/// An array's size: a literal known at declaration time, or a reference to a
/// generic-const parameter not yet substituted with a concrete value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ArraySize {
    Literal(u64),
    Parametric(DeclId),
}

/// The interned type representation. Compared structurally by
/// `#[derive(PartialEq)]`/`Hash` for every variant *except* that `Named`
/// carries a `DeclId`, which makes record/variant/range/behaviour types
/// compare by declaration identity (plus substitution args) rather than by
/// structural shape.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeData {
    /// Poisoned sentinel: suppresses cascading diagnostics.
    Unknown,
    Bool,
    Integer {
        bits: u16,
        signed: bool,
    },
    Rational {
        bits: u16,
    },
    Float {
        bits: u16,
    },
    Complex {
        bits: u16,
    },
    Char,
    /// Immutable byte-slice view.
    Chars,
    /// Owned heap sequence.
    Str,
    Bitfield {
        bits: u16,
    },
    Pointer {
        inner: TypeId,
        mutable: bool,
    },
    Array {
        element: TypeId,
        size: ArraySize,
    },
    Slice {
        element: TypeId,
    },
    Tuple(Box<[TypeId]>),
    Function {
        params: Box<[TypeId]>,
        ret: TypeId,
    },
    /// A structural range value type, e.g. the type of `0..10` before it is
    /// bound to a declared range alias.
    Range {
        element: TypeId,
        open: bool,
    },
    /// `workspace A.B.C` used as a value.
    Workspace(Name),
    /// A record, variant, range, or behaviour declaration, optionally
    /// applied to generic arguments. Two `Named`s are the same type iff
    /// `decl` and `args` both match — declaration identity, not shape.
    Named {
        decl: DeclId,
        args: Box<[TypeArgValue]>,
    },
    /// An as-yet-unsubstituted reference to a generic type parameter, used
    /// only inside the unsubstituted body of a generic declaration (which is
    /// never type-checked directly, only instantiated — Invariants).
    GenericParam(DeclId),
}

impl TypeData {
    pub fn is_unknown(&self) -> bool {
        matches!(self, TypeData::Unknown)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, TypeData::Integer { .. })
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TypeData::Integer { .. }
                | TypeData::Rational { .. }
                | TypeData::Float { .. }
                | TypeData::Complex { .. }
        )
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, TypeData::Pointer { .. })
    }

    pub fn bits(&self) -> Option<u16> {
        match *self {
            TypeData::Integer { bits, .. }
            | TypeData::Rational { bits }
            | TypeData::Float { bits }
            | TypeData::Complex { bits }
            | TypeData::Bitfield { bits } => Some(bits),
            _ => None,
        }
    }
}
