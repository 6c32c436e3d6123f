//! Classifies whether one type can convert to another, and how.
//!
//! An implicit conversion becomes a synthetic cast node wrapped around the
//! original expression in the checked AST; an explicit conversion is only
//! legal where the user wrote a cast expression. This module only answers
//! "is this conversion allowed, and is it implicit or explicit" — inserting
//! the cast node is the expression checker's job.

use crate::arith::{widen, Widening};
use crate::data::TypeData;
use crate::interner::TypeInterner;
use crate::type_id::TypeId;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Conversion {
    /// No conversion needed; the types already match.
    Identity,
    /// Allowed without an explicit cast expression (numeric widening,
    /// reference-to-pointer, etc).
    Implicit,
    /// Allowed only when the user wrote an explicit cast (narrowing,
    /// pointer-to-pointer reinterpretation).
    Explicit,
    /// Not convertible under any circumstance.
    Forbidden,
}

impl Conversion {
    pub fn is_allowed(self) -> bool {
        !matches!(self, Conversion::Forbidden)
    }
}

/// Classifies converting a value of type `from` to type `to`.
pub fn classify(interner: &TypeInterner, from: TypeId, to: TypeId) -> Conversion {
    if from == to {
        return Conversion::Identity;
    }

    let from_data = interner.resolve(from);
    let to_data = interner.resolve(to);

    // `unknown` already carries a diagnostic; let it unify with anything so
    // the error doesn't cascade.
    if from_data.is_unknown() || to_data.is_unknown() {
        return Conversion::Implicit;
    }

    if from_data.is_numeric() && to_data.is_numeric() {
        return match widen(interner, from, to) {
            Widening::None => Conversion::Identity,
            Widening::Left(widened) if widened == to => Conversion::Implicit,
            Widening::Right(widened) if widened == to => Conversion::Explicit,
            _ => Conversion::Explicit,
        };
    }

    match (from_data, to_data) {
        // Pointer mutability may only loosen implicitly (mut -> const), never
        // tighten; reinterpreting the pointee type needs an explicit cast.
        (
            TypeData::Pointer {
                inner: from_inner,
                mutable: from_mut,
            },
            TypeData::Pointer {
                inner: to_inner,
                mutable: to_mut,
            },
        ) => {
            if from_inner == to_inner && (*from_mut || !to_mut) {
                Conversion::Implicit
            } else {
                Conversion::Explicit
            }
        }
        (TypeData::Array { element: from_elem, .. }, TypeData::Slice { element: to_elem })
            if from_elem == to_elem =>
        {
            Conversion::Implicit
        }
        (TypeData::Chars, TypeData::Str) | (TypeData::Str, TypeData::Chars) => {
            Conversion::Explicit
        }
        (TypeData::Char, TypeData::Integer { .. }) | (TypeData::Integer { .. }, TypeData::Char) => {
            Conversion::Explicit
        }
        _ => Conversion::Forbidden,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_types_are_identity() {
        let interner = TypeInterner::new();
        assert_eq!(classify(&interner, TypeId::I32, TypeId::I32), Conversion::Identity);
    }

    #[test]
    fn widening_numeric_conversion_is_implicit() {
        let interner = TypeInterner::new();
        assert_eq!(
            classify(&interner, TypeId::I32, TypeId::F32),
            Conversion::Implicit
        );
    }

    #[test]
    fn narrowing_numeric_conversion_is_explicit() {
        let interner = TypeInterner::new();
        assert_eq!(
            classify(&interner, TypeId::F32, TypeId::I32),
            Conversion::Explicit
        );
    }

    #[test]
    fn unrelated_types_are_forbidden() {
        let interner = TypeInterner::new();
        assert_eq!(
            classify(&interner, TypeId::BOOL, TypeId::I32),
            Conversion::Forbidden
        );
    }

    #[test]
    fn array_to_matching_slice_is_implicit() {
        let mut interner = TypeInterner::new();
        let array = interner.intern(TypeData::Array {
            element: TypeId::I32,
            size: crate::data::ArraySize::Literal(4),
        });
        let slice = interner.intern(TypeData::Slice {
            element: TypeId::I32,
        });
        assert_eq!(classify(&interner, array, slice), Conversion::Implicit);
    }

    #[test]
    fn char_and_integer_convert_only_explicitly() {
        let interner = TypeInterner::new();
        assert_eq!(classify(&interner, TypeId::CHAR, TypeId::I32), Conversion::Explicit);
        assert_eq!(classify(&interner, TypeId::I32, TypeId::CHAR), Conversion::Explicit);
    }

    #[test]
    fn mut_pointer_to_const_pointer_is_implicit() {
        let mut interner = TypeInterner::new();
        let mut_ptr = interner.intern(TypeData::Pointer {
            inner: TypeId::I32,
            mutable: true,
        });
        let const_ptr = interner.intern(TypeData::Pointer {
            inner: TypeId::I32,
            mutable: false,
        });
        assert_eq!(classify(&interner, mut_ptr, const_ptr), Conversion::Implicit);
        assert_eq!(classify(&interner, const_ptr, mut_ptr), Conversion::Explicit);
    }
}
