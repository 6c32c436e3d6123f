//! Binary-operator result typing and numeric widening.
//!
//! Arithmetic and comparison operators never fail by *narrowing*: if both
//! operands are numeric, the checker picks the wider of the two categories
//! and bit-widths and inserts a synthetic conversion on the narrower operand
//! rather than rejecting the expression. Mixed-category combinations follow a
//! fixed promotion order; anything outside it is a type error.

use crate::data::TypeData;
use crate::interner::TypeInterner;
use crate::type_id::TypeId;

/// Where, if anywhere, a widening conversion must be inserted to bring two
/// operand types to a common arithmetic type.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Widening {
    /// Operands already agree; no conversion needed.
    None,
    /// Insert a conversion on the left operand, producing this common type.
    Left(TypeId),
    /// Insert a conversion on the right operand, producing this common type.
    Right(TypeId),
    /// The operand types cannot be unified by widening.
    Incompatible,
}

/// Relative rank of a numeric category; higher ranks absorb lower ones.
/// `Integer` < `Rational` < `Float` < `Complex`, matching the category list
/// in the data model.
fn category_rank(data: &TypeData) -> Option<u8> {
    match data {
        TypeData::Integer { .. } => Some(0),
        TypeData::Rational { .. } => Some(1),
        TypeData::Float { .. } => Some(2),
        TypeData::Complex { .. } => Some(3),
        _ => None,
    }
}

/// Computes the widening needed to bring `left` and `right` to a common
/// numeric type, or `Incompatible` if neither is numeric or they can't be
/// unified (e.g. unsigned vs. signed integers of the same width are
/// compatible by widening to the signed side; pointers are never numeric).
pub fn widen(interner: &TypeInterner, left: TypeId, right: TypeId) -> Widening {
    if left == right {
        return Widening::None;
    }
    let left_data = interner.resolve(left);
    let right_data = interner.resolve(right);
    let (Some(left_rank), Some(right_rank)) =
        (category_rank(left_data), category_rank(right_data))
    else {
        return Widening::Incompatible;
    };

    match left_rank.cmp(&right_rank) {
        std::cmp::Ordering::Less => Widening::Left(right),
        std::cmp::Ordering::Greater => Widening::Right(left),
        std::cmp::Ordering::Equal => widen_same_category(left_data, right_data, left, right),
    }
}

fn widen_same_category(
    left_data: &TypeData,
    right_data: &TypeData,
    left: TypeId,
    right: TypeId,
) -> Widening {
    match (left_data, right_data) {
        (
            TypeData::Integer {
                bits: lb,
                signed: ls,
            },
            TypeData::Integer {
                bits: rb,
                signed: rs,
            },
        ) => {
            // Prefer the wider bit-width; a tie prefers the signed side
            // (§4.4: "preserving signedness (signed wins)").
            let left_wins = (lb, ls) >= (rb, rs);
            if left_wins {
                Widening::Right(left)
            } else {
                Widening::Left(right)
            }
        }
        (TypeData::Rational { bits: lb }, TypeData::Rational { bits: rb })
        | (TypeData::Float { bits: lb }, TypeData::Float { bits: rb })
        | (TypeData::Complex { bits: lb }, TypeData::Complex { bits: rb }) => {
            if lb >= rb {
                Widening::Right(left)
            } else {
                Widening::Left(right)
            }
        }
        _ => Widening::Incompatible,
    }
}
