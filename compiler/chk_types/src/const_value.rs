//! The `constval` tagged union from the evaluator interface.
//!
//! Also doubles as the value half of a generic-const argument: `List!(3)`
//! substitutes its size parameter with a `ConstValue::Int(3)`.

use chk_ir::Name;

/// Floats are stored as bit patterns so `ConstValue` can derive `Eq`/`Hash`
/// and be used as a key when mangling generic instantiations.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ConstValue {
    Int(i128),
    Bool(bool),
    Char(char),
    FloatBits(u64),
    /// An interned `chars`/`string` literal value.
    Str(Name),
}

impl ConstValue {
    pub fn from_f64(value: f64) -> Self {
        ConstValue::FloatBits(value.to_bits())
    }

    pub fn as_f64(self) -> Option<f64> {
        match self {
            ConstValue::FloatBits(bits) => Some(f64::from_bits(bits)),
            _ => None,
        }
    }

    pub fn as_int(self) -> Option<i128> {
        match self {
            ConstValue::Int(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_bits_round_trip() {
        let value = ConstValue::from_f64(3.5);
        assert_eq!(value.as_f64(), Some(3.5));
    }
}
