//! Structural interning for [`TypeData`].
//!
//! Single-threaded, so
//! this is a plain `HashMap` + `Vec`, not the sharded/locked design a
//! concurrent incremental compiler would need.

use rustc_hash::FxHashMap;

use crate::data::TypeData;
use crate::type_id::TypeId;

#[derive(Debug)]
pub struct TypeInterner {
    types: Vec<TypeData>,
    lookup: FxHashMap<TypeData, TypeId>,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    pub fn new() -> Self {
        let mut interner = TypeInterner {
            types: Vec::new(),
            lookup: FxHashMap::default(),
        };
        // Order must match the fixed constants on `TypeId`.
        for primitive in [
            TypeData::Unknown,
            TypeData::Bool,
            TypeData::Char,
            TypeData::Chars,
            TypeData::Str,
            TypeData::Integer {
                bits: 32,
                signed: true,
            },
            TypeData::Float { bits: 32 },
        ] {
            interner.intern(primitive);
        }
        interner
    }

    pub fn intern(&mut self, data: TypeData) -> TypeId {
        if let Some(&id) = self.lookup.get(&data) {
            return id;
        }
        let id = TypeId::from_raw(self.types.len() as u32);
        self.lookup.insert(data.clone(), id);
        self.types.push(data);
        id
    }

    pub fn resolve(&self, id: TypeId) -> &TypeData {
        &self.types[id.raw() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_constants_match_seeding_order() {
        let interner = TypeInterner::new();
        assert_eq!(interner.resolve(TypeId::UNKNOWN), &TypeData::Unknown);
        assert_eq!(interner.resolve(TypeId::BOOL), &TypeData::Bool);
        assert_eq!(interner.resolve(TypeId::CHAR), &TypeData::Char);
        assert_eq!(interner.resolve(TypeId::CHARS), &TypeData::Chars);
        assert_eq!(interner.resolve(TypeId::STRING), &TypeData::Str);
        assert_eq!(
            interner.resolve(TypeId::I32),
            &TypeData::Integer {
                bits: 32,
                signed: true
            }
        );
        assert_eq!(interner.resolve(TypeId::F32), &TypeData::Float { bits: 32 });
    }

    #[test]
    fn structurally_equal_types_dedup() {
        let mut interner = TypeInterner::new();
        let a = interner.intern(TypeData::Integer {
            bits: 64,
            signed: false,
        });
        let b = interner.intern(TypeData::Integer {
            bits: 64,
            signed: false,
        });
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_shapes_get_distinct_ids() {
        let mut interner = TypeInterner::new();
        let a = interner.intern(TypeData::Integer {
            bits: 64,
            signed: false,
        });
        let b = interner.intern(TypeData::Integer {
            bits: 64,
            signed: true,
        });
        assert_ne!(a, b);
    }
}
