//! Substitution of generic parameters with concrete [`TypeArgValue`]s.
//!
//! The checker never type-checks a generic declaration's own body; it clones
//! the declaration's AST, substitutes parameters, then checks the clone.
//! This module carries the *type*-level half of that
//! substitution: mapping a [`TypeId`] that may mention `GenericParam(decl)`
//! into the concrete `TypeId` bound to that parameter for one instantiation.

use chk_ir::DeclId;
use rustc_hash::FxHashMap;

use crate::data::{ArraySize, TypeArgValue, TypeData};
use crate::interner::TypeInterner;
use crate::type_id::TypeId;

/// Binds each generic parameter declaration in scope for one instantiation to
/// the argument it was called with.
#[derive(Clone, Debug, Default)]
pub struct Substitution {
    bindings: FxHashMap<DeclId, TypeArgValue>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, param: DeclId, value: TypeArgValue) {
        self.bindings.insert(param, value);
    }

    pub fn get(&self, param: DeclId) -> Option<TypeArgValue> {
        self.bindings.get(&param).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Replaces every `GenericParam` reachable from `ty` with its bound
    /// argument, interning any newly-built composite types along the way.
    /// Parameters with no binding (out of scope for this substitution) are
    /// left untouched, so repeated partial substitutions compose.
    pub fn apply(&self, interner: &mut TypeInterner, ty: TypeId) -> TypeId {
        if self.bindings.is_empty() {
            return ty;
        }
        let data = interner.resolve(ty).clone();
        match data {
            TypeData::GenericParam(decl) => match self.get(decl) {
                Some(TypeArgValue::Type(substituted)) => substituted,
                _ => ty,
            },
            TypeData::Pointer { inner, mutable } => {
                let inner = self.apply(interner, inner);
                interner.intern(TypeData::Pointer { inner, mutable })
            }
            TypeData::Array { element, size } => {
                let element = self.apply(interner, element);
                let size = match size {
                    ArraySize::Parametric(decl) => match self.get(decl) {
                        Some(TypeArgValue::Const(value)) => {
                            ArraySize::Literal(value.as_int().unwrap_or_default() as u64)
                        }
                        _ => size,
                    },
                    ArraySize::Literal(_) => size,
                };
                interner.intern(TypeData::Array { element, size })
            }
            TypeData::Slice { element } => {
                let element = self.apply(interner, element);
                interner.intern(TypeData::Slice { element })
            }
            TypeData::Tuple(elements) => {
                let substituted: Box<[TypeId]> = elements
                    .iter()
                    .map(|&elem| self.apply(interner, elem))
                    .collect();
                interner.intern(TypeData::Tuple(substituted))
            }
            TypeData::Function { params, ret } => {
                let params: Box<[TypeId]> = params
                    .iter()
                    .map(|&param| self.apply(interner, param))
                    .collect();
                let ret = self.apply(interner, ret);
                interner.intern(TypeData::Function { params, ret })
            }
            TypeData::Range { element, open } => {
                let element = self.apply(interner, element);
                interner.intern(TypeData::Range { element, open })
            }
            TypeData::Named { decl, args } => {
                let args: Box<[TypeArgValue]> = args
                    .iter()
                    .map(|&arg| match arg {
                        TypeArgValue::Type(arg_ty) => {
                            TypeArgValue::Type(self.apply(interner, arg_ty))
                        }
                        TypeArgValue::Const(_) => arg,
                    })
                    .collect();
                interner.intern(TypeData::Named { decl, args })
            }
            // Primitive/leaf kinds carry no nested `TypeId`s.
            TypeData::Unknown
            | TypeData::Bool
            | TypeData::Integer { .. }
            | TypeData::Rational { .. }
            | TypeData::Float { .. }
            | TypeData::Complex { .. }
            | TypeData::Char
            | TypeData::Chars
            | TypeData::Str
            | TypeData::Bitfield { .. }
            | TypeData::Workspace(_) => ty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_bound_generic_param() {
        let mut interner = TypeInterner::new();
        let param_decl = DeclId::from_raw(1);
        let param_ty = interner.intern(TypeData::GenericParam(param_decl));

        let mut subst = Substitution::new();
        subst.bind(param_decl, TypeArgValue::Type(TypeId::I32));

        assert_eq!(subst.apply(&mut interner, param_ty), TypeId::I32);
    }

    #[test]
    fn substitutes_through_pointer() {
        let mut interner = TypeInterner::new();
        let param_decl = DeclId::from_raw(1);
        let param_ty = interner.intern(TypeData::GenericParam(param_decl));
        let ptr_ty = interner.intern(TypeData::Pointer {
            inner: param_ty,
            mutable: false,
        });

        let mut subst = Substitution::new();
        subst.bind(param_decl, TypeArgValue::Type(TypeId::BOOL));

        let result = subst.apply(&mut interner, ptr_ty);
        assert_eq!(
            interner.resolve(result),
            &TypeData::Pointer {
                inner: TypeId::BOOL,
                mutable: false
            }
        );
    }

    #[test]
    fn unbound_param_is_left_as_is() {
        let mut interner = TypeInterner::new();
        let param_decl = DeclId::from_raw(9);
        let param_ty = interner.intern(TypeData::GenericParam(param_decl));

        let subst = Substitution::new();
        assert_eq!(subst.apply(&mut interner, param_ty), param_ty);
    }
}
