//! The type matcher: deduces generic parameter bindings from argument types
//! at a call site.
//!
//! Walks a parameter type and an argument type in lockstep. Wherever the
//! parameter type mentions a `GenericParam`, the corresponding piece of the
//! argument type is bound to it; everywhere else the two types must agree
//! structurally (exactly, not by widening — arithmetic widening is a
//! separate, explicit conversion step applied after deduction succeeds).

use chk_ir::DeclId;
use chk_types::{ArraySize, Substitution, TypeArgValue, TypeData, TypeInterner};
use rustc_hash::FxHashMap;

/// One parameter/argument pair that didn't unify, for the arity-mismatch or
/// unbound-generic-parameter diagnostic to point at.
#[derive(Debug)]
pub struct DeductionFailure {
    pub expected: chk_types::TypeId,
    pub found: chk_types::TypeId,
}

/// Attempts to deduce bindings for every generic parameter mentioned in
/// `param_tys`, given the caller's actual `arg_tys`. Returns the bindings on
/// success. Every generic parameter that appears in at least one parameter
/// position must end up bound — callers check that against the full
/// parameter list.
pub fn deduce_generics(
    interner: &TypeInterner,
    param_tys: &[chk_types::TypeId],
    arg_tys: &[chk_types::TypeId],
) -> Result<Substitution, DeductionFailure> {
    let mut bindings: FxHashMap<DeclId, TypeArgValue> = FxHashMap::default();
    for (&param_ty, &arg_ty) in param_tys.iter().zip(arg_tys) {
        unify_one(interner, param_ty, arg_ty, &mut bindings)?;
    }
    let mut subst = Substitution::new();
    for (decl, value) in bindings {
        subst.bind(decl, value);
    }
    Ok(subst)
}

fn unify_one(
    interner: &TypeInterner,
    param_ty: chk_types::TypeId,
    arg_ty: chk_types::TypeId,
    bindings: &mut FxHashMap<DeclId, TypeArgValue>,
) -> Result<(), DeductionFailure> {
    let param_data = interner.resolve(param_ty);

    if let TypeData::GenericParam(decl) = param_data {
        match bindings.get(decl) {
            Some(TypeArgValue::Type(bound)) if *bound != arg_ty => {
                return Err(DeductionFailure {
                    expected: *bound,
                    found: arg_ty,
                })
            }
            _ => {
                bindings.insert(*decl, TypeArgValue::Type(arg_ty));
                return Ok(());
            }
        }
    }

    let arg_data = interner.resolve(arg_ty);
    match (param_data, arg_data) {
        (
            TypeData::Pointer {
                inner: param_inner,
                mutable: param_mut,
            },
            TypeData::Pointer {
                inner: arg_inner,
                mutable: arg_mut,
            },
        ) if param_mut == arg_mut || !*param_mut => {
            unify_one(interner, *param_inner, *arg_inner, bindings)
        }
        (TypeData::Slice { element: param_elem }, TypeData::Slice { element: arg_elem })
        | (TypeData::Slice { element: param_elem }, TypeData::Array { element: arg_elem, .. }) => {
            unify_one(interner, *param_elem, *arg_elem, bindings)
        }
        (
            TypeData::Array {
                element: param_elem,
                size: param_size,
            },
            TypeData::Array {
                element: arg_elem,
                size: arg_size,
            },
        ) => {
            if let (ArraySize::Literal(p), ArraySize::Literal(a)) = (param_size, arg_size) {
                if p != a {
                    return Err(DeductionFailure {
                        expected: param_ty,
                        found: arg_ty,
                    });
                }
            }
            unify_one(interner, *param_elem, *arg_elem, bindings)
        }
        (TypeData::Tuple(param_elems), TypeData::Tuple(arg_elems))
            if param_elems.len() == arg_elems.len() =>
        {
            for (&p, &a) in param_elems.iter().zip(arg_elems.iter()) {
                unify_one(interner, p, a, bindings)?;
            }
            Ok(())
        }
        (
            TypeData::Named {
                decl: param_decl,
                args: param_args,
            },
            TypeData::Named {
                decl: arg_decl,
                args: arg_args,
            },
        ) if param_decl == arg_decl && param_args.len() == arg_args.len() => {
            for (p, a) in param_args.iter().zip(arg_args.iter()) {
                if let (TypeArgValue::Type(p), TypeArgValue::Type(a)) = (p, a) {
                    unify_one(interner, *p, *a, bindings)?;
                }
            }
            Ok(())
        }
        _ if param_ty == arg_ty => Ok(()),
        _ => Err(DeductionFailure {
            expected: param_ty,
            found: arg_ty,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chk_types::{TypeArgValue, TypeId};

    #[test]
    fn deduces_a_direct_generic_parameter() {
        let mut interner = TypeInterner::new();
        let param_decl = DeclId::from_raw(1);
        let generic_param = interner.intern(TypeData::GenericParam(param_decl));

        let subst = deduce_generics(&interner, &[generic_param], &[TypeId::I32]).unwrap();
        assert_eq!(subst.get(param_decl), Some(TypeArgValue::Type(TypeId::I32)));
    }

    #[test]
    fn deduces_through_a_slice() {
        let mut interner = TypeInterner::new();
        let param_decl = DeclId::from_raw(1);
        let generic_param = interner.intern(TypeData::GenericParam(param_decl));
        let param_slice = interner.intern(TypeData::Slice { element: generic_param });
        let arg_slice = interner.intern(TypeData::Slice { element: TypeId::BOOL });

        let subst = deduce_generics(&interner, &[param_slice], &[arg_slice]).unwrap();
        assert_eq!(subst.get(param_decl), Some(TypeArgValue::Type(TypeId::BOOL)));
    }

    #[test]
    fn consistent_repeated_parameter_deduces_once() {
        let mut interner = TypeInterner::new();
        let param_decl = DeclId::from_raw(1);
        let generic_param = interner.intern(TypeData::GenericParam(param_decl));

        let subst = deduce_generics(
            &interner,
            &[generic_param, generic_param],
            &[TypeId::I32, TypeId::I32],
        )
        .unwrap();
        assert_eq!(subst.get(param_decl), Some(TypeArgValue::Type(TypeId::I32)));
    }

    #[test]
    fn inconsistent_repeated_parameter_fails() {
        let mut interner = TypeInterner::new();
        let param_decl = DeclId::from_raw(1);
        let generic_param = interner.intern(TypeData::GenericParam(param_decl));

        let result = deduce_generics(
            &interner,
            &[generic_param, generic_param],
            &[TypeId::I32, TypeId::BOOL],
        );
        assert!(result.is_err());
    }

    #[test]
    fn mismatched_shapes_fail() {
        let interner = TypeInterner::new();
        let result = deduce_generics(&interner, &[TypeId::I32], &[TypeId::BOOL]);
        assert!(result.is_err());
    }
}
