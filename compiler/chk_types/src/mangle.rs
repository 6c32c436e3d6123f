//! Canonical name mangling for generic instantiations.
//!
//! Each workspace caches instantiated declarations by a mangled key built
//! from the declaration and its substituted type arguments, so calling
//! `List!(i32).push` twice in the same workspace reuses one checked clone
//! instead of re-instantiating.

use std::fmt::Write as _;

use chk_ir::{DeclId, NameInterner};

use crate::const_value::ConstValue;
use crate::data::{ArraySize, TypeArgValue, TypeData};
use crate::interner::TypeInterner;
use crate::type_id::TypeId;

/// Builds the mangled key for instantiating `decl` with `args`. Stable across
/// calls given the same interners, which is all the cache needs — it is
/// never persisted across a `check()` invocation.
pub fn mangle(
    names: &NameInterner,
    types: &TypeInterner,
    decl: DeclId,
    args: &[TypeArgValue],
) -> String {
    let mut out = format!("#{}", decl.raw());
    if args.is_empty() {
        return out;
    }
    out.push('<');
    for (index, arg) in args.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        mangle_arg(names, types, *arg, &mut out);
    }
    out.push('>');
    out
}

fn mangle_arg(names: &NameInterner, types: &TypeInterner, arg: TypeArgValue, out: &mut String) {
    match arg {
        TypeArgValue::Type(ty) => mangle_type(names, types, ty, out),
        TypeArgValue::Const(value) => mangle_const(names, value, out),
    }
}

fn mangle_type(names: &NameInterner, types: &TypeInterner, ty: TypeId, out: &mut String) {
    match types.resolve(ty) {
        TypeData::Unknown => out.push('?'),
        TypeData::Bool => out.push_str("bool"),
        TypeData::Integer { bits, signed } => {
            let _ = write!(out, "{}{bits}", if *signed { "i" } else { "u" });
        }
        TypeData::Rational { bits } => {
            let _ = write!(out, "q{bits}");
        }
        TypeData::Float { bits } => {
            let _ = write!(out, "f{bits}");
        }
        TypeData::Complex { bits } => {
            let _ = write!(out, "c{bits}");
        }
        TypeData::Char => out.push_str("char"),
        TypeData::Chars => out.push_str("chars"),
        TypeData::Str => out.push_str("string"),
        TypeData::Bitfield { bits } => {
            let _ = write!(out, "bits{bits}");
        }
        TypeData::Pointer { inner, mutable } => {
            out.push_str(if *mutable { "*mut " } else { "*" });
            mangle_type(names, types, *inner, out);
        }
        TypeData::Array { element, size } => {
            out.push('[');
            mangle_type(names, types, *element, out);
            out.push(';');
            match size {
                ArraySize::Literal(n) => {
                    let _ = write!(out, "{n}");
                }
                ArraySize::Parametric(decl) => {
                    let _ = write!(out, "#{}", decl.raw());
                }
            }
            out.push(']');
        }
        TypeData::Slice { element } => {
            out.push('[');
            mangle_type(names, types, *element, out);
            out.push(']');
        }
        TypeData::Tuple(elements) => {
            out.push('(');
            for (index, &element) in elements.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                mangle_type(names, types, element, out);
            }
            out.push(')');
        }
        TypeData::Function { params, ret } => {
            out.push_str("fn(");
            for (index, &param) in params.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                mangle_type(names, types, param, out);
            }
            out.push_str(")->");
            mangle_type(names, types, *ret, out);
        }
        TypeData::Range { element, open } => {
            mangle_type(names, types, *element, out);
            out.push_str(if *open { "..<" } else { ".." });
        }
        TypeData::Workspace(name) => {
            out.push_str("workspace ");
            out.push_str(names.resolve(*name));
        }
        TypeData::Named { decl, args } => {
            let _ = write!(out, "#{}", decl.raw());
            if !args.is_empty() {
                out.push('<');
                for (index, &arg) in args.iter().enumerate() {
                    if index > 0 {
                        out.push(',');
                    }
                    mangle_arg(names, types, arg, out);
                }
                out.push('>');
            }
        }
        TypeData::GenericParam(decl) => {
            let _ = write!(out, "${}", decl.raw());
        }
    }
}

fn mangle_const(names: &NameInterner, value: ConstValue, out: &mut String) {
    match value {
        ConstValue::Int(v) => {
            let _ = write!(out, "{v}");
        }
        ConstValue::Bool(v) => out.push_str(if v { "true" } else { "false" }),
        ConstValue::Char(v) => {
            let _ = write!(out, "'{v}'");
        }
        ConstValue::FloatBits(bits) => {
            let _ = write!(out, "{}", f64::from_bits(bits));
        }
        ConstValue::Str(name) => {
            let _ = write!(out, "{:?}", names.resolve(name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mangles_simple_type_argument() {
        let names = NameInterner::new();
        let types = TypeInterner::new();
        let decl = DeclId::from_raw(3);
        let key = mangle(&names, &types, decl, &[TypeArgValue::Type(TypeId::I32)]);
        assert_eq!(key, "#3<i32>");
    }

    #[test]
    fn mangles_with_no_arguments() {
        let names = NameInterner::new();
        let types = TypeInterner::new();
        let decl = DeclId::from_raw(5);
        assert_eq!(mangle(&names, &types, decl, &[]), "#5");
    }

    #[test]
    fn mangles_const_argument() {
        let names = NameInterner::new();
        let types = TypeInterner::new();
        let decl = DeclId::from_raw(2);
        let key = mangle(
            &names,
            &types,
            decl,
            &[TypeArgValue::Const(ConstValue::Int(3))],
        );
        assert_eq!(key, "#2<3>");
    }
}
