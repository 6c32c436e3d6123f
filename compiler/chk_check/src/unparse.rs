//! Converts an already-resolved [`TypeId`]/[`ConstValue`] back into syntax.
//!
//! The substitution engine (`crate::subst_ast`) operates on parsed syntax,
//! not on interned types — it swaps one `TypeExprId`/`ExprId` for another.
//! A generic instantiation triggered by *inferred* arguments (a call site's
//! deduced parameter types, rather than an explicit `List!(i32)` the parser
//! already gave us as syntax) needs those inferred `TypeId`s turned back
//! into synthetic syntax before they can be spliced through that engine.
//! The synthesized nodes carry [`Span::DUMMY`] and are never shown to a
//! user directly; they only ever get re-resolved by the checker itself.

use chk_ir::{
    ArraySize as SynArraySize, Ast, DeclId, Expr, ExprKind, IntSuffix, NameInterner, RealSuffix,
    Span, TypeArg, TypeExpr, TypeExprId, TypeExprKind,
};
use chk_types::{ArraySize, ConstValue, TypeArgValue, TypeData, TypeId, TypeInterner};

fn named(names: &mut NameInterner, text: &str) -> TypeExprKind {
    TypeExprKind::Named {
        path: vec![names.intern(text)],
        args: Vec::new(),
    }
}

fn integer_name(bits: u16, signed: bool) -> &'static str {
    match (bits, signed) {
        (8, true) => "i8",
        (16, true) => "i16",
        (32, true) => "i32",
        (64, true) => "i64",
        (128, true) => "i128",
        (8, false) => "u8",
        (16, false) => "u16",
        (32, false) => "u32",
        (64, false) => "u64",
        (128, false) => "u128",
        _ => "i32",
    }
}

fn float_name(bits: u16) -> &'static str {
    match bits {
        64 => "f64",
        128 => "f128",
        256 => "f256",
        _ => "f32",
    }
}

/// Synthesizes a `TypeExprId` denoting exactly `ty`, for splicing into a
/// cloned generic declaration as a substitution target. Declaration names
/// are resolved fresh at the instantiation site (itself inside the same
/// workspace the generic declaration lives in), so a `Named` type only
/// needs to carry the declaration's own name, not a full qualified path.
pub fn type_to_expr(
    ast: &mut Ast,
    names: &mut NameInterner,
    types: &TypeInterner,
    ty: TypeId,
) -> TypeExprId {
    let kind = match types.resolve(ty).clone() {
        TypeData::Unknown => named(names, "unknown"),
        TypeData::Bool => named(names, "bool"),
        TypeData::Char => named(names, "char"),
        TypeData::Chars => named(names, "chars"),
        TypeData::Str => named(names, "string"),
        TypeData::Integer { bits, signed } => named(names, integer_name(bits, signed)),
        TypeData::Float { bits } => named(names, float_name(bits)),
        TypeData::Rational { .. } | TypeData::Complex { .. } | TypeData::Bitfield { .. } => {
            named(names, "unknown")
        }
        TypeData::Pointer { inner, mutable } => {
            let inner = type_to_expr(ast, names, types, inner);
            TypeExprKind::Pointer { mutable, inner }
        }
        TypeData::Slice { element } => {
            let element = type_to_expr(ast, names, types, element);
            TypeExprKind::Slice(element)
        }
        TypeData::Array { element, size } => {
            let element = type_to_expr(ast, names, types, element);
            let size = match size {
                ArraySize::Literal(n) => SynArraySize::Literal(n),
                // A still-parametric size has no concrete literal syntax;
                // this only arises mid-instantiation of a doubly-generic
                // array bound, which the const-argument substitution below
                // resolves before this function is ever asked to unparse it.
                ArraySize::Parametric(_) => SynArraySize::Literal(0),
            };
            TypeExprKind::Array { element, size }
        }
        TypeData::Tuple(elements) => {
            let elements = elements
                .iter()
                .map(|&e| type_to_expr(ast, names, types, e))
                .collect();
            TypeExprKind::Tuple(elements)
        }
        TypeData::Function { params, ret } => {
            let params = params
                .iter()
                .map(|&p| type_to_expr(ast, names, types, p))
                .collect();
            let ret = type_to_expr(ast, names, types, ret);
            TypeExprKind::Function { params, ret }
        }
        TypeData::Range { element, .. } => {
            // Structural range values have no standalone type syntax; the
            // element type is the closest approximation available to a
            // substitution site.
            return type_to_expr(ast, names, types, element);
        }
        TypeData::Workspace(_) | TypeData::GenericParam(_) => named(names, "unknown"),
        TypeData::Named { decl, args } => {
            let path = vec![decl_name(ast, decl)];
            let args = args
                .iter()
                .map(|arg| type_arg_to_syntax(ast, names, types, *arg))
                .collect();
            TypeExprKind::Named { path, args }
        }
    };
    ast.alloc_type(TypeExpr { kind, span: Span::DUMMY })
}

fn type_arg_to_syntax(
    ast: &mut Ast,
    names: &mut NameInterner,
    types: &TypeInterner,
    arg: TypeArgValue,
) -> TypeArg {
    match arg {
        TypeArgValue::Type(ty) => TypeArg::Type(type_to_expr(ast, names, types, ty)),
        TypeArgValue::Const(value) => TypeArg::Const(const_to_expr(ast, value)),
    }
}

fn decl_name(ast: &Ast, decl: DeclId) -> chk_ir::Name {
    ast.decls[decl].name
}

/// Synthesizes an `ExprId` denoting exactly `value`, for a generic-const
/// argument (`List!(3)`'s `3`) unparsed back from an already-evaluated
/// constant.
pub fn const_to_expr(ast: &mut Ast, value: ConstValue) -> chk_ir::ExprId {
    let kind = match value {
        ConstValue::Int(v) => ExprKind::IntLiteral {
            value: v.unsigned_abs(),
            suffix: IntSuffix::None,
        },
        ConstValue::Bool(v) => ExprKind::BoolLiteral(v),
        ConstValue::Char(v) => ExprKind::CharLiteral(v),
        ConstValue::FloatBits(bits) => ExprKind::RealLiteral {
            bits,
            suffix: RealSuffix::None,
        },
        ConstValue::Str(name) => ExprKind::StringLiteral {
            value: name,
            is_string: true,
        },
    };
    ast.alloc_expr(Expr { kind, span: Span::DUMMY })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparses_a_primitive_type() {
        let mut ast = Ast::new();
        let mut names = NameInterner::new();
        let types = TypeInterner::new();
        let id = type_to_expr(&mut ast, &mut names, &types, TypeId::I32);
        match &ast.types[id].kind {
            TypeExprKind::Named { path, .. } => assert_eq!(names.resolve(path[0]), "i32"),
            other => panic!("expected named type, got {other:?}"),
        }
    }

    #[test]
    fn unparses_a_pointer_type() {
        let mut ast = Ast::new();
        let mut names = NameInterner::new();
        let mut types = TypeInterner::new();
        let ptr = types.intern(TypeData::Pointer { inner: TypeId::BOOL, mutable: true });
        let id = type_to_expr(&mut ast, &mut names, &types, ptr);
        match &ast.types[id].kind {
            TypeExprKind::Pointer { mutable, inner } => {
                assert!(*mutable);
                match &ast.types[*inner].kind {
                    TypeExprKind::Named { path, .. } => assert_eq!(names.resolve(path[0]), "bool"),
                    other => panic!("expected named type, got {other:?}"),
                }
            }
            other => panic!("expected pointer, got {other:?}"),
        }
    }

    #[test]
    fn unparses_an_int_constant() {
        let mut ast = Ast::new();
        let id = const_to_expr(&mut ast, ConstValue::Int(3));
        match &ast.exprs[id].kind {
            ExprKind::IntLiteral { value, .. } => assert_eq!(*value, 3),
            other => panic!("expected int literal, got {other:?}"),
        }
    }
}
