//! AST substitution engine.
//!
//! Generic instantiation works by cloning the declaration's unsubstituted
//! syntax tree and swapping every reference to a generic parameter for the
//! caller's actual type/const argument, then type-checking the clone as if
//! it had been written out by hand. This module is the cloning visitor that
//! does the swap; it never looks at `chk_types::TypeId` — everything here
//! operates on syntax, before name/type resolution runs over the clone.

use chk_ir::{
    ArraySize as SynArraySize, Ast, CallArg, Decl, DeclId, DeclKind, Expr, ExprId, ExprKind,
    FieldInit, FunctionDecl, MatchArm, Name, Pattern, PatternId, PatternKind, TypeArg, TypeExpr,
    TypeExprId, TypeExprKind,
};
use rustc_hash::FxHashMap;

/// Maps a generic declaration's parameter names to the caller's actual
/// arguments, each already-parsed AST fragments living in the same [`Ast`].
#[derive(Default)]
pub struct TypeSubst {
    pub types: FxHashMap<Name, TypeExprId>,
    pub consts: FxHashMap<Name, ExprId>,
}

pub fn clone_type_expr(ast: &mut Ast, subst: &TypeSubst, id: TypeExprId) -> TypeExprId {
    let node: TypeExpr = ast.types[id].clone();
    match node.kind {
        TypeExprKind::Named { path, args } => {
            if let [single] = path.as_slice() {
                if let Some(&replacement) = subst.types.get(single) {
                    return replacement;
                }
            }
            let new_args = args
                .into_iter()
                .map(|arg| clone_type_arg(ast, subst, arg))
                .collect();
            ast.alloc_type(TypeExpr {
                kind: TypeExprKind::Named { path, args: new_args },
                span: node.span,
            })
        }
        TypeExprKind::Pointer { mutable, inner } => {
            let inner = clone_type_expr(ast, subst, inner);
            ast.alloc_type(TypeExpr {
                kind: TypeExprKind::Pointer { mutable, inner },
                span: node.span,
            })
        }
        TypeExprKind::Array { element, size } => {
            let element = clone_type_expr(ast, subst, element);
            let size = match size {
                SynArraySize::Literal(n) => SynArraySize::Literal(n),
                SynArraySize::Expr(e) => SynArraySize::Expr(clone_expr(ast, subst, e)),
            };
            ast.alloc_type(TypeExpr {
                kind: TypeExprKind::Array { element, size },
                span: node.span,
            })
        }
        TypeExprKind::Slice(inner) => {
            let inner = clone_type_expr(ast, subst, inner);
            ast.alloc_type(TypeExpr {
                kind: TypeExprKind::Slice(inner),
                span: node.span,
            })
        }
        TypeExprKind::Tuple(items) => {
            let items = items.into_iter().map(|t| clone_type_expr(ast, subst, t)).collect();
            ast.alloc_type(TypeExpr {
                kind: TypeExprKind::Tuple(items),
                span: node.span,
            })
        }
        TypeExprKind::Function { params, ret } => {
            let params = params.into_iter().map(|p| clone_type_expr(ast, subst, p)).collect();
            let ret = clone_type_expr(ast, subst, ret);
            ast.alloc_type(TypeExpr {
                kind: TypeExprKind::Function { params, ret },
                span: node.span,
            })
        }
        // `Self` never refers to a generic parameter; nothing to substitute.
        TypeExprKind::SelfType => id,
    }
}

fn clone_type_arg(ast: &mut Ast, subst: &TypeSubst, arg: TypeArg) -> TypeArg {
    match arg {
        TypeArg::Type(ty) => TypeArg::Type(clone_type_expr(ast, subst, ty)),
        TypeArg::Const(expr) => TypeArg::Const(clone_expr(ast, subst, expr)),
    }
}

pub fn clone_expr(ast: &mut Ast, subst: &TypeSubst, id: ExprId) -> ExprId {
    let node: Expr = ast.exprs[id].clone();
    let kind = match node.kind {
        ExprKind::Identifier(name) => {
            if let Some(&replacement) = subst.consts.get(&name) {
                return replacement;
            }
            ExprKind::Identifier(name)
        }
        ExprKind::IntLiteral { .. }
        | ExprKind::RealLiteral { .. }
        | ExprKind::BoolLiteral(_)
        | ExprKind::CharLiteral(_)
        | ExprKind::StringLiteral { .. }
        | ExprKind::Path(_)
        | ExprKind::Continue => node.kind,
        ExprKind::Member { base, name } => ExprKind::Member {
            base: clone_expr(ast, subst, base),
            name,
        },
        ExprKind::Index { base, index } => ExprKind::Index {
            base: clone_expr(ast, subst, base),
            index: clone_expr(ast, subst, index),
        },
        ExprKind::Unary { op, operand } => ExprKind::Unary {
            op,
            operand: clone_expr(ast, subst, operand),
        },
        ExprKind::Binary { op, lhs, rhs } => ExprKind::Binary {
            op,
            lhs: clone_expr(ast, subst, lhs),
            rhs: clone_expr(ast, subst, rhs),
        },
        ExprKind::Assign { target, value } => ExprKind::Assign {
            target: clone_expr(ast, subst, target),
            value: clone_expr(ast, subst, value),
        },
        ExprKind::PrefixIncDec { op, operand } => ExprKind::PrefixIncDec {
            op,
            operand: clone_expr(ast, subst, operand),
        },
        ExprKind::PostfixIncDec { op, operand } => ExprKind::PostfixIncDec {
            op,
            operand: clone_expr(ast, subst, operand),
        },
        ExprKind::AddressOf { mutable, operand } => ExprKind::AddressOf {
            mutable,
            operand: clone_expr(ast, subst, operand),
        },
        ExprKind::Deref { operand } => ExprKind::Deref {
            operand: clone_expr(ast, subst, operand),
        },
        ExprKind::As { operand, ty } => ExprKind::As {
            operand: clone_expr(ast, subst, operand),
            ty: clone_type_expr(ast, subst, ty),
        },
        ExprKind::Call {
            callee,
            generic_args,
            args,
        } => ExprKind::Call {
            callee: clone_expr(ast, subst, callee),
            generic_args: generic_args
                .into_iter()
                .map(|t| clone_type_expr(ast, subst, t))
                .collect(),
            args: args
                .into_iter()
                .map(|a| CallArg {
                    name: a.name,
                    value: clone_expr(ast, subst, a.value),
                })
                .collect(),
        },
        ExprKind::RecordLiteral { ty, fields } => ExprKind::RecordLiteral {
            ty: ty.map(|t| clone_type_expr(ast, subst, t)),
            fields: fields
                .into_iter()
                .map(|f| FieldInit {
                    name: f.name,
                    value: clone_expr(ast, subst, f.value),
                })
                .collect(),
        },
        ExprKind::TupleLiteral(items) => {
            ExprKind::TupleLiteral(items.into_iter().map(|e| clone_expr(ast, subst, e)).collect())
        }
        ExprKind::ArrayLiteral(items) => {
            ExprKind::ArrayLiteral(items.into_iter().map(|e| clone_expr(ast, subst, e)).collect())
        }
        ExprKind::Range { lo, hi, open } => ExprKind::Range {
            lo: lo.map(|e| clone_expr(ast, subst, e)),
            hi: hi.map(|e| clone_expr(ast, subst, e)),
            open,
        },
        ExprKind::When {
            subject,
            arms,
            else_branch,
        } => ExprKind::When {
            subject: match subject {
                chk_ir::WhenSubject::Value(e) => chk_ir::WhenSubject::Value(clone_expr(ast, subst, e)),
                chk_ir::WhenSubject::Cast { expr, ty } => chk_ir::WhenSubject::Cast {
                    expr: clone_expr(ast, subst, expr),
                    ty: clone_type_expr(ast, subst, ty),
                },
            },
            arms: arms
                .into_iter()
                .map(|arm| MatchArm {
                    pattern: clone_pattern(ast, subst, arm.pattern),
                    guard: arm.guard.map(|g| clone_expr(ast, subst, g)),
                    body: clone_expr(ast, subst, arm.body),
                })
                .collect(),
            else_branch: else_branch.map(|e| clone_expr(ast, subst, e)),
        },
        ExprKind::For {
            kind,
            pattern,
            iterable,
            cond,
            body,
        } => ExprKind::For {
            kind,
            pattern: pattern.map(|p| clone_pattern(ast, subst, p)),
            iterable: iterable.map(|e| clone_expr(ast, subst, e)),
            cond: cond.map(|e| clone_expr(ast, subst, e)),
            body: clone_expr(ast, subst, body),
        },
        ExprKind::Break(e) => ExprKind::Break(e.map(|e| clone_expr(ast, subst, e))),
        ExprKind::Return(e) => ExprKind::Return(e.map(|e| clone_expr(ast, subst, e))),
        ExprKind::FunctionLiteral {
            params,
            return_ty,
            body,
        } => ExprKind::FunctionLiteral {
            params,
            return_ty: return_ty.map(|t| clone_type_expr(ast, subst, t)),
            body: clone_expr(ast, subst, body),
        },
        ExprKind::Block(stmts) => {
            let cloned = stmts
                .into_iter()
                .map(|stmt_id| {
                    let stmt = ast.stmts[stmt_id].clone();
                    let kind = match stmt.kind {
                        chk_ir::StmtKind::Expr(e) => chk_ir::StmtKind::Expr(clone_expr(ast, subst, e)),
                        chk_ir::StmtKind::Decl(d) => chk_ir::StmtKind::Decl(d),
                    };
                    ast.alloc_stmt(chk_ir::Stmt {
                        kind,
                        span: stmt.span,
                    })
                })
                .collect();
            ExprKind::Block(cloned)
        }
    };
    ast.alloc_expr(Expr {
        kind,
        span: node.span,
    })
}

pub fn clone_pattern(ast: &mut Ast, subst: &TypeSubst, id: PatternId) -> PatternId {
    let node: Pattern = ast.patterns[id].clone();
    let kind = match node.kind {
        PatternKind::Wildcard | PatternKind::Rest | PatternKind::Identifier(_) => node.kind,
        PatternKind::Literal(e) => PatternKind::Literal(clone_expr(ast, subst, e)),
        PatternKind::Binding { name, sub } => PatternKind::Binding {
            name,
            sub: clone_pattern(ast, subst, sub),
        },
        PatternKind::Tuple(items) => {
            PatternKind::Tuple(items.into_iter().map(|p| clone_pattern(ast, subst, p)).collect())
        }
        PatternKind::Record { ty, fields } => PatternKind::Record {
            ty: ty.map(|t| clone_type_expr(ast, subst, t)),
            fields: fields
                .into_iter()
                .map(|(name, p)| (name, clone_pattern(ast, subst, p)))
                .collect(),
        },
        PatternKind::Range { lo, hi, open } => PatternKind::Range {
            lo: lo.map(|e| clone_expr(ast, subst, e)),
            hi: hi.map(|e| clone_expr(ast, subst, e)),
            open,
        },
        PatternKind::Or(items) => {
            PatternKind::Or(items.into_iter().map(|p| clone_pattern(ast, subst, p)).collect())
        }
        PatternKind::Variant { path, inner } => PatternKind::Variant {
            path,
            inner: inner.map(|p| clone_pattern(ast, subst, p)),
        },
    };
    ast.alloc_pattern(Pattern {
        kind,
        span: node.span,
    })
}

/// Clones a member declaration (a field, a function, a property, a const)
/// for a generic instantiation — `List!(T)`'s `push` becomes a fresh
/// `Decl` with `T` replaced by the caller's argument throughout its
/// signature and body. The clone keeps the original's name, span, and
/// visibility; its `DeclId` is distinct from the generic original.
pub fn clone_decl(ast: &mut Ast, subst: &TypeSubst, id: DeclId) -> DeclId {
    let node: Decl = ast.decls[id].clone();
    let kind = match node.kind {
        DeclKind::Field { ty } => DeclKind::Field {
            ty: clone_type_expr(ast, subst, ty),
        },
        DeclKind::TupleField { ty, index } => DeclKind::TupleField {
            ty: clone_type_expr(ast, subst, ty),
            index,
        },
        DeclKind::Parameter { ty, variadic, default } => DeclKind::Parameter {
            ty: ty.map(|t| clone_type_expr(ast, subst, t)),
            variadic,
            default: default.map(|e| clone_expr(ast, subst, e)),
        },
        DeclKind::Const { ty, init } => DeclKind::Const {
            ty: ty.map(|t| clone_type_expr(ast, subst, t)),
            init: clone_expr(ast, subst, init),
        },
        DeclKind::Var { ty, init, mutable } => DeclKind::Var {
            ty: ty.map(|t| clone_type_expr(ast, subst, t)),
            init: init.map(|e| clone_expr(ast, subst, e)),
            mutable,
        },
        DeclKind::Function(func) => DeclKind::Function(clone_function(ast, subst, func)),
        DeclKind::Property(func) => DeclKind::Property(clone_function(ast, subst, func)),
        // Every other declaration kind is either not a legal generic member
        // (workspaces, uses, nested type declarations of its own) or is
        // cloned by its own dedicated path (`GenericClause`/parameters are
        // cloned as part of cloning the function that owns them).
        other => other,
    };
    ast.alloc_decl(Decl {
        kind,
        name: node.name,
        span: node.span,
        hidden: node.hidden,
    })
}

fn clone_function(ast: &mut Ast, subst: &TypeSubst, func: FunctionDecl) -> FunctionDecl {
    FunctionDecl {
        // A member's own generic clause (if any) is orthogonal to the
        // substitution applied for the enclosing type's instantiation; it
        // is preserved as-is and instantiated separately if ever called
        // with explicit arguments.
        generics: func.generics,
        params: func
            .params
            .into_iter()
            .map(|p| clone_decl(ast, subst, p))
            .collect(),
        return_ty: func.return_ty.map(|t| clone_type_expr(ast, subst, t)),
        body: func.body.map(|b| clone_expr(ast, subst, b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chk_ir::Span;

    #[test]
    fn substitutes_a_named_type_reference() {
        let mut ast = Ast::new();
        let param_name = Name::from_raw(1);
        let concrete_name = Name::from_raw(2);

        let param_ref = ast.alloc_type(TypeExpr {
            kind: TypeExprKind::Named {
                path: vec![param_name],
                args: Vec::new(),
            },
            span: Span::DUMMY,
        });
        let concrete = ast.alloc_type(TypeExpr {
            kind: TypeExprKind::Named {
                path: vec![concrete_name],
                args: Vec::new(),
            },
            span: Span::DUMMY,
        });

        let mut subst = TypeSubst::default();
        subst.types.insert(param_name, concrete);

        let result = clone_type_expr(&mut ast, &subst, param_ref);
        assert_eq!(result, concrete);
    }

    #[test]
    fn substitutes_through_a_pointer() {
        let mut ast = Ast::new();
        let param_name = Name::from_raw(1);
        let concrete_name = Name::from_raw(2);

        let param_ref = ast.alloc_type(TypeExpr {
            kind: TypeExprKind::Named {
                path: vec![param_name],
                args: Vec::new(),
            },
            span: Span::DUMMY,
        });
        let pointer = ast.alloc_type(TypeExpr {
            kind: TypeExprKind::Pointer {
                mutable: false,
                inner: param_ref,
            },
            span: Span::DUMMY,
        });
        let concrete = ast.alloc_type(TypeExpr {
            kind: TypeExprKind::Named {
                path: vec![concrete_name],
                args: Vec::new(),
            },
            span: Span::DUMMY,
        });

        let mut subst = TypeSubst::default();
        subst.types.insert(param_name, concrete);

        let result = clone_type_expr(&mut ast, &subst, pointer);
        match &ast.types[result].kind {
            TypeExprKind::Pointer { inner, .. } => assert_eq!(*inner, concrete),
            other => panic!("expected pointer, got {other:?}"),
        }
    }

    #[test]
    fn unrelated_named_type_is_untouched() {
        let mut ast = Ast::new();
        let unrelated_name = Name::from_raw(9);
        let ty = ast.alloc_type(TypeExpr {
            kind: TypeExprKind::Named {
                path: vec![unrelated_name],
                args: Vec::new(),
            },
            span: Span::DUMMY,
        });
        let subst = TypeSubst::default();
        let result = clone_type_expr(&mut ast, &subst, ty);
        assert_ne!(result, ty);
        match &ast.types[result].kind {
            TypeExprKind::Named { path, .. } => assert_eq!(path, &vec![unrelated_name]),
            other => panic!("expected named type, got {other:?}"),
        }
    }

    #[test]
    fn clone_decl_substitutes_a_fields_type() {
        let mut ast = Ast::new();
        let param_name = Name::from_raw(1);
        let concrete_name = Name::from_raw(2);
        let field_name = Name::from_raw(3);

        let param_ref = ast.alloc_type(TypeExpr {
            kind: TypeExprKind::Named { path: vec![param_name], args: Vec::new() },
            span: Span::DUMMY,
        });
        let field = ast.alloc_decl(Decl {
            kind: DeclKind::Field { ty: param_ref },
            name: field_name,
            span: Span::DUMMY,
            hidden: false,
        });
        let concrete = ast.alloc_type(TypeExpr {
            kind: TypeExprKind::Named { path: vec![concrete_name], args: Vec::new() },
            span: Span::DUMMY,
        });

        let mut subst = TypeSubst::default();
        subst.types.insert(param_name, concrete);

        let cloned = clone_decl(&mut ast, &subst, field);
        assert_ne!(cloned, field);
        match &ast.decls[cloned].kind {
            DeclKind::Field { ty } => assert_eq!(*ty, concrete),
            other => panic!("expected field, got {other:?}"),
        }
    }
}
