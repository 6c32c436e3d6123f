//! Detects `type` declarations with no finite size: a record/variant/range/
//! alias that recurses into itself without crossing a pointer or slice
//! (both of which bound the reference to a fixed width regardless of what
//! they point to).
//!
//! Import-cycle detection (`crate::imports`) answers a different question
//! — whether workspace `use` clauses form a cycle — and uses the same
//! three-color DFS shape for an unrelated graph.

use chk_ir::{Ast, DeclId, DeclKind, Name, TypeArg, TypeDeclKind, TypeExprId, TypeExprKind};
use rustc_hash::FxHashMap;

#[derive(Copy, Clone, Eq, PartialEq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Collects every `Named` type reference reachable from `ty` without
/// crossing a `Pointer` or `Slice` — an array embeds its element inline, a
/// tuple embeds each of its elements, but a pointer or slice merely refers.
fn collect_unboxed_refs(ast: &Ast, ty: TypeExprId, out: &mut Vec<Name>) {
    match &ast.types[ty].kind {
        TypeExprKind::Named { path, args } => {
            if let Some(&last) = path.last() {
                out.push(last);
            }
            for arg in args {
                if let TypeArg::Type(t) = arg {
                    collect_unboxed_refs(ast, *t, out);
                }
            }
        }
        TypeExprKind::Array { element, .. } => collect_unboxed_refs(ast, *element, out),
        TypeExprKind::Tuple(items) => {
            for &item in items {
                collect_unboxed_refs(ast, item, out);
            }
        }
        TypeExprKind::Pointer { .. }
        | TypeExprKind::Slice(_)
        | TypeExprKind::Function { .. }
        | TypeExprKind::SelfType => {}
    }
}

fn body_refs(ast: &Ast, kind: &TypeDeclKind) -> Vec<Name> {
    let mut refs = Vec::new();
    match kind {
        TypeDeclKind::Record { fields } => {
            for &field in fields {
                match &ast.decls[field].kind {
                    DeclKind::Field { ty } | DeclKind::TupleField { ty, .. } => {
                        collect_unboxed_refs(ast, *ty, &mut refs);
                    }
                    _ => {}
                }
            }
        }
        TypeDeclKind::Variant { members } => {
            for &member in members {
                collect_unboxed_refs(ast, member, &mut refs);
            }
        }
        TypeDeclKind::Range { element, .. } => collect_unboxed_refs(ast, *element, &mut refs),
        TypeDeclKind::Alias { target } => collect_unboxed_refs(ast, *target, &mut refs),
        TypeDeclKind::Behaviour { .. } => {}
    }
    refs
}

fn visit(
    ast: &Ast,
    by_name: &FxHashMap<Name, DeclId>,
    colors: &mut FxHashMap<DeclId, Color>,
    stack: &mut Vec<DeclId>,
    decl: DeclId,
) -> Option<Vec<DeclId>> {
    match colors.get(&decl) {
        Some(Color::Black) => return None,
        Some(Color::Gray) => {
            let start = stack.iter().position(|&id| id == decl).unwrap_or(0);
            return Some(stack[start..].to_vec());
        }
        _ => {}
    }
    let DeclKind::Type(type_decl) = &ast.decls[decl].kind else {
        colors.insert(decl, Color::Black);
        return None;
    };
    colors.insert(decl, Color::Gray);
    stack.push(decl);
    for name in body_refs(ast, &type_decl.kind) {
        if let Some(&next) = by_name.get(&name) {
            if let Some(cycle) = visit(ast, by_name, colors, stack, next) {
                return Some(cycle);
            }
        }
    }
    stack.pop();
    colors.insert(decl, Color::Black);
    None
}

/// Finds one cycle of unboxed type references among the `type` declarations
/// in `by_name`, if one exists. `by_name` need only contain the type
/// declarations visible in the workspace(s) being checked together — a
/// best-effort name table, not full scope resolution, since cyclic-size
/// detection only cares about reachability, not accessibility.
pub fn find_unboxed_cycle(ast: &Ast, by_name: &FxHashMap<Name, DeclId>) -> Option<Vec<DeclId>> {
    let mut colors: FxHashMap<DeclId, Color> = FxHashMap::default();
    let mut stack = Vec::new();
    for &decl in by_name.values() {
        if !colors.contains_key(&decl) {
            if let Some(cycle) = visit(ast, by_name, &mut colors, &mut stack, decl) {
                return Some(cycle);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chk_ir::{Decl, NameInterner, Span, TypeDecl, TypeExpr};

    fn alloc_record(ast: &mut Ast, name: chk_ir::Name, field_ty: TypeExprId) -> DeclId {
        let field = ast.alloc_decl(Decl {
            kind: DeclKind::Field { ty: field_ty },
            name,
            span: Span::DUMMY,
            hidden: false,
        });
        ast.alloc_decl(Decl {
            kind: DeclKind::Type(TypeDecl {
                kind: TypeDeclKind::Record { fields: vec![field] },
                generics: None,
            }),
            name,
            span: Span::DUMMY,
            hidden: false,
        })
    }

    #[test]
    fn direct_self_reference_without_a_pointer_is_cyclic() {
        let mut ast = Ast::new();
        let mut names = NameInterner::new();
        let bad = names.intern("Bad");
        let self_ty = ast.alloc_type(TypeExpr {
            kind: TypeExprKind::Named { path: vec![bad], args: vec![] },
            span: Span::DUMMY,
        });
        let decl = alloc_record(&mut ast, bad, self_ty);

        let mut by_name = FxHashMap::default();
        by_name.insert(bad, decl);
        assert!(find_unboxed_cycle(&ast, &by_name).is_some());
    }

    #[test]
    fn self_reference_through_a_pointer_is_not_cyclic() {
        let mut ast = Ast::new();
        let mut names = NameInterner::new();
        let list = names.intern("List");
        let named = ast.alloc_type(TypeExpr {
            kind: TypeExprKind::Named { path: vec![list], args: vec![] },
            span: Span::DUMMY,
        });
        let ptr = ast.alloc_type(TypeExpr {
            kind: TypeExprKind::Pointer { mutable: false, inner: named },
            span: Span::DUMMY,
        });
        let decl = alloc_record(&mut ast, list, ptr);

        let mut by_name = FxHashMap::default();
        by_name.insert(list, decl);
        assert!(find_unboxed_cycle(&ast, &by_name).is_none());
    }

    #[test]
    fn transitive_cycle_across_two_types_is_detected() {
        let mut ast = Ast::new();
        let mut names = NameInterner::new();
        let a_name = names.intern("A");
        let b_name = names.intern("B");

        let b_ty = ast.alloc_type(TypeExpr {
            kind: TypeExprKind::Named { path: vec![b_name], args: vec![] },
            span: Span::DUMMY,
        });
        let a_decl = alloc_record(&mut ast, a_name, b_ty);

        let a_ty = ast.alloc_type(TypeExpr {
            kind: TypeExprKind::Named { path: vec![a_name], args: vec![] },
            span: Span::DUMMY,
        });
        let b_decl = alloc_record(&mut ast, b_name, a_ty);

        let mut by_name = FxHashMap::default();
        by_name.insert(a_name, a_decl);
        by_name.insert(b_name, b_decl);
        assert!(find_unboxed_cycle(&ast, &by_name).is_some());
    }
}
