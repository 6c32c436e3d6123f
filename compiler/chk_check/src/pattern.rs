//! Pattern type checking.
//!
//! Checks that a pattern's shape is compatible with the type it is matched
//! against and binds any names the pattern introduces into the current
//! scope. Exhaustiveness and reachability of a whole `when` expression's arm
//! set are *not* decided here — that is delegated to the
//! [`crate::interfaces::PatternMatcher`] the driver supplies.

use chk_diagnostic::{Diagnostic, ErrorCode};
use chk_ir::{Ast, DeclKind, Name, Pattern, PatternId, PatternKind, Span};
use chk_types::{TypeData, TypeId, TypeInterner};

use crate::env::{EnvGraph, EnvId, Lookup, Namespace};

/// A name this pattern binds, and the type it binds at.
pub struct Binding {
    pub name: Name,
    pub ty: TypeId,
}

pub struct PatternChecker<'a> {
    pub ast: &'a Ast,
    pub types: &'a TypeInterner,
    /// The scope an identifier pattern is checked in, used to decide
    /// whether it names an existing `const`/generic-const (§4.7: "identifier
    /// patterns either denote a constant... or introduce a new binding") —
    /// `None` when no scope is available (e.g. a unit test checking a
    /// pattern in isolation), in which case every identifier is treated as
    /// a fresh binding.
    pub scope: Option<(&'a EnvGraph, EnvId)>,
}

impl PatternChecker<'_> {
    /// Checks `pattern` against `scrutinee_ty`, collecting the bindings it
    /// introduces and any shape-mismatch diagnostics. `is_last` marks
    /// whether this pattern occupies the last slot of a composite pattern —
    /// `...` is only legal there.
    pub fn check(
        &self,
        pattern: PatternId,
        scrutinee_ty: TypeId,
        is_last: bool,
        bindings: &mut Vec<Binding>,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let node: &Pattern = &self.ast.patterns[pattern];
        match &node.kind {
            PatternKind::Wildcard => {}
            PatternKind::Rest => {
                if !is_last {
                    diagnostics.push(Diagnostic::error(
                        ErrorCode::E4001MisplacedRestPattern,
                        node.span,
                        "`...` is only legal as the last element of a composite pattern",
                    ));
                }
            }
            PatternKind::Literal(_) => {
                // Literal compatibility with `scrutinee_ty` is a numeric/enum
                // comparison resolved once the evaluator folds the literal;
                // the pattern checker only needs the shape to be a scalar.
                if matches!(self.types.resolve(scrutinee_ty), TypeData::Tuple(_) | TypeData::Named { .. })
                    && !matches!(self.types.resolve(scrutinee_ty), TypeData::Unknown)
                {
                    diagnostics.push(self.shape_mismatch(node.span, scrutinee_ty));
                }
            }
            PatternKind::Identifier(name) => {
                if !self.names_existing_const(*name) {
                    bindings.push(Binding {
                        name: *name,
                        ty: scrutinee_ty,
                    });
                }
            }
            PatternKind::Binding { name, sub } => {
                bindings.push(Binding {
                    name: *name,
                    ty: scrutinee_ty,
                });
                self.check(*sub, scrutinee_ty, is_last, bindings, diagnostics);
            }
            PatternKind::Tuple(elements) => match self.types.resolve(scrutinee_ty) {
                TypeData::Tuple(field_tys) if field_tys.len() == elements.len() => {
                    let field_tys = field_tys.clone();
                    for (i, &elem) in elements.iter().enumerate() {
                        let last = is_last && i == elements.len() - 1;
                        self.check(elem, field_tys[i], last, bindings, diagnostics);
                    }
                }
                TypeData::Unknown => {}
                _ => diagnostics.push(self.shape_mismatch(node.span, scrutinee_ty)),
            },
            PatternKind::Record { fields, .. } => {
                // Field types are resolved against the named declaration by
                // the declaration checker; here we only recurse with
                // the scrutinee type as a placeholder so nested bindings
                // still get *some* type rather than panicking on a missing
                // entry. A driver wiring real field lookup replaces this
                // with precise per-field types.
                for (_, sub) in fields {
                    self.check(*sub, scrutinee_ty, false, bindings, diagnostics);
                }
            }
            PatternKind::Range { .. } => {
                if !matches!(self.types.resolve(scrutinee_ty), TypeData::Unknown)
                    && !self.types.resolve(scrutinee_ty).is_numeric()
                    && !matches!(self.types.resolve(scrutinee_ty), TypeData::Char)
                {
                    diagnostics.push(self.shape_mismatch(node.span, scrutinee_ty));
                }
            }
            PatternKind::Or(alternatives) => {
                let mut first_bindings = Vec::new();
                for (i, &alt) in alternatives.iter().enumerate() {
                    let mut alt_bindings = Vec::new();
                    self.check(alt, scrutinee_ty, is_last, &mut alt_bindings, diagnostics);
                    if i == 0 {
                        first_bindings = alt_bindings;
                    } else if !same_names(&first_bindings, &alt_bindings) {
                        diagnostics.push(Diagnostic::error(
                            ErrorCode::E4003OrPatternBindingMismatch,
                            node.span,
                            "every alternative of an or-pattern must bind the same names",
                        ));
                    }
                }
                bindings.extend(first_bindings);
            }
            PatternKind::Variant { inner, .. } => {
                // As with records, precise member-payload typing belongs to
                // the declaration checker once the variant's path is
                // resolved; we still walk the nested pattern so it gets
                // bindings rather than being skipped entirely.
                if let Some(sub) = inner {
                    self.check(*sub, scrutinee_ty, false, bindings, diagnostics);
                }
            }
        }
    }

    /// Whether `name` already resolves, in this pattern's scope, to a
    /// `const`/`const-tupled`/generic-const declaration — such an identifier
    /// pattern matches against that constant's value rather than
    /// introducing a new binding.
    fn names_existing_const(&self, name: Name) -> bool {
        let Some((envs, env)) = self.scope else { return false };
        let decl = match envs.lookup(env, Namespace::Value, name) {
            Lookup::Found(decl) | Lookup::FoundAcrossClosure(decl) => decl,
            Lookup::NotFound => return false,
        };
        matches!(
            self.ast.decls[decl].kind,
            DeclKind::Const { .. } | DeclKind::ConstTupled { .. } | DeclKind::GenericConstParameter { .. }
        )
    }

    fn shape_mismatch(&self, span: Span, scrutinee_ty: TypeId) -> Diagnostic {
        Diagnostic::error(
            ErrorCode::E4002PatternShapeMismatch,
            span,
            format!("pattern shape does not match {scrutinee_ty:?}"),
        )
    }
}

fn same_names(a: &[Binding], b: &[Binding]) -> bool {
    a.len() == b.len() && a.iter().all(|ab| b.iter().any(|bb| bb.name == ab.name))
}

/// Binds every name a pattern introduced into `env`'s value namespace.
/// Split out from [`PatternChecker::check`] so a caller can check a pattern
/// purely for diagnostics (e.g. re-checking an already-bound match arm)
/// without re-binding.
pub fn bind_into_env(envs: &mut EnvGraph, env: EnvId, bindings: &[Binding], decl_for: impl Fn(Name) -> chk_ir::DeclId) {
    for binding in bindings {
        let decl = decl_for(binding.name);
        envs.define(env, Namespace::Value, binding.name, decl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chk_ir::Span;

    fn checker<'a>(ast: &'a Ast, types: &'a TypeInterner) -> PatternChecker<'a> {
        PatternChecker { ast, types, scope: None }
    }

    #[test]
    fn wildcard_never_mismatches() {
        let mut ast = Ast::new();
        let types = TypeInterner::new();
        let pattern = ast.alloc_pattern(Pattern {
            kind: PatternKind::Wildcard,
            span: Span::DUMMY,
        });
        let mut bindings = Vec::new();
        let mut diagnostics = Vec::new();
        checker(&ast, &types).check(pattern, TypeId::I32, true, &mut bindings, &mut diagnostics);
        assert!(diagnostics.is_empty());
        assert!(bindings.is_empty());
    }

    #[test]
    fn identifier_pattern_binds_the_scrutinee_type() {
        let mut ast = Ast::new();
        let types = TypeInterner::new();
        let name = Name::from_raw(1);
        let pattern = ast.alloc_pattern(Pattern {
            kind: PatternKind::Identifier(name),
            span: Span::DUMMY,
        });
        let mut bindings = Vec::new();
        let mut diagnostics = Vec::new();
        checker(&ast, &types).check(pattern, TypeId::BOOL, true, &mut bindings, &mut diagnostics);
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].ty, TypeId::BOOL);
    }

    #[test]
    fn identifier_pattern_naming_a_const_in_scope_does_not_bind() {
        let mut ast = Ast::new();
        let types = TypeInterner::new();
        let mut envs = EnvGraph::new();
        let env = envs.root();

        let name = Name::from_raw(1);
        let zero = ast.alloc_expr(chk_ir::Expr { kind: chk_ir::ExprKind::IntLiteral { value: 0, suffix: chk_ir::IntSuffix::None }, span: Span::DUMMY });
        let const_decl = ast.alloc_decl(chk_ir::Decl {
            kind: DeclKind::Const { ty: None, init: zero },
            name,
            span: Span::DUMMY,
            hidden: false,
        });
        envs.define(env, Namespace::Value, name, const_decl);

        let pattern = ast.alloc_pattern(Pattern {
            kind: PatternKind::Identifier(name),
            span: Span::DUMMY,
        });
        let mut bindings = Vec::new();
        let mut diagnostics = Vec::new();
        let checker = PatternChecker { ast: &ast, types: &types, scope: Some((&envs, env)) };
        checker.check(pattern, TypeId::I32, true, &mut bindings, &mut diagnostics);
        assert!(bindings.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn misplaced_rest_is_rejected() {
        let mut ast = Ast::new();
        let types = TypeInterner::new();
        let pattern = ast.alloc_pattern(Pattern {
            kind: PatternKind::Rest,
            span: Span::DUMMY,
        });
        let mut bindings = Vec::new();
        let mut diagnostics = Vec::new();
        checker(&ast, &types).check(pattern, TypeId::I32, false, &mut bindings, &mut diagnostics);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::E4001MisplacedRestPattern);
    }

    #[test]
    fn or_pattern_requires_matching_bindings() {
        let mut ast = Ast::new();
        let types = TypeInterner::new();
        let a = Name::from_raw(1);
        let b = Name::from_raw(2);
        let left = ast.alloc_pattern(Pattern {
            kind: PatternKind::Identifier(a),
            span: Span::DUMMY,
        });
        let right = ast.alloc_pattern(Pattern {
            kind: PatternKind::Identifier(b),
            span: Span::DUMMY,
        });
        let or_pattern = ast.alloc_pattern(Pattern {
            kind: PatternKind::Or(vec![left, right]),
            span: Span::DUMMY,
        });
        let mut bindings = Vec::new();
        let mut diagnostics = Vec::new();
        checker(&ast, &types).check(or_pattern, TypeId::I32, true, &mut bindings, &mut diagnostics);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::E4003OrPatternBindingMismatch);
    }

    #[test]
    fn tuple_pattern_checks_arity_and_recurses() {
        let mut ast = Ast::new();
        let mut types = TypeInterner::new();
        let tuple_ty = types.intern(TypeData::Tuple(Box::new([TypeId::I32, TypeId::BOOL])));
        let name = Name::from_raw(1);
        let first = ast.alloc_pattern(Pattern {
            kind: PatternKind::Identifier(name),
            span: Span::DUMMY,
        });
        let second = ast.alloc_pattern(Pattern {
            kind: PatternKind::Wildcard,
            span: Span::DUMMY,
        });
        let tuple_pattern = ast.alloc_pattern(Pattern {
            kind: PatternKind::Tuple(vec![first, second]),
            span: Span::DUMMY,
        });
        let mut bindings = Vec::new();
        let mut diagnostics = Vec::new();
        checker(&ast, &types).check(tuple_pattern, tuple_ty, true, &mut bindings, &mut diagnostics);
        assert!(diagnostics.is_empty());
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].ty, TypeId::I32);
    }
}
