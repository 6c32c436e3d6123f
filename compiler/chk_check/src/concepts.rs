//! Concept (structural constraint) and behaviour conformance checking.
//!
//! A `behaviour` is implemented nominally (an explicit `extend T: B {..}`);
//! a `concept` is satisfied structurally, with no declaration naming the
//! relationship. Both reduce to the same question once you have the
//! candidate type's member scope: for every prototype the concept/behaviour
//! declares, does the type have a matching function or property — same
//! name, same parameter count?
//!
//! Full signature compatibility (parameter/return types, not just arity)
//! is checked by the caller, which has the resolved `TypeId`s this
//! context-free helper does not.

use chk_ir::{Ast, DeclId, DeclKind, FunctionDecl};
use chk_types::TypeId;

use crate::extensions::ExtensionRegistry;

/// A concept/behaviour prototype with no matching member on the candidate
/// type, for the `E3002ConceptNotSatisfied`/`E3004MissingBehaviourMember`
/// diagnostic to name.
#[derive(Debug, Clone, Copy)]
pub struct UnsatisfiedPrototype {
    pub prototype: DeclId,
}

fn function_shape(ast: &Ast, decl: DeclId) -> Option<&FunctionDecl> {
    match &ast.decls[decl].kind {
        DeclKind::Function(f) | DeclKind::Property(f) => Some(f),
        _ => None,
    }
}

fn arity_matches(ast: &Ast, prototype: DeclId, candidate: DeclId) -> bool {
    match (function_shape(ast, prototype), function_shape(ast, candidate)) {
        (Some(p), Some(c)) => p.params.len() == c.params.len(),
        _ => false,
    }
}

/// Finds every prototype in `prototypes` with no name-and-arity-matching
/// member registered for `ty`. `extensions` must already contain every
/// member the type picked up from its own declaration body as well as any
/// `extend` block — callers register both before calling this.
pub fn unsatisfied_prototypes(
    ast: &Ast,
    extensions: &ExtensionRegistry,
    ty: TypeId,
    prototypes: &[DeclId],
) -> Vec<UnsatisfiedPrototype> {
    prototypes
        .iter()
        .filter(|&&prototype| {
            let name = ast.decls[prototype].name;
            !extensions.members_of(ty).any(|(member_name, member)| {
                member_name == name && arity_matches(ast, prototype, member)
            })
        })
        .map(|&prototype| UnsatisfiedPrototype { prototype })
        .collect()
}

/// `property.str(self) -> string` is the language's canonical
/// stringification hook: a `when`/interpolation context that needs to
/// display a value looks for exactly this member before falling back to a
/// built-in representation. Exposed as its own predicate since the
/// declaration checker special-cases it rather than routing it through a
/// named concept.
pub fn has_str_conversion(ast: &Ast, names: &chk_ir::NameInterner, extensions: &ExtensionRegistry, ty: TypeId) -> bool {
    extensions.members_of(ty).any(|(name, member)| {
        names.resolve(name) == "str" && matches!(ast.decls[member].kind, DeclKind::Property(_))
    })
}
