//! Name resolution.
//!
//! Resolves an identifier against the scope graph, falling back to the
//! current workspace's imports when nothing local matches. Also enforces
//! the Closure rule: a function literal may not reference a local variable
//! from an enclosing expression scope, only names bound at workspace level
//! (functions, types, constants) or its own parameters.

use chk_diagnostic::{Diagnostic, ErrorCode};
use chk_ir::{Ast, DeclId, DeclKind, Name, NameInterner, Span};

use crate::env::{EnvGraph, EnvId, Lookup, Namespace};
use crate::imports::ImportGraph;
use crate::suggest::suggest_similar;

/// Whether a declaration found across a closure boundary is still legal to
/// reference: workspace-level bindings are, enclosing locals aren't.
fn is_workspace_level(ast: &Ast, decl: DeclId) -> bool {
    matches!(
        ast.decls[decl].kind,
        DeclKind::Function(_)
            | DeclKind::Const { .. }
            | DeclKind::ConstTupled { .. }
            | DeclKind::Type(_)
            | DeclKind::Concept(_)
            | DeclKind::Extern { .. }
    )
}

pub struct Resolver<'a> {
    pub ast: &'a Ast,
    pub names: &'a NameInterner,
    pub envs: &'a EnvGraph,
    pub imports: &'a ImportGraph,
    /// The workspace the lookup originates from, for cross-workspace
    /// fallback once the local scope chain is exhausted.
    pub home_workspace: Option<DeclId>,
}

impl Resolver<'_> {
    /// Resolves `name` in namespace `ns` starting from `env`. On failure,
    /// returns a ready-to-emit diagnostic (with a "did you mean" note when a
    /// single close match exists).
    pub fn resolve(&self, env: EnvId, ns: Namespace, name: Name, span: Span) -> Result<DeclId, Diagnostic> {
        match self.envs.lookup(env, ns, name) {
            Lookup::Found(decl) => Ok(decl),
            Lookup::FoundAcrossClosure(decl) => {
                if is_workspace_level(self.ast, decl) {
                    Ok(decl)
                } else {
                    Err(Diagnostic::error(
                        ErrorCode::E1006IllegalCapture,
                        span,
                        format!(
                            "function literal cannot capture local `{}` from an enclosing scope",
                            self.names.resolve(name)
                        ),
                    ))
                }
            }
            Lookup::NotFound => self
                .resolve_via_imports(ns, name)
                .ok_or_else(|| self.unresolved_diagnostic(env, ns, name, span)),
        }
    }

    fn resolve_via_imports(&self, ns: Namespace, name: Name) -> Option<DeclId> {
        let home = self.home_workspace?;
        for &imported in self.imports.edges.get(&home)? {
            let DeclKind::Workspace { sources, .. } = &self.ast.decls[imported].kind else {
                continue;
            };
            for &source in sources {
                let DeclKind::SourceUnit { items, .. } = &self.ast.decls[source].kind else {
                    continue;
                };
                for &item in items {
                    let decl = &self.ast.decls[item];
                    if decl.hidden || decl.name != name {
                        continue;
                    }
                    if decl_matches_namespace(&decl.kind, ns) {
                        return Some(item);
                    }
                }
            }
        }
        None
    }

    fn unresolved_diagnostic(&self, env: EnvId, ns: Namespace, name: Name, span: Span) -> Diagnostic {
        let unknown = self.names.resolve(name);
        let candidates = self
            .envs
            .visible_names(env, ns)
            .into_iter()
            .map(|n| self.names.resolve(n));
        let mut diagnostic = Diagnostic::error(
            ErrorCode::E1001UnresolvedName,
            span,
            format!("cannot find `{unknown}` in this scope"),
        );
        if let Some(suggestion) = suggest_similar(unknown, candidates) {
            diagnostic = diagnostic.with_note(format!("did you mean `{suggestion}`?"));
        }
        diagnostic
    }
}

fn decl_matches_namespace(kind: &DeclKind, ns: Namespace) -> bool {
    match ns {
        Namespace::Value => matches!(
            kind,
            DeclKind::Var { .. } | DeclKind::VarTupled { .. } | DeclKind::Const { .. } | DeclKind::ConstTupled { .. }
        ),
        Namespace::Function => matches!(kind, DeclKind::Function(_) | DeclKind::Extern { .. }),
        Namespace::Type => matches!(kind, DeclKind::Type(_)),
        Namespace::Concept => matches!(kind, DeclKind::Concept(_)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chk_ir::{Decl, Span};
    use rustc_hash::FxHashMap;

    fn setup() -> (Ast, NameInterner, EnvGraph) {
        (Ast::new(), NameInterner::new(), EnvGraph::new())
    }

    #[test]
    fn resolves_a_locally_bound_value() {
        let (mut ast, mut names, mut envs) = setup();
        let root = envs.root();
        let name = names.intern("x");
        let decl = ast.alloc_decl(Decl {
            kind: DeclKind::Var { ty: None, init: None, mutable: false },
            name,
            span: Span::DUMMY,
            hidden: false,
        });
        envs.define(root, Namespace::Value, name, decl);

        let import_graph = ImportGraph { edges: FxHashMap::default(), diagnostics: Vec::new() };
        let resolver = Resolver {
            ast: &ast,
            names: &names,
            envs: &envs,
            imports: &import_graph,
            home_workspace: None,
        };
        assert_eq!(resolver.resolve(root, Namespace::Value, name, Span::DUMMY), Ok(decl));
    }

    #[test]
    fn unresolved_name_offers_a_suggestion() {
        let (mut ast, mut names, mut envs) = setup();
        let root = envs.root();
        let length_name = names.intern("length");
        let decl = ast.alloc_decl(Decl {
            kind: DeclKind::Var { ty: None, init: None, mutable: false },
            name: length_name,
            span: Span::DUMMY,
            hidden: false,
        });
        envs.define(root, Namespace::Value, length_name, decl);

        let typo = names.intern("lenght");
        let import_graph = ImportGraph { edges: FxHashMap::default(), diagnostics: Vec::new() };
        let resolver = Resolver {
            ast: &ast,
            names: &names,
            envs: &envs,
            imports: &import_graph,
            home_workspace: None,
        };
        let diagnostic = resolver
            .resolve(root, Namespace::Value, typo, Span::DUMMY)
            .unwrap_err();
        assert!(diagnostic.notes.iter().any(|n| n.label.contains("length")));
    }

    #[test]
    fn capturing_a_local_across_a_closure_boundary_is_illegal() {
        let (mut ast, mut names, mut envs) = setup();
        let root = envs.root();
        let closure = envs.child_closure_boundary(root);
        let name = names.intern("local");
        let decl = ast.alloc_decl(Decl {
            kind: DeclKind::Var { ty: None, init: None, mutable: false },
            name,
            span: Span::DUMMY,
            hidden: false,
        });
        envs.define(root, Namespace::Value, name, decl);

        let import_graph = ImportGraph { edges: FxHashMap::default(), diagnostics: Vec::new() };
        let resolver = Resolver {
            ast: &ast,
            names: &names,
            envs: &envs,
            imports: &import_graph,
            home_workspace: None,
        };
        let diagnostic = resolver
            .resolve(closure, Namespace::Value, name, Span::DUMMY)
            .unwrap_err();
        assert_eq!(diagnostic.code, ErrorCode::E1006IllegalCapture);
    }

    #[test]
    fn capturing_a_workspace_function_across_a_closure_boundary_is_fine() {
        let (mut ast, mut names, mut envs) = setup();
        let root = envs.root();
        let closure = envs.child_closure_boundary(root);
        let name = names.intern("helper");
        let decl = ast.alloc_decl(Decl {
            kind: DeclKind::Function(chk_ir::FunctionDecl {
                generics: None,
                params: Vec::new(),
                return_ty: None,
                body: None,
            }),
            name,
            span: Span::DUMMY,
            hidden: false,
        });
        envs.define(root, Namespace::Function, name, decl);

        let import_graph = ImportGraph { edges: FxHashMap::default(), diagnostics: Vec::new() };
        let resolver = Resolver {
            ast: &ast,
            names: &names,
            envs: &envs,
            imports: &import_graph,
            home_workspace: None,
        };
        assert_eq!(
            resolver.resolve(closure, Namespace::Function, name, Span::DUMMY),
            Ok(decl)
        );
    }
}
