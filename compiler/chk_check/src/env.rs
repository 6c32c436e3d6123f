//! The scope graph.
//!
//! One [`Env`] exists per scope-introducing AST node (a source unit, a
//! workspace, a type body, a function body, a block, a `when` arm). Each
//! holds four independent name maps: a name can simultaneously
//! name a value, a function, a type, and a concept without collision,
//! because lookups are always made against one specific map.
//!
//! Environments never merge and never get garbage collected mid-check: the
//! whole graph lives in one arena for the duration of `check()`, addressed
//! by [`EnvId`] the same way the AST is addressed by `chk_ir`'s `Idx<T>`.

use chk_ir::{Arena, DeclId, Idx, Name};
use rustc_hash::FxHashMap;

pub type EnvId = Idx<Env>;

/// Which of the four independent namespaces a lookup targets.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Namespace {
    Value,
    Function,
    Type,
    Concept,
}

#[derive(Debug, Default)]
pub struct Env {
    parent: Option<EnvId>,
    /// Set on the environment introduced directly by a `FunctionLiteral`
    /// body. Name resolution refuses to resolve a `Value` lookup that
    /// crosses this boundary into an enclosing *expression* scope (locals),
    /// while still allowing it to reach workspace-level bindings further up
    /// the chain — the Closure rule.
    closure_boundary: bool,
    values: FxHashMap<Name, DeclId>,
    functions: FxHashMap<Name, DeclId>,
    types: FxHashMap<Name, DeclId>,
    concepts: FxHashMap<Name, DeclId>,
}

impl Env {
    fn map(&self, ns: Namespace) -> &FxHashMap<Name, DeclId> {
        match ns {
            Namespace::Value => &self.values,
            Namespace::Function => &self.functions,
            Namespace::Type => &self.types,
            Namespace::Concept => &self.concepts,
        }
    }

    fn map_mut(&mut self, ns: Namespace) -> &mut FxHashMap<Name, DeclId> {
        match ns {
            Namespace::Value => &mut self.values,
            Namespace::Function => &mut self.functions,
            Namespace::Type => &mut self.types,
            Namespace::Concept => &mut self.concepts,
        }
    }

    pub fn names(&self, ns: Namespace) -> impl Iterator<Item = Name> + '_ {
        self.map(ns).keys().copied()
    }
}

/// Outcome of a scoped lookup: found locally, found but only by crossing a
/// closure boundary (illegal per the Closure rule unless the boundary also
/// separates workspace-level scope, in which case it's fine), or not found.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Lookup {
    Found(DeclId),
    /// Found, but only by stepping over an intervening closure boundary —
    /// the caller decides whether that's a workspace-level binding (OK) or
    /// an enclosing local (E1006).
    FoundAcrossClosure(DeclId),
    NotFound,
}

/// The arena of all environments created while checking one compilation.
#[derive(Debug, Default)]
pub struct EnvGraph {
    envs: Arena<Env>,
}

impl EnvGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&mut self) -> EnvId {
        self.envs.alloc(Env::default())
    }

    pub fn child(&mut self, parent: EnvId) -> EnvId {
        self.envs.alloc(Env {
            parent: Some(parent),
            ..Env::default()
        })
    }

    pub fn child_closure_boundary(&mut self, parent: EnvId) -> EnvId {
        self.envs.alloc(Env {
            parent: Some(parent),
            closure_boundary: true,
            ..Env::default()
        })
    }

    /// Binds `name` in `env`'s namespace `ns`. Returns the prior binding, if
    /// any — the caller reports `E1007DuplicateDefinition` when that's
    /// `Some` and the redefinition wasn't expected (e.g. shadowing a block
    /// scope is fine; redefining within the same scope is not).
    pub fn define(&mut self, env: EnvId, ns: Namespace, name: Name, decl: DeclId) -> Option<DeclId> {
        if name.is_underscore() {
            return None;
        }
        self.envs[env].map_mut(ns).insert(name, decl)
    }

    /// Walks from `env` up through parents looking for `name` in namespace
    /// `ns`, reporting whether a closure boundary was crossed to find it.
    pub fn lookup(&self, env: EnvId, ns: Namespace, name: Name) -> Lookup {
        let mut current = Some(env);
        let mut crossed_closure = false;
        while let Some(id) = current {
            let scope = &self.envs[id];
            if let Some(&decl) = scope.map(ns).get(&name) {
                return if crossed_closure {
                    Lookup::FoundAcrossClosure(decl)
                } else {
                    Lookup::Found(decl)
                };
            }
            if scope.closure_boundary {
                crossed_closure = true;
            }
            current = scope.parent;
        }
        Lookup::NotFound
    }

    /// All names visible from `env` in namespace `ns`, nearest-scope first,
    /// for "did you mean" suggestions.
    pub fn visible_names(&self, env: EnvId, ns: Namespace) -> Vec<Name> {
        let mut names = Vec::new();
        let mut current = Some(env);
        while let Some(id) = current {
            let scope = &self.envs[id];
            names.extend(scope.names(ns));
            current = scope.parent;
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_scope_sees_parent_bindings() {
        let mut graph = EnvGraph::new();
        let root = graph.root();
        let child = graph.child(root);
        let name = Name::from_raw(1);
        let decl = DeclId::from_raw(1);

        graph.define(root, Namespace::Value, name, decl);
        assert_eq!(graph.lookup(child, Namespace::Value, name), Lookup::Found(decl));
    }

    #[test]
    fn shadowing_in_child_scope_hides_parent() {
        let mut graph = EnvGraph::new();
        let root = graph.root();
        let child = graph.child(root);
        let name = Name::from_raw(1);
        let outer = DeclId::from_raw(1);
        let inner = DeclId::from_raw(2);

        graph.define(root, Namespace::Value, name, outer);
        graph.define(child, Namespace::Value, name, inner);
        assert_eq!(graph.lookup(child, Namespace::Value, name), Lookup::Found(inner));
        assert_eq!(graph.lookup(root, Namespace::Value, name), Lookup::Found(outer));
    }

    #[test]
    fn crossing_closure_boundary_is_flagged() {
        let mut graph = EnvGraph::new();
        let root = graph.root();
        let local_scope = graph.child(root);
        let closure_body = graph.child_closure_boundary(local_scope);
        let name = Name::from_raw(1);
        let decl = DeclId::from_raw(1);

        graph.define(local_scope, Namespace::Value, name, decl);
        assert_eq!(
            graph.lookup(closure_body, Namespace::Value, name),
            Lookup::FoundAcrossClosure(decl)
        );
    }

    #[test]
    fn workspace_level_binding_beyond_closure_is_still_found_across() {
        // Crossing the boundary to reach something above it is exactly the
        // case callers need to distinguish: workspace scope (fine) vs. an
        // enclosing function's locals (E1006). Both report the same
        // `FoundAcrossClosure`; the distinction is made by the caller using
        // the declaration's own kind, not by `EnvGraph`.
        let mut graph = EnvGraph::new();
        let workspace = graph.root();
        let closure_body = graph.child_closure_boundary(workspace);
        let name = Name::from_raw(1);
        let decl = DeclId::from_raw(1);

        graph.define(workspace, Namespace::Function, name, decl);
        assert_eq!(
            graph.lookup(closure_body, Namespace::Function, name),
            Lookup::FoundAcrossClosure(decl)
        );
    }

    #[test]
    fn underscore_is_never_bound() {
        let mut graph = EnvGraph::new();
        let root = graph.root();
        let decl = DeclId::from_raw(1);
        graph.define(root, Namespace::Value, Name::UNDERSCORE, decl);
        assert_eq!(
            graph.lookup(root, Namespace::Value, Name::UNDERSCORE),
            Lookup::NotFound
        );
    }
}
