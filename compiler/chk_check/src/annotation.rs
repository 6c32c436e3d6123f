//! The semantic annotation attached to every declaration.
//!
//! Name resolution and type inference never touch the syntax tree in place;
//! the result of checking a declaration is recorded out-of-band, keyed by
//! `DeclId`, so the same AST can be walked more than once (a generic
//! declaration's body is visited once per instantiation, not once overall).
//!
//! The `visited`/`resolved` pair also doubles as the cycle guard: a
//! declaration whose checking recurses into itself (an alias chain, a
//! const initializer that reads itself) is caught by re-entering a
//! `visited`-but-not-`resolved` entry.

use chk_ir::{DeclId, NodeId};
use chk_types::{ConstValue, Substitution, TypeId};
use rustc_hash::FxHashMap;

#[derive(Default, Clone)]
pub struct Annotation {
    pub ty: Option<TypeId>,
    pub value: Option<ConstValue>,
    pub scope: Option<NodeId>,
    pub visited: bool,
    pub resolved: bool,
    pub usecount: u32,
    /// For a destructuring binding or an instantiated clone, the declaration
    /// this one stands in for.
    pub referencing: Option<DeclId>,
    /// The generic substitution this declaration was instantiated under, if
    /// any — `None` for an ordinary, non-generic declaration.
    pub substitution: Option<Substitution>,
}

/// A declaration was re-entered while still `visited` and not yet
/// `resolved`: a cyclic reference with no indirection to break it.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct CyclicReentry;

#[derive(Default)]
pub struct AnnotationTable {
    entries: FxHashMap<DeclId, Annotation>,
}

impl AnnotationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, decl: DeclId) -> Option<&Annotation> {
        self.entries.get(&decl)
    }

    /// Begins checking `decl`. `Err(CyclicReentry)` if `decl` is already
    /// `visited` but not yet `resolved` — the caller should emit a cyclic
    /// diagnostic and stop recursing, substituting `TypeId::UNKNOWN`.
    pub fn enter(&mut self, decl: DeclId) -> Result<(), CyclicReentry> {
        let entry = self.entries.entry(decl).or_default();
        if entry.visited && !entry.resolved {
            return Err(CyclicReentry);
        }
        entry.visited = true;
        Ok(())
    }

    /// Finishes checking `decl`, recording its final type and marking it
    /// `resolved` so future lookups (and future `enter` calls) see the
    /// cached result rather than cyclic-reentering.
    pub fn mark_resolved(&mut self, decl: DeclId, ty: TypeId) {
        let entry = self.entries.entry(decl).or_default();
        entry.ty = Some(ty);
        entry.resolved = true;
    }

    pub fn set_value(&mut self, decl: DeclId, value: ConstValue) {
        self.entries.entry(decl).or_default().value = Some(value);
    }

    pub fn set_scope(&mut self, decl: DeclId, scope: NodeId) {
        self.entries.entry(decl).or_default().scope = Some(scope);
    }

    pub fn set_referencing(&mut self, decl: DeclId, target: DeclId) {
        self.entries.entry(decl).or_default().referencing = Some(target);
    }

    pub fn set_substitution(&mut self, decl: DeclId, substitution: Substitution) {
        self.entries.entry(decl).or_default().substitution = Some(substitution);
    }

    pub fn record_use(&mut self, decl: DeclId) {
        self.entries.entry(decl).or_default().usecount += 1;
    }

    pub fn is_resolved(&self, decl: DeclId) -> bool {
        self.entries.get(&decl).is_some_and(|a| a.resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_entry_succeeds_and_leaves_a_record() {
        let mut table = AnnotationTable::new();
        let decl = DeclId::from_raw(1);
        assert!(table.enter(decl).is_ok());
        assert!(table.get(decl).unwrap().visited);
        assert!(!table.get(decl).unwrap().resolved);
    }

    #[test]
    fn reentering_before_resolution_is_cyclic() {
        let mut table = AnnotationTable::new();
        let decl = DeclId::from_raw(1);
        table.enter(decl).unwrap();
        assert_eq!(table.enter(decl), Err(CyclicReentry));
    }

    #[test]
    fn reentering_after_resolution_is_fine() {
        let mut table = AnnotationTable::new();
        let decl = DeclId::from_raw(1);
        table.enter(decl).unwrap();
        table.mark_resolved(decl, TypeId::I32);
        assert!(table.enter(decl).is_ok());
    }

    #[test]
    fn usecount_accumulates() {
        let mut table = AnnotationTable::new();
        let decl = DeclId::from_raw(2);
        table.record_use(decl);
        table.record_use(decl);
        assert_eq!(table.get(decl).unwrap().usecount, 2);
    }
}
