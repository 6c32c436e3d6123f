//! Behaviour implementation registry.
//!
//! Records which `extend T: B { .. }` blocks exist, so the concept checker
//! can answer "does type `T` conform to behaviour `B`" when
//! checking a concept bound or a generic parameter's `: Addable` clause,
//! without re-walking every extension declaration each time.

use chk_ir::DeclId;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::type_id::TypeId;

#[derive(Default, Debug)]
pub struct ImplRegistry {
    /// type -> set of behaviours it conforms to, via some `extend` block.
    conformances: FxHashMap<TypeId, FxHashSet<DeclId>>,
    /// (type, behaviour) -> the `extend` declaration that provides it, for
    /// diagnostics that point at the conforming block.
    sources: FxHashMap<(TypeId, DeclId), DeclId>,
}

impl ImplRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `extend_decl` makes `ty` conform to `behaviour`.
    /// Returns `false` if this exact (type, behaviour) pair was already
    /// registered by a different `extend` block — a duplicate-conformance
    /// error the declaration checker should report.
    pub fn register(&mut self, ty: TypeId, behaviour: DeclId, extend_decl: DeclId) -> bool {
        let is_new = self.conformances.entry(ty).or_default().insert(behaviour);
        if is_new {
            self.sources.insert((ty, behaviour), extend_decl);
        }
        is_new
    }

    pub fn implements(&self, ty: TypeId, behaviour: DeclId) -> bool {
        self.conformances
            .get(&ty)
            .is_some_and(|behaviours| behaviours.contains(&behaviour))
    }

    pub fn source_of(&self, ty: TypeId, behaviour: DeclId) -> Option<DeclId> {
        self.sources.get(&(ty, behaviour)).copied()
    }

    pub fn behaviours_of(&self, ty: TypeId) -> impl Iterator<Item = DeclId> + '_ {
        self.conformances
            .get(&ty)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_and_queries_conformance() {
        let mut registry = ImplRegistry::new();
        let behaviour = DeclId::from_raw(1);
        let extend_block = DeclId::from_raw(2);

        assert!(!registry.implements(TypeId::I32, behaviour));
        registry.register(TypeId::I32, behaviour, extend_block);
        assert!(registry.implements(TypeId::I32, behaviour));
        assert_eq!(registry.source_of(TypeId::I32, behaviour), Some(extend_block));
    }

    #[test]
    fn duplicate_registration_is_reported_as_not_new() {
        let mut registry = ImplRegistry::new();
        let behaviour = DeclId::from_raw(1);
        let first_extend = DeclId::from_raw(2);
        let second_extend = DeclId::from_raw(3);

        assert!(registry.register(TypeId::I32, behaviour, first_extend));
        assert!(!registry.register(TypeId::I32, behaviour, second_extend));
        // the original source wins
        assert_eq!(registry.source_of(TypeId::I32, behaviour), Some(first_extend));
    }

    #[test]
    fn distinct_types_dont_interfere() {
        let mut registry = ImplRegistry::new();
        let behaviour = DeclId::from_raw(1);
        let extend_block = DeclId::from_raw(2);
        registry.register(TypeId::I32, behaviour, extend_block);
        assert!(!registry.implements(TypeId::BOOL, behaviour));
    }
}
