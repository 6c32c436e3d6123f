//! Extension-member registry.
//!
//! Tracks which functions and properties an `extend` block attaches to a
//! type, keyed by the type's own [`TypeId`] rather than a declaration —
//! extensions apply to builtin primitives (`extend i32 { … }`) just as much
//! as to user-declared records, and primitives have no backing `DeclId`.
//! Sibling to [`chk_types::ImplRegistry`], which tracks behaviour
//! conformance the same way.

use chk_ir::{DeclId, Name};
use chk_types::TypeId;
use rustc_hash::FxHashMap;

#[derive(Default, Debug)]
pub struct ExtensionRegistry {
    members: FxHashMap<TypeId, FxHashMap<Name, DeclId>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `member` (a function or property declaration) to `ty` under
    /// `name`. Returns the previous member at this name, if any — a second
    /// `extend` block defining the same member name is the declaration
    /// checker's concern, not this registry's.
    pub fn register(&mut self, ty: TypeId, name: Name, member: DeclId) -> Option<DeclId> {
        self.members.entry(ty).or_default().insert(name, member)
    }

    pub fn get(&self, ty: TypeId, name: Name) -> Option<DeclId> {
        self.members.get(&ty)?.get(&name).copied()
    }

    pub fn members_of(&self, ty: TypeId) -> impl Iterator<Item = (Name, DeclId)> + '_ {
        self.members
            .get(&ty)
            .into_iter()
            .flat_map(|map| map.iter().map(|(&n, &d)| (n, d)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_and_finds_a_member() {
        let mut registry = ExtensionRegistry::new();
        let name = Name::from_raw(1);
        let member = DeclId::from_raw(1);
        assert_eq!(registry.get(TypeId::I32, name), None);
        registry.register(TypeId::I32, name, member);
        assert_eq!(registry.get(TypeId::I32, name), Some(member));
    }

    #[test]
    fn distinct_types_keep_separate_members() {
        let mut registry = ExtensionRegistry::new();
        let name = Name::from_raw(1);
        registry.register(TypeId::I32, name, DeclId::from_raw(1));
        assert_eq!(registry.get(TypeId::BOOL, name), None);
    }
}
