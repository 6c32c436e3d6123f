//! The input handed to the checker by the parser/driver.

use rustc_hash::FxHashMap;

use crate::name::Name;
use crate::DeclId;

/// One physical package: a named bundle of source units and the workspaces
/// declared inside it.
#[derive(Debug, Clone, Default)]
pub struct Package {
    pub name: Name,
    pub sources: Vec<DeclId>,
}

/// Everything the checker needs to know about the program before it starts:
/// every package, and every workspace those packages declare.
///
/// The checker does not parse, read files, or otherwise perform I/O — this
/// struct is handed to it complete.
#[derive(Debug, Clone, Default)]
pub struct Compilation {
    pub packages: FxHashMap<Name, Package>,
    /// Every `workspace A.B.C` declaration site, keyed by its dotted name.
    pub workspaces: FxHashMap<Name, DeclId>,
    /// Anonymous (workspace-less) source units, checked as an implicit
    /// unnamed workspace.
    pub loose_sources: Vec<DeclId>,
}
