//! Scope-key node identity.
//!
//! Every AST node that introduces a
//! scope has exactly one environment, created lazily on first entry. In an
//! expression-oriented language most scope-introducing constructs are
//! expressions (`block`, `loop`, `when`-arm), while the rest (`function`,
//! `extend`, `behaviour`, `concept`, `generic-clause`, `source-unit`) are
//! declarations. [`NodeId`] lets the scope graph key on either uniformly.

use crate::{DeclId, ExprId};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeId {
    Decl(DeclId),
    Expr(ExprId),
}

impl From<DeclId> for NodeId {
    fn from(id: DeclId) -> Self {
        NodeId::Decl(id)
    }
}

impl From<ExprId> for NodeId {
    fn from(id: ExprId) -> Self {
        NodeId::Expr(id)
    }
}
