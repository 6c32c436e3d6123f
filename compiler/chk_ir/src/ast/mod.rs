//! Abstract syntax tree node definitions.

mod decl;
mod expr;
mod module;
mod pattern;
mod ty;

pub use decl::{
    ConceptDecl, Decl, DeclId, DeclKind, ExtendDecl, FunctionDecl, TypeDecl, TypeDeclKind,
};
pub use expr::{
    BinaryOp, CallArg, Expr, ExprId, ExprKind, FieldInit, ForKind, IncDecOp, IntSuffix, MatchArm,
    RealSuffix, Stmt, StmtId, StmtKind, UnaryOp, WhenSubject,
};
pub use module::{Compilation, Package};
pub use pattern::{Pattern, PatternId, PatternKind};
pub use ty::{ArraySize, TypeArg, TypeExpr, TypeExprId, TypeExprKind};
