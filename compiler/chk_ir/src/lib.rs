//! AST and interning primitives shared by the semantic checker.
//!
//! This crate holds only data: the parsed syntax tree shape, interned identifiers, source spans, and an
//! index-addressed arena. It performs no resolution, inference, or
//! diagnostics — that is `chk_types` and `chk_check`.

pub mod arena;
pub mod ast;
pub mod name;
pub mod node;
pub mod span;
pub mod store;
pub mod visitor;

pub use arena::{Arena, Idx};
pub use ast::{
    ArraySize, BinaryOp, CallArg, Compilation, ConceptDecl, Decl, DeclId, DeclKind, Expr, ExprId,
    ExprKind, ExtendDecl, FieldInit, ForKind, FunctionDecl, IncDecOp, IntSuffix, MatchArm, Package,
    Pattern, PatternId, PatternKind, RealSuffix, Stmt, StmtId, StmtKind, TypeArg, TypeDecl,
    TypeDeclKind, TypeExpr, TypeExprId, TypeExprKind, UnaryOp, WhenSubject,
};
pub use name::{Name, NameInterner};
pub use node::NodeId;
pub use span::Span;
pub use store::Ast;
