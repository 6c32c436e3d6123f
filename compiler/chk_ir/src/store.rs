//! The mutable arenas backing one checked program.
//!
//! A single [`Ast`] is shared by every pass of a `check()` invocation.
//! Instantiated generics and desugared bindings are appended to it as
//! checking proceeds.

use crate::arena::Arena;
use crate::ast::{Decl, Expr, Pattern, Stmt, TypeExpr};
use crate::{DeclId, ExprId, PatternId, StmtId, TypeExprId};

#[derive(Debug, Clone, Default)]
pub struct Ast {
    pub decls: Arena<Decl>,
    pub exprs: Arena<Expr>,
    pub stmts: Arena<Stmt>,
    pub patterns: Arena<Pattern>,
    pub types: Arena<TypeExpr>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_decl(&mut self, decl: Decl) -> DeclId {
        self.decls.alloc(decl)
    }

    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        self.exprs.alloc(expr)
    }

    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        self.stmts.alloc(stmt)
    }

    pub fn alloc_pattern(&mut self, pattern: Pattern) -> PatternId {
        self.patterns.alloc(pattern)
    }

    pub fn alloc_type(&mut self, ty: TypeExpr) -> TypeExprId {
        self.types.alloc(ty)
    }
}
