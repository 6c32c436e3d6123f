//! Parsed type syntax.
//!
//! This is the syntax the parser hands us for a type position (`*List!(T)`,
//! `[T; N]`, `(T, U) -> V`, …) — before the name resolver has decided what
//! `T`, `List`, or `N` refer to. The checker walks this tree once per
//! occurrence and produces a `chk_types::Type`.

use crate::arena::Idx;
use crate::name::Name;
use crate::span::Span;
use crate::ExprId;

pub type TypeExprId = Idx<TypeExpr>;

#[derive(Debug, Clone)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum TypeExprKind {
    /// `A.B.C!(args)` — a possibly-generic named type, possibly workspace-qualified.
    Named {
        path: Vec<Name>,
        args: Vec<TypeArg>,
    },
    Pointer {
        mutable: bool,
        inner: TypeExprId,
    },
    Array {
        element: TypeExprId,
        size: ArraySize,
    },
    Slice(TypeExprId),
    Tuple(Vec<TypeExprId>),
    Function {
        params: Vec<TypeExprId>,
        ret: TypeExprId,
    },
    /// `Self` inside an `extend`/`behaviour` body.
    SelfType,
}

#[derive(Debug, Clone)]
pub enum TypeArg {
    Type(TypeExprId),
    Const(ExprId),
}

#[derive(Debug, Clone)]
pub enum ArraySize {
    Literal(u64),
    /// A generic-const-parameter reference or other constant expression.
    Expr(ExprId),
}
