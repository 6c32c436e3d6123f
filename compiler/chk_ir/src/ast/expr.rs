//! Expression and statement syntax.

use crate::arena::Idx;
use crate::name::Name;
use crate::span::Span;
use crate::{DeclId, PatternId, TypeExprId};

pub type ExprId = Idx<Expr>;
pub type StmtId = Idx<Stmt>;

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum IntSuffix {
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    /// No suffix: literal defaults to signed 32-bit.
    None,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RealSuffix {
    F32,
    F64,
    F128,
    F256,
    /// No suffix: literal defaults to `float(32)`.
    None,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Shl,
    Shr,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum IncDecOp {
    Inc,
    Dec,
}

#[derive(Debug, Clone)]
pub struct CallArg {
    pub name: Option<Name>,
    pub value: ExprId,
}

#[derive(Debug, Clone)]
pub struct FieldInit {
    pub name: Name,
    pub value: ExprId,
}

#[derive(Debug, Clone)]
pub struct MatchArm {
    pub pattern: PatternId,
    pub guard: Option<ExprId>,
    pub body: ExprId,
}

/// The condition of a `when` expression.
#[derive(Debug, Clone)]
pub enum WhenSubject {
    /// `when x { ... }` — each arm is a value/pattern match against `x`.
    Value(ExprId),
    /// `when x as T { ... } else { ... }` — a type-cast match.
    Cast { expr: ExprId, ty: TypeExprId },
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ForKind {
    /// `for x in range { ... }`
    Range,
    /// `for { ... }` / `for cond { ... }`
    Loop,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    IntLiteral {
        value: u128,
        suffix: IntSuffix,
    },
    RealLiteral {
        bits: u64,
        suffix: RealSuffix,
    },
    BoolLiteral(bool),
    CharLiteral(char),
    /// Trailing `s` selects heap `string`; otherwise this is a `chars` literal.
    StringLiteral {
        value: Name,
        is_string: bool,
    },
    Identifier(Name),
    /// `A.B.C` — left-associative member access chain as written by the parser.
    Path(Vec<Name>),
    Member {
        base: ExprId,
        name: Name,
    },
    Index {
        base: ExprId,
        index: ExprId,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    Assign {
        target: ExprId,
        value: ExprId,
    },
    PrefixIncDec {
        op: IncDecOp,
        operand: ExprId,
    },
    PostfixIncDec {
        op: IncDecOp,
        operand: ExprId,
    },
    AddressOf {
        mutable: bool,
        operand: ExprId,
    },
    Deref {
        operand: ExprId,
    },
    As {
        operand: ExprId,
        ty: TypeExprId,
    },
    /// `callee(args)` — either a tuple/record construction or a call.
    Call {
        callee: ExprId,
        generic_args: Vec<TypeExprId>,
        args: Vec<CallArg>,
    },
    RecordLiteral {
        ty: Option<TypeExprId>,
        fields: Vec<FieldInit>,
    },
    TupleLiteral(Vec<ExprId>),
    ArrayLiteral(Vec<ExprId>),
    Range {
        lo: Option<ExprId>,
        hi: Option<ExprId>,
        open: bool,
    },
    When {
        subject: WhenSubject,
        arms: Vec<MatchArm>,
        else_branch: Option<ExprId>,
    },
    For {
        kind: ForKind,
        pattern: Option<PatternId>,
        iterable: Option<ExprId>,
        cond: Option<ExprId>,
        body: ExprId,
    },
    Break(Option<ExprId>),
    Continue,
    Return(Option<ExprId>),
    /// A function literal (closure). Captures a local from an enclosing
    /// expression scope are rejected by the name resolver.
    FunctionLiteral {
        params: Vec<DeclId>,
        return_ty: Option<TypeExprId>,
        body: ExprId,
    },
    Block(Vec<StmtId>),
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    Expr(ExprId),
    Decl(DeclId),
}
