//! Declaration syntax.
//!
//! One [`Decl`] node exists per declaration kind the language recognizes. The
//! checker attaches its semantic `Annotation` (type, value, scope, cycle
//! flags) out-of-band, keyed by `DeclId` — see `chk_check::env`.

use crate::arena::Idx;
use crate::name::Name;
use crate::span::Span;
use crate::{ExprId, TypeExprId};

pub type DeclId = Idx<Decl>;

#[derive(Debug, Clone)]
pub struct Decl {
    pub kind: DeclKind,
    pub name: Name,
    pub span: Span,
    /// `hide`-marked or `_`-prefixed declarations are visible only from
    /// within the declaring workspace/type.
    pub hidden: bool,
}

#[derive(Debug, Clone)]
pub enum DeclKind {
    Workspace {
        path: Vec<Name>,
        sources: Vec<DeclId>,
    },
    SourceUnit {
        /// `None` for an anonymous (workspace-less) source unit.
        workspace: Option<DeclId>,
        items: Vec<DeclId>,
    },
    Use {
        path: Vec<Name>,
    },
    Type(TypeDecl),
    Concept(ConceptDecl),
    Extend(ExtendDecl),
    Function(FunctionDecl),
    /// Same shape as `Function`, but must take exactly one parameter whose
    /// type matches the extended type.
    Property(FunctionDecl),
    Parameter {
        ty: Option<TypeExprId>,
        variadic: bool,
        default: Option<ExprId>,
    },
    Field {
        ty: TypeExprId,
    },
    TupleField {
        ty: TypeExprId,
        index: u32,
    },
    Var {
        ty: Option<TypeExprId>,
        init: Option<ExprId>,
        mutable: bool,
    },
    /// A destructuring `val (a, b) = pair` — desugars to a hidden aggregate
    /// binding (`elements[0]`) plus one binding per name.
    VarTupled {
        hidden_binding: DeclId,
        elements: Vec<DeclId>,
        ty: Option<TypeExprId>,
        init: Option<ExprId>,
        mutable: bool,
    },
    Const {
        ty: Option<TypeExprId>,
        init: ExprId,
    },
    ConstTupled {
        hidden_binding: DeclId,
        elements: Vec<DeclId>,
        init: ExprId,
    },
    GenericClause {
        params: Vec<DeclId>,
    },
    GenericTypeParameter {
        /// Concept names constraining this parameter (`T: Addable`).
        bounds: Vec<Name>,
    },
    GenericConstParameter {
        ty: TypeExprId,
    },
    Test {
        body: ExprId,
    },
    Extern {
        generics: Option<DeclId>,
        params: Vec<DeclId>,
        return_ty: Option<TypeExprId>,
        variadic: bool,
    },
}

#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub kind: TypeDeclKind,
    pub generics: Option<DeclId>,
}

#[derive(Debug, Clone)]
pub enum TypeDeclKind {
    Record {
        fields: Vec<DeclId>,
    },
    Variant {
        members: Vec<TypeExprId>,
    },
    Range {
        element: TypeExprId,
        open_end: bool,
    },
    Alias {
        target: TypeExprId,
    },
    Behaviour {
        /// Function/property declarations with no body (required prototypes)
        /// or with a body (defaulted prototypes, inherited by implementors).
        prototypes: Vec<DeclId>,
    },
}

#[derive(Debug, Clone)]
pub struct ConceptDecl {
    pub generics: DeclId,
    pub prototypes: Vec<DeclId>,
}

#[derive(Debug, Clone)]
pub struct ExtendDecl {
    pub target: TypeExprId,
    /// `extend T: B { ... }` — conformance to behaviour `B` is checked once
    /// the block's members are typed.
    pub behaviour: Option<TypeExprId>,
    pub members: Vec<DeclId>,
}

#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub generics: Option<DeclId>,
    pub params: Vec<DeclId>,
    pub return_ty: Option<TypeExprId>,
    /// `None` for a behaviour prototype without a default body.
    pub body: Option<ExprId>,
}
