//! Pattern syntax, as produced by the parser for `when` arms, `for` bindings,
//! and destructuring `val`/`var` declarations.

use crate::arena::Idx;
use crate::name::Name;
use crate::span::Span;
use crate::{ExprId, TypeExprId};

pub type PatternId = Idx<Pattern>;

#[derive(Debug, Clone)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum PatternKind {
    /// `_` — matches anything, binds nothing.
    Wildcard,
    /// `...` — only legal as the last element of a composite pattern.
    Rest,
    /// A literal or range-bound expression the scrutinee is compared against.
    Literal(ExprId),
    /// A bare lowercase identifier: either a fresh binding or, if it names a
    /// visible `const`/generic-const, a value comparison. Disambiguated by
    /// the pattern analyzer, not by the parser.
    Identifier(Name),
    /// `name @ pattern` — binds `name` to the whole match, recursing into `pattern`.
    Binding {
        name: Name,
        sub: PatternId,
    },
    Tuple(Vec<PatternId>),
    /// `T{field: pat, ...}` or a bare `(pat, pat)` matched against a record.
    Record {
        ty: Option<TypeExprId>,
        fields: Vec<(Name, PatternId)>,
    },
    /// `lo..hi` / `lo..=hi` pattern.
    Range {
        lo: Option<ExprId>,
        hi: Option<ExprId>,
        open: bool,
    },
    /// `a | b | c`
    Or(Vec<PatternId>),
    /// `Variant.Member(inner)` against a tagged union.
    Variant {
        path: Vec<Name>,
        inner: Option<PatternId>,
    },
}
