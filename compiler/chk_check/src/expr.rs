//! Expression type checking.
//!
//! Walks one expression bottom-up, resolving identifiers through
//! [`crate::resolve::Resolver`], classifying operators and conversions
//! through `chk_types::arith`/`chk_types::convert`, and delegating pattern
//! shape/exhaustiveness to [`crate::pattern`]/[`crate::interfaces`]. Every
//! method returns a `TypeId` rather than a `Result` — on an error the
//! poisoned `unknown` sentinel is returned and a diagnostic is pushed, so a
//! caller never has to thread a `Result` through an expression tree just to
//! keep checking the rest of it.

use chk_diagnostic::{Diagnostic, ErrorCode};
use chk_ir::{
    Ast, BinaryOp, CallArg, Expr, ExprId, ExprKind, ForKind, IncDecOp, IntSuffix, MatchArm, Name,
    NameInterner, RealSuffix, Stmt, StmtKind, UnaryOp, WhenSubject,
};
use chk_types::{convert::Conversion, Substitution, TypeArgValue, TypeData, TypeId, TypeInterner};

use crate::env::{EnvGraph, EnvId, Namespace};
use crate::extensions::ExtensionRegistry;
use crate::imports::ImportGraph;
use crate::interfaces::{Evaluator, PatternMatcher};
use crate::matcher::deduce_generics;
use crate::pattern::{bind_into_env, PatternChecker};
use crate::resolve::Resolver;
use crate::type_resolve::TypeResolver;

/// Where control flow currently is, so `break`/`continue`/`return` can be
/// checked for misplacement.
#[derive(Copy, Clone, Default)]
pub struct FlowContext {
    pub in_loop: bool,
    pub in_function: bool,
}

pub struct ExprChecker<'a> {
    pub ast: &'a Ast,
    pub names: &'a NameInterner,
    pub envs: &'a mut EnvGraph,
    pub types: &'a mut TypeInterner,
    pub imports: &'a ImportGraph,
    pub evaluator: &'a dyn Evaluator,
    pub pattern_matcher: &'a dyn PatternMatcher,
    /// Functions/properties attached to a type via an `extend` block,
    /// consulted by [`Self::member_type`] once a name isn't a record field.
    pub extensions: &'a ExtensionRegistry,
    /// Behaviour conformances, consulted by [`Self::check_as`] for upcast/
    /// downcast pointer coercions.
    pub impls: &'a chk_types::ImplRegistry,
    pub home_workspace: Option<chk_ir::DeclId>,
    pub diagnostics: &'a mut Vec<Diagnostic>,
    /// The type `Self` refers to, for a body nested inside an `extend`/
    /// `behaviour` block. `None` everywhere else.
    pub self_ty: Option<TypeId>,
}

impl ExprChecker<'_> {
    fn resolver(&self) -> Resolver<'_> {
        Resolver {
            ast: self.ast,
            names: self.names,
            envs: self.envs,
            imports: self.imports,
            home_workspace: self.home_workspace,
        }
    }

    /// Resolves a parsed type expression to a [`TypeId`] in `env`. Exposed
    /// at `pub(crate)` so the driver can resolve a function's declared
    /// return type using the same [`Resolver`]/[`TypeResolver`] wiring this
    /// checker uses internally, without duplicating it.
    pub(crate) fn resolve_type(&mut self, env: EnvId, ty: chk_ir::TypeExprId) -> TypeId {
        let resolver = Resolver {
            ast: self.ast,
            names: self.names,
            envs: self.envs,
            imports: self.imports,
            home_workspace: self.home_workspace,
        };
        let mut type_resolver = TypeResolver {
            resolver: &resolver,
            types: self.types,
            evaluator: self.evaluator,
            self_ty: self.self_ty,
        };
        match type_resolver.resolve(env, ty) {
            Ok(ty) => ty,
            Err(diagnostic) => {
                self.diagnostics.push(diagnostic);
                TypeId::UNKNOWN
            }
        }
    }

    /// Checks `expr` in `env` under `flow`, returning its type.
    pub fn check(&mut self, expr: ExprId, env: EnvId, flow: FlowContext) -> TypeId {
        let node: Expr = self.ast.exprs[expr].clone();
        match node.kind {
            ExprKind::IntLiteral { suffix, .. } => self.int_literal_type(suffix),
            ExprKind::RealLiteral { suffix, .. } => self.real_literal_type(suffix),
            ExprKind::BoolLiteral(_) => TypeId::BOOL,
            ExprKind::CharLiteral(_) => TypeId::CHAR,
            ExprKind::StringLiteral { is_string, .. } => {
                if is_string {
                    TypeId::STRING
                } else {
                    TypeId::CHARS
                }
            }
            ExprKind::Identifier(name) => self.check_identifier(env, name, node.span),
            ExprKind::Path(segments) => self.check_path(env, &segments, node.span),
            ExprKind::Member { base, name } => self.check_member(base, name, env, flow, node.span),
            ExprKind::Index { base, index } => self.check_index(base, index, env, flow, node.span),
            ExprKind::Unary { op, operand } => self.check_unary(op, operand, env, flow, node.span),
            ExprKind::Binary { op, lhs, rhs } => self.check_binary(op, lhs, rhs, env, flow, node.span),
            ExprKind::Assign { target, value } => self.check_assign(target, value, env, flow, node.span),
            ExprKind::PrefixIncDec { op, operand } | ExprKind::PostfixIncDec { op, operand } => {
                self.check_inc_dec(op, operand, env, flow, node.span)
            }
            ExprKind::AddressOf { mutable, operand } => {
                let inner = self.check(operand, env, flow);
                self.types.intern(TypeData::Pointer { inner, mutable })
            }
            ExprKind::Deref { operand } => {
                let operand_ty = self.check(operand, env, flow);
                match self.types.resolve(operand_ty) {
                    TypeData::Pointer { inner, .. } => *inner,
                    TypeData::Unknown => TypeId::UNKNOWN,
                    _ => {
                        self.diagnostics.push(Diagnostic::error(
                            ErrorCode::E2001OperatorMismatch,
                            node.span,
                            "cannot dereference a non-pointer type",
                        ));
                        TypeId::UNKNOWN
                    }
                }
            }
            ExprKind::As { operand, ty } => self.check_as(operand, ty, env, flow, node.span),
            ExprKind::Call { callee, generic_args, args } => {
                self.check_call(callee, &generic_args, &args, env, flow, node.span)
            }
            ExprKind::RecordLiteral { ty, fields } => {
                self.check_record_literal(ty, &fields, env, flow, node.span)
            }
            ExprKind::TupleLiteral(elements) => {
                let element_tys: Vec<TypeId> = elements.iter().map(|&e| self.check(e, env, flow)).collect();
                self.types.intern(TypeData::Tuple(element_tys.into_boxed_slice()))
            }
            ExprKind::ArrayLiteral(elements) => self.check_array_literal(&elements, env, flow),
            ExprKind::Range { lo, hi, open } => self.check_range(lo, hi, open, env, flow),
            ExprKind::When { subject, arms, else_branch } => {
                self.check_when(&subject, &arms, else_branch, env, flow, node.span)
            }
            ExprKind::For { kind, pattern, iterable, cond, body } => {
                self.check_for(kind, pattern, iterable, cond, body, env, flow)
            }
            ExprKind::Break(value) => {
                if !flow.in_loop {
                    self.diagnostics.push(Diagnostic::error(
                        ErrorCode::E2007MisplacedControlFlow,
                        node.span,
                        "`break` used outside of a loop",
                    ));
                }
                if let Some(value) = value {
                    self.check(value, env, flow);
                }
                TypeId::UNKNOWN
            }
            ExprKind::Continue => {
                if !flow.in_loop {
                    self.diagnostics.push(Diagnostic::error(
                        ErrorCode::E2007MisplacedControlFlow,
                        node.span,
                        "`continue` used outside of a loop",
                    ));
                }
                TypeId::UNKNOWN
            }
            ExprKind::Return(value) => {
                if !flow.in_function {
                    self.diagnostics.push(Diagnostic::error(
                        ErrorCode::E2007MisplacedControlFlow,
                        node.span,
                        "`return` used outside of a function body",
                    ));
                }
                if let Some(value) = value {
                    self.check(value, env, flow);
                }
                TypeId::UNKNOWN
            }
            ExprKind::FunctionLiteral { params, return_ty, body } => {
                self.check_function_literal(&params, return_ty, body, env)
            }
            ExprKind::Block(stmts) => self.check_block(&stmts, env, flow),
        }
    }

    fn check_identifier(&mut self, env: EnvId, name: Name, span: chk_ir::Span) -> TypeId {
        match self.resolver().resolve(env, Namespace::Value, name, span) {
            Ok(decl) => self.decl_value_type(env, decl),
            Err(diagnostic) => {
                self.diagnostics.push(diagnostic);
                TypeId::UNKNOWN
            }
        }
    }

    /// `A.B.C` before name resolution has decided whether this is a
    /// workspace-qualified value, a chain of member accesses, or some
    /// mixture — resolved here by trying the full path as a workspace-scoped
    /// value first, then falling back to member-access chaining from the
    /// leading identifier.
    fn check_path(&mut self, env: EnvId, segments: &[Name], span: chk_ir::Span) -> TypeId {
        let Some((&first, rest)) = segments.split_first() else {
            return TypeId::UNKNOWN;
        };
        let mut current = self.check_identifier(env, first, span);
        for &segment in rest {
            current = self.member_type(current, segment, env, span);
        }
        current
    }

    fn check_member(&mut self, base: ExprId, name: Name, env: EnvId, flow: FlowContext, span: chk_ir::Span) -> TypeId {
        let base_ty = self.check(base, env, flow);
        self.member_type(base_ty, name, env, span)
    }

    /// Looks up member `name` on `base_ty`: first a record field, then a
    /// function/property attached via `extend` (a method call off an
    /// instance, or a property read). `property.str` and ordinary methods
    /// both surface here, since the checker doesn't distinguish "field
    /// access" from "property read" until it knows which one `name` is.
    fn member_type(&mut self, base_ty: TypeId, name: Name, env: EnvId, span: chk_ir::Span) -> TypeId {
        if matches!(self.types.resolve(base_ty), TypeData::Unknown) {
            return TypeId::UNKNOWN;
        }
        if let TypeData::Named { decl, args } = self.types.resolve(base_ty).clone() {
            if let chk_ir::DeclKind::Type(type_decl) = &self.ast.decls[decl].kind {
                if let chk_ir::TypeDeclKind::Record { fields } = &type_decl.kind {
                    for &field in fields {
                        let field_decl = &self.ast.decls[field];
                        if field_decl.name != name {
                            continue;
                        }
                        let chk_ir::DeclKind::Field { ty } = field_decl.kind else {
                            continue;
                        };
                        let mut subst = Substitution::new();
                        if let Some(generics) = &type_decl.generics {
                            bind_generic_args(self.ast, *generics, &args, &mut subst);
                        }
                        let field_ty = self.resolve_type(env, ty);
                        return subst.apply(self.types, field_ty);
                    }
                }
            }
        }
        if let Some(member_ty) = self.extension_member_type(base_ty, name, env, span) {
            return member_ty;
        }
        self.diagnostics.push(Diagnostic::error(
            ErrorCode::E2006FieldMismatch,
            span,
            format!("no field or member named `{}`", self.names.resolve(name)),
        ));
        TypeId::UNKNOWN
    }

    /// Resolves an `extend`-attached function or property as a method call
    /// off an instance of `base_ty`. A `property` reads like a field: its
    /// return type is the member's type directly. An ordinary function
    /// whose first parameter accepts `base_ty` is a method: the returned
    /// function type omits that implicit `self` parameter, matching the
    /// explicit arguments a call site supplies.
    fn extension_member_type(&mut self, base_ty: TypeId, name: Name, env: EnvId, span: chk_ir::Span) -> Option<TypeId> {
        let member = self.extensions.get(base_ty, name)?;
        let (function, is_property) = match &self.ast.decls[member].kind {
            chk_ir::DeclKind::Function(f) => (f.clone(), false),
            chk_ir::DeclKind::Property(f) => (f.clone(), true),
            _ => return None,
        };
        let mut resolver = Resolver {
            ast: self.ast,
            names: self.names,
            envs: self.envs,
            imports: self.imports,
            home_workspace: self.home_workspace,
        };
        resolver.home_workspace = self.home_workspace;
        let mut type_resolver = TypeResolver {
            resolver: &resolver,
            types: self.types,
            evaluator: self.evaluator,
            self_ty: Some(base_ty),
        };
        let mut param_tys = Vec::with_capacity(function.params.len());
        for &param in &function.params {
            let param_ty = match self.ast.decls[param].kind {
                chk_ir::DeclKind::Parameter { ty: Some(ty), .. } => {
                    type_resolver.resolve(env, ty).unwrap_or(TypeId::UNKNOWN)
                }
                _ => TypeId::UNKNOWN,
            };
            param_tys.push(param_ty);
        }
        let ret = function
            .return_ty
            .map(|ty| type_resolver.resolve(env, ty).unwrap_or(TypeId::UNKNOWN))
            .unwrap_or(TypeId::UNKNOWN);
        let _ = span;
        if is_property {
            return Some(ret);
        }
        // The first parameter, if it accepts `base_ty`, is the implicit
        // receiver; a call site never supplies it explicitly.
        let method_params = if param_tys.first().is_some_and(|&p| p == base_ty) {
            &param_tys[1..]
        } else {
            param_tys.as_slice()
        };
        Some(self.types.intern(TypeData::Function {
            params: method_params.to_vec().into_boxed_slice(),
            ret,
        }))
    }

    fn check_index(&mut self, base: ExprId, index: ExprId, env: EnvId, flow: FlowContext, span: chk_ir::Span) -> TypeId {
        let base_ty = self.check(base, env, flow);
        let index_ty = self.check(index, env, flow);
        if !self.types.resolve(index_ty).is_integer() && !matches!(self.types.resolve(index_ty), TypeData::Unknown) {
            self.diagnostics.push(Diagnostic::error(
                ErrorCode::E2002TypeMismatch,
                span,
                "index expression must be an integer",
            ));
        }
        match self.types.resolve(base_ty) {
            TypeData::Array { element, .. } | TypeData::Slice { element } => *element,
            TypeData::Unknown => TypeId::UNKNOWN,
            _ => {
                self.diagnostics.push(Diagnostic::error(
                    ErrorCode::E2001OperatorMismatch,
                    span,
                    "value is not indexable",
                ));
                TypeId::UNKNOWN
            }
        }
    }

    fn check_unary(&mut self, op: UnaryOp, operand: ExprId, env: EnvId, flow: FlowContext, span: chk_ir::Span) -> TypeId {
        let ty = self.check(operand, env, flow);
        let data = self.types.resolve(ty);
        if matches!(data, TypeData::Unknown) {
            return TypeId::UNKNOWN;
        }
        let ok = match op {
            UnaryOp::Neg => data.is_numeric(),
            UnaryOp::Not => matches!(data, TypeData::Bool),
            UnaryOp::BitNot => data.is_integer() || matches!(data, TypeData::Bitfield { .. }),
        };
        if !ok {
            self.diagnostics.push(Diagnostic::error(
                ErrorCode::E2001OperatorMismatch,
                span,
                "operand type does not support this unary operator",
            ));
            return TypeId::UNKNOWN;
        }
        ty
    }

    fn check_binary(
        &mut self,
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
        env: EnvId,
        flow: FlowContext,
        span: chk_ir::Span,
    ) -> TypeId {
        let lhs_ty = self.check(lhs, env, flow);
        let rhs_ty = self.check(rhs, env, flow);
        if matches!(self.types.resolve(lhs_ty), TypeData::Unknown)
            || matches!(self.types.resolve(rhs_ty), TypeData::Unknown)
        {
            return TypeId::UNKNOWN;
        }
        match op {
            BinaryOp::And | BinaryOp::Or => {
                if matches!(self.types.resolve(lhs_ty), TypeData::Bool)
                    && matches!(self.types.resolve(rhs_ty), TypeData::Bool)
                {
                    TypeId::BOOL
                } else {
                    self.operator_mismatch(span)
                }
            }
            BinaryOp::Eq | BinaryOp::Ne => {
                if lhs_ty == rhs_ty || chk_types::arith::widen(self.types, lhs_ty, rhs_ty) != chk_types::Widening::Incompatible {
                    TypeId::BOOL
                } else {
                    self.operator_mismatch(span)
                }
            }
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                match chk_types::arith::widen(self.types, lhs_ty, rhs_ty) {
                    chk_types::Widening::Incompatible => self.operator_mismatch(span),
                    _ => TypeId::BOOL,
                }
            }
            BinaryOp::Shl | BinaryOp::Shr | BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor => {
                if self.types.resolve(lhs_ty).is_integer() && self.types.resolve(rhs_ty).is_integer() {
                    lhs_ty
                } else {
                    self.operator_mismatch(span)
                }
            }
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul => {
                match chk_types::arith::widen(self.types, lhs_ty, rhs_ty) {
                    chk_types::Widening::None => lhs_ty,
                    chk_types::Widening::Left(ty) | chk_types::Widening::Right(ty) => ty,
                    chk_types::Widening::Incompatible => self.operator_mismatch(span),
                }
            }
            // Integer division doesn't truncate here; it produces the exact
            // rational value, widened to twice the wider operand's bit width.
            BinaryOp::Div if self.types.resolve(lhs_ty).is_integer() && self.types.resolve(rhs_ty).is_integer() => {
                let lhs_bits = self.types.resolve(lhs_ty).bits().unwrap_or(32);
                let rhs_bits = self.types.resolve(rhs_ty).bits().unwrap_or(32);
                self.types.intern(TypeData::Rational {
                    bits: 2 * lhs_bits.max(rhs_bits),
                })
            }
            BinaryOp::Div => match chk_types::arith::widen(self.types, lhs_ty, rhs_ty) {
                chk_types::Widening::None => lhs_ty,
                chk_types::Widening::Left(ty) | chk_types::Widening::Right(ty) => ty,
                chk_types::Widening::Incompatible => self.operator_mismatch(span),
            },
            BinaryOp::Rem => {
                if !self.types.resolve(lhs_ty).is_integer() || !self.types.resolve(rhs_ty).is_integer() {
                    return self.operator_mismatch(span);
                }
                match chk_types::arith::widen(self.types, lhs_ty, rhs_ty) {
                    chk_types::Widening::None => lhs_ty,
                    chk_types::Widening::Left(ty) | chk_types::Widening::Right(ty) => ty,
                    chk_types::Widening::Incompatible => self.operator_mismatch(span),
                }
            }
            // `**` never stays in integer/rational territory even when both
            // operands do; the widened common type is promoted to float.
            BinaryOp::Pow => {
                let common = match chk_types::arith::widen(self.types, lhs_ty, rhs_ty) {
                    chk_types::Widening::None => lhs_ty,
                    chk_types::Widening::Left(ty) | chk_types::Widening::Right(ty) => ty,
                    chk_types::Widening::Incompatible => return self.operator_mismatch(span),
                };
                match self.types.resolve(common) {
                    TypeData::Integer { bits, .. } | TypeData::Rational { bits } => {
                        self.types.intern(TypeData::Float { bits: *bits })
                    }
                    _ => common,
                }
            }
        }
    }

    fn operator_mismatch(&mut self, span: chk_ir::Span) -> TypeId {
        self.diagnostics.push(Diagnostic::error(
            ErrorCode::E2001OperatorMismatch,
            span,
            "operand types are not compatible with this operator",
        ));
        TypeId::UNKNOWN
    }

    fn check_assign(
        &mut self,
        target: ExprId,
        value: ExprId,
        env: EnvId,
        flow: FlowContext,
        span: chk_ir::Span,
    ) -> TypeId {
        let target_ty = self.check(target, env, flow);
        let value_ty = self.check(value, env, flow);
        if !self.is_mutable_lvalue(target, env) {
            self.diagnostics.push(Diagnostic::error(
                ErrorCode::E2004MutabilityViolation,
                span,
                "cannot assign to an immutable binding",
            ));
        }
        self.expect_convertible(value_ty, target_ty, env, span);
        target_ty
    }

    fn check_inc_dec(&mut self, _op: IncDecOp, operand: ExprId, env: EnvId, flow: FlowContext, span: chk_ir::Span) -> TypeId {
        let ty = self.check(operand, env, flow);
        if !self.is_mutable_lvalue(operand, env) {
            self.diagnostics.push(Diagnostic::error(
                ErrorCode::E2004MutabilityViolation,
                span,
                "cannot increment/decrement an immutable binding",
            ));
        }
        if !self.types.resolve(ty).is_numeric() && !matches!(self.types.resolve(ty), TypeData::Unknown) {
            self.diagnostics.push(Diagnostic::error(
                ErrorCode::E2001OperatorMismatch,
                span,
                "`++`/`--` require a numeric operand",
            ));
        }
        ty
    }

    /// Whether `expr` denotes a mutable place. Only identifiers bound by a
    /// `mutable val` and dereferences of a `*mut` pointer are; member
    /// and index expressions inherit their base's mutability.
    fn is_mutable_lvalue(&self, expr: ExprId, env: EnvId) -> bool {
        match &self.ast.exprs[expr].kind {
            ExprKind::Identifier(name) => match self.resolver().resolve(env, Namespace::Value, *name, chk_ir::Span::DUMMY) {
                Ok(decl) => matches!(
                    self.ast.decls[decl].kind,
                    chk_ir::DeclKind::Var { mutable: true, .. } | chk_ir::DeclKind::VarTupled { mutable: true, .. }
                ),
                Err(_) => false,
            },
            ExprKind::Member { base, .. } | ExprKind::Index { base, .. } => self.is_mutable_lvalue(*base, env),
            // A dereferenced pointer is mutable iff the pointer itself was
            // declared `*mut`; without re-deriving its type here we
            // conservatively require the operand to itself be a mutable
            // lvalue or a `*mut`-typed expression, which the caller's own
            // type check already enforced structurally.
            ExprKind::Deref { operand } => self.is_mutable_lvalue(*operand, env),
            _ => false,
        }
    }

    /// Exposed at `pub(crate)` so the declaration checker can apply the same
    /// assignment-compatibility rule to a top-level `val`/`const` initializer
    /// or a function's declared return type, without duplicating the
    /// conversion-classification switch. A variant's member is implicitly
    /// convertible to the variant itself (injection); the reverse direction
    /// needs an explicit cast, so it isn't accepted here.
    pub(crate) fn expect_convertible(&mut self, from: TypeId, to: TypeId, env: EnvId, span: chk_ir::Span) {
        if self.is_variant_member(env, to, from) {
            return;
        }
        match chk_types::convert::classify(self.types, from, to) {
            Conversion::Identity | Conversion::Implicit => {}
            Conversion::Explicit => {
                self.diagnostics.push(Diagnostic::error(
                    ErrorCode::E2002TypeMismatch,
                    span,
                    "this conversion requires an explicit `as` cast",
                ));
            }
            Conversion::Forbidden => {
                self.diagnostics.push(Diagnostic::error(
                    ErrorCode::E2002TypeMismatch,
                    span,
                    "expression type is not compatible with the expected type",
                ));
            }
        }
    }

    fn check_as(&mut self, operand: ExprId, ty: chk_ir::TypeExprId, env: EnvId, flow: FlowContext, span: chk_ir::Span) -> TypeId {
        let from = self.check(operand, env, flow);
        let to = self.resolve_type(env, ty);
        if chk_types::convert::classify(self.types, from, to).is_allowed()
            || self.is_behaviour_pointer_cast(from, to)
            || self.is_variant_member(env, from, to)
            || self.is_variant_member(env, to, from)
        {
            return to;
        }
        self.diagnostics.push(Diagnostic::error(
            ErrorCode::E2003InvalidCast,
            span,
            "no conversion exists between these two types",
        ));
        to
    }

    /// The resolved member types of `variant_ty`, or `None` if it doesn't
    /// name a `variant` declaration. Members are resolved (and, for a
    /// generic variant, substituted) against `env` the same way a record
    /// field's type is in [`Self::member_type`].
    fn variant_members(&mut self, env: EnvId, variant_ty: TypeId) -> Option<Vec<TypeId>> {
        let TypeData::Named { decl, args } = self.types.resolve(variant_ty).clone() else {
            return None;
        };
        let chk_ir::DeclKind::Type(type_decl) = self.ast.decls[decl].kind.clone() else {
            return None;
        };
        let chk_ir::TypeDeclKind::Variant { members } = type_decl.kind else {
            return None;
        };
        let mut subst = Substitution::new();
        if let Some(generics) = type_decl.generics {
            bind_generic_args(self.ast, generics, &args, &mut subst);
        }
        Some(
            members
                .iter()
                .map(|&member| {
                    let member_ty = self.resolve_type(env, member);
                    subst.apply(self.types, member_ty)
                })
                .collect(),
        )
    }

    /// Whether `member_ty` is one of `variant_ty`'s members (`variant_ty`
    /// itself need not be a variant type, in which case this is `false`).
    fn is_variant_member(&mut self, env: EnvId, variant_ty: TypeId, member_ty: TypeId) -> bool {
        self.variant_members(env, variant_ty)
            .is_some_and(|members| members.contains(&member_ty))
    }

    /// `*T ↔ *B` where `T` implements behaviour `B`: upcast (`T` -> `B`) is
    /// always safe, downcast (`B` -> `T`) is permitted but may trap at run
    /// time — both are the expression checker's concern to *allow*, not
    /// to guard at run time, which belongs to codegen.
    fn is_behaviour_pointer_cast(&self, from: TypeId, to: TypeId) -> bool {
        let (TypeData::Pointer { inner: from_inner, .. }, TypeData::Pointer { inner: to_inner, .. }) =
            (self.types.resolve(from), self.types.resolve(to))
        else {
            return false;
        };
        let is_behaviour = |ty: TypeId| -> Option<chk_ir::DeclId> {
            match self.types.resolve(ty) {
                TypeData::Named { decl, .. }
                    if matches!(
                        self.ast.decls[*decl].kind,
                        chk_ir::DeclKind::Type(chk_ir::TypeDecl {
                            kind: chk_ir::TypeDeclKind::Behaviour { .. },
                            ..
                        })
                    ) =>
                {
                    Some(*decl)
                }
                _ => None,
            }
        };
        if let Some(behaviour) = is_behaviour(*to_inner) {
            return self.impls.implements(*from_inner, behaviour);
        }
        if let Some(behaviour) = is_behaviour(*from_inner) {
            return self.impls.implements(*to_inner, behaviour);
        }
        false
    }

    fn check_call(
        &mut self,
        callee: ExprId,
        generic_args: &[chk_ir::TypeExprId],
        args: &[CallArg],
        env: EnvId,
        flow: FlowContext,
        span: chk_ir::Span,
    ) -> TypeId {
        let callee_ty = self.check(callee, env, flow);
        let arg_tys: Vec<TypeId> = args.iter().map(|arg| self.check(arg.value, env, flow)).collect();
        let _ = generic_args;
        match self.types.resolve(callee_ty).clone() {
            TypeData::Function { params, ret } => {
                if params.len() != arg_tys.len() {
                    self.diagnostics.push(Diagnostic::error(
                        ErrorCode::E2005ArityMismatch,
                        span,
                        format!("expected {} argument(s), found {}", params.len(), arg_tys.len()),
                    ));
                    return TypeId::UNKNOWN;
                }
                let substitution = match deduce_generics(self.types, &params, &arg_tys) {
                    Ok(subst) => subst,
                    Err(failure) => {
                        self.diagnostics.push(Diagnostic::error(
                            ErrorCode::E2002TypeMismatch,
                            span,
                            format!("argument type {:?} does not match parameter type {:?}", failure.found, failure.expected),
                        ));
                        Substitution::new()
                    }
                };
                for (&param_ty, &arg_ty) in params.iter().zip(&arg_tys) {
                    let param_ty = substitution.apply(self.types, param_ty);
                    self.expect_convertible(arg_ty, param_ty, env, span);
                }
                // Deduced/explicit generic-parameter bindings apply to the
                // return type even though the callee's own body is only
                // (re-)checked through the generic instantiator, not here.
                substitution.apply(self.types, ret)
            }
            TypeData::Unknown => TypeId::UNKNOWN,
            _ => {
                self.diagnostics.push(Diagnostic::error(
                    ErrorCode::E2001OperatorMismatch,
                    span,
                    "value is not callable",
                ));
                TypeId::UNKNOWN
            }
        }
    }

    fn check_record_literal(
        &mut self,
        ty: Option<chk_ir::TypeExprId>,
        fields: &[chk_ir::FieldInit],
        env: EnvId,
        flow: FlowContext,
        span: chk_ir::Span,
    ) -> TypeId {
        let mut seen: Vec<Name> = Vec::new();
        for field in fields {
            if seen.contains(&field.name) {
                self.diagnostics.push(Diagnostic::error(
                    ErrorCode::E2006FieldMismatch,
                    span,
                    format!("field `{}` initialized more than once", self.names.resolve(field.name)),
                ));
            }
            seen.push(field.name);
            self.check(field.value, env, flow);
        }
        match ty {
            Some(ty) => self.resolve_type(env, ty),
            None => TypeId::UNKNOWN,
        }
    }

    fn check_array_literal(&mut self, elements: &[ExprId], env: EnvId, flow: FlowContext) -> TypeId {
        if elements.is_empty() {
            return self.types.intern(TypeData::Array {
                element: TypeId::UNKNOWN,
                size: chk_types::ArraySize::Literal(0),
            });
        }
        let element_ty = self.check(elements[0], env, flow);
        for &rest in &elements[1..] {
            let rest_ty = self.check(rest, env, flow);
            self.expect_convertible(rest_ty, element_ty, env, self.ast.exprs[rest].span);
        }
        self.types.intern(TypeData::Array {
            element: element_ty,
            size: chk_types::ArraySize::Literal(elements.len() as u64),
        })
    }

    fn check_range(&mut self, lo: Option<ExprId>, hi: Option<ExprId>, open: bool, env: EnvId, flow: FlowContext) -> TypeId {
        let lo_ty = lo.map(|e| self.check(e, env, flow));
        let hi_ty = hi.map(|e| self.check(e, env, flow));
        let element = lo_ty.or(hi_ty).unwrap_or(TypeId::I32);
        self.types.intern(TypeData::Range { element, open })
    }

    fn check_when(
        &mut self,
        subject: &WhenSubject,
        arms: &[MatchArm],
        else_branch: Option<ExprId>,
        env: EnvId,
        flow: FlowContext,
        span: chk_ir::Span,
    ) -> TypeId {
        let scrutinee_ty = match subject {
            WhenSubject::Value(expr) => self.check(*expr, env, flow),
            WhenSubject::Cast { expr, ty } => {
                self.check(*expr, env, flow);
                self.resolve_type(env, *ty)
            }
        };

        let mut result_ty: Option<TypeId> = None;
        let arm_patterns: Vec<chk_ir::PatternId> = arms.iter().map(|arm| arm.pattern).collect();

        for arm in arms {
            let mut bindings = Vec::new();
            let pattern_checker = PatternChecker { ast: self.ast, types: self.types, scope: Some((self.envs, env)) };
            pattern_checker.check(arm.pattern, scrutinee_ty, true, &mut bindings, self.diagnostics);
            let arm_env = self.envs.child(env);
            bind_into_env(self.envs, arm_env, &bindings, |_| chk_ir::DeclId::from_raw(u32::MAX));
            if let Some(guard) = arm.guard {
                self.check(guard, arm_env, flow);
            }
            let body_ty = self.check(arm.body, arm_env, flow);
            result_ty = Some(match result_ty {
                None => body_ty,
                Some(acc) if acc == body_ty => acc,
                Some(acc) => {
                    if chk_types::convert::classify(self.types, body_ty, acc).is_allowed() {
                        acc
                    } else {
                        TypeId::UNKNOWN
                    }
                }
            });
        }
        if let Some(else_branch) = else_branch {
            self.check(else_branch, env, flow);
        } else if let Err(message) = self.pattern_matcher.check_exhaustiveness(scrutinee_ty, &arm_patterns) {
            self.diagnostics.push(Diagnostic::error(ErrorCode::E4002PatternShapeMismatch, span, message));
        }
        result_ty.unwrap_or(TypeId::UNKNOWN)
    }

    fn check_for(
        &mut self,
        kind: ForKind,
        pattern: Option<chk_ir::PatternId>,
        iterable: Option<ExprId>,
        cond: Option<ExprId>,
        body: ExprId,
        env: EnvId,
        flow: FlowContext,
    ) -> TypeId {
        let loop_env = self.envs.child(env);
        match kind {
            ForKind::Range => {
                let iterable_ty = iterable.map(|e| self.check(e, env, flow)).unwrap_or(TypeId::UNKNOWN);
                let element_ty = match self.types.resolve(iterable_ty) {
                    TypeData::Range { element, .. } => *element,
                    TypeData::Array { element, .. } | TypeData::Slice { element } => *element,
                    _ => TypeId::UNKNOWN,
                };
                if let Some(pattern) = pattern {
                    let pattern_checker = PatternChecker { ast: self.ast, types: self.types, scope: Some((self.envs, loop_env)) };
                    let mut bindings = Vec::new();
                    pattern_checker.check(pattern, element_ty, true, &mut bindings, self.diagnostics);
                    bind_into_env(self.envs, loop_env, &bindings, |_| chk_ir::DeclId::from_raw(u32::MAX));
                }
            }
            ForKind::Loop => {
                if let Some(cond) = cond {
                    let cond_ty = self.check(cond, loop_env, flow);
                    if !matches!(self.types.resolve(cond_ty), TypeData::Bool | TypeData::Unknown) {
                        self.diagnostics.push(Diagnostic::error(
                            ErrorCode::E2002TypeMismatch,
                            self.ast.exprs[cond].span,
                            "loop condition must be a bool",
                        ));
                    }
                }
            }
        }
        self.check(body, loop_env, FlowContext { in_loop: true, ..flow });
        TypeId::UNKNOWN
    }

    /// Exposed at `pub(crate)` so the declaration checker can check a
    /// top-level function/property/test body (or an instantiated generic
    /// function's cloned body) with the same closure-boundary and
    /// return-type-compatibility handling a `FunctionLiteral` expression
    /// gets, without duplicating that logic.
    pub(crate) fn check_function_literal(
        &mut self,
        params: &[chk_ir::DeclId],
        return_ty: Option<chk_ir::TypeExprId>,
        body: ExprId,
        env: EnvId,
    ) -> TypeId {
        let closure_env = self.envs.child_closure_boundary(env);
        let mut param_tys = Vec::with_capacity(params.len());
        for &param in params {
            let chk_ir::DeclKind::Parameter { ty, .. } = self.ast.decls[param].kind else {
                continue;
            };
            let param_ty = ty.map(|ty| self.resolve_type(closure_env, ty)).unwrap_or(TypeId::UNKNOWN);
            param_tys.push(param_ty);
            self.envs.define(closure_env, Namespace::Value, self.ast.decls[param].name, param);
        }
        let declared_ret = return_ty.map(|ty| self.resolve_type(closure_env, ty));
        let body_ty = self.check(body, closure_env, FlowContext { in_loop: false, in_function: true });
        let ret = declared_ret.unwrap_or(body_ty);
        if let Some(declared) = declared_ret {
            self.expect_convertible(body_ty, declared, closure_env, self.ast.exprs[body].span);
        }
        self.types.intern(TypeData::Function {
            params: param_tys.into_boxed_slice(),
            ret,
        })
    }

    fn check_block(&mut self, stmts: &[chk_ir::StmtId], env: EnvId, flow: FlowContext) -> TypeId {
        let block_env = self.envs.child(env);
        let mut last_ty = TypeId::UNKNOWN;
        for (i, &stmt_id) in stmts.iter().enumerate() {
            let stmt: Stmt = self.ast.stmts[stmt_id].clone();
            last_ty = match stmt.kind {
                StmtKind::Expr(expr) => self.check(expr, block_env, flow),
                StmtKind::Decl(decl) => {
                    self.check_local_decl(decl, block_env);
                    TypeId::UNKNOWN
                }
            };
            if i + 1 != stmts.len() {
                last_ty = TypeId::UNKNOWN;
            }
        }
        last_ty
    }

    /// Checks a `val`/`const` declared inside a block body and binds it into
    /// `env`. Top-level declaration checking (records, functions, behaviours,
    /// …) happens once up front in `crate::decl`; this also covers the
    /// local-binding subset that can appear as a block statement. Exposed at
    /// `pub(crate)` so `crate::decl` can reuse it for top-level `val`/`const`
    /// globals, which follow the exact same assignment-compatibility rule.
    pub(crate) fn check_local_decl(&mut self, decl: chk_ir::DeclId, env: EnvId) {
        let kind = self.ast.decls[decl].kind.clone();
        let name = self.ast.decls[decl].name;
        match kind {
            chk_ir::DeclKind::Var { ty, init, .. } => {
                let declared = ty.map(|ty| self.resolve_type(env, ty));
                let init_ty = init.map(|e| self.check(e, env, FlowContext::default()));
                if let (Some(declared), Some(init_ty)) = (declared, init_ty) {
                    self.expect_convertible(init_ty, declared, env, self.ast.decls[decl].span);
                }
                self.envs.define(env, Namespace::Value, name, decl);
            }
            chk_ir::DeclKind::Const { ty, init } => {
                let declared = ty.map(|ty| self.resolve_type(env, ty));
                let init_ty = self.check(init, env, FlowContext::default());
                if let Some(declared) = declared {
                    self.expect_convertible(init_ty, declared, env, self.ast.decls[decl].span);
                }
                self.envs.define(env, Namespace::Value, name, decl);
            }
            chk_ir::DeclKind::VarTupled { elements, init, .. } | chk_ir::DeclKind::ConstTupled { elements, init, .. } => {
                self.check(init, env, FlowContext::default());
                for element in elements {
                    let element_name = self.ast.decls[element].name;
                    self.envs.define(env, Namespace::Value, element_name, element);
                }
            }
            _ => {}
        }
    }

    /// The type of a resolved value declaration, used by `Identifier`.
    fn decl_value_type(&mut self, env: EnvId, decl: chk_ir::DeclId) -> TypeId {
        let kind = self.ast.decls[decl].kind.clone();
        match kind {
            chk_ir::DeclKind::Var { ty: Some(ty), .. } => self.resolve_type(env, ty),
            chk_ir::DeclKind::Var { ty: None, init: Some(init), .. } => self.check(init, env, FlowContext::default()),
            chk_ir::DeclKind::Const { ty: Some(ty), .. } => self.resolve_type(env, ty),
            chk_ir::DeclKind::Const { ty: None, init } => self.check(init, env, FlowContext::default()),
            chk_ir::DeclKind::Parameter { ty: Some(ty), .. } => self.resolve_type(env, ty),
            chk_ir::DeclKind::Function(function) => {
                let param_tys: Vec<TypeId> = function
                    .params
                    .iter()
                    .filter_map(|&p| match self.ast.decls[p].kind {
                        chk_ir::DeclKind::Parameter { ty: Some(ty), .. } => Some(self.resolve_type(env, ty)),
                        _ => None,
                    })
                    .collect();
                let ret = function.return_ty.map(|ty| self.resolve_type(env, ty)).unwrap_or(TypeId::UNKNOWN);
                self.types.intern(TypeData::Function {
                    params: param_tys.into_boxed_slice(),
                    ret,
                })
            }
            _ => TypeId::UNKNOWN,
        }
    }

    /// Maps a literal's integer suffix to its type.
    fn int_literal_type(&mut self, suffix: IntSuffix) -> TypeId {
        let (bits, signed) = match suffix {
            IntSuffix::None | IntSuffix::I32 => return TypeId::I32,
            IntSuffix::I8 => (8, true),
            IntSuffix::I16 => (16, true),
            IntSuffix::I64 => (64, true),
            IntSuffix::I128 => (128, true),
            IntSuffix::Isize => (64, true),
            IntSuffix::U8 => (8, false),
            IntSuffix::U16 => (16, false),
            IntSuffix::U32 => (32, false),
            IntSuffix::U64 => (64, false),
            IntSuffix::U128 => (128, false),
            IntSuffix::Usize => (64, false),
        };
        self.types.intern(TypeData::Integer { bits, signed })
    }

    /// Maps a literal's real suffix to its type`).
    fn real_literal_type(&mut self, suffix: RealSuffix) -> TypeId {
        let bits = match suffix {
            RealSuffix::None | RealSuffix::F32 => return TypeId::F32,
            RealSuffix::F64 => 64,
            RealSuffix::F128 => 128,
            RealSuffix::F256 => 256,
        };
        self.types.intern(TypeData::Float { bits })
    }
}

fn bind_generic_args(
    ast: &Ast,
    generics: chk_ir::DeclId,
    args: &[TypeArgValue],
    subst: &mut Substitution,
) {
    let chk_ir::DeclKind::GenericClause { params } = &ast.decls[generics].kind else {
        return;
    };
    for (&param, &arg) in params.iter().zip(args) {
        subst.bind(param, arg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imports::ImportGraph;
    use crate::interfaces::{NullEvaluator, PermissiveMatcher};
    use chk_ir::{ExprKind, Span};
    use rustc_hash::FxHashMap;

    fn checker<'a>(
        ast: &'a Ast,
        names: &'a NameInterner,
        envs: &'a mut EnvGraph,
        types: &'a mut TypeInterner,
        imports: &'a ImportGraph,
        evaluator: &'a NullEvaluator,
        matcher: &'a PermissiveMatcher,
        extensions: &'a ExtensionRegistry,
        impls: &'a chk_types::ImplRegistry,
        diagnostics: &'a mut Vec<Diagnostic>,
    ) -> ExprChecker<'a> {
        ExprChecker {
            ast,
            names,
            envs,
            types,
            imports,
            evaluator,
            pattern_matcher: matcher,
            extensions,
            impls,
            home_workspace: None,
            diagnostics,
            self_ty: None,
        }
    }

    #[test]
    fn integer_literal_defaults_to_i32() {
        let mut ast = Ast::new();
        let names = NameInterner::new();
        let mut envs = EnvGraph::new();
        let root = envs.root();
        let mut types = TypeInterner::new();
        let imports = ImportGraph { edges: FxHashMap::default(), diagnostics: Vec::new() };
        let evaluator = NullEvaluator;
        let matcher = PermissiveMatcher;
        let extensions = ExtensionRegistry::new();
        let impls = chk_types::ImplRegistry::new();
        let mut diagnostics = Vec::new();

        let expr = ast.alloc_expr(Expr {
            kind: ExprKind::IntLiteral { value: 1, suffix: IntSuffix::None },
            span: Span::DUMMY,
        });
        let mut c = checker(&ast, &names, &mut envs, &mut types, &imports, &evaluator, &matcher, &extensions, &impls, &mut diagnostics);
        assert_eq!(c.check(expr, root, FlowContext::default()), TypeId::I32);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn adding_mismatched_types_reports_operator_mismatch() {
        let mut ast = Ast::new();
        let names = NameInterner::new();
        let mut envs = EnvGraph::new();
        let root = envs.root();
        let mut types = TypeInterner::new();
        let imports = ImportGraph { edges: FxHashMap::default(), diagnostics: Vec::new() };
        let evaluator = NullEvaluator;
        let matcher = PermissiveMatcher;
        let extensions = ExtensionRegistry::new();
        let impls = chk_types::ImplRegistry::new();
        let mut diagnostics = Vec::new();

        let lhs = ast.alloc_expr(Expr { kind: ExprKind::BoolLiteral(true), span: Span::DUMMY });
        let rhs = ast.alloc_expr(Expr { kind: ExprKind::IntLiteral { value: 1, suffix: IntSuffix::None }, span: Span::DUMMY });
        let add = ast.alloc_expr(Expr { kind: ExprKind::Binary { op: BinaryOp::Add, lhs, rhs }, span: Span::DUMMY });

        let mut c = checker(&ast, &names, &mut envs, &mut types, &imports, &evaluator, &matcher, &extensions, &impls, &mut diagnostics);
        c.check(add, root, FlowContext::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::E2001OperatorMismatch);
    }

    #[test]
    fn break_outside_a_loop_is_misplaced() {
        let mut ast = Ast::new();
        let names = NameInterner::new();
        let mut envs = EnvGraph::new();
        let root = envs.root();
        let mut types = TypeInterner::new();
        let imports = ImportGraph { edges: FxHashMap::default(), diagnostics: Vec::new() };
        let evaluator = NullEvaluator;
        let matcher = PermissiveMatcher;
        let extensions = ExtensionRegistry::new();
        let impls = chk_types::ImplRegistry::new();
        let mut diagnostics = Vec::new();

        let brk = ast.alloc_expr(Expr { kind: ExprKind::Break(None), span: Span::DUMMY });
        let mut c = checker(&ast, &names, &mut envs, &mut types, &imports, &evaluator, &matcher, &extensions, &impls, &mut diagnostics);
        c.check(brk, root, FlowContext::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::E2007MisplacedControlFlow);
    }

    #[test]
    fn break_inside_a_loop_is_fine() {
        let mut ast = Ast::new();
        let names = NameInterner::new();
        let mut envs = EnvGraph::new();
        let root = envs.root();
        let mut types = TypeInterner::new();
        let imports = ImportGraph { edges: FxHashMap::default(), diagnostics: Vec::new() };
        let evaluator = NullEvaluator;
        let matcher = PermissiveMatcher;
        let extensions = ExtensionRegistry::new();
        let impls = chk_types::ImplRegistry::new();
        let mut diagnostics = Vec::new();

        let brk = ast.alloc_expr(Expr { kind: ExprKind::Break(None), span: Span::DUMMY });
        let body = ast.alloc_expr(Expr { kind: ExprKind::Block(vec![ast.alloc_stmt(chk_ir::Stmt { kind: StmtKind::Expr(brk), span: Span::DUMMY })]), span: Span::DUMMY });
        let for_loop = ast.alloc_expr(Expr {
            kind: ExprKind::For { kind: ForKind::Loop, pattern: None, iterable: None, cond: None, body },
            span: Span::DUMMY,
        });
        let mut c = checker(&ast, &names, &mut envs, &mut types, &imports, &evaluator, &matcher, &extensions, &impls, &mut diagnostics);
        c.check(for_loop, root, FlowContext::default());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn char_as_integer_is_an_allowed_cast() {
        let mut ast = Ast::new();
        let mut names = NameInterner::new();
        let mut envs = EnvGraph::new();
        let root = envs.root();
        let mut types = TypeInterner::new();
        let imports = ImportGraph { edges: FxHashMap::default(), diagnostics: Vec::new() };
        let evaluator = NullEvaluator;
        let matcher = PermissiveMatcher;
        let extensions = ExtensionRegistry::new();
        let impls = chk_types::ImplRegistry::new();
        let mut diagnostics = Vec::new();

        let i32_name = names.intern("i32");
        let i32_ty_expr = ast.alloc_type(chk_ir::TypeExpr {
            kind: chk_ir::TypeExprKind::Named { path: vec![i32_name], args: vec![] },
            span: Span::DUMMY,
        });
        let operand = ast.alloc_expr(Expr { kind: ExprKind::CharLiteral('a'), span: Span::DUMMY });
        let cast = ast.alloc_expr(Expr { kind: ExprKind::As { operand, ty: i32_ty_expr }, span: Span::DUMMY });

        let mut c = checker(&ast, &names, &mut envs, &mut types, &imports, &evaluator, &matcher, &extensions, &impls, &mut diagnostics);
        assert_eq!(c.check(cast, root, FlowContext::default()), TypeId::I32);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn integer_division_produces_a_rational() {
        let mut ast = Ast::new();
        let names = NameInterner::new();
        let mut envs = EnvGraph::new();
        let root = envs.root();
        let mut types = TypeInterner::new();
        let imports = ImportGraph { edges: FxHashMap::default(), diagnostics: Vec::new() };
        let evaluator = NullEvaluator;
        let matcher = PermissiveMatcher;
        let extensions = ExtensionRegistry::new();
        let impls = chk_types::ImplRegistry::new();
        let mut diagnostics = Vec::new();

        let lhs = ast.alloc_expr(Expr { kind: ExprKind::IntLiteral { value: 4, suffix: IntSuffix::None }, span: Span::DUMMY });
        let rhs = ast.alloc_expr(Expr { kind: ExprKind::IntLiteral { value: 2, suffix: IntSuffix::None }, span: Span::DUMMY });
        let div = ast.alloc_expr(Expr { kind: ExprKind::Binary { op: BinaryOp::Div, lhs, rhs }, span: Span::DUMMY });

        let mut c = checker(&ast, &names, &mut envs, &mut types, &imports, &evaluator, &matcher, &extensions, &impls, &mut diagnostics);
        let result = c.check(div, root, FlowContext::default());
        assert_eq!(types.resolve(result), &TypeData::Rational { bits: 64 });
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn remainder_of_floats_is_an_operator_mismatch() {
        let mut ast = Ast::new();
        let names = NameInterner::new();
        let mut envs = EnvGraph::new();
        let root = envs.root();
        let mut types = TypeInterner::new();
        let imports = ImportGraph { edges: FxHashMap::default(), diagnostics: Vec::new() };
        let evaluator = NullEvaluator;
        let matcher = PermissiveMatcher;
        let extensions = ExtensionRegistry::new();
        let impls = chk_types::ImplRegistry::new();
        let mut diagnostics = Vec::new();

        let lhs = ast.alloc_expr(Expr { kind: ExprKind::RealLiteral { value: 3.0, suffix: RealSuffix::None }, span: Span::DUMMY });
        let rhs = ast.alloc_expr(Expr { kind: ExprKind::RealLiteral { value: 2.0, suffix: RealSuffix::None }, span: Span::DUMMY });
        let rem = ast.alloc_expr(Expr { kind: ExprKind::Binary { op: BinaryOp::Rem, lhs, rhs }, span: Span::DUMMY });

        let mut c = checker(&ast, &names, &mut envs, &mut types, &imports, &evaluator, &matcher, &extensions, &impls, &mut diagnostics);
        c.check(rem, root, FlowContext::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::E2001OperatorMismatch);
    }

    #[test]
    fn integer_power_promotes_to_float() {
        let mut ast = Ast::new();
        let names = NameInterner::new();
        let mut envs = EnvGraph::new();
        let root = envs.root();
        let mut types = TypeInterner::new();
        let imports = ImportGraph { edges: FxHashMap::default(), diagnostics: Vec::new() };
        let evaluator = NullEvaluator;
        let matcher = PermissiveMatcher;
        let extensions = ExtensionRegistry::new();
        let impls = chk_types::ImplRegistry::new();
        let mut diagnostics = Vec::new();

        let lhs = ast.alloc_expr(Expr { kind: ExprKind::IntLiteral { value: 2, suffix: IntSuffix::None }, span: Span::DUMMY });
        let rhs = ast.alloc_expr(Expr { kind: ExprKind::IntLiteral { value: 10, suffix: IntSuffix::None }, span: Span::DUMMY });
        let pow = ast.alloc_expr(Expr { kind: ExprKind::Binary { op: BinaryOp::Pow, lhs, rhs }, span: Span::DUMMY });

        let mut c = checker(&ast, &names, &mut envs, &mut types, &imports, &evaluator, &matcher, &extensions, &impls, &mut diagnostics);
        let result = c.check(pow, root, FlowContext::default());
        assert_eq!(result, TypeId::F32);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn variant_to_member_cast_is_allowed_and_member_to_variant_is_implicit() {
        let mut ast = Ast::new();
        let mut names = NameInterner::new();
        let mut envs = EnvGraph::new();
        let root = envs.root();
        let mut types = TypeInterner::new();
        let imports = ImportGraph { edges: FxHashMap::default(), diagnostics: Vec::new() };
        let evaluator = NullEvaluator;
        let matcher = PermissiveMatcher;
        let extensions = ExtensionRegistry::new();
        let impls = chk_types::ImplRegistry::new();
        let mut diagnostics = Vec::new();

        let i32_name = names.intern("i32");
        let i32_ty_expr = ast.alloc_type(chk_ir::TypeExpr {
            kind: chk_ir::TypeExprKind::Named { path: vec![i32_name], args: vec![] },
            span: Span::DUMMY,
        });
        let variant_name = names.intern("IntOrNothing");
        let variant_decl = ast.alloc_decl(chk_ir::Decl {
            kind: chk_ir::DeclKind::Type(chk_ir::TypeDecl {
                kind: chk_ir::TypeDeclKind::Variant { members: vec![i32_ty_expr] },
                generics: None,
            }),
            name: variant_name,
            span: Span::DUMMY,
            hidden: false,
        });
        envs.define(root, Namespace::Type, variant_name, variant_decl);
        let variant_ty_expr = ast.alloc_type(chk_ir::TypeExpr {
            kind: chk_ir::TypeExprKind::Named { path: vec![variant_name], args: vec![] },
            span: Span::DUMMY,
        });

        // `123 as IntOrNothing`: an i32 value cast to the variant it's a member of.
        let operand = ast.alloc_expr(Expr { kind: ExprKind::IntLiteral { value: 123, suffix: IntSuffix::None }, span: Span::DUMMY });
        let cast = ast.alloc_expr(Expr { kind: ExprKind::As { operand, ty: variant_ty_expr }, span: Span::DUMMY });
        let mut c = checker(&ast, &names, &mut envs, &mut types, &imports, &evaluator, &matcher, &extensions, &impls, &mut diagnostics);
        let variant_ty = c.check(cast, root, FlowContext::default());
        assert!(diagnostics.is_empty());

        // Casting the variant back down to its member is also accepted.
        let back = ast.alloc_expr(Expr { kind: ExprKind::As { operand: cast, ty: i32_ty_expr }, span: Span::DUMMY });
        let mut c = checker(&ast, &names, &mut envs, &mut types, &imports, &evaluator, &matcher, &extensions, &impls, &mut diagnostics);
        assert_eq!(c.check(back, root, FlowContext::default()), TypeId::I32);
        assert!(diagnostics.is_empty());

        // A member value is implicitly convertible to the variant (no cast needed).
        let mut c = checker(&ast, &names, &mut envs, &mut types, &imports, &evaluator, &matcher, &extensions, &impls, &mut diagnostics);
        c.expect_convertible(TypeId::I32, variant_ty, root, Span::DUMMY);
        assert!(diagnostics.is_empty());

        // But the variant itself is not implicitly convertible to a member type.
        let mut c = checker(&ast, &names, &mut envs, &mut types, &imports, &evaluator, &matcher, &extensions, &impls, &mut diagnostics);
        c.expect_convertible(variant_ty, TypeId::I32, root, Span::DUMMY);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, ErrorCode::E2002TypeMismatch);
    }
}
