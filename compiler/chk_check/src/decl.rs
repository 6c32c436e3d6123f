//! Declaration checking: the four per-workspace passes, and generic
//! instantiation triggered on demand from them.
//!
//! Pass 1 ([`DeclChecker::register_names`]) puts every top-level name in
//! scope. Pass 2 ([`DeclChecker::visit_extend_headers`]) resolves each
//! `extend` block's target and registers its members, without checking
//! bodies yet — a later member's signature may need an earlier extend's
//! member in scope. Pass 3 ([`DeclChecker::build_types_and_consts`]) builds
//! types and constants, then checks extend bodies and behaviour
//! conformance. Pass 4 ([`DeclChecker::check_functions_and_vars`]) checks
//! every remaining function, test, and variable body. `crate::driver` runs
//! these four passes per workspace; this module doesn't know about
//! workspaces as a set, only about the one it's handed.

use rustc_hash::FxHashMap;

use chk_diagnostic::{Diagnostic, ErrorCode};
use chk_ir::visitor::{walk_expr, ExprVisitor};
use chk_ir::{Ast, Decl, DeclId, DeclKind, ExprId, Name, NameInterner, Span, TypeDeclKind, TypeExprId};
use chk_types::{ArraySize, ImplRegistry, TypeArgValue, TypeData, TypeId, TypeInterner};

use crate::annotation::AnnotationTable;
use crate::concepts::unsatisfied_prototypes;
use crate::cycles::find_unboxed_cycle;
use crate::env::{EnvGraph, EnvId, Namespace};
use crate::expr::ExprChecker;
use crate::extensions::ExtensionRegistry;
use crate::generics::Instantiator;
use crate::imports::ImportGraph;
use crate::interfaces::{Evaluator, PatternMatcher};
use crate::resolve::Resolver;
use crate::subst_ast::{clone_decl, TypeSubst};
use crate::type_resolve::TypeResolver;
use crate::unparse::{const_to_expr, type_to_expr};

/// Every declaration checker needs the same dozen collaborators; bundling
/// them here is what lets pass 1-4 and the two instantiation entry points
/// share one borrow instead of sixteen parameters apiece.
pub struct DeclChecker<'a> {
    pub ast: &'a mut Ast,
    pub names: &'a mut NameInterner,
    pub envs: &'a mut EnvGraph,
    pub types: &'a mut TypeInterner,
    pub imports: &'a ImportGraph,
    pub extensions: &'a mut ExtensionRegistry,
    pub impls: &'a mut ImplRegistry,
    pub evaluator: &'a dyn Evaluator,
    pub pattern_matcher: &'a dyn PatternMatcher,
    pub instantiator: &'a mut Instantiator,
    pub annotations: &'a mut AnnotationTable,
    pub diagnostics: &'a mut Vec<Diagnostic>,
    pub home_workspace: Option<DeclId>,
    /// Generic type declaration -> the fully-parametric `extend` blocks
    /// registered against its own (unsubstituted) generic parameters,
    /// found in pass 2. Consulted by [`Self::instantiate_type`].
    pub generic_extend_blocks: &'a mut FxHashMap<DeclId, Vec<DeclId>>,
    /// `(workspace, mangled concept application)` -> whether the concept
    /// held, for applications with no remaining generic parameter in their
    /// argument. A test against a non-concrete argument is never consulted
    /// or stored here — see [`Self::check_concept_bound`].
    pub concept_cache: &'a mut FxHashMap<(DeclId, String), bool>,
}

impl<'a> DeclChecker<'a> {
    fn resolver(&self) -> Resolver<'_> {
        Resolver {
            ast: self.ast,
            names: self.names,
            envs: self.envs,
            imports: self.imports,
            home_workspace: self.home_workspace,
        }
    }

    fn resolve_type(&mut self, env: EnvId, self_ty: Option<TypeId>, ty: TypeExprId) -> TypeId {
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
            self_ty,
        };
        match type_resolver.resolve(env, ty) {
            Ok(ty) => ty,
            Err(diagnostic) => {
                self.diagnostics.push(diagnostic);
                TypeId::UNKNOWN
            }
        }
    }

    fn expr_checker(&mut self, self_ty: Option<TypeId>) -> ExprChecker<'_> {
        ExprChecker {
            ast: self.ast,
            names: self.names,
            envs: self.envs,
            types: self.types,
            imports: self.imports,
            evaluator: self.evaluator,
            pattern_matcher: self.pattern_matcher,
            extensions: self.extensions,
            impls: self.impls,
            home_workspace: self.home_workspace,
            diagnostics: self.diagnostics,
            self_ty,
        }
    }

    /// Resolves a declared type annotation and, if it names a generic type
    /// with concrete arguments, instantiates it so its members are in
    /// `extensions` before anything tries to access them. Only var/const
    /// annotations route through this; a generic type produced purely by
    /// expression-level inference inside a body is not instantiated here.
    fn note_and_instantiate(&mut self, workspace: DeclId, env: EnvId, ty_expr: TypeExprId, span: Span) {
        let ty = self.resolve_type(env, None, ty_expr);
        if let TypeData::Named { decl, args } = self.types.resolve(ty).clone() {
            let generic = matches!(&self.ast.decls[decl].kind, DeclKind::Type(t) if t.generics.is_some());
            if generic && !args.is_empty() {
                let _ = self.instantiate_type(workspace, env, decl, &args, span);
            }
        }
    }

    // ---- Pass 1: register every top-level name ----------------------

    /// Binds every item's name into its namespace, and records the unique
    /// program-wide `start` entry point candidate, if any.
    pub fn register_names(&mut self, env: EnvId, items: &[DeclId], entry_point: &mut Option<(DeclId, Span)>) {
        for &item in items {
            let decl: Decl = self.ast.decls[item].clone();
            let ns = match &decl.kind {
                DeclKind::Type(_) => Some(Namespace::Type),
                DeclKind::Concept(_) => Some(Namespace::Concept),
                DeclKind::Function(_) | DeclKind::Extern { .. } => Some(Namespace::Function),
                DeclKind::Var { .. } | DeclKind::Const { .. } => Some(Namespace::Value),
                DeclKind::VarTupled { elements, .. } | DeclKind::ConstTupled { elements, .. } => {
                    for &element in elements {
                        let element_name = self.ast.decls[element].name;
                        self.envs.define(env, Namespace::Value, element_name, element);
                    }
                    None
                }
                _ => None,
            };
            if let Some(ns) = ns {
                if let Some(previous) = self.envs.define(env, ns, decl.name, item) {
                    self.diagnostics.push(
                        Diagnostic::error(
                            ErrorCode::E1007DuplicateDefinition,
                            decl.span,
                            format!("`{}` is already defined in this scope", self.names.resolve(decl.name)),
                        )
                        .with_highlight(self.ast.decls[previous].span, "previously defined here"),
                    );
                }
            }
            if matches!(decl.kind, DeclKind::Function(_)) && self.names.resolve(decl.name) == "start" {
                match entry_point {
                    Some((_, first_span)) => {
                        self.diagnostics.push(
                            Diagnostic::error(
                                ErrorCode::E2009InvalidEntryPoint,
                                decl.span,
                                "`start` is declared more than once",
                            )
                            .with_highlight(*first_span, "first declared here"),
                        );
                    }
                    None => *entry_point = Some((item, decl.span)),
                }
            }
        }
    }

    // ---- Pass 2: extend/behaviour headers ----------------------------

    /// Resolves every `extend` block's target, registers its members, and
    /// rejects partial specialization of a generic target. Returns
    /// `(extend item, resolved target type)` for every extend block, so
    /// pass 3 can check bodies and behaviour conformance without resolving
    /// the target a second time (and risking a second copy of the same
    /// diagnostic).
    pub fn visit_extend_headers(&mut self, env: EnvId, items: &[DeclId]) -> Vec<(DeclId, TypeId)> {
        let mut resolved = Vec::new();
        for &item in items {
            let DeclKind::Extend(extend) = self.ast.decls[item].kind.clone() else {
                continue;
            };
            let ty = self.resolve_type(env, None, extend.target);
            if self.types.resolve(ty).is_unknown() {
                continue;
            }
            if let TypeData::Named { decl, args } = self.types.resolve(ty).clone() {
                let generic = matches!(&self.ast.decls[decl].kind, DeclKind::Type(t) if t.generics.is_some());
                if generic {
                    if self.is_fully_parametric(decl, &args) {
                        self.generic_extend_blocks.entry(decl).or_default().push(item);
                    } else if !args.is_empty() {
                        self.diagnostics.push(Diagnostic::error(
                            ErrorCode::E3003IllegalPartialSpecialization,
                            self.ast.types[extend.target].span,
                            "extending a generic type may only use its own type parameters, not a concrete specialization",
                        ));
                        continue;
                    }
                }
            }
            for &member in &extend.members {
                let name = self.ast.decls[member].name;
                self.extensions.register(ty, name, member);
            }
            resolved.push((item, ty));
        }
        resolved
    }

    /// A generic type's own `extend` block may only extend its own type
    /// parameters, in order — `extend List!(T) { ... }`, never
    /// `extend List!(i32) { ... }`.
    fn is_fully_parametric(&self, type_decl: DeclId, args: &[TypeArgValue]) -> bool {
        let DeclKind::Type(type_decl_data) = &self.ast.decls[type_decl].kind else {
            return args.is_empty();
        };
        let Some(generics) = type_decl_data.generics else {
            return args.is_empty();
        };
        let DeclKind::GenericClause { params } = &self.ast.decls[generics].kind else {
            return false;
        };
        if params.len() != args.len() {
            return false;
        }
        params.iter().zip(args).all(|(&param, arg)| match arg {
            TypeArgValue::Type(t) => matches!(self.types.resolve(*t), TypeData::GenericParam(p) if *p == param),
            TypeArgValue::Const(_) => false,
        })
    }

    // ---- Pass 3: types, constants, extend bodies, conformance --------

    /// Builds every top-level type and constant, checks every (non-generic
    /// or fully-parametric) extend block's member bodies, and runs
    /// deferred behaviour-conformance checks. `extend_targets` is pass 2's
    /// return value, reused so the target isn't re-resolved.
    pub fn build_types_and_consts(
        &mut self,
        workspace: DeclId,
        env: EnvId,
        items: &[DeclId],
        extend_targets: &[(DeclId, TypeId)],
    ) {
        let by_name: FxHashMap<Name, DeclId> = items
            .iter()
            .copied()
            .filter(|&item| matches!(self.ast.decls[item].kind, DeclKind::Type(_)))
            .map(|item| (self.ast.decls[item].name, item))
            .collect();
        if let Some(cycle) = find_unboxed_cycle(self.ast, &by_name) {
            let mut diagnostic = Diagnostic::error(
                ErrorCode::E2008CyclicType,
                self.ast.decls[cycle[0]].span,
                "this type recurses into itself with no pointer or slice indirection to bound its size",
            );
            for &decl in &cycle[1..] {
                diagnostic = diagnostic.with_highlight(self.ast.decls[decl].span, "...through here");
            }
            self.diagnostics.push(diagnostic);
        }

        for &item in items {
            match self.ast.decls[item].kind.clone() {
                DeclKind::Type(_) => {
                    if self.annotations.enter(item).is_ok() {
                        let ty = self.types.intern(TypeData::Named { decl: item, args: Box::new([]) });
                        self.annotations.mark_resolved(item, ty);
                    }
                }
                DeclKind::Const { ty, .. } | DeclKind::ConstTupled { .. } => {
                    if let DeclKind::Const { ty: Some(ty_expr), .. } = self.ast.decls[item].kind {
                        let _ = ty;
                        self.note_and_instantiate(workspace, env, ty_expr, self.ast.decls[item].span);
                    }
                    let ty = self.expr_checker(None).check_local_decl_typed(item, env);
                    if let Some(ty) = ty {
                        if let Ok(value) = self.evaluator.eval_const(const_init_expr(self.ast, item)) {
                            self.annotations.set_value(item, value);
                        }
                        self.annotations.mark_resolved(item, ty);
                    }
                }
                _ => {}
            }
        }

        for &(extend_item, ty) in extend_targets {
            let extend_env = self.envs.child(env);
            let members: Vec<DeclId> = match &self.ast.decls[extend_item].kind {
                DeclKind::Extend(extend) => extend.members.clone(),
                _ => continue,
            };
            for member in members {
                self.check_extend_member(extend_env, ty, member);
            }
        }

        for &(extend_item, ty) in extend_targets {
            self.check_behaviour_conformance(env, extend_item, ty);
        }
    }

    fn check_extend_member(&mut self, extend_env: EnvId, self_ty: TypeId, member: DeclId) {
        let decl = self.ast.decls[member].clone();
        let function = match decl.kind {
            DeclKind::Function(f) => f,
            DeclKind::Property(f) => {
                if f.params.len() != 1 {
                    self.diagnostics.push(Diagnostic::error(
                        ErrorCode::E2005ArityMismatch,
                        decl.span,
                        "a property must take exactly one parameter, the receiver",
                    ));
                }
                f
            }
            _ => return,
        };
        let Some(body) = function.body else { return };
        self.expr_checker(Some(self_ty))
            .check_function_literal(&function.params, function.return_ty, body, extend_env);
    }

    fn check_behaviour_conformance(&mut self, env: EnvId, extend_item: DeclId, ty: TypeId) {
        let DeclKind::Extend(extend) = self.ast.decls[extend_item].kind.clone() else {
            return;
        };
        let Some(behaviour_expr) = extend.behaviour else {
            return;
        };
        let behaviour_ty = self.resolve_type(env, None, behaviour_expr);
        let TypeData::Named { decl: behaviour_decl, .. } = self.types.resolve(behaviour_ty).clone() else {
            return;
        };
        let DeclKind::Type(behaviour_type_decl) = self.ast.decls[behaviour_decl].kind.clone() else {
            return;
        };
        let TypeDeclKind::Behaviour { prototypes } = behaviour_type_decl.kind else {
            return;
        };

        let required: Vec<DeclId> = prototypes
            .iter()
            .copied()
            .filter(|&p| match &self.ast.decls[p].kind {
                DeclKind::Function(f) | DeclKind::Property(f) => f.body.is_none(),
                _ => false,
            })
            .collect();
        let unsatisfied = unsatisfied_prototypes(self.ast, self.extensions, ty, &required);
        if !unsatisfied.is_empty() {
            let behaviour_name = self.names.resolve(self.ast.decls[behaviour_decl].name).to_string();
            let mut diagnostic = Diagnostic::error(
                ErrorCode::E3004MissingBehaviourMember,
                self.ast.decls[extend_item].span,
                format!("this type does not implement `{behaviour_name}`"),
            );
            for missing in &unsatisfied {
                diagnostic = diagnostic.with_highlight(
                    self.ast.decls[missing.prototype].span,
                    format!("missing `{}`", self.names.resolve(self.ast.decls[missing.prototype].name)),
                );
            }
            self.diagnostics.push(diagnostic);
        }

        // Defaulted prototypes (carrying their own body) are inherited by
        // any conforming type that doesn't override them.
        for &prototype in &prototypes {
            let has_default = matches!(
                &self.ast.decls[prototype].kind,
                DeclKind::Function(f) | DeclKind::Property(f) if f.body.is_some()
            );
            if !has_default {
                continue;
            }
            let name = self.ast.decls[prototype].name;
            if self.extensions.get(ty, name).is_none() {
                self.extensions.register(ty, name, prototype);
            }
        }

        self.impls.register(ty, behaviour_decl, extend_item);
    }

    // ---- Pass 4: functions, tests, variables -------------------------

    /// Checks every remaining top-level function/test body and variable
    /// initializer, and drives explicit-generic-argument call
    /// instantiation (`f!(T)(args)`) found along the way.
    pub fn check_functions_and_vars(&mut self, workspace: DeclId, env: EnvId, items: &[DeclId]) {
        for &item in items {
            let decl = self.ast.decls[item].clone();
            match decl.kind {
                DeclKind::Function(function) => {
                    if function.generics.is_some() {
                        // Only checked per explicit instantiation — see
                        // `instantiate_function` — its own unsubstituted
                        // body is never checked directly.
                        continue;
                    }
                    if let Some(body) = function.body {
                        self.expr_checker(None)
                            .check_function_literal(&function.params, function.return_ty, body, env);
                        self.instantiate_direct_generic_calls(workspace, env, body);
                    }
                }
                DeclKind::Test { body } => {
                    self.expr_checker(None).check_function_literal(&[], None, body, env);
                    self.instantiate_direct_generic_calls(workspace, env, body);
                }
                DeclKind::Var { ty, .. } => {
                    if let Some(ty_expr) = ty {
                        self.note_and_instantiate(workspace, env, ty_expr, decl.span);
                    }
                    self.expr_checker(None).check_local_decl(item, env);
                }
                DeclKind::VarTupled { .. } => {
                    self.expr_checker(None).check_local_decl(item, env);
                }
                _ => {}
            }
        }
    }

    /// Validates the program's `start` function against the Invariants:
    /// `() -> ()` or `(slice of chars) -> ()`.
    pub fn validate_entry_point(&mut self, env: EnvId, entry: DeclId) {
        let function = match self.ast.decls[entry].kind.clone() {
            DeclKind::Function(f) => f,
            _ => return,
        };
        let params_ok = match function.params.as_slice() {
            [] => true,
            [param] => {
                let param_kind = self.ast.decls[*param].kind.clone();
                match param_kind {
                    DeclKind::Parameter { ty: Some(ty), .. } => {
                        let param_ty = self.resolve_type(env, None, ty);
                        matches!(
                            self.types.resolve(param_ty),
                            TypeData::Slice { element } if matches!(self.types.resolve(*element), TypeData::Chars)
                        )
                    }
                    _ => false,
                }
            }
            _ => false,
        };
        let return_ok = match function.return_ty {
            None => true,
            Some(ty) => {
                let ret_ty = self.resolve_type(env, None, ty);
                matches!(self.types.resolve(ret_ty), TypeData::Tuple(elems) if elems.is_empty())
            }
        };
        if !params_ok || !return_ok {
            self.diagnostics.push(Diagnostic::error(
                ErrorCode::E2009InvalidEntryPoint,
                self.ast.decls[entry].span,
                "`start` must have signature `() -> ()` or `(args: [chars]) -> ()`",
            ));
        }
    }

    // ---- Generic instantiation ---------------------------------------

    /// Instantiates `generic_decl` at `args`, cloning each of its own
    /// fully-parametric `extend` blocks' members and registering the
    /// clones against this specific instantiation's `TypeId`. A no-op past
    /// the first call for a given `(workspace, args)` pair — the
    /// [`Instantiator`] cache makes repeated member access on the same
    /// instantiation free.
    pub fn instantiate_type(
        &mut self,
        workspace: DeclId,
        env: EnvId,
        generic_decl: DeclId,
        args: &[TypeArgValue],
        span: Span,
    ) -> Result<(), Diagnostic> {
        let key = chk_types::mangle(self.names, self.types, generic_decl, args);
        let already = self.instantiator.cached(workspace, &key).is_some();
        self.instantiator.instantiate(workspace, key, span, |_| generic_decl)?;
        if already {
            return Ok(());
        }

        let ty = self.types.intern(TypeData::Named { decl: generic_decl, args: args.to_vec().into_boxed_slice() });
        let extend_blocks = self.generic_extend_blocks.get(&generic_decl).cloned().unwrap_or_default();
        if extend_blocks.is_empty() {
            return Ok(());
        }
        let subst = self.build_type_subst(generic_decl, args);
        for extend_decl in extend_blocks {
            self.instantiate_extend_clone(env, ty, extend_decl, &subst);
        }
        Ok(())
    }

    fn build_type_subst(&mut self, generic_decl: DeclId, args: &[TypeArgValue]) -> TypeSubst {
        let mut subst = TypeSubst::default();
        let generics = match &self.ast.decls[generic_decl].kind {
            DeclKind::Type(t) => t.generics,
            _ => None,
        };
        let Some(generics) = generics else { return subst };
        let DeclKind::GenericClause { params } = self.ast.decls[generics].kind.clone() else {
            return subst;
        };
        for (&param, &arg) in params.iter().zip(args) {
            let param_name = self.ast.decls[param].name;
            match arg {
                TypeArgValue::Type(ty) => {
                    let expr = type_to_expr(self.ast, self.names, self.types, ty);
                    subst.types.insert(param_name, expr);
                }
                TypeArgValue::Const(value) => {
                    let expr = const_to_expr(self.ast, value);
                    subst.consts.insert(param_name, expr);
                }
            }
        }
        subst
    }

    fn instantiate_extend_clone(&mut self, env: EnvId, ty: TypeId, extend_decl: DeclId, subst: &TypeSubst) {
        let members: Vec<DeclId> = match &self.ast.decls[extend_decl].kind {
            DeclKind::Extend(extend) => extend.members.clone(),
            _ => return,
        };
        let cloned: Vec<DeclId> =
            chk_stack::ensure_sufficient_stack(|| members.iter().map(|&member| clone_decl(self.ast, subst, member)).collect());
        for &member in &cloned {
            let name = self.ast.decls[member].name;
            self.extensions.register(ty, name, member);
        }
        let extend_env = self.envs.child(env);
        for &member in &cloned {
            self.check_extend_member(extend_env, ty, member);
        }
    }

    /// Clones and checks `generic_decl` under the explicit `type_args` a
    /// call site wrote (`f!(T)(args)`), caching by mangled key the same way
    /// [`Self::instantiate_type`] does. Scoped to explicit arguments only —
    /// a generic function called with its arguments left to be inferred is
    /// type-checked at the call site via `crate::matcher::deduce_generics`
    /// without its body ever being re-checked under the deduced binding.
    pub fn instantiate_function(
        &mut self,
        workspace: DeclId,
        env: EnvId,
        generic_decl: DeclId,
        type_args: &[TypeExprId],
        span: Span,
    ) -> Option<DeclId> {
        let generics = match &self.ast.decls[generic_decl].kind {
            DeclKind::Function(f) => f.generics,
            _ => return None,
        }?;
        let DeclKind::GenericClause { params } = self.ast.decls[generics].kind.clone() else {
            return None;
        };
        if params.len() != type_args.len() {
            self.diagnostics.push(Diagnostic::error(
                ErrorCode::E2005ArityMismatch,
                span,
                format!("expected {} generic argument(s), found {}", params.len(), type_args.len()),
            ));
            return None;
        }

        let mut resolved_args = Vec::with_capacity(type_args.len());
        let mut subst = TypeSubst::default();
        for (&param, &arg_expr) in params.iter().zip(type_args) {
            if matches!(self.ast.decls[param].kind, DeclKind::GenericConstParameter { .. }) {
                continue;
            }
            let resolved = self.resolve_type(env, None, arg_expr);
            let param_name = self.ast.decls[param].name;
            subst.types.insert(param_name, arg_expr);
            resolved_args.push(TypeArgValue::Type(resolved));
        }

        let key = chk_types::mangle(self.names, self.types, generic_decl, &resolved_args);
        if let Some(cached) = self.instantiator.cached(workspace, &key) {
            return Some(cached);
        }

        for (&param, arg_ty) in params.iter().zip(&resolved_args) {
            let TypeArgValue::Type(arg_ty) = *arg_ty else { continue };
            let DeclKind::GenericTypeParameter { bounds } = self.ast.decls[param].kind.clone() else {
                continue;
            };
            for bound_name in bounds {
                if !self.check_concept_bound(bound_name, arg_ty, env, span) {
                    return None;
                }
            }
        }

        let cloned_fn = chk_stack::ensure_sufficient_stack(|| clone_decl(self.ast, &subst, generic_decl));
        let built = match self.instantiator.instantiate(workspace, key, span, |_| cloned_fn) {
            Ok(decl) => decl,
            Err(diagnostic) => {
                self.diagnostics.push(diagnostic);
                return None;
            }
        };
        if let DeclKind::Function(function) = self.ast.decls[built].kind.clone() {
            if let Some(body) = function.body {
                self.expr_checker(None).check_function_literal(&function.params, function.return_ty, body, env);
            }
        }
        Some(built)
    }

    fn check_concept_bound(&mut self, bound_name: Name, ty: TypeId, env: EnvId, span: Span) -> bool {
        let Ok(concept_decl) = self.resolver().resolve(env, Namespace::Concept, bound_name, span) else {
            // Unresolved concept name: name resolution already reported it.
            return true;
        };
        let DeclKind::Concept(concept) = self.ast.decls[concept_decl].kind.clone() else {
            return true;
        };

        // Only a fully-concrete argument gets a cache entry — a parametric
        // one may be satisfied differently once a more specific
        // instantiation exists later (§9 open question), so it is always
        // re-evaluated.
        let cache_key = self.home_workspace.filter(|_| is_concrete(self.types, ty)).map(|workspace| {
            (workspace, chk_types::mangle(self.names, self.types, concept_decl, &[TypeArgValue::Type(ty)]))
        });
        if let Some(key) = &cache_key {
            if self.concept_cache.get(key).copied() == Some(true) {
                return true;
            }
        }

        let unsatisfied = unsatisfied_prototypes(self.ast, self.extensions, ty, &concept.prototypes);
        let satisfied = unsatisfied.is_empty();
        if let Some(key) = cache_key {
            self.concept_cache.insert(key, satisfied);
        }
        if satisfied {
            return true;
        }
        let concept_name = self.names.resolve(bound_name).to_string();
        let mut diagnostic = Diagnostic::error(
            ErrorCode::E3002ConceptNotSatisfied,
            span,
            format!("type does not satisfy concept `{concept_name}`"),
        );
        for missing in &unsatisfied {
            diagnostic = diagnostic.with_highlight(
                self.ast.decls[missing.prototype].span,
                format!("missing `{}`", self.names.resolve(self.ast.decls[missing.prototype].name)),
            );
        }
        self.diagnostics.push(diagnostic);
        false
    }

    fn instantiate_direct_generic_calls(&mut self, workspace: DeclId, env: EnvId, body: ExprId) {
        let mut finder = GenericCallFinder::default();
        walk_expr(self.ast, &mut finder, body, true);
        for (call_id, generic_args) in finder.calls {
            let span = self.ast.exprs[call_id].span;
            let chk_ir::ExprKind::Call { callee, .. } = self.ast.exprs[call_id].kind.clone() else {
                continue;
            };
            let chk_ir::ExprKind::Identifier(name) = self.ast.exprs[callee].kind else {
                continue;
            };
            let Ok(callee_decl) = self.resolver().resolve(env, Namespace::Function, name, span) else {
                continue;
            };
            let is_generic_fn = matches!(&self.ast.decls[callee_decl].kind, DeclKind::Function(f) if f.generics.is_some());
            if is_generic_fn {
                self.instantiate_function(workspace, env, callee_decl, &generic_args, span);
            }
        }
    }
}

/// Whether `ty` mentions no unsubstituted generic parameter anywhere in its
/// structure, the condition under which a concept test is cacheable.
fn is_concrete(types: &TypeInterner, ty: TypeId) -> bool {
    match types.resolve(ty) {
        TypeData::GenericParam(_) => false,
        TypeData::Pointer { inner, .. } | TypeData::Slice { element: inner } => is_concrete(types, *inner),
        TypeData::Array { element, size } => {
            is_concrete(types, *element) && !matches!(size, ArraySize::Parametric(_))
        }
        TypeData::Tuple(elements) => elements.iter().all(|&e| is_concrete(types, e)),
        TypeData::Function { params, ret } => {
            params.iter().all(|&p| is_concrete(types, p)) && is_concrete(types, *ret)
        }
        TypeData::Range { element, .. } => is_concrete(types, *element),
        TypeData::Named { args, .. } => args.iter().all(|arg| match arg {
            TypeArgValue::Type(t) => is_concrete(types, *t),
            TypeArgValue::Const(_) => true,
        }),
        _ => true,
    }
}

fn const_init_expr(ast: &Ast, item: DeclId) -> ExprId {
    match &ast.decls[item].kind {
        DeclKind::Const { init, .. } | DeclKind::ConstTupled { init, .. } => *init,
        _ => unreachable!("const_init_expr called on a non-const declaration"),
    }
}

#[derive(Default)]
struct GenericCallFinder {
    calls: Vec<(ExprId, Vec<TypeExprId>)>,
}

impl ExprVisitor for GenericCallFinder {
    fn visit_expr(&mut self, ast: &Ast, id: ExprId) -> bool {
        if let chk_ir::ExprKind::Call { generic_args, .. } = &ast.exprs[id].kind {
            if !generic_args.is_empty() {
                self.calls.push((id, generic_args.clone()));
            }
        }
        true
    }
}
