//! Resolves parsed type syntax ([`chk_ir::TypeExpr`]) into the checker's
//! canonical [`chk_types::TypeId`] representation.
//!
//! A `Named` type expression with generic arguments triggers instantiation
//! through [`crate::generics::Instantiator`] rather than being interned
//! directly — `List!(i32)` resolves to the `TypeId` of `List`'s
//! *instantiated* clone, not a parametric placeholder.

use chk_diagnostic::{Diagnostic, ErrorCode};
use chk_ir::{ArraySize as SynArraySize, DeclKind, ExprKind, TypeArg, TypeExprId, TypeExprKind};
use chk_types::{ArraySize, TypeArgValue, TypeData, TypeId};

use crate::env::{EnvId, Namespace};
use crate::interfaces::Evaluator;
use crate::resolve::Resolver;

pub struct TypeResolver<'a, 'b> {
    pub resolver: &'a Resolver<'b>,
    pub types: &'a mut chk_types::TypeInterner,
    pub evaluator: &'a dyn Evaluator,
    /// The type `Self` refers to inside the current `extend`/`behaviour`
    /// body, if any.
    pub self_ty: Option<TypeId>,
}

impl TypeResolver<'_, '_> {
    pub fn resolve(&mut self, env: EnvId, ty: TypeExprId) -> Result<TypeId, Diagnostic> {
        let span = self.resolver.ast.types[ty].span;
        match self.resolver.ast.types[ty].kind.clone() {
            TypeExprKind::SelfType => self.self_ty.ok_or_else(|| {
                Diagnostic::error(ErrorCode::E1001UnresolvedName, span, "`Self` is not valid here")
            }),
            TypeExprKind::Named { path, args } => self.resolve_named(env, &path, &args, span),
            TypeExprKind::Pointer { mutable, inner } => {
                let inner = self.resolve(env, inner)?;
                Ok(self.types.intern(TypeData::Pointer { inner, mutable }))
            }
            TypeExprKind::Slice(inner) => {
                let element = self.resolve(env, inner)?;
                Ok(self.types.intern(TypeData::Slice { element }))
            }
            TypeExprKind::Array { element, size } => {
                let element = self.resolve(env, element)?;
                let size = self.resolve_array_size(env, size)?;
                Ok(self.types.intern(TypeData::Array { element, size }))
            }
            TypeExprKind::Tuple(items) => {
                let mut resolved = Vec::with_capacity(items.len());
                for item in items {
                    resolved.push(self.resolve(env, item)?);
                }
                Ok(self.types.intern(TypeData::Tuple(resolved.into_boxed_slice())))
            }
            TypeExprKind::Function { params, ret } => {
                let mut resolved_params = Vec::with_capacity(params.len());
                for param in params {
                    resolved_params.push(self.resolve(env, param)?);
                }
                let ret = self.resolve(env, ret)?;
                Ok(self.types.intern(TypeData::Function {
                    params: resolved_params.into_boxed_slice(),
                    ret,
                }))
            }
        }
    }

    fn resolve_array_size(&mut self, env: EnvId, size: SynArraySize) -> Result<ArraySize, Diagnostic> {
        match size {
            SynArraySize::Literal(n) => Ok(ArraySize::Literal(n)),
            SynArraySize::Expr(expr) => {
                let expr_kind = self.resolver.ast.exprs[expr].kind.clone();
                if let ExprKind::Identifier(name) = expr_kind {
                    if let Ok(decl) = self.resolver.resolve(
                        env,
                        Namespace::Value,
                        name,
                        self.resolver.ast.exprs[expr].span,
                    ) {
                        if matches!(
                            self.resolver.ast.decls[decl].kind,
                            DeclKind::GenericConstParameter { .. }
                        ) {
                            return Ok(ArraySize::Parametric(decl));
                        }
                    }
                }
                match self.evaluator.eval_const(expr) {
                    Ok(value) => Ok(ArraySize::Literal(value.as_int().unwrap_or(0).max(0) as u64)),
                    Err(message) => Err(Diagnostic::error(
                        ErrorCode::E2002TypeMismatch,
                        self.resolver.ast.exprs[expr].span,
                        format!("array size must be a constant expression: {message}"),
                    )),
                }
            }
        }
    }

    fn resolve_named(
        &mut self,
        env: EnvId,
        path: &[chk_ir::Name],
        args: &[TypeArg],
        span: chk_ir::Span,
    ) -> Result<TypeId, Diagnostic> {
        let primitive = path
            .last()
            .and_then(|&last| self.primitive_by_name(last));
        if let (Some(primitive), [_]) = (primitive, path) {
            return Ok(primitive);
        }

        let &last = path.last().ok_or_else(|| {
            Diagnostic::error(ErrorCode::E1001UnresolvedName, span, "empty type path")
        })?;
        let decl = self.resolver.resolve(env, Namespace::Type, last, span)?;

        if matches!(self.resolver.ast.decls[decl].kind, DeclKind::GenericTypeParameter { .. }) {
            return Ok(self.types.intern(TypeData::GenericParam(decl)));
        }

        let mut type_args = Vec::with_capacity(args.len());
        for arg in args {
            match arg {
                TypeArg::Type(ty) => type_args.push(TypeArgValue::Type(self.resolve(env, *ty)?)),
                TypeArg::Const(expr) => {
                    let value = self.evaluator.eval_const(*expr).map_err(|message| {
                        Diagnostic::error(
                            ErrorCode::E3001UnboundGenericParameter,
                            span,
                            format!("generic-const argument must be a constant expression: {message}"),
                        )
                    })?;
                    type_args.push(TypeArgValue::Const(value));
                }
            }
        }

        Ok(self.types.intern(TypeData::Named {
            decl,
            args: type_args.into_boxed_slice(),
        }))
    }

    /// Matches the built-in scalar type names a driver's name resolver
    /// never sees a declaration for (`bool`, `i32`, `f32`, …) — these are
    /// wired directly to the interner's fixed constants rather than routed
    /// through name resolution, since nothing declares them.
    fn primitive_by_name(&mut self, name: chk_ir::Name) -> Option<TypeId> {
        let text = self.resolver.names.resolve(name);
        Some(match text {
            "bool" => TypeId::BOOL,
            "char" => TypeId::CHAR,
            "chars" => TypeId::CHARS,
            "string" => TypeId::STRING,
            "i32" => TypeId::I32,
            "f32" => TypeId::F32,
            "i8" => self.types.intern(TypeData::Integer { bits: 8, signed: true }),
            "i16" => self.types.intern(TypeData::Integer { bits: 16, signed: true }),
            "i64" => self.types.intern(TypeData::Integer { bits: 64, signed: true }),
            "i128" => self.types.intern(TypeData::Integer { bits: 128, signed: true }),
            "isize" => self.types.intern(TypeData::Integer { bits: 64, signed: true }),
            "u8" => self.types.intern(TypeData::Integer { bits: 8, signed: false }),
            "u16" => self.types.intern(TypeData::Integer { bits: 16, signed: false }),
            "u32" => self.types.intern(TypeData::Integer { bits: 32, signed: false }),
            "u64" => self.types.intern(TypeData::Integer { bits: 64, signed: false }),
            "u128" => self.types.intern(TypeData::Integer { bits: 128, signed: false }),
            "usize" => self.types.intern(TypeData::Integer { bits: 64, signed: false }),
            "f64" => self.types.intern(TypeData::Float { bits: 64 }),
            "f128" => self.types.intern(TypeData::Float { bits: 128 }),
            "f256" => self.types.intern(TypeData::Float { bits: 256 }),
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::EnvGraph;
    use crate::imports::ImportGraph;
    use crate::interfaces::NullEvaluator;
    use chk_ir::{Ast, NameInterner, Span, TypeExpr};
    use rustc_hash::FxHashMap;

    #[test]
    fn resolves_a_primitive_name() {
        let mut ast = Ast::new();
        let mut names = NameInterner::new();
        let mut envs = EnvGraph::new();
        let root = envs.root();
        let import_graph = ImportGraph {
            edges: FxHashMap::default(),
            diagnostics: Vec::new(),
        };
        let resolver = Resolver {
            ast: &ast,
            names: &names,
            envs: &envs,
            imports: &import_graph,
            home_workspace: None,
        };
        let mut types = chk_types::TypeInterner::new();
        let evaluator = NullEvaluator;
        let bool_name = names.intern("bool");
        let ty = ast.alloc_type(TypeExpr {
            kind: TypeExprKind::Named {
                path: vec![bool_name],
                args: Vec::new(),
            },
            span: Span::DUMMY,
        });

        let mut type_resolver = TypeResolver {
            resolver: &resolver,
            types: &mut types,
            evaluator: &evaluator,
            self_ty: None,
        };
        let result = type_resolver.resolve(root, ty);
        assert_eq!(result, Ok(TypeId::BOOL));
    }
}
