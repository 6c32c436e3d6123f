//! Top-level pipeline: the five passes of §2 over every workspace in a
//! [`Compilation`], wired through a concrete [`Evaluator`]/[`PatternMatcher`]
//! pair supplied by the embedder.
//!
//! Passes 1-4 run breadth-first *across* workspaces, not depth-first within
//! one — every workspace gets its names registered (pass 1) before any
//! workspace starts resolving an `extend` target (pass 2), and so on. This
//! is what lets workspace `A` reference a type workspace `B` declares
//! further down the compilation unit list: by the time `A`'s pass 3 runs,
//! `B`'s pass 1 has already happened.
//!
//! Generic instantiation (§4.6) is not a pass of its own — it is triggered
//! on demand from inside passes 3 and 4, and always re-enters the same
//! four-pass shape on the clone it produces.

use rustc_hash::FxHashMap;

use chk_diagnostic::{Diagnostic, ErrorCode};
use chk_ir::{Ast, Compilation, Decl, DeclId, DeclKind, Name, NameInterner};
use chk_types::{ImplRegistry, TypeInterner};

use crate::annotation::AnnotationTable;
use crate::decl::DeclChecker;
use crate::env::{EnvGraph, EnvId};
use crate::extensions::ExtensionRegistry;
use crate::generics::Instantiator;
use crate::imports::{build_import_graph, find_one_cycle, ImportGraph};
use crate::interfaces::{Evaluator, PatternMatcher};

/// A workspace's fully-checked output, handed to code generation (§6).
pub struct WorkspaceOutput {
    pub workspace: DeclId,
    pub name: String,
    /// Every top-level declaration, in source order, across all of this
    /// workspace's source units — the "globals in emission order" of §3.
    pub globals: Vec<DeclId>,
    pub types: Vec<DeclId>,
    pub functions: Vec<DeclId>,
    /// Generic types instantiated under this workspace, in no particular
    /// order beyond "however the hash map happened to iterate" — callers
    /// that need deterministic output should sort by mangled name.
    pub instantiated: Vec<DeclId>,
    pub instantiated_functions: Vec<DeclId>,
}

/// Everything produced by one `check()` invocation.
pub struct CheckOutcome {
    pub workspaces: Vec<WorkspaceOutput>,
    /// The program's unique `start` declaration, if one was found and its
    /// signature is valid.
    pub entry_point: Option<DeclId>,
    pub diagnostics: Vec<Diagnostic>,
    /// `true` once an `abort`-class error (§7) terminated checking early;
    /// the caller should not hand a partial `CheckOutcome` to code
    /// generation when this is set.
    pub aborted: bool,
}

fn workspace_path(ast: &Ast, workspace: DeclId) -> &[Name] {
    match &ast.decls[workspace].kind {
        DeclKind::Workspace { path, .. } => path,
        _ => &[],
    }
}

fn workspace_display_name(names: &NameInterner, ast: &Ast, workspace: DeclId) -> String {
    workspace_path(ast, workspace)
        .iter()
        .map(|&segment| names.resolve(segment))
        .collect::<Vec<_>>()
        .join(".")
}

/// Flattens every source unit a workspace contains into one ordered list of
/// top-level items. A workspace's four passes all operate over this single
/// list rather than per-source-unit, since scope graph §4.1 has exactly one
/// environment per workspace, not per source unit within it.
fn workspace_items(ast: &Ast, workspace: DeclId) -> Vec<DeclId> {
    let mut items = Vec::new();
    let DeclKind::Workspace { sources, .. } = &ast.decls[workspace].kind else {
        return items;
    };
    for &source in sources {
        if let DeclKind::SourceUnit { items: source_items, .. } = &ast.decls[source].kind {
            items.extend(source_items.iter().copied());
        }
    }
    items
}

/// Allocates a synthetic workspace wrapping `compilation.loose_sources`, so
/// anonymous (workspace-less) source units are checked through the same
/// machinery as a named one — "anonymous source units, checked as an
/// implicit unnamed workspace" (§3, Workspace).
fn synthesize_anonymous_workspace(ast: &mut Ast, loose_sources: &[DeclId]) -> Option<DeclId> {
    if loose_sources.is_empty() {
        return None;
    }
    Some(ast.alloc_decl(Decl {
        kind: DeclKind::Workspace {
            path: Vec::new(),
            sources: loose_sources.to_vec(),
        },
        name: Name::UNDERSCORE,
        span: chk_ir::Span::DUMMY,
        hidden: true,
    }))
}

/// Finds the workspace named `core`, if the compilation declares one — its
/// top-level symbols are injected into every other workspace per §4.2.
fn find_core_workspace(ast: &Ast, names: &NameInterner, workspaces: &[DeclId]) -> Option<DeclId> {
    workspaces.iter().copied().find(|&ws| {
        let path = workspace_path(ast, ws);
        path.len() == 1 && names.resolve(path[0]) == "core"
    })
}

/// §4.2: after the import graph is built, `core` (if present) is added as
/// an implicit import of every other workspace, so unqualified lookups of
/// its symbols fall through `Resolver::resolve_via_imports` the same way an
/// explicit `use core` would.
fn inject_core_import(imports: &mut ImportGraph, workspaces: &[DeclId], core: DeclId) {
    for &ws in workspaces {
        if ws == core {
            continue;
        }
        let edges = imports.edges.entry(ws).or_default();
        if !edges.contains(&core) {
            edges.push(core);
        }
    }
}

/// §3 Invariants / §7: a workspace must live in exactly one physical
/// package. Builds a reverse `source -> package` map and flags any
/// workspace whose sources span zero or more than one package as an
/// `abort`-class `E9002WorkspacePackageViolation`.
fn check_workspace_package_membership(
    ast: &Ast,
    compilation: &Compilation,
    workspaces: &[DeclId],
) -> Option<Diagnostic> {
    let mut package_of_source: FxHashMap<DeclId, Name> = FxHashMap::default();
    for package in compilation.packages.values() {
        for &source in &package.sources {
            package_of_source.insert(source, package.name);
        }
    }

    for &workspace in workspaces {
        let DeclKind::Workspace { sources, .. } = &ast.decls[workspace].kind else {
            continue;
        };
        if sources.is_empty() {
            continue;
        }
        let mut packages: Vec<Name> = sources.iter().filter_map(|s| package_of_source.get(s).copied()).collect();
        packages.sort_by_key(chk_ir::Name::raw);
        packages.dedup();
        if packages.len() != 1 {
            return Some(Diagnostic::error(
                ErrorCode::E9002WorkspacePackageViolation,
                ast.decls[workspace].span,
                "this workspace's source units do not all belong to the same package",
            ));
        }
    }
    None
}

/// Runs the full five-pass checker over `compilation`, mutating `ast` in
/// place (instantiated generics and desugared bindings are appended to its
/// arenas) and returns the typed program's output plus every diagnostic
/// raised.
#[tracing::instrument(skip_all)]
pub fn check(
    compilation: &Compilation,
    ast: &mut Ast,
    names: &mut NameInterner,
    evaluator: &dyn Evaluator,
    pattern_matcher: &dyn PatternMatcher,
) -> CheckOutcome {
    let mut diagnostics = Vec::new();

    // ---- Pass 0: group source units into workspaces -------------------
    let mut workspaces: Vec<DeclId> = compilation.workspaces.values().copied().collect();
    workspaces.sort_by_key(chk_ir::DeclId::raw);
    if let Some(anonymous) = synthesize_anonymous_workspace(ast, &compilation.loose_sources) {
        workspaces.push(anonymous);
    }

    if let Some(diagnostic) = check_workspace_package_membership(ast, compilation, &workspaces) {
        diagnostics.push(diagnostic);
        return CheckOutcome { workspaces: Vec::new(), entry_point: None, diagnostics, aborted: true };
    }

    let mut imports = build_import_graph(ast, compilation);
    diagnostics.append(&mut imports.diagnostics);
    if let Some(cycle) = find_one_cycle(&imports) {
        let mut diagnostic = Diagnostic::error(
            ErrorCode::E1003CyclicImport,
            ast.decls[cycle[0]].span,
            "these workspaces import each other in a cycle",
        );
        for &workspace in &cycle[1..] {
            diagnostic = diagnostic.with_highlight(ast.decls[workspace].span, "...imports this one...");
        }
        diagnostics.push(diagnostic);
    }
    if let Some(core) = find_core_workspace(ast, names, &workspaces) {
        inject_core_import(&mut imports, &workspaces, core);
    }

    let mut envs = EnvGraph::new();
    let mut types = TypeInterner::new();
    let mut extensions = ExtensionRegistry::new();
    let mut impls = ImplRegistry::new();
    let mut instantiator = Instantiator::new();
    let mut annotations = AnnotationTable::new();
    let mut generic_extend_blocks: FxHashMap<DeclId, Vec<DeclId>> = FxHashMap::default();
    let mut concept_cache: FxHashMap<(DeclId, String), bool> = FxHashMap::default();

    let mut workspace_envs: FxHashMap<DeclId, EnvId> = FxHashMap::default();
    let mut workspace_items_cache: FxHashMap<DeclId, Vec<DeclId>> = FxHashMap::default();
    for &workspace in &workspaces {
        workspace_envs.insert(workspace, envs.root());
        workspace_items_cache.insert(workspace, workspace_items(ast, workspace));
    }

    // Pass 1: register every top-level name, across all workspaces, before
    // any workspace starts resolving a reference into another one.
    let mut entry_candidate: Option<(DeclId, chk_ir::Span)> = None;
    for &workspace in &workspaces {
        let env = workspace_envs[&workspace];
        let items = workspace_items_cache[&workspace].clone();
        let mut checker = DeclChecker {
            ast: &mut *ast,
            names: &mut *names,
            envs: &mut envs,
            types: &mut types,
            imports: &imports,
            extensions: &mut extensions,
            impls: &mut impls,
            evaluator,
            pattern_matcher,
            instantiator: &mut instantiator,
            annotations: &mut annotations,
            diagnostics: &mut diagnostics,
            home_workspace: Some(workspace),
            generic_extend_blocks: &mut generic_extend_blocks,
            concept_cache: &mut concept_cache,
        };
        checker.register_names(env, &items, &mut entry_candidate);
    }

    // Pass 2: extend/behaviour headers.
    let mut extend_targets: FxHashMap<DeclId, Vec<(DeclId, chk_types::TypeId)>> = FxHashMap::default();
    for &workspace in &workspaces {
        let env = workspace_envs[&workspace];
        let items = workspace_items_cache[&workspace].clone();
        let mut checker = DeclChecker {
            ast: &mut *ast,
            names: &mut *names,
            envs: &mut envs,
            types: &mut types,
            imports: &imports,
            extensions: &mut extensions,
            impls: &mut impls,
            evaluator,
            pattern_matcher,
            instantiator: &mut instantiator,
            annotations: &mut annotations,
            diagnostics: &mut diagnostics,
            home_workspace: Some(workspace),
            generic_extend_blocks: &mut generic_extend_blocks,
            concept_cache: &mut concept_cache,
        };
        let targets = checker.visit_extend_headers(env, &items);
        extend_targets.insert(workspace, targets);
    }

    // Pass 3: build types and constants, check extend bodies and
    // behaviour conformance.
    for &workspace in &workspaces {
        let env = workspace_envs[&workspace];
        let items = workspace_items_cache[&workspace].clone();
        let targets = extend_targets.get(&workspace).cloned().unwrap_or_default();
        let mut checker = DeclChecker {
            ast: &mut *ast,
            names: &mut *names,
            envs: &mut envs,
            types: &mut types,
            imports: &imports,
            extensions: &mut extensions,
            impls: &mut impls,
            evaluator,
            pattern_matcher,
            instantiator: &mut instantiator,
            annotations: &mut annotations,
            diagnostics: &mut diagnostics,
            home_workspace: Some(workspace),
            generic_extend_blocks: &mut generic_extend_blocks,
            concept_cache: &mut concept_cache,
        };
        checker.build_types_and_consts(workspace, env, &items, &targets);
    }

    // Pass 4: functions, tests, variables.
    for &workspace in &workspaces {
        let env = workspace_envs[&workspace];
        let items = workspace_items_cache[&workspace].clone();
        let mut checker = DeclChecker {
            ast: &mut *ast,
            names: &mut *names,
            envs: &mut envs,
            types: &mut types,
            imports: &imports,
            extensions: &mut extensions,
            impls: &mut impls,
            evaluator,
            pattern_matcher,
            instantiator: &mut instantiator,
            annotations: &mut annotations,
            diagnostics: &mut diagnostics,
            home_workspace: Some(workspace),
            generic_extend_blocks: &mut generic_extend_blocks,
            concept_cache: &mut concept_cache,
        };
        checker.check_functions_and_vars(workspace, env, &items);
    }

    let mut entry_point = None;
    if let Some((decl, _span)) = entry_candidate {
        let owning_workspace = workspaces
            .iter()
            .copied()
            .find(|&ws| workspace_items_cache[&ws].contains(&decl));
        if let Some(workspace) = owning_workspace {
            let env = workspace_envs[&workspace];
            let mut checker = DeclChecker {
                ast: &mut *ast,
                names: &mut *names,
                envs: &mut envs,
                types: &mut types,
                imports: &imports,
                extensions: &mut extensions,
                impls: &mut impls,
                evaluator,
                pattern_matcher,
                instantiator: &mut instantiator,
                annotations: &mut annotations,
                diagnostics: &mut diagnostics,
                home_workspace: Some(workspace),
                generic_extend_blocks: &mut generic_extend_blocks,
                concept_cache: &mut concept_cache,
            };
            checker.validate_entry_point(env, decl);
        }
        entry_point = Some(decl);
    }

    let aborted = diagnostics.iter().any(|d| d.code.is_fatal());

    let mut outputs = Vec::with_capacity(workspaces.len());
    for &workspace in &workspaces {
        let items = workspace_items_cache.remove(&workspace).unwrap_or_default();
        let types_out: Vec<DeclId> =
            items.iter().copied().filter(|&i| matches!(&ast.decls[i].kind, DeclKind::Type(_))).collect();
        let functions_out: Vec<DeclId> = items
            .iter()
            .copied()
            .filter(|&i| matches!(&ast.decls[i].kind, DeclKind::Function(_) | DeclKind::Extern { .. }))
            .collect();
        let mut instantiated = Vec::new();
        let mut instantiated_functions = Vec::new();
        for decl in instantiator.instantiations_for(workspace) {
            match &ast.decls[decl].kind {
                DeclKind::Function(_) => instantiated_functions.push(decl),
                DeclKind::Type(_) => instantiated.push(decl),
                _ => {}
            }
        }
        outputs.push(WorkspaceOutput {
            workspace,
            name: workspace_display_name(names, ast, workspace),
            globals: items,
            types: types_out,
            functions: functions_out,
            instantiated,
            instantiated_functions,
        });
    }

    CheckOutcome { workspaces: outputs, entry_point, diagnostics, aborted }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::{NullEvaluator, PermissiveMatcher};
    use chk_ir::{Expr, ExprKind, FunctionDecl, IntSuffix, Package, Span};

    /// Builds a one-package, one-workspace compilation with a single
    /// top-level `val` declaration, to exercise the pipeline end to end
    /// without a real parser.
    fn single_workspace_with_val() -> (Compilation, Ast, NameInterner) {
        let mut ast = Ast::new();
        let mut names = NameInterner::new();

        let int_lit = ast.alloc_expr(Expr {
            kind: ExprKind::IntLiteral { value: 1, suffix: IntSuffix::None },
            span: Span::DUMMY,
        });
        let val_name = names.intern("x");
        let val_decl = ast.alloc_decl(Decl {
            kind: DeclKind::Var { ty: None, init: Some(int_lit), mutable: false },
            name: val_name,
            span: Span::DUMMY,
            hidden: false,
        });

        let source = ast.alloc_decl(Decl {
            kind: DeclKind::SourceUnit { workspace: None, items: vec![val_decl] },
            name: Name::UNDERSCORE,
            span: Span::DUMMY,
            hidden: false,
        });

        let workspace_name = names.intern("app");
        let workspace = ast.alloc_decl(Decl {
            kind: DeclKind::Workspace { path: vec![workspace_name], sources: vec![source] },
            name: workspace_name,
            span: Span::DUMMY,
            hidden: false,
        });

        if let DeclKind::SourceUnit { workspace: ws, .. } = &mut ast.decls[source].kind {
            *ws = Some(workspace);
        }

        let package_name = names.intern("app_pkg");
        let mut packages = FxHashMap::default();
        packages.insert(package_name, Package { name: package_name, sources: vec![source] });

        let mut workspaces = FxHashMap::default();
        workspaces.insert(workspace_name, workspace);

        let compilation = Compilation { packages, workspaces, loose_sources: Vec::new() };
        (compilation, ast, names)
    }

    #[test]
    fn checks_a_trivial_single_workspace_program() {
        let (compilation, mut ast, mut names) = single_workspace_with_val();
        let evaluator = NullEvaluator;
        let matcher = PermissiveMatcher;
        let outcome = check(&compilation, &mut ast, &mut names, &evaluator, &matcher);
        assert!(!outcome.aborted);
        assert_eq!(outcome.workspaces.len(), 1);
        assert!(outcome.entry_point.is_none());
    }

    #[test]
    fn an_empty_compilation_checks_cleanly() {
        let compilation = Compilation::default();
        let mut ast = Ast::new();
        let mut names = NameInterner::new();
        let evaluator = NullEvaluator;
        let matcher = PermissiveMatcher;
        let outcome = check(&compilation, &mut ast, &mut names, &evaluator, &matcher);
        assert!(!outcome.aborted);
        assert!(outcome.workspaces.is_empty());
        assert!(outcome.entry_point.is_none());
    }

    #[test]
    fn duplicate_entry_point_across_workspaces_is_reported_once() {
        let mut ast = Ast::new();
        let mut names = NameInterner::new();
        let start_name = names.intern("start");

        let body_expr = ast.alloc_expr(Expr {
            kind: ExprKind::Block(Vec::new()),
            span: Span::DUMMY,
        });

        let mut make_start = |ast: &mut Ast| {
            ast.alloc_decl(Decl {
                kind: DeclKind::Function(FunctionDecl {
                    generics: None,
                    params: Vec::new(),
                    return_ty: None,
                    body: Some(body_expr),
                }),
                name: start_name,
                span: Span::DUMMY,
                hidden: false,
            })
        };
        let start_a = make_start(&mut ast);
        let start_b = make_start(&mut ast);

        let source_a = ast.alloc_decl(Decl {
            kind: DeclKind::SourceUnit { workspace: None, items: vec![start_a] },
            name: Name::UNDERSCORE,
            span: Span::DUMMY,
            hidden: false,
        });
        let source_b = ast.alloc_decl(Decl {
            kind: DeclKind::SourceUnit { workspace: None, items: vec![start_b] },
            name: Name::UNDERSCORE,
            span: Span::DUMMY,
            hidden: false,
        });

        let ws_a_name = names.intern("a");
        let ws_b_name = names.intern("b");
        let ws_a = ast.alloc_decl(Decl {
            kind: DeclKind::Workspace { path: vec![ws_a_name], sources: vec![source_a] },
            name: ws_a_name,
            span: Span::DUMMY,
            hidden: false,
        });
        let ws_b = ast.alloc_decl(Decl {
            kind: DeclKind::Workspace { path: vec![ws_b_name], sources: vec![source_b] },
            name: ws_b_name,
            span: Span::DUMMY,
            hidden: false,
        });

        let pkg_name = names.intern("pkg");
        let mut packages = FxHashMap::default();
        packages.insert(pkg_name, Package { name: pkg_name, sources: vec![source_a, source_b] });
        let mut workspaces = FxHashMap::default();
        workspaces.insert(ws_a_name, ws_a);
        workspaces.insert(ws_b_name, ws_b);

        let compilation = Compilation { packages, workspaces, loose_sources: Vec::new() };
        let evaluator = NullEvaluator;
        let matcher = PermissiveMatcher;
        let outcome = check(&compilation, &mut ast, &mut names, &evaluator, &matcher);

        let duplicate_count = outcome
            .diagnostics
            .iter()
            .filter(|d| d.code == ErrorCode::E2009InvalidEntryPoint)
            .count();
        assert_eq!(duplicate_count, 1);
    }
}
