//! Workspace/package import graph and cycle detection.
//!
//! A `use A.B.C` inside a source unit imports everything workspace `A.B.C`
//! exposes. Imports form a directed graph over workspaces; the graph must be
//! acyclic, since resolving a name in a cyclic import chain would never
//! terminate.

use chk_diagnostic::{Diagnostic, ErrorCode};
use chk_ir::{Ast, Compilation, DeclId, DeclKind};
use rustc_hash::FxHashMap;

/// Resolved import edges: workspace -> the workspaces it `use`s, plus any
/// diagnostics raised while resolving `use` paths (unknown workspace,
/// self-import).
pub struct ImportGraph {
    pub edges: FxHashMap<DeclId, Vec<DeclId>>,
    pub diagnostics: Vec<Diagnostic>,
}

fn workspace_path<'a>(ast: &'a Ast, workspace: DeclId) -> Option<&'a [chk_ir::Name]> {
    match &ast.decls[workspace].kind {
        DeclKind::Workspace { path, .. } => Some(path),
        _ => None,
    }
}

fn find_workspace_by_path(
    ast: &Ast,
    compilation: &Compilation,
    path: &[chk_ir::Name],
) -> Option<DeclId> {
    compilation
        .workspaces
        .values()
        .copied()
        .find(|&id| workspace_path(ast, id) == Some(path))
}

/// Builds the import graph for every workspace in `compilation`, resolving
/// each `use` clause found in that workspace's source units.
pub fn build_import_graph(ast: &Ast, compilation: &Compilation) -> ImportGraph {
    let mut edges: FxHashMap<DeclId, Vec<DeclId>> = FxHashMap::default();
    let mut diagnostics = Vec::new();

    for (&_name, &workspace_id) in &compilation.workspaces {
        let DeclKind::Workspace { sources, .. } = &ast.decls[workspace_id].kind else {
            continue;
        };
        let own_path = workspace_path(ast, workspace_id).unwrap_or(&[]);
        let mut imported = Vec::new();

        for &source_id in sources {
            let DeclKind::SourceUnit { items, .. } = &ast.decls[source_id].kind else {
                continue;
            };
            for &item in items {
                let DeclKind::Use { path } = &ast.decls[item].kind else {
                    continue;
                };
                if path.as_slice() == own_path {
                    diagnostics.push(Diagnostic::error(
                        ErrorCode::E1005SelfImport,
                        ast.decls[item].span,
                        "workspace cannot `use` itself",
                    ));
                    continue;
                }
                match find_workspace_by_path(ast, compilation, path) {
                    Some(target) => imported.push(target),
                    None => diagnostics.push(Diagnostic::error(
                        ErrorCode::E1004UnknownWorkspace,
                        ast.decls[item].span,
                        "no workspace matches this `use` path",
                    )),
                }
            }
        }
        edges.insert(workspace_id, imported);
    }

    ImportGraph { edges, diagnostics }
}

#[derive(Copy, Clone, Eq, PartialEq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Detects a cycle reachable from `start`. Returns the cyclic chain
/// (innermost-first) if one exists.
fn find_cycle_from(
    graph: &ImportGraph,
    colors: &mut FxHashMap<DeclId, Color>,
    stack: &mut Vec<DeclId>,
    start: DeclId,
) -> Option<Vec<DeclId>> {
    match colors.get(&start) {
        Some(Color::Black) => return None,
        Some(Color::Gray) => {
            let cycle_start = stack.iter().position(|&id| id == start).unwrap_or(0);
            return Some(stack[cycle_start..].to_vec());
        }
        _ => {}
    }
    colors.insert(start, Color::Gray);
    stack.push(start);
    if let Some(neighbors) = graph.edges.get(&start) {
        for &next in neighbors {
            if let Some(cycle) = find_cycle_from(graph, colors, stack, next) {
                return Some(cycle);
            }
        }
    }
    stack.pop();
    colors.insert(start, Color::Black);
    None
}

/// Finds one cyclic import chain, if any exists, so the caller can emit a
/// single `E1003CyclicImport` diagnostic per connected cyclic component
/// rather than one per edge.
pub fn find_one_cycle(graph: &ImportGraph) -> Option<Vec<DeclId>> {
    let mut colors = FxHashMap::default();
    let mut stack = Vec::new();
    for &workspace in graph.edges.keys() {
        if colors.get(&workspace).is_none() {
            if let Some(cycle) = find_cycle_from(graph, &mut colors, &mut stack, workspace) {
                return Some(cycle);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_from(edges: Vec<(u32, Vec<u32>)>) -> ImportGraph {
        let edges = edges
            .into_iter()
            .map(|(k, v)| {
                (
                    DeclId::from_raw(k),
                    v.into_iter().map(DeclId::from_raw).collect(),
                )
            })
            .collect();
        ImportGraph {
            edges,
            diagnostics: Vec::new(),
        }
    }

    #[test]
    fn acyclic_graph_has_no_cycle() {
        let graph = graph_from(vec![(1, vec![2]), (2, vec![3]), (3, vec![])]);
        assert!(find_one_cycle(&graph).is_none());
    }

    #[test]
    fn direct_cycle_is_detected() {
        let graph = graph_from(vec![(1, vec![2]), (2, vec![1])]);
        let cycle = find_one_cycle(&graph).expect("cycle");
        assert!(cycle.contains(&DeclId::from_raw(1)));
        assert!(cycle.contains(&DeclId::from_raw(2)));
    }

    #[test]
    fn longer_cycle_is_detected() {
        let graph = graph_from(vec![(1, vec![2]), (2, vec![3]), (3, vec![1])]);
        let cycle = find_one_cycle(&graph).expect("cycle");
        assert_eq!(cycle.len(), 3);
    }

    #[test]
    fn diamond_shape_is_not_a_cycle() {
        let graph = graph_from(vec![(1, vec![2, 3]), (2, vec![4]), (3, vec![4]), (4, vec![])]);
        assert!(find_one_cycle(&graph).is_none());
    }
}
