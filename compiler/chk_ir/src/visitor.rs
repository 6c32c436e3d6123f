//! A minimal expression visitor.
//!
//! The AST walker is modeled as a visitor with one method per node kind,
//! dispatching on the node tag rather than heavyweight virtual methods. Most
//! checker passes have bespoke traversal order (declaration registration
//! order matters), so this trait is deliberately small: it exists for the
//! handful of passes that really do want "every expression under here,
//! regardless of shape" — free-variable collection for closure-capture
//! checking being the main one.

use crate::ast::{Expr, ExprId, ExprKind, StmtKind, WhenSubject};
use crate::Ast;

/// Implement to walk every expression reachable from a root, in evaluation
/// order. Return `false` from a method to skip descending into its children.
pub trait ExprVisitor {
    fn visit_expr(&mut self, ast: &Ast, id: ExprId) -> bool {
        let _ = (ast, id);
        true
    }
}

/// Walk every expression reachable from `root`, calling `visitor.visit_expr`
/// pre-order. Does not descend into nested `FunctionLiteral` bodies — callers
/// that need to cross that boundary do so explicitly (that boundary is
/// exactly what closure-capture checking cares about).
pub fn walk_expr<V: ExprVisitor>(ast: &Ast, visitor: &mut V, root: ExprId, cross_closures: bool) {
    if !visitor.visit_expr(ast, root) {
        return;
    }
    let expr: &Expr = &ast.exprs[root];
    let mut children: Vec<ExprId> = Vec::new();
    match &expr.kind {
        ExprKind::IntLiteral { .. }
        | ExprKind::RealLiteral { .. }
        | ExprKind::BoolLiteral(_)
        | ExprKind::CharLiteral(_)
        | ExprKind::StringLiteral { .. }
        | ExprKind::Identifier(_)
        | ExprKind::Path(_)
        | ExprKind::Continue => {}
        ExprKind::Member { base, .. } => children.push(*base),
        ExprKind::Index { base, index } => {
            children.push(*base);
            children.push(*index);
        }
        ExprKind::Unary { operand, .. }
        | ExprKind::PrefixIncDec { operand, .. }
        | ExprKind::PostfixIncDec { operand, .. }
        | ExprKind::AddressOf { operand, .. }
        | ExprKind::Deref { operand }
        | ExprKind::As { operand, .. } => children.push(*operand),
        ExprKind::Binary { lhs, rhs, .. } | ExprKind::Assign { target: lhs, value: rhs } => {
            children.push(*lhs);
            children.push(*rhs);
        }
        ExprKind::Call { callee, args, .. } => {
            children.push(*callee);
            children.extend(args.iter().map(|a| a.value));
        }
        ExprKind::RecordLiteral { fields, .. } => {
            children.extend(fields.iter().map(|f| f.value));
        }
        ExprKind::TupleLiteral(items) | ExprKind::ArrayLiteral(items) => {
            children.extend(items.iter().copied());
        }
        ExprKind::Range { lo, hi, .. } => {
            children.extend(lo.iter().copied());
            children.extend(hi.iter().copied());
        }
        ExprKind::When {
            subject,
            arms,
            else_branch,
        } => {
            match subject {
                WhenSubject::Value(e) | WhenSubject::Cast { expr: e, .. } => children.push(*e),
            }
            for arm in arms {
                if let Some(guard) = arm.guard {
                    children.push(guard);
                }
                children.push(arm.body);
            }
            children.extend(else_branch.iter().copied());
        }
        ExprKind::For {
            iterable,
            cond,
            body,
            ..
        } => {
            children.extend(iterable.iter().copied());
            children.extend(cond.iter().copied());
            children.push(*body);
        }
        ExprKind::Break(e) | ExprKind::Return(e) => children.extend(e.iter().copied()),
        ExprKind::FunctionLiteral { body, .. } => {
            if cross_closures {
                children.push(*body);
            }
        }
        ExprKind::Block(stmts) => {
            for stmt in stmts {
                if let StmtKind::Expr(e) = &ast.stmts[*stmt].kind {
                    children.push(*e);
                }
            }
        }
    }
    for child in children {
        walk_expr(ast, visitor, child, cross_closures);
    }
}
