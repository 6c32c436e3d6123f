//! External collaborator interfaces consumed, not implemented, by the core.
//! A driver wires real implementations of these in; the checker's own
//! tests use the trivial stand-ins below.

use chk_ir::{ExprId, PatternId};
use chk_types::{ConstValue, TypeId};

/// Evaluates a constant expression (array sizes, generic-const arguments,
/// `const` initializers) to a value. The checker never interprets
/// expressions itself — arithmetic folding, literal parsing beyond the
/// trivial cases, and named-constant lookup are the evaluator's job.
pub trait Evaluator {
    fn eval_const(&self, expr: ExprId) -> Result<ConstValue, String>;
}

/// Checks pattern exhaustiveness/reachability and compiles a set of match
/// arms into whatever representation the downstream codegen wants. The
/// checker only type-checks each pattern's shape against the scrutinee type
///; it delegates the exhaustiveness question entirely.
pub trait PatternMatcher {
    /// Returns `Ok(())` if `arms` exhaustively and non-redundantly cover
    /// `scrutinee_ty`, or a human-readable diagnostic message otherwise.
    fn check_exhaustiveness(&self, scrutinee_ty: TypeId, arms: &[PatternId]) -> Result<(), String>;
}

/// An evaluator that can't evaluate anything — useful for unit tests that
/// exercise type checking paths without constant folding.
#[derive(Debug, Default)]
pub struct NullEvaluator;

impl Evaluator for NullEvaluator {
    fn eval_const(&self, _expr: ExprId) -> Result<ConstValue, String> {
        Err("constant evaluation is not available in this context".to_string())
    }
}

/// A pattern matcher that accepts everything — useful for unit tests that
/// don't care about exhaustiveness.
#[derive(Debug, Default)]
pub struct PermissiveMatcher;

impl PatternMatcher for PermissiveMatcher {
    fn check_exhaustiveness(&self, _scrutinee_ty: TypeId, _arms: &[PatternId]) -> Result<(), String> {
        Ok(())
    }
}
