//! The semantic checker core: name resolution, type inference, and generic
//! monomorphization over a parsed [`chk_ir::Compilation`].
//!
//! `chk_check` performs no parsing and no I/O — a driver (`crate::driver`)
//! hands it a [`chk_ir::Compilation`] plus an owned [`chk_ir::Ast`] and gets
//! back a [`driver::CheckOutcome`]: per-workspace ordered declarations, the
//! program's entry point if any, and every [`chk_diagnostic::Diagnostic`]
//! raised along the way. Everything downstream of that — formatting
//! diagnostics, evaluating constant expressions, compiling pattern matches —
//! is supplied by the embedder through the [`interfaces::Evaluator`]/
//! [`interfaces::PatternMatcher`] traits.

pub mod annotation;
pub mod concepts;
pub mod cycles;
pub mod driver;
pub mod env;
pub mod expr;
pub mod extensions;
pub mod generics;
pub mod imports;
pub mod interfaces;
pub mod matcher;
pub mod pattern;
pub mod resolve;
pub mod subst_ast;
pub mod suggest;
pub mod type_resolve;
pub mod unparse;

pub use annotation::{Annotation, AnnotationTable, CyclicReentry};
pub use driver::{check, CheckOutcome, WorkspaceOutput};
pub use env::{Env, EnvGraph, EnvId, Lookup, Namespace};
pub use expr::{ExprChecker, FlowContext};
pub use extensions::ExtensionRegistry;
pub use generics::{Instantiator, MAX_INSTANTIATION_DEPTH};
pub use imports::ImportGraph;
pub use interfaces::{Evaluator, NullEvaluator, PatternMatcher, PermissiveMatcher};
pub use type_resolve::TypeResolver;
