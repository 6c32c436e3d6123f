//! The type data model: category rules, structural/identity comparison,
//! interning, substitution, arithmetic widening, conversion classification,
//! behaviour-conformance registry, and generic-instantiation mangling.
//!
//! `chk_check` owns *inference* (deciding what a `TypeId` should be); this
//! crate only owns the representation and the context-free rules over it.

pub mod arith;
pub mod const_value;
pub mod convert;
pub mod data;
pub mod interner;
pub mod mangle;
pub mod registry;
pub mod subst;
pub mod type_id;

pub use arith::{widen, Widening};
pub use const_value::ConstValue;
pub use convert::{classify, Conversion};
pub use data::{ArraySize, TypeArgValue, TypeData};
pub use interner::TypeInterner;
pub use mangle::mangle;
pub use registry::ImplRegistry;
pub use subst::Substitution;
pub use type_id::TypeId;
