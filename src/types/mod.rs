//! Type system module
//!
//! The closed type model, assignability, and the operator typing table.

pub mod type_def;
pub mod operators;

pub use type_def::{require_assignable, FunctionSignature, Type, Variable};
pub use operators::binary_result_type;
