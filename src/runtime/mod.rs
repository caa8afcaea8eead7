//! Runtime module
//!
//! Values, run-time bindings and the tree-walking interpreter.

pub mod value;
pub mod interpreter;

pub use value::{Binding, Callable, NativeFunction, RuntimeScope, Value};
pub use interpreter::Interpreter;
