//! Semantic analysis module
//!
//! Name resolution and static typing over the parsed AST.

pub mod analyzer;

pub use analyzer::{AnalysisScope, Analyzer};
