//! Parser module
//!
//! This module handles parsing tokens into an Abstract Syntax Tree (AST).

pub mod ast;
pub mod parser;

pub use ast::{BinaryOp, Case, Expr, ExprKind, Function, Global, Literal, Parameter, Source, Stmt};
pub use parser::Parser;
