//! # PLC Language
//!
//! A small statically typed imperative language with:
//! - arbitrary-precision Integer and Decimal arithmetic
//! - globals, functions with overloading by arity, and lists
//! - a static analyzer that types every expression before anything runs
//!
//! ## Architecture
//!
//! The pipeline runs four stages, each failing fast on its first error:
//! - `lexer`: Tokenization of source code
//! - `parser`: Parsing tokens into an Abstract Syntax Tree (AST)
//! - `semantic`: Name resolution and type checking, annotating the AST
//! - `runtime`: Tree-walking interpreter
//!
//! Supporting modules:
//! - `scope`: Chained symbol tables used by both the analyzer and interpreter
//! - `types`: The type model and operator typing rules
//! - `config`: Interpreter settings
//! - `error`: Error handling and diagnostics

pub mod config;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod runtime;
pub mod scope;
pub mod semantic;
pub mod types;

use num_bigint::BigInt;
use tracing::debug;

// Re-export commonly used types
pub use config::{Config, DivisionScale, OutputMode};
pub use error::{Diagnostic, PlcError, PlcResult};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{Parser, Source};
pub use runtime::{Interpreter, Value};
pub use semantic::Analyzer;

/// Version of the language implementation
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result of running a program
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// The value returned by `main()`
    pub exit_value: BigInt,
    /// Printed lines; only filled in `OutputMode::Capture`
    pub output: Vec<String>,
}

/// Tokenize source code
pub fn lex(source: &str) -> PlcResult<Vec<Token>> {
    let tokens = Lexer::new(source).tokenize()?;
    debug!(tokens = tokens.len(), "lexed source");
    Ok(tokens)
}

/// Tokenize and parse source code into an unannotated AST
pub fn parse(source: &str) -> PlcResult<Source> {
    let ast = Parser::new(lex(source)?).parse()?;
    debug!(
        globals = ast.globals.len(),
        functions = ast.functions.len(),
        "parsed source"
    );
    Ok(ast)
}

/// Parse and analyze source code
///
/// The returned AST has a type on every expression and a resolved binding
/// on every access and call.
pub fn check(source: &str) -> PlcResult<Source> {
    let mut ast = parse(source)?;
    Analyzer::new().analyze(&mut ast)?;
    Ok(ast)
}

/// Compile and run a program with the default configuration
pub fn run(source: &str) -> PlcResult<Outcome> {
    run_with_config(source, &Config::default())
}

/// Compile and run a program
///
/// Lexing, parsing, analysis and interpretation run in order; the first
/// error from any stage is returned and nothing after it runs.
pub fn run_with_config(source: &str, config: &Config) -> PlcResult<Outcome> {
    let ast = check(source)?;

    let mut interpreter = Interpreter::with_config(config.clone());
    let exit_value = interpreter.run(&ast)?;

    Ok(Outcome {
        exit_value,
        output: interpreter.take_output(),
    })
}
