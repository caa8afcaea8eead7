//! Lexical analysis module
//!
//! This module handles tokenization of source text.

pub mod token;
pub mod scanner;

pub use token::{Token, TokenKind};
pub use scanner::Lexer;
