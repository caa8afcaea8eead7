//! Error handling and diagnostics
//!
//! Every pipeline stage fails fast with one of the variants below. Lexer and
//! parser errors carry the character offset of the offending input, analysis
//! and runtime errors carry only a message.

use std::fmt;

pub mod diagnostic;

pub use diagnostic::Diagnostic;

/// Result type alias used by every stage
pub type PlcResult<T> = Result<T, PlcError>;

/// Main error type for the language
#[derive(Debug, Clone, PartialEq)]
pub enum PlcError {
    /// Lexical analysis error
    LexError {
        message: String,
        offset: usize,
    },
    /// Parsing error
    ParseError {
        message: String,
        offset: usize,
    },
    /// Name resolution or typing error
    AnalysisError {
        message: String,
    },
    /// Runtime error
    RuntimeError {
        message: String,
    },
}

impl PlcError {
    /// Create a new lexer error
    pub fn lex_error(message: impl Into<String>, offset: usize) -> Self {
        Self::LexError {
            message: message.into(),
            offset,
        }
    }

    /// Create a new parse error
    pub fn parse_error(message: impl Into<String>, offset: usize) -> Self {
        Self::ParseError {
            message: message.into(),
            offset,
        }
    }

    /// Create a new analysis error
    pub fn analysis_error(message: impl Into<String>) -> Self {
        Self::AnalysisError {
            message: message.into(),
        }
    }

    /// Create a new runtime error
    pub fn runtime_error(message: impl Into<String>) -> Self {
        Self::RuntimeError {
            message: message.into(),
        }
    }

    /// Get the error kind as a string
    pub fn kind(&self) -> &str {
        match self {
            Self::LexError { .. } => "Lex Error",
            Self::ParseError { .. } => "Parse Error",
            Self::AnalysisError { .. } => "Analysis Error",
            Self::RuntimeError { .. } => "Runtime Error",
        }
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        match self {
            Self::LexError { message, .. }
            | Self::ParseError { message, .. }
            | Self::AnalysisError { message }
            | Self::RuntimeError { message } => message,
        }
    }

    /// Get the source offset if the stage that failed knows one
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::LexError { offset, .. } | Self::ParseError { offset, .. } => Some(*offset),
            Self::AnalysisError { .. } | Self::RuntimeError { .. } => None,
        }
    }
}

impl fmt::Display for PlcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(offset) = self.offset() {
            write!(f, "{}: {} at offset {}", self.kind(), self.message(), offset)
        } else {
            write!(f, "{}: {}", self.kind(), self.message())
        }
    }
}

impl std::error::Error for PlcError {}
