//! Token definitions
//!
//! Tokens are deliberately coarse: keywords are plain identifiers and every
//! punctuation mark is an `Operator`. The parser matches on the token text.

use std::fmt;

/// A token: its kind, the raw lexeme and the character offset it starts at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub offset: usize,
}

impl Token {
    /// Create a new token
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }

    /// Offset of the first character after this token
    pub fn end(&self) -> usize {
        self.offset + self.text.chars().count()
    }

    /// True for an operator token with exactly this text
    pub fn is_operator(&self, text: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == text
    }
}

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Integer,
    Decimal,
    Character,
    String,
    Operator,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier => write!(f, "identifier"),
            Self::Integer => write!(f, "integer"),
            Self::Decimal => write!(f, "decimal"),
            Self::Character => write!(f, "character"),
            Self::String => write!(f, "string"),
            Self::Operator => write!(f, "operator"),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.text)
    }
}
