//! Lexer/Scanner implementation
//!
//! Converts source text into a flat token stream. Scanning stops at the
//! first malformed lexeme; no partial tokens are ever produced.

use super::token::{Token, TokenKind};
use crate::error::{PlcError, PlcResult};

/// Lexer for source text
pub struct Lexer {
    source: Vec<char>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
}

impl Lexer {
    /// Create a new lexer
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
        }
    }

    /// Tokenize the source code
    pub fn tokenize(&mut self) -> PlcResult<Vec<Token>> {
        while !self.is_at_end() {
            if is_whitespace(self.peek()) {
                self.advance();
                continue;
            }
            self.start = self.current;
            self.scan_token()?;
        }

        Ok(std::mem::take(&mut self.tokens))
    }

    /// Scan a single token starting at `self.start`
    fn scan_token(&mut self) -> PlcResult<()> {
        let c = self.peek();

        if c == '@' || c.is_ascii_alphabetic() {
            self.scan_identifier()
        } else if self.starts_number() {
            self.scan_number()
        } else if c == '\'' {
            self.scan_character()
        } else if c == '"' {
            self.scan_string()
        } else {
            self.scan_operator()
        }
    }

    /// A digit, a `-` before a non-zero digit, or a `-` before `0.digit`
    fn starts_number(&self) -> bool {
        match self.peek() {
            c if c.is_ascii_digit() => true,
            '-' => match self.peek_at(1) {
                '1'..='9' => true,
                '0' => self.peek_at(2) == '.' && self.peek_at(3).is_ascii_digit(),
                _ => false,
            },
            _ => false,
        }
    }

    /// Scan an identifier; `@` is only legal as the first character
    fn scan_identifier(&mut self) -> PlcResult<()> {
        self.advance();

        while matches!(self.peek(), c if c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            self.advance();
        }

        self.add_token(TokenKind::Identifier)
    }

    /// Scan an integer or decimal literal
    fn scan_number(&mut self) -> PlcResult<()> {
        self.match_char('-');

        if self.match_char('0') {
            if self.peek().is_ascii_digit() {
                return Err(self.error_at(self.start, "Leading zeros are not permitted"));
            }
        } else {
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        if self.peek() == '.' && self.peek_at(1).is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
            self.add_token(TokenKind::Decimal)
        } else {
            self.add_token(TokenKind::Integer)
        }
    }

    /// Scan a character literal: exactly one character or escape
    fn scan_character(&mut self) -> PlcResult<()> {
        self.advance();

        match self.peek() {
            '\'' => return Err(self.error_at(self.current, "Empty character literal")),
            '\\' => self.scan_escape()?,
            '\n' | '\r' => {
                return Err(self.error_at(self.current, "Unterminated character literal"))
            }
            _ if self.is_at_end() => {
                return Err(self.error_at(self.current, "Unterminated character literal"))
            }
            _ => {
                self.advance();
            }
        }

        if self.match_char('\'') {
            self.add_token(TokenKind::Character)
        } else {
            Err(self.error_at(self.current, "Unterminated character literal"))
        }
    }

    /// Scan a string literal
    fn scan_string(&mut self) -> PlcResult<()> {
        self.advance();

        loop {
            if self.is_at_end() {
                return Err(self.error_at(self.current, "Unterminated string"));
            }

            match self.peek() {
                '"' => {
                    self.advance();
                    return self.add_token(TokenKind::String);
                }
                '\n' | '\r' => return Err(self.error_at(self.current, "Unterminated string")),
                '\\' => self.scan_escape()?,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Scan `\` plus one of `b n r t ' " \`
    fn scan_escape(&mut self) -> PlcResult<()> {
        let backslash = self.current;
        self.advance();

        match self.peek() {
            'b' | 'n' | 'r' | 't' | '\'' | '"' | '\\' => {
                self.advance();
                Ok(())
            }
            _ if self.is_at_end() => Err(self.error_at(backslash, "Invalid escape sequence")),
            other => Err(self.error_at(
                backslash,
                format!("Invalid escape sequence '\\{}'", other),
            )),
        }
    }

    /// Scan one of the two-character operators or any single character
    fn scan_operator(&mut self) -> PlcResult<()> {
        match self.advance() {
            '!' | '=' => self.match_char('='),
            '&' => self.match_char('&'),
            '|' => self.match_char('|'),
            _ => false,
        };

        self.add_token(TokenKind::Operator)
    }

    /// Add a token spanning `start..current`
    fn add_token(&mut self, kind: TokenKind) -> PlcResult<()> {
        let text: String = self.source[self.start..self.current].iter().collect();
        self.tokens.push(Token::new(kind, text, self.start));
        Ok(())
    }

    /// Advance to the next character
    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        c
    }

    /// Check if the next character matches and consume it if so
    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.source[self.current] != expected {
            false
        } else {
            self.current += 1;
            true
        }
    }

    /// Peek at the current character without consuming it
    fn peek(&self) -> char {
        self.peek_at(0)
    }

    /// Peek `distance` characters ahead, `'\0'` past the end
    fn peek_at(&self, distance: usize) -> char {
        self.source
            .get(self.current + distance)
            .copied()
            .unwrap_or('\0')
    }

    /// Check if we've reached the end of the source
    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    /// Create an error at the given offset
    fn error_at(&self, offset: usize, message: impl Into<String>) -> PlcError {
        PlcError::lex_error(message, offset)
    }
}

/// Space, tab, newline, carriage return, form feed and vertical tab
fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{000B}' | '\u{000C}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokenize_source(source: &str) -> PlcResult<Vec<Token>> {
        Lexer::new(source).tokenize()
    }

    /// True when `source` lexes to exactly one token of `kind` covering it all
    fn single(source: &str, kind: TokenKind) -> bool {
        match tokenize_source(source) {
            Ok(tokens) => tokens == vec![Token::new(kind, source, 0)],
            Err(_) => false,
        }
    }

    #[test]
    fn test_empty_source() {
        assert!(tokenize_source("").unwrap().is_empty());
        assert!(tokenize_source(" \t\n\r\u{000B}\u{000C}").unwrap().is_empty());
    }

    #[test]
    fn test_declaration_example() {
        let tokens = tokenize_source("LET x = 5;").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenKind::Identifier, "LET", 0),
                Token::new(TokenKind::Identifier, "x", 4),
                Token::new(TokenKind::Operator, "=", 6),
                Token::new(TokenKind::Integer, "5", 8),
                Token::new(TokenKind::Operator, ";", 9),
            ]
        );
    }

    #[test]
    fn test_call_example() {
        let tokens = tokenize_source("print(\"Hello, World!\");").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenKind::Identifier, "print", 0),
                Token::new(TokenKind::Operator, "(", 5),
                Token::new(TokenKind::String, "\"Hello, World!\"", 6),
                Token::new(TokenKind::Operator, ")", 21),
                Token::new(TokenKind::Operator, ";", 22),
            ]
        );
    }

    #[test]
    fn test_identifiers() {
        assert!(single("getName", TokenKind::Identifier));
        assert!(single("thelegend27", TokenKind::Identifier));
        assert!(single("@gmail", TokenKind::Identifier));
        assert!(single("@", TokenKind::Identifier));
        assert!(single("ritika-lara", TokenKind::Identifier));
        assert!(single("user_name", TokenKind::Identifier));
        assert!(!single("gm@il", TokenKind::Identifier));
        assert!(!single("_apple", TokenKind::Identifier));
        assert!(!single("-five", TokenKind::Identifier));
        assert!(!single("1fish", TokenKind::Identifier));
    }

    #[test]
    fn test_integers() {
        assert!(single("0", TokenKind::Integer));
        assert!(single("1", TokenKind::Integer));
        assert!(single("-1", TokenKind::Integer));
        assert!(single("35000", TokenKind::Integer));
        assert!(!single("-0", TokenKind::Integer));
        assert!(!single("+10", TokenKind::Integer));
        assert!(!single("123.456", TokenKind::Integer));
    }

    #[test]
    fn test_leading_zeros_rejected() {
        let err = tokenize_source("007").unwrap_err();
        assert_eq!(err.offset(), Some(0));
        assert!(tokenize_source("01").is_err());
        assert!(tokenize_source("x = -01234").is_err());
    }

    #[test]
    fn test_negative_zero_is_an_operator_and_zero() {
        let tokens = tokenize_source("-0").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenKind::Operator, "-", 0),
                Token::new(TokenKind::Integer, "0", 1),
            ]
        );
    }

    #[test]
    fn test_decimals() {
        assert!(single("123.456", TokenKind::Decimal));
        assert!(single("-1.0", TokenKind::Decimal));
        assert!(single("0.51", TokenKind::Decimal));
        assert!(single("-0.51", TokenKind::Decimal));
        assert!(single("7.000", TokenKind::Decimal));
        assert!(!single("1.", TokenKind::Decimal));
        assert!(!single(".5", TokenKind::Decimal));
        assert!(!single("1..0", TokenKind::Decimal));
        assert!(!single("000.51", TokenKind::Decimal));
    }

    #[test]
    fn test_trailing_dot_splits() {
        let tokens = tokenize_source("1.").unwrap();
        assert_eq!(tokens[0], Token::new(TokenKind::Integer, "1", 0));
        assert_eq!(tokens[1], Token::new(TokenKind::Operator, ".", 1));
    }

    #[test]
    fn test_characters() {
        assert!(single("'c'", TokenKind::Character));
        assert!(single("'\\n'", TokenKind::Character));
        assert!(single("'7'", TokenKind::Character));
        assert!(single("' '", TokenKind::Character));
        assert!(tokenize_source("''").is_err());
        assert!(tokenize_source("'ab'").is_err());
        assert!(tokenize_source("'a").is_err());
        assert!(tokenize_source("'\\q'").is_err());
        assert!(tokenize_source("'").is_err());
    }

    #[test]
    fn test_strings() {
        assert!(single("\"\"", TokenKind::String));
        assert!(single("\"abc\"", TokenKind::String));
        assert!(single("\"Hello,\\nWorld\"", TokenKind::String));
        assert!(single("\"1\\'2\"", TokenKind::String));
        assert!(single("\"\\\\\"", TokenKind::String));
        assert!(single("\"@#$%^&*!\"", TokenKind::String));
        assert!(tokenize_source("\"invalid\\escape\"").is_err());
        assert!(tokenize_source("\"\\u0041\"").is_err());
        assert!(tokenize_source("\"line\nbreak\"").is_err());
    }

    #[test]
    fn test_unterminated_string_offset() {
        let err = tokenize_source("\"unterminated").unwrap_err();
        assert_eq!(err.offset(), Some(13));
        assert!(err.message().contains("Unterminated string"));
    }

    #[test]
    fn test_invalid_escape_offset() {
        let err = tokenize_source("\"ab\\q\"").unwrap_err();
        assert_eq!(err.offset(), Some(3));
    }

    #[test]
    fn test_operators() {
        assert!(single("(", TokenKind::Operator));
        assert!(single("!=", TokenKind::Operator));
        assert!(single("==", TokenKind::Operator));
        assert!(single("=", TokenKind::Operator));
        assert!(single("&&", TokenKind::Operator));
        assert!(single("||", TokenKind::Operator));
        assert!(single("$", TokenKind::Operator));
        assert!(single("-", TokenKind::Operator));
        assert!(!single("= =", TokenKind::Operator));
    }

    #[test]
    fn test_compound_comparisons_are_split() {
        let tokens = tokenize_source("<=").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenKind::Operator, "<", 0),
                Token::new(TokenKind::Operator, "=", 1),
            ]
        );
    }

    #[test]
    fn test_single_ampersand() {
        let tokens = tokenize_source("&|!").unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["&", "|", "!"]);
    }

    #[test]
    fn test_hyphen_binds_into_identifiers() {
        assert!(single("x-1", TokenKind::Identifier));

        let tokens = tokenize_source("x - 1").unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Identifier, TokenKind::Operator, TokenKind::Integer]
        );
    }
}
