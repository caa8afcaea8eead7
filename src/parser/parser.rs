//! Parser implementation
//!
//! Recursive descent over the token stream with one function per precedence
//! level. Parsing stops at the first construct that does not fit the grammar.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use super::ast::*;
use crate::error::{PlcError, PlcResult};
use crate::lexer::{Token, TokenKind};

const GLOBAL_KEYWORDS: [&str; 3] = ["LIST", "VAR", "VAL"];

/// Parser for a token stream
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    /// Create a new parser from tokens
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    /// Parse tokens into a `Source`
    pub fn parse(&mut self) -> PlcResult<Source> {
        let mut globals = Vec::new();
        let mut functions = Vec::new();

        while !self.is_at_end() {
            if GLOBAL_KEYWORDS.iter().any(|keyword| self.check_identifier(keyword)) {
                if !functions.is_empty() {
                    return Err(self.error("Global declarations must precede all functions"));
                }
                globals.push(self.global()?);
            } else if self.check_identifier("FUN") {
                functions.push(self.function()?);
            } else {
                return Err(self.error("Expected a global or function declaration"));
            }
        }

        Ok(Source { globals, functions })
    }

    // ===== Declarations =====

    fn global(&mut self) -> PlcResult<Global> {
        let keyword = self.advance().text.clone();
        let name = self.consume_identifier("Expected global name")?;
        let type_name = self.type_annotation()?;

        let (value, mutable, list) = match keyword.as_str() {
            "LIST" => {
                let value = if self.match_operator("=") {
                    Some(self.list_literal()?)
                } else {
                    None
                };
                (value, true, true)
            }
            "VAR" => {
                let value = if self.match_operator("=") {
                    Some(self.expression()?)
                } else {
                    None
                };
                (value, true, false)
            }
            _ => {
                self.consume_operator("=", "Expected '=' after VAL name")?;
                (Some(self.expression()?), false, false)
            }
        };

        self.consume_operator(";", "Expected ';' after global declaration")?;

        Ok(Global {
            name,
            type_name,
            mutable,
            list,
            value,
            variable: None,
        })
    }

    fn list_literal(&mut self) -> PlcResult<Expr> {
        self.consume_operator("[", "Expected '[' to start a list")?;

        let mut elements = Vec::new();
        if !self.check_operator("]") {
            loop {
                elements.push(self.expression()?);
                if !self.match_operator(",") {
                    break;
                }
            }
        }

        self.consume_operator("]", "Expected ']' after list elements")?;
        Ok(Expr::new(ExprKind::List(elements)))
    }

    fn function(&mut self) -> PlcResult<Function> {
        self.consume_keyword("FUN", "Expected 'FUN'")?;
        let name = self.consume_identifier("Expected function name")?;

        self.consume_operator("(", "Expected '(' after function name")?;

        let mut parameters = Vec::new();
        if !self.check_operator(")") {
            loop {
                let param_name = self.consume_identifier("Expected parameter name")?;
                self.consume_operator(":", "Expected ':' after parameter name")?;
                let type_name = self.consume_identifier("Expected parameter type")?;
                parameters.push(Parameter {
                    name: param_name,
                    type_name,
                });

                if !self.match_operator(",") {
                    break;
                }
            }
        }

        self.consume_operator(")", "Expected ')' after parameters")?;

        let return_type_name = self.type_annotation()?;

        self.consume_keyword("DO", "Expected 'DO' before function body")?;
        let body = self.block(&["END"])?;
        self.consume_keyword("END", "Expected 'END' after function body")?;

        Ok(Function {
            name,
            parameters,
            return_type_name,
            body,
            signature: None,
        })
    }

    /// `(':' identifier)?`
    fn type_annotation(&mut self) -> PlcResult<Option<String>> {
        if self.match_operator(":") {
            Ok(Some(self.consume_identifier("Expected type name after ':'")?))
        } else {
            Ok(None)
        }
    }

    // ===== Statements =====

    /// Statements up to (not including) one of `terminators`
    fn block(&mut self, terminators: &[&str]) -> PlcResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !terminators.iter().any(|t| self.check_identifier(t)) {
            if self.is_at_end() {
                return Err(self.error(&format!("Expected '{}'", terminators[terminators.len() - 1])));
            }
            statements.push(self.statement()?);
        }

        Ok(statements)
    }

    fn statement(&mut self) -> PlcResult<Stmt> {
        if self.match_keyword("LET") {
            self.declaration_statement()
        } else if self.match_keyword("IF") {
            self.if_statement()
        } else if self.match_keyword("SWITCH") {
            self.switch_statement()
        } else if self.match_keyword("WHILE") {
            self.while_statement()
        } else if self.match_keyword("RETURN") {
            self.return_statement()
        } else {
            self.expression_statement()
        }
    }

    fn declaration_statement(&mut self) -> PlcResult<Stmt> {
        let name = self.consume_identifier("Expected variable name after 'LET'")?;
        let type_name = self.type_annotation()?;

        let value = if self.match_operator("=") {
            Some(self.expression()?)
        } else {
            None
        };

        if type_name.is_none() && value.is_none() {
            return Err(self.error("Declaration requires a type or an initial value"));
        }

        self.consume_operator(";", "Expected ';' after declaration")?;

        Ok(Stmt::Declaration {
            name,
            type_name,
            value,
            variable: None,
        })
    }

    fn if_statement(&mut self) -> PlcResult<Stmt> {
        let condition = self.expression()?;
        self.consume_keyword("DO", "Expected 'DO' after if condition")?;

        let then_branch = self.block(&["ELSE", "END"])?;
        let else_branch = if self.match_keyword("ELSE") {
            self.block(&["END"])?
        } else {
            Vec::new()
        };

        self.consume_keyword("END", "Expected 'END' after if statement")?;

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn switch_statement(&mut self) -> PlcResult<Stmt> {
        let condition = self.expression()?;
        let mut cases = Vec::new();

        while self.match_keyword("CASE") {
            let value = self.expression()?;
            self.consume_operator(":", "Expected ':' after case value")?;
            let body = self.block(&["CASE", "DEFAULT", "END"])?;
            cases.push(Case {
                value: Some(value),
                body,
            });
        }

        if self.match_keyword("DEFAULT") {
            let body = self.block(&["CASE", "DEFAULT", "END"])?;
            if !self.check_identifier("END") {
                return Err(self.error("DEFAULT must be the last case of a switch"));
            }
            cases.push(Case { value: None, body });
        }

        self.consume_keyword("END", "Expected 'END' after switch statement")?;

        Ok(Stmt::Switch { condition, cases })
    }

    fn while_statement(&mut self) -> PlcResult<Stmt> {
        let condition = self.expression()?;
        self.consume_keyword("DO", "Expected 'DO' after while condition")?;
        let body = self.block(&["END"])?;
        self.consume_keyword("END", "Expected 'END' after while body")?;

        Ok(Stmt::While { condition, body })
    }

    fn return_statement(&mut self) -> PlcResult<Stmt> {
        let value = self.expression()?;
        self.consume_operator(";", "Expected ';' after return value")?;
        Ok(Stmt::Return { value })
    }

    fn expression_statement(&mut self) -> PlcResult<Stmt> {
        let expr = self.expression()?;

        if self.match_operator("=") {
            let value = self.expression()?;
            self.consume_operator(";", "Expected ';' after assignment")?;
            Ok(Stmt::Assignment {
                receiver: expr,
                value,
            })
        } else {
            self.consume_operator(";", "Expected '=' or ';' after expression")?;
            Ok(Stmt::Expression { expr })
        }
    }

    // ===== Expressions =====

    fn expression(&mut self) -> PlcResult<Expr> {
        self.logical()
    }

    fn logical(&mut self) -> PlcResult<Expr> {
        let mut expr = self.comparison()?;

        loop {
            let operator = if self.match_operator("&&") {
                BinaryOp::And
            } else if self.match_operator("||") {
                BinaryOp::Or
            } else {
                break;
            };
            let right = self.comparison()?;
            expr = Expr::binary(operator, expr, right);
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> PlcResult<Expr> {
        let mut expr = self.additive()?;

        while let Some(operator) = self.comparison_operator() {
            let right = self.additive()?;
            expr = Expr::binary(operator, expr, right);
        }

        Ok(expr)
    }

    /// Consume a comparison operator; `<` or `>` directly followed by `=`
    /// forms `<=` or `>=`
    fn comparison_operator(&mut self) -> Option<BinaryOp> {
        if self.match_operator("==") {
            return Some(BinaryOp::Equal);
        }
        if self.match_operator("!=") {
            return Some(BinaryOp::NotEqual);
        }

        let (strict, inclusive) = if self.check_operator("<") {
            (BinaryOp::Less, BinaryOp::LessEqual)
        } else if self.check_operator(">") {
            (BinaryOp::Greater, BinaryOp::GreaterEqual)
        } else {
            return None;
        };

        let end = self.advance().end();
        let adjacent_equals = self
            .peek()
            .is_some_and(|next| next.is_operator("=") && next.offset == end);

        if adjacent_equals {
            self.advance();
            Some(inclusive)
        } else {
            Some(strict)
        }
    }

    fn additive(&mut self) -> PlcResult<Expr> {
        let mut expr = self.multiplicative()?;

        loop {
            let operator = if self.match_operator("+") {
                BinaryOp::Add
            } else if self.match_operator("-") {
                BinaryOp::Subtract
            } else {
                break;
            };
            let right = self.multiplicative()?;
            expr = Expr::binary(operator, expr, right);
        }

        Ok(expr)
    }

    fn multiplicative(&mut self) -> PlcResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            let operator = if self.match_operator("*") {
                BinaryOp::Multiply
            } else if self.match_operator("/") {
                BinaryOp::Divide
            } else if self.match_operator("^") {
                BinaryOp::Power
            } else {
                break;
            };
            let right = self.primary()?;
            expr = Expr::binary(operator, expr, right);
        }

        Ok(expr)
    }

    fn primary(&mut self) -> PlcResult<Expr> {
        let token = match self.peek() {
            Some(token) => token.clone(),
            None => return Err(self.error("Expected expression")),
        };

        match token.kind {
            TokenKind::Identifier => match token.text.as_str() {
                "NIL" => {
                    self.advance();
                    Ok(Expr::literal(Literal::Nil))
                }
                "TRUE" => {
                    self.advance();
                    Ok(Expr::literal(Literal::Boolean(true)))
                }
                "FALSE" => {
                    self.advance();
                    Ok(Expr::literal(Literal::Boolean(false)))
                }
                _ => {
                    self.advance();
                    self.name_expression(token.text)
                }
            },

            TokenKind::Integer => {
                self.advance();
                let value = BigInt::from_str(&token.text).map_err(|_| {
                    PlcError::parse_error(format!("Invalid integer literal '{}'", token.text), token.offset)
                })?;
                Ok(Expr::literal(Literal::Integer(value)))
            }

            TokenKind::Decimal => {
                self.advance();
                let value = BigDecimal::from_str(&token.text).map_err(|_| {
                    PlcError::parse_error(format!("Invalid decimal literal '{}'", token.text), token.offset)
                })?;
                Ok(Expr::literal(Literal::Decimal(value)))
            }

            TokenKind::Character => {
                self.advance();
                let body = unescape(strip_quotes(&token.text));
                let mut chars = body.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Expr::literal(Literal::Character(c))),
                    _ => Err(PlcError::parse_error("Invalid character literal", token.offset)),
                }
            }

            TokenKind::String => {
                self.advance();
                Ok(Expr::literal(Literal::String(unescape(strip_quotes(&token.text)))))
            }

            TokenKind::Operator if token.text == "(" => {
                self.advance();
                let inner = self.expression()?;
                self.consume_operator(")", "Expected ')' after expression")?;
                Ok(Expr::new(ExprKind::Group(Box::new(inner))))
            }

            TokenKind::Operator => Err(self.error("Expected expression")),
        }
    }

    /// A call `name(args)`, an indexed access `name[i]`, or a plain access
    fn name_expression(&mut self, name: String) -> PlcResult<Expr> {
        if self.match_operator("(") {
            let mut arguments = Vec::new();
            if !self.check_operator(")") {
                loop {
                    arguments.push(self.expression()?);
                    if !self.match_operator(",") {
                        break;
                    }
                }
            }
            self.consume_operator(")", "Expected ')' after arguments")?;
            return Ok(Expr::call(name, arguments));
        }

        if self.match_operator("[") {
            let index = self.expression()?;
            self.consume_operator("]", "Expected ']' after list index")?;
            return Ok(Expr::access(name, Some(index)));
        }

        Ok(Expr::access(name, None))
    }

    // ===== Helper Methods =====

    fn check_operator(&self, text: &str) -> bool {
        self.peek().is_some_and(|t| t.is_operator(text))
    }

    fn check_identifier(&self, text: &str) -> bool {
        self.peek()
            .is_some_and(|t| t.kind == TokenKind::Identifier && t.text == text)
    }

    fn match_operator(&mut self, text: &str) -> bool {
        if self.check_operator(text) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_keyword(&mut self, keyword: &str) -> bool {
        if self.check_identifier(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume_operator(&mut self, text: &str, message: &str) -> PlcResult<&Token> {
        if self.check_operator(text) {
            Ok(self.advance())
        } else {
            Err(self.error(message))
        }
    }

    fn consume_keyword(&mut self, keyword: &str, message: &str) -> PlcResult<&Token> {
        if self.check_identifier(keyword) {
            Ok(self.advance())
        } else {
            Err(self.error(message))
        }
    }

    fn consume_identifier(&mut self, message: &str) -> PlcResult<String> {
        match self.peek() {
            Some(token) if token.kind == TokenKind::Identifier => Ok(self.advance().text.clone()),
            _ => Err(self.error(message)),
        }
    }

    /// Callers check `is_at_end` or a `check_*` helper first
    fn advance(&mut self) -> &Token {
        let token = &self.tokens[self.current];
        self.current += 1;
        token
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    /// Error at the current token, or just past the last token at end of input
    fn error(&self, message: &str) -> PlcError {
        let offset = match self.peek() {
            Some(token) => token.offset,
            None => self.tokens.last().map_or(0, Token::end),
        };
        PlcError::parse_error(message, offset)
    }
}

/// Drop the surrounding quote characters of a character or string lexeme
fn strip_quotes(text: &str) -> &str {
    let mut chars = text.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

/// Replace the escape sequences the lexer admits
fn unescape(body: &str) -> String {
    let mut result = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('b') => result.push('\u{0008}'),
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use pretty_assertions::assert_eq;

    fn parse_source(source: &str) -> PlcResult<Source> {
        let tokens = Lexer::new(source).tokenize()?;
        Parser::new(tokens).parse()
    }

    /// Parse `FUN main() DO <body> END` and return the body
    fn parse_body(body: &str) -> Vec<Stmt> {
        let source = format!("FUN main() DO {} END", body);
        parse_source(&source).unwrap().functions.remove(0).body
    }

    fn parse_expr(expr: &str) -> Expr {
        match parse_body(&format!("RETURN {};", expr)).remove(0) {
            Stmt::Return { value } => value,
            other => panic!("expected return, got {:?}", other),
        }
    }

    fn int(n: i64) -> Expr {
        Expr::literal(Literal::Integer(BigInt::from(n)))
    }

    fn var(name: &str) -> Expr {
        Expr::access(name, None)
    }

    #[test]
    fn test_empty_source() {
        let source = parse_source("").unwrap();
        assert!(source.globals.is_empty());
        assert!(source.functions.is_empty());
    }

    #[test]
    fn test_globals() {
        let source = parse_source("VAR x = 5; VAL y: Integer = 1; LIST xs: Integer = [1, 2]; VAR z: String;").unwrap();

        assert_eq!(source.globals.len(), 4);
        assert_eq!(source.globals[0].name, "x");
        assert!(source.globals[0].mutable);
        assert_eq!(source.globals[0].value, Some(int(5)));

        assert_eq!(source.globals[1].type_name.as_deref(), Some("Integer"));
        assert!(!source.globals[1].mutable);

        assert!(source.globals[2].list);
        assert_eq!(
            source.globals[2].value,
            Some(Expr::new(ExprKind::List(vec![int(1), int(2)])))
        );

        assert_eq!(source.globals[3].value, None);
    }

    #[test]
    fn test_val_requires_initializer() {
        let err = parse_source("VAL x;").unwrap_err();
        assert_eq!(err.offset(), Some(5));
    }

    #[test]
    fn test_global_requires_semicolon() {
        let err = parse_source("VAR x = 1").unwrap_err();
        assert!(err.message().contains("';'"));
        assert_eq!(err.offset(), Some(9));
    }

    #[test]
    fn test_globals_must_precede_functions() {
        assert!(parse_source("FUN main(): Integer DO RETURN 0; END VAR x = 1;").is_err());
    }

    #[test]
    fn test_function_declaration() {
        let source = parse_source("FUN add(a: Integer, b: Integer): Integer DO RETURN a + b; END").unwrap();
        let function = &source.functions[0];

        assert_eq!(function.name, "add");
        assert_eq!(
            function.parameters,
            vec![
                Parameter { name: "a".into(), type_name: "Integer".into() },
                Parameter { name: "b".into(), type_name: "Integer".into() },
            ]
        );
        assert_eq!(function.return_type_name.as_deref(), Some("Integer"));
        assert_eq!(
            function.body,
            vec![Stmt::Return {
                value: Expr::binary(BinaryOp::Add, var("a"), var("b"))
            }]
        );
    }

    #[test]
    fn test_missing_end() {
        let err = parse_source("FUN main() DO print(1);").unwrap_err();
        assert!(err.message().contains("END"));
        assert_eq!(err.offset(), Some(23));
    }

    #[test]
    fn test_declaration_statements() {
        let body = parse_body("LET a = 1; LET b: Decimal; LET c: String = \"s\";");
        assert!(matches!(&body[0], Stmt::Declaration { name, type_name: None, value: Some(_), .. } if name == "a"));
        assert!(matches!(&body[1], Stmt::Declaration { type_name: Some(t), value: None, .. } if t == "Decimal"));
        assert!(matches!(&body[2], Stmt::Declaration { type_name: Some(_), value: Some(_), .. }));
    }

    #[test]
    fn test_declaration_needs_type_or_value() {
        assert!(parse_source("FUN main() DO LET a; END").is_err());
    }

    #[test]
    fn test_assignment_and_expression_statements() {
        let body = parse_body("x = 1; xs[0] = 2; print(x);");
        assert_eq!(
            body,
            vec![
                Stmt::Assignment { receiver: var("x"), value: int(1) },
                Stmt::Assignment {
                    receiver: Expr::access("xs", Some(int(0))),
                    value: int(2)
                },
                Stmt::Expression { expr: Expr::call("print", vec![var("x")]) },
            ]
        );
    }

    #[test]
    fn test_expression_statement_needs_semicolon() {
        let err = parse_source("FUN main() DO print(1) END").unwrap_err();
        assert!(err.message().contains("';'"));
    }

    #[test]
    fn test_if_else() {
        let body = parse_body("IF x DO print(1); ELSE print(2); END");
        match &body[0] {
            Stmt::If { condition, then_branch, else_branch } => {
                assert_eq!(condition, &var("x"));
                assert_eq!(then_branch.len(), 1);
                assert_eq!(else_branch.len(), 1);
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_switch() {
        let body = parse_body("SWITCH x CASE 1: print(1); CASE 2: print(2); print(3); DEFAULT print(0); END");
        match &body[0] {
            Stmt::Switch { cases, .. } => {
                assert_eq!(cases.len(), 3);
                assert_eq!(cases[0].value, Some(int(1)));
                assert_eq!(cases[1].body.len(), 2);
                assert_eq!(cases[2].value, None);
            }
            other => panic!("expected switch, got {:?}", other),
        }
    }

    #[test]
    fn test_switch_default_must_be_last() {
        let err = parse_source("FUN main() DO SWITCH x DEFAULT print(0); CASE 1: print(1); END END").unwrap_err();
        assert!(err.message().contains("DEFAULT"));
    }

    #[test]
    fn test_while() {
        let body = parse_body("WHILE i < 10 DO i = i + 1; END");
        assert!(matches!(&body[0], Stmt::While { body, .. } if body.len() == 1));
    }

    #[test]
    fn test_precedence() {
        // 1 + 2 * 3 == 7 && TRUE
        let expr = parse_expr("1 + 2 * 3 == 7 && TRUE");
        let expected = Expr::binary(
            BinaryOp::And,
            Expr::binary(
                BinaryOp::Equal,
                Expr::binary(
                    BinaryOp::Add,
                    int(1),
                    Expr::binary(BinaryOp::Multiply, int(2), int(3)),
                ),
                int(7),
            ),
            Expr::literal(Literal::Boolean(true)),
        );
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_left_associativity() {
        let expr = parse_expr("a - b - c");
        let expected = Expr::binary(
            BinaryOp::Subtract,
            Expr::binary(BinaryOp::Subtract, var("a"), var("b")),
            var("c"),
        );
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_power_binds_like_multiplication() {
        let expr = parse_expr("2 ^ 3 * 4");
        let expected = Expr::binary(
            BinaryOp::Multiply,
            Expr::binary(BinaryOp::Power, int(2), int(3)),
            int(4),
        );
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_inclusive_comparisons() {
        assert_eq!(parse_expr("a <= b"), Expr::binary(BinaryOp::LessEqual, var("a"), var("b")));
        assert_eq!(parse_expr("a >= b"), Expr::binary(BinaryOp::GreaterEqual, var("a"), var("b")));
        assert_eq!(parse_expr("a > b"), Expr::binary(BinaryOp::Greater, var("a"), var("b")));
    }

    #[test]
    fn test_group() {
        let expr = parse_expr("(1 + 2)");
        assert_eq!(
            expr,
            Expr::new(ExprKind::Group(Box::new(Expr::binary(BinaryOp::Add, int(1), int(2)))))
        );
    }

    #[test]
    fn test_unclosed_group() {
        assert!(parse_source("FUN main() DO RETURN (1 + 2; END").is_err());
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse_expr("NIL"), Expr::literal(Literal::Nil));
        assert_eq!(parse_expr("FALSE"), Expr::literal(Literal::Boolean(false)));
        assert_eq!(parse_expr("'\\n'"), Expr::literal(Literal::Character('\n')));
        assert_eq!(
            parse_expr("\"a\\tb\\\"c\""),
            Expr::literal(Literal::String("a\tb\"c".to_string()))
        );
        assert_eq!(
            parse_expr("-1.50"),
            Expr::literal(Literal::Decimal(BigDecimal::from_str("-1.50").unwrap()))
        );
        assert_eq!(
            parse_expr("123456789012345678901234567890"),
            Expr::literal(Literal::Integer(
                BigInt::from_str("123456789012345678901234567890").unwrap()
            ))
        );
    }

    #[test]
    fn test_character_literals() {
        assert_eq!(parse_expr("'a'"), Expr::literal(Literal::Character('a')));
        assert_eq!(parse_expr("'\\''"), Expr::literal(Literal::Character('\'')));
        assert_eq!(parse_expr("'\\\\'"), Expr::literal(Literal::Character('\\')));
    }

    #[test]
    fn test_calls() {
        assert_eq!(parse_expr("f()"), Expr::call("f", vec![]));
        assert_eq!(parse_expr("f(1, x)"), Expr::call("f", vec![int(1), var("x")]));
    }

    #[test]
    fn test_unexpected_token() {
        let err = parse_source("FUN main() DO RETURN ;; END").unwrap_err();
        assert_eq!(err.message(), "Expected expression");
        assert_eq!(err.offset(), Some(21));
    }

    #[test]
    fn test_stray_top_level_token() {
        assert!(parse_source("print(1);").is_err());
    }
}
