//! Abstract Syntax Tree definitions
//!
//! The parser builds these nodes once. The analyzer fills in the `ty`,
//! `variable` and `signature` slots in place and never restructures the tree;
//! the interpreter only reads it.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use std::fmt;

use crate::types::{FunctionSignature, Type, Variable};

/// Root AST node representing a complete program
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub globals: Vec<Global>,
    pub functions: Vec<Function>,
}

/// Global declaration: `LIST`, `VAR` or `VAL`
#[derive(Debug, Clone, PartialEq)]
pub struct Global {
    pub name: String,
    pub type_name: Option<String>,
    pub mutable: bool,
    pub list: bool,
    pub value: Option<Expr>,
    pub variable: Option<Variable>,
}

/// A function parameter with its declared type name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
}

/// Function declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type_name: Option<String>,
    pub body: Vec<Stmt>,
    pub signature: Option<FunctionSignature>,
}

/// Statement node
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// A call evaluated for its effect: `print(x);`
    Expression { expr: Expr },

    /// Local declaration: `LET x: Integer = 1;`
    Declaration {
        name: String,
        type_name: Option<String>,
        value: Option<Expr>,
        variable: Option<Variable>,
    },

    /// `receiver = value;`
    Assignment { receiver: Expr, value: Expr },

    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Vec<Stmt>,
    },

    Switch { condition: Expr, cases: Vec<Case> },

    While { condition: Expr, body: Vec<Stmt> },

    Return { value: Expr },
}

/// A `CASE` arm, or the `DEFAULT` arm when `value` is absent
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub value: Option<Expr>,
    pub body: Vec<Stmt>,
}

/// Expression node; `ty` is empty until analysis
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Option<Type>,
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self { kind, ty: None }
    }

    pub fn literal(value: Literal) -> Self {
        Self::new(ExprKind::Literal(value))
    }

    pub fn access(name: impl Into<String>, index: Option<Expr>) -> Self {
        Self::new(ExprKind::Access {
            name: name.into(),
            index: index.map(Box::new),
            variable: None,
        })
    }

    pub fn call(name: impl Into<String>, arguments: Vec<Expr>) -> Self {
        Self::new(ExprKind::Call {
            name: name.into(),
            arguments,
            signature: None,
        })
    }

    pub fn binary(operator: BinaryOp, left: Expr, right: Expr) -> Self {
        Self::new(ExprKind::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}

/// Expression variants
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal),

    /// Parenthesized expression
    Group(Box<Expr>),

    Binary {
        operator: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Variable reference, optionally indexed: `x` or `xs[i]`
    Access {
        name: String,
        index: Option<Box<Expr>>,
        variable: Option<Variable>,
    },

    Call {
        name: String,
        arguments: Vec<Expr>,
        signature: Option<FunctionSignature>,
    },

    /// `[a, b, c]`
    List(Vec<Expr>),
}

/// Literal value
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Nil,
    Boolean(bool),
    Character(char),
    String(String),
    Integer(BigInt),
    Decimal(BigDecimal),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Or,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Power => "^",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
