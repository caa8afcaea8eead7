//! Runtime value representation

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::{Rc, Weak};

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};

use super::interpreter::Interpreter;
use crate::parser::ast::{Function, Literal};
use crate::scope::{Scope, SharedScope};

/// Runtime value
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Boolean(bool),
    Character(char),
    String(String),
    Integer(BigInt),
    Decimal(BigDecimal),
    /// Shared: every binding holding the same list sees its mutations
    List(Rc<RefCell<Vec<Value>>>),
}

impl Value {
    pub fn list(elements: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(elements)))
    }

    pub fn type_name(&self) -> &str {
        match self {
            Value::Nil => "Nil",
            Value::Boolean(_) => "Boolean",
            Value::Character(_) => "Character",
            Value::String(_) => "String",
            Value::Integer(_) => "Integer",
            Value::Decimal(_) => "Decimal",
            Value::List(_) => "List",
        }
    }

    /// Whether `elements` is this value or is reachable through its elements
    pub fn contains_list(&self, elements: &Rc<RefCell<Vec<Value>>>) -> bool {
        match self {
            Value::List(inner) => {
                Rc::ptr_eq(inner, elements)
                    || inner.borrow().iter().any(|v| v.contains_list(elements))
            }
            _ => false,
        }
    }

    /// Natural order of two values with the same representation
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Character(a), Value::Character(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Nil => Value::Nil,
            Literal::Boolean(b) => Value::Boolean(*b),
            Literal::Character(c) => Value::Character(*c),
            Literal::String(s) => Value::String(s.clone()),
            Literal::Integer(n) => Value::Integer(n.clone()),
            Literal::Decimal(d) => Value::Decimal(d.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "NIL"),
            Value::Boolean(true) => write!(f, "TRUE"),
            Value::Boolean(false) => write!(f, "FALSE"),
            Value::Character(c) => write!(f, "{}", c),
            Value::String(s) => write!(f, "{}", s),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Decimal(d) => write!(f, "{}", plain_decimal(d)),
            Value::List(elements) => {
                write!(f, "[")?;
                for (i, v) in elements.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Positional form of a decimal: never an exponent, trailing zeros kept
fn plain_decimal(d: &BigDecimal) -> String {
    let (unscaled, scale) = d.as_bigint_and_exponent();
    if scale <= 0 {
        return format!("{}{}", unscaled, "0".repeat(scale.unsigned_abs() as usize));
    }

    let scale = scale as usize;
    let digits = unscaled.magnitude().to_string();
    let digits = if digits.len() <= scale {
        format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
    } else {
        digits
    };
    let (whole, fraction) = digits.split_at(digits.len() - scale);
    let sign = if unscaled.sign() == Sign::Minus { "-" } else { "" };

    format!("{}{}.{}", sign, whole, fraction)
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Character(a), Value::Character(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            _ => false,
        }
    }
}

/// A mutable binding: the value slot behind a variable at run time
#[derive(Debug)]
pub struct Binding {
    pub name: String,
    pub mutable: bool,
    pub value: RefCell<Value>,
}

impl Binding {
    pub fn new(name: impl Into<String>, mutable: bool, value: Value) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            mutable,
            value: RefCell::new(value),
        })
    }

    pub fn get(&self) -> Value {
        self.value.borrow().clone()
    }

    pub fn set(&self, value: Value) {
        *self.value.borrow_mut() = value;
    }
}

/// Scope payloads at run time
pub type RuntimeScope = SharedScope<Rc<Binding>, Callable>;

/// Native function body; errors become runtime errors at the call site
pub type NativeFunction = fn(&mut Interpreter, &[Value]) -> Result<Value, String>;

/// Something `(name, arity)` resolves to at run time
#[derive(Clone)]
pub enum Callable {
    Function {
        declaration: Rc<Function>,
        /// Weak: the defining scope owns this callable
        closure: Weak<RefCell<Scope<Rc<Binding>, Callable>>>,
    },
    Native {
        name: &'static str,
        function: NativeFunction,
    },
}

impl Callable {
    pub fn name(&self) -> &str {
        match self {
            Callable::Function { declaration, .. } => &declaration.name,
            Callable::Native { name, .. } => name,
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Function { declaration, .. } => {
                write!(f, "<fn {}/{}>", declaration.name, declaration.parameters.len())
            }
            Callable::Native { name, .. } => write!(f, "<native fn {}>", name),
        }
    }
}
