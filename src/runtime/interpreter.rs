//! Interpreter implementation
//!
//! Tree-walking evaluator over an analyzed AST. Types were settled by the
//! analyzer, so value mismatches here only surface through `Any` bindings.

use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};
use tracing::{debug, trace};

use super::value::{Binding, Callable, RuntimeScope, Value};
use crate::config::{Config, DivisionScale, OutputMode};
use crate::error::{PlcError, PlcResult};
use crate::parser::ast::*;
use crate::scope::Scope;

/// Outcome of executing a statement
#[derive(Debug, Clone)]
enum ControlFlow {
    None,
    Return(Value),
}

/// Interpreter
pub struct Interpreter {
    scope: RuntimeScope,
    config: Config,
    output: Vec<String>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_scope(&Scope::root(), config)
    }

    /// Interpreter whose global scope is a child of `parent`
    pub fn with_scope(parent: &RuntimeScope, config: Config) -> Self {
        let scope = Scope::child(parent);
        scope.borrow_mut().bind_function(
            "print",
            1,
            Callable::Native {
                name: "print",
                function: print,
            },
        );

        Self {
            scope,
            config,
            output: Vec::new(),
        }
    }

    /// The global scope
    pub fn scope(&self) -> RuntimeScope {
        self.scope.clone()
    }

    /// Lines printed so far in `OutputMode::Capture`
    pub fn take_output(&mut self) -> Vec<String> {
        mem::take(&mut self.output)
    }

    /// Register globals and functions, then return the value of `main()`
    pub fn run(&mut self, source: &Source) -> PlcResult<BigInt> {
        debug!(
            globals = source.globals.len(),
            functions = source.functions.len(),
            "running source"
        );

        for global in &source.globals {
            self.define_global(global)?;
        }

        for function in &source.functions {
            self.define_function(function)?;
        }

        let main = self
            .scope
            .borrow()
            .lookup_function("main", 0)
            .ok_or_else(|| PlcError::runtime_error("Main function not found"))?;

        match self.invoke(&main, Vec::new())? {
            Value::Integer(exit_value) => {
                debug!(%exit_value, "program finished");
                Ok(exit_value)
            }
            other => Err(PlcError::runtime_error(format!(
                "Main function returned {}, expected Integer",
                other.type_name()
            ))),
        }
    }

    fn define_global(&mut self, global: &Global) -> PlcResult<()> {
        let value = match &global.value {
            Some(value) => self.eval_expr(value)?,
            None if global.list => Value::list(Vec::new()),
            None => Value::Nil,
        };

        self.define_variable(Binding::new(&global.name, global.mutable, value))
    }

    fn define_function(&mut self, function: &Function) -> PlcResult<()> {
        let callable = Callable::Function {
            declaration: Rc::new(function.clone()),
            closure: Rc::downgrade(&self.scope),
        };

        self.scope
            .borrow_mut()
            .define_function(&function.name, function.parameters.len(), callable)
            .map_err(PlcError::runtime_error)
    }

    // ===== Statements =====

    fn execute_block(&mut self, statements: &[Stmt]) -> PlcResult<ControlFlow> {
        for stmt in statements {
            if let ControlFlow::Return(value) = self.execute_stmt(stmt)? {
                return Ok(ControlFlow::Return(value));
            }
        }
        Ok(ControlFlow::None)
    }

    fn execute_stmt(&mut self, stmt: &Stmt) -> PlcResult<ControlFlow> {
        match stmt {
            Stmt::Expression { expr } => {
                self.eval_expr(expr)?;
                Ok(ControlFlow::None)
            }

            Stmt::Declaration { name, value, .. } => {
                let value = match value {
                    Some(value) => self.eval_expr(value)?,
                    None => Value::Nil,
                };
                self.define_variable(Binding::new(name.as_str(), true, value))?;
                Ok(ControlFlow::None)
            }

            Stmt::Assignment { receiver, value } => {
                self.assign(receiver, value)?;
                Ok(ControlFlow::None)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let branch = if self.eval_condition(condition)? {
                    then_branch
                } else {
                    else_branch
                };
                self.in_child_scope(|interpreter| interpreter.execute_block(branch))
            }

            Stmt::Switch { condition, cases } => {
                let value = self.eval_expr(condition)?;
                self.in_child_scope(|interpreter| interpreter.execute_switch(&value, cases))
            }

            Stmt::While { condition, body } => {
                while self.eval_condition(condition)? {
                    let flow = self.in_child_scope(|interpreter| interpreter.execute_block(body))?;
                    if let ControlFlow::Return(value) = flow {
                        return Ok(ControlFlow::Return(value));
                    }
                }
                Ok(ControlFlow::None)
            }

            Stmt::Return { value } => Ok(ControlFlow::Return(self.eval_expr(value)?)),
        }
    }

    /// Run the first case equal to `value`, else the default; never more than one
    fn execute_switch(&mut self, value: &Value, cases: &[Case]) -> PlcResult<ControlFlow> {
        for case in cases {
            if let Some(case_value) = &case.value {
                if self.eval_expr(case_value)? == *value {
                    return self.in_child_scope(|interpreter| interpreter.execute_block(&case.body));
                }
            }
        }

        match cases.iter().find(|case| case.value.is_none()) {
            Some(default) => {
                self.in_child_scope(|interpreter| interpreter.execute_block(&default.body))
            }
            None => Ok(ControlFlow::None),
        }
    }

    fn assign(&mut self, receiver: &Expr, value: &Expr) -> PlcResult<()> {
        let (name, index) = match &receiver.kind {
            ExprKind::Access { name, index, .. } => (name, index),
            _ => {
                return Err(PlcError::runtime_error(
                    "Assignment receiver must be a variable or a list element",
                ))
            }
        };

        let binding = self.lookup_variable(name)?;

        match index {
            Some(index) => {
                let elements = list_elements(&binding)?;
                let position = self.eval_expr(index)?;
                let value = self.eval_expr(value)?;
                if value.contains_list(&elements) {
                    return Err(PlcError::runtime_error(format!(
                        "Cannot store list '{}' inside itself",
                        name
                    )));
                }

                let mut elements = elements.borrow_mut();
                let position = element_position(&position, elements.len())?;
                elements[position] = value;
            }
            None => {
                if !binding.mutable {
                    return Err(PlcError::runtime_error(format!(
                        "Cannot assign to immutable variable '{}'",
                        name
                    )));
                }
                let value = self.eval_expr(value)?;
                binding.set(value);
            }
        }

        Ok(())
    }

    // ===== Expressions =====

    fn eval_expr(&mut self, expr: &Expr) -> PlcResult<Value> {
        match &expr.kind {
            ExprKind::Literal(literal) => Ok(Value::from(literal)),

            ExprKind::Group(inner) => self.eval_expr(inner),

            ExprKind::Binary {
                operator,
                left,
                right,
            } => self.eval_binary(*operator, left, right),

            ExprKind::Access { name, index, .. } => {
                let binding = self.lookup_variable(name)?;
                match index {
                    Some(index) => {
                        let elements = list_elements(&binding)?;
                        let position = self.eval_expr(index)?;
                        let elements = elements.borrow();
                        let position = element_position(&position, elements.len())?;
                        Ok(elements[position].clone())
                    }
                    None => Ok(binding.get()),
                }
            }

            ExprKind::Call {
                name, arguments, ..
            } => {
                let callable = self
                    .scope
                    .borrow()
                    .lookup_function(name, arguments.len())
                    .ok_or_else(|| {
                        PlcError::runtime_error(format!(
                            "Function '{}/{}' is not defined",
                            name,
                            arguments.len()
                        ))
                    })?;

                let arguments = arguments
                    .iter()
                    .map(|argument| self.eval_expr(argument))
                    .collect::<PlcResult<Vec<_>>>()?;

                self.invoke(&callable, arguments)
            }

            ExprKind::List(elements) => {
                let elements = elements
                    .iter()
                    .map(|element| self.eval_expr(element))
                    .collect::<PlcResult<Vec<_>>>()?;
                Ok(Value::list(elements))
            }
        }
    }

    fn eval_condition(&mut self, condition: &Expr) -> PlcResult<bool> {
        match self.eval_expr(condition)? {
            Value::Boolean(b) => Ok(b),
            other => Err(PlcError::runtime_error(format!(
                "Condition must be Boolean, got {}",
                other.type_name()
            ))),
        }
    }

    fn eval_binary(&mut self, operator: BinaryOp, left: &Expr, right: &Expr) -> PlcResult<Value> {
        match operator {
            // The right operand only runs when the left does not decide
            BinaryOp::And => Ok(Value::Boolean(
                self.eval_condition(left)? && self.eval_condition(right)?,
            )),
            BinaryOp::Or => Ok(Value::Boolean(
                self.eval_condition(left)? || self.eval_condition(right)?,
            )),
            _ => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                self.apply_binary(operator, left, right)
            }
        }
    }

    fn apply_binary(&self, operator: BinaryOp, left: Value, right: Value) -> PlcResult<Value> {
        match operator {
            BinaryOp::Equal => Ok(Value::Boolean(left == right)),
            BinaryOp::NotEqual => Ok(Value::Boolean(left != right)),

            BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual => {
                let ordering = left.compare(&right).ok_or_else(|| {
                    operand_error(operator, &left, &right)
                })?;
                Ok(Value::Boolean(match operator {
                    BinaryOp::Less => ordering.is_lt(),
                    BinaryOp::LessEqual => ordering.is_le(),
                    BinaryOp::Greater => ordering.is_gt(),
                    _ => ordering.is_ge(),
                }))
            }

            BinaryOp::Add => match (left, right) {
                (Value::String(a), b) => Ok(Value::String(format!("{}{}", a, b))),
                (a, Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
                (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a + b)),
                (Value::Decimal(a), Value::Decimal(b)) => Ok(Value::Decimal(a + b)),
                (a, b) => Err(operand_error(operator, &a, &b)),
            },

            BinaryOp::Subtract | BinaryOp::Multiply | BinaryOp::Divide => {
                match (left, right) {
                    (Value::Integer(a), Value::Integer(b)) => integer_arithmetic(operator, a, b),
                    (Value::Decimal(a), Value::Decimal(b)) => self.decimal_arithmetic(operator, a, b),
                    (Value::Integer(a), Value::Decimal(b)) => {
                        self.decimal_arithmetic(operator, BigDecimal::new(a, 0), b)
                    }
                    (Value::Decimal(a), Value::Integer(b)) => {
                        self.decimal_arithmetic(operator, a, BigDecimal::new(b, 0))
                    }
                    (a, b) => Err(operand_error(operator, &a, &b)),
                }
            }

            BinaryOp::Power => match (left, right) {
                (Value::Integer(base), Value::Integer(exponent)) => {
                    if exponent.is_negative() {
                        return Err(PlcError::runtime_error(format!(
                            "Negative exponent {} is not supported",
                            exponent
                        )));
                    }
                    let exponent = exponent.to_u32().ok_or_else(|| {
                        PlcError::runtime_error(format!("Exponent {} is too large", exponent))
                    })?;
                    Ok(Value::Integer(base.pow(exponent)))
                }
                (a, b) => Err(operand_error(operator, &a, &b)),
            },

            BinaryOp::And | BinaryOp::Or => Err(operand_error(operator, &left, &right)),
        }
    }

    fn decimal_arithmetic(&self, operator: BinaryOp, a: BigDecimal, b: BigDecimal) -> PlcResult<Value> {
        match operator {
            BinaryOp::Subtract => Ok(Value::Decimal(a - b)),
            BinaryOp::Multiply => Ok(Value::Decimal(a * b)),
            _ => {
                if b.is_zero() {
                    return Err(PlcError::runtime_error("Division by zero"));
                }
                let scale = match self.config.division_scale {
                    DivisionScale::Dividend => a.as_bigint_and_exponent().1,
                    DivisionScale::Fixed(scale) => i64::from(scale),
                };
                divide_half_up(&a, &b, scale).map(Value::Decimal)
            }
        }
    }

    // ===== Calls =====

    fn invoke(&mut self, callable: &Callable, arguments: Vec<Value>) -> PlcResult<Value> {
        trace!(name = callable.name(), arity = arguments.len(), "invoke");

        match callable {
            Callable::Native { function, .. } => {
                function(self, &arguments).map_err(PlcError::runtime_error)
            }
            Callable::Function {
                declaration,
                closure,
            } => {
                let closure = closure.upgrade().ok_or_else(|| {
                    PlcError::runtime_error(format!(
                        "Function '{}' outlived the scope that defined it",
                        declaration.name
                    ))
                })?;

                let call_scope = Scope::child(&closure);
                let flow = self.in_scope(call_scope, |interpreter| {
                    for (parameter, argument) in declaration.parameters.iter().zip(arguments) {
                        interpreter.define_variable(Binding::new(&parameter.name, true, argument))?;
                    }
                    interpreter.execute_block(&declaration.body)
                })?;

                match flow {
                    ControlFlow::Return(value) => Ok(value),
                    ControlFlow::None => Ok(Value::Nil),
                }
            }
        }
    }

    fn write_line(&mut self, line: String) {
        match self.config.output {
            OutputMode::Stdout => println!("{}", line),
            OutputMode::Capture => self.output.push(line),
        }
    }

    // ===== Scopes =====

    fn define_variable(&mut self, binding: Rc<Binding>) -> PlcResult<()> {
        let name = binding.name.clone();
        self.scope
            .borrow_mut()
            .define_variable(&name, binding)
            .map_err(PlcError::runtime_error)
    }

    fn lookup_variable(&self, name: &str) -> PlcResult<Rc<Binding>> {
        self.scope
            .borrow()
            .lookup_variable(name)
            .ok_or_else(|| PlcError::runtime_error(format!("Variable '{}' is not defined", name)))
    }

    /// Run `f` with `scope` as the current scope, restoring the previous
    /// scope on every exit path
    fn in_scope<T>(
        &mut self,
        scope: RuntimeScope,
        f: impl FnOnce(&mut Self) -> PlcResult<T>,
    ) -> PlcResult<T> {
        trace!("push scope");
        let previous = mem::replace(&mut self.scope, scope);
        let result = f(self);
        self.scope = previous;
        trace!("pop scope");
        result
    }

    fn in_child_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> PlcResult<T>) -> PlcResult<T> {
        let child = Scope::child(&self.scope);
        self.in_scope(child, f)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// `print(x)`: one line with the display form of `x`
fn print(interpreter: &mut Interpreter, arguments: &[Value]) -> Result<Value, String> {
    match arguments {
        [value] => {
            interpreter.write_line(value.to_string());
            Ok(Value::Nil)
        }
        _ => Err(format!("print expects 1 argument, got {}", arguments.len())),
    }
}

fn integer_arithmetic(operator: BinaryOp, a: BigInt, b: BigInt) -> PlcResult<Value> {
    match operator {
        BinaryOp::Subtract => Ok(Value::Integer(a - b)),
        BinaryOp::Multiply => Ok(Value::Integer(a * b)),
        _ => {
            if b.is_zero() {
                return Err(PlcError::runtime_error("Division by zero"));
            }
            // Truncates toward zero
            Ok(Value::Integer(a / b))
        }
    }
}

/// `a / b` with `scale` fractional digits, ties rounded away from zero
fn divide_half_up(a: &BigDecimal, b: &BigDecimal, scale: i64) -> PlcResult<BigDecimal> {
    let (a_digits, a_scale) = a.as_bigint_and_exponent();
    let (b_digits, b_scale) = b.as_bigint_and_exponent();

    // a / b * 10^scale == a_digits * 10^shift / b_digits
    let shift = scale - a_scale + b_scale;
    let magnitude = shift.unsigned_abs().to_u32().ok_or_else(|| {
        PlcError::runtime_error("Decimal division exceeds the supported scale")
    })?;
    let factor = BigInt::from(10u32).pow(magnitude);

    let (numerator, denominator) = if shift >= 0 {
        (a_digits * factor, b_digits)
    } else {
        (a_digits, b_digits * factor)
    };

    let (mut quotient, remainder) = numerator.div_rem(&denominator);
    if remainder.abs() * 2u32 >= denominator.abs() {
        if numerator.is_negative() == denominator.is_negative() {
            quotient += 1u32;
        } else {
            quotient -= 1u32;
        }
    }

    Ok(BigDecimal::new(quotient, scale))
}

fn operand_error(operator: BinaryOp, left: &Value, right: &Value) -> PlcError {
    PlcError::runtime_error(format!(
        "Operator '{}' cannot be applied to {} and {}",
        operator,
        left.type_name(),
        right.type_name()
    ))
}

fn list_elements(binding: &Binding) -> PlcResult<Rc<RefCell<Vec<Value>>>> {
    match binding.get() {
        Value::List(elements) => Ok(elements),
        other => Err(PlcError::runtime_error(format!(
            "Variable '{}' holds {}, not a list",
            binding.name,
            other.type_name()
        ))),
    }
}

/// Check an evaluated index against a list length
fn element_position(index: &Value, len: usize) -> PlcResult<usize> {
    match index {
        Value::Integer(n) => n
            .to_usize()
            .filter(|position| *position < len)
            .ok_or_else(|| {
                PlcError::runtime_error(format!(
                    "Index {} is out of range for list of length {}",
                    n, len
                ))
            }),
        other => Err(PlcError::runtime_error(format!(
            "List index must be Integer, got {}",
            other.type_name()
        ))),
    }
}
