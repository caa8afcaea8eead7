//! Semantic analyzer
//!
//! Resolves every name, types every expression and annotates the AST in
//! place. Analysis stops at the first violation.

use std::mem;

use num_traits::ToPrimitive;
use tracing::{debug, trace};

use crate::error::{PlcError, PlcResult};
use crate::parser::ast::*;
use crate::scope::{Scope, SharedScope};
use crate::types::{binary_result_type, require_assignable, FunctionSignature, Type, Variable};

/// Scope payloads at analysis time
pub type AnalysisScope = SharedScope<Variable, FunctionSignature>;

pub struct Analyzer {
    scope: AnalysisScope,
    /// Declared return type of the function being analyzed
    return_type: Option<Type>,
}

impl Analyzer {
    /// Analyzer over a fresh root scope
    pub fn new() -> Self {
        Self::with_scope(&Scope::root())
    }

    /// Analyzer whose global scope is a child of `parent`
    pub fn with_scope(parent: &AnalysisScope) -> Self {
        let scope = Scope::child(parent);
        scope.borrow_mut().bind_function(
            "print",
            1,
            FunctionSignature::new("print", vec![Type::Any], Type::Nil),
        );

        Self {
            scope,
            return_type: None,
        }
    }

    /// The global scope, holding every top-level binding after `analyze`
    pub fn scope(&self) -> AnalysisScope {
        self.scope.clone()
    }

    /// Analyze a whole program
    pub fn analyze(&mut self, source: &mut Source) -> PlcResult<()> {
        debug!(
            globals = source.globals.len(),
            functions = source.functions.len(),
            "analyzing source"
        );

        for global in &mut source.globals {
            self.analyze_global(global)?;
        }

        for function in &mut source.functions {
            self.analyze_function(function)?;
        }

        self.require_main()?;

        debug!("analysis complete");
        Ok(())
    }

    fn require_main(&self) -> PlcResult<()> {
        match self.scope.borrow().lookup_function("main", 0) {
            Some(signature) if signature.return_type == Type::Integer => Ok(()),
            Some(signature) => Err(PlcError::analysis_error(format!(
                "Main function must return Integer, not {}",
                signature.return_type
            ))),
            None => Err(PlcError::analysis_error(
                "Main function not found: expected FUN main(): Integer",
            )),
        }
    }

    // ===== Declarations =====

    fn analyze_global(&mut self, global: &mut Global) -> PlcResult<()> {
        let ty = self.declared_type(&global.name, global.type_name.as_deref(), global.value.as_mut())?;

        let variable = if global.list {
            Variable::list(&global.name, ty)
        } else {
            Variable::new(&global.name, ty, global.mutable)
        };

        self.define_variable(&variable)?;
        global.variable = Some(variable);
        Ok(())
    }

    fn analyze_function(&mut self, function: &mut Function) -> PlcResult<()> {
        trace!(name = %function.name, "analyzing function");

        let parameter_types = function
            .parameters
            .iter()
            .map(|parameter| resolve_type(&parameter.type_name))
            .collect::<PlcResult<Vec<_>>>()?;

        let return_type = match &function.return_type_name {
            Some(name) => resolve_type(name)?,
            None => Type::Nil,
        };

        let signature = FunctionSignature::new(&function.name, parameter_types, return_type);

        // Defined before the body so that recursive calls resolve
        self.scope
            .borrow_mut()
            .define_function(&function.name, signature.arity(), signature.clone())
            .map_err(PlcError::analysis_error)?;

        let enclosing = self.return_type.replace(return_type);

        let parameters = &function.parameters;
        let body = &mut function.body;
        let result = self.in_child_scope(|analyzer| {
            for (parameter, ty) in parameters.iter().zip(&signature.parameter_types) {
                analyzer.define_variable(&Variable::new(&parameter.name, *ty, true))?;
            }
            analyzer.analyze_block(body)
        });

        self.return_type = enclosing;
        result?;

        function.signature = Some(signature);
        Ok(())
    }

    /// Type of a new binding from its optional type name and initializer
    fn declared_type(
        &mut self,
        name: &str,
        type_name: Option<&str>,
        value: Option<&mut Expr>,
    ) -> PlcResult<Type> {
        let declared = type_name.map(resolve_type).transpose()?;

        // `[]` has no element of its own to type from
        let empty_list = value.as_deref().is_some_and(is_empty_list);

        let actual = match value {
            Some(value) if empty_list => {
                let ty = declared.ok_or_else(|| {
                    PlcError::analysis_error(format!(
                        "Cannot infer the element type of empty list '{}'",
                        name
                    ))
                })?;
                value.ty = Some(ty);
                Some(ty)
            }
            Some(value) => Some(self.analyze_expr(value)?),
            None => None,
        };

        match (declared, actual) {
            (Some(target), Some(actual)) => {
                require_assignable(target, actual).map_err(PlcError::analysis_error)?;
                Ok(target)
            }
            (Some(ty), None) | (None, Some(ty)) => Ok(ty),
            (None, None) => Err(PlcError::analysis_error(format!(
                "'{}' requires a type or an initial value",
                name
            ))),
        }
    }

    // ===== Statements =====

    fn analyze_block(&mut self, statements: &mut [Stmt]) -> PlcResult<()> {
        for stmt in statements {
            self.analyze_stmt(stmt)?;
        }
        Ok(())
    }

    fn analyze_stmt(&mut self, stmt: &mut Stmt) -> PlcResult<()> {
        match stmt {
            Stmt::Expression { expr } => {
                if !matches!(expr.kind, ExprKind::Call { .. }) {
                    return Err(PlcError::analysis_error(
                        "Only function calls may be used as statements",
                    ));
                }
                self.analyze_expr(expr)?;
                Ok(())
            }

            Stmt::Declaration {
                name,
                type_name,
                value,
                variable,
            } => {
                let ty = self.declared_type(name, type_name.as_deref(), value.as_mut())?;
                let declared = Variable::new(name.as_str(), ty, true);
                self.define_variable(&declared)?;
                *variable = Some(declared);
                Ok(())
            }

            Stmt::Assignment { receiver, value } => {
                if !matches!(receiver.kind, ExprKind::Access { .. }) {
                    return Err(PlcError::analysis_error(
                        "Assignment receiver must be a variable or a list element",
                    ));
                }

                let value_type = self.analyze_expr(value)?;
                let receiver_type = self.analyze_expr(receiver)?;

                if let ExprKind::Access {
                    name,
                    index: None,
                    variable: Some(variable),
                } = &receiver.kind
                {
                    if variable.list {
                        return Err(PlcError::analysis_error(format!(
                            "List '{}' can only be assigned through an index",
                            name
                        )));
                    }
                }

                require_assignable(receiver_type, value_type).map_err(PlcError::analysis_error)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.require_condition(condition, "IF")?;

                if then_branch.is_empty() {
                    return Err(PlcError::analysis_error(
                        "The then block of an IF statement cannot be empty",
                    ));
                }

                self.in_child_scope(|analyzer| analyzer.analyze_block(then_branch))?;
                if !else_branch.is_empty() {
                    self.in_child_scope(|analyzer| analyzer.analyze_block(else_branch))?;
                }
                Ok(())
            }

            Stmt::Switch { condition, cases } => {
                let condition_type = self.analyze_expr(condition)?;
                let last = cases.len().saturating_sub(1);

                for (position, case) in cases.iter_mut().enumerate() {
                    if case.value.is_none() && position != last {
                        return Err(PlcError::analysis_error(
                            "DEFAULT must be the last case of a SWITCH",
                        ));
                    }

                    self.in_child_scope(|analyzer| {
                        if let Some(value) = &mut case.value {
                            let case_type = analyzer.analyze_expr(value)?;
                            if case_type != condition_type {
                                return Err(PlcError::analysis_error(format!(
                                    "Case value of type {} does not match SWITCH condition of type {}",
                                    case_type, condition_type
                                )));
                            }
                        }
                        analyzer.analyze_block(&mut case.body)
                    })?;
                }
                Ok(())
            }

            Stmt::While { condition, body } => {
                self.require_condition(condition, "WHILE")?;
                self.in_child_scope(|analyzer| analyzer.analyze_block(body))
            }

            Stmt::Return { value } => {
                let expected = self.return_type.ok_or_else(|| {
                    PlcError::analysis_error("RETURN is only allowed inside a function")
                })?;
                let actual = self.analyze_expr(value)?;
                require_assignable(expected, actual).map_err(PlcError::analysis_error)
            }
        }
    }

    fn require_condition(&mut self, condition: &mut Expr, statement: &str) -> PlcResult<()> {
        let ty = self.analyze_expr(condition)?;
        if ty != Type::Boolean {
            return Err(PlcError::analysis_error(format!(
                "{} condition must be Boolean, not {}",
                statement, ty
            )));
        }
        Ok(())
    }

    // ===== Expressions =====

    /// Type `expr`, record the type on the node and return it
    fn analyze_expr(&mut self, expr: &mut Expr) -> PlcResult<Type> {
        let ty = match &mut expr.kind {
            ExprKind::Literal(literal) => literal_type(literal)?,

            ExprKind::Group(inner) => {
                if !matches!(inner.kind, ExprKind::Binary { .. }) {
                    return Err(PlcError::analysis_error(
                        "A parenthesized expression must contain a binary expression",
                    ));
                }
                self.analyze_expr(inner)?
            }

            ExprKind::Binary {
                operator,
                left,
                right,
            } => {
                let left_type = self.analyze_expr(left)?;
                let right_type = self.analyze_expr(right)?;
                binary_result_type(*operator, left_type, right_type)
                    .map_err(PlcError::analysis_error)?
            }

            ExprKind::Access {
                name,
                index,
                variable,
            } => {
                let resolved = self.scope.borrow().lookup_variable(name).ok_or_else(|| {
                    PlcError::analysis_error(format!("Variable '{}' is not defined", name))
                })?;

                let ty = match index {
                    Some(index) => {
                        if !resolved.list {
                            return Err(PlcError::analysis_error(format!(
                                "Variable '{}' is not a list and cannot be indexed",
                                name
                            )));
                        }
                        let index_type = self.analyze_expr(index)?;
                        if index_type != Type::Integer {
                            return Err(PlcError::analysis_error(format!(
                                "List index must be Integer, not {}",
                                index_type
                            )));
                        }
                        resolved.ty
                    }
                    // A whole list only flows where any value is accepted
                    None if resolved.list => Type::Any,
                    None => resolved.ty,
                };

                *variable = Some(resolved);
                ty
            }

            ExprKind::Call {
                name,
                arguments,
                signature,
            } => {
                let resolved = self
                    .scope
                    .borrow()
                    .lookup_function(name, arguments.len())
                    .ok_or_else(|| {
                        PlcError::analysis_error(format!(
                            "Function '{}' taking {} argument(s) is not defined",
                            name,
                            arguments.len()
                        ))
                    })?;

                for (argument, expected) in arguments.iter_mut().zip(&resolved.parameter_types) {
                    let actual = self.analyze_expr(argument)?;
                    require_assignable(*expected, actual).map_err(PlcError::analysis_error)?;
                }

                let ty = resolved.return_type;
                *signature = Some(resolved);
                ty
            }

            ExprKind::List(elements) => {
                let (first, rest) = elements.split_first_mut().ok_or_else(|| {
                    PlcError::analysis_error("Cannot infer the element type of an empty list")
                })?;

                let element_type = self.analyze_expr(first)?;
                for element in rest {
                    let ty = self.analyze_expr(element)?;
                    if ty != element_type {
                        return Err(PlcError::analysis_error(format!(
                            "List elements must share one type: expected {}, found {}",
                            element_type, ty
                        )));
                    }
                }
                element_type
            }
        };

        expr.ty = Some(ty);
        Ok(ty)
    }

    // ===== Helper Methods =====

    fn define_variable(&mut self, variable: &Variable) -> PlcResult<()> {
        self.scope
            .borrow_mut()
            .define_variable(&variable.name, variable.clone())
            .map_err(PlcError::analysis_error)
    }

    /// Run `f` in a child of the current scope; the current scope is
    /// restored whether or not `f` succeeds
    fn in_child_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> PlcResult<T>) -> PlcResult<T> {
        let child = Scope::child(&self.scope);
        let parent = mem::replace(&mut self.scope, child);
        let result = f(self);
        self.scope = parent;
        result
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_type(name: &str) -> PlcResult<Type> {
    Type::from_name(name)
        .ok_or_else(|| PlcError::analysis_error(format!("Unknown type '{}'", name)))
}

fn is_empty_list(expr: &Expr) -> bool {
    matches!(&expr.kind, ExprKind::List(elements) if elements.is_empty())
}

/// Literal type, with numeric literals range checked
fn literal_type(literal: &Literal) -> PlcResult<Type> {
    match literal {
        Literal::Nil => Ok(Type::Nil),
        Literal::Boolean(_) => Ok(Type::Boolean),
        Literal::Character(_) => Ok(Type::Character),
        Literal::String(_) => Ok(Type::String),
        Literal::Integer(value) => match value.to_i32() {
            Some(_) => Ok(Type::Integer),
            None => Err(PlcError::analysis_error(format!(
                "Integer literal {} is out of range",
                value
            ))),
        },
        Literal::Decimal(value) => match value.to_f64() {
            Some(float) if float.is_finite() => Ok(Type::Decimal),
            _ => Err(PlcError::analysis_error(format!(
                "Decimal literal {} is out of range",
                value
            ))),
        },
    }
}
