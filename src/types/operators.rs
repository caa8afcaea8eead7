//! Operator typing table
//!
//! Maps an operator and its operand types to the result type, or to the
//! message the analyzer reports.

use super::Type;
use crate::parser::ast::BinaryOp;

/// Result type of `left <op> right`
pub fn binary_result_type(operator: BinaryOp, left: Type, right: Type) -> Result<Type, String> {
    match operator {
        BinaryOp::And | BinaryOp::Or => {
            if left == Type::Boolean && right == Type::Boolean {
                Ok(Type::Boolean)
            } else {
                Err(format!(
                    "Operator '{}' requires Boolean operands, got {} and {}",
                    operator, left, right
                ))
            }
        }

        BinaryOp::Equal
        | BinaryOp::NotEqual
        | BinaryOp::Less
        | BinaryOp::LessEqual
        | BinaryOp::Greater
        | BinaryOp::GreaterEqual => {
            if left == right {
                Ok(Type::Boolean)
            } else {
                Err(format!(
                    "Operator '{}' requires operands of the same type, got {} and {}",
                    operator, left, right
                ))
            }
        }

        BinaryOp::Add => match (left, right) {
            (Type::String, _) | (_, Type::String) => Ok(Type::String),
            (Type::Integer, Type::Integer) => Ok(Type::Integer),
            (Type::Decimal, Type::Decimal) => Ok(Type::Decimal),
            (Type::Integer, Type::Decimal) | (Type::Decimal, Type::Integer) => {
                Err("Cannot add an Integer and a Decimal".to_string())
            }
            _ => Err(format!("Cannot add {} and {}", left, right)),
        },

        BinaryOp::Subtract | BinaryOp::Multiply | BinaryOp::Divide => match (left, right) {
            (Type::Integer, Type::Integer) => Ok(Type::Integer),
            (Type::Decimal, Type::Decimal | Type::Integer)
            | (Type::Integer, Type::Decimal) => Ok(Type::Decimal),
            _ => Err(format!(
                "Operator '{}' requires numeric operands, got {} and {}",
                operator, left, right
            )),
        },

        BinaryOp::Power => {
            if left == Type::Integer && right == Type::Integer {
                Ok(Type::Integer)
            } else {
                Err(format!(
                    "Operator '^' requires Integer operands, got {} and {}",
                    left, right
                ))
            }
        }
    }
}
