//! Unary operator implementations.

use pl_ast::UnaryOp;
use pl_value::errors::unsupported_unary;
use pl_value::{EvalResult, Value};

/// Evaluate a unary operation.
///
/// `-`/`+` accept numbers and turn a Bool into the Int 0 or 1 first; `!`
/// negates truthiness and accepts every value.
pub fn evaluate_unary(op: UnaryOp, operand: Value) -> EvalResult {
    match (op, operand) {
        (UnaryOp::Not, value) => Ok(Value::Bool(!value.is_truthy())),
        (UnaryOp::Neg, Value::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
        (UnaryOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOp::Neg, Value::Bool(b)) => Ok(Value::Int(-i64::from(b))),
        (UnaryOp::Pos, value @ (Value::Int(_) | Value::Float(_))) => Ok(value),
        (UnaryOp::Pos, Value::Bool(b)) => Ok(Value::Int(i64::from(b))),
        (UnaryOp::Neg | UnaryOp::Pos, value) => {
            Err(unsupported_unary(op.as_symbol(), value.dtype()))
        }
    }
}
