//! Binary operator implementations.
//!
//! Arithmetic promotes Bool to Int and Int to Float; `+` also concatenates
//! two strings. Comparisons split into equality, which is defined for every
//! pair of values, and ordering/logic, which only accept Int, Float and
//! Bool. Short-circuiting of `&&`/`||` happens in the evaluator before these
//! functions see the right operand.

use pl_ast::{ArithOp, CondOp};
use pl_value::errors::{
    float_division_by_zero, float_modulo, in_lhs_type, in_rhs_type, integer_division_by_zero,
    integer_modulo_by_zero, not_comparable, unsupported_operand,
};
use pl_value::{DType, EvalResult, Value};

/// Numeric view of an operand.
#[derive(Copy, Clone, Debug)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn of(value: &Value) -> Option<Num> {
        match value {
            Value::Int(n) => Some(Num::Int(*n)),
            Value::Bool(b) => Some(Num::Int(i64::from(*b))),
            Value::Float(f) => Some(Num::Float(*f)),
            _ => None,
        }
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "int operands are promoted to float64"
    )]
    fn as_f64(self) -> f64 {
        match self {
            Num::Int(n) => n as f64,
            Num::Float(f) => f,
        }
    }
}

// Arithmetic

/// Evaluate `left op right` for `+ - * / %`.
#[expect(
    clippy::needless_pass_by_value,
    reason = "operands are consumed by the evaluator; references would force clones at call sites"
)]
pub fn evaluate_arith(left: Value, right: Value, op: ArithOp) -> EvalResult {
    let (lt, rt) = (left.dtype(), right.dtype());
    let unsupported = || unsupported_operand(op.as_symbol(), lt, rt);
    if !lt.is_arith() || !rt.is_arith() {
        return Err(unsupported());
    }

    match (&left, &right) {
        (Value::Str(a), Value::Str(b)) if op == ArithOp::Add => {
            let mut joined = String::with_capacity(a.len() + b.len());
            joined.push_str(a);
            joined.push_str(b);
            Ok(Value::string(joined))
        }
        (Value::Str(_), _) | (_, Value::Str(_)) => Err(unsupported()),
        _ if DType::promote(lt, rt) == DType::Float => {
            match (left.as_number(), right.as_number()) {
                (Some(a), Some(b)) => eval_float_arith(a, b, op),
                _ => Err(unsupported()),
            }
        }
        _ => match (Num::of(&left), Num::of(&right)) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => eval_int_arith(a, b, op),
            _ => Err(unsupported()),
        },
    }
}

/// Integer arithmetic wraps on overflow; division truncates toward zero.
fn eval_int_arith(a: i64, b: i64, op: ArithOp) -> EvalResult {
    let n = match op {
        ArithOp::Add => a.wrapping_add(b),
        ArithOp::Sub => a.wrapping_sub(b),
        ArithOp::Mul => a.wrapping_mul(b),
        ArithOp::Div => {
            if b == 0 {
                return Err(integer_division_by_zero());
            }
            a.wrapping_div(b)
        }
        ArithOp::Mod => {
            if b == 0 {
                return Err(integer_modulo_by_zero());
            }
            a.wrapping_rem(b)
        }
    };
    Ok(Value::Int(n))
}

fn eval_float_arith(a: f64, b: f64, op: ArithOp) -> EvalResult {
    let f = match op {
        ArithOp::Add => a + b,
        ArithOp::Sub => a - b,
        ArithOp::Mul => a * b,
        ArithOp::Div => {
            if b == 0.0 {
                return Err(float_division_by_zero());
            }
            a / b
        }
        ArithOp::Mod => return Err(float_modulo()),
    };
    Ok(Value::Float(f))
}

// Comparison and logic

/// `==` semantics.
///
/// Int, Bool and Float compare numerically as float64; a string equals only
/// an equal string; nil equals only nil; lists and maps compare
/// structurally.
#[expect(
    clippy::float_cmp,
    reason = "exact numeric equality is the script semantics"
)]
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match left {
        Value::Int(_) | Value::Bool(_) | Value::Float(_) => {
            match (Num::of(left), Num::of(right)) {
                (Some(a), Some(b)) => a.as_f64() == b.as_f64(),
                _ => false,
            }
        }
        Value::Str(a) => matches!(right, Value::Str(b) if a == b),
        Value::Nil => matches!(right, Value::Nil),
        Value::List(_) | Value::Map(_) => left.deep_eq(right),
    }
}

/// Evaluate `left op right` for comparison and logical operators, with both
/// operands already evaluated.
pub fn evaluate_cond(left: &Value, right: &Value, op: CondOp) -> EvalResult {
    let ordered = |l: DType, r: DType| l.is_ordered() && r.is_ordered();
    let (lt, rt) = (left.dtype(), right.dtype());

    match op {
        CondOp::Eq => Ok(Value::Bool(values_equal(left, right))),
        CondOp::NotEq => Ok(Value::Bool(!values_equal(left, right))),
        _ if !ordered(lt, rt) => Err(not_comparable(op.as_symbol(), lt, rt)),
        CondOp::And | CondOp::Or => match (left, right) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(if op == CondOp::And {
                *a && *b
            } else {
                *a || *b
            })),
            _ => Err(unsupported_operand(op.as_symbol(), lt, rt)),
        },
        CondOp::Lt | CondOp::LtEq | CondOp::Gt | CondOp::GtEq => {
            let ordering = match (Num::of(left), Num::of(right)) {
                (Some(Num::Int(a)), Some(Num::Int(b))) => a.partial_cmp(&b),
                (Some(a), Some(b)) => a.as_f64().partial_cmp(&b.as_f64()),
                _ => None,
            };
            // NaN compares false under every ordering operator
            let result = ordering.is_some_and(|ord| match op {
                CondOp::Lt => ord.is_lt(),
                CondOp::LtEq => ord.is_le(),
                CondOp::Gt => ord.is_gt(),
                _ => ord.is_ge(),
            });
            Ok(Value::Bool(result))
        }
    }
}

// Membership

/// `left in right`: substring for strings, key presence for maps,
/// structural membership for lists.
pub fn evaluate_in(left: &Value, right: &Value) -> EvalResult {
    match right {
        Value::Str(haystack) => match left {
            Value::Str(needle) => Ok(Value::Bool(haystack.contains(&**needle))),
            _ => Err(in_lhs_type(left.dtype(), DType::Str)),
        },
        Value::Map(entries) => match left {
            Value::Str(key) => Ok(Value::Bool(entries.read().contains_key(&**key))),
            _ => Err(in_lhs_type(left.dtype(), DType::Map)),
        },
        Value::List(items) => Ok(Value::Bool(
            items.read().iter().any(|item| item.deep_eq(left)),
        )),
        _ => Err(in_rhs_type(right.dtype())),
    }
}
