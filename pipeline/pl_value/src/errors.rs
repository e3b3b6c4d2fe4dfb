//! Errors raised while defining functions, checking and running scripts.
//!
//! `EvalErrorKind` is the structured category; constructor functions
//! (e.g. `integer_division_by_zero()`) are the public way to build an `EvalError`
//! and fill in both `kind` and `message`. The evaluator attaches the source
//! position, and `Script::run`/`check` attach the script name, so every
//! error reaching a host renders as `script:line:col: message`.

use pl_ast::Pos;
use std::fmt;
use thiserror::Error;

use crate::dtype::{DType, DTypes};
use crate::value::Value;

/// Result of evaluating an expression to a single value.
pub type EvalResult = Result<Value, EvalError>;

/// Structured error category.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalErrorKind {
    // Function definition
    #[error("function `{func}`: invalid parameter name `{name}`")]
    InvalidParamName { func: String, name: String },
    #[error("function `{func}`: duplicate parameter `{name}`")]
    DuplicateParam { func: String, name: String },
    #[error("function `{func}`: required parameter `{name}` follows an optional parameter")]
    RequiredAfterOptional { func: String, name: String },
    #[error("function `{func}`: variadic parameter `{name}` must be the last parameter")]
    VariadicNotLast { func: String, name: String },
    #[error("function `{func}`: variadic parameter `{name}` cannot have a default value")]
    VariadicWithDefault { func: String, name: String },
    #[error("function `{name}` is already registered")]
    DuplicateFunction { name: String },

    // Argument binding
    #[error("{func}() takes at most {max} positional arguments but {got} were given")]
    TooManyArguments { func: String, max: usize, got: usize },
    #[error("{func}() got an unexpected keyword argument `{name}`")]
    UnknownNamedArgument { func: String, name: String },
    #[error("{func}() got multiple values for argument `{name}`")]
    DuplicateArgument { func: String, name: String },
    #[error("{func}(): positional argument follows keyword argument")]
    PositionalAfterNamed { func: String },
    #[error("{func}(): keyword arguments are not allowed with a variadic parameter")]
    NamedWithVariadic { func: String },
    #[error("{func}() missing required argument `{name}`")]
    MissingParameter { func: String, name: String },
    #[error("{func}() has no parameter `{name}`")]
    NoSuchParameter { func: String, name: String },
    #[error("{func}(): argument `{name}` must be {expected}, got {got}")]
    ParameterType {
        func: String,
        name: String,
        expected: DTypes,
        got: DType,
    },

    // Operators
    #[error("unsupported operand type(s) for {op}: `{left}` and `{right}`")]
    UnsupportedOperand {
        op: &'static str,
        left: DType,
        right: DType,
    },
    #[error("unsupported operand type for unary op {op}: `{operand}`")]
    UnsupportedUnary { op: &'static str, operand: DType },
    #[error("`{left}` and `{right}` are not comparable with {op}")]
    NotComparable {
        op: &'static str,
        left: DType,
        right: DType,
    },
    #[error("float does not support modulo operations")]
    FloatModulo,

    // Containers
    #[error("`{dtype}` object is not indexable")]
    Unindexable { dtype: DType },
    #[error("{container} key must be {expected}, got {got}")]
    KeyType {
        container: DType,
        expected: DType,
        got: DType,
    },
    #[error("list index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },
    #[error("key `{key}` not found")]
    KeyNotFound { key: String },
    #[error("`{dtype}` object is not sliceable")]
    Unsliceable { dtype: DType },
    #[error("slice {bound} must be int, got {got}")]
    SliceBoundType { bound: &'static str, got: DType },
    #[error("slice step cannot be zero")]
    SliceStepZero,
    #[error("unsupported type: {dtype}, not iter value")]
    NotIterable { dtype: DType },
    #[error("unsupported right operand type for `in`: `{dtype}`")]
    InRhsType { dtype: DType },
    #[error("`in <{rhs}>` requires str as left operand, not `{lhs}`")]
    InLhsType { lhs: DType, rhs: DType },

    // Names
    #[error("name `{name}` is not defined")]
    UndefinedVariable { name: String },
    #[error("function `{name}` is not defined")]
    UndefinedFunction { name: String },

    // Arithmetic
    #[error("integer division by zero")]
    IntegerDivisionByZero,
    #[error("integer modulo by zero")]
    IntegerModuloByZero,
    #[error("float division by zero")]
    FloatDivisionByZero,

    // Result arity
    #[error("expected a single value, got {got}")]
    ExpectedSingleValue { got: usize },
    #[error("expected multiple values, got {got}")]
    ExpectedMultipleValues { got: usize },
    #[error("assignment mismatch: {targets} targets but {values} values")]
    AssignmentMismatch { targets: usize, values: usize },
    #[error("`{op}` requires exactly one target and one value")]
    CompoundAssignArity { op: &'static str },
    #[error("cannot assign to {kind}")]
    InvalidAssignTarget { kind: &'static str },
    #[error("cannot store a `{dtype}` inside itself")]
    CyclicValue { dtype: DType },
    #[error("for-in variable must be an identifier, not {kind}")]
    InvalidLoopVariable { kind: &'static str },

    // Control flow (checker)
    #[error("`{keyword}` outside of a loop")]
    OutsideLoop { keyword: &'static str },

    // Engine/parser mismatch
    #[error("unsupported ast node: {kind}")]
    UnsupportedNode { kind: &'static str },

    /// Message raised by a registered function.
    #[error("{message}")]
    Custom { message: String },
}

/// An error with its source location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Equals `kind.to_string()`.
    pub message: String,
    pub pos: Option<Pos>,
    /// Name of the script that failed, attached at the run/check boundary.
    pub script: Option<String>,
}

impl EvalError {
    /// Free-form error, for registered function implementations.
    pub fn new(message: impl Into<String>) -> Self {
        Self::from_kind(EvalErrorKind::Custom {
            message: message.into(),
        })
    }

    pub fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        EvalError {
            kind,
            message,
            pos: None,
            script: None,
        }
    }

    /// Attach a position, replacing any existing one.
    #[must_use]
    pub fn with_pos(mut self, pos: Pos) -> Self {
        self.pos = Some(pos);
        self
    }

    /// Attach a position unless a more precise one is already set.
    #[must_use]
    pub fn or_pos(mut self, pos: Pos) -> Self {
        self.pos.get_or_insert(pos);
        self
    }

    /// Attach the script name unless already set (errors from `ref_run`
    /// keep the name of the script that actually failed).
    #[must_use]
    pub fn with_script(mut self, name: &str) -> Self {
        if self.script.is_none() {
            self.script = Some(name.to_string());
        }
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.script, self.pos) {
            (Some(script), Some(pos)) => write!(f, "{script}:{pos}: {}", self.message),
            (Some(script), None) => write!(f, "{script}: {}", self.message),
            (None, Some(pos)) => write!(f, "{pos}: {}", self.message),
            (None, None) => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for EvalError {}

// Function definition errors

#[cold]
pub fn invalid_param_name(func: &str, name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidParamName {
        func: func.to_string(),
        name: name.to_string(),
    })
}

#[cold]
pub fn duplicate_param(func: &str, name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateParam {
        func: func.to_string(),
        name: name.to_string(),
    })
}

#[cold]
pub fn required_after_optional(func: &str, name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::RequiredAfterOptional {
        func: func.to_string(),
        name: name.to_string(),
    })
}

#[cold]
pub fn variadic_not_last(func: &str, name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::VariadicNotLast {
        func: func.to_string(),
        name: name.to_string(),
    })
}

#[cold]
pub fn variadic_with_default(func: &str, name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::VariadicWithDefault {
        func: func.to_string(),
        name: name.to_string(),
    })
}

#[cold]
pub fn duplicate_function(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateFunction {
        name: name.to_string(),
    })
}

// Argument binding errors

#[cold]
pub fn too_many_arguments(func: &str, max: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TooManyArguments {
        func: func.to_string(),
        max,
        got,
    })
}

#[cold]
pub fn unknown_named_argument(func: &str, name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownNamedArgument {
        func: func.to_string(),
        name: name.to_string(),
    })
}

#[cold]
pub fn duplicate_argument(func: &str, name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DuplicateArgument {
        func: func.to_string(),
        name: name.to_string(),
    })
}

#[cold]
pub fn positional_after_named(func: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::PositionalAfterNamed {
        func: func.to_string(),
    })
}

#[cold]
pub fn named_with_variadic(func: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NamedWithVariadic {
        func: func.to_string(),
    })
}

#[cold]
pub fn missing_parameter(func: &str, name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MissingParameter {
        func: func.to_string(),
        name: name.to_string(),
    })
}

#[cold]
pub fn no_such_parameter(func: &str, name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoSuchParameter {
        func: func.to_string(),
        name: name.to_string(),
    })
}

#[cold]
pub fn parameter_type(func: &str, name: &str, expected: DTypes, got: DType) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ParameterType {
        func: func.to_string(),
        name: name.to_string(),
        expected,
        got,
    })
}

// Operator errors

#[cold]
pub fn unsupported_operand(op: &'static str, left: DType, right: DType) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnsupportedOperand { op, left, right })
}

#[cold]
pub fn unsupported_unary(op: &'static str, operand: DType) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnsupportedUnary { op, operand })
}

#[cold]
pub fn not_comparable(op: &'static str, left: DType, right: DType) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotComparable { op, left, right })
}

#[cold]
pub fn float_modulo() -> EvalError {
    EvalError::from_kind(EvalErrorKind::FloatModulo)
}

// Container errors

#[cold]
pub fn unindexable(dtype: DType) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Unindexable { dtype })
}

#[cold]
pub fn key_type(container: DType, expected: DType, got: DType) -> EvalError {
    EvalError::from_kind(EvalErrorKind::KeyType {
        container,
        expected,
        got,
    })
}

#[cold]
pub fn index_out_of_range(index: i64, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfRange { index, len })
}

#[cold]
pub fn key_not_found(key: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::KeyNotFound {
        key: key.to_string(),
    })
}

#[cold]
pub fn unsliceable(dtype: DType) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Unsliceable { dtype })
}

#[cold]
pub fn slice_bound_type(bound: &'static str, got: DType) -> EvalError {
    EvalError::from_kind(EvalErrorKind::SliceBoundType { bound, got })
}

#[cold]
pub fn slice_step_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::SliceStepZero)
}

#[cold]
pub fn not_iterable(dtype: DType) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotIterable { dtype })
}

#[cold]
pub fn in_rhs_type(dtype: DType) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InRhsType { dtype })
}

#[cold]
pub fn in_lhs_type(lhs: DType, rhs: DType) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InLhsType { lhs, rhs })
}

// Name errors

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn undefined_function(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedFunction {
        name: name.to_string(),
    })
}

// Arithmetic errors

#[cold]
pub fn integer_division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerDivisionByZero)
}

#[cold]
pub fn integer_modulo_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerModuloByZero)
}

#[cold]
pub fn float_division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::FloatDivisionByZero)
}

// Arity and assignment errors

#[cold]
pub fn expected_single_value(got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ExpectedSingleValue { got })
}

#[cold]
pub fn expected_multiple_values(got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ExpectedMultipleValues { got })
}

#[cold]
pub fn assignment_mismatch(targets: usize, values: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::AssignmentMismatch { targets, values })
}

#[cold]
pub fn compound_assign_arity(op: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CompoundAssignArity { op })
}

#[cold]
pub fn invalid_assign_target(kind: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidAssignTarget { kind })
}

#[cold]
pub fn cyclic_value(dtype: DType) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CyclicValue { dtype })
}

#[cold]
pub fn invalid_loop_variable(kind: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidLoopVariable { kind })
}

#[cold]
pub fn outside_loop(keyword: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::OutsideLoop { keyword })
}

#[cold]
pub fn unsupported_node(kind: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnsupportedNode { kind })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_message_matches_kind() {
        let err = integer_division_by_zero();
        assert_eq!(err.kind, EvalErrorKind::IntegerDivisionByZero);
        assert_eq!(err.message, "integer division by zero");
    }

    #[test]
    fn test_display_with_script_and_pos() {
        let err = undefined_variable("x")
            .with_pos(Pos::new(3, 7))
            .with_script("nginx.p");
        assert_eq!(err.to_string(), "nginx.p:3:7: name `x` is not defined");
    }

    #[test]
    fn test_display_partial_context() {
        assert_eq!(slice_step_zero().to_string(), "slice step cannot be zero");
        assert_eq!(
            slice_step_zero().with_pos(Pos::new(1, 2)).to_string(),
            "1:2: slice step cannot be zero"
        );
        assert_eq!(
            slice_step_zero().with_script("a.p").to_string(),
            "a.p: slice step cannot be zero"
        );
    }

    #[test]
    fn test_or_pos_keeps_inner_position() {
        let err = key_not_found("k")
            .or_pos(Pos::new(2, 5))
            .or_pos(Pos::new(1, 1));
        assert_eq!(err.pos, Some(Pos::new(2, 5)));
    }

    #[test]
    fn test_script_name_set_once() {
        let err = EvalError::new("boom").with_script("inner.p").with_script("outer.p");
        assert_eq!(err.script.as_deref(), Some("inner.p"));
    }

    #[test]
    fn test_operand_messages() {
        assert_eq!(
            unsupported_operand("+", DType::Int, DType::Str).message,
            "unsupported operand type(s) for +: `int` and `str`"
        );
        assert_eq!(
            parameter_type("len", "val", DTypes::STR | DTypes::LIST, DType::Int).message,
            "len(): argument `val` must be str|list, got int"
        );
    }
}
