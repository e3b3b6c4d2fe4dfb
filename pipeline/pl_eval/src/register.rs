//! Result of evaluating one node.
//!
//! Expressions produce exactly one value; statements produce none; calls
//! may produce none, one, or several. Consumers state which arity they
//! need through [`Ret::one`] or [`Ret::many`] and get an error otherwise.

use smallvec::SmallVec;

use pl_value::errors::{expected_multiple_values, expected_single_value};
use pl_value::{EvalError, EvalResult, Value};

/// Values from a multi-value return; two to four stay inline.
pub type Values = SmallVec<[Value; 4]>;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Ret {
    /// Statements, and calls returning nothing.
    #[default]
    Void,
    One(Value),
    /// Two or more values.
    Many(Values),
}

impl Ret {
    /// Normalize a value list: zero is `Void`, one is `One`.
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        let mut values: Values = values.into_iter().collect();
        match values.len() {
            0 => Ret::Void,
            1 => values.pop().map_or(Ret::Void, Ret::One),
            _ => Ret::Many(values),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Ret::Void => 0,
            Ret::One(_) => 1,
            Ret::Many(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Ret::Void)
    }

    /// Exactly one value.
    pub fn one(self) -> EvalResult {
        match self {
            Ret::One(value) => Ok(value),
            other => Err(expected_single_value(other.len())),
        }
    }

    /// Two or more values.
    pub fn many(self) -> Result<Values, EvalError> {
        match self {
            Ret::Many(values) => Ok(values),
            other => Err(expected_multiple_values(other.len())),
        }
    }
}

impl From<Value> for Ret {
    fn from(value: Value) -> Self {
        Ret::One(value)
    }
}
