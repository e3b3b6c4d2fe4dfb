//! Value model for the pipeline script engine.
//!
//! - [`Value`]: the seven script types as a closed enum
//! - [`DType`] / [`DTypes`]: type tags and accepted-type sets
//! - [`EvalError`]: the single error type, with constructor functions
//!
//! Evaluation itself lives in `pl_eval`.

mod dtype;
pub mod errors;
mod value;

pub use dtype::{DType, DTypes};
pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use value::{Shared, Value, ValueMap};
