//! Tree-walking evaluator for pipeline scripts.
//!
//! A host builds a [`FnTable`] of [`Function`]s, wraps a parsed statement
//! list in a [`Script`], and then calls [`Script::check`] once and
//! [`Script::run`] as often as it likes. Each run gets its own [`Task`]
//! holding the scope stack, the loop flags and the exit flag.
//!
//! # Modules
//!
//! - `environment`: the scope stack
//! - `register`: single and multiple results of one evaluation
//! - `task`: the per-run context, scope guard and cancellation signal
//! - `exec`: statement and expression evaluation
//! - `operators` / `unary_operators`: operator semantics on values
//! - `func`: function descriptors, the function table and argument binding
//! - `check`: static validation
//! - `script`: the host-facing entry points

mod check;
mod environment;
mod exec;
mod func;
mod operators;
mod register;
mod script;
mod task;
mod unary_operators;

use std::sync::Once;

pub use check::{CallRef, CheckReport};
pub use environment::{Environment, Scope};
pub use exec::slice_indices;
pub use func::{check_fn_param_def, CallArgs, CallFn, CheckFn, DefaultFn, FnTable, Function, Param};
pub use operators::{evaluate_arith, evaluate_cond, evaluate_in, values_equal};
pub use register::{Ret, Values};
pub use script::{RunOptions, Script, ScriptBuilder};
pub use task::{PrivateValue, ScopedTask, Signal, Task};
pub use unary_operators::evaluate_unary;

pub use pl_value::{DType, DTypes, EvalError, EvalErrorKind, EvalResult, Value};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber for the engine's spans and events.
///
/// Does nothing unless `RUST_LOG` is set, and nothing after the first call.
/// A subscriber the host already installed is left in place.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let installed = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .try_init();
            if installed.is_err() {
                tracing::debug!("global subscriber already set, keeping it");
            }
        }
    });
}

#[cfg(test)]
mod tests;
