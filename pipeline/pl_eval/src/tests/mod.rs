//! Evaluator tests, grouped by the module they exercise.
//!
//! Scripts are assembled with `pl_ast::build` and run on a bare task, so
//! these tests see the global scope directly.

mod assign_tests;

use pl_ast::Node;
use pl_value::{DTypes, EvalError, EvalErrorKind, EvalResult, Value};

use crate::environment::Environment;
use crate::func::{FnTable, Function, Param};
use crate::register::Ret;
use crate::task::Task;

/// Host functions available to every test script.
///
/// `append(xs, v)` pushes onto the list in place. Scripts use it to collect
/// results from inside blocks, where assignment would only shadow.
fn test_funcs() -> FnTable {
    let mut funcs = FnTable::new();
    funcs
        .register(
            Function::new("append", |task, args| {
                let items = args.get_list(task, "xs")?;
                let value = args.get(task, "v")?;
                items.write().push(value);
                Ok(Ret::Void)
            })
            .param(Param::required("xs", DTypes::LIST))
            .param(Param::required("v", DTypes::ANY)),
        )
        .unwrap();
    funcs
}

/// Run `stmts` with `funcs` and return the final scope stack.
fn run_with(funcs: &FnTable, stmts: &[Node]) -> Result<Environment, EvalError> {
    let mut task = Task::new(funcs, None);
    task.run_stmts(stmts)?;
    Ok(task.env)
}

fn run(stmts: &[Node]) -> Result<Environment, EvalError> {
    run_with(&test_funcs(), stmts)
}

fn run_err(stmts: &[Node]) -> EvalErrorKind {
    match run(stmts) {
        Ok(_) => panic!("expected an error"),
        Err(err) => err.kind,
    }
}

/// Global `name` after the run; panics when unbound.
fn global(env: &Environment, name: &str) -> Value {
    env.lookup(name)
        .unwrap_or_else(|| panic!("`{name}` is not bound"))
}

/// Evaluate a single expression on an empty task.
fn eval(node: &Node) -> EvalResult {
    let funcs = FnTable::new();
    Task::new(&funcs, None).eval_one(node)
}

fn ints(values: &[i64]) -> Value {
    Value::list(values.iter().copied().map(Value::Int).collect())
}
