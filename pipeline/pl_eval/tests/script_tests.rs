#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Tests can panic"
)]

//! End-to-end tests through the host-facing `Script` API.
//!
//! The host functions here mimic a small record-processing library: the
//! record being built travels in a run option, scripts fill it through
//! `add_key`, and helper functions return one or more values.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use pl_ast::build::{
    arith, assign, assign_many, assign_op, boolean, call, cond, for_in, for_loop, ident, if_else,
    index, int, list, map, string,
};
use pl_ast::{ArithOp, AssignOp, CondOp, Node, Stmts};
use pl_eval::{
    DTypes, EvalError, EvalErrorKind, FnTable, Function, Param, Ret, RunOptions, Script, Value,
};
use pl_value::ValueMap;
use pretty_assertions::assert_eq;
use rayon::prelude::*;

type Record = Arc<Mutex<ValueMap>>;

fn record_of(task: &pl_eval::Task<'_>) -> Result<Record, EvalError> {
    task.private::<Record>("record")
        .cloned()
        .ok_or_else(|| EvalError::new("no record attached to this run"))
}

fn stdlib() -> FnTable {
    let mut funcs = FnTable::new();
    funcs
        .register(
            Function::new("add_key", |task, args| {
                let key = args.get_str(task, "key")?;
                let value = args.get(task, "value")?;
                record_of(task)?.lock().insert(key.to_string(), value);
                Ok(Ret::Void)
            })
            .param(Param::required("key", DTypes::STR))
            .param(Param::optional("value", DTypes::ANY, || Value::Nil))
            .desc("Set a field on the current record."),
        )
        .unwrap();
    funcs
        .register(
            Function::new("len", |task, args| {
                let n = match args.get(task, "v")? {
                    Value::Str(s) => s.chars().count(),
                    Value::List(items) => items.read().len(),
                    Value::Map(entries) => entries.read().len(),
                    _ => unreachable!("rejected by the parameter type"),
                };
                Ok(Ret::One(Value::Int(i64::try_from(n).unwrap())))
            })
            .param(Param::required("v", DTypes::STR | DTypes::LIST | DTypes::MAP)),
        )
        .unwrap();
    funcs
        .register(
            Function::new("kv", |task, args| {
                let pair = args.get_str(task, "pair")?;
                let (k, v) = pair
                    .split_once('=')
                    .ok_or_else(|| EvalError::new(format!("`{pair}` has no `=`")))?;
                Ok(Ret::from_values([Value::string(k), Value::string(v)]))
            })
            .param(Param::required("pair", DTypes::STR)),
        )
        .unwrap();
    funcs
        .register(
            Function::new("input", |task, _| {
                let n = task
                    .private::<i64>("n")
                    .copied()
                    .ok_or_else(|| EvalError::new("no input"))?;
                Ok(Ret::One(Value::Int(n)))
            }),
        )
        .unwrap();
    funcs
}

fn script(name: &str, stmts: Stmts) -> Script {
    Script::builder(name, stmts, Arc::new(stdlib())).build()
}

fn run_on_record(script: &Script) -> Result<ValueMap, EvalError> {
    let record: Record = Arc::default();
    script.run(None, RunOptions::new().with_val("record", Arc::clone(&record)))?;
    let fields = record.lock().clone();
    Ok(fields)
}

#[test]
fn builds_a_record() {
    let stmts = vec![
        assign(ident("fields"), list(vec![string("a=1"), string("bb=22"), string("c=")])),
        for_in(
            "f",
            ident("fields"),
            vec![
                assign_many(vec![ident("k"), ident("v")], AssignOp::Eq, vec![call("kv", vec![ident("f")])]),
                if_else(
                    vec![(cond(call("len", vec![ident("v")]), CondOp::Gt, int(0)), vec![
                        call("add_key", vec![ident("k"), call("len", vec![ident("v")])]),
                    ])],
                    Some(vec![call("add_key", vec![ident("k")])]),
                ),
            ],
        ),
        call("add_key", vec![string("count"), call("len", vec![ident("fields")])]),
    ];
    let fields = run_on_record(&script("kv.p", stmts)).unwrap();

    let mut keys: Vec<&str> = fields.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["a", "bb", "c", "count"]);
    assert_eq!(fields["a"], Value::Int(1));
    assert_eq!(fields["bb"], Value::Int(2));
    assert_eq!(fields["c"], Value::Nil);
    assert_eq!(fields["count"], Value::Int(3));
}

#[test]
fn run_task_exposes_globals() {
    let stmts = vec![
        assign(ident("m"), map(vec![(string("hits"), int(0))])),
        for_loop(
            Some(assign(ident("i"), int(0))),
            Some(cond(ident("i"), CondOp::Lt, int(5))),
            Some(assign_op(ident("i"), AssignOp::AddEq, int(1))),
            vec![assign_op(index("m", vec![string("hits")]), AssignOp::AddEq, ident("i"))],
        ),
    ];
    let script = script("count.p", stmts);
    let task = script.run_task(None, RunOptions::new()).unwrap();
    assert_eq!(task.get_var("m"), Some(Value::map_from([("hits", Value::Int(10))])));
    assert!(!task.exited());
}

#[test]
fn errors_name_the_script_and_position() {
    let stmts = vec![
        assign(ident("x"), int(1)),
        assign(ident("y"), arith(ident("x"), ArithOp::Div, int(0)).at(3, 7)),
    ];
    let err = script("nginx.p", stmts).run(None, RunOptions::new()).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::IntegerDivisionByZero);
    assert_eq!(err.to_string(), "nginx.p:3:7: integer division by zero");
}

#[test]
fn host_errors_propagate() {
    let stmts = vec![call("kv", vec![string("novalue")]).at(1, 1)];
    let err = script("kv.p", stmts).run(None, RunOptions::new()).unwrap_err();
    assert_eq!(err.to_string(), "kv.p:1:1: `novalue` has no `=`");
}

#[test]
fn missing_run_option() {
    let stmts = vec![call("add_key", vec![string("k")])];
    let err = script("bare.p", stmts).run(None, RunOptions::new()).unwrap_err();
    assert_eq!(err.message, "no record attached to this run");
}

#[test]
fn metadata() {
    let script = Script::builder("access.p", vec![], Arc::new(stdlib()))
        .namespace("remote")
        .category("logging")
        .file_path("/etc/pipeline/logging/access.p")
        .build();
    assert_eq!(script.name(), "access.p");
    assert_eq!(script.namespace(), "remote");
    assert_eq!(script.category(), "logging");
    assert_eq!(script.file_path(), "/etc/pipeline/logging/access.p");
    assert!(script.stmts().is_empty());
    assert_eq!(
        script.functions().get("add_key").map(Function::description),
        Some("Set a field on the current record.")
    );
    assert!(script.run(None, RunOptions::new()).is_ok());
}

mod check {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn passes_and_reports_calls() {
        let stmts = vec![
            call("add_key", vec![string("a"), call("len", vec![string("xyz")])]),
            for_loop(None, None, None, vec![pl_ast::build::brk()]),
        ];
        let script = script("ok.p", stmts);
        let report = script.check().unwrap();
        let names: Vec<&str> = report.call_refs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["add_key", "len"]);
        // checking twice gives the same answer
        assert_eq!(script.check().unwrap(), report);
    }

    #[test]
    fn failures_carry_the_script_name() {
        let stmts = vec![call("drop_key", vec![string("a")]).at(2, 1)];
        let err = script("bad.p", stmts).check().unwrap_err();
        assert_eq!(err.to_string(), "bad.p:2:1: function `drop_key` is not defined");
    }
}

mod cancellation {
    use super::*;

    #[test]
    fn signal_set_before_the_run_stops_after_the_first_statement() {
        let signal = AtomicBool::new(true);
        let stmts = vec![
            call("add_key", vec![string("first")]),
            call("add_key", vec![string("second")]),
        ];
        let record: Record = Arc::default();
        script("sig.p", stmts)
            .run(Some(&signal), RunOptions::new().with_val("record", Arc::clone(&record)))
            .unwrap();
        let fields = record.lock();
        assert!(fields.contains_key("first"));
        assert!(!fields.contains_key("second"));
    }

    #[test]
    fn signal_raised_by_another_thread_ends_an_endless_loop() {
        let signal = AtomicBool::new(false);
        let stmts = vec![
            for_loop(None, Some(boolean(true)), None, vec![]),
            call("add_key", vec![string("after")]),
        ];
        let script = script("loop.p", stmts);
        let record: Record = Arc::default();

        std::thread::scope(|scope| {
            scope.spawn(|| {
                std::thread::sleep(std::time::Duration::from_millis(20));
                signal.store(true, Ordering::Relaxed);
            });
            let task = script
                .run_task(Some(&signal), RunOptions::new().with_val("record", Arc::clone(&record)))
                .unwrap();
            assert!(task.exited());
        });
        assert!(record.lock().is_empty());
    }
}

mod ref_run {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parent_with(child: Script, parent_stmts: Stmts) -> Script {
        let child = Arc::new(child);
        let mut funcs = stdlib();
        funcs
            .register(Function::new("use_child", move |task, _| {
                child.ref_run(task)?;
                Ok(Ret::Void)
            }))
            .unwrap();
        Script::builder("parent.p", parent_stmts, Arc::new(funcs)).build()
    }

    #[test]
    fn child_shares_the_run_context() {
        let child = script("child.p", vec![call("add_key", vec![string("from_child"), boolean(true)])]);
        let parent = parent_with(
            child,
            vec![call("add_key", vec![string("from_parent")]), call("use_child", vec![])],
        );
        let fields = run_on_record(&parent).unwrap();
        assert_eq!(fields["from_child"], Value::Bool(true));
        assert!(fields.contains_key("from_parent"));
    }

    #[test]
    fn child_cannot_see_parent_variables() {
        let child = script("child.p", vec![assign(ident("y"), ident("secret")).at(1, 3)]);
        let parent = parent_with(
            child,
            vec![assign(ident("secret"), int(1)), call("use_child", vec![])],
        );
        let err = parent.run(None, RunOptions::new()).unwrap_err();
        assert_eq!(err.script.as_deref(), Some("child.p"));
        assert!(matches!(err.kind, EvalErrorKind::UndefinedVariable { .. }));
    }
}

#[test]
fn concurrent_runs_share_one_script() {
    // out = input() * 2
    let stmts = vec![assign(
        ident("out"),
        arith(call("input", vec![]), ArithOp::Mul, int(2)),
    )];
    let script = script("double.p", stmts);

    let results: Vec<Value> = (0..64_i64)
        .into_par_iter()
        .map(|n| {
            let task = script
                .run_task(None, RunOptions::new().with_val("n", n))
                .unwrap();
            task.get_var("out").unwrap()
        })
        .collect();

    let expected: Vec<Value> = (0..64_i64).map(|n| Value::Int(n * 2)).collect();
    assert_eq!(results, expected);
}

#[test]
fn stmts_can_be_inspected() {
    let stmts: Stmts = vec![assign(ident("a"), int(1))];
    let script = script("one.p", stmts);
    assert!(matches!(script.stmts(), [Node::Assign(_)]));
}

#[test]
fn init_tracing_is_idempotent() {
    pl_eval::init_tracing();
    pl_eval::init_tracing();
    let script = script("traced.p", vec![assign(ident("a"), int(1))]);
    assert!(script.run(None, RunOptions::new()).is_ok());
}
