//! Tests for plain, multi-target, compound and index assignment.

use pl_ast::build::{
    assign, assign_many, assign_op, boolean, call, cond, ident, if_else, index, int, list, map,
    string,
};
use pl_ast::{AssignOp, CondOp, Pos};
use pl_value::{DType, EvalErrorKind, Value};

use super::{global, ints, run, run_err, run_with};
use crate::func::{FnTable, Function};
use crate::register::Ret;

mod plain {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rebinding_replaces() {
        let env = run(&[assign(ident("x"), int(1)), assign(ident("x"), string("s"))]).unwrap();
        assert_eq!(global(&env, "x"), Value::string("s"));
    }

    #[test]
    fn multiple_targets() {
        let env = run(&[assign_many(
            vec![ident("a"), ident("b")],
            AssignOp::Eq,
            vec![int(1), int(2)],
        )])
        .unwrap();
        assert_eq!(global(&env, "a"), Value::Int(1));
        assert_eq!(global(&env, "b"), Value::Int(2));
    }

    #[test]
    fn multi_return_call_spreads() {
        let mut funcs = FnTable::new();
        funcs
            .register(Function::new("split", |_, _| {
                Ok(Ret::from_values([Value::string("k"), Value::string("v")]))
            }))
            .unwrap();
        let env = run_with(
            &funcs,
            &[assign_many(
                vec![ident("k"), ident("v")],
                AssignOp::Eq,
                vec![call("split", vec![])],
            )],
        )
        .unwrap();
        assert_eq!(global(&env, "k"), Value::string("k"));
        assert_eq!(global(&env, "v"), Value::string("v"));
    }

    #[test]
    fn count_mismatch() {
        let node = assign_many(vec![ident("a"), ident("b")], AssignOp::Eq, vec![int(1)]).at(2, 4);
        let err = run(&[node]).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::AssignmentMismatch { targets: 2, values: 1 });
        assert_eq!(err.pos, Some(Pos::new(2, 4)));
    }

    #[test]
    fn invalid_target() {
        assert_eq!(
            run_err(&[assign(int(1), int(2))]),
            EvalErrorKind::InvalidAssignTarget {
                kind: "integer literal"
            }
        );
    }

    #[test]
    fn inner_scope_shadows() {
        let env = run(&[
            assign(ident("x"), int(1)),
            if_else(
                vec![(boolean(true), vec![assign(ident("x"), int(2)), assign(ident("y"), int(3))])],
                None,
            ),
        ])
        .unwrap();
        assert_eq!(global(&env, "x"), Value::Int(1));
        assert_eq!(env.lookup("y"), None);
    }
}

mod compound {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn read_modify_write() {
        let env = run(&[
            assign(ident("n"), int(10)),
            assign_op(ident("n"), AssignOp::AddEq, int(5)),
            assign_op(ident("n"), AssignOp::SubEq, int(3)),
            assign_op(ident("n"), AssignOp::MulEq, int(2)),
            assign_op(ident("n"), AssignOp::DivEq, int(5)),
            assign_op(ident("n"), AssignOp::ModEq, int(3)),
            assign(ident("s"), string("a")),
            assign_op(ident("s"), AssignOp::AddEq, string("b")),
        ])
        .unwrap();
        assert_eq!(global(&env, "n"), Value::Int(1));
        assert_eq!(global(&env, "s"), Value::string("ab"));
    }

    #[test]
    fn through_an_index() {
        let env = run(&[
            assign(ident("m"), map(vec![(string("hits"), int(1))])),
            assign_op(index("m", vec![string("hits")]), AssignOp::AddEq, int(1)),
        ])
        .unwrap();
        assert_eq!(global(&env, "m"), Value::map_from([("hits", Value::Int(2))]));
    }

    #[test]
    fn needs_one_target_and_one_value() {
        let node = assign_many(vec![ident("a"), ident("b")], AssignOp::AddEq, vec![int(1), int(2)]);
        assert_eq!(run_err(&[node]), EvalErrorKind::CompoundAssignArity { op: "+=" });
    }

    #[test]
    fn undefined_target() {
        assert!(matches!(
            run_err(&[assign_op(ident("nope"), AssignOp::AddEq, int(1))]),
            EvalErrorKind::UndefinedVariable { .. }
        ));
    }

    #[test]
    fn type_errors_point_at_the_operator() {
        let node = assign_op(ident("x"), AssignOp::ModEq, int(2)).at(5, 3);
        let err = run(&[assign(ident("x"), string("s")), node]).unwrap_err();
        assert_eq!(
            err.kind,
            EvalErrorKind::UnsupportedOperand {
                op: "%",
                left: DType::Str,
                right: DType::Int,
            }
        );
        assert_eq!(err.pos, Some(Pos::new(5, 3)));
    }
}

mod index_targets {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn map_existing_key_mutates_in_place() {
        let env = run(&[
            assign(ident("m"), map(vec![(string("a"), int(1))])),
            assign(index("m", vec![string("a")]), int(2)),
        ])
        .unwrap();
        assert_eq!(global(&env, "m"), Value::map_from([("a", Value::Int(2))]));
    }

    #[test]
    fn map_new_key_is_an_error() {
        let err = run(&[
            assign(ident("m"), map(vec![(string("a"), int(1))])),
            assign(index("m", vec![string("b").at(3, 3)]), int(2)),
        ])
        .unwrap_err();
        assert_eq!(
            err.kind,
            EvalErrorKind::KeyNotFound {
                key: "b".to_string()
            }
        );
        assert_eq!(err.pos, Some(Pos::new(3, 3)));
    }

    #[test]
    fn missing_intermediate_key() {
        assert_eq!(
            run_err(&[
                assign(ident("m"), map(vec![])),
                assign(index("m", vec![string("x"), string("y")]), int(2)),
            ]),
            EvalErrorKind::KeyNotFound {
                key: "x".to_string()
            }
        );
    }

    #[test]
    fn nested_list_write() {
        let env = run(&[
            assign(ident("m"), map(vec![(string("xs"), list(vec![int(1), int(2)]))])),
            assign(index("m", vec![string("xs"), int(-1)]), int(7)),
        ])
        .unwrap();
        assert_eq!(global(&env, "m"), Value::map_from([("xs", ints(&[1, 7]))]));
    }

    #[test]
    fn list_out_of_range() {
        assert_eq!(
            run_err(&[
                assign(ident("xs"), list(vec![int(1)])),
                assign(index("xs", vec![int(1)]), int(2)),
            ]),
            EvalErrorKind::IndexOutOfRange { index: 1, len: 1 }
        );
    }

    #[test]
    fn writes_are_visible_through_aliases() {
        let env = run(&[
            assign(ident("a"), list(vec![int(1), int(2)])),
            assign(ident("b"), ident("a")),
            assign(index("b", vec![int(0)]), int(9)),
        ])
        .unwrap();
        assert_eq!(global(&env, "a"), ints(&[9, 2]));
    }

    #[test]
    fn scalar_base() {
        assert_eq!(
            run_err(&[
                assign(ident("n"), int(1)),
                assign(index("n", vec![int(0)]), int(2)),
            ]),
            EvalErrorKind::Unindexable { dtype: DType::Int }
        );
    }

    #[test]
    fn list_into_itself_is_rejected() {
        let err = run(&[
            assign(ident("x"), list(vec![int(1)])),
            assign(index("x", vec![int(0).at(2, 3)]), ident("x")),
        ])
        .unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::CyclicValue { dtype: DType::List });
        assert_eq!(err.pos, Some(Pos::new(2, 3)));
    }

    #[test]
    fn container_holding_the_target_is_rejected() {
        let kind = run_err(&[
            assign(ident("x"), list(vec![int(1)])),
            assign(ident("m"), map(vec![(string("xs"), ident("x"))])),
            assign(index("x", vec![int(0)]), ident("m")),
        ]);
        assert_eq!(kind, EvalErrorKind::CyclicValue { dtype: DType::Map });
    }

    #[test]
    fn rejected_write_leaves_target_unchanged() {
        let funcs = FnTable::new();
        let mut task = crate::task::Task::new(&funcs, None);
        task.run_stmts(&[assign(ident("x"), list(vec![int(1)]))]).unwrap();
        assert!(task
            .run_stmts(&[assign(index("x", vec![int(0)]), ident("x"))])
            .is_err());
        assert_eq!(global(&task.env, "x"), ints(&[1]));
    }

    #[test]
    fn sibling_alias_is_not_a_cycle() {
        let env = run(&[
            assign(ident("x"), list(vec![int(1)])),
            assign(ident("y"), list(vec![int(0), int(0)])),
            assign(index("y", vec![int(0)]), ident("x")),
            assign(index("y", vec![int(1)]), ident("x")),
        ])
        .unwrap();
        assert_eq!(global(&env, "y"), Value::list(vec![ints(&[1]), ints(&[1])]));
    }
}

mod host_made_cycles {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn comparing_self_containing_lists_terminates() {
        let env = run(&[
            assign(ident("x"), list(vec![int(1)])),
            call("append", vec![ident("x"), ident("x")]),
            assign(ident("y"), list(vec![int(1)])),
            call("append", vec![ident("y"), ident("y")]),
            assign(ident("same"), cond(ident("x"), CondOp::Eq, ident("y"))),
            assign(ident("differ"), cond(ident("x"), CondOp::NotEq, ident("y"))),
        ])
        .unwrap();
        assert_eq!(global(&env, "same"), Value::Bool(true));
        assert_eq!(global(&env, "differ"), Value::Bool(false));
        let x = global(&env, "x");
        assert_eq!(x.to_string(), "[1, [...]]");
        if let Value::List(items) = x {
            items.write().clear();
        }
        if let Value::List(items) = global(&env, "y") {
            items.write().clear();
        }
    }
}
