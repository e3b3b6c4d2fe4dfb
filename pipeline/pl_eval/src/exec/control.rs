//! Control flow: `if`/`elif`/`else`, C-style `for`, `for-in`.
//!
//! `break` and `continue` only set a flag on the task. `run_stmts` stops
//! the enclosing blocks as soon as either is set, and the nearest loop
//! consumes the flag here.

use pl_ast::{Block, ForInStmt, ForStmt, IfElseStmt, Node};
use pl_value::errors::{invalid_loop_variable, not_iterable};
use pl_value::{EvalError, Value};

use crate::task::Task;

impl Task<'_> {
    /// Conditions are tried in order in the enclosing scope; only the first
    /// truthy branch runs, in a scope of its own.
    pub(crate) fn eval_if(&mut self, stmt: &IfElseStmt) -> Result<(), EvalError> {
        for branch in &stmt.if_list {
            if self.eval_one(&branch.condition)?.is_truthy() {
                return self.scoped().run_stmts(&branch.block.stmts);
            }
        }
        match &stmt.else_block {
            Some(block) => self.scoped().run_stmts(&block.stmts),
            None => Ok(()),
        }
    }

    /// `init` runs once in the loop's scope; every pass runs the body in a
    /// nested scope, then `update`. A missing condition loops until
    /// `break` or exit.
    pub(crate) fn eval_for(&mut self, stmt: &ForStmt) -> Result<(), EvalError> {
        let mut scoped = self.scoped();
        if let Some(init) = &stmt.init {
            scoped.eval(init)?;
        }
        loop {
            if let Some(cond) = &stmt.cond {
                if !scoped.eval_one(cond)?.is_truthy() {
                    break;
                }
            }
            if !scoped.scoped().loop_pass(&stmt.body)? {
                break;
            }
            if let Some(update) = &stmt.update {
                scoped.eval(update)?;
            }
        }
        Ok(())
    }

    /// The iterable is evaluated once. All passes share one scope, which
    /// is emptied before the loop variable is bound for the next pass.
    ///
    /// Strings yield one-character strings, lists their elements and maps
    /// their keys. A list's length is fixed when the loop starts, each
    /// element is read when its pass begins.
    pub(crate) fn eval_for_in(&mut self, stmt: &ForInStmt) -> Result<(), EvalError> {
        let Node::Ident(var) = stmt.varb.as_ref() else {
            return Err(invalid_loop_variable(stmt.varb.kind_name()).with_pos(stmt.varb.pos()));
        };

        let mut scoped = self.scoped();
        let iterable = scoped.eval_one(&stmt.iter)?;
        let mut frame = scoped.scoped();

        match iterable {
            Value::Str(s) => {
                for ch in s.chars() {
                    let mut buf = [0_u8; 4];
                    if !frame.bind_pass(&var.name, Value::string(&*ch.encode_utf8(&mut buf)), &stmt.body)? {
                        break;
                    }
                }
            }
            Value::List(items) => {
                let len = items.read().len();
                for i in 0..len {
                    let Some(item) = items.read().get(i).cloned() else {
                        break;
                    };
                    if !frame.bind_pass(&var.name, item, &stmt.body)? {
                        break;
                    }
                }
            }
            Value::Map(entries) => {
                let keys: Vec<String> = entries.read().keys().cloned().collect();
                for key in keys {
                    if !frame.bind_pass(&var.name, Value::string(key), &stmt.body)? {
                        break;
                    }
                }
            }
            other => return Err(not_iterable(other.dtype()).with_pos(stmt.iter.pos())),
        }
        Ok(())
    }

    fn bind_pass(&mut self, var: &str, value: Value, body: &Block) -> Result<bool, EvalError> {
        self.env.clear_current();
        self.env.define(var, value);
        self.loop_pass(body)
    }

    /// Run one pass of a loop body in the current scope and consume the
    /// loop flags. Returns whether the loop goes on.
    fn loop_pass(&mut self, body: &Block) -> Result<bool, EvalError> {
        self.run_stmts(&body.stmts)?;
        if self.loop_break {
            self.loop_break = false;
            return Ok(false);
        }
        self.loop_continue = false;
        Ok(!self.should_unwind())
    }
}
