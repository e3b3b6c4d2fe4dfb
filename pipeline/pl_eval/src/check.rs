//! Static validation of a script without running it.
//!
//! The checker walks the whole tree once. It resolves and binds every call
//! against the function table, runs each function's check variant in place
//! of its body, and rejects the shapes the evaluator would only trip over
//! at runtime: `break`/`continue` outside a loop, unassignable targets,
//! compound assignment with several operands, non-identifier loop
//! variables, and nodes the engine does not evaluate. Nothing is executed,
//! so the check is repeatable and leaves no state behind.

use pl_ast::{AssignmentExpr, Block, Node, Pos};
use pl_stack::ensure_sufficient_stack;
use pl_value::errors::{
    compound_assign_arity, invalid_assign_target, invalid_loop_variable, outside_loop,
    undefined_function, unsupported_node,
};
use pl_value::EvalError;

use crate::func::CallArgs;
use crate::task::Task;

/// A call site found by the checker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallRef {
    pub name: String,
    pub pos: Pos,
}

/// Outcome of a successful check.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Every call in the script, in source order.
    pub call_refs: Vec<CallRef>,
}

impl CheckReport {
    /// Whether the script calls `name` anywhere.
    pub fn calls(&self, name: &str) -> bool {
        self.call_refs.iter().any(|r| r.name == name)
    }
}

/// Check `stmts` with `task` providing the function table and the context
/// seen by check variants. Stops at the first error.
pub(crate) fn check_stmts(task: &mut Task<'_>, stmts: &[Node]) -> Result<CheckReport, EvalError> {
    let mut checker = Checker {
        task,
        loop_depth: 0,
        report: CheckReport::default(),
    };
    checker.check_all(stmts)?;
    Ok(checker.report)
}

struct Checker<'t, 'a> {
    task: &'t mut Task<'a>,
    loop_depth: usize,
    report: CheckReport,
}

impl Checker<'_, '_> {
    fn check_all(&mut self, nodes: &[Node]) -> Result<(), EvalError> {
        nodes.iter().try_for_each(|node| self.check(node))
    }

    fn check(&mut self, node: &Node) -> Result<(), EvalError> {
        ensure_sufficient_stack(|| self.check_inner(node))
    }

    fn check_inner(&mut self, node: &Node) -> Result<(), EvalError> {
        match node {
            Node::Ident(_) | Node::Str(_) | Node::Int(_) | Node::Float(_) | Node::Bool(_) | Node::Nil(_) => Ok(()),

            Node::List(lit) => self.check_all(&lit.list),
            Node::Map(lit) => lit.entries.iter().try_for_each(|(key, value)| {
                self.check(key)?;
                self.check(value)
            }),
            Node::Paren(paren) => self.check(&paren.param),
            Node::Arith(expr) => {
                self.check(&expr.lhs)?;
                self.check(&expr.rhs)
            }
            Node::Cond(expr) => {
                self.check(&expr.lhs)?;
                self.check(&expr.rhs)
            }
            Node::In(expr) => {
                self.check(&expr.lhs)?;
                self.check(&expr.rhs)
            }
            Node::Unary(expr) => self.check(&expr.rhs),
            Node::Index(expr) => self.check_all(&expr.index),
            Node::Slice(expr) => {
                self.check(&expr.obj)?;
                for bound in [&expr.start, &expr.end, &expr.step].into_iter().flatten() {
                    self.check(bound)?;
                }
                Ok(())
            }
            Node::Attr(expr) => Err(unsupported_node(node.kind_name()).with_pos(expr.start)),

            Node::Assign(assign) => self.check_assign(assign),
            Node::Call(call) => {
                let funcs = self.task.funcs;
                let func = funcs
                    .get(&call.name)
                    .ok_or_else(|| undefined_function(&call.name).with_pos(call.name_pos))?;
                self.report.call_refs.push(CallRef {
                    name: call.name.clone(),
                    pos: call.name_pos,
                });
                let args = CallArgs::bind(func, call)?;
                if let Some(check) = func.check_fn() {
                    check(&mut *self.task, &args).map_err(|e| e.or_pos(call.name_pos))?;
                }
                for arg in &call.args {
                    match arg.as_named_arg() {
                        Some((_, value)) => self.check(value)?,
                        None => self.check(arg)?,
                    }
                }
                Ok(())
            }

            Node::IfElse(stmt) => {
                for branch in &stmt.if_list {
                    self.check(&branch.condition)?;
                    self.check_all(&branch.block.stmts)?;
                }
                match &stmt.else_block {
                    Some(block) => self.check_all(&block.stmts),
                    None => Ok(()),
                }
            }
            Node::For(stmt) => {
                for part in [&stmt.init, &stmt.cond, &stmt.update].into_iter().flatten() {
                    self.check(part)?;
                }
                self.check_loop_body(&stmt.body)
            }
            Node::ForIn(stmt) => {
                if !matches!(stmt.varb.as_ref(), Node::Ident(_)) {
                    return Err(invalid_loop_variable(stmt.varb.kind_name()).with_pos(stmt.varb.pos()));
                }
                self.check(&stmt.iter)?;
                self.check_loop_body(&stmt.body)
            }
            Node::Break(stmt) if self.loop_depth == 0 => Err(outside_loop("break").with_pos(stmt.start)),
            Node::Continue(stmt) if self.loop_depth == 0 => Err(outside_loop("continue").with_pos(stmt.start)),
            Node::Break(_) | Node::Continue(_) => Ok(()),
        }
    }

    fn check_loop_body(&mut self, body: &Block) -> Result<(), EvalError> {
        self.loop_depth += 1;
        let result = self.check_all(&body.stmts);
        self.loop_depth -= 1;
        result
    }

    fn check_assign(&mut self, assign: &AssignmentExpr) -> Result<(), EvalError> {
        if assign.op.arith().is_some() && (assign.lhs.len() != 1 || assign.rhs.len() != 1) {
            return Err(compound_assign_arity(assign.op.as_symbol()).with_pos(assign.op_pos));
        }
        for target in &assign.lhs {
            match target {
                Node::Ident(_) => {}
                Node::Index(expr) => self.check_all(&expr.index)?,
                other => return Err(invalid_assign_target(other.kind_name()).with_pos(other.pos())),
            }
        }
        self.check_all(&assign.rhs)
    }
}
