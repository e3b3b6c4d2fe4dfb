//! Tree-walking evaluation.
//!
//! [`Task::eval`] is the single dispatch point over [`Node`]; the arms
//! delegate to `control` (blocks and loops), `expr` (operators, literals,
//! indexing, slicing, calls) and `assign`. Every arm returns its result
//! directly as a [`Ret`].

mod assign;
mod control;
mod expr;

use pl_ast::Node;
use pl_stack::ensure_sufficient_stack;
use pl_value::errors::unsupported_node;
use pl_value::{EvalError, EvalResult, Value};

use crate::operators::{evaluate_arith, evaluate_in};
use crate::register::Ret;
use crate::task::Task;
use crate::unary_operators::evaluate_unary;

pub use expr::slice_indices;

impl Task<'_> {
    /// Run a statement sequence.
    ///
    /// Stops after the first statement that raises a break, continue or
    /// exit. An error latches the exit flag and is returned as is.
    pub fn run_stmts(&mut self, stmts: &[Node]) -> Result<(), EvalError> {
        for stmt in stmts {
            if let Err(err) = self.eval(stmt) {
                self.set_exit();
                return Err(err);
            }
            if self.should_unwind() {
                break;
            }
        }
        Ok(())
    }

    /// Evaluate any node.
    pub fn eval(&mut self, node: &Node) -> Result<Ret, EvalError> {
        ensure_sufficient_stack(|| self.eval_inner(node))
    }

    /// Evaluate a node that must produce exactly one value.
    pub fn eval_one(&mut self, node: &Node) -> EvalResult {
        self.eval(node)?.one().map_err(|e| e.or_pos(node.pos()))
    }

    fn eval_inner(&mut self, node: &Node) -> Result<Ret, EvalError> {
        let value = match node {
            // Leaves
            Node::Ident(ident) => self.lookup(ident)?,
            Node::Str(lit) => Value::string(lit.val.as_str()),
            Node::Int(lit) => Value::Int(lit.val),
            Node::Float(lit) => Value::Float(lit.val),
            Node::Bool(lit) => Value::Bool(lit.val),
            Node::Nil(_) => Value::Nil,

            // Composite literals
            Node::List(lit) => self.eval_list_literal(lit)?,
            Node::Map(lit) => self.eval_map_literal(lit)?,

            // Operators
            Node::Paren(paren) => return self.eval(&paren.param),
            Node::Arith(expr) => {
                let left = self.eval_one(&expr.lhs)?;
                let right = self.eval_one(&expr.rhs)?;
                evaluate_arith(left, right, expr.op).map_err(|e| e.with_pos(expr.op_pos))?
            }
            Node::Cond(expr) => self.eval_cond(expr)?,
            Node::Unary(expr) => {
                let operand = self.eval_one(&expr.rhs)?;
                evaluate_unary(expr.op, operand).map_err(|e| e.with_pos(expr.op_pos))?
            }
            Node::In(expr) => {
                let left = self.eval_one(&expr.lhs)?;
                let right = self.eval_one(&expr.rhs)?;
                evaluate_in(&left, &right).map_err(|e| e.with_pos(expr.op_pos))?
            }
            Node::Index(expr) => self.eval_index(expr)?,
            Node::Slice(expr) => self.eval_slice(expr)?,
            Node::Attr(expr) => return Err(unsupported_node(node.kind_name()).with_pos(expr.start)),

            // Results other than a single value
            Node::Call(call) => return self.eval_call(call),
            Node::Assign(assign) => {
                self.eval_assign(assign)?;
                return Ok(Ret::Void);
            }

            // Statements
            Node::IfElse(stmt) => {
                self.eval_if(stmt)?;
                return Ok(Ret::Void);
            }
            Node::For(stmt) => {
                self.eval_for(stmt)?;
                return Ok(Ret::Void);
            }
            Node::ForIn(stmt) => {
                self.eval_for_in(stmt)?;
                return Ok(Ret::Void);
            }
            Node::Break(_) => {
                self.loop_break = true;
                return Ok(Ret::Void);
            }
            Node::Continue(_) => {
                self.loop_continue = true;
                return Ok(Ret::Void);
            }
        };
        Ok(Ret::One(value))
    }
}
