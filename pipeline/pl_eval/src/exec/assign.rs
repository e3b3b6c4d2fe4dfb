//! Plain, multi-target and compound assignment.

use pl_ast::{ArithOp, AssignmentExpr, IndexExpr, Node};
use pl_value::errors::{
    assignment_mismatch, compound_assign_arity, cyclic_value, expected_single_value,
    invalid_assign_target, key_not_found, unindexable,
};
use pl_value::{EvalError, Value};

use super::expr::{index_step, list_index, list_key, map_key};
use crate::operators::evaluate_arith;
use crate::register::{Ret, Values};
use crate::task::Task;

impl Task<'_> {
    pub(crate) fn eval_assign(&mut self, assign: &AssignmentExpr) -> Result<(), EvalError> {
        match assign.op.arith() {
            Some(op) => self.eval_compound_assign(assign, op),
            None => self.eval_plain_assign(assign),
        }
    }

    /// `a, b = x, y` or `a, b = f()`. Every right-hand side is evaluated
    /// before the first target is written.
    fn eval_plain_assign(&mut self, assign: &AssignmentExpr) -> Result<(), EvalError> {
        let mut values = Values::new();
        for node in &assign.rhs {
            match self.eval(node)? {
                Ret::One(value) => values.push(value),
                Ret::Many(many) if assign.lhs.len() > 1 => values.extend(many),
                ret => return Err(expected_single_value(ret.len()).with_pos(node.pos())),
            }
        }
        if values.len() != assign.lhs.len() {
            return Err(assignment_mismatch(assign.lhs.len(), values.len()).with_pos(assign.op_pos));
        }
        for (target, value) in assign.lhs.iter().zip(values) {
            self.assign_to(target, value)?;
        }
        Ok(())
    }

    /// `x op= y` reads the target after evaluating `y`, then writes back.
    fn eval_compound_assign(&mut self, assign: &AssignmentExpr, op: ArithOp) -> Result<(), EvalError> {
        let ([target], [rhs]) = (assign.lhs.as_slice(), assign.rhs.as_slice()) else {
            return Err(compound_assign_arity(assign.op.as_symbol()).with_pos(assign.op_pos));
        };
        let right = self.eval_one(rhs)?;
        let current = self.eval_one(target)?;
        let value = evaluate_arith(current, right, op).map_err(|e| e.with_pos(assign.op_pos))?;
        self.assign_to(target, value)
    }

    fn assign_to(&mut self, target: &Node, value: Value) -> Result<(), EvalError> {
        match target {
            Node::Ident(ident) => {
                self.env.define(&ident.name, value);
                Ok(())
            }
            Node::Index(expr) => self.assign_index(expr, value),
            other => Err(invalid_assign_target(other.kind_name()).with_pos(other.pos())),
        }
    }

    /// Write through an index chain. Every key on the way, the last one
    /// included, must already exist. A container cannot be written into
    /// itself or into anything it holds.
    fn assign_index(&mut self, expr: &IndexExpr, value: Value) -> Result<(), EvalError> {
        let mut current = self.lookup(&expr.obj)?;
        let Some((last, path)) = expr.index.split_last() else {
            return Err(invalid_assign_target("index").with_pos(expr.lbracket));
        };
        if !matches!(current, Value::List(_) | Value::Map(_)) {
            return Err(unindexable(current.dtype()).with_pos(expr.obj.start));
        }

        for key_node in path {
            let key = self.eval_one(key_node)?;
            current = index_step(&current, &key, key_node.pos())?
                .ok_or_else(|| key_not_found(key.as_str().unwrap_or_default()).with_pos(key_node.pos()))?;
        }

        let key = self.eval_one(last)?;
        let key_pos = last.pos();
        if value.holds(&current) {
            return Err(cyclic_value(value.dtype()).with_pos(key_pos));
        }
        match &current {
            Value::Map(entries) => {
                let key = map_key(&key, key_pos)?;
                let mut entries = entries.write();
                let slot = entries
                    .get_mut(key)
                    .ok_or_else(|| key_not_found(key).with_pos(key_pos))?;
                *slot = value;
            }
            Value::List(items) => {
                let n = list_key(&key, key_pos)?;
                let mut items = items.write();
                let idx = list_index(n, items.len()).map_err(|e| e.with_pos(key_pos))?;
                items[idx] = value;
            }
            other => return Err(unindexable(other.dtype()).with_pos(key_pos)),
        }
        Ok(())
    }
}
