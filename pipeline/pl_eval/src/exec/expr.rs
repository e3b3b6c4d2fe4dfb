//! Expressions: identifiers, composite literals, short-circuit logic,
//! indexing, slicing and calls.

use pl_ast::{CallExpr, CondOp, ConditionalExpr, Identifier, IndexExpr, ListLiteral, MapLiteral, Node, Pos, SliceExpr};
use pl_value::errors::{
    index_out_of_range, key_type, slice_bound_type, slice_step_zero, undefined_function,
    undefined_variable, unindexable, unsliceable,
};
use pl_value::{DType, EvalError, EvalResult, Value, ValueMap};

use crate::func::CallArgs;
use crate::operators::evaluate_cond;
use crate::register::Ret;
use crate::task::Task;

impl Task<'_> {
    pub(crate) fn lookup(&self, ident: &Identifier) -> EvalResult {
        self.env
            .lookup(&ident.name)
            .ok_or_else(|| undefined_variable(&ident.name).with_pos(ident.start))
    }

    pub(crate) fn eval_list_literal(&mut self, lit: &ListLiteral) -> EvalResult {
        let mut items = Vec::with_capacity(lit.list.len());
        for node in &lit.list {
            items.push(self.eval_one(node)?);
        }
        Ok(Value::list(items))
    }

    /// Keys must evaluate to strings. A repeated key keeps its last value.
    pub(crate) fn eval_map_literal(&mut self, lit: &MapLiteral) -> EvalResult {
        let mut entries = ValueMap::default();
        for (key_node, value_node) in &lit.entries {
            let key = match self.eval_one(key_node)? {
                Value::Str(key) => key,
                other => {
                    return Err(key_type(DType::Map, DType::Str, other.dtype()).with_pos(key_node.pos()))
                }
            };
            let value = self.eval_one(value_node)?;
            entries.insert(key.to_string(), value);
        }
        Ok(Value::map(entries))
    }

    /// `&&` and `||` skip the right operand when the left one is a Bool
    /// that already decides the result.
    pub(crate) fn eval_cond(&mut self, expr: &ConditionalExpr) -> EvalResult {
        let left = self.eval_one(&expr.lhs)?;
        match (expr.op, &left) {
            (CondOp::Or, Value::Bool(true)) => return Ok(Value::Bool(true)),
            (CondOp::And, Value::Bool(false)) => return Ok(Value::Bool(false)),
            _ => {}
        }
        let right = self.eval_one(&expr.rhs)?;
        evaluate_cond(&left, &right, expr.op).map_err(|e| e.with_pos(expr.op_pos))
    }

    /// `name[k1][k2]...` read through nested lists and maps. A missing map
    /// key ends the chain with nil.
    pub(crate) fn eval_index(&mut self, expr: &IndexExpr) -> EvalResult {
        let mut current = self.lookup(&expr.obj)?;
        if !matches!(current, Value::List(_) | Value::Map(_)) {
            return Err(unindexable(current.dtype()).with_pos(expr.obj.start));
        }
        for key_node in &expr.index {
            let key = self.eval_one(key_node)?;
            match index_step(&current, &key, key_node.pos())? {
                Some(next) => current = next,
                None => return Ok(Value::Nil),
            }
        }
        Ok(current)
    }

    /// `obj[start:end:step]` over a string or a list. Always builds a new
    /// value.
    pub(crate) fn eval_slice(&mut self, expr: &SliceExpr) -> EvalResult {
        let obj = self.eval_one(&expr.obj)?;
        if !matches!(obj, Value::Str(_) | Value::List(_)) {
            return Err(unsliceable(obj.dtype()).with_pos(expr.obj.pos()));
        }
        let start = self.slice_bound(expr.start.as_deref(), "start")?;
        let end = self.slice_bound(expr.end.as_deref(), "end")?;
        let step = self.slice_bound(expr.step.as_deref(), "step")?;
        let step_pos = expr.step.as_ref().map_or(expr.lbracket, |step| step.pos());

        match obj {
            Value::Str(s) => {
                let chars: Vec<char> = s.chars().collect();
                let indices = slice_indices(chars.len(), start, end, step).map_err(|e| e.with_pos(step_pos))?;
                Ok(Value::string(indices.into_iter().map(|i| chars[i]).collect::<String>()))
            }
            Value::List(items) => {
                let items = items.read();
                let indices = slice_indices(items.len(), start, end, step).map_err(|e| e.with_pos(step_pos))?;
                Ok(Value::list(indices.into_iter().map(|i| items[i].clone()).collect()))
            }
            other => Err(unsliceable(other.dtype()).with_pos(expr.obj.pos())),
        }
    }

    fn slice_bound(&mut self, node: Option<&Node>, bound: &'static str) -> Result<Option<i64>, EvalError> {
        let Some(node) = node else {
            return Ok(None);
        };
        match self.eval_one(node)? {
            Value::Int(n) => Ok(Some(n)),
            other => Err(slice_bound_type(bound, other.dtype()).with_pos(node.pos())),
        }
    }

    /// Resolve the callee, bind the arguments and hand control to the
    /// function body.
    pub(crate) fn eval_call(&mut self, call: &CallExpr) -> Result<Ret, EvalError> {
        let funcs = self.funcs;
        let func = funcs
            .get(&call.name)
            .ok_or_else(|| undefined_function(&call.name).with_pos(call.name_pos))?;
        let args = CallArgs::bind(func, call)?;
        tracing::trace!(func = %call.name, args = call.args.len(), "call");
        (func.call_fn())(self, &args).map_err(|e| e.or_pos(call.name_pos))
    }
}

/// One step down an index chain. `Ok(None)` means a missing map key.
pub(super) fn index_step(container: &Value, key: &Value, key_pos: Pos) -> Result<Option<Value>, EvalError> {
    match container {
        Value::Map(entries) => {
            let key = map_key(key, key_pos)?;
            Ok(entries.read().get(key).cloned())
        }
        Value::List(items) => {
            let n = list_key(key, key_pos)?;
            let items = items.read();
            let idx = list_index(n, items.len()).map_err(|e| e.with_pos(key_pos))?;
            Ok(items.get(idx).cloned())
        }
        other => Err(unindexable(other.dtype()).with_pos(key_pos)),
    }
}

pub(super) fn map_key(key: &Value, key_pos: Pos) -> Result<&str, EvalError> {
    match key {
        Value::Str(key) => Ok(key),
        other => Err(key_type(DType::Map, DType::Str, other.dtype()).with_pos(key_pos)),
    }
}

pub(super) fn list_key(key: &Value, key_pos: Pos) -> Result<i64, EvalError> {
    match key {
        Value::Int(n) => Ok(*n),
        other => Err(key_type(DType::List, DType::Int, other.dtype()).with_pos(key_pos)),
    }
}

/// Resolve a possibly negative list index against `len`.
pub(super) fn list_index(index: i64, len: usize) -> Result<usize, EvalError> {
    let signed_len = i64::try_from(len).unwrap_or(i64::MAX);
    let resolved = if index < 0 { index.saturating_add(signed_len) } else { index };
    usize::try_from(resolved)
        .ok()
        .filter(|&idx| idx < len)
        .ok_or_else(|| index_out_of_range(index, len))
}

/// Positions selected by `[start:end:step]` over a sequence of `len`
/// elements.
///
/// `step` defaults to 1 and must not be 0. Negative bounds count from the
/// end. With a positive step the defaults are `0` and `len`; with a negative
/// step they are the last position and "before the first". Out-of-range
/// bounds are clamped, so the result never indexes past the sequence.
pub fn slice_indices(
    len: usize,
    start: Option<i64>,
    end: Option<i64>,
    step: Option<i64>,
) -> Result<Vec<usize>, EvalError> {
    let step = step.unwrap_or(1);
    if step == 0 {
        return Err(slice_step_zero());
    }
    let len = i64::try_from(len).unwrap_or(i64::MAX);
    let resolve = |bound: i64| if bound < 0 { bound.saturating_add(len) } else { bound };

    let mut indices = Vec::new();
    let (mut i, end) = if step > 0 {
        (start.map_or(0, resolve).max(0), end.map_or(len, resolve).min(len))
    } else {
        (start.map_or(len - 1, resolve).min(len - 1), end.map_or(-1, resolve).max(-1))
    };
    while (step > 0 && i < end) || (step < 0 && i > end) {
        let Ok(idx) = usize::try_from(i) else {
            break;
        };
        indices.push(idx);
        match i.checked_add(step) {
            Some(next) => i = next,
            None => break,
        }
    }
    Ok(indices)
}
