//! Call-site argument binding and lazy argument access.
//!
//! [`CallArgs::bind`] maps the argument expressions of a call onto the
//! callee's parameters without evaluating anything. The callee then reads
//! each argument through the `get*` accessors, which evaluate the bound
//! expression on every read, fall back to the default thunk for unbound
//! optional parameters, and gather the leftover positional arguments for a
//! variadic parameter.

use std::sync::Arc;

use pl_ast::{CallExpr, Node, Pos};
use pl_value::errors::{
    duplicate_argument, missing_parameter, named_with_variadic, no_such_parameter,
    parameter_type, positional_after_named, too_many_arguments, unknown_named_argument,
};
use pl_value::{DTypes, EvalError, EvalResult, Shared, Value, ValueMap};

use super::{Function, Param};
use crate::task::Task;

/// Arguments of one call, bound to the callee's parameters.
pub struct CallArgs<'c> {
    func: &'c Function,
    call: &'c CallExpr,
    /// Bound expression per non-variadic parameter, in parameter order.
    slots: Vec<Option<&'c Node>>,
    /// Positional arguments past the fixed parameters.
    rest: Vec<&'c Node>,
}

impl<'c> CallArgs<'c> {
    /// Bind `call`'s arguments to `func`'s parameters.
    ///
    /// Positional arguments fill parameters left to right and must precede
    /// named ones; a named argument binds by parameter name and is refused
    /// outright when the callee is variadic. Each parameter is bound at most
    /// once, and every required one must end up bound.
    pub fn bind(func: &'c Function, call: &'c CallExpr) -> Result<Self, EvalError> {
        let name = func.name();
        let params = func.params();
        let variadic = func.variadic().is_some();
        let fixed = params.len() - usize::from(variadic);

        let mut slots: Vec<Option<&'c Node>> = vec![None; fixed];
        let mut rest = Vec::new();
        let mut named_seen = false;

        for (i, arg) in call.args.iter().enumerate() {
            if let Some((ident, value)) = arg.as_named_arg() {
                if variadic {
                    return Err(named_with_variadic(name).with_pos(ident.start));
                }
                named_seen = true;
                let idx = params[..fixed]
                    .iter()
                    .position(|p| p.name == ident.name)
                    .ok_or_else(|| unknown_named_argument(name, &ident.name).with_pos(ident.start))?;
                if slots[idx].is_some() {
                    return Err(duplicate_argument(name, &ident.name).with_pos(ident.start));
                }
                slots[idx] = Some(value);
                continue;
            }

            if named_seen {
                return Err(positional_after_named(name).with_pos(arg.pos()));
            }
            if i < fixed {
                slots[i] = Some(arg);
            } else if variadic {
                rest.push(arg);
            } else {
                return Err(too_many_arguments(name, fixed, call.args.len()).with_pos(arg.pos()));
            }
        }

        for (param, slot) in params.iter().zip(&slots) {
            if slot.is_none() && !param.is_optional() {
                return Err(missing_parameter(name, &param.name).with_pos(call.name_pos));
            }
        }

        Ok(CallArgs {
            func,
            call,
            slots,
            rest,
        })
    }

    pub fn func_name(&self) -> &'c str {
        self.func.name()
    }

    /// Position of the call, for errors raised by the callee.
    pub fn pos(&self) -> Pos {
        self.call.name_pos
    }

    /// Whether the call supplied the parameter (variadic: any extra
    /// positional argument).
    pub fn is_bound(&self, name: &str) -> bool {
        match self.param_index(name) {
            Some(idx) if idx < self.slots.len() => self.slots[idx].is_some(),
            Some(_) => !self.rest.is_empty(),
            None => false,
        }
    }

    /// Unevaluated expression bound to a non-variadic parameter; lets check
    /// variants inspect literals without running anything.
    pub fn node(&self, name: &str) -> Option<&'c Node> {
        let idx = self.param_index(name)?;
        self.slots.get(idx).copied().flatten()
    }

    /// Unevaluated expressions gathered by the variadic parameter.
    pub fn rest_nodes(&self) -> &[&'c Node] {
        &self.rest
    }

    /// Evaluate the argument for parameter `name`.
    ///
    /// Evaluates the bound expression anew on every call. An unbound
    /// optional parameter yields its default; a variadic parameter yields a
    /// list of its arguments, each evaluated in order.
    pub fn get(&self, task: &mut Task<'_>, name: &str) -> EvalResult {
        let idx = self
            .param_index(name)
            .ok_or_else(|| no_such_parameter(self.func_name(), name).with_pos(self.pos()))?;
        let param = &self.func.params()[idx];

        if param.variadic {
            let mut items = Vec::with_capacity(self.rest.len());
            for node in &self.rest {
                items.push(self.eval_arg(task, param, node)?);
            }
            return Ok(Value::list(items));
        }

        match self.slots[idx] {
            Some(node) => self.eval_arg(task, param, node),
            None => param
                .default
                .as_ref()
                .map(|default| default())
                .ok_or_else(|| missing_parameter(self.func_name(), name).with_pos(self.pos())),
        }
    }

    pub fn get_int(&self, task: &mut Task<'_>, name: &str) -> Result<i64, EvalError> {
        match self.get(task, name)? {
            Value::Int(n) => Ok(n),
            other => Err(self.type_error(name, DTypes::INT, &other)),
        }
    }

    pub fn get_float(&self, task: &mut Task<'_>, name: &str) -> Result<f64, EvalError> {
        match self.get(task, name)? {
            Value::Float(f) => Ok(f),
            other => Err(self.type_error(name, DTypes::FLOAT, &other)),
        }
    }

    pub fn get_bool(&self, task: &mut Task<'_>, name: &str) -> Result<bool, EvalError> {
        match self.get(task, name)? {
            Value::Bool(b) => Ok(b),
            other => Err(self.type_error(name, DTypes::BOOL, &other)),
        }
    }

    pub fn get_str(&self, task: &mut Task<'_>, name: &str) -> Result<Arc<str>, EvalError> {
        match self.get(task, name)? {
            Value::Str(s) => Ok(s),
            other => Err(self.type_error(name, DTypes::STR, &other)),
        }
    }

    pub fn get_list(&self, task: &mut Task<'_>, name: &str) -> Result<Shared<Vec<Value>>, EvalError> {
        match self.get(task, name)? {
            Value::List(items) => Ok(items),
            other => Err(self.type_error(name, DTypes::LIST, &other)),
        }
    }

    pub fn get_map(&self, task: &mut Task<'_>, name: &str) -> Result<Shared<ValueMap>, EvalError> {
        match self.get(task, name)? {
            Value::Map(entries) => Ok(entries),
            other => Err(self.type_error(name, DTypes::MAP, &other)),
        }
    }

    fn eval_arg(&self, task: &mut Task<'_>, param: &Param, node: &Node) -> EvalResult {
        let value = task.eval_one(node)?;
        if param.types.accepts(value.dtype()) {
            Ok(value)
        } else {
            Err(parameter_type(self.func_name(), &param.name, param.types, value.dtype())
                .with_pos(node.pos()))
        }
    }

    fn type_error(&self, name: &str, expected: DTypes, got: &Value) -> EvalError {
        parameter_type(self.func_name(), name, expected, got.dtype()).with_pos(self.pos())
    }

    fn param_index(&self, name: &str) -> Option<usize> {
        self.func.params().iter().position(|p| p.name == name)
    }
}
