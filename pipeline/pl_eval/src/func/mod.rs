//! Registered functions.
//!
//! Scripts call into host code only through the [`FnTable`]. Each entry is a
//! [`Function`]: a name, a parameter list, the call itself and an optional
//! check variant run by `Script::check`. The engine never looks past this
//! descriptor.
//!
//! ```text
//! let mut funcs = FnTable::new();
//! funcs.register(
//!     Function::new("add_key", |task, args| {
//!         let key = args.get_str(task, "key")?;
//!         ...
//!         Ok(Ret::Void)
//!     })
//!     .param(Param::required("key", DTypes::STR))
//!     .param(Param::optional("value", DTypes::ANY, || Value::Nil)),
//! )?;
//! ```

mod binder;

use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::sync::Arc;

use pl_value::errors::{
    duplicate_function, duplicate_param, invalid_param_name, required_after_optional,
    variadic_not_last, variadic_with_default,
};
use pl_value::{DTypes, EvalError, Value};

use crate::register::Ret;
use crate::task::Task;

pub use binder::CallArgs;

/// Executable body of a function.
pub type CallFn = Arc<dyn Fn(&mut Task<'_>, &CallArgs<'_>) -> Result<Ret, EvalError> + Send + Sync>;

/// Static validation run in place of the call by `Script::check`.
pub type CheckFn = Arc<dyn Fn(&mut Task<'_>, &CallArgs<'_>) -> Result<(), EvalError> + Send + Sync>;

/// Produces a parameter's default value; run on every unbound read.
pub type DefaultFn = Arc<dyn Fn() -> Value + Send + Sync>;

/// One formal parameter.
#[derive(Clone)]
pub struct Param {
    pub name: String,
    pub types: DTypes,
    pub default: Option<DefaultFn>,
    pub variadic: bool,
}

impl Param {
    pub fn required(name: impl Into<String>, types: DTypes) -> Self {
        Param {
            name: name.into(),
            types,
            default: None,
            variadic: false,
        }
    }

    pub fn optional(
        name: impl Into<String>,
        types: DTypes,
        default: impl Fn() -> Value + Send + Sync + 'static,
    ) -> Self {
        Param {
            name: name.into(),
            types,
            default: Some(Arc::new(default)),
            variadic: false,
        }
    }

    /// Collects the remaining positional arguments into a list; `types`
    /// applies to each element.
    pub fn variadic(name: impl Into<String>, types: DTypes) -> Self {
        Param {
            name: name.into(),
            types,
            default: None,
            variadic: true,
        }
    }

    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Param")
            .field("name", &self.name)
            .field("types", &self.types)
            .field("optional", &self.is_optional())
            .field("variadic", &self.variadic)
            .finish()
    }
}

/// Function descriptor.
#[derive(Clone)]
pub struct Function {
    name: String,
    params: Vec<Param>,
    call: CallFn,
    check: Option<CheckFn>,
    desc: String,
}

impl Function {
    pub fn new(
        name: impl Into<String>,
        call: impl Fn(&mut Task<'_>, &CallArgs<'_>) -> Result<Ret, EvalError> + Send + Sync + 'static,
    ) -> Self {
        Function {
            name: name.into(),
            params: Vec::new(),
            call: Arc::new(call),
            check: None,
            desc: String::new(),
        }
    }

    #[must_use]
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    #[must_use]
    pub fn check(
        mut self,
        check: impl Fn(&mut Task<'_>, &CallArgs<'_>) -> Result<(), EvalError> + Send + Sync + 'static,
    ) -> Self {
        self.check = Some(Arc::new(check));
        self
    }

    #[must_use]
    pub fn desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn description(&self) -> &str {
        &self.desc
    }

    /// The trailing variadic parameter, if any.
    pub fn variadic(&self) -> Option<&Param> {
        self.params.last().filter(|p| p.variadic)
    }

    pub(crate) fn call_fn(&self) -> &CallFn {
        &self.call
    }

    pub(crate) fn check_fn(&self) -> Option<&CheckFn> {
        self.check.as_ref()
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("has_check", &self.check.is_some())
            .finish_non_exhaustive()
    }
}

/// Validate a function's parameter list.
///
/// Names must be identifiers and unique; parameters with defaults come
/// after all required ones; a variadic parameter is last and has no default.
pub fn check_fn_param_def(func: &Function) -> Result<(), EvalError> {
    let name = func.name();
    let mut seen = FxHashSet::default();
    let mut optional_seen = false;
    let last = func.params.len().saturating_sub(1);

    for (i, param) in func.params.iter().enumerate() {
        if !is_identifier(&param.name) {
            return Err(invalid_param_name(name, &param.name));
        }
        if !seen.insert(param.name.as_str()) {
            return Err(duplicate_param(name, &param.name));
        }
        if param.variadic {
            if i != last {
                return Err(variadic_not_last(name, &param.name));
            }
            if param.is_optional() {
                return Err(variadic_with_default(name, &param.name));
            }
        } else if param.is_optional() {
            optional_seen = true;
        } else if optional_seen {
            return Err(required_after_optional(name, &param.name));
        }
    }
    Ok(())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Name → function lookup shared by every run of a script.
#[derive(Clone, Debug, Default)]
pub struct FnTable {
    funcs: FxHashMap<String, Arc<Function>>,
}

impl FnTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a function after validating its parameter list. Names are unique.
    pub fn register(&mut self, func: Function) -> Result<(), EvalError> {
        check_fn_param_def(&func)?;
        if self.funcs.contains_key(func.name()) {
            return Err(duplicate_function(func.name()));
        }
        tracing::trace!(name = func.name(), "register function");
        self.funcs.insert(func.name.clone(), Arc::new(func));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.funcs.get(name).map(Arc::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.funcs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
