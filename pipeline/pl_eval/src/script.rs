//! Compiled scripts and their entry points.
//!
//! A [`Script`] is immutable once built: a name, some descriptive metadata,
//! the statement list and a shared function table. Every `run` or `check`
//! creates its own [`Task`], so one script can serve any number of
//! concurrent runs.

use std::any::Any;
use std::sync::Arc;

use pl_ast::{Node, Stmts};
use pl_value::EvalError;

use crate::check::{check_stmts, CheckReport};
use crate::func::FnTable;
use crate::task::{PrivateValue, Signal, Task};

/// Per-run configuration handed to [`Script::run`].
#[derive(Clone, Default)]
pub struct RunOptions {
    vals: Vec<(String, PrivateValue)>,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `val` readable to function implementations through
    /// [`Task::private`]. A later value for the same key wins.
    #[must_use]
    pub fn with_val(mut self, key: impl Into<String>, val: impl Any + Send + Sync) -> Self {
        let val: PrivateValue = Arc::new(val);
        self.vals.push((key.into(), val));
        self
    }

    fn apply(self, task: &mut Task<'_>) {
        for (key, val) in self.vals {
            task.with_val(key, val, true);
        }
    }
}

pub struct Script {
    name: String,
    namespace: String,
    category: String,
    file_path: String,
    stmts: Stmts,
    funcs: Arc<FnTable>,
}

impl Script {
    pub fn builder(name: impl Into<String>, stmts: Stmts, funcs: Arc<FnTable>) -> ScriptBuilder {
        ScriptBuilder {
            script: Script {
                name: name.into(),
                namespace: String::new(),
                category: String::new(),
                file_path: String::new(),
                stmts,
                funcs,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn stmts(&self) -> &[Node] {
        &self.stmts
    }

    pub fn functions(&self) -> &FnTable {
        &self.funcs
    }

    /// Execute the script once.
    ///
    /// An exit signal stops the run quietly: statements already executed
    /// keep their effects and the result is `Ok`. Errors carry the script
    /// name.
    pub fn run(&self, signal: Option<&dyn Signal>, options: RunOptions) -> Result<(), EvalError> {
        self.run_task(signal, options).map(drop)
    }

    /// Like [`Script::run`], but hands back the finished task so the caller
    /// can read the global scope.
    #[tracing::instrument(level = "debug", skip_all, fields(script = %self.name))]
    pub fn run_task<'s>(
        &'s self,
        signal: Option<&'s dyn Signal>,
        options: RunOptions,
    ) -> Result<Task<'s>, EvalError> {
        let mut task = Task::new(&self.funcs, signal);
        options.apply(&mut task);
        match task.run_stmts(&self.stmts) {
            Ok(()) => Ok(task),
            Err(err) => {
                let err = err.with_script(&self.name);
                tracing::debug!(error = %err, "script failed");
                Err(err)
            }
        }
    }

    /// Run this script from inside another script's run. The fresh task
    /// shares the caller's signal and private values, but not its scopes.
    pub fn ref_run(&self, parent: &Task<'_>) -> Result<(), EvalError> {
        let mut task = parent.child(&self.funcs);
        task.run_stmts(&self.stmts)
            .map_err(|err| err.with_script(&self.name))
    }

    /// Validate the script without executing it.
    #[tracing::instrument(level = "debug", skip_all, fields(script = %self.name))]
    pub fn check(&self) -> Result<CheckReport, EvalError> {
        let mut task = Task::new(&self.funcs, None);
        let report = check_stmts(&mut task, &self.stmts).map_err(|err| err.with_script(&self.name))?;
        tracing::debug!(calls = report.call_refs.len(), "check passed");
        Ok(report)
    }
}

pub struct ScriptBuilder {
    script: Script,
}

impl ScriptBuilder {
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.script.namespace = namespace.into();
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.script.category = category.into();
        self
    }

    #[must_use]
    pub fn file_path(mut self, file_path: impl Into<String>) -> Self {
        self.script.file_path = file_path.into();
        self
    }

    pub fn build(self) -> Script {
        self.script
    }
}
