//! Execution context of one script run.
//!
//! A `Task` owns everything that changes while a script runs: the scope
//! stack, the loop-control flags and the sticky exit flag. It borrows what
//! stays fixed: the function table and the host's cancellation signal.
//! Tasks are cheap and never shared; concurrent runs of one script each get
//! their own.

mod scope_guard;

use rustc_hash::FxHashMap;
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pl_value::Value;

use crate::environment::Environment;
use crate::func::FnTable;

pub use scope_guard::ScopedTask;

/// Host-supplied context value, readable by function implementations.
pub type PrivateValue = Arc<dyn Any + Send + Sync>;

/// Cooperative cancellation, polled between statements and loop iterations.
pub trait Signal: Send + Sync {
    /// True once the run should stop.
    fn exit_signal(&self) -> bool;
}

impl Signal for AtomicBool {
    fn exit_signal(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

pub struct Task<'a> {
    pub(crate) env: Environment,
    pub(crate) funcs: &'a FnTable,
    signal: Option<&'a dyn Signal>,
    private: FxHashMap<String, PrivateValue>,
    pub(crate) loop_break: bool,
    pub(crate) loop_continue: bool,
    proc_exit: bool,
}

impl<'a> Task<'a> {
    pub fn new(funcs: &'a FnTable, signal: Option<&'a dyn Signal>) -> Self {
        Task {
            env: Environment::new(),
            funcs,
            signal,
            private: FxHashMap::default(),
            loop_break: false,
            loop_continue: false,
            proc_exit: false,
        }
    }

    /// A fresh task for another script that inherits this task's signal
    /// and private values.
    pub(crate) fn child<'b>(&self, funcs: &'b FnTable) -> Task<'b>
    where
        'a: 'b,
    {
        let mut task = Task::new(funcs, self.signal);
        task.private.clone_from(&self.private);
        task
    }

    pub fn functions(&self) -> &'a FnTable {
        self.funcs
    }

    pub fn signal(&self) -> Option<&'a dyn Signal> {
        self.signal
    }

    // Variables

    /// Innermost binding of `name`.
    pub fn get_var(&self, name: &str) -> Option<Value> {
        self.env.lookup(name)
    }

    /// Bind `name` in the innermost frame.
    pub fn set_var(&mut self, name: &str, value: Value) {
        self.env.define(name, value);
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    // Private context

    /// Store a context value. An existing key is kept unless `replace` is
    /// set; returns whether `val` was stored.
    pub fn with_val(&mut self, key: impl Into<String>, val: PrivateValue, replace: bool) -> bool {
        let key = key.into();
        if !replace && self.private.contains_key(&key) {
            return false;
        }
        self.private.insert(key, val);
        true
    }

    /// Context value under `key`, if present and of type `T`.
    pub fn private<T: Any>(&self, key: &str) -> Option<&T> {
        self.private.get(key)?.downcast_ref::<T>()
    }

    // Control state

    /// Latch the exit flag: the run unwinds without error after the
    /// current statement.
    pub fn set_exit(&mut self) {
        self.proc_exit = true;
    }

    pub fn exited(&self) -> bool {
        self.proc_exit
    }

    /// Whether the rest of the current block must be skipped. Polls the
    /// signal and latches the exit flag when it fires.
    pub(crate) fn should_unwind(&mut self) -> bool {
        if !self.proc_exit && self.signal.is_some_and(|signal| signal.exit_signal()) {
            tracing::debug!("exit signal observed");
            self.proc_exit = true;
        }
        self.proc_exit || self.loop_break || self.loop_continue
    }
}

#[cfg(test)]
mod tests;
