//! RAII scope guard for a task's environment.
//!
//! [`Task::scoped`] pushes a frame and returns a guard that pops it on drop,
//! so every exit from a block (normal completion, `?` on an error, an early
//! `break`) leaves the scope stack balanced. The guard derefs to the task.
//!
//! ```text
//! {
//!     let mut scoped = task.scoped();
//!     scoped.run_stmts(&block.stmts)?;
//! } // frame popped here
//! ```

use std::ops::{Deref, DerefMut};

use super::Task;

pub struct ScopedTask<'guard, 'a> {
    task: &'guard mut Task<'a>,
}

impl Drop for ScopedTask<'_, '_> {
    fn drop(&mut self) {
        self.task.env.pop_scope();
    }
}

impl<'a> Deref for ScopedTask<'_, 'a> {
    type Target = Task<'a>;

    fn deref(&self) -> &Self::Target {
        self.task
    }
}

impl DerefMut for ScopedTask<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.task
    }
}

impl<'a> Task<'a> {
    /// Enter a new block scope, left when the guard drops.
    pub fn scoped(&mut self) -> ScopedTask<'_, 'a> {
        self.env.push_scope();
        ScopedTask { task: self }
    }
}
