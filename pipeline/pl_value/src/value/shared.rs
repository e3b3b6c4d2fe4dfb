//! Shared, mutable container storage for List and Map values.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::fmt;
use std::sync::Arc;

/// Reference-counted handle to a mutable container.
///
/// Cloning the handle aliases the container, the way script variables
/// holding the same list observe each other's index assignments. Handles
/// are `Send + Sync`, so values outlive the run that produced them.
///
/// Guards must not be held across evaluation of script code: the evaluator
/// copies out what it needs and releases the lock before recursing.
#[repr(transparent)]
pub struct Shared<T>(Arc<RwLock<T>>);

impl<T> Shared<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        Shared(Arc::new(RwLock::new(value)))
    }

    /// Shared access. Recursive, so nested reads of a self-containing
    /// container on one thread cannot deadlock.
    #[inline]
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read_recursive()
    }

    #[inline]
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write()
    }

    /// True if both handles alias the same container.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Identity of the container, stable for as long as any handle lives.
    #[inline]
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }
}

impl<T: Clone> Shared<T> {
    /// Copy of the current contents, detached from this handle.
    pub fn snapshot(&self) -> T {
        self.read().clone()
    }
}

impl<T> Clone for Shared<T> {
    #[inline]
    fn clone(&self) -> Self {
        Shared(Arc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.read(), f)
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Shared::new(T::default())
    }
}
