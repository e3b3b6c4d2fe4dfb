//! Variable scopes for a running script.
//!
//! Frames live in a vector: index 0 is the global frame, the last entry is
//! the innermost block. Reads search from innermost to outermost; writes
//! always land in the innermost frame, so an inner block never mutates an
//! outer binding, it shadows it.

use rustc_hash::FxHashMap;

use pl_value::Value;

/// Bindings introduced in one block.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    bindings: FxHashMap<String, Value>,
}

impl Scope {
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Stack of scopes owned by one task.
#[derive(Debug)]
pub struct Environment {
    frames: Vec<Scope>,
}

impl Environment {
    /// An environment holding just the global frame.
    pub fn new() -> Self {
        Environment {
            frames: vec![Scope::default()],
        }
    }

    /// Number of live frames, global included.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn push_scope(&mut self) {
        self.frames.push(Scope::default());
    }

    /// Drop the innermost frame. The global frame is never popped.
    #[inline]
    pub fn pop_scope(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Remove every binding in the innermost frame, keeping the frame.
    pub fn clear_current(&mut self) {
        self.current_mut().bindings.clear();
    }

    /// Bind `name` in the innermost frame, replacing any binding there.
    #[inline]
    pub fn define(&mut self, name: &str, value: Value) {
        let bindings = &mut self.current_mut().bindings;
        match bindings.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                bindings.insert(name.to_string(), value);
            }
        }
    }

    /// Innermost binding of `name`.
    #[inline]
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.frames
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .cloned()
    }

    /// The global frame; after a run it holds the script's top-level variables.
    pub fn globals(&self) -> &Scope {
        &self.frames[0]
    }

    fn current_mut(&mut self) -> &mut Scope {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
