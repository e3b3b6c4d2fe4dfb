//! Runtime values.
//!
//! `Value` is a closed enum over the seven script types. Scalars are held
//! inline; strings are immutable `Arc<str>`; lists and maps live behind a
//! [`Shared`] handle so that assignment aliases them (see `shared.rs`).
//!
//! # Construction
//!
//! ```text
//! let s = Value::string("GET");
//! let l = Value::list(vec![Value::Int(1), Value::Int(2)]);
//! let m = Value::map_from([("status", Value::Int(200))]);
//! ```

mod shared;

use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::sync::Arc;

use crate::dtype::DType;

pub use shared::Shared;

/// Map storage: string keys, arbitrary values.
pub type ValueMap = FxHashMap<String, Value>;

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    List(Shared<Vec<Value>>),
    Map(Shared<ValueMap>),
}

// Factory methods

impl Value {
    #[inline]
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    /// New list; never aliases an existing one.
    #[inline]
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Shared::new(items))
    }

    /// New map; never aliases an existing one.
    #[inline]
    pub fn map(entries: ValueMap) -> Self {
        Value::Map(Shared::new(entries))
    }

    /// Map from key/value pairs; later duplicates win.
    pub fn map_from<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// Inspection

impl Value {
    pub const fn dtype(&self) -> DType {
        match self {
            Value::Nil => DType::Nil,
            Value::Bool(_) => DType::Bool,
            Value::Int(_) => DType::Int,
            Value::Float(_) => DType::Float,
            Value::Str(_) => DType::Str,
            Value::List(_) => DType::List,
            Value::Map(_) => DType::Map,
        }
    }

    /// Truthiness used by `if`, `for` conditions and unary `!`.
    ///
    /// Nil, `false`, zero numbers and empty str/list/map are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.read().is_empty(),
            Value::Map(entries) => !entries.read().is_empty(),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Int, Float and Bool (as 0/1) viewed as a float; `None` for the rest.
    #[expect(
        clippy::cast_precision_loss,
        reason = "numeric equality is defined on float64"
    )]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Structural equality, types included: `Int(1)` differs from `Float(1.0)`.
    ///
    /// Containers that refer back to themselves compare equal once the same
    /// pair of containers is met again while comparing.
    pub fn deep_eq(&self, other: &Value) -> bool {
        self.deep_eq_in(other, &mut FxHashSet::default())
    }

    #[expect(clippy::float_cmp, reason = "structural equality compares floats exactly")]
    fn deep_eq_in(&self, other: &Value, visiting: &mut FxHashSet<(usize, usize)>) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                if Shared::ptr_eq(a, b) || !visiting.insert((a.addr(), b.addr())) {
                    return true;
                }
                let (a, b) = (a.read(), b.read());
                a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|(x, y)| x.deep_eq_in(y, visiting))
            }
            (Value::Map(a), Value::Map(b)) => {
                if Shared::ptr_eq(a, b) || !visiting.insert((a.addr(), b.addr())) {
                    return true;
                }
                let (a, b) = (a.read(), b.read());
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, x)| b.get(k).is_some_and(|y| x.deep_eq_in(y, visiting)))
            }
            _ => false,
        }
    }

    /// Whether `self` is the container `target` or reaches it through its
    /// elements. Always false when `target` is a scalar.
    pub fn holds(&self, target: &Value) -> bool {
        match target.container_addr() {
            Some(addr) => self.reaches(addr, &mut FxHashSet::default()),
            None => false,
        }
    }

    fn reaches(&self, addr: usize, seen: &mut FxHashSet<usize>) -> bool {
        let Some(own) = self.container_addr() else {
            return false;
        };
        if own == addr {
            return true;
        }
        if !seen.insert(own) {
            return false;
        }
        match self {
            Value::List(items) => items.read().iter().any(|v| v.reaches(addr, seen)),
            Value::Map(entries) => entries.read().values().any(|v| v.reaches(addr, seen)),
            _ => false,
        }
    }

    fn container_addr(&self) -> Option<usize> {
        match self {
            Value::List(items) => Some(items.addr()),
            Value::Map(entries) => Some(entries.addr()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.deep_eq(other)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Style {
    Debug,
    Literal,
}

/// Writes `value` in `style`. `open` holds the containers currently being
/// written; meeting one of them again prints `[...]` or `{...}`.
fn render(
    value: &Value,
    f: &mut fmt::Formatter<'_>,
    style: Style,
    open: &mut Vec<usize>,
) -> fmt::Result {
    let debug = style == Style::Debug;
    match value {
        Value::Nil if debug => f.write_str("Nil"),
        Value::Nil => f.write_str("nil"),
        Value::Bool(b) if debug => write!(f, "Bool({b})"),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Int(n) if debug => write!(f, "Int({n})"),
        Value::Int(n) => write!(f, "{n}"),
        Value::Float(n) if debug => write!(f, "Float({n:?})"),
        Value::Float(n) => write!(f, "{n:?}"),
        Value::Str(s) if debug => write!(f, "Str({:?})", &**s),
        Value::Str(s) => write!(f, "{:?}", &**s),
        Value::List(items) => {
            let addr = items.addr();
            if open.contains(&addr) {
                return f.write_str("[...]");
            }
            open.push(addr);
            f.write_str(if debug { "List([" } else { "[" })?;
            for (i, item) in items.read().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                render(item, f, style, open)?;
            }
            f.write_str(if debug { "])" } else { "]" })?;
            open.pop();
            Ok(())
        }
        Value::Map(entries) => {
            let addr = entries.addr();
            if open.contains(&addr) {
                return f.write_str("{...}");
            }
            open.push(addr);
            let entries = entries.read();
            let mut keys: Vec<&String> = entries.keys().collect();
            keys.sort();
            f.write_str("{")?;
            for (i, k) in keys.into_iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{k:?}: ")?;
                render(&entries[k], f, style, open)?;
            }
            f.write_str("}")?;
            open.pop();
            Ok(())
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(self, f, Style::Debug, &mut Vec::new())
    }
}

/// Script-literal rendering: strings quoted, map keys sorted.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(self, f, Style::Literal, &mut Vec::new())
    }
}
