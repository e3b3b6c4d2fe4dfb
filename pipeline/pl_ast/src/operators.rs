//! Operators appearing in script expressions.
//!
//! Arithmetic, conditional (comparison and logical), unary and assignment
//! operators are separate enums; each belongs to exactly one node kind.

use std::fmt;

/// Arithmetic operators (`ArithmeticExpr`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl ArithOp {
    /// Source-level symbol, used in error messages.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
        }
    }
}

/// Comparison and logical operators (`ConditionalExpr`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CondOp {
    // Equality
    Eq,
    NotEq,

    // Ordering
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,
}

impl CondOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }

    /// True for `&&` and `||`.
    #[inline]
    pub const fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `+x`
    Pos,
    /// `!x`
    Not,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Pos => "+",
            Self::Not => "!",
        }
    }
}

/// Assignment operators: plain `=` and the compound forms.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssignOp {
    Eq,
    AddEq,
    SubEq,
    MulEq,
    DivEq,
    ModEq,
}

impl AssignOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::AddEq => "+=",
            Self::SubEq => "-=",
            Self::MulEq => "*=",
            Self::DivEq => "/=",
            Self::ModEq => "%=",
        }
    }

    /// The arithmetic operator a compound assignment applies, or `None` for `=`.
    pub const fn arith(self) -> Option<ArithOp> {
        match self {
            Self::Eq => None,
            Self::AddEq => Some(ArithOp::Add),
            Self::SubEq => Some(ArithOp::Sub),
            Self::MulEq => Some(ArithOp::Mul),
            Self::DivEq => Some(ArithOp::Div),
            Self::ModEq => Some(ArithOp::Mod),
        }
    }
}

macro_rules! impl_symbol_display {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_symbol())
                }
            }
        )*
    };
}

impl_symbol_display!(ArithOp, CondOp, UnaryOp, AssignOp);
