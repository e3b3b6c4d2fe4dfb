//! Dynamic type tags.

use bitflags::bitflags;
use std::fmt;

/// Runtime type of a value.
///
/// `Invalid` is never carried by a [`crate::Value`]; it names the absence
/// of one, e.g. the result of a call that returned nothing.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DType {
    Nil,
    Bool,
    Int,
    Float,
    Str,
    List,
    Map,
    Invalid,
}

impl DType {
    /// Name used in diagnostics and in function signatures.
    pub const fn as_str(self) -> &'static str {
        match self {
            DType::Nil => "nil",
            DType::Bool => "bool",
            DType::Int => "int",
            DType::Float => "float",
            DType::Str => "str",
            DType::List => "list",
            DType::Map => "map",
            DType::Invalid => "invalid",
        }
    }

    /// Valid operand of `+ - * / %`.
    #[inline]
    pub const fn is_arith(self) -> bool {
        matches!(self, DType::Int | DType::Float | DType::Bool | DType::Str)
    }

    /// Valid operand of `< <= > >=` and of the logical operators.
    #[inline]
    pub const fn is_ordered(self) -> bool {
        matches!(self, DType::Int | DType::Float | DType::Bool)
    }

    /// Result type of mixing two numeric operands: float wins.
    #[inline]
    pub const fn promote(l: DType, r: DType) -> DType {
        if matches!(l, DType::Float) || matches!(r, DType::Float) {
            DType::Float
        } else {
            DType::Int
        }
    }

    pub const fn flag(self) -> DTypes {
        match self {
            DType::Nil => DTypes::NIL,
            DType::Bool => DTypes::BOOL,
            DType::Int => DTypes::INT,
            DType::Float => DTypes::FLOAT,
            DType::Str => DTypes::STR,
            DType::List => DTypes::LIST,
            DType::Map => DTypes::MAP,
            DType::Invalid => DTypes::empty(),
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Set of types a function parameter accepts.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct DTypes: u8 {
        const NIL   = 1 << 0;
        const BOOL  = 1 << 1;
        const INT   = 1 << 2;
        const FLOAT = 1 << 3;
        const STR   = 1 << 4;
        const LIST  = 1 << 5;
        const MAP   = 1 << 6;

        const NUMBER = Self::INT.bits() | Self::FLOAT.bits();
        const ANY = Self::NIL.bits()
            | Self::BOOL.bits()
            | Self::INT.bits()
            | Self::FLOAT.bits()
            | Self::STR.bits()
            | Self::LIST.bits()
            | Self::MAP.bits();
    }
}

impl DTypes {
    #[inline]
    pub fn accepts(self, ty: DType) -> bool {
        let flag = ty.flag();
        !flag.is_empty() && self.contains(flag)
    }
}

impl From<DType> for DTypes {
    fn from(ty: DType) -> Self {
        ty.flag()
    }
}

impl fmt::Display for DTypes {
    /// `int|float`, or `any` for the full set.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == DTypes::ANY {
            return f.write_str("any");
        }
        let all = [
            DType::Nil,
            DType::Bool,
            DType::Int,
            DType::Float,
            DType::Str,
            DType::List,
            DType::Map,
        ];
        let mut first = true;
        for ty in all.into_iter().filter(|ty| self.contains(ty.flag())) {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(ty.as_str())?;
            first = false;
        }
        if first {
            f.write_str("none")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promotion() {
        assert_eq!(DType::promote(DType::Int, DType::Int), DType::Int);
        assert_eq!(DType::promote(DType::Int, DType::Float), DType::Float);
        assert_eq!(DType::promote(DType::Float, DType::Bool), DType::Float);
        assert_eq!(DType::promote(DType::Bool, DType::Bool), DType::Int);
    }

    #[test]
    fn test_operand_classes() {
        assert!(DType::Str.is_arith());
        assert!(!DType::List.is_arith());
        assert!(!DType::Nil.is_arith());
        assert!(DType::Bool.is_ordered());
        assert!(!DType::Str.is_ordered());
    }

    #[test]
    fn test_accepts() {
        assert!(DTypes::NUMBER.accepts(DType::Int));
        assert!(DTypes::NUMBER.accepts(DType::Float));
        assert!(!DTypes::NUMBER.accepts(DType::Str));
        assert!(DTypes::ANY.accepts(DType::Nil));
        assert!(!DTypes::ANY.accepts(DType::Invalid));
    }

    #[test]
    fn test_display() {
        assert_eq!(DTypes::ANY.to_string(), "any");
        assert_eq!(DTypes::NUMBER.to_string(), "int|float");
        assert_eq!((DTypes::STR | DTypes::LIST).to_string(), "str|list");
        assert_eq!(DTypes::empty().to_string(), "none");
        assert_eq!(DType::Map.to_string(), "map");
    }
}
