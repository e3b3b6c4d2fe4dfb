//! Source positions.
//!
//! Scripts are diagnosed by line and column rather than byte offsets, so a
//! position is a `(line, column)` pair. Both are 1-based; `Pos::default()`
//! (0:0) marks a node synthesized by a host rather than parsed from text.

use std::fmt;

/// Line/column location of a node in its script.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pos {
    pub line: u32,
    pub col: u32,
}

impl Pos {
    /// Position of nodes built without source text.
    pub const DUMMY: Pos = Pos { line: 0, col: 0 };

    #[inline]
    pub const fn new(line: u32, col: u32) -> Self {
        Pos { line, col }
    }

    /// True for positions that were never attached to source text.
    #[inline]
    pub const fn is_dummy(self) -> bool {
        self.line == 0 && self.col == 0
    }
}

impl fmt::Debug for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_line_colon_col() {
        assert_eq!(Pos::new(3, 14).to_string(), "3:14");
        assert_eq!(format!("{:?}", Pos::new(1, 1)), "1:1");
    }

    #[test]
    fn test_dummy() {
        assert!(Pos::default().is_dummy());
        assert!(Pos::DUMMY.is_dummy());
        assert!(!Pos::new(1, 0).is_dummy());
    }

    #[test]
    fn test_ordering_is_line_major() {
        assert!(Pos::new(1, 40) < Pos::new(2, 1));
        assert!(Pos::new(2, 1) < Pos::new(2, 2));
    }
}
