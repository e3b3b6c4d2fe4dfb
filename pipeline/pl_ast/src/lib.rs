//! Syntax tree for pipeline scripts.
//!
//! This crate is the contract between whatever produces a script (the
//! parser, or a host assembling one by hand) and the engine in `pl_eval`.
//! The engine only reads these trees; it never rewrites them, so a parsed
//! script can be shared by any number of concurrent runs.
//!
//! # Layout
//!
//! - [`Pos`]: line/column source positions carried by every node
//! - [`Node`]: closed enum over all statement and expression kinds
//! - operator enums: [`ArithOp`], [`CondOp`], [`UnaryOp`], [`AssignOp`]
//! - [`build`]: constructors for assembling trees in code

pub mod build;
mod node;
mod operators;
mod pos;

pub use node::{
    ArithmeticExpr, AssignmentExpr, AttrExpr, Block, BoolLiteral, BreakStmt, CallExpr,
    ConditionalExpr, ContinueStmt, FloatLiteral, ForInStmt, ForStmt, Identifier, IfElseStmt,
    IfStmtElem, InExpr, IndexExpr, IntegerLiteral, ListLiteral, MapLiteral, NilLiteral, Node,
    ParenExpr, SliceExpr, Stmts, StringLiteral, UnaryExpr,
};
pub use operators::{ArithOp, AssignOp, CondOp, UnaryOp};
pub use pos::Pos;
