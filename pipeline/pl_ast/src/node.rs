//! Script syntax tree.
//!
//! `Node` is a closed sum type: every statement and expression kind the
//! engine understands is a variant, and the evaluator matches on it
//! exhaustively. Trees are produced by a parser or by hosts through
//! [`crate::build`] and are never mutated once handed to the engine.

use crate::operators::{ArithOp, AssignOp, CondOp, UnaryOp};
use crate::pos::Pos;

/// A statement sequence.
pub type Stmts = Vec<Node>;

/// A braced statement block.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    pub stmts: Stmts,
    pub lbrace: Pos,
    pub rbrace: Pos,
}

impl Block {
    pub fn new(stmts: Stmts) -> Self {
        Block {
            stmts,
            ..Block::default()
        }
    }
}

// Expressions

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Identifier {
    pub name: String,
    pub start: Pos,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StringLiteral {
    pub val: String,
    pub start: Pos,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntegerLiteral {
    pub val: i64,
    pub start: Pos,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloatLiteral {
    pub val: f64,
    pub start: Pos,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoolLiteral {
    pub val: bool,
    pub start: Pos,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NilLiteral {
    pub start: Pos,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListLiteral {
    pub list: Vec<Node>,
    pub lbracket: Pos,
    pub rbracket: Pos,
}

/// `{k: v, ...}`; keys are arbitrary expressions that must evaluate to strings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapLiteral {
    pub entries: Vec<(Node, Node)>,
    pub lbrace: Pos,
    pub rbrace: Pos,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParenExpr {
    pub param: Box<Node>,
    pub lparen: Pos,
    pub rparen: Pos,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArithmeticExpr {
    pub lhs: Box<Node>,
    pub op: ArithOp,
    pub rhs: Box<Node>,
    pub op_pos: Pos,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionalExpr {
    pub lhs: Box<Node>,
    pub op: CondOp,
    pub rhs: Box<Node>,
    pub op_pos: Pos,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub rhs: Box<Node>,
    pub op_pos: Pos,
}

/// `a, b = x, y`, `a = f()`, `m["k"] += 1`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignmentExpr {
    pub lhs: Vec<Node>,
    pub op: AssignOp,
    pub rhs: Vec<Node>,
    pub op_pos: Pos,
}

/// Function call. Named arguments are `name = expr` assignment nodes
/// inside `args` (see [`Node::as_named_arg`]).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallExpr {
    pub name: String,
    pub name_pos: Pos,
    pub args: Vec<Node>,
    pub lparen: Pos,
    pub rparen: Pos,
}

/// `obj[start:end:step]` with every bound optional.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SliceExpr {
    pub obj: Box<Node>,
    pub start: Option<Box<Node>>,
    pub end: Option<Box<Node>>,
    pub step: Option<Box<Node>>,
    pub lbracket: Pos,
    pub rbracket: Pos,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InExpr {
    pub lhs: Box<Node>,
    pub rhs: Box<Node>,
    pub op_pos: Pos,
}

/// `name[k1][k2]...`; indexing always starts from a variable.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexExpr {
    pub obj: Identifier,
    pub index: Vec<Node>,
    pub lbracket: Pos,
}

/// `obj.attr`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttrExpr {
    pub obj: Box<Node>,
    pub attr: Box<Node>,
    pub start: Pos,
}

// Statements

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IfStmtElem {
    pub condition: Node,
    pub block: Block,
    pub start: Pos,
}

/// `if c1 { } elif c2 { } else { }`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IfElseStmt {
    pub if_list: Vec<IfStmtElem>,
    pub else_block: Option<Block>,
    pub else_pos: Pos,
}

/// `for init; cond; update { body }`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForStmt {
    pub init: Option<Box<Node>>,
    pub cond: Option<Box<Node>>,
    pub update: Option<Box<Node>>,
    pub body: Block,
    pub for_pos: Pos,
}

/// `for varb in iter { body }`
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForInStmt {
    pub varb: Box<Node>,
    pub iter: Box<Node>,
    pub body: Block,
    pub for_pos: Pos,
    pub in_pos: Pos,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BreakStmt {
    pub start: Pos,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContinueStmt {
    pub start: Pos,
}

/// Any statement or expression.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    // Leaves
    Ident(Identifier),
    Str(StringLiteral),
    Int(IntegerLiteral),
    Float(FloatLiteral),
    Bool(BoolLiteral),
    Nil(NilLiteral),

    // Composite literals
    List(ListLiteral),
    Map(MapLiteral),

    // Expressions
    Paren(ParenExpr),
    Arith(ArithmeticExpr),
    Cond(ConditionalExpr),
    Unary(UnaryExpr),
    Assign(AssignmentExpr),
    Call(CallExpr),
    Slice(SliceExpr),
    In(InExpr),
    Index(IndexExpr),
    Attr(AttrExpr),

    // Statements
    IfElse(IfElseStmt),
    For(ForStmt),
    ForIn(ForInStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
}

impl Node {
    /// Primary source position, the one diagnostics point at.
    pub fn pos(&self) -> Pos {
        match self {
            Node::Ident(n) => n.start,
            Node::Str(n) => n.start,
            Node::Int(n) => n.start,
            Node::Float(n) => n.start,
            Node::Bool(n) => n.start,
            Node::Nil(n) => n.start,
            Node::List(n) => n.lbracket,
            Node::Map(n) => n.lbrace,
            Node::Paren(n) => n.lparen,
            Node::Arith(n) => n.op_pos,
            Node::Cond(n) => n.op_pos,
            Node::Unary(n) => n.op_pos,
            Node::Assign(n) => n.op_pos,
            Node::Call(n) => n.name_pos,
            Node::Slice(n) => n.lbracket,
            Node::In(n) => n.op_pos,
            Node::Index(n) => n.obj.start,
            Node::Attr(n) => n.start,
            Node::IfElse(n) => n.if_list.first().map_or(n.else_pos, |elem| elem.start),
            Node::For(n) => n.for_pos,
            Node::ForIn(n) => n.for_pos,
            Node::Break(n) => n.start,
            Node::Continue(n) => n.start,
        }
    }

    /// Overwrite the primary position (see [`Node::pos`]).
    pub fn set_pos(&mut self, pos: Pos) {
        match self {
            Node::Ident(n) => n.start = pos,
            Node::Str(n) => n.start = pos,
            Node::Int(n) => n.start = pos,
            Node::Float(n) => n.start = pos,
            Node::Bool(n) => n.start = pos,
            Node::Nil(n) => n.start = pos,
            Node::List(n) => n.lbracket = pos,
            Node::Map(n) => n.lbrace = pos,
            Node::Paren(n) => n.lparen = pos,
            Node::Arith(n) => n.op_pos = pos,
            Node::Cond(n) => n.op_pos = pos,
            Node::Unary(n) => n.op_pos = pos,
            Node::Assign(n) => n.op_pos = pos,
            Node::Call(n) => n.name_pos = pos,
            Node::Slice(n) => n.lbracket = pos,
            Node::In(n) => n.op_pos = pos,
            Node::Index(n) => n.obj.start = pos,
            Node::Attr(n) => n.start = pos,
            Node::IfElse(n) => match n.if_list.first_mut() {
                Some(elem) => elem.start = pos,
                None => n.else_pos = pos,
            },
            Node::For(n) => n.for_pos = pos,
            Node::ForIn(n) => n.for_pos = pos,
            Node::Break(n) => n.start = pos,
            Node::Continue(n) => n.start = pos,
        }
    }

    /// Builder-style [`Node::set_pos`].
    #[must_use]
    pub fn at(mut self, line: u32, col: u32) -> Self {
        self.set_pos(Pos::new(line, col));
        self
    }

    /// Human-readable node kind, used in diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Node::Ident(_) => "identifier",
            Node::Str(_) => "string literal",
            Node::Int(_) => "integer literal",
            Node::Float(_) => "float literal",
            Node::Bool(_) => "bool literal",
            Node::Nil(_) => "nil literal",
            Node::List(_) => "list literal",
            Node::Map(_) => "map literal",
            Node::Paren(_) => "paren expression",
            Node::Arith(_) => "arithmetic expression",
            Node::Cond(_) => "conditional expression",
            Node::Unary(_) => "unary expression",
            Node::Assign(_) => "assignment expression",
            Node::Call(_) => "call expression",
            Node::Slice(_) => "slice expression",
            Node::In(_) => "in expression",
            Node::Index(_) => "index expression",
            Node::Attr(_) => "attribute expression",
            Node::IfElse(_) => "if statement",
            Node::For(_) => "for statement",
            Node::ForIn(_) => "for-in statement",
            Node::Break(_) => "break statement",
            Node::Continue(_) => "continue statement",
        }
    }

    /// Statements produce no value and may only appear in statement position.
    pub const fn is_stmt(&self) -> bool {
        matches!(
            self,
            Node::IfElse(_) | Node::For(_) | Node::ForIn(_) | Node::Break(_) | Node::Continue(_)
        )
    }

    /// Split a call argument of the form `name = expr` into its parts.
    ///
    /// Anything else, including compound or multi-target assignments, is a
    /// positional argument.
    pub fn as_named_arg(&self) -> Option<(&Identifier, &Node)> {
        let Node::Assign(assign) = self else {
            return None;
        };
        match (assign.op, assign.lhs.as_slice(), assign.rhs.as_slice()) {
            (AssignOp::Eq, [Node::Ident(name)], [value]) => Some((name, value)),
            _ => None,
        }
    }
}
