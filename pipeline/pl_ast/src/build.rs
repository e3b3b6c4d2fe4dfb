//! Tree constructors.
//!
//! Hosts that generate scripts programmatically, and tests, build trees
//! with these instead of spelling out every struct. Every node starts at
//! [`Pos::DUMMY`]; use [`Node::at`] to attach a position.
//!
//! ```text
//! // x = [1, 2][0] + 3
//! assign(ident("x"), arith(index("l", vec![int(0)]), ArithOp::Add, int(3)))
//! ```

use crate::node::{
    ArithmeticExpr, AssignmentExpr, AttrExpr, Block, BoolLiteral, BreakStmt, CallExpr,
    ConditionalExpr, ContinueStmt, FloatLiteral, ForInStmt, ForStmt, Identifier, IfElseStmt,
    IfStmtElem, InExpr, IndexExpr, IntegerLiteral, ListLiteral, MapLiteral, NilLiteral, Node,
    ParenExpr, SliceExpr, Stmts, StringLiteral, UnaryExpr,
};
use crate::operators::{ArithOp, AssignOp, CondOp, UnaryOp};
use crate::pos::Pos;

pub fn ident(name: impl Into<String>) -> Node {
    Node::Ident(Identifier {
        name: name.into(),
        start: Pos::DUMMY,
    })
}

pub fn string(val: impl Into<String>) -> Node {
    Node::Str(StringLiteral {
        val: val.into(),
        start: Pos::DUMMY,
    })
}

pub fn int(val: i64) -> Node {
    Node::Int(IntegerLiteral {
        val,
        start: Pos::DUMMY,
    })
}

pub fn float(val: f64) -> Node {
    Node::Float(FloatLiteral {
        val,
        start: Pos::DUMMY,
    })
}

pub fn boolean(val: bool) -> Node {
    Node::Bool(BoolLiteral {
        val,
        start: Pos::DUMMY,
    })
}

pub fn nil() -> Node {
    Node::Nil(NilLiteral { start: Pos::DUMMY })
}

pub fn list(items: Vec<Node>) -> Node {
    Node::List(ListLiteral {
        list: items,
        lbracket: Pos::DUMMY,
        rbracket: Pos::DUMMY,
    })
}

pub fn map(entries: Vec<(Node, Node)>) -> Node {
    Node::Map(MapLiteral {
        entries,
        lbrace: Pos::DUMMY,
        rbrace: Pos::DUMMY,
    })
}

pub fn paren(inner: Node) -> Node {
    Node::Paren(ParenExpr {
        param: Box::new(inner),
        lparen: Pos::DUMMY,
        rparen: Pos::DUMMY,
    })
}

pub fn arith(lhs: Node, op: ArithOp, rhs: Node) -> Node {
    Node::Arith(ArithmeticExpr {
        lhs: Box::new(lhs),
        op,
        rhs: Box::new(rhs),
        op_pos: Pos::DUMMY,
    })
}

pub fn cond(lhs: Node, op: CondOp, rhs: Node) -> Node {
    Node::Cond(ConditionalExpr {
        lhs: Box::new(lhs),
        op,
        rhs: Box::new(rhs),
        op_pos: Pos::DUMMY,
    })
}

pub fn unary(op: UnaryOp, rhs: Node) -> Node {
    Node::Unary(UnaryExpr {
        op,
        rhs: Box::new(rhs),
        op_pos: Pos::DUMMY,
    })
}

/// `lhs = rhs`
pub fn assign(lhs: Node, rhs: Node) -> Node {
    assign_many(vec![lhs], AssignOp::Eq, vec![rhs])
}

/// `lhs op= rhs`
pub fn assign_op(lhs: Node, op: AssignOp, rhs: Node) -> Node {
    assign_many(vec![lhs], op, vec![rhs])
}

/// `l1, l2, ... op r1, r2, ...`
pub fn assign_many(lhs: Vec<Node>, op: AssignOp, rhs: Vec<Node>) -> Node {
    Node::Assign(AssignmentExpr {
        lhs,
        op,
        rhs,
        op_pos: Pos::DUMMY,
    })
}

pub fn call(name: impl Into<String>, args: Vec<Node>) -> Node {
    Node::Call(CallExpr {
        name: name.into(),
        name_pos: Pos::DUMMY,
        args,
        lparen: Pos::DUMMY,
        rparen: Pos::DUMMY,
    })
}

/// Named call argument `name = value`.
pub fn named(name: impl Into<String>, value: Node) -> Node {
    assign(ident(name), value)
}

pub fn slice(obj: Node, start: Option<Node>, end: Option<Node>, step: Option<Node>) -> Node {
    Node::Slice(SliceExpr {
        obj: Box::new(obj),
        start: start.map(Box::new),
        end: end.map(Box::new),
        step: step.map(Box::new),
        lbracket: Pos::DUMMY,
        rbracket: Pos::DUMMY,
    })
}

/// `lhs in rhs`
pub fn in_expr(lhs: Node, rhs: Node) -> Node {
    Node::In(InExpr {
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
        op_pos: Pos::DUMMY,
    })
}

/// `name[k1][k2]...`
pub fn index(name: impl Into<String>, keys: Vec<Node>) -> Node {
    Node::Index(IndexExpr {
        obj: Identifier {
            name: name.into(),
            start: Pos::DUMMY,
        },
        index: keys,
        lbracket: Pos::DUMMY,
    })
}

pub fn attr(obj: Node, attr: Node) -> Node {
    Node::Attr(AttrExpr {
        obj: Box::new(obj),
        attr: Box::new(attr),
        start: Pos::DUMMY,
    })
}

/// `if`/`elif` chain: one `(condition, body)` per branch, plus optional `else`.
pub fn if_else(branches: Vec<(Node, Stmts)>, else_body: Option<Stmts>) -> Node {
    Node::IfElse(IfElseStmt {
        if_list: branches
            .into_iter()
            .map(|(condition, stmts)| IfStmtElem {
                condition,
                block: Block::new(stmts),
                start: Pos::DUMMY,
            })
            .collect(),
        else_block: else_body.map(Block::new),
        else_pos: Pos::DUMMY,
    })
}

pub fn for_loop(init: Option<Node>, cond: Option<Node>, update: Option<Node>, body: Stmts) -> Node {
    Node::For(ForStmt {
        init: init.map(Box::new),
        cond: cond.map(Box::new),
        update: update.map(Box::new),
        body: Block::new(body),
        for_pos: Pos::DUMMY,
    })
}

pub fn for_in(varb: impl Into<String>, iter: Node, body: Stmts) -> Node {
    Node::ForIn(ForInStmt {
        varb: Box::new(ident(varb)),
        iter: Box::new(iter),
        body: Block::new(body),
        for_pos: Pos::DUMMY,
        in_pos: Pos::DUMMY,
    })
}

pub fn brk() -> Node {
    Node::Break(BreakStmt { start: Pos::DUMMY })
}

pub fn cont() -> Node {
    Node::Continue(ContinueStmt { start: Pos::DUMMY })
}
