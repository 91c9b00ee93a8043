//! Expression node definitions for the AST.
//!
//! Every expression is an [`Expr`]: a closed [`ExprKind`] variant plus a
//! source position and a resolved-type slot. The slot starts unset and is
//! written exactly once by the semantic analyzer; the parser never fills
//! it in.

use std::fmt::Display;

use crate::{ast::types::Type, Position};

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `=`, defined on operands of the same type
    Eq,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `and`
    And,
}

impl Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Eq => "=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::And => "and",
        };
        write!(f, "{}", op)
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    /// Arithmetic negation
    Neg,
    /// Boolean negation
    Not,
    /// Null test on object values
    IsNull,
}

impl Display for UnOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            UnOp::Neg => "-",
            UnOp::Not => "not",
            UnOp::IsNull => "isnull",
        };
        write!(f, "{}", op)
    }
}

/// Expression Node
///
/// Represents one expression in the AST, together with its source
/// position and the static type the analyzer resolves for it.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    /// Resolved static type; `None` until the analyzer has run.
    pub ty: Option<Type>,
    pub position: Position,
}

impl Expr {
    pub fn new(kind: ExprKind, position: Position) -> Self {
        Expr {
            kind,
            ty: None,
            position,
        }
    }

    /// Writes the resolved type. Each node is typed exactly once per
    /// analysis run.
    pub fn set_type(&mut self, ty: Type) {
        debug_assert!(self.ty.is_none(), "expression typed twice");
        self.ty = Some(ty);
    }

    pub fn ty(&self) -> Option<&Type> {
        self.ty.as_ref()
    }
}

/// The closed set of expression kinds.
///
/// Dispatch over expressions is exhaustive pattern matching; adding a
/// kind here forces every consumer to handle it.
#[derive(Debug, Clone)]
pub enum ExprKind {
    IntegerLiteral(i64),
    StringLiteral(String),
    BooleanLiteral(bool),
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    UnaryOp {
        op: UnOp,
        operand: Box<Expr>,
    },
    /// `if <cond> then <then_expr> [else <else_expr>]`
    Conditional {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Option<Box<Expr>>,
    },
    /// `while <cond> do <body>`; always of type unit
    While {
        cond: Box<Expr>,
        body: Box<Expr>,
    },
    /// `{ e1; e2; ... }`; typed as its last expression, or unit if empty
    Block(Vec<Expr>),
    /// `let <name> : <ty> [<- <init>] in <body>`
    Let {
        name: String,
        declared_ty: Type,
        init: Option<Box<Expr>>,
        body: Box<Expr>,
    },
    /// `<name> <- <value>`
    Assign {
        name: String,
        value: Box<Expr>,
    },
    /// `<receiver>.<method>(<args>)`
    Call {
        receiver: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },
    Identifier(String),
    SelfRef,
    /// `new <class>`
    New(String),
    /// `()`, the unit literal
    Unit,
}
