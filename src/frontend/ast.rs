//! Abstract Syntax Tree definitions for Cool
//!
//! The parser produces this tree with every `ty` slot empty; the type
//! checking pass fills them in place. Names are interned [`Symbol`]s.

use crate::frontend::intern::Symbol;
use crate::utils::Span;
use std::fmt;

/// A complete program (one whole-program class list)
#[derive(Debug, Clone)]
pub struct Program {
    pub classes: Vec<Class>,
    pub span: Span,
}

/// Class declaration
#[derive(Debug, Clone)]
pub struct Class {
    pub name: Symbol,
    /// Absent means the class inherits Object
    pub parent: Option<Symbol>,
    /// Source file the class was declared in
    pub filename: Symbol,
    pub features: Vec<Feature>,
    pub span: Span,
}

/// A class feature: attribute or method
#[derive(Debug, Clone)]
pub enum Feature {
    Attribute(Attribute),
    Method(Method),
}

impl Feature {
    pub fn name(&self) -> Symbol {
        match self {
            Feature::Attribute(a) => a.name,
            Feature::Method(m) => m.name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Feature::Attribute(a) => a.span,
            Feature::Method(m) => m.span,
        }
    }
}

/// Attribute declaration: `name : Type [<- init]`
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: Symbol,
    pub declared_type: Symbol,
    pub init: Option<Expr>,
    pub span: Span,
}

/// Method declaration: `name(formals) : Type { body }`
#[derive(Debug, Clone)]
pub struct Method {
    pub name: Symbol,
    pub formals: Vec<Formal>,
    pub return_type: Symbol,
    pub body: Expr,
    pub span: Span,
}

/// Formal parameter: `name : Type`
#[derive(Debug, Clone)]
pub struct Formal {
    pub name: Symbol,
    pub declared_type: Symbol,
    pub span: Span,
}

/// One branch of a `case`: `name : Type => body`
#[derive(Debug, Clone)]
pub struct CaseBranch {
    pub name: Symbol,
    pub declared_type: Symbol,
    pub body: Expr,
    pub span: Span,
}

/// An expression node
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    /// Static type, filled by the type checking pass
    pub ty: Option<Symbol>,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span, ty: None }
    }
}

/// Expression kinds
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Integer constant, interned source text
    IntConst(Symbol),
    /// String constant
    StrConst(Symbol),
    /// true / false
    BoolConst(bool),
    /// Identifier reference
    Ident(Symbol),
    /// target <- value
    Assign {
        target: Symbol,
        value: Box<Expr>,
    },
    /// receiver.method(args); a bare call gets an explicit self receiver
    Dispatch {
        receiver: Box<Expr>,
        method: Symbol,
        args: Vec<Expr>,
    },
    /// receiver@Class.method(args)
    StaticDispatch {
        receiver: Box<Expr>,
        class: Symbol,
        method: Symbol,
        args: Vec<Expr>,
    },
    /// if cond then .. else .. fi
    If {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    /// while cond loop body pool
    While {
        cond: Box<Expr>,
        body: Box<Expr>,
    },
    /// { e1; ...; en; }
    Block(Vec<Expr>),
    /// let name : Type [<- init] in body; multi-binding lets arrive nested
    Let {
        name: Symbol,
        declared_type: Symbol,
        init: Option<Box<Expr>>,
        body: Box<Expr>,
    },
    /// case scrutinee of branches esac
    Case {
        scrutinee: Box<Expr>,
        branches: Vec<CaseBranch>,
    },
    /// new T
    New(Symbol),
    /// isvoid e
    IsVoid(Box<Expr>),
    /// Arithmetic or comparison
    BinOp {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// ~e (integer complement)
    Neg(Box<Expr>),
    /// not e (boolean complement)
    Not(Box<Expr>),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Le,
    Eq,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Eq => "=",
        };
        f.write_str(s)
    }
}
