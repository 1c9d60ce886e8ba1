//! Statement and expression nodes.
//!
//! The tree is a plain owned structure of sum types. Function bodies are
//! reference counted so the symbol table can hold on to a routine's body
//! for code generation without borrowing from the tree.

use std::fmt;
use std::rc::Rc;

use crate::NodeId;

/// A name occurrence: variable read, assignment target, callee or parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub id: NodeId,
    pub line: u32,
}

/// The whole compilation unit.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    pub block: Block,
}

/// An ordered statement list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Block { stmts }
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stmt> {
        self.stmts.iter()
    }
}

impl<'a> IntoIterator for &'a Block {
    type Item = &'a Stmt;
    type IntoIter = std::slice::Iter<'a, Stmt>;

    fn into_iter(self) -> Self::IntoIter {
        self.stmts.iter()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub line: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    /// `name = expr`
    Assign { target: Ident, value: Expr },
    /// `if c then .. elseif c then .. else .. end`
    If(IfStmt),
    /// `repeat .. until c`
    Repeat { body: Block, until: Expr },
    /// `function name(params) .. end`
    Function(FunctionDef),
    /// `name(args)` used as a statement.
    Call(Call),
    /// `print(args)`
    Print(Vec<Expr>),
    /// `return [expr]`
    Return(Option<Expr>),
}

impl Stmt {
    /// The function definition carried by this statement, if any.
    pub fn as_function(&self) -> Option<&FunctionDef> {
        match &self.kind {
            StmtKind::Function(def) => Some(def),
            _ => None,
        }
    }
}

/// Conditional chain: at least one branch, optional trailing `else`.
#[derive(Clone, Debug, PartialEq)]
pub struct IfStmt {
    pub branches: Vec<CondBranch>,
    pub else_block: Option<Block>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CondBranch {
    pub cond: Expr,
    pub block: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDef {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Rc<Block>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub callee: Ident,
    pub args: Vec<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub line: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    /// Numeric literal, raw lexeme.
    Number(String),
    /// String literal, raw lexeme including its quote characters.
    Str(String),
    Bool(bool),
    Var(Ident),
    Call(Call),
    Paren(Box<Expr>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn new(kind: ExprKind, line: u32) -> Self {
        Expr { kind, line }
    }

    /// True for a string literal, which `print` folds into its format.
    pub fn is_string_literal(&self) -> bool {
        matches!(self.kind, ExprKind::Str(_))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "not ",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
}

impl BinaryOp {
    /// `==`, `~=`, `<`, `<=`, `>`, `>=`.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::Lt
                | BinaryOp::LtEq
                | BinaryOp::Gt
                | BinaryOp::GtEq
        )
    }

    /// `and`, `or`.
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "~=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

/// Source-like rendering, used for comments in the generated assembly.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Number(raw) | ExprKind::Str(raw) => f.write_str(raw),
            ExprKind::Bool(value) => write!(f, "{value}"),
            ExprKind::Var(ident) => f.write_str(&ident.name),
            ExprKind::Call(call) => fmt::Display::fmt(call, f),
            ExprKind::Paren(inner) => write!(f, "({inner})"),
            ExprKind::Unary { op, operand } => write!(f, "{}{operand}", op.as_symbol()),
            ExprKind::Binary { op, left, right } => write!(f, "{left} {op} {right}"),
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.callee.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests;
