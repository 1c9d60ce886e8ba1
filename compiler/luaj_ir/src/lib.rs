//! Parse tree for the luaj compiler.
//!
//! The front end (`luaj_lexer` + `luaj_parse`) builds a [`Chunk`]; the
//! semantic analyzer and the code generator walk it read-only.
//!
//! # Node identity
//!
//! Every identifier occurrence carries a [`NodeId`] that is unique within
//! one tree. Later phases attach information to occurrences through side
//! tables keyed by `NodeId` instead of mutating the tree.
//!
//! # Source lines
//!
//! Statements, expressions and identifiers record the 1-based source line
//! where they start. Lines are the only location information the later
//! phases need: diagnostics and the cross-reference listing are line based.

mod ast;
mod node_id;
mod stack;

pub use ast::{
    BinaryOp, Block, Call, Chunk, CondBranch, Expr, ExprKind, FunctionDef, Ident, IfStmt, Stmt,
    StmtKind, UnaryOp,
};
pub use node_id::{NodeId, NodeIdGen};
pub use stack::ensure_sufficient_stack;
