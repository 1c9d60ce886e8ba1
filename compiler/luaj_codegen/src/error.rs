//! Code generation failures.
//!
//! Generation only runs on a tree that passed semantic analysis, so every
//! variant is a broken contract between the phases rather than a problem
//! in the user's program.

use crate::context::Label;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CodegenError {
    #[error("`{name}` on line {line} was never resolved")]
    Unresolved { name: String, line: u32 },

    #[error("`{name}` on line {line} is a {found}, not a {expected}")]
    WrongKind {
        name: String,
        line: u32,
        found: &'static str,
        expected: &'static str,
    },

    #[error("label {0} is bound twice")]
    LabelBoundTwice(Label),

    #[error("numeric literal `{text}` on line {line} does not fit in an int")]
    InvalidNumber { text: String, line: u32 },

    #[error("function `{0}` has no body to generate")]
    MissingBody(String),
}
