//! Failures of the driver itself, as opposed to errors in the program
//! being compiled.

use std::io;
use std::path::PathBuf;

use luaj_codegen::CodegenError;
use luaj_diagnostic::{Diagnostic, ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("{0}")]
    Usage(String),

    #[error("cannot read `{}`: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("cannot write `{}`: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("cannot derive a class name from `{}`", .0.display())]
    NoClassName(PathBuf),

    #[error("`{0}` is not a valid class name; use letters, digits and `_`, not starting with a digit")]
    InvalidClassName(String),

    #[error("unknown error code `{0}`")]
    UnknownCode(String),

    #[error("no documentation available for {0}")]
    Undocumented(ErrorCode),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error(transparent)]
    Output(#[from] io::Error),
}

impl DriverError {
    /// Code generation failures are compiler bugs and render as `E9001`.
    pub fn to_diagnostic(&self) -> Option<Diagnostic> {
        match self {
            DriverError::Codegen(err) => Some(
                Diagnostic::error(ErrorCode::E9001)
                    .with_message(format!("internal compiler error: {err}"))
                    .with_note("the input passed every check; this is a bug in luaj"),
            ),
            _ => None,
        }
    }
}
