//! Semantic analysis for the luaj compiler.
//!
//! One depth-first walk over the parse tree that:
//! - builds the scope tree in a [`SymbolTable`], one scope per routine body
//! - resolves every identifier occurrence to a declaration
//! - declares variables implicitly on first use
//! - registers functions, parameters, result slots and subroutines
//!
//! Errors go to the caller's [`DiagnosticQueue`](luaj_diagnostic::DiagnosticQueue)
//! and never stop the walk. Code generation may only run on a model whose
//! analysis reported no errors.

mod analyzer;
mod model;
mod resolutions;

pub use analyzer::analyze;
pub use model::SemanticModel;
pub use resolutions::Resolutions;
