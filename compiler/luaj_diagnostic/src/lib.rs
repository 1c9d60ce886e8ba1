//! Diagnostic system for the luaj compiler.
//!
//! Every phase reports user-facing problems as [`Diagnostic`] values:
//! - an error code for searchability (`luaj explain E2001`)
//! - a message saying what went wrong
//! - the source line where it went wrong
//! - optional notes with context
//!
//! Phases push diagnostics into a [`DiagnosticQueue`] and keep going. The
//! driver reads the queue's error count to decide whether the next phase
//! may run; a phase never aborts on the first user error.

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod errors;
mod queue;

pub use diagnostic::{
    argument_count_mismatch, assign_to_function, expected_expression, expected_identifier,
    invalid_character, invalid_number, redeclared_identifier, string_value, undeclared_function,
    unexpected_token, unterminated_string, Diagnostic,
};
pub use error_code::ErrorCode;
pub use errors::ErrorDocs;
pub use queue::DiagnosticQueue;
