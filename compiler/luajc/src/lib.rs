//! Driver for the luaj compiler.
//!
//! Runs the phases in order and gates each on the error count of the one
//! before: parse, then analyze, then generate. The binary in `main.rs` is a
//! thin shell over [`run`]; everything it prints goes through the writers
//! passed in, so the whole process contract can be exercised from tests.

mod error;
mod options;
mod session;
mod tracing_setup;

pub use error::DriverError;
pub use options::{parse_compile_args, CompileOptions};
pub use session::{compile_source, explain, run, CompileResult};
pub use tracing_setup::init_tracing;
