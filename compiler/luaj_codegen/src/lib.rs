//! Jasmin code generation for the luaj compiler.
//!
//! Turns an analyzed chunk into the text of one Jasmin class file:
//!
//! ```text
//! SemanticModel + Chunk
//!        ↓
//!   JasminCodegen   (program, statement and expression generators)
//!        ↓
//!   CodegenContext  (labels, operand-stack tracking, output buffer)
//!        ↓
//!     String        (.class, fields, <clinit>, <init>, functions, main)
//! ```
//!
//! Every language value is a JVM `int`: numbers directly, booleans as 0/1.
//! Chunk variables become static fields, function variables and
//! parameters become locals.

mod context;
mod descriptor;
mod error;
pub mod jasmin;
mod literal;
mod opcode;
mod reserved;

pub use context::{CodegenContext, Label, StackTracker};
pub use descriptor::{invoke_stack_effect, method_descriptor};
pub use error::CodegenError;
pub use jasmin::JasminCodegen;
pub use literal::convert_string;
pub use opcode::{Directive, Opcode};
pub use reserved::{is_keyword, storage_name};

use luaj_ir::Chunk;
use luaj_sema::SemanticModel;

/// Generate the Jasmin source for an analyzed chunk.
///
/// The caller must only pass a model whose analysis reported no errors.
#[tracing::instrument(level = "debug", skip_all, fields(class = model.program_name()))]
pub fn generate(model: &SemanticModel, chunk: &Chunk) -> Result<String, CodegenError> {
    JasminCodegen::new(model).generate_program(chunk)
}
