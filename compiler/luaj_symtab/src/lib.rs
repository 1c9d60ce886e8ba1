//! Scoped symbol table for the luaj compiler.
//!
//! Declarations live in one arena owned by [`SymbolTable`] and are named by
//! [`DeclId`]. Scopes are a second arena; the table keeps a stack of the
//! scopes currently open, mirroring the lexical nesting of the tree being
//! analyzed. Nothing is ever removed: after analysis the table holds every
//! scope and declaration of the compilation unit, and code generation
//! reads it without further mutation.
//!
//! # Nesting levels
//!
//! - level 0: predefined declarations (`number`, `true`, `false`, `print`)
//! - level 1: the chunk, whose variables become static fields
//! - level 2 and deeper: function bodies, whose variables use local slots

mod decl;
mod scope;
mod table;
mod type_desc;
mod xref;

pub use decl::{DeclId, DeclKind, Declaration, Routine};
pub use scope::{Scope, ScopeId};
pub use table::{DuplicateDeclaration, SymbolTable};
pub use type_desc::TypeDesc;
pub use xref::CrossReference;
