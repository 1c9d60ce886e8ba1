//! Jasmin backend.
//!
//! One [`JasminCodegen`] produces one class. The work is split the way the
//! output is: `program` lays out the class and its methods, `stmt` and
//! `expr` generate method bodies.

mod expr;
mod program;
mod stmt;

use std::borrow::Cow;

use luaj_ir::Ident;
use luaj_sema::SemanticModel;
use luaj_symtab::{DeclId, DeclKind, TypeDesc};

use crate::context::{CodegenContext, Label};
use crate::descriptor::method_descriptor;
use crate::reserved::storage_name;
use crate::CodegenError;

/// Generator for one class.
pub struct JasminCodegen<'m> {
    model: &'m SemanticModel,
    ctx: CodegenContext,
}

/// State of the method whose body is being generated.
struct Frame {
    /// Target of `return`, bound right before the method's return sequence.
    exit: Label,
    /// Where `return exp` leaves its value.
    result_slot: Option<u32>,
}

impl<'m> JasminCodegen<'m> {
    pub fn new(model: &'m SemanticModel) -> Self {
        Self {
            model,
            ctx: CodegenContext::new(),
        }
    }

    fn class_name(&self) -> &'m str {
        self.model.program_name()
    }

    fn resolve(&self, ident: &Ident) -> Result<DeclId, CodegenError> {
        self.model.resolve(ident).ok_or_else(|| CodegenError::Unresolved {
            name: ident.name.clone(),
            line: ident.line,
        })
    }

    /// Method name of a function: its owner chain joined with `$`.
    ///
    /// Top-level functions keep their own name; `g` defined inside `f`
    /// becomes `f$g`.
    fn method_name(&self, id: DeclId) -> String {
        let symtab = &self.model.symtab;
        let mut parts = vec![symtab.decl(id).name.as_str()];
        let mut scope = symtab.decl(id).scope;
        while let Some(owner) = symtab.scope(scope).owner() {
            let decl = symtab.decl(owner);
            if !decl.kind.is_function() {
                break;
            }
            parts.push(&decl.name);
            scope = decl.scope;
        }
        parts.reverse();
        parts.join("$")
    }

    /// Method reference for `invokestatic`, such as `Test/f(II)I`.
    fn method_reference(&self, id: DeclId) -> String {
        format!(
            "{}/{}{}",
            self.class_name(),
            self.method_name(id),
            self.signature(id)
        )
    }

    fn signature(&self, id: DeclId) -> String {
        let symtab = &self.model.symtab;
        let Some(routine) = symtab.routine(id) else {
            return method_descriptor([], TypeDesc::Nil);
        };
        let params = routine
            .params
            .iter()
            .map(|param| symtab.decl(*param).ty.unwrap_or(TypeDesc::Number));
        let ret = if routine.returns_value() {
            TypeDesc::Number
        } else {
            TypeDesc::Nil
        };
        method_descriptor(params, ret)
    }

    /// Name of a variable's field or local in the generated class.
    fn storage_name(&self, id: DeclId) -> Cow<'m, str> {
        storage_name(&self.model.symtab.decl(id).name)
    }

    /// Reference to a chunk variable's static field.
    fn field_reference(&self, id: DeclId) -> String {
        format!("{}/{}", self.class_name(), self.storage_name(id))
    }

    fn field_descriptor(&self, id: DeclId) -> &'static str {
        self.model
            .symtab
            .decl(id)
            .ty
            .unwrap_or(TypeDesc::Number)
            .descriptor()
    }

    fn wrong_kind(&self, ident: &Ident, id: DeclId, expected: &'static str) -> CodegenError {
        CodegenError::WrongKind {
            name: ident.name.clone(),
            line: ident.line,
            found: self.model.symtab.decl(id).kind.name(),
            expected,
        }
    }

    fn kind(&self, id: DeclId) -> &'m DeclKind {
        &self.model.symtab.decl(id).kind
    }
}
