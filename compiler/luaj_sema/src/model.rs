//! The analyzed program handed to code generation.

use luaj_ir::{Expr, ExprKind, Ident, UnaryOp};
use luaj_symtab::{CrossReference, DeclId, SymbolTable, TypeDesc};

use crate::Resolutions;

/// Symbol table plus resolutions for one compilation unit.
#[derive(Clone, Debug)]
pub struct SemanticModel {
    pub symtab: SymbolTable,
    pub resolutions: Resolutions,
    /// The chunk declaration.
    pub program: DeclId,
}

impl SemanticModel {
    /// Name of the compilation unit, which is also the class name.
    pub fn program_name(&self) -> &str {
        &self.symtab.decl(self.program).name
    }

    /// Declaration an identifier occurrence resolved to.
    pub fn resolve(&self, ident: &Ident) -> Option<DeclId> {
        self.resolutions.get(ident.id)
    }

    /// Static type of an expression.
    ///
    /// Comparisons and logical operators yield booleans, string literals
    /// yield strings, and everything else is a number.
    pub fn expr_type(&self, expr: &Expr) -> TypeDesc {
        match &expr.kind {
            ExprKind::Str(_) => TypeDesc::String,
            ExprKind::Bool(_)
            | ExprKind::Unary {
                op: UnaryOp::Not, ..
            } => TypeDesc::Boolean,
            ExprKind::Binary { op, .. } if op.is_comparison() || op.is_logical() => {
                TypeDesc::Boolean
            }
            ExprKind::Paren(inner) => self.expr_type(inner),
            ExprKind::Var(ident) => self
                .resolve(ident)
                .map(|id| self.symtab.decl(id))
                .filter(|decl| !decl.kind.is_routine())
                .and_then(|decl| decl.ty)
                .unwrap_or(TypeDesc::Number),
            ExprKind::Number(_)
            | ExprKind::Call(_)
            | ExprKind::Unary { .. }
            | ExprKind::Binary { .. } => TypeDesc::Number,
        }
    }

    /// Cross-reference listing of the whole unit.
    pub fn cross_reference(&self) -> CrossReference<'_> {
        CrossReference::new(&self.symtab)
    }
}
