//! Expression generation.
//!
//! Every expression leaves exactly one `int` on the operand stack.
//! Any nonzero value is true. `not`, `and`, `or` and the comparisons
//! always leave 0 or 1.

use luaj_ir::{ensure_sufficient_stack, BinaryOp, Call, Expr, ExprKind, Ident, UnaryOp};
use luaj_lexer::integer_value;
use luaj_symtab::{DeclId, DeclKind};

use super::JasminCodegen;
use crate::literal::convert_string;
use crate::opcode::Opcode;
use crate::CodegenError;

impl JasminCodegen<'_> {
    pub(super) fn gen_expr(&mut self, expr: &Expr) -> Result<(), CodegenError> {
        ensure_sufficient_stack(|| match &expr.kind {
            ExprKind::Number(text) => {
                let value = integer_value(text).ok_or_else(|| CodegenError::InvalidNumber {
                    text: text.clone(),
                    line: expr.line,
                })?;
                self.ctx.load_constant(value);
                Ok(())
            }
            ExprKind::Str(lexeme) => {
                self.ctx.emit_with(Opcode::Ldc, convert_string(lexeme, true));
                Ok(())
            }
            ExprKind::Bool(value) => {
                self.ctx.load_constant(i32::from(*value));
                Ok(())
            }
            ExprKind::Var(ident) => self.load_variable(ident),
            ExprKind::Call(call) => {
                if !self.gen_call(call)? {
                    self.ctx.load_constant(0);
                }
                Ok(())
            }
            ExprKind::Paren(inner) => self.gen_expr(inner),
            ExprKind::Unary { op, operand } => {
                self.gen_expr(operand)?;
                match op {
                    UnaryOp::Neg => {
                        self.ctx.emit(Opcode::Ineg);
                        Ok(())
                    }
                    UnaryOp::Not if is_truth_value(operand) => {
                        self.ctx.emit(Opcode::Iconst1);
                        self.ctx.emit(Opcode::Ixor);
                        Ok(())
                    }
                    UnaryOp::Not => self.gen_select(Opcode::Ifeq),
                }
            }
            ExprKind::Binary { op, left, right } if op.is_logical() => {
                self.gen_truth_value(left)?;
                self.gen_truth_value(right)?;
                let opcode = if *op == BinaryOp::And {
                    Opcode::Iand
                } else {
                    Opcode::Ior
                };
                self.ctx.emit(opcode);
                Ok(())
            }
            ExprKind::Binary { op, left, right } => {
                if op.is_comparison() {
                    self.ctx.emit_comment(&expr.to_string());
                }
                self.gen_expr(left)?;
                self.gen_expr(right)?;
                match arithmetic_opcode(*op) {
                    Some(opcode) => {
                        self.ctx.emit(opcode);
                        Ok(())
                    }
                    None => self.gen_select(comparison_opcode(*op)),
                }
            }
        })
    }

    /// Generate `expr` and reduce it to 0 or 1.
    fn gen_truth_value(&mut self, expr: &Expr) -> Result<(), CodegenError> {
        self.gen_expr(expr)?;
        if is_truth_value(expr) {
            Ok(())
        } else {
            self.gen_select(Opcode::Ifne)
        }
    }

    /// Replace the operands `branch` consumes with 1 when it jumps, 0 when
    /// it falls through.
    fn gen_select(&mut self, branch: Opcode) -> Result<(), CodegenError> {
        let on_true = self.ctx.new_label();
        let exit = self.ctx.new_label();

        self.ctx.emit_branch(branch, on_true);
        self.ctx.emit(Opcode::Iconst0);
        self.ctx.emit_branch(Opcode::Goto, exit);
        self.ctx.emit_label(on_true)?;
        self.ctx.emit(Opcode::Iconst1);
        self.ctx.emit_label(exit)?;

        // Only one of the two constants is pushed at run time.
        self.ctx.stack_mut().decrease(1);
        Ok(())
    }

    fn load_variable(&mut self, ident: &Ident) -> Result<(), CodegenError> {
        let id = self.resolve(ident)?;
        match *self.kind(id) {
            DeclKind::Variable { slot: None } => {
                let field = self.field_reference(id);
                let desc = self.field_descriptor(id);
                self.ctx.emit_field(Opcode::Getstatic, &field, desc);
            }
            DeclKind::Variable { slot: Some(slot) } | DeclKind::ValueParameter { slot } => {
                self.ctx.load_local(slot);
            }
            // A bare function name calls it without arguments.
            DeclKind::Function(_) => {
                if !self.invoke(id) {
                    self.ctx.load_constant(0);
                }
            }
            _ => return Err(self.wrong_kind(ident, id, "variable")),
        }
        Ok(())
    }

    /// Push the arguments and call. Returns whether a result was pushed.
    pub(super) fn gen_call(&mut self, call: &Call) -> Result<bool, CodegenError> {
        let id = self.resolve(&call.callee)?;
        if !self.kind(id).is_function() {
            return Err(self.wrong_kind(&call.callee, id, "function"));
        }
        for arg in &call.args {
            self.gen_expr(arg)?;
        }
        Ok(self.invoke(id))
    }

    fn invoke(&mut self, id: DeclId) -> bool {
        let target = self.method_reference(id);
        self.ctx.emit_with(Opcode::Invokestatic, target);
        self.kind(id)
            .routine()
            .is_some_and(luaj_symtab::Routine::returns_value)
    }
}

fn arithmetic_opcode(op: BinaryOp) -> Option<Opcode> {
    match op {
        BinaryOp::Add => Some(Opcode::Iadd),
        BinaryOp::Sub => Some(Opcode::Isub),
        BinaryOp::Mul => Some(Opcode::Imul),
        BinaryOp::Div => Some(Opcode::Idiv),
        BinaryOp::Mod => Some(Opcode::Irem),
        BinaryOp::And
        | BinaryOp::Or
        | BinaryOp::Eq
        | BinaryOp::NotEq
        | BinaryOp::Lt
        | BinaryOp::LtEq
        | BinaryOp::Gt
        | BinaryOp::GtEq => None,
    }
}

fn comparison_opcode(op: BinaryOp) -> Opcode {
    match op {
        BinaryOp::Eq => Opcode::IfIcmpeq,
        BinaryOp::NotEq => Opcode::IfIcmpne,
        BinaryOp::Lt => Opcode::IfIcmplt,
        BinaryOp::LtEq => Opcode::IfIcmple,
        BinaryOp::Gt => Opcode::IfIcmpgt,
        _ => Opcode::IfIcmpge,
    }
}

/// Whether `expr` is already known to leave 0 or 1.
fn is_truth_value(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Bool(_) | ExprKind::Unary { op: UnaryOp::Not, .. } => true,
        ExprKind::Binary { op, .. } => op.is_comparison() || op.is_logical(),
        ExprKind::Paren(inner) => is_truth_value(inner),
        _ => false,
    }
}
