//! Statement generation.

use luaj_ir::{ensure_sufficient_stack, Block, Expr, ExprKind, Ident, IfStmt, Stmt, StmtKind};
use luaj_symtab::{DeclKind, TypeDesc};

use super::program::PRINTF;
use super::{Frame, JasminCodegen};
use crate::literal::{decode, escape};
use crate::opcode::Opcode;
use crate::CodegenError;

impl JasminCodegen<'_> {
    pub(super) fn gen_block(&mut self, block: &Block, frame: &Frame) -> Result<(), CodegenError> {
        for stmt in block {
            self.gen_stmt(stmt, frame)?;
        }
        Ok(())
    }

    fn gen_stmt(&mut self, stmt: &Stmt, frame: &Frame) -> Result<(), CodegenError> {
        ensure_sufficient_stack(|| match &stmt.kind {
            StmtKind::Assign { target, value } => {
                self.ctx.emit_comment("ASSIGNMENT");
                self.gen_expr(value)?;
                self.store_variable(target)
            }
            StmtKind::If(if_stmt) => self.gen_if(if_stmt, frame),
            StmtKind::Repeat { body, until } => self.gen_repeat(body, until, frame),
            // Functions are emitted as methods of their own.
            StmtKind::Function(_) => Ok(()),
            StmtKind::Call(call) => {
                self.ctx.emit_comment("FUNCTION CALL");
                if self.gen_call(call)? {
                    self.ctx.emit(Opcode::Pop);
                }
                Ok(())
            }
            StmtKind::Print(args) => self.gen_print(args),
            StmtKind::Return(value) => self.gen_return(value.as_ref(), frame),
        })
    }

    fn store_variable(&mut self, target: &Ident) -> Result<(), CodegenError> {
        let id = self.resolve(target)?;
        match *self.kind(id) {
            DeclKind::Variable { slot: None } => {
                let field = self.field_reference(id);
                let desc = self.field_descriptor(id);
                self.ctx.emit_field(Opcode::Putstatic, &field, desc);
            }
            DeclKind::Variable { slot: Some(slot) } | DeclKind::ValueParameter { slot } => {
                self.ctx.store_local(slot);
            }
            _ => return Err(self.wrong_kind(target, id, "variable")),
        }
        Ok(())
    }

    /// Each condition falls through to its block or branches to the next
    /// test. Every block but the last jumps to one shared exit label.
    fn gen_if(&mut self, if_stmt: &IfStmt, frame: &Frame) -> Result<(), CodegenError> {
        self.ctx.emit_comment("IF");
        let chained = if_stmt.branches.len() > 1 || if_stmt.else_block.is_some();
        let exit = chained.then(|| self.ctx.new_label());

        let count = if_stmt.branches.len();
        for (i, branch) in if_stmt.branches.iter().enumerate() {
            if i > 0 {
                self.ctx.emit_comment("ELSE IF");
            }
            let next = self.ctx.new_label();
            self.gen_expr(&branch.cond)?;
            self.ctx.emit_branch(Opcode::Ifeq, next);
            self.gen_block(&branch.block, frame)?;

            let is_last = i + 1 == count && if_stmt.else_block.is_none();
            if let Some(exit) = exit.filter(|_| !is_last) {
                self.ctx.emit_branch(Opcode::Goto, exit);
            }
            self.ctx.emit_label(next)?;
        }

        if let Some(block) = &if_stmt.else_block {
            self.ctx.emit_comment("ELSE");
            self.gen_block(block, frame)?;
        }
        if let Some(exit) = exit {
            self.ctx.emit_label(exit)?;
        }
        Ok(())
    }

    fn gen_repeat(&mut self, body: &Block, until: &Expr, frame: &Frame) -> Result<(), CodegenError> {
        self.ctx.emit_comment("REPEAT");
        let top = self.ctx.new_label();
        let exit = self.ctx.new_label();

        self.ctx.emit_label(top)?;
        self.gen_block(body, frame)?;
        self.ctx.emit_comment("UNTIL");
        self.gen_expr(until)?;
        self.ctx.emit_branch(Opcode::Ifne, exit);
        self.ctx.emit_branch(Opcode::Goto, top);
        self.ctx.emit_label(exit)
    }

    /// `return` stores its value in the result slot and jumps to the exit.
    /// Outside a value-returning function the value is discarded.
    fn gen_return(&mut self, value: Option<&Expr>, frame: &Frame) -> Result<(), CodegenError> {
        if let Some(value) = value {
            self.gen_expr(value)?;
            match frame.result_slot {
                Some(slot) => self.ctx.store_local(slot),
                None => self.ctx.emit(Opcode::Pop),
            }
        }
        self.ctx.emit_branch(Opcode::Goto, frame.exit);
        Ok(())
    }

    /// One `printf` with a format built from the arguments.
    ///
    /// String literals are folded into the format; every other argument
    /// becomes a placeholder and is boxed into the argument array.
    /// Arguments are separated by tabs and the line ends with a newline.
    fn gen_print(&mut self, args: &[Expr]) -> Result<(), CodegenError> {
        self.ctx.emit_comment("PRINT");
        self.ctx.emit_field(
            Opcode::Getstatic,
            "java/lang/System/out",
            "Ljava/io/PrintStream;",
        );

        if args.is_empty() {
            self.ctx
                .emit_with(Opcode::Invokevirtual, "java/io/PrintStream/println()V");
            return Ok(());
        }

        let values: Vec<&Expr> = args.iter().filter(|arg| !arg.is_string_literal()).collect();
        let formatted = !values.is_empty();

        let mut format = String::from("\"");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                format.push_str("\\t");
            }
            if let ExprKind::Str(lexeme) = &arg.kind {
                let text = decode(lexeme);
                if formatted {
                    format.push_str(&escape(&text.replace('%', "%%")));
                } else {
                    format.push_str(&escape(&text));
                }
            } else {
                format.push_str(placeholder(self.model.expr_type(arg)));
            }
        }
        format.push_str("\\n\"");
        self.ctx.emit_with(Opcode::Ldc, format);

        if !formatted {
            self.ctx.emit_with(
                Opcode::Invokevirtual,
                "java/io/PrintStream/print(Ljava/lang/String;)V",
            );
            return Ok(());
        }

        self.ctx
            .load_constant(i32::try_from(values.len()).unwrap_or(i32::MAX));
        self.ctx.emit_with(Opcode::Anewarray, "java/lang/Object");
        for (index, value) in values.into_iter().enumerate() {
            self.ctx.emit(Opcode::Dup);
            self.ctx
                .load_constant(i32::try_from(index).unwrap_or(i32::MAX));
            self.gen_expr(value)?;
            self.box_value(self.model.expr_type(value));
            self.ctx.emit(Opcode::Aastore);
        }
        self.ctx.emit_with(Opcode::Invokevirtual, PRINTF);
        self.ctx.emit(Opcode::Pop);
        Ok(())
    }

    fn box_value(&mut self, ty: TypeDesc) {
        let target = match ty {
            TypeDesc::Number => "java/lang/Integer/valueOf(I)Ljava/lang/Integer;",
            TypeDesc::Boolean => "java/lang/Boolean/valueOf(Z)Ljava/lang/Boolean;",
            TypeDesc::String | TypeDesc::Nil | TypeDesc::Undefined => return,
        };
        self.ctx.emit_with(Opcode::Invokestatic, target);
    }
}

/// Format specifier for a value of type `ty`.
fn placeholder(ty: TypeDesc) -> &'static str {
    match ty {
        TypeDesc::Number => "%d",
        TypeDesc::Boolean => "%b",
        TypeDesc::String | TypeDesc::Nil | TypeDesc::Undefined => "%s",
    }
}
