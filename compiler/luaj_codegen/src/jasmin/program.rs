//! Class layout: header, fields, initializers, functions and `main`.

use luaj_ir::Chunk;
use luaj_symtab::{DeclId, DeclKind};

use super::{Frame, JasminCodegen};
use crate::opcode::{Directive, Opcode};
use crate::reserved::SCANNER_FIELD;
use crate::CodegenError;

/// `main` locals: `args`, `_start`, `_end` and the two words of `_elapsed`.
const MAIN_LOCALS: u32 = 5;

const INSTANT_NOW: &str = "java/time/Instant/now()Ljava/time/Instant;";
const DURATION_BETWEEN: &str = "java/time/Duration/between(Ljava/time/temporal/Temporal;\
                                Ljava/time/temporal/Temporal;)Ljava/time/Duration;";
pub(super) const PRINTF: &str =
    "java/io/PrintStream/printf(Ljava/lang/String;[Ljava/lang/Object;)Ljava/io/PrintStream;";

impl JasminCodegen<'_> {
    /// Generate the whole class.
    pub fn generate_program(mut self, chunk: &Chunk) -> Result<String, CodegenError> {
        let class = self.class_name();
        self.ctx.emit_directive_with(Directive::ClassPublic, class);
        self.ctx.emit_directive_with(Directive::Super, "java/lang/Object");

        self.emit_program_variables();
        self.emit_input_scanner();
        self.emit_constructor();

        let functions = self
            .model
            .symtab
            .routine(self.model.program)
            .map(|program| program.subroutines.clone())
            .unwrap_or_default();
        for function in functions {
            self.emit_routine(function)?;
        }

        self.emit_main(chunk)?;
        Ok(self.ctx.take_output())
    }

    /// One static field per chunk variable, sorted by name.
    fn emit_program_variables(&mut self) {
        self.ctx.emit_line();
        self.ctx
            .emit_directive_with(
                Directive::FieldPrivateStatic,
                format!("{SCANNER_FIELD} Ljava/util/Scanner;"),
            );

        let model = self.model;
        let symtab = &model.symtab;
        let Some(scope) = symtab.routine(model.program).and_then(|r| r.scope) else {
            return;
        };
        for id in symtab.sorted_entries(scope) {
            if matches!(symtab.decl(id).kind, DeclKind::Variable { .. }) {
                let field = format!("{} {}", self.storage_name(id), self.field_descriptor(id));
                self.ctx
                    .emit_directive_with(Directive::FieldPrivateStatic, field);
            }
        }
    }

    fn emit_input_scanner(&mut self) {
        let class = self.class_name();
        self.ctx.emit_line();
        self.ctx.emit_comment("Runtime input scanner");
        self.ctx
            .emit_directive_with(Directive::MethodStatic, "<clinit>()V");
        self.ctx.emit_line();

        self.ctx.emit_with(Opcode::New, "java/util/Scanner");
        self.ctx.emit(Opcode::Dup);
        self.ctx.emit_field(
            Opcode::Getstatic,
            "java/lang/System/in",
            "Ljava/io/InputStream;",
        );
        self.ctx.emit_with(
            Opcode::Invokespecial,
            "java/util/Scanner/<init>(Ljava/io/InputStream;)V",
        );
        self.ctx.emit_field(
            Opcode::Putstatic,
            &format!("{class}/{SCANNER_FIELD}"),
            "Ljava/util/Scanner;",
        );
        self.ctx.emit(Opcode::Return);

        self.emit_method_end("<clinit>", 0);
    }

    fn emit_constructor(&mut self) {
        let class = self.class_name();
        self.ctx.emit_line();
        self.ctx.emit_comment("Main class constructor");
        self.ctx.emit_directive_with(Directive::MethodPublic, "<init>()V");
        self.ctx
            .emit_directive_with(Directive::Var, format_args!("0 is this L{class};"));
        self.ctx.emit_line();

        self.ctx.emit(Opcode::Aload0);
        self.ctx
            .emit_with(Opcode::Invokespecial, "java/lang/Object/<init>()V");
        self.ctx.emit(Opcode::Return);

        self.emit_method_end("<init>", 1);
    }

    /// Emit a function as a private static method, then its subroutines.
    #[tracing::instrument(level = "debug", skip(self))]
    fn emit_routine(&mut self, id: DeclId) -> Result<(), CodegenError> {
        let model = self.model;
        let decl = model.symtab.decl(id);
        let Some(routine) = decl.kind.routine() else {
            return Err(CodegenError::WrongKind {
                name: decl.name.clone(),
                line: decl.lines.first().copied().unwrap_or(0),
                found: decl.kind.name(),
                expected: "function",
            });
        };
        let Some(body) = routine.body.as_ref() else {
            return Err(CodegenError::MissingBody(decl.name.clone()));
        };

        let name = self.method_name(id);
        let header = format!("{name}{}", self.signature(id));
        self.ctx.emit_line();
        self.ctx.emit_comment(&format!("FUNCTION {name}"));
        self.ctx
            .emit_directive_with(Directive::MethodPrivateStatic, header);

        self.emit_routine_locals(id);

        let frame = Frame {
            exit: self.ctx.new_label(),
            result_slot: routine.result_slot,
        };
        self.gen_block(body, &frame)?;

        self.ctx.emit_label(frame.exit)?;
        match frame.result_slot {
            Some(slot) => {
                self.ctx.load_local(slot);
                self.ctx.emit(Opcode::Ireturn);
            }
            None => self.ctx.emit(Opcode::Return),
        }

        let locals = routine
            .scope
            .map_or(0, |scope| model.symtab.scope(scope).slot_count());
        self.emit_method_end(&name, locals);

        for sub in &routine.subroutines {
            self.emit_routine(*sub)?;
        }
        Ok(())
    }

    /// `.var` directives, then zero every slot that is not a parameter.
    fn emit_routine_locals(&mut self, id: DeclId) {
        let model = self.model;
        let symtab = &model.symtab;
        let decl = symtab.decl(id);
        let Some(routine) = decl.kind.routine() else {
            return;
        };

        let mut vars = Vec::new();
        let mut zeroed = Vec::new();
        if let Some(scope) = routine.scope {
            for entry in symtab.sorted_entries(scope) {
                let local = symtab.decl(entry);
                match local.kind {
                    DeclKind::ValueParameter { slot } => vars.push((slot, entry)),
                    DeclKind::Variable { slot: Some(slot) } => {
                        vars.push((slot, entry));
                        zeroed.push(slot);
                    }
                    _ => {}
                }
            }
        }

        self.ctx.emit_line();
        for (slot, entry) in vars {
            let var = format!(
                "{slot} is {} {}",
                self.storage_name(entry),
                self.field_descriptor(entry)
            );
            self.ctx.emit_directive_with(Directive::Var, var);
        }
        if let Some(slot) = routine.result_slot {
            self.ctx.emit_directive_with(
                Directive::Var,
                format_args!("{slot} is {} I", decl.name),
            );
            zeroed.push(slot);
        }
        self.ctx.emit_line();

        zeroed.sort_unstable();
        for slot in zeroed {
            self.ctx.load_constant(0);
            self.ctx.store_local(slot);
        }
    }

    fn emit_main(&mut self, chunk: &Chunk) -> Result<(), CodegenError> {
        self.ctx.emit_line();
        self.ctx.emit_comment("MAIN");
        self.ctx
            .emit_directive_with(Directive::MethodPublicStatic, "main([Ljava/lang/String;)V");
        self.ctx
            .emit_directive_with(Directive::Var, "0 is args [Ljava/lang/String;");
        self.ctx
            .emit_directive_with(Directive::Var, "1 is _start Ljava/time/Instant;");
        self.ctx
            .emit_directive_with(Directive::Var, "2 is _end Ljava/time/Instant;");
        self.ctx.emit_directive_with(Directive::Var, "3 is _elapsed J");

        self.ctx.emit_line();
        self.ctx.emit_with(Opcode::Invokestatic, INSTANT_NOW);
        self.ctx.emit(Opcode::Astore1);
        self.ctx.emit_line();

        let frame = Frame {
            exit: self.ctx.new_label(),
            result_slot: None,
        };
        self.gen_block(&chunk.block, &frame)?;
        self.ctx.emit_label(frame.exit)?;

        self.emit_elapsed_time();
        self.ctx.emit_line();
        self.ctx.emit(Opcode::Return);
        self.emit_method_end("main", MAIN_LOCALS);
        Ok(())
    }

    /// Print the run time measured from `_start`.
    fn emit_elapsed_time(&mut self) {
        self.ctx.emit_line();
        self.ctx.emit_with(Opcode::Invokestatic, INSTANT_NOW);
        self.ctx.emit(Opcode::Astore2);
        self.ctx.emit(Opcode::Aload1);
        self.ctx.emit(Opcode::Aload2);
        self.ctx.emit_with(Opcode::Invokestatic, DURATION_BETWEEN);
        self.ctx
            .emit_with(Opcode::Invokevirtual, "java/time/Duration/toMillis()J");
        self.ctx.emit(Opcode::Lstore3);
        self.ctx.emit_field(
            Opcode::Getstatic,
            "java/lang/System/out",
            "Ljava/io/PrintStream;",
        );
        self.ctx
            .emit_with(Opcode::Ldc, "\"\\n[%,d milliseconds execution time.]\\n\"");
        self.ctx.emit(Opcode::Iconst1);
        self.ctx.emit_with(Opcode::Anewarray, "java/lang/Object");
        self.ctx.emit(Opcode::Dup);
        self.ctx.emit(Opcode::Iconst0);
        self.ctx.emit(Opcode::Lload3);
        self.ctx.emit_with(
            Opcode::Invokestatic,
            "java/lang/Long/valueOf(J)Ljava/lang/Long;",
        );
        self.ctx.emit(Opcode::Aastore);
        self.ctx.emit_with(Opcode::Invokevirtual, PRINTF);
        self.ctx.emit(Opcode::Pop);
    }

    /// Limits and `.end method`; resets the stack tracker.
    fn emit_method_end(&mut self, method: &str, locals: u32) {
        let stack = self.ctx.stack().capacity();
        tracing::debug!(method, locals, stack, "method limits");

        self.ctx.emit_line();
        self.ctx.emit_directive_with(Directive::LimitLocals, locals);
        self.ctx.emit_directive_with(Directive::LimitStack, stack);
        self.ctx.emit_directive(Directive::EndMethod);
        self.ctx.stack_mut().reset();
    }
}
