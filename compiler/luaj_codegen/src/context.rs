//! Code generation context and state.
//!
//! The `CodegenContext` owns the output buffer, hands out labels and
//! tracks the operand stack of the method being generated.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::descriptor::invoke_stack_effect;
use crate::opcode::{Directive, Opcode};
use crate::CodegenError;

/// A branch target, printed as `L001`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Label(u32);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{:03}", self.0)
    }
}

/// Operand-stack depth and high-water mark of one method, in words.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StackTracker {
    depth: u32,
    max: u32,
}

impl StackTracker {
    pub fn increase(&mut self, words: u32) {
        self.depth += words;
        self.max = self.max.max(self.depth);
    }

    pub fn decrease(&mut self, words: u32) {
        self.depth = self.depth.saturating_sub(words);
    }

    /// Apply a signed change.
    pub fn apply(&mut self, effect: i32) {
        if effect >= 0 {
            self.increase(effect.unsigned_abs());
        } else {
            self.decrease(effect.unsigned_abs());
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// The value for `.limit stack`.
    pub fn capacity(&self) -> u32 {
        self.max
    }

    pub fn reset(&mut self) {
        *self = StackTracker::default();
    }
}

/// Code generation context.
pub struct CodegenContext {
    output: String,
    stack: StackTracker,
    next_label: u32,
    bound: FxHashSet<Label>,
}

impl Default for CodegenContext {
    fn default() -> Self {
        Self::new()
    }
}

impl CodegenContext {
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            stack: StackTracker::default(),
            next_label: 1,
            bound: FxHashSet::default(),
        }
    }

    /// Allocate a label. Labels are unique within the class.
    pub fn new_label(&mut self) -> Label {
        let label = Label(self.next_label);
        self.next_label += 1;
        label
    }

    /// Bind `label` to the current position.
    pub fn emit_label(&mut self, label: Label) -> Result<(), CodegenError> {
        if !self.bound.insert(label) {
            return Err(CodegenError::LabelBoundTwice(label));
        }
        tracing::trace!(%label, depth = self.stack.depth(), "bind label");
        self.writeln(&format!("{label}:"));
        Ok(())
    }

    /// Emit an instruction without operands.
    pub fn emit(&mut self, op: Opcode) {
        self.track(op, "");
        self.writeln(&format!("    {op}"));
    }

    /// Emit an instruction with one operand.
    pub fn emit_with(&mut self, op: Opcode, operand: impl fmt::Display) {
        let operand = operand.to_string();
        self.track(op, &operand);
        self.writeln(&format!("    {op}\t{operand}"));
    }

    /// Emit a field instruction: `getstatic owner/name desc`.
    pub fn emit_field(&mut self, op: Opcode, field: &str, desc: &str) {
        self.emit_with(op, format_args!("{field} {desc}"));
    }

    pub fn emit_branch(&mut self, op: Opcode, target: Label) {
        self.emit_with(op, target);
    }

    pub fn emit_directive(&mut self, directive: Directive) {
        self.writeln(directive.text());
    }

    pub fn emit_directive_with(&mut self, directive: Directive, operand: impl fmt::Display) {
        self.writeln(&format!("{directive} {operand}"));
    }

    pub fn emit_comment(&mut self, text: &str) {
        self.writeln(&format!("; {text}"));
    }

    /// Write an empty line.
    pub fn emit_line(&mut self) {
        self.output.push('\n');
    }

    /// Load an `int` constant with the shortest instruction.
    pub fn load_constant(&mut self, value: i32) {
        match value {
            -1 => self.emit(Opcode::IconstM1),
            0 => self.emit(Opcode::Iconst0),
            1 => self.emit(Opcode::Iconst1),
            2 => self.emit(Opcode::Iconst2),
            3 => self.emit(Opcode::Iconst3),
            4 => self.emit(Opcode::Iconst4),
            5 => self.emit(Opcode::Iconst5),
            v if i8::try_from(v).is_ok() => self.emit_with(Opcode::Bipush, v),
            v if i16::try_from(v).is_ok() => self.emit_with(Opcode::Sipush, v),
            v => self.emit_with(Opcode::Ldc, v),
        }
    }

    pub fn load_local(&mut self, slot: u32) {
        match slot {
            0 => self.emit(Opcode::Iload0),
            1 => self.emit(Opcode::Iload1),
            2 => self.emit(Opcode::Iload2),
            3 => self.emit(Opcode::Iload3),
            s => self.emit_with(Opcode::Iload, s),
        }
    }

    pub fn store_local(&mut self, slot: u32) {
        match slot {
            0 => self.emit(Opcode::Istore0),
            1 => self.emit(Opcode::Istore1),
            2 => self.emit(Opcode::Istore2),
            3 => self.emit(Opcode::Istore3),
            s => self.emit_with(Opcode::Istore, s),
        }
    }

    pub fn stack(&self) -> &StackTracker {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut StackTracker {
        &mut self.stack
    }

    /// Take the generated output.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    fn track(&mut self, op: Opcode, operand: &str) {
        let effect = op
            .stack_effect()
            .unwrap_or_else(|| invoke_stack_effect(op, operand));
        self.stack.apply(effect);
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
