//! JVM instructions and Jasmin directives.
//!
//! Only the instructions the generators emit are listed. Each knows its
//! mnemonic and its effect on the operand stack in words; invocations
//! depend on their descriptor and are measured by
//! [`invoke_stack_effect`](crate::descriptor::invoke_stack_effect).

use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Constants
    IconstM1,
    Iconst0,
    Iconst1,
    Iconst2,
    Iconst3,
    Iconst4,
    Iconst5,
    Bipush,
    Sipush,
    Ldc,

    // Locals
    Iload0,
    Iload1,
    Iload2,
    Iload3,
    Iload,
    Istore0,
    Istore1,
    Istore2,
    Istore3,
    Istore,
    Aload0,
    Aload1,
    Aload2,
    Astore1,
    Astore2,
    Lload3,
    Lstore3,

    // Arithmetic and logic
    Iadd,
    Isub,
    Imul,
    Idiv,
    Irem,
    Ineg,
    Iand,
    Ior,
    Ixor,

    // Control flow
    Ifeq,
    Ifne,
    IfIcmpeq,
    IfIcmpne,
    IfIcmplt,
    IfIcmple,
    IfIcmpgt,
    IfIcmpge,
    Goto,
    Ireturn,
    Return,

    // Fields and methods
    Getstatic,
    Putstatic,
    Invokestatic,
    Invokevirtual,
    Invokespecial,

    // Objects, arrays and the stack
    New,
    Anewarray,
    Aastore,
    Dup,
    Pop,
}

impl Opcode {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::IconstM1 => "iconst_m1",
            Opcode::Iconst0 => "iconst_0",
            Opcode::Iconst1 => "iconst_1",
            Opcode::Iconst2 => "iconst_2",
            Opcode::Iconst3 => "iconst_3",
            Opcode::Iconst4 => "iconst_4",
            Opcode::Iconst5 => "iconst_5",
            Opcode::Bipush => "bipush",
            Opcode::Sipush => "sipush",
            Opcode::Ldc => "ldc",
            Opcode::Iload0 => "iload_0",
            Opcode::Iload1 => "iload_1",
            Opcode::Iload2 => "iload_2",
            Opcode::Iload3 => "iload_3",
            Opcode::Iload => "iload",
            Opcode::Istore0 => "istore_0",
            Opcode::Istore1 => "istore_1",
            Opcode::Istore2 => "istore_2",
            Opcode::Istore3 => "istore_3",
            Opcode::Istore => "istore",
            Opcode::Aload0 => "aload_0",
            Opcode::Aload1 => "aload_1",
            Opcode::Aload2 => "aload_2",
            Opcode::Astore1 => "astore_1",
            Opcode::Astore2 => "astore_2",
            Opcode::Lload3 => "lload_3",
            Opcode::Lstore3 => "lstore_3",
            Opcode::Iadd => "iadd",
            Opcode::Isub => "isub",
            Opcode::Imul => "imul",
            Opcode::Idiv => "idiv",
            Opcode::Irem => "irem",
            Opcode::Ineg => "ineg",
            Opcode::Iand => "iand",
            Opcode::Ior => "ior",
            Opcode::Ixor => "ixor",
            Opcode::Ifeq => "ifeq",
            Opcode::Ifne => "ifne",
            Opcode::IfIcmpeq => "if_icmpeq",
            Opcode::IfIcmpne => "if_icmpne",
            Opcode::IfIcmplt => "if_icmplt",
            Opcode::IfIcmple => "if_icmple",
            Opcode::IfIcmpgt => "if_icmpgt",
            Opcode::IfIcmpge => "if_icmpge",
            Opcode::Goto => "goto",
            Opcode::Ireturn => "ireturn",
            Opcode::Return => "return",
            Opcode::Getstatic => "getstatic",
            Opcode::Putstatic => "putstatic",
            Opcode::Invokestatic => "invokestatic",
            Opcode::Invokevirtual => "invokevirtual",
            Opcode::Invokespecial => "invokespecial",
            Opcode::New => "new",
            Opcode::Anewarray => "anewarray",
            Opcode::Aastore => "aastore",
            Opcode::Dup => "dup",
            Opcode::Pop => "pop",
        }
    }

    /// Net operand-stack change in words, or `None` for invocations.
    ///
    /// Field instructions assume a one-word field, which holds for every
    /// field this compiler touches.
    pub fn stack_effect(self) -> Option<i32> {
        let effect = match self {
            Opcode::IconstM1
            | Opcode::Iconst0
            | Opcode::Iconst1
            | Opcode::Iconst2
            | Opcode::Iconst3
            | Opcode::Iconst4
            | Opcode::Iconst5
            | Opcode::Bipush
            | Opcode::Sipush
            | Opcode::Ldc
            | Opcode::Iload0
            | Opcode::Iload1
            | Opcode::Iload2
            | Opcode::Iload3
            | Opcode::Iload
            | Opcode::Aload0
            | Opcode::Aload1
            | Opcode::Aload2
            | Opcode::Getstatic
            | Opcode::New
            | Opcode::Dup => 1,
            Opcode::Lload3 => 2,
            Opcode::Istore0
            | Opcode::Istore1
            | Opcode::Istore2
            | Opcode::Istore3
            | Opcode::Istore
            | Opcode::Astore1
            | Opcode::Astore2
            | Opcode::Iadd
            | Opcode::Isub
            | Opcode::Imul
            | Opcode::Idiv
            | Opcode::Irem
            | Opcode::Iand
            | Opcode::Ior
            | Opcode::Ixor
            | Opcode::Ifeq
            | Opcode::Ifne
            | Opcode::Ireturn
            | Opcode::Putstatic
            | Opcode::Pop => -1,
            Opcode::Lstore3
            | Opcode::IfIcmpeq
            | Opcode::IfIcmpne
            | Opcode::IfIcmplt
            | Opcode::IfIcmple
            | Opcode::IfIcmpgt
            | Opcode::IfIcmpge => -2,
            Opcode::Aastore => -3,
            Opcode::Ineg | Opcode::Goto | Opcode::Return | Opcode::Anewarray => 0,
            Opcode::Invokestatic | Opcode::Invokevirtual | Opcode::Invokespecial => {
                return None
            }
        };
        Some(effect)
    }

    /// Whether the call has a receiver below its arguments.
    pub fn has_receiver(self) -> bool {
        matches!(self, Opcode::Invokevirtual | Opcode::Invokespecial)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Assembler directives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Directive {
    ClassPublic,
    Super,
    FieldPrivateStatic,
    MethodStatic,
    MethodPublic,
    MethodPublicStatic,
    MethodPrivateStatic,
    Var,
    LimitLocals,
    LimitStack,
    EndMethod,
}

impl Directive {
    pub fn text(self) -> &'static str {
        match self {
            Directive::ClassPublic => ".class public",
            Directive::Super => ".super",
            Directive::FieldPrivateStatic => ".field private static",
            Directive::MethodStatic => ".method static",
            Directive::MethodPublic => ".method public",
            Directive::MethodPublicStatic => ".method public static",
            Directive::MethodPrivateStatic => ".method private static",
            Directive::Var => ".var",
            Directive::LimitLocals => ".limit locals",
            Directive::LimitStack => ".limit stack",
            Directive::EndMethod => ".end method",
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}
