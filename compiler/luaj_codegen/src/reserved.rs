//! Names the Jasmin assembler will not take as a field or local name.
//!
//! A field or `.var` line whose name is an assembler keyword or an
//! instruction mnemonic does not assemble, and a chunk variable named like
//! the input scanner field would shadow it. Such names are stored under a
//! `$` suffix; `$` never occurs in a source identifier, so a mangled name
//! cannot meet a declared one.

use std::borrow::Cow;

/// Static field holding the runtime input scanner.
pub const SCANNER_FIELD: &str = "_sysin";

/// Assembler keywords and JVM mnemonics, sorted for binary search.
static KEYWORDS: &[&str] = &[
    "aaload", "aastore", "abstract", "aconst_null", "aload", "aload_0", "aload_1", "aload_2",
    "aload_3", "anewarray", "annotation", "areturn", "arraylength", "astore", "astore_0",
    "astore_1", "astore_2", "astore_3", "athrow", "baload", "bastore", "bipush", "breakpoint",
    "bridge", "caload", "castore", "checkcast", "class", "d2f", "d2i", "d2l", "dadd", "daload",
    "dastore", "dcmpg", "dcmpl", "dconst_0", "dconst_1", "ddiv", "default", "dload", "dload_0",
    "dload_1", "dload_2", "dload_3", "dmul", "dneg", "drem", "dreturn", "dstore", "dstore_0",
    "dstore_1", "dstore_2", "dstore_3", "dsub", "dup", "dup2", "dup2_x1", "dup2_x2", "dup_x1",
    "dup_x2", "enum", "f2d", "f2i", "f2l", "fadd", "faload", "fastore", "fcmpg", "fcmpl",
    "fconst_0", "fconst_1", "fconst_2", "fdiv", "field", "final", "fload", "fload_0", "fload_1",
    "fload_2", "fload_3", "fmul", "fneg", "fpstrict", "frem", "freturn", "from", "fstore",
    "fstore_0", "fstore_1", "fstore_2", "fstore_3", "fsub", "getfield", "getstatic", "goto",
    "goto_w", "i2b", "i2c", "i2d", "i2f", "i2l", "i2s", "iadd", "iaload", "iand", "iastore",
    "iconst_0", "iconst_1", "iconst_2", "iconst_3", "iconst_4", "iconst_5", "iconst_m1", "idiv",
    "if_acmpeq", "if_acmpne", "if_icmpeq", "if_icmpge", "if_icmpgt", "if_icmple", "if_icmplt",
    "if_icmpne", "ifeq", "ifge", "ifgt", "ifle", "iflt", "ifne", "ifnonnull", "ifnull", "iinc",
    "iinc_w", "iload", "iload_0", "iload_1", "iload_2", "iload_3", "imul", "ineg", "instanceof",
    "interface", "invisible", "invisibleparam", "invokedynamic", "invokeinterface",
    "invokenonvirtual", "invokespecial", "invokestatic", "invokevirtual", "ior", "irem", "ireturn",
    "is", "ishl", "ishr", "istore", "istore_0", "istore_1", "istore_2", "istore_3", "isub",
    "iushr", "ixor", "jsr", "jsr_w", "l2d", "l2f", "l2i", "ladd", "laload", "land", "lastore",
    "lcmp", "lconst_0", "lconst_1", "ldc", "ldc2_w", "ldc_w", "ldiv", "lload", "lload_0",
    "lload_1", "lload_2", "lload_3", "lmul", "lneg", "locals", "lookupswitch", "lor", "lrem",
    "lreturn", "lshl", "lshr", "lstore", "lstore_0", "lstore_1", "lstore_2", "lstore_3", "lsub",
    "lushr", "lxor", "method", "monitorenter", "monitorexit", "multianewarray", "native", "new",
    "newarray", "nop", "offset", "pop", "pop2", "private", "protected", "public", "putfield",
    "putstatic", "ret", "ret_w", "return", "saload", "sastore", "signature", "sipush", "stack",
    "static", "swap", "synchronized", "synthetic", "tableswitch", "to", "transient", "using",
    "varargs", "visible", "visibleparam", "volatile", "wide",
];

/// Whether the assembler reads `name` as a keyword or mnemonic.
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.binary_search(&name).is_ok()
}

/// Whether `name` cannot be used as written for a field or local.
fn is_reserved(name: &str) -> bool {
    name == SCANNER_FIELD || is_keyword(name)
}

/// The name a variable is stored under in the generated class.
pub fn storage_name(name: &str) -> Cow<'_, str> {
    if is_reserved(name) {
        Cow::Owned(format!("{name}$"))
    } else {
        Cow::Borrowed(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_keywords_are_sorted() {
        assert!(KEYWORDS.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_storage_names() {
        assert_eq!(storage_name("count"), "count");
        assert_eq!(storage_name("pop"), "pop$");
        assert_eq!(storage_name("static"), "static$");
        assert_eq!(storage_name("goto"), "goto$");
        assert_eq!(storage_name("_sysin"), "_sysin$");
        assert_eq!(storage_name("popx"), "popx");
    }

    #[test]
    fn test_scanner_field_is_not_a_keyword() {
        assert!(is_keyword("class"));
        assert!(!is_keyword(SCANNER_FIELD));
        assert!(is_reserved(SCANNER_FIELD));
    }
}
