//! Type and method descriptors.

use luaj_symtab::TypeDesc;

use crate::opcode::Opcode;

/// Method descriptor such as `(II)I`.
pub fn method_descriptor(params: impl IntoIterator<Item = TypeDesc>, ret: TypeDesc) -> String {
    let mut desc = String::from("(");
    for param in params {
        desc.push_str(param.descriptor());
    }
    desc.push(')');
    desc.push_str(ret.descriptor());
    desc
}

/// Operand-stack change of an invocation of `target`, in words.
///
/// `target` is a Jasmin method reference ending in its descriptor, as in
/// `java/lang/Integer/valueOf(I)Ljava/lang/Integer;`. A malformed
/// descriptor counts as taking and returning nothing.
pub fn invoke_stack_effect(op: Opcode, target: &str) -> i32 {
    let Some((args, ret)) = target
        .find('(')
        .and_then(|open| target[open + 1..].split_once(')'))
    else {
        return 0;
    };
    let receiver = i32::from(op.has_receiver());
    words(ret) - argument_words(args) - receiver
}

/// Size of all the argument types in a parameter list.
fn argument_words(mut params: &str) -> i32 {
    let mut total = 0;
    while let Some(first) = params.chars().next() {
        let len = field_type_len(params);
        if len == 0 {
            break;
        }
        total += if first == '[' { 1 } else { words(&params[..len]) };
        params = &params[len..];
    }
    total
}

/// Length of the first field type in `desc`, 0 if it is malformed.
fn field_type_len(desc: &str) -> usize {
    let dims = desc.bytes().take_while(|b| *b == b'[').count();
    let rest = &desc[dims..];
    match rest.bytes().next() {
        Some(b'L') => rest.find(';').map_or(0, |end| dims + end + 1),
        Some(b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z') => dims + 1,
        _ => 0,
    }
}

/// Stack words taken by a value of a return or field type.
fn words(desc: &str) -> i32 {
    match desc {
        "V" | "" => 0,
        "J" | "D" => 2,
        _ => 1,
    }
}
