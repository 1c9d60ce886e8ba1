use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_constant_loads_pick_shortest_form() {
    let mut ctx = CodegenContext::new();
    for value in [-1, 5, 6, -128, 127, 128, -32768, 32767, 32768, i32::MIN] {
        ctx.load_constant(value);
    }
    assert_eq!(
        ctx.take_output(),
        "    iconst_m1\n    iconst_5\n    bipush\t6\n    bipush\t-128\n    bipush\t127\n    \
         sipush\t128\n    sipush\t-32768\n    sipush\t32767\n    ldc\t32768\n    ldc\t-2147483648\n"
    );
    assert_eq!(ctx.stack().capacity(), 10);
}

#[test]
fn test_local_slots() {
    let mut ctx = CodegenContext::new();
    ctx.load_local(3);
    ctx.store_local(4);
    ctx.store_local(0);
    assert_eq!(ctx.take_output(), "    iload_3\n    istore\t4\n    istore_0\n");
}

#[test]
fn test_labels_are_unique_and_bound_once() {
    let mut ctx = CodegenContext::new();
    let first = ctx.new_label();
    let second = ctx.new_label();
    assert_ne!(first, second);
    assert_eq!(first.to_string(), "L001");

    ctx.emit_branch(Opcode::Goto, second);
    ctx.emit_label(second).unwrap();
    assert_eq!(ctx.take_output(), "    goto\tL002\nL002:\n");
    assert!(matches!(
        ctx.emit_label(second),
        Err(CodegenError::LabelBoundTwice(label)) if label == second
    ));
}

#[test]
fn test_stack_tracking_uses_descriptors() {
    let mut ctx = CodegenContext::new();
    ctx.emit_field(
        Opcode::Getstatic,
        "java/lang/System/out",
        "Ljava/io/PrintStream;",
    );
    ctx.emit_with(Opcode::Ldc, "\"hi\"");
    assert_eq!(ctx.stack().depth(), 2);
    ctx.emit_with(
        Opcode::Invokevirtual,
        "java/io/PrintStream/print(Ljava/lang/String;)V",
    );
    assert_eq!(ctx.stack().depth(), 0);
    assert_eq!(ctx.stack().capacity(), 2);

    ctx.stack_mut().reset();
    assert_eq!(ctx.stack().capacity(), 0);
}

#[test]
fn test_tracker_never_underflows() {
    let mut tracker = StackTracker::default();
    tracker.increase(1);
    tracker.apply(-3);
    assert_eq!(tracker.depth(), 0);
    assert_eq!(tracker.capacity(), 1);
}

#[test]
fn test_directives_and_comments() {
    let mut ctx = CodegenContext::new();
    ctx.emit_comment("MAIN");
    ctx.emit_directive_with(Directive::LimitStack, 4);
    ctx.emit_line();
    ctx.emit_directive(Directive::EndMethod);
    assert_eq!(ctx.take_output(), "; MAIN\n.limit stack 4\n\n.end method\n");
}
