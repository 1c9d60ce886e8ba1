use super::*;
use luaj_diagnostic::ErrorCode;
use luaj_ir::{BinaryOp, ExprKind, StmtKind, UnaryOp};
use pretty_assertions::assert_eq;

fn parse_ok(source: &str) -> Chunk {
    let out = parse(source);
    assert!(
        out.errors.is_empty(),
        "unexpected errors: {:?}",
        out.errors.iter().map(ToString::to_string).collect::<Vec<_>>()
    );
    out.chunk
}

fn error_codes(source: &str) -> Vec<ErrorCode> {
    parse(source).errors.iter().map(|d| d.code).collect()
}

#[test]
fn test_assignment_and_print() {
    let chunk = parse_ok("x = 1\nprint(x)");
    assert_eq!(chunk.block.stmts.len(), 2);

    let StmtKind::Assign { target, value } = &chunk.block.stmts[0].kind else {
        panic!("expected assignment");
    };
    assert_eq!(target.name, "x");
    assert_eq!(value.kind, ExprKind::Number("1".to_string()));

    let StmtKind::Print(args) = &chunk.block.stmts[1].kind else {
        panic!("expected print");
    };
    assert_eq!(args.len(), 1);
    assert_eq!(chunk.block.stmts[1].line, 2);
}

#[test]
fn test_precedence() {
    let chunk = parse_ok("x = 1 + 2 * 3 == 7 and not false");
    let StmtKind::Assign { value, .. } = &chunk.block.stmts[0].kind else {
        panic!("expected assignment");
    };
    assert_eq!(value.to_string(), "1 + 2 * 3 == 7 and not false");

    let ExprKind::Binary { op, left, right } = &value.kind else {
        panic!("expected binary");
    };
    assert_eq!(*op, BinaryOp::And);
    assert!(matches!(
        right.kind,
        ExprKind::Unary {
            op: UnaryOp::Not,
            ..
        }
    ));
    let ExprKind::Binary { op, left, .. } = &left.kind else {
        panic!("expected comparison");
    };
    assert_eq!(*op, BinaryOp::Eq);
    let ExprKind::Binary { op, right, .. } = &left.kind else {
        panic!("expected sum");
    };
    assert_eq!(*op, BinaryOp::Add);
    assert!(matches!(
        right.kind,
        ExprKind::Binary {
            op: BinaryOp::Mul,
            ..
        }
    ));
}

#[test]
fn test_left_associativity() {
    let chunk = parse_ok("x = 10 - 4 - 3");
    let StmtKind::Assign { value, .. } = &chunk.block.stmts[0].kind else {
        panic!("expected assignment");
    };
    let ExprKind::Binary { left, right, .. } = &value.kind else {
        panic!("expected binary");
    };
    assert_eq!(left.to_string(), "10 - 4");
    assert_eq!(right.to_string(), "3");
}

#[test]
fn test_if_elseif_else() {
    let chunk = parse_ok(
        "if x == 1 then print(1) elseif x == 2 then print(2) else print(3) end",
    );
    let StmtKind::If(stmt) = &chunk.block.stmts[0].kind else {
        panic!("expected if");
    };
    assert_eq!(stmt.branches.len(), 2);
    assert_eq!(stmt.branches[1].cond.to_string(), "x == 2");
    assert_eq!(stmt.else_block.as_ref().map(|b| b.stmts.len()), Some(1));
}

#[test]
fn test_repeat_until() {
    let chunk = parse_ok("repeat x = x + 1 until x == 10");
    let StmtKind::Repeat { body, until } = &chunk.block.stmts[0].kind else {
        panic!("expected repeat");
    };
    assert_eq!(body.stmts.len(), 1);
    assert_eq!(until.to_string(), "x == 10");
}

#[test]
fn test_function_definition_and_calls() {
    let chunk = parse_ok("function add(a, b)\n  return a + b\nend\nx = add(1, 2)\nadd(3, 4)");
    let def = chunk.block.stmts[0].as_function().map(|d| {
        (
            d.name.name.clone(),
            d.params.iter().map(|p| p.name.clone()).collect::<Vec<_>>(),
            d.body.stmts.len(),
        )
    });
    assert_eq!(
        def,
        Some(("add".to_string(), vec!["a".to_string(), "b".to_string()], 1))
    );
    assert!(matches!(
        chunk.block.stmts[1].kind,
        StmtKind::Assign { ref value, .. } if matches!(value.kind, ExprKind::Call(_))
    ));
    assert!(matches!(chunk.block.stmts[2].kind, StmtKind::Call(_)));
}

#[test]
fn test_return_forms() {
    let chunk = parse_ok("function f() return end\nfunction g() return 1; end\nreturn");
    let f = chunk.block.stmts[0].as_function().map(|d| d.body.stmts[0].kind.clone());
    assert_eq!(f, Some(StmtKind::Return(None)));
    assert!(matches!(
        chunk.block.stmts[2].kind,
        StmtKind::Return(None)
    ));
}

#[test]
fn test_node_ids_are_unique() {
    let out = parse("function f(a) b = a end\nf(x)\nprint(f(1), y)");
    assert!(out.errors.is_empty());
    // f a b a f x f y
    assert_eq!(out.node_count, 8);
}

#[test]
fn test_semicolons_are_optional_separators() {
    let chunk = parse_ok("x = 1; y = 2;; print(x)");
    assert_eq!(chunk.block.stmts.len(), 3);
}

#[test]
fn test_missing_then_is_reported() {
    // The stray `end` left behind by recovery is reported too.
    assert_eq!(
        error_codes("if x > 1 print(x) end"),
        vec![ErrorCode::E1001, ErrorCode::E1001]
    );
}

#[test]
fn test_recovery_reports_independent_errors() {
    let out = parse("x = )\ny = 2\nz = * 3\nprint(y)");
    let lines: Vec<Option<u32>> = out.errors.iter().map(|d| d.primary_line()).collect();
    assert_eq!(lines, vec![Some(1), Some(3)]);
    assert!(out.errors.iter().all(|d| d.code == ErrorCode::E1002));

    let names: Vec<String> = out
        .chunk
        .block
        .stmts
        .iter()
        .map(|s| match &s.kind {
            StmtKind::Assign { target, .. } => target.name.clone(),
            StmtKind::Print(_) => "print".to_string(),
            _ => String::new(),
        })
        .collect();
    assert_eq!(names, vec!["y".to_string(), "print".to_string()]);
}

#[test]
fn test_function_without_name() {
    let codes = error_codes("function (a) return a end");
    assert_eq!(codes.first(), Some(&ErrorCode::E1003));
}

#[test]
fn test_statement_after_return_is_an_error() {
    assert_eq!(error_codes("return 1\nx = 2"), vec![ErrorCode::E1001]);
}

#[test]
fn test_stray_end_at_top_level() {
    let out = parse("x = 1\nend\ny = 2");
    assert_eq!(out.errors.len(), 1);
    assert_eq!(out.chunk.block.stmts.len(), 2);
}

#[test]
fn test_lexer_errors_come_first() {
    assert_eq!(
        error_codes("x = @ 1\ny = \"open"),
        vec![ErrorCode::E0002, ErrorCode::E0001, ErrorCode::E1002]
    );
}

#[test]
fn test_deeply_nested_parens() {
    let depth = 5_000;
    let source = format!("x = {}1{}", "(".repeat(depth), ")".repeat(depth));
    let out = parse(&source);
    assert!(out.errors.is_empty());
}
